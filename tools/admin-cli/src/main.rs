//! Admin command line for hackathon registrations.
//!
//! # Usage
//!
//! ```bash
//! # Everything, newest first
//! cargo run -p hackreg-admin -- list
//!
//! # Round 2 shortlist as CSV
//! cargo run -p hackreg-admin -- export --round2 --output round2.csv
//!
//! # Toggle Round 2 / mark certificate sent, by id or team number
//! cargo run -p hackreg-admin -- promote TEAM40217
//! cargo run -p hackreg-admin -- certificate TEAM40217
//! ```

use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use hackreg_client::api::{HttpRegistrationApi, RegistrationApi};
use hackreg_client::review::AdminReview;
use hackreg_domain::export::EXPORT_FILE_NAME;
use hackreg_domain::registration::Registration;

#[derive(Parser)]
#[command(about = "Review hackathon registrations")]
struct Args {
    /// Base URL of the registrations service
    #[arg(long, env = "HACKREG_BASE_URL", default_value = "http://localhost:5001")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print registrations, newest first
    List {
        /// Only teams selected for Round 2
        #[arg(long)]
        round2: bool,
    },
    /// Download the CSV snapshot
    Export {
        /// Only teams selected for Round 2
        #[arg(long)]
        round2: bool,
        /// Output file, `-` for stdout
        #[arg(long, default_value = EXPORT_FILE_NAME)]
        output: PathBuf,
    },
    /// Toggle Round 2 selection of a team
    Promote {
        /// Registration id or team number
        team: String,
    },
    /// Mark the certificate as sent and print the mail draft link
    Certificate {
        /// Registration id or team number
        team: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let api = HttpRegistrationApi::new(&args.base_url);

    match args.command {
        Command::List { round2 } => {
            let mut review = AdminReview::new(api);
            review.refresh().await?;
            let visible = review.visible(round2);
            for r in &visible {
                print_row(r);
            }
            println!();
            println!("{} registration(s)", visible.len());
        }
        Command::Export { round2, output } => {
            let csv = api.export(round2).await?;
            if output.as_os_str() == "-" {
                println!("{csv}");
            } else {
                std::fs::write(&output, csv)
                    .with_context(|| format!("write {}", output.display()))?;
                eprintln!("wrote {}", output.display());
            }
        }
        Command::Promote { team } => {
            let mut review = AdminReview::new(api);
            review.refresh().await?;
            let id = resolve(review.records(), &team)?;
            let updated = review.promote_to_round2(id).await?;
            let verb = if updated.round2 { "selected for" } else { "removed from" };
            println!("{} ({}) {verb} Round 2", updated.team_name, updated.team_number);
        }
        Command::Certificate { team } => {
            let mut review = AdminReview::new(api);
            review.refresh().await?;
            let id = resolve(review.records(), &team)?;
            let (updated, mail) = review.mark_certificate_sent(id).await?;
            println!(
                "certificate marked as sent for {} ({}), {}",
                updated.team_name, updated.team_number, mail.to
            );
            println!("{}", mail.mailto_url());
        }
    }
    Ok(())
}

/// Find a loaded registration by id or (case-insensitive) team number.
fn resolve(records: &[Registration], team: &str) -> Result<Uuid> {
    let team = team.trim();
    let found = match Uuid::parse_str(team) {
        Ok(id) => records.iter().find(|r| r.id == id),
        Err(_) => records
            .iter()
            .find(|r| r.team_number.as_str().eq_ignore_ascii_case(team)),
    };
    match found {
        Some(r) => Ok(r.id),
        None => bail!("no registration matches {team:?}"),
    }
}

fn print_row(r: &Registration) {
    let flag = |on: bool| if on { "YES" } else { "NO" };
    println!(
        "{}  {:<30}  {:<40}  round2={:<3}  certificate={}",
        r.team_number,
        r.team_name,
        r.head_email,
        flag(r.round2),
        flag(r.certificate_sent),
    );
}
