use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use hackreg_core::tracing::init_tracing;
use hackreg_domain::validation::EmailPolicy;
use hackreg_registrations::config::RegistrationsConfig;
use hackreg_registrations::infra::mail::Mailer;
use hackreg_registrations::infra::otp_store::MemoryOtpStore;
use hackreg_registrations::router::build_router;
use hackreg_registrations::state::AppState;
use hackreg_registrations_migration::Migrator;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = RegistrationsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("failed to apply migrations");
    }

    if config.mail_api.is_none() {
        tracing::warn!("mail API not configured, OTP mail is logged only");
    }
    let mailer =
        Mailer::from_config(config.mail_api.clone()).expect("invalid mail API configuration");

    let state = AppState {
        db,
        otp_store: MemoryOtpStore::new(),
        mailer,
        email_policy: EmailPolicy::new(&config.email_domain_suffix),
    };

    let router = build_router(state, config.cors_origin.as_deref());
    let addr = format!("0.0.0.0:{}", config.registrations_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(
        email_suffix = %config.email_domain_suffix,
        "registrations service listening on {addr}"
    );
    axum::serve(listener, router).await.expect("server error");
}
