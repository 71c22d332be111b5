//! Tabular snapshot of registrations for the admin export.

use chrono::SecondsFormat;

use crate::registration::Registration;

/// Export header, in record field order. `id` and the password are never exported.
pub const EXPORT_COLUMNS: [&str; 14] = [
    "teamName",
    "headName",
    "headEmail",
    "headRegNo",
    "contact",
    "altContact",
    "member1Name",
    "member1Reg",
    "member2Name",
    "member2Reg",
    "teamNumber",
    "round2",
    "certificateSent",
    "createdAt",
];

/// File name offered to browsers downloading the export.
pub const EXPORT_FILE_NAME: &str = "hackathon_registrations.csv";

fn yes_no(flag: bool) -> &'static str {
    if flag { "YES" } else { "NO" }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn row(r: &Registration) -> [String; 14] {
    [
        r.team_name.clone(),
        r.head_name.clone(),
        r.head_email.clone(),
        r.head_reg_no.clone(),
        r.contact.clone(),
        r.alt_contact.clone().unwrap_or_default(),
        r.member1_name.clone(),
        r.member1_reg.clone(),
        r.member2_name.clone(),
        r.member2_reg.clone(),
        r.team_number.to_string(),
        yes_no(r.round2).to_owned(),
        yes_no(r.certificate_sent).to_owned(),
        r.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    ]
}

/// Render records as comma-separated text.
///
/// Every value is double-quoted with inner quotes doubled; rows are joined
/// with `\n`. An empty input yields an empty string (no header).
pub fn export_snapshot<'a>(records: impl IntoIterator<Item = &'a Registration>) -> String {
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return String::new();
    }
    let mut lines = vec![EXPORT_COLUMNS.join(",")];
    for r in records {
        let cells: Vec<String> = row(r).iter().map(|v| quote(v)).collect();
        lines.push(cells.join(","));
    }
    lines.join("\n")
}

/// Records to display: all of them, or only those selected for Round 2.
pub fn filter_by_round2(records: &[Registration], only_round2: bool) -> Vec<&Registration> {
    records
        .iter()
        .filter(|r| !only_round2 || r.round2)
        .collect()
}
