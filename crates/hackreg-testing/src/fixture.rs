//! Registration fixtures.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use uuid::Uuid;

use hackreg_domain::registration::{Registration, RegistrationForm};
use hackreg_domain::team::TeamNumber;

/// Head email accepted by the default email policy.
pub const HEAD_EMAIL: &str = "ravi.22bce0001@vitapstudent.ac.in";

/// A complete, valid form for `team_name` with no alternate contact.
pub fn sample_form(team_name: &str) -> RegistrationForm {
    RegistrationForm {
        team_name: team_name.to_owned(),
        head_name: "Ravi Kumar".to_owned(),
        head_email: HEAD_EMAIL.to_owned(),
        password: "hunter22".to_owned(),
        head_reg_no: "22BCE0001".to_owned(),
        contact: "9876543210".to_owned(),
        alt_contact: String::new(),
        member1_name: "Meera".to_owned(),
        member1_reg: "22BCE0002".to_owned(),
        member2_name: "Kiran".to_owned(),
        member2_reg: "22BCE0003".to_owned(),
    }
}

/// Same as [`sample_form`] with a different head email.
pub fn sample_form_for(team_name: &str, head_email: &str) -> RegistrationForm {
    RegistrationForm {
        head_email: head_email.to_owned(),
        ..sample_form(team_name)
    }
}

/// JSON body of [`sample_form`], as a browser would post it.
pub fn sample_form_json(team_name: &str) -> Value {
    serde_json::to_value(sample_form(team_name)).unwrap()
}

/// Fixed creation instant used by fixtures, `2025-02-11T11:09:00Z`.
pub fn fixture_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 11, 11, 9, 0).unwrap()
}

/// Stored registration built from [`sample_form`].
///
/// `seq` keeps ids, team numbers and timestamps distinct: a higher `seq` is
/// created later.
pub fn sample_registration(team_name: &str, seq: u32) -> Registration {
    let form = sample_form(team_name);
    Registration {
        id: Uuid::now_v7(),
        team_name: form.team_name,
        head_name: form.head_name,
        head_email: form.head_email,
        head_reg_no: form.head_reg_no,
        contact: form.contact,
        alt_contact: None,
        member1_name: form.member1_name,
        member1_reg: form.member1_reg,
        member2_name: form.member2_name,
        member2_reg: form.member2_reg,
        team_number: TeamNumber::from_suffix(10_000 + seq).unwrap(),
        round2: false,
        certificate_sent: false,
        created_at: fixture_time() + Duration::minutes(i64::from(seq)),
    }
}
