use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use hackreg_domain::registration::{Registration, RegistrationForm};
use hackreg_domain::team::TeamNumber;

/// Smallest OTP value (six digits, no leading zero).
pub const OTP_MIN: u32 = 100_000;

/// Largest OTP value.
pub const OTP_MAX: u32 = 999_999;

/// OTP time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 600;

/// Age after which an unverified code is dropped from the store, in seconds.
/// Far beyond the TTL so a late attempt still sees `OtpExpired`.
pub const ABANDONED_OTP_SECS: i64 = 86_400;

/// How long a successful verification admits a registration, in seconds.
pub const VERIFIED_EMAIL_TTL_SECS: i64 = 1_800;

/// Team-number candidates tried per registration before giving up.
pub const MAX_TEAM_NUMBER_ATTEMPTS: usize = 32;

/// A live one-time code for one email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpEntry {
    pub code: String,
    pub issued_at: DateTime<Utc>,
}

impl OtpEntry {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at > Duration::seconds(OTP_TTL_SECS)
    }
}

/// A validated registration ready to be written, with server-assigned fields.
/// Flags start false; `form` is already normalized.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub id: Uuid,
    pub form: RegistrationForm,
    pub team_number: TeamNumber,
    pub created_at: DateTime<Utc>,
}

impl NewRegistration {
    /// The record as it reads back after a successful insert.
    pub fn to_registration(&self) -> Registration {
        let form = &self.form;
        Registration {
            id: self.id,
            team_name: form.team_name.clone(),
            head_name: form.head_name.clone(),
            head_email: form.head_email.clone(),
            head_reg_no: form.head_reg_no.clone(),
            contact: form.contact.clone(),
            alt_contact: form.alt_contact().map(str::to_owned),
            member1_name: form.member1_name.clone(),
            member1_reg: form.member1_reg.clone(),
            member2_name: form.member2_name.clone(),
            member2_reg: form.member2_reg.clone(),
            team_number: self.team_number.clone(),
            round2: false,
            certificate_sent: false,
            created_at: self.created_at,
        }
    }
}

/// Result of an insert, decided by the store's unique indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    TeamNameTaken,
    TeamNumberTaken,
}

/// Plain-text message for the mail collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
}

impl MailMessage {
    pub fn otp(to: &str, code: &str) -> Self {
        Self {
            to: to.to_owned(),
            subject: "Your hackathon registration OTP".to_owned(),
            text: format!(
                "Your one-time verification code is {code}.\n\nIt expires in {} minutes.",
                OTP_TTL_SECS / 60
            ),
        }
    }
}

/// Key under which OTP state is stored for an email.
pub fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
