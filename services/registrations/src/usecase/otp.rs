use chrono::Utc;
use rand::RngExt;

use hackreg_domain::validation::EmailPolicy;

use crate::domain::repository::{MailPort, OtpStore};
use crate::domain::types::{MailMessage, OTP_MAX, OTP_MIN, OtpEntry, email_key};
use crate::error::RegistrationServiceError;

fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(OTP_MIN..=OTP_MAX).to_string()
}

// ── RequestOtp ───────────────────────────────────────────────────────────────

pub struct RequestOtpInput {
    pub email: String,
}

pub struct RequestOtpUseCase<S, M>
where
    S: OtpStore,
    M: MailPort,
{
    pub store: S,
    pub mailer: M,
    pub policy: EmailPolicy,
}

impl<S, M> RequestOtpUseCase<S, M>
where
    S: OtpStore,
    M: MailPort,
{
    pub async fn execute(&self, input: RequestOtpInput) -> Result<(), RegistrationServiceError> {
        if !self.policy.accepts(&input.email) {
            return Err(RegistrationServiceError::InvalidEmail);
        }
        let key = email_key(&input.email);

        // 1. Store (overwrites any live code for this email)
        let entry = OtpEntry {
            code: generate_code(),
            issued_at: Utc::now(),
        };
        let issued_at = entry.issued_at;
        let message = MailMessage::otp(input.email.trim(), &entry.code);
        self.store.put(&key, entry).await?;

        // 2. Deliver; withdraw the code if it never left
        if let Err(e) = self.mailer.send(&message).await {
            self.store.remove(&key, issued_at).await?;
            return Err(e);
        }

        tracing::info!(email = %key, "otp issued");
        Ok(())
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub email: String,
    pub otp: String,
}

pub struct VerifyOtpUseCase<S: OtpStore> {
    pub store: S,
}

impl<S: OtpStore> VerifyOtpUseCase<S> {
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<(), RegistrationServiceError> {
        let key = email_key(&input.email);
        let entry = self
            .store
            .get(&key)
            .await?
            .ok_or(RegistrationServiceError::OtpNotRequested)?;

        if entry.is_expired_at(Utc::now()) {
            self.store.remove(&key, entry.issued_at).await?;
            tracing::info!(email = %key, "otp expired");
            return Err(RegistrationServiceError::OtpExpired);
        }

        // A wrong guess keeps the entry so the user can retry.
        if entry.code != input.otp.trim() {
            return Err(RegistrationServiceError::OtpMismatch);
        }

        // Lost the race to a concurrent verification or a re-issue.
        if !self.store.remove(&key, entry.issued_at).await? {
            return Err(RegistrationServiceError::OtpNotRequested);
        }

        self.store.mark_verified(&key, Utc::now()).await?;
        tracing::info!(email = %key, "email verified");
        Ok(())
    }
}
