use sea_orm::DatabaseConnection;

use hackreg_domain::validation::EmailPolicy;

use crate::infra::db::DbRegistrationRepository;
use crate::infra::mail::Mailer;
use crate::infra::otp_store::MemoryOtpStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub otp_store: MemoryOtpStore,
    pub mailer: Mailer,
    pub email_policy: EmailPolicy,
}

impl AppState {
    pub fn registration_repo(&self) -> DbRegistrationRepository {
        DbRegistrationRepository {
            db: self.db.clone(),
        }
    }

    pub fn otp_store(&self) -> MemoryOtpStore {
        self.otp_store.clone()
    }

    pub fn mailer(&self) -> Mailer {
        self.mailer.clone()
    }
}
