#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use hackreg_domain::registration::{Registration, RegistrationPatch};
use hackreg_domain::team::TeamNumber;

use crate::domain::types::{InsertOutcome, MailMessage, NewRegistration, OtpEntry};
use crate::error::RegistrationServiceError;

/// Repository for persisted registrations.
pub trait RegistrationRepository: Send + Sync {
    /// All registrations, newest first.
    async fn list_all(&self) -> Result<Vec<Registration>, RegistrationServiceError>;

    /// Case-insensitive existence check on the team name.
    async fn is_team_name_taken(&self, name: &str) -> Result<bool, RegistrationServiceError>;

    async fn team_number_exists(
        &self,
        number: &TeamNumber,
    ) -> Result<bool, RegistrationServiceError>;

    /// Insert under the store's unique constraints. Conflicts are reported as
    /// an outcome, never written.
    async fn insert(
        &self,
        registration: &NewRegistration,
    ) -> Result<InsertOutcome, RegistrationServiceError>;

    /// Apply a partial update. `Ok(None)` when no record has this id; a rename
    /// onto an existing team name fails with `DuplicateTeamName`.
    async fn update(
        &self,
        id: Uuid,
        patch: &RegistrationPatch,
    ) -> Result<Option<Registration>, RegistrationServiceError>;
}

/// Keyed store for OTP entries and verified emails. Keys are
/// [`email_key`](crate::domain::types::email_key) values.
pub trait OtpStore: Send + Sync {
    /// Store an entry, replacing any previous one for the email.
    async fn put(&self, email: &str, entry: OtpEntry) -> Result<(), RegistrationServiceError>;

    async fn get(&self, email: &str) -> Result<Option<OtpEntry>, RegistrationServiceError>;

    /// Delete the entry only if it is still the one issued at `issued_at`.
    /// Returns `true` if this call removed it.
    async fn remove(
        &self,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<bool, RegistrationServiceError>;

    async fn mark_verified(
        &self,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<(), RegistrationServiceError>;

    /// `true` while a verification for the email is younger than its TTL.
    async fn is_verified(&self, email: &str) -> Result<bool, RegistrationServiceError>;

    async fn clear_verified(&self, email: &str) -> Result<(), RegistrationServiceError>;
}

/// Outbound mail collaborator.
pub trait MailPort: Send + Sync {
    /// Fails with `DeliveryFailed` when the message could not be handed off.
    async fn send(&self, message: &MailMessage) -> Result<(), RegistrationServiceError>;
}
