//! Admin review: Round 2 shortlisting, certificates and export.

use uuid::Uuid;

use hackreg_domain::certificate::CertificateMail;
use hackreg_domain::export::{export_snapshot, filter_by_round2};
use hackreg_domain::registration::{Registration, RegistrationPatch};

use crate::api::{ApiError, RegistrationApi};

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("registration {0} is not in the loaded list")]
    UnknownRegistration(Uuid),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Admin view over all registrations.
pub struct AdminReview<A: RegistrationApi> {
    api: A,
    records: Vec<Registration>,
}

impl<A: RegistrationApi> AdminReview<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Registration] {
        &self.records
    }

    pub async fn refresh(&mut self) -> Result<(), ReviewError> {
        self.records = self.api.list(false).await?;
        Ok(())
    }

    /// Loaded records, or only those selected for Round 2.
    pub fn visible(&self, only_round2: bool) -> Vec<&Registration> {
        filter_by_round2(&self.records, only_round2)
    }

    /// Flip the Round 2 selection of a loaded registration.
    pub async fn promote_to_round2(&mut self, id: Uuid) -> Result<Registration, ReviewError> {
        let current = self.find(id)?.round2;
        let updated = self
            .api
            .update(id, &RegistrationPatch::round2(!current))
            .await?;
        tracing::info!(registration_id = %id, round2 = updated.round2, "round 2 selection changed");
        Ok(self.apply(updated))
    }

    /// Record the certificate as sent. Returns the server's record together
    /// with the mail composed for the admin's mail client.
    pub async fn mark_certificate_sent(
        &mut self,
        id: Uuid,
    ) -> Result<(Registration, CertificateMail), ReviewError> {
        self.find(id)?;
        let updated = self
            .api
            .update(id, &RegistrationPatch::certificate_sent(true))
            .await?;
        tracing::info!(registration_id = %id, "certificate marked as sent");
        let mail = CertificateMail::for_registration(&updated);
        Ok((self.apply(updated), mail))
    }

    /// CSV snapshot of the visible records.
    pub fn export_snapshot(&self, only_round2: bool) -> String {
        export_snapshot(self.visible(only_round2))
    }

    fn find(&self, id: Uuid) -> Result<&Registration, ReviewError> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(ReviewError::UnknownRegistration(id))
    }

    /// Replace the local copy with the server's version.
    fn apply(&mut self, updated: Registration) -> Registration {
        if let Some(slot) = self.records.iter_mut().find(|r| r.id == updated.id) {
            *slot = updated.clone();
        }
        updated
    }
}
