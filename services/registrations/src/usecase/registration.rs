use anyhow::anyhow;
use chrono::Utc;
use rand::RngExt;
use uuid::Uuid;

use hackreg_domain::export::{export_snapshot, filter_by_round2};
use hackreg_domain::registration::{Registration, RegistrationForm, RegistrationPatch};
use hackreg_domain::team::{TEAM_NUMBER_MAX, TEAM_NUMBER_MIN, TeamNumber};
use hackreg_domain::validation::{EmailPolicy, validate_form, validate_patch};

use crate::domain::repository::{OtpStore, RegistrationRepository};
use crate::domain::types::{InsertOutcome, MAX_TEAM_NUMBER_ATTEMPTS, NewRegistration, email_key};
use crate::error::RegistrationServiceError;

fn random_team_number() -> Result<TeamNumber, RegistrationServiceError> {
    let mut rng = rand::rng();
    let suffix = rng.random_range(TEAM_NUMBER_MIN..=TEAM_NUMBER_MAX);
    TeamNumber::from_suffix(suffix)
        .ok_or_else(|| anyhow!("team number suffix {suffix} out of range").into())
}

/// Draw random team numbers until one is not in the store.
///
/// Gives up with `TeamNumbersExhausted` after `MAX_TEAM_NUMBER_ATTEMPTS`.
/// The result is only a candidate: the insert's unique index has the final say.
pub async fn allocate_team_number<R: RegistrationRepository>(
    repo: &R,
) -> Result<TeamNumber, RegistrationServiceError> {
    for _ in 0..MAX_TEAM_NUMBER_ATTEMPTS {
        let candidate = random_team_number()?;
        if !repo.team_number_exists(&candidate).await? {
            return Ok(candidate);
        }
        tracing::warn!(team_number = %candidate, "team number collision, redrawing");
    }
    Err(RegistrationServiceError::TeamNumbersExhausted)
}

// ── ListRegistrations ────────────────────────────────────────────────────────

pub struct ListRegistrationsUseCase<R: RegistrationRepository> {
    pub repo: R,
}

impl<R: RegistrationRepository> ListRegistrationsUseCase<R> {
    pub async fn execute(
        &self,
        only_round2: bool,
    ) -> Result<Vec<Registration>, RegistrationServiceError> {
        let all = self.repo.list_all().await?;
        if !only_round2 {
            return Ok(all);
        }
        Ok(filter_by_round2(&all, true).into_iter().cloned().collect())
    }
}

// ── ExportSnapshot ───────────────────────────────────────────────────────────

pub struct ExportSnapshotUseCase<R: RegistrationRepository> {
    pub repo: R,
}

impl<R: RegistrationRepository> ExportSnapshotUseCase<R> {
    pub async fn execute(&self, only_round2: bool) -> Result<String, RegistrationServiceError> {
        let all = self.repo.list_all().await?;
        Ok(export_snapshot(filter_by_round2(&all, only_round2)))
    }
}

// ── CreateRegistration ───────────────────────────────────────────────────────

pub struct CreateRegistrationUseCase<R, S>
where
    R: RegistrationRepository,
    S: OtpStore,
{
    pub repo: R,
    pub otp: S,
    pub policy: EmailPolicy,
}

impl<R, S> CreateRegistrationUseCase<R, S>
where
    R: RegistrationRepository,
    S: OtpStore,
{
    pub async fn execute(
        &self,
        form: RegistrationForm,
    ) -> Result<Registration, RegistrationServiceError> {
        // 1. Field rules shared with the form
        let form = form.normalized();
        validate_form(&form, &self.policy, |_| false)
            .map_err(RegistrationServiceError::Validation)?;

        // 2. Fast duplicate check; the unique index below is authoritative
        if self.repo.is_team_name_taken(&form.team_name).await? {
            return Err(RegistrationServiceError::DuplicateTeamName);
        }

        // 3. Head email must have passed OTP verification
        let email = email_key(&form.head_email);
        if !self.otp.is_verified(&email).await? {
            return Err(RegistrationServiceError::EmailNotVerified);
        }

        // 4. Allocate + insert, redrawing on team-number conflicts
        let id = Uuid::now_v7();
        let created_at = Utc::now();
        for _ in 0..MAX_TEAM_NUMBER_ATTEMPTS {
            let new = NewRegistration {
                id,
                form: form.clone(),
                team_number: allocate_team_number(&self.repo).await?,
                created_at,
            };
            match self.repo.insert(&new).await? {
                InsertOutcome::Inserted => {
                    if let Err(e) = self.otp.clear_verified(&email).await {
                        tracing::warn!(error = %e, email = %email, "failed to clear verified email");
                    }
                    tracing::info!(
                        registration_id = %id,
                        team_number = %new.team_number,
                        "registration created"
                    );
                    return Ok(new.to_registration());
                }
                InsertOutcome::TeamNameTaken => {
                    return Err(RegistrationServiceError::DuplicateTeamName);
                }
                InsertOutcome::TeamNumberTaken => {
                    tracing::warn!(team_number = %new.team_number, "team number taken at insert");
                }
            }
        }
        Err(RegistrationServiceError::TeamNumbersExhausted)
    }
}

// ── UpdateRegistration ───────────────────────────────────────────────────────

pub struct UpdateRegistrationUseCase<R: RegistrationRepository> {
    pub repo: R,
    pub policy: EmailPolicy,
}

impl<R: RegistrationRepository> UpdateRegistrationUseCase<R> {
    pub async fn execute(
        &self,
        id: Uuid,
        patch: RegistrationPatch,
    ) -> Result<Registration, RegistrationServiceError> {
        if patch.is_empty() {
            return Err(RegistrationServiceError::MissingData);
        }
        let patch = patch.normalized();
        validate_patch(&patch, &self.policy).map_err(RegistrationServiceError::Validation)?;

        let updated = self
            .repo
            .update(id, &patch)
            .await?
            .ok_or(RegistrationServiceError::RegistrationNotFound)?;
        tracing::info!(
            registration_id = %id,
            round2 = updated.round2,
            certificate_sent = updated.certificate_sent,
            "registration updated"
        );
        Ok(updated)
    }
}
