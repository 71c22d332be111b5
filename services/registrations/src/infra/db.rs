use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel as _, PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};
use uuid::Uuid;

use hackreg_domain::registration::{Registration, RegistrationPatch};
use hackreg_domain::team::{TeamNumber, team_name_key};
use hackreg_registrations_schema::registrations::{
    self, TEAM_NAME_KEY_INDEX, TEAM_NUMBER_INDEX,
};

use crate::domain::repository::RegistrationRepository;
use crate::domain::types::{InsertOutcome, NewRegistration};
use crate::error::RegistrationServiceError;

// ── Registration repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRegistrationRepository {
    pub db: DatabaseConnection,
}

impl RegistrationRepository for DbRegistrationRepository {
    async fn list_all(&self) -> Result<Vec<Registration>, RegistrationServiceError> {
        let models = registrations::Entity::find()
            .order_by_desc(registrations::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list registrations")?;
        models.into_iter().map(registration_from_model).collect()
    }

    async fn is_team_name_taken(&self, name: &str) -> Result<bool, RegistrationServiceError> {
        let count = registrations::Entity::find()
            .filter(registrations::Column::TeamNameKey.eq(team_name_key(name)))
            .count(&self.db)
            .await
            .context("count registrations by team name")?;
        Ok(count > 0)
    }

    async fn team_number_exists(
        &self,
        number: &TeamNumber,
    ) -> Result<bool, RegistrationServiceError> {
        let count = registrations::Entity::find()
            .filter(registrations::Column::TeamNumber.eq(number.as_str()))
            .count(&self.db)
            .await
            .context("count registrations by team number")?;
        Ok(count > 0)
    }

    async fn insert(
        &self,
        registration: &NewRegistration,
    ) -> Result<InsertOutcome, RegistrationServiceError> {
        let form = &registration.form;
        let result = registrations::ActiveModel {
            id: Set(registration.id),
            team_name: Set(form.team_name.clone()),
            team_name_key: Set(team_name_key(&form.team_name)),
            head_name: Set(form.head_name.clone()),
            head_email: Set(form.head_email.clone()),
            password: Set(form.password.clone()),
            head_reg_no: Set(form.head_reg_no.clone()),
            contact: Set(form.contact.clone()),
            alt_contact: Set(form.alt_contact().map(str::to_owned)),
            member1_name: Set(form.member1_name.clone()),
            member1_reg: Set(form.member1_reg.clone()),
            member2_name: Set(form.member2_name.clone()),
            member2_reg: Set(form.member2_reg.clone()),
            team_number: Set(registration.team_number.to_string()),
            round2: Set(false),
            certificate_sent: Set(false),
            created_at: Set(registration.created_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(e) => match unique_violation(&e) {
                Some(outcome) => Ok(outcome),
                None => Err(anyhow::Error::new(e).context("insert registration").into()),
            },
        }
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &RegistrationPatch,
    ) -> Result<Option<Registration>, RegistrationServiceError> {
        let Some(model) = registrations::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find registration by id")?
        else {
            return Ok(None);
        };

        let mut am = model.into_active_model();
        if let Some(ref name) = patch.team_name {
            am.team_name = Set(name.clone());
            am.team_name_key = Set(team_name_key(name));
        }
        if let Some(ref v) = patch.head_name {
            am.head_name = Set(v.clone());
        }
        if let Some(ref v) = patch.head_email {
            am.head_email = Set(v.clone());
        }
        if let Some(ref v) = patch.password {
            am.password = Set(v.clone());
        }
        if let Some(ref v) = patch.head_reg_no {
            am.head_reg_no = Set(v.clone());
        }
        if let Some(ref v) = patch.contact {
            am.contact = Set(v.clone());
        }
        if let Some(ref v) = patch.alt_contact {
            am.alt_contact = Set((!v.is_empty()).then(|| v.clone()));
        }
        if let Some(ref v) = patch.member1_name {
            am.member1_name = Set(v.clone());
        }
        if let Some(ref v) = patch.member1_reg {
            am.member1_reg = Set(v.clone());
        }
        if let Some(ref v) = patch.member2_name {
            am.member2_name = Set(v.clone());
        }
        if let Some(ref v) = patch.member2_reg {
            am.member2_reg = Set(v.clone());
        }
        if let Some(v) = patch.round2 {
            am.round2 = Set(v);
        }
        if let Some(v) = patch.certificate_sent {
            am.certificate_sent = Set(v);
        }

        match am.update(&self.db).await {
            Ok(model) => registration_from_model(model).map(Some),
            // Deleted between the read and the write.
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => match unique_violation(&e) {
                Some(InsertOutcome::TeamNameTaken) => {
                    Err(RegistrationServiceError::DuplicateTeamName)
                }
                _ => Err(anyhow::Error::new(e).context("update registration").into()),
            },
        }
    }
}

/// Map a unique-index violation to the constraint that fired.
/// Matches Postgres index names and SQLite `table.column` messages.
fn unique_violation(err: &DbErr) -> Option<InsertOutcome> {
    let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() else {
        return None;
    };
    if detail.contains(TEAM_NUMBER_INDEX) || detail.contains("registrations.team_number") {
        Some(InsertOutcome::TeamNumberTaken)
    } else if detail.contains(TEAM_NAME_KEY_INDEX) || detail.contains("registrations.team_name_key")
    {
        Some(InsertOutcome::TeamNameTaken)
    } else {
        None
    }
}

fn registration_from_model(
    model: registrations::Model,
) -> Result<Registration, RegistrationServiceError> {
    let team_number = model
        .team_number
        .parse::<TeamNumber>()
        .with_context(|| format!("stored team number of registration {}", model.id))?;
    Ok(Registration {
        id: model.id,
        team_name: model.team_name,
        head_name: model.head_name,
        head_email: model.head_email,
        head_reg_no: model.head_reg_no,
        contact: model.contact,
        alt_contact: model.alt_contact,
        member1_name: model.member1_name,
        member1_reg: model.member1_reg,
        member2_name: model.member2_name,
        member2_reg: model.member2_reg,
        team_number,
        round2: model.round2,
        certificate_sent: model.certificate_sent,
        created_at: model.created_at,
    })
}
