use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hackreg_domain::export::EXPORT_FILE_NAME;
use hackreg_domain::registration::{Registration, RegistrationForm, RegistrationPatch};

use crate::error::RegistrationServiceError;
use crate::state::AppState;
use crate::usecase::registration::{
    CreateRegistrationUseCase, ExportSnapshotUseCase, ListRegistrationsUseCase,
    UpdateRegistrationUseCase,
};

/// Wire shape of a registration. Timestamps use millisecond RFC 3339.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: Uuid,
    pub team_name: String,
    pub head_name: String,
    pub head_email: String,
    pub head_reg_no: String,
    pub contact: String,
    pub alt_contact: Option<String>,
    pub member1_name: String,
    pub member1_reg: String,
    pub member2_name: String,
    pub member2_reg: String,
    pub team_number: String,
    pub round2: bool,
    pub certificate_sent: bool,
    #[serde(serialize_with = "hackreg_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Registration> for RegistrationResponse {
    fn from(r: Registration) -> Self {
        Self {
            id: r.id,
            team_name: r.team_name,
            head_name: r.head_name,
            head_email: r.head_email,
            head_reg_no: r.head_reg_no,
            contact: r.contact,
            alt_contact: r.alt_contact,
            member1_name: r.member1_name,
            member1_reg: r.member1_reg,
            member2_name: r.member2_name,
            member2_reg: r.member2_reg,
            team_number: r.team_number.to_string(),
            round2: r.round2,
            certificate_sent: r.certificate_sent,
            created_at: r.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct Round2Query {
    pub round2: Option<bool>,
}

// ── GET /registrations ───────────────────────────────────────────────────────

pub async fn list_registrations(
    State(state): State<AppState>,
    query: Result<Query<Round2Query>, QueryRejection>,
) -> Result<Json<Vec<RegistrationResponse>>, RegistrationServiceError> {
    let Query(query) = query?;
    let usecase = ListRegistrationsUseCase {
        repo: state.registration_repo(),
    };
    let registrations = usecase.execute(query.round2.unwrap_or(false)).await?;
    Ok(Json(
        registrations
            .into_iter()
            .map(RegistrationResponse::from)
            .collect(),
    ))
}

// ── POST /registrations ──────────────────────────────────────────────────────

pub async fn create_registration(
    State(state): State<AppState>,
    form: Result<Json<RegistrationForm>, JsonRejection>,
) -> Result<impl IntoResponse, RegistrationServiceError> {
    let Json(form) = form?;
    let usecase = CreateRegistrationUseCase {
        repo: state.registration_repo(),
        otp: state.otp_store(),
        policy: state.email_policy.clone(),
    };
    let registration = usecase.execute(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse::from(registration)),
    ))
}

// ── PATCH /registrations/{id} ────────────────────────────────────────────────

pub async fn update_registration(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    patch: Result<Json<RegistrationPatch>, JsonRejection>,
) -> Result<Json<RegistrationResponse>, RegistrationServiceError> {
    let Path(id) = id?;
    let Json(patch) = patch?;
    let usecase = UpdateRegistrationUseCase {
        repo: state.registration_repo(),
        policy: state.email_policy.clone(),
    };
    let registration = usecase.execute(id, patch).await?;
    Ok(Json(RegistrationResponse::from(registration)))
}

// ── GET /registrations/export ────────────────────────────────────────────────

pub async fn export_registrations(
    State(state): State<AppState>,
    query: Result<Query<Round2Query>, QueryRejection>,
) -> Result<impl IntoResponse, RegistrationServiceError> {
    let Query(query) = query?;
    let usecase = ExportSnapshotUseCase {
        repo: state.registration_repo(),
    };
    let csv = usecase.execute(query.round2.unwrap_or(false)).await?;
    let disposition = format!("attachment; filename=\"{EXPORT_FILE_NAME}\"");
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
