use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::error::RegistrationServiceError;
use crate::state::AppState;
use crate::usecase::otp::{RequestOtpInput, RequestOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ── POST /send-otp ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    body: Result<Json<SendOtpRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, RegistrationServiceError> {
    let Json(body) = body?;
    let usecase = RequestOtpUseCase {
        store: state.otp_store(),
        mailer: state.mailer(),
        policy: state.email_policy.clone(),
    };
    let email = body.email.trim().to_owned();
    usecase
        .execute(RequestOtpInput {
            email: email.clone(),
        })
        .await?;
    Ok(Json(MessageResponse {
        message: format!("OTP sent to {email}"),
    }))
}

// ── POST /verify-otp ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    body: Result<Json<VerifyOtpRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, RegistrationServiceError> {
    let Json(body) = body?;
    let usecase = VerifyOtpUseCase {
        store: state.otp_store(),
    };
    usecase
        .execute(VerifyOtpInput {
            email: body.email,
            otp: body.otp,
        })
        .await?;
    Ok(Json(MessageResponse {
        message: "Email verified successfully".to_owned(),
    }))
}
