use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use hackreg_domain::validation::FieldErrors;

/// Registration service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationServiceError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("a valid institutional email is required")]
    InvalidEmail,
    #[error("team name already taken")]
    DuplicateTeamName,
    #[error("missing data")]
    MissingData,
    #[error("malformed request: {0}")]
    MalformedRequest(String),
    #[error("no OTP was requested for this email")]
    OtpNotRequested,
    #[error("invalid OTP")]
    OtpMismatch,
    #[error("OTP expired, request a new one")]
    OtpExpired,
    #[error("please verify your email first")]
    EmailNotVerified,
    #[error("registration not found")]
    RegistrationNotFound,
    #[error("could not deliver email")]
    DeliveryFailed,
    #[error("no team numbers available")]
    TeamNumbersExhausted,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RegistrationServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::DuplicateTeamName => "DUPLICATE_TEAM_NAME",
            Self::MissingData => "MISSING_DATA",
            Self::MalformedRequest(_) => "MALFORMED_REQUEST",
            Self::OtpNotRequested => "OTP_NOT_REQUESTED",
            Self::OtpMismatch => "OTP_MISMATCH",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            Self::RegistrationNotFound => "REGISTRATION_NOT_FOUND",
            Self::DeliveryFailed => "DELIVERY_FAILED",
            Self::TeamNumbersExhausted => "TEAM_NUMBERS_EXHAUSTED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<JsonRejection> for RegistrationServiceError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for RegistrationServiceError {
    fn from(rejection: PathRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for RegistrationServiceError {
    fn from(rejection: QueryRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

impl IntoResponse for RegistrationServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_)
            | Self::InvalidEmail
            | Self::DuplicateTeamName
            | Self::MissingData
            | Self::MalformedRequest(_)
            | Self::OtpNotRequested
            | Self::OtpMismatch
            | Self::OtpExpired => StatusCode::BAD_REQUEST,
            Self::EmailNotVerified => StatusCode::FORBIDDEN,
            Self::RegistrationNotFound => StatusCode::NOT_FOUND,
            Self::DeliveryFailed => StatusCode::BAD_GATEWAY,
            Self::TeamNumbersExhausted => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors and already visible in the TraceLayer span.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(ref fields) = self {
            body["fields"] = serde_json::json!(fields);
        }
        (status, axum::Json(body)).into_response()
    }
}
