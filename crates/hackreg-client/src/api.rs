#![allow(async_fn_in_trait)]

use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use hackreg_domain::registration::{Registration, RegistrationForm, RegistrationPatch};
use hackreg_domain::validation::FieldErrors;

/// Error kinds reported by the registrations service in `{"kind": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerErrorKind {
    Validation,
    InvalidEmail,
    DuplicateTeamName,
    MissingData,
    MalformedRequest,
    OtpNotRequested,
    OtpMismatch,
    OtpExpired,
    EmailNotVerified,
    RegistrationNotFound,
    DeliveryFailed,
    TeamNumbersExhausted,
    Internal,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with an error body.
    #[error("request rejected ({status}): {message}")]
    Rejected {
        status: u16,
        kind: ServerErrorKind,
        message: String,
        fields: FieldErrors,
    },
    /// No usable answer: network failure or an unreadable response.
    #[error("registration server unreachable: {0}")]
    Connectivity(String),
}

impl ApiError {
    pub fn rejected(status: u16, kind: ServerErrorKind, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            kind,
            message: message.into(),
            fields: FieldErrors::default(),
        }
    }

    pub fn kind(&self) -> Option<ServerErrorKind> {
        match self {
            Self::Rejected { kind, .. } => Some(*kind),
            Self::Connectivity(_) => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Connectivity(e.to_string())
    }
}

/// Operations of the registrations REST API.
pub trait RegistrationApi: Send + Sync {
    /// Registrations newest first, optionally only those in Round 2.
    async fn list(&self, only_round2: bool) -> Result<Vec<Registration>, ApiError>;

    /// Returns the server's confirmation message.
    async fn send_otp(&self, email: &str) -> Result<String, ApiError>;

    /// Returns the server's confirmation message.
    async fn verify_otp(&self, email: &str, otp: &str) -> Result<String, ApiError>;

    async fn create(&self, form: &RegistrationForm) -> Result<Registration, ApiError>;

    async fn update(&self, id: Uuid, patch: &RegistrationPatch) -> Result<Registration, ApiError>;

    /// CSV snapshot rendered by the server.
    async fn export(&self, only_round2: bool) -> Result<String, ApiError>;
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    kind: ServerErrorKind,
    message: String,
    #[serde(default)]
    fields: FieldErrors,
}

/// [`RegistrationApi`] over HTTP.
#[derive(Clone)]
pub struct HttpRegistrationApi {
    client: Client,
    base_url: String,
}

impl HttpRegistrationApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str, only_round2: bool) -> String {
        if only_round2 {
            format!("{}{path}?round2=true", self.base_url)
        } else {
            format!("{}{path}", self.base_url)
        }
    }
}

async fn rejection(status: StatusCode, resp: Response) -> ApiError {
    let text = resp.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => ApiError::Rejected {
            status: status.as_u16(),
            kind: body.kind,
            message: body.message,
            fields: body.fields,
        },
        Err(_) => ApiError::rejected(status.as_u16(), ServerErrorKind::Unknown, text),
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(rejection(status, resp).await);
    }
    Ok(resp.json().await?)
}

impl RegistrationApi for HttpRegistrationApi {
    async fn list(&self, only_round2: bool) -> Result<Vec<Registration>, ApiError> {
        let resp = self
            .client
            .get(self.url("/registrations", only_round2))
            .send()
            .await?;
        decode(resp).await
    }

    async fn send_otp(&self, email: &str) -> Result<String, ApiError> {
        let resp = self
            .client
            .post(self.url("/send-otp", false))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        Ok(decode::<MessageBody>(resp).await?.message)
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<String, ApiError> {
        let resp = self
            .client
            .post(self.url("/verify-otp", false))
            .json(&serde_json::json!({ "email": email, "otp": otp }))
            .send()
            .await?;
        Ok(decode::<MessageBody>(resp).await?.message)
    }

    async fn create(&self, form: &RegistrationForm) -> Result<Registration, ApiError> {
        let resp = self
            .client
            .post(self.url("/registrations", false))
            .json(form)
            .send()
            .await?;
        decode(resp).await
    }

    async fn update(&self, id: Uuid, patch: &RegistrationPatch) -> Result<Registration, ApiError> {
        let resp = self
            .client
            .patch(self.url(&format!("/registrations/{id}"), false))
            .json(patch)
            .send()
            .await?;
        decode(resp).await
    }

    async fn export(&self, only_round2: bool) -> Result<String, ApiError> {
        let resp = self
            .client
            .get(self.url("/registrations/export", only_round2))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(rejection(status, resp).await);
        }
        Ok(resp.text().await?)
    }
}
