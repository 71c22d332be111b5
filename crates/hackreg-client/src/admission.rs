//! Participant-side admission: form entry, email verification, submission.

use hackreg_domain::registration::{Registration, RegistrationForm};
use hackreg_domain::team::team_name_key;
use hackreg_domain::validation::{EmailPolicy, FieldErrors, FormField, check_field, validate_form};

use crate::api::{ApiError, RegistrationApi, ServerErrorKind};

/// Where a session stands. `Editing` is initial; `Confirmed` ends a
/// registration, and editing the form afterwards starts the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionState {
    Editing,
    OtpRequested,
    OtpVerified,
    Submitting,
    Confirmed,
}

#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("form has invalid fields: {0}")]
    Validation(FieldErrors),
    #[error("please verify your email first")]
    EmailNotVerified,
    #[error(transparent)]
    Api(#[from] ApiError),
}

fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// One participant's registration session.
///
/// Local records only ever change to what the server confirmed.
pub struct AdmissionSession<A: RegistrationApi> {
    api: A,
    policy: EmailPolicy,
    form: RegistrationForm,
    otp_input: String,
    state: AdmissionState,
    otp_email: Option<String>,
    verified_email: Option<String>,
    field_errors: FieldErrors,
    records: Vec<Registration>,
    recent: Option<Registration>,
}

impl<A: RegistrationApi> AdmissionSession<A> {
    pub fn new(api: A, policy: EmailPolicy) -> Self {
        Self {
            api,
            policy,
            form: RegistrationForm::default(),
            otp_input: String::new(),
            state: AdmissionState::Editing,
            otp_email: None,
            verified_email: None,
            field_errors: FieldErrors::default(),
            records: Vec::new(),
            recent: None,
        }
    }

    pub fn state(&self) -> AdmissionState {
        self.state
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    /// Registrations known to this session, newest first.
    pub fn records(&self) -> &[Registration] {
        &self.records
    }

    /// The registration this session confirmed last.
    pub fn recent(&self) -> Option<&Registration> {
        self.recent.as_ref()
    }

    pub fn success_message(&self) -> Option<String> {
        self.recent
            .as_ref()
            .map(|r| format!("Registration successful! Your Team Number: {}", r.team_number))
    }

    /// `true` when the entered head email is the one verified in this session.
    pub fn is_email_verified(&self) -> bool {
        self.verified_email.as_deref() == Some(email_key(&self.form.head_email).as_str())
    }

    /// Load the current registrations, used for the team-name check.
    pub async fn refresh(&mut self) -> Result<(), AdmissionError> {
        self.records = self.api.list(false).await?;
        Ok(())
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
        self.field_errors.remove(field);

        if self.state == AdmissionState::Confirmed {
            self.state = AdmissionState::Editing;
        }
        if field == FormField::HeadEmail {
            let key = email_key(&self.form.head_email);
            let still_pending = self.otp_email.as_deref() == Some(key.as_str());
            let verified = self.is_email_verified();
            self.state = match self.state {
                AdmissionState::OtpRequested if still_pending => AdmissionState::OtpRequested,
                AdmissionState::Editing | AdmissionState::OtpRequested if verified => {
                    AdmissionState::OtpVerified
                }
                AdmissionState::OtpVerified | AdmissionState::OtpRequested if !verified => {
                    AdmissionState::Editing
                }
                other => other,
            };
        }
    }

    pub fn set_otp_input(&mut self, value: impl Into<String>) {
        self.otp_input = value.into();
    }

    /// Ask the server to mail a code to the entered head email.
    pub async fn request_otp(&mut self) -> Result<String, AdmissionError> {
        let email = self.form.head_email.trim().to_owned();
        if let Some(message) = check_field(FormField::HeadEmail, &email, &self.policy) {
            let mut errors = FieldErrors::default();
            errors.insert(FormField::HeadEmail, message.clone());
            self.field_errors.insert(FormField::HeadEmail, message);
            return Err(AdmissionError::Validation(errors));
        }

        let message = self.api.send_otp(&email).await?;
        self.otp_email = Some(email_key(&email));
        self.otp_input.clear();
        self.state = AdmissionState::OtpRequested;
        tracing::debug!(email = %email, "otp requested");
        Ok(message)
    }

    /// Submit the entered code for the email it was requested for.
    ///
    /// A wrong code keeps the session in `OtpRequested`; an expired or
    /// unknown code sends it back to `Editing`.
    pub async fn verify_otp(&mut self) -> Result<String, AdmissionError> {
        let email = self
            .otp_email
            .clone()
            .unwrap_or_else(|| email_key(&self.form.head_email));
        match self.api.verify_otp(&email, self.otp_input.trim()).await {
            Ok(message) => {
                self.verified_email = Some(email);
                self.otp_email = None;
                self.state = if self.is_email_verified() {
                    AdmissionState::OtpVerified
                } else {
                    AdmissionState::Editing
                };
                Ok(message)
            }
            Err(e) => {
                match e.kind() {
                    Some(ServerErrorKind::OtpMismatch) => {}
                    Some(ServerErrorKind::OtpExpired | ServerErrorKind::OtpNotRequested) => {
                        self.otp_email = None;
                        self.state = AdmissionState::Editing;
                    }
                    _ => {}
                }
                Err(e.into())
            }
        }
    }

    /// Validate, check the verification gate and create the registration.
    ///
    /// On success the confirmed record is merged into the local list, the
    /// form is cleared and verification has to be repeated for the next team.
    pub async fn submit(&mut self) -> Result<Registration, AdmissionError> {
        let records = &self.records;
        let checked = validate_form(&self.form, &self.policy, |name| {
            let key = team_name_key(name);
            records.iter().any(|r| team_name_key(&r.team_name) == key)
        });
        if let Err(errors) = checked {
            self.field_errors = errors.clone();
            self.state = AdmissionState::Editing;
            return Err(AdmissionError::Validation(errors));
        }
        if !self.is_email_verified() {
            self.state = AdmissionState::Editing;
            return Err(AdmissionError::EmailNotVerified);
        }

        self.state = AdmissionState::Submitting;
        match self.api.create(&self.form).await {
            Ok(registration) => {
                self.records.retain(|r| r.id != registration.id);
                self.records.insert(0, registration.clone());
                self.recent = Some(registration.clone());
                self.form = RegistrationForm::default();
                self.otp_input.clear();
                self.otp_email = None;
                self.verified_email = None;
                self.field_errors = FieldErrors::default();
                self.state = AdmissionState::Confirmed;
                tracing::info!(team_number = %registration.team_number, "registration confirmed");
                Ok(registration)
            }
            Err(e) => {
                self.state = AdmissionState::Editing;
                match &e {
                    ApiError::Rejected {
                        kind: ServerErrorKind::DuplicateTeamName,
                        ..
                    } => {
                        self.field_errors
                            .insert(FormField::TeamName, "Team name already taken");
                    }
                    ApiError::Rejected {
                        kind: ServerErrorKind::Validation,
                        fields,
                        ..
                    } => {
                        self.field_errors = fields.clone();
                    }
                    ApiError::Rejected {
                        kind: ServerErrorKind::EmailNotVerified,
                        ..
                    } => {
                        self.verified_email = None;
                    }
                    _ => {}
                }
                Err(e.into())
            }
        }
    }
}
