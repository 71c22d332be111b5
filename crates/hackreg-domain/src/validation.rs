//! Field validation shared by the form workflow and the service.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registration::{RegistrationForm, RegistrationPatch};

/// Institutional domain every head email must belong to, unless configured otherwise.
pub const DEFAULT_EMAIL_SUFFIX: &str = "@vitapstudent.ac.in";

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Input fields of the registration form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    TeamName,
    HeadName,
    HeadEmail,
    Password,
    HeadRegNo,
    Contact,
    AltContact,
    Member1Name,
    Member1Reg,
    Member2Name,
    Member2Reg,
}

impl FormField {
    pub const ALL: [FormField; 11] = [
        Self::TeamName,
        Self::HeadName,
        Self::HeadEmail,
        Self::Password,
        Self::HeadRegNo,
        Self::Contact,
        Self::AltContact,
        Self::Member1Name,
        Self::Member1Reg,
        Self::Member2Name,
        Self::Member2Reg,
    ];

    /// Wire name of the field (camelCase).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TeamName => "teamName",
            Self::HeadName => "headName",
            Self::HeadEmail => "headEmail",
            Self::Password => "password",
            Self::HeadRegNo => "headRegNo",
            Self::Contact => "contact",
            Self::AltContact => "altContact",
            Self::Member1Name => "member1Name",
            Self::Member1Reg => "member1Reg",
            Self::Member2Name => "member2Name",
            Self::Member2Reg => "member2Reg",
        }
    }

    fn required_message(self) -> &'static str {
        match self {
            Self::TeamName => "Team name is required",
            Self::HeadName => "Head name required",
            Self::HeadRegNo => "Registration number required",
            Self::Contact => "Contact number required",
            Self::Member1Name => "Member 1 name required",
            Self::Member1Reg => "Member 1 reg no required",
            Self::Member2Name => "Member 2 name required",
            Self::Member2Reg => "Member 2 reg no required",
            Self::HeadEmail | Self::Password | Self::AltContact => "",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Required email domain suffix, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPolicy {
    suffix: String,
}

impl Default for EmailPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL_SUFFIX)
    }
}

impl EmailPolicy {
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.trim().to_ascii_lowercase(),
        }
    }

    /// `true` when the trimmed email has a local part and ends with the suffix.
    pub fn accepts(&self, email: &str) -> bool {
        let email = email.trim().to_ascii_lowercase();
        email.len() > self.suffix.len() && email.ends_with(&self.suffix)
    }

    pub fn rejection_message(&self) -> String {
        format!("Valid {} email required", self.suffix)
    }
}

/// Field-scoped validation failures, at most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: FormField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Check a single field value. Returns the user-facing message on failure.
pub fn check_field(field: FormField, value: &str, policy: &EmailPolicy) -> Option<String> {
    match field {
        FormField::AltContact => None,
        FormField::Password => (value.chars().count() < MIN_PASSWORD_LEN)
            .then(|| format!("Password must be at least {MIN_PASSWORD_LEN} characters")),
        FormField::HeadEmail => (!policy.accepts(value)).then(|| policy.rejection_message()),
        other => value
            .trim()
            .is_empty()
            .then(|| other.required_message().to_owned()),
    }
}

/// Validate a complete form.
///
/// `is_taken` reports whether a team name is already registered; the
/// interactive workflow passes its known records, the service checks its
/// store separately and passes `|_| false`.
pub fn validate_form(
    form: &RegistrationForm,
    policy: &EmailPolicy,
    is_taken: impl Fn(&str) -> bool,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    for field in FormField::ALL {
        if let Some(message) = check_field(field, form.get(field), policy) {
            errors.insert(field, message);
        }
    }
    if !errors.contains(FormField::TeamName) && is_taken(form.team_name.trim()) {
        errors.insert(FormField::TeamName, "Team name already taken");
    }
    errors.into_result()
}

/// Validate only the fields a patch supplies.
pub fn validate_patch(patch: &RegistrationPatch, policy: &EmailPolicy) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    for field in FormField::ALL {
        if let Some(value) = patch.get(field) {
            if let Some(message) = check_field(field, value, policy) {
                errors.insert(field, message);
            }
        }
    }
    errors.into_result()
}
