//! Registration records, the submission form and partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::team::TeamNumber;
use crate::validation::FormField;

/// One team's persisted registration as exposed over the API.
///
/// The stored password never appears here; it only travels inbound on
/// [`RegistrationForm`] and [`RegistrationPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub team_name: String,
    pub head_name: String,
    pub head_email: String,
    pub head_reg_no: String,
    pub contact: String,
    #[serde(default)]
    pub alt_contact: Option<String>,
    pub member1_name: String,
    pub member1_reg: String,
    pub member2_name: String,
    pub member2_reg: String,
    pub team_number: TeamNumber,
    #[serde(default)]
    pub round2: bool,
    #[serde(default)]
    pub certificate_sent: bool,
    pub created_at: DateTime<Utc>,
}

/// Team data entered by a participant. Missing JSON keys deserialize as empty
/// strings so they surface as field validation errors, not parse failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub team_name: String,
    pub head_name: String,
    pub head_email: String,
    pub password: String,
    pub head_reg_no: String,
    pub contact: String,
    pub alt_contact: String,
    pub member1_name: String,
    pub member1_reg: String,
    pub member2_name: String,
    pub member2_reg: String,
}

impl RegistrationForm {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::TeamName => &self.team_name,
            FormField::HeadName => &self.head_name,
            FormField::HeadEmail => &self.head_email,
            FormField::Password => &self.password,
            FormField::HeadRegNo => &self.head_reg_no,
            FormField::Contact => &self.contact,
            FormField::AltContact => &self.alt_contact,
            FormField::Member1Name => &self.member1_name,
            FormField::Member1Reg => &self.member1_reg,
            FormField::Member2Name => &self.member2_name,
            FormField::Member2Reg => &self.member2_reg,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::TeamName => &mut self.team_name,
            FormField::HeadName => &mut self.head_name,
            FormField::HeadEmail => &mut self.head_email,
            FormField::Password => &mut self.password,
            FormField::HeadRegNo => &mut self.head_reg_no,
            FormField::Contact => &mut self.contact,
            FormField::AltContact => &mut self.alt_contact,
            FormField::Member1Name => &mut self.member1_name,
            FormField::Member1Reg => &mut self.member1_reg,
            FormField::Member2Name => &mut self.member2_name,
            FormField::Member2Reg => &mut self.member2_reg,
        };
        *slot = value.into();
    }

    /// Copy with every text field trimmed. The password is kept verbatim.
    pub fn normalized(&self) -> Self {
        let mut out = Self::default();
        for field in FormField::ALL {
            let value = self.get(field);
            if field == FormField::Password {
                out.set(field, value);
            } else {
                out.set(field, value.trim());
            }
        }
        out
    }

    /// The optional alternate contact, `None` when left blank.
    pub fn alt_contact(&self) -> Option<&str> {
        let v = self.alt_contact.trim();
        (!v.is_empty()).then_some(v)
    }
}

/// Partial update of an existing registration.
///
/// Admin review only sends `round2` and `certificateSent`; the other fields
/// exist for corrections and go through the same validation as a new form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_reg_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// `Some("")` clears the alternate contact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member1_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member1_reg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member2_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member2_reg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round2: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_sent: Option<bool>,
}

impl RegistrationPatch {
    pub fn round2(value: bool) -> Self {
        Self {
            round2: Some(value),
            ..Default::default()
        }
    }

    pub fn certificate_sent(value: bool) -> Self {
        Self {
            certificate_sent: Some(value),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Text value supplied for a form field, if any.
    pub fn get(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::TeamName => &self.team_name,
            FormField::HeadName => &self.head_name,
            FormField::HeadEmail => &self.head_email,
            FormField::Password => &self.password,
            FormField::HeadRegNo => &self.head_reg_no,
            FormField::Contact => &self.contact,
            FormField::AltContact => &self.alt_contact,
            FormField::Member1Name => &self.member1_name,
            FormField::Member1Reg => &self.member1_reg,
            FormField::Member2Name => &self.member2_name,
            FormField::Member2Reg => &self.member2_reg,
        };
        value.as_deref()
    }

    /// Copy with supplied text fields trimmed (password untouched).
    pub fn normalized(&self) -> Self {
        let trim = |v: &Option<String>| v.as_ref().map(|s| s.trim().to_owned());
        Self {
            team_name: trim(&self.team_name),
            head_name: trim(&self.head_name),
            head_email: trim(&self.head_email),
            password: self.password.clone(),
            head_reg_no: trim(&self.head_reg_no),
            contact: trim(&self.contact),
            alt_contact: trim(&self.alt_contact),
            member1_name: trim(&self.member1_name),
            member1_reg: trim(&self.member1_reg),
            member2_name: trim(&self.member2_name),
            member2_reg: trim(&self.member2_reg),
            round2: self.round2,
            certificate_sent: self.certificate_sent,
        }
    }
}
