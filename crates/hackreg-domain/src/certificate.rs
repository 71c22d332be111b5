//! Participation certificate mail, composed for the admin's mail client.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::registration::Registration;

/// Signature line of certificate mails.
pub const CERTIFICATE_SIGNATURE: &str = "- Android Club VITAP";

/// Characters left unescaped in mailto components (RFC 3986 unreserved + `!*'()`).
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl CertificateMail {
    pub fn for_registration(registration: &Registration) -> Self {
        Self {
            to: registration.head_email.clone(),
            subject: format!("Certificate of Participation - {}", registration.team_name),
            body: format!(
                "Hello {},\n\nCongratulations! Please find your participation certificate attached.\n\n{}",
                registration.head_name, CERTIFICATE_SIGNATURE
            ),
        }
    }

    /// `mailto:` link that opens a pre-filled draft.
    pub fn mailto_url(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.to,
            utf8_percent_encode(&self.subject, COMPONENT),
            utf8_percent_encode(&self.body, COMPONENT),
        )
    }
}
