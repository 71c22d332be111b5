//! Domain types shared by the registration service, its client and the admin tool.
//!
//! This crate contains only pure types with no framework dependencies.
//! The validation ruleset lives here so the interactive form and the
//! authoritative store boundary apply exactly the same rules.

pub mod certificate;
pub mod export;
pub mod registration;
pub mod team;
pub mod validation;
