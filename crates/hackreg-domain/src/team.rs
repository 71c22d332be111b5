//! Team identity: generated team numbers and the case-insensitive name key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Literal prefix of every team number.
pub const TEAM_NUMBER_PREFIX: &str = "TEAM";

/// Number of decimal digits following the prefix.
pub const TEAM_NUMBER_DIGITS: usize = 5;

/// Smallest numeric suffix handed out by the allocator.
pub const TEAM_NUMBER_MIN: u32 = 10_000;

/// Largest numeric suffix handed out by the allocator.
pub const TEAM_NUMBER_MAX: u32 = 99_999;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid team number: {0:?}")]
pub struct InvalidTeamNumber(pub String);

/// System-generated team identifier, `TEAM` followed by five digits.
///
/// Wire format: plain string (e.g. `"TEAM40217"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamNumber(String);

impl TeamNumber {
    /// Build a team number from the allocator's numeric range.
    /// Returns `None` outside `TEAM_NUMBER_MIN..=TEAM_NUMBER_MAX`.
    pub fn from_suffix(suffix: u32) -> Option<Self> {
        (TEAM_NUMBER_MIN..=TEAM_NUMBER_MAX)
            .contains(&suffix)
            .then(|| Self(format!("{TEAM_NUMBER_PREFIX}{suffix}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TeamNumber {
    type Err = InvalidTeamNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(TEAM_NUMBER_PREFIX)
            .ok_or_else(|| InvalidTeamNumber(s.to_owned()))?;
        if digits.len() != TEAM_NUMBER_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidTeamNumber(s.to_owned()));
        }
        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for TeamNumber {
    type Error = InvalidTeamNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TeamNumber> for String {
    fn from(number: TeamNumber) -> Self {
        number.0
    }
}

/// Uniqueness key for a team name: trimmed and lowercased.
///
/// Two names collide exactly when their keys are equal.
pub fn team_name_key(name: &str) -> String {
    name.trim().to_lowercase()
}
