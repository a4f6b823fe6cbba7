//! Rating code domain model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Canonical content-rating label (e.g. `R15`, `R18`, `R18G`).
///
/// Always stored uppercase. Codes are ASCII alphanumeric so they can be
/// embedded in marker tokens without escaping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RatingCode(pub(crate) String);

impl RatingCode {
    pub fn new(code: &str) -> Result<Self> {
        let code = code.trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidRatingCode(code.to_string()));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form used inside marker tokens and preference keys
    pub fn marker_name(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl fmt::Display for RatingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RatingCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for RatingCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<RatingCode> for String {
    fn from(code: RatingCode) -> Self {
        code.0
    }
}
