//! Vehicle identifiers.
//!
//! A vehicle is nothing more than a name; each one owns a separate record
//! store. Because backends derive file names from it, the name is restricted
//! to a conservative character set.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_LEN: usize = 64;

/// A validated vehicle name.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct VehicleName(String);

impl VehicleName {
  /// Validate and wrap `raw`. Surrounding whitespace is trimmed.
  pub fn parse(raw: &str) -> Result<Self, ValidationError> {
    let name = raw.trim();
    let reject = |reason| ValidationError::InvalidVehicleName {
      name: name.to_owned(),
      reason,
    };

    if name.is_empty() {
      return Err(reject("must not be empty"));
    }
    if name.len() > MAX_LEN {
      return Err(reject("must be at most 64 characters"));
    }
    if name.starts_with('.') {
      return Err(reject("must not start with '.'"));
    }
    if !name
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
      return Err(reject("only ASCII letters, digits, '-', '_' and '.' are allowed"));
    }

    Ok(Self(name.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for VehicleName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl FromStr for VehicleName {
  type Err = ValidationError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Self::parse(s) }
}

impl TryFrom<String> for VehicleName {
  type Error = ValidationError;

  fn try_from(value: String) -> Result<Self, Self::Error> { Self::parse(&value) }
}

impl From<VehicleName> for String {
  fn from(value: VehicleName) -> Self { value.0 }
}

impl AsRef<str> for VehicleName {
  fn as_ref(&self) -> &str { &self.0 }
}
