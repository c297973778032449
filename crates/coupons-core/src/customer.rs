//! Customer types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FieldError;
use crate::ids::CustomerId;
use crate::patch::Patch;

const USERNAME_MIN_LEN: usize = 5;
const USERNAME_MAX_LEN: usize = 23;

/// A customer login name.
///
/// 5 to 23 characters of `a-z`, `0-9`, `-`, `_` and `.`; the first and last
/// character must be a lowercase letter or a digit.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and wrap a username.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::InvalidUsername` if the input does not match the pattern.
    pub fn parse(username: impl Into<String>) -> Result<Self, FieldError> {
        let username = username.into();
        if is_valid_username(username.as_bytes()) {
            Ok(Self(username))
        } else {
            Err(FieldError::InvalidUsername(username))
        }
    }

    /// Borrow the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_username(bytes: &[u8]) -> bool {
    let edge = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    let inner = |b: u8| edge(b) || matches!(b, b'-' | b'_' | b'.');

    match bytes {
        [first, middle @ .., last]
            if (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&bytes.len()) =>
        {
            edge(*first) && edge(*last) && middle.iter().all(|b| inner(*b))
        }
        _ => false,
    }
}

impl TryFrom<String> for Username {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Username> for String {
    fn from(username: Username) -> Self {
        username.0
    }
}

impl fmt::Debug for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Username({})", self.0)
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Store-assigned surrogate key.
    pub id: CustomerId,
    /// Unique login name.
    pub username: Username,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    /// Unique login name.
    pub username: Username,
    /// Display name.
    pub name: String,
}

/// Partial update of a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
}
