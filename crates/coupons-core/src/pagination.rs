//! Offset/limit pagination.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Largest page size the boundary accepts.
pub const MAX_PAGE_LIMIT: u32 = 50;

/// A bounded page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of rows to skip.
    #[serde(default)]
    pub offset: u32,
    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl PageRequest {
    /// Build a page request, rejecting limits above [`MAX_PAGE_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns `FieldError::LimitTooLarge` if `limit` exceeds the cap.
    pub fn new(offset: u32, limit: u32) -> Result<Self, FieldError> {
        Self { offset, limit }.checked()
    }

    /// Validate an already-deserialized request.
    ///
    /// # Errors
    ///
    /// Returns `FieldError::LimitTooLarge` if `limit` exceeds the cap.
    pub fn checked(self) -> Result<Self, FieldError> {
        if self.limit > MAX_PAGE_LIMIT {
            return Err(FieldError::LimitTooLarge {
                limit: self.limit,
                max: MAX_PAGE_LIMIT,
            });
        }
        Ok(self)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}
