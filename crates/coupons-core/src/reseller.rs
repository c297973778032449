//! Reseller types. Resellers form a standalone catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ResellerId;
use crate::patch::Patch;

/// A persisted reseller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reseller {
    /// Store-assigned surrogate key.
    pub id: ResellerId,
    /// Display name.
    pub name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a reseller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReseller {
    /// Display name.
    pub name: String,
}

/// Partial update of a reseller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResellerPatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,
}
