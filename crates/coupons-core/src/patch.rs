//! Presence-aware partial updates.
//!
//! A `PATCH` body must tell "field present with value V" apart from "field
//! absent". `Patch<T>` carries that distinction per field: combined with
//! `#[serde(default)]` a missing key deserializes to [`Patch::Absent`] and a
//! present key to [`Patch::Set`]. An explicit `null` is rejected, since none
//! of the patchable columns are nullable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A single field of a partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    /// The field was not part of the update.
    Absent,
    /// The field was explicitly set to this value.
    Set(T),
}

impl<T> Patch<T> {
    /// Returns `true` if the field was not part of the update.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Set)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(value) => value.serialize(serializer),
            Self::Absent => serializer.serialize_none(),
        }
    }
}
