//! Typed ID wrapper for type safety across imagestore.
//!
//! This module provides a newtype wrapper around UUIDs so that image record
//! identifiers cannot be confused with arbitrary strings or other UUIDs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an image record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(Uuid);

impl ImageId {
    /// Generate a new random image ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ImageId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<ImageId> for Uuid {
    fn from(id: ImageId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_unique() {
        let a = ImageId::new();
        let b = ImageId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_display_round_trip() {
        let id = ImageId::new();
        let parsed: Uuid = id.to_string().parse().unwrap();
        assert_eq!(ImageId::from(parsed), id);
    }

    #[test]
    fn test_serde_transparent() {
        let id = ImageId::from(Uuid::nil());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");
    }
}
