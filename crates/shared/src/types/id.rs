//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing an `EntityId` where a `ClientId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(ClientId, "Unique identifier for a client (tenant).");
typed_id!(EntityId, "Unique identifier for a legal entity within a client.");
typed_id!(AccountId, "Unique identifier for a chart of accounts entry.");
typed_id!(JournalEntryId, "Unique identifier for a journal entry.");
typed_id!(DimensionId, "Unique identifier for a dimension.");
typed_id!(DimensionValueId, "Unique identifier for a dimension value.");
typed_id!(AttachmentId, "Unique identifier for an attachment.");
typed_id!(
    ConsolidationGroupId,
    "Unique identifier for a consolidation group."
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_typed_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = AccountId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
        assert_eq!(Uuid::from(id), uuid);
    }

    #[test]
    fn test_typed_id_display_roundtrip() {
        let id = JournalEntryId::new();
        let parsed = JournalEntryId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_typed_id_from_str_error() {
        assert!(ClientId::from_str("not-a-uuid").is_err());
    }
}
