//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every persisted entity has a strongly-typed ID to prevent accidental
//! mixing of identifiers at compile time. All IDs use UUID v7
//! (time-ordered) so keyset pagination over them preserves insertion
//! order and indexes stay dense.
//!
//! The `new()` constructors exist for app-side generation (action
//! submission, seed data, tests); the database also accepts app-generated
//! v7 values directly.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a player character.
    CharacterId
}

define_id! {
    /// Unique identifier for a town.
    TownId
}

define_id! {
    /// Unique identifier for a kingdom (a set of towns under one ruler).
    KingdomId
}

define_id! {
    /// Unique identifier for a daily action row in the action ledger.
    ActionId
}

define_id! {
    /// Unique identifier for an owned building.
    BuildingId
}

define_id! {
    /// Unique identifier for an election (town or kingdom seat).
    ElectionId
}

define_id! {
    /// Unique identifier for a proposed or active law.
    LawId
}

define_id! {
    /// Unique identifier for an impeachment motion.
    ImpeachmentId
}

define_id! {
    /// Unique identifier for an inventory stack (item + quality + owner).
    StackId
}

define_id! {
    /// Unique identifier for a trade caravan.
    CaravanId
}

define_id! {
    /// Unique identifier for a loan between characters.
    LoanId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let character = CharacterId::new();
        let town = TownId::new();
        // These are different types -- the compiler enforces no mixing.
        assert_ne!(character.into_inner(), Uuid::nil());
        assert_ne!(town.into_inner(), Uuid::nil());
    }

    #[test]
    fn id_roundtrip_serde() {
        let original = CharacterId::new();
        let json = serde_json::to_string(&original).ok();
        assert!(json.is_some());
        let restored: Result<CharacterId, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert!(restored.is_ok());
    }

    #[test]
    fn id_display_matches_uuid() {
        let id = BuildingId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
