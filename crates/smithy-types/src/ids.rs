//! Type-safe identifier wrappers.
//!
//! Catalog identifiers ([`ItemId`], [`BlockId`]) are dense indices assigned by
//! the catalog when it is built. They are cheap to copy, totally ordered, and
//! stable for the lifetime of one catalog. The display name of an item is a
//! derived label and is never used as a key inside the core.
//!
//! Mission runs are identified by a [`MissionId`] wrapping a UUID v7, so
//! reports sort by creation time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around a `u32` catalog index.
macro_rules! define_catalog_id {
    (
        $(#[$meta:meta])*
        $name:ident, $prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Return the raw catalog index.
            pub const fn into_inner(self) -> u32 {
                self.0
            }

            /// Return the index as a `usize` for slice lookups.
            ///
            /// Returns `None` only on targets where `usize` is narrower than
            /// `u32`.
            pub fn as_index(self) -> Option<usize> {
                usize::try_from(self.0).ok()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

define_catalog_id! {
    /// Identifier of a holdable / craftable item type in the catalog.
    ItemId, "item"
}

define_catalog_id! {
    /// Identifier of a block type that can exist in the world.
    BlockId, "block"
}

/// Unique identifier for a single mission run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MissionId(pub Uuid);

impl MissionId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for MissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for MissionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_order_by_index() {
        assert!(ItemId(1) < ItemId(2));
        assert_eq!(BlockId::from(7), BlockId(7));
        assert_eq!(ItemId(3).as_index(), Some(3));
    }

    #[test]
    fn catalog_id_display_is_prefixed() {
        assert_eq!(ItemId(4).to_string(), "item#4");
        assert_eq!(BlockId(0).to_string(), "block#0");
    }

    #[test]
    fn mission_ids_are_unique() {
        let first = MissionId::new();
        let second = MissionId::new();
        assert_ne!(first, second);
    }

    #[test]
    fn mission_id_display_matches_uuid() {
        let id = MissionId::new();
        assert_eq!(id.to_string(), id.into_inner().to_string());
    }
}
