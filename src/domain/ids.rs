//! Type-safe identifiers.
//!
//! Each identifier is a newtype wrapper around [`uuid::Uuid`] (v4) so that
//! record, user and holiday ids cannot be confused with one another.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random id (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Creates an id from an existing [`uuid::Uuid`].
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner [`uuid::Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a PTO or calendar record.
    ///
    /// Assigned by [`super::EventStore`] on insertion and immutable
    /// thereafter.
    RecordId
);

uuid_id!(
    /// Unique identifier for a team member.
    UserId
);

uuid_id!(
    /// Unique identifier for a holiday entry.
    HolidayId
);

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        assert_ne!(RecordId::new(), RecordId::new());
        assert_ne!(UserId::default(), UserId::default());
    }

    #[test]
    fn display_is_uuid_format() {
        let s = format!("{}", UserId::new());
        assert_eq!(s.len(), 36);
        assert!(s.contains('-'));
    }

    #[test]
    fn parses_from_form_string() {
        let id = UserId::new();
        let parsed: Result<UserId, _> = format!(" {id} ").parse();
        let Ok(parsed) = parsed else {
            panic!("expected id to parse");
        };
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<UserId>().is_err());
    }

    #[test]
    fn serde_is_transparent() {
        let uuid = uuid::Uuid::new_v4();
        let id = RecordId::from_uuid(uuid);
        let Ok(json) = serde_json::to_string(&id) else {
            panic!("serialization failed");
        };
        assert_eq!(json, format!("\"{uuid}\""));
        assert_eq!(uuid::Uuid::from(id), uuid);
    }

    #[test]
    fn ids_order_by_uuid() {
        let a = HolidayId::from_uuid(uuid::Uuid::nil());
        let b = HolidayId::from_uuid(uuid::Uuid::from_u128(u128::MAX));
        assert!(a < b);
        assert_eq!(*a.as_uuid(), uuid::Uuid::nil());
    }
}
