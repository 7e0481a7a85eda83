//! Typed identifier newtypes backed by database-generated integers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw key as returned by the database.
            #[must_use]
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// Access the inner integer.
            #[must_use]
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            /// Parse a path segment. Anything that is not an integer is a
            /// client error rather than a missing record.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<i64>()
                    .map(Self)
                    .map_err(|_| ValidationError::InvalidPathId)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Map`](crate::map::Map).
    MapId
);

define_id!(
    /// Unique identifier for a [`Marker`](crate::marker::Marker).
    MarkerId
);

define_id!(
    /// Unique identifier for a [`Multimedia`](crate::multimedia::Multimedia) entry.
    MultimediaId
);

define_id!(
    /// Identifier of the user owning a map. Users live outside this service.
    UserId
);
