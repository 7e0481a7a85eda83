//! Map — a named itinerary that groups markers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TripMapError, ValidationError};
use crate::id::{MapId, UserId};
use crate::input::{self, NumberInput};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 255;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Who can see a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Private,
}

impl Privacy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Privacy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "private" => Ok(Self::Private),
            _ => Err(ValidationError::InvalidPrivacy),
        }
    }
}

/// A stored map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    #[serde(rename = "idMap")]
    pub id: MapId,
    pub name: String,
    pub description: Option<String>,
    pub privacy: Privacy,
    #[serde(rename = "idUser")]
    pub user_id: UserId,
}

/// Validated map fields, used for both creation and full replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDraft {
    pub name: String,
    pub description: Option<String>,
    pub privacy: Privacy,
    pub user_id: UserId,
}

impl MapDraft {
    /// Create a builder fed with raw client input.
    #[must_use]
    pub fn builder() -> MapDraftBuilder {
        MapDraftBuilder::default()
    }

    /// Attach the storage-assigned id.
    #[must_use]
    pub fn into_map(self, id: MapId) -> Map {
        Map {
            id,
            name: self.name,
            description: self.description,
            privacy: self.privacy,
            user_id: self.user_id,
        }
    }
}

/// Collects raw client fields and validates them into a [`MapDraft`].
#[derive(Debug, Default)]
pub struct MapDraftBuilder {
    name: Option<String>,
    description: Option<String>,
    privacy: Option<String>,
    user_id: Option<NumberInput>,
}

impl MapDraftBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    #[must_use]
    pub fn privacy(mut self, privacy: impl Into<String>) -> Self {
        self.privacy = Some(privacy.into());
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<NumberInput>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Feed optional raw fields in one go, as decoded from a request body.
    #[must_use]
    pub fn raw(
        mut self,
        name: Option<String>,
        description: Option<String>,
        privacy: Option<String>,
        user_id: Option<NumberInput>,
    ) -> Self {
        self.name = name;
        self.description = description;
        self.privacy = privacy;
        self.user_id = user_id;
        self
    }

    /// Consume the builder, validate, and return a [`MapDraft`].
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::Validation`] when a required field is missing,
    /// the name or description length is out of bounds, the privacy value is
    /// unknown, or the user id is not a positive integer.
    pub fn build(self) -> Result<MapDraft, TripMapError> {
        let name = self.name.filter(|s| !s.is_empty());
        let privacy = self.privacy.filter(|s| !s.is_empty());
        let user_id = input::present(self.user_id);

        let (Some(name), Some(privacy), Some(user_id)) = (name, privacy, user_id) else {
            return Err(ValidationError::MissingFields("name, privacy, idUser").into());
        };

        let name_len = name.chars().count();
        if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name_len) {
            return Err(ValidationError::Length {
                field: "Name",
                min: NAME_MIN_LEN,
                max: NAME_MAX_LEN,
            }
            .into());
        }

        if let Some(description) = &self.description {
            if description.chars().count() > DESCRIPTION_MAX_LEN {
                return Err(ValidationError::TooLong {
                    field: "Description",
                    max: DESCRIPTION_MAX_LEN,
                }
                .into());
            }
        }

        let privacy = Privacy::from_str(&privacy)?;
        let user_id = UserId::new(input::positive_id(&user_id, "idUser")?);

        Ok(MapDraft {
            name,
            description: self.description,
            privacy,
            user_id,
        })
    }
}
