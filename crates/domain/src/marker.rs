//! Marker — a geocoded point of interest on a map.

use serde::{Deserialize, Serialize};

use crate::error::{TripMapError, ValidationError};
use crate::id::{MapId, MarkerId};
use crate::input::{self, NumberInput};

pub const TITLE_MIN_LEN: usize = 3;
pub const TITLE_MAX_LEN: usize = 255;

/// A stored marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    #[serde(rename = "idMarker")]
    pub id: MarkerId,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "idMap")]
    pub map_id: MapId,
}

/// Validated marker fields.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDraft {
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub map_id: MapId,
}

impl MarkerDraft {
    /// Create a builder fed with raw client input.
    #[must_use]
    pub fn builder() -> MarkerDraftBuilder {
        MarkerDraftBuilder::default()
    }

    /// Attach the storage-assigned id.
    #[must_use]
    pub fn into_marker(self, id: MarkerId) -> Marker {
        Marker {
            id,
            title: self.title,
            latitude: self.latitude,
            longitude: self.longitude,
            map_id: self.map_id,
        }
    }

    /// Fill an empty title from `stored`.
    ///
    /// Coordinates always come from the draft: a blank coordinate never
    /// passes validation, and a numeric string such as `"0"` counts as given.
    #[must_use]
    pub fn merged_with(self, stored: &Marker) -> Self {
        let title = if self.title.is_empty() {
            stored.title.clone()
        } else {
            self.title
        };
        Self {
            title,
            latitude: self.latitude,
            longitude: self.longitude,
            map_id: self.map_id,
        }
    }
}

/// Collects raw client fields and validates them into a [`MarkerDraft`].
#[derive(Debug, Default)]
pub struct MarkerDraftBuilder {
    title: Option<String>,
    latitude: Option<NumberInput>,
    longitude: Option<NumberInput>,
    map_id: Option<NumberInput>,
}

impl MarkerDraftBuilder {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn latitude(mut self, latitude: impl Into<NumberInput>) -> Self {
        self.latitude = Some(latitude.into());
        self
    }

    #[must_use]
    pub fn longitude(mut self, longitude: impl Into<NumberInput>) -> Self {
        self.longitude = Some(longitude.into());
        self
    }

    #[must_use]
    pub fn map_id(mut self, map_id: impl Into<NumberInput>) -> Self {
        self.map_id = Some(map_id.into());
        self
    }

    /// Feed optional raw fields in one go, as decoded from a request body.
    #[must_use]
    pub fn raw(
        mut self,
        title: Option<String>,
        latitude: Option<NumberInput>,
        longitude: Option<NumberInput>,
        map_id: Option<NumberInput>,
    ) -> Self {
        self.title = title;
        self.latitude = latitude;
        self.longitude = longitude;
        self.map_id = map_id;
        self
    }

    /// Consume the builder, validate, and return a [`MarkerDraft`].
    ///
    /// # Errors
    ///
    /// Returns [`TripMapError::Validation`] when a field is missing (zero
    /// counts as missing), the title length is out of bounds, a coordinate is
    /// not numeric, or the map id is not a positive integer.
    pub fn build(self) -> Result<MarkerDraft, TripMapError> {
        let title = self.title.filter(|s| !s.is_empty());
        let latitude = input::present(self.latitude);
        let longitude = input::present(self.longitude);
        let map_id = input::present(self.map_id);

        let (Some(title), Some(latitude), Some(longitude), Some(map_id)) =
            (title, latitude, longitude, map_id)
        else {
            return Err(
                ValidationError::MissingFields("title, latitude, longitude, idMap").into(),
            );
        };

        let title_len = title.chars().count();
        if !(TITLE_MIN_LEN..=TITLE_MAX_LEN).contains(&title_len) {
            return Err(ValidationError::Length {
                field: "Title",
                min: TITLE_MIN_LEN,
                max: TITLE_MAX_LEN,
            }
            .into());
        }

        let (Some(latitude), Some(longitude)) = (latitude.value(), longitude.value()) else {
            return Err(ValidationError::InvalidCoordinates.into());
        };

        let map_id = MapId::new(input::positive_id(&map_id, "idMap")?);

        Ok(MarkerDraft {
            title,
            latitude,
            longitude,
            map_id,
        })
    }
}
