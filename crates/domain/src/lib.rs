//! # tripmap-domain
//!
//! Pure domain model for the tripmap itinerary backend.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Maps** (named itineraries owned by a user)
//! - Define **Markers** (points of interest placed on a map)
//! - Define **Multimedia** (files and notes attached to a marker)
//! - Validate raw client input into drafts ready for storage
//! - Pagination arithmetic shared by every listing
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod input;
pub mod pagination;
pub mod time;

pub mod map;
pub mod marker;
pub mod multimedia;
