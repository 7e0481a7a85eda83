//! # tripmap-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `MapRepository` — CRUD for maps
//!   - `MarkerRepository` — CRUD for markers
//!   - `MultimediaRepository` — CRUD for multimedia entries
//!   - `FileStore` — persistence of uploaded media files
//! - Define **driving/inbound ports** as use-case structs:
//!   - `MapService` — list, get, create, replace, delete
//!   - `MarkerService` — list, get, create, merge-update, delete
//!   - `MultimediaService` — list, upload, notes, delete with file cleanup
//! - Orchestrate domain objects without knowing *how* persistence or IO works
//!
//! ## Dependency rule
//! Depends on `tripmap-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
