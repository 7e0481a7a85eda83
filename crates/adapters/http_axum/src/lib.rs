//! # tripmap-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON REST API** for maps, markers and multimedia
//!   (`/maps`, `/markers`, `/multimedia`, …)
//! - Accept multipart uploads and hand the buffered files to the
//!   multimedia service
//! - Serve stored uploads read-only under `/uploads`
//! - Map application results and errors into `{ "success": … }` envelopes
//!
//! ## Dependency rule
//! Depends on `tripmap-app` (for port traits and services) and `tripmap-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
mod test_support;
