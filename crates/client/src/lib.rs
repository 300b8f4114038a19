//! Admin-side client for the showroom API.
//!
//! - [`session`] -- explicit base URL and bearer token.
//! - [`api`] -- typed HTTP calls over `reqwest`.
//! - [`reorder`] -- optimistic drag-and-drop reorder with a single in-flight
//!   submission per board and resync on failure.

pub mod api;
pub mod error;
pub mod reorder;
pub mod session;
