//! Request extractors.
//!
//! - [`auth::Editor`] -- the authenticated editor behind a write request.

pub mod auth;
