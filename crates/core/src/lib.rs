//! Domain logic for the showroom content service.
//!
//! Everything in this crate is free of HTTP and database concerns so the API
//! server, the admin client, and any future tooling can share it.

pub mod binding;
pub mod collection;
pub mod content;
pub mod error;
pub mod media;
pub mod ordering;
pub mod slug;
pub mod types;
