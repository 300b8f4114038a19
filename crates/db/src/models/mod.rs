//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts (slug and order are assigned server-side)
//! - An update DTO (all `Option` fields) for partial merges

pub mod gallery;
pub mod service;
pub mod testimonial;
