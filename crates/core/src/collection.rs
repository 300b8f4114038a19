//! The ordered collections managed by the service.
//!
//! A [`Collection`] ties together the pieces that differ between entity kinds:
//! the database table, the upload sub-directory, the display name used in
//! errors, and the multipart field carrying the entity's top-level image.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Services,
    Gallery,
    Testimonials,
}

/// All collections, in route registration order.
pub const ALL_COLLECTIONS: &[Collection] = &[
    Collection::Services,
    Collection::Gallery,
    Collection::Testimonials,
];

impl Collection {
    /// Route segment and upload sub-directory (`services`, `gallery`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Gallery => "gallery",
            Self::Testimonials => "testimonials",
        }
    }

    /// Parse from a route segment.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "services" => Ok(Self::Services),
            "gallery" => Ok(Self::Gallery),
            "testimonials" => Ok(Self::Testimonials),
            other => Err(CoreError::Validation(format!(
                "Unknown collection '{other}'"
            ))),
        }
    }

    /// Backing table. Never derived from user input.
    pub fn table(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Gallery => "gallery_items",
            Self::Testimonials => "testimonials",
        }
    }

    /// Entity name used in `NotFound` errors.
    pub fn entity_name(self) -> &'static str {
        match self {
            Self::Services => "Service",
            Self::Gallery => "GalleryItem",
            Self::Testimonials => "Testimonial",
        }
    }

    /// Multipart field carrying the top-level image.
    pub fn flat_image_field(self) -> &'static str {
        match self {
            Self::Services | Self::Gallery => "image",
            Self::Testimonials => "avatar",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_roundtrips_through_from_name() {
        for c in ALL_COLLECTIONS {
            assert_eq!(Collection::from_name(c.name()).unwrap(), *c);
        }
    }

    #[test]
    fn unknown_collection_is_rejected() {
        assert!(Collection::from_name("banners").is_err());
    }

    #[test]
    fn testimonials_use_avatar_field() {
        assert_eq!(Collection::Testimonials.flat_image_field(), "avatar");
        assert_eq!(Collection::Gallery.table(), "gallery_items");
    }
}
