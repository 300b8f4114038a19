//! Gallery item entity model and DTOs.
//!
//! Gallery items are ordered within their `category`; items without a
//! category share one scope.

use serde::Serialize;
use showroom_core::media::MediaOwner;
use showroom_core::ordering::Orderable;
use showroom_core::types::{DbId, SortOrder, Timestamp};
use sqlx::FromRow;

/// A row from the `gallery_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub caption: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: SortOrder,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MediaOwner for GalleryItem {
    fn media_paths(&self) -> Vec<&str> {
        self.image.as_deref().into_iter().collect()
    }
}

impl Orderable for GalleryItem {
    fn id(&self) -> DbId {
        self.id
    }
    fn order(&self) -> SortOrder {
        self.sort_order
    }
    fn set_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// DTO for inserting a gallery item.
#[derive(Debug, Clone)]
pub struct CreateGalleryItem {
    pub title: String,
    pub slug: String,
    pub caption: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for a partial update. Category changes do not move the item's order.
#[derive(Debug, Clone, Default)]
pub struct UpdateGalleryItem {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub caption: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub is_active: Option<bool>,
}
