//! Service entity model and DTOs.
//!
//! A service owns a top-level image plus two nested arrays whose elements
//! carry their own images (`subProducts`, `sections`), and a list of typed
//! extra-content blocks.

use serde::Serialize;
use showroom_core::content::{referenced_images, ContentBlock, ContentSection, SubProduct};
use showroom_core::media::MediaOwner;
use showroom_core::ordering::Orderable;
use showroom_core::types::{DbId, SortOrder, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `services` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sub_products: Json<Vec<SubProduct>>,
    pub sections: Json<Vec<ContentSection>>,
    pub extra_content: Json<Vec<ContentBlock>>,
    #[serde(rename = "order")]
    pub sort_order: SortOrder,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MediaOwner for Service {
    fn media_paths(&self) -> Vec<&str> {
        self.image
            .as_deref()
            .into_iter()
            .chain(referenced_images(self.sub_products.as_slice()))
            .chain(referenced_images(self.sections.as_slice()))
            .collect()
    }
}

impl Orderable for Service {
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

/// DTO for inserting a service.
#[derive(Debug, Clone)]
pub struct CreateService {
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sub_products: Vec<SubProduct>,
    pub sections: Vec<ContentSection>,
    pub extra_content: Vec<ContentBlock>,
    pub is_active: Option<bool>,
}

/// DTO for a partial update. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateService {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sub_products: Option<Vec<SubProduct>>,
    pub sections: Option<Vec<ContentSection>>,
    pub extra_content: Option<Vec<ContentBlock>>,
    pub is_active: Option<bool>,
}
