//! Testimonial entity model and DTOs.

use serde::Serialize;
use showroom_core::media::MediaOwner;
use showroom_core::ordering::Orderable;
use showroom_core::types::{DbId, SortOrder, Timestamp};
use sqlx::FromRow;

/// A row from the `testimonials` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: DbId,
    pub client_name: String,
    pub company: Option<String>,
    pub quote: String,
    pub rating: Option<i16>,
    pub avatar: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: SortOrder,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MediaOwner for Testimonial {
    fn media_paths(&self) -> Vec<&str> {
        self.avatar.as_deref().into_iter().collect()
    }
}

impl Orderable for Testimonial {
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

/// DTO for inserting a testimonial.
#[derive(Debug, Clone)]
pub struct CreateTestimonial {
    pub client_name: String,
    pub company: Option<String>,
    pub quote: String,
    pub rating: Option<i16>,
    pub avatar: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for a partial update.
#[derive(Debug, Clone, Default)]
pub struct UpdateTestimonial {
    pub client_name: Option<String>,
    pub company: Option<String>,
    pub quote: Option<String>,
    pub rating: Option<i16>,
    pub avatar: Option<String>,
    pub is_active: Option<bool>,
}
