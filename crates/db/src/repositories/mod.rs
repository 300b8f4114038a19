//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod gallery_repo;
pub mod ordering_repo;
pub mod service_repo;
pub mod slug_repo;
pub mod testimonial_repo;

pub use gallery_repo::GalleryRepo;
pub use ordering_repo::{OrderingRepo, ReorderReport};
pub use service_repo::ServiceRepo;
pub use slug_repo::SlugRepo;
pub use testimonial_repo::TestimonialRepo;
