//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for list endpoints that support an `includeInactive` flag.
///
/// Public pages omit it and see active items only; the admin passes `true`.
#[derive(Debug, Deserialize)]
pub struct IncludeInactiveParams {
    #[serde(default, rename = "includeInactive", alias = "include_inactive")]
    pub include_inactive: bool,
}

/// Gallery list parameters: inactive flag plus an optional category scope.
#[derive(Debug, Deserialize)]
pub struct GalleryListParams {
    #[serde(default, rename = "includeInactive", alias = "include_inactive")]
    pub include_inactive: bool,
    pub category: Option<String>,
}
