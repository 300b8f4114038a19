//! Body extractors whose rejections use the API error envelope.

use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` with rejections (wrong content type, malformed or
/// mistyped body) rendered through [`AppError`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
