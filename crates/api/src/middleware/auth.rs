//! Editor extractor guarding the mutating routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use showroom_core::error::CoreError;
use showroom_core::types::DbId;

use crate::auth::token::{self, EditorRole};
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated editor allowed to change site content.
///
/// Taken as the first argument of every create/update/delete/reorder
/// handler. Missing or invalid tokens are rejected with 401, valid tokens
/// without edit rights with 403.
#[derive(Debug, Clone)]
pub struct Editor {
    pub id: DbId,
    pub role: EditorRole,
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively.
fn bearer_token(headers: &HeaderMap) -> Result<&str, CoreError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(CoreError::Unauthorized(
            "Expected Authorization: Bearer <token>".into(),
        )),
    }
}

impl FromRequestParts<AppState> for Editor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = bearer_token(&parts.headers)?;

        let claims = token::verify(raw, &state.config.tokens).map_err(|e| {
            tracing::debug!(error = %e, "Rejected editor token");
            CoreError::Unauthorized("Invalid or expired token".into())
        })?;

        if !claims.role.can_edit() {
            tracing::warn!(editor_id = claims.sub, role = claims.role.as_str(), "Read-only token used on a write route");
            return Err(CoreError::Forbidden(format!(
                "Role '{}' cannot modify content",
                claims.role.as_str()
            ))
            .into());
        }

        Ok(Editor {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn rejects_other_schemes_and_blanks() {
        assert_matches!(bearer_token(&headers("Basic Zm9vOmJhcg==")), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(&headers("Bearer ")), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(&headers("abc")), Err(CoreError::Unauthorized(_)));
        assert_matches!(bearer_token(&HeaderMap::new()), Err(CoreError::Unauthorized(_)));
    }
}
