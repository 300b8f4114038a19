//! Editor access tokens (HS256 JWT).
//!
//! Tokens are issued by the site's identity provider with the shared secret;
//! this service only verifies them. [`mint`] signs tokens for tests and ops
//! tooling.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use showroom_core::types::DbId;

/// What a token holder may do with site content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorRole {
    Admin,
    Editor,
    /// Read-only preview access; cannot mutate collections.
    Viewer,
}

impl EditorRole {
    pub fn can_edit(self) -> bool {
        matches!(self, Self::Admin | Self::Editor)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }
}

/// Payload of an editor token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorClaims {
    /// Editor id in the identity provider.
    pub sub: DbId,
    pub role: EditorRole,
    pub exp: i64,
    pub iat: i64,
    /// Token id, logged for audit.
    pub jti: String,
}

/// Signing secret and timing rules for editor tokens.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    /// Lifetime of minted tokens.
    pub ttl_mins: i64,
    /// Clock skew tolerated when checking `exp`.
    pub leeway_secs: u64,
}

const DEFAULT_TTL_MINS: i64 = 60;
const DEFAULT_LEEWAY_SECS: u64 = 30;

impl TokenConfig {
    /// Read token settings from the environment.
    ///
    /// | Env Var                  | Required | Default |
    /// |--------------------------|----------|---------|
    /// | `JWT_SECRET`             | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS` | no       | `60`    |
    /// | `JWT_LEEWAY_SECS`        | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or empty, or a number fails to parse.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and non-empty");

        Self {
            secret,
            ttl_mins: crate::config::env_or("JWT_ACCESS_EXPIRY_MINS", DEFAULT_TTL_MINS),
            leeway_secs: crate::config::env_or("JWT_LEEWAY_SECS", DEFAULT_LEEWAY_SECS),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        validation
    }
}

/// Sign a token for `editor_id` valid for `config.ttl_mins`.
pub fn mint(
    editor_id: DbId,
    role: EditorRole,
    config: &TokenConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = EditorClaims {
        sub: editor_id,
        role,
        exp: iat + config.ttl_mins * 60,
        iat,
        jti: uuid::Uuid::new_v4().to_string(),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check signature, algorithm and expiry; return the claims.
pub fn verify(token: &str, config: &TokenConfig) -> Result<EditorClaims, jsonwebtoken::errors::Error> {
    jsonwebtoken::decode::<EditorClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &config.validation(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> TokenConfig {
        TokenConfig {
            secret: secret.to_string(),
            ttl_mins: 15,
            leeway_secs: 0,
        }
    }

    fn signed(claims: &EditorClaims, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn minted_token_verifies() {
        let config = config("showroom-test-secret");
        let token = mint(7, EditorRole::Editor, &config).unwrap();

        let claims = verify(&token, &config).unwrap();
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.role, EditorRole::Editor);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        let claims = EditorClaims {
            sub: 1,
            role: EditorRole::Admin,
            exp: now - 120,
            iat: now - 600,
            jti: "old".into(),
        };
        let token = signed(&claims, "s");
        assert!(verify(&token, &config("s")).is_err());

        // Within leeway the same token still passes.
        let lenient = TokenConfig {
            leeway_secs: 300,
            ..config("s")
        };
        assert!(verify(&token, &lenient).is_ok());
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let token = mint(1, EditorRole::Admin, &config("alpha")).unwrap();
        assert!(verify(&token, &config("bravo")).is_err());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let now = chrono::Utc::now().timestamp();
        let body = serde_json::json!({
            "sub": 1, "role": "superuser", "exp": now + 600, "iat": now, "jti": "x"
        });
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &body,
            &EncodingKey::from_secret(b"s"),
        )
        .unwrap();
        assert!(verify(&token, &config("s")).is_err());
    }

    #[test]
    fn only_admins_and_editors_edit() {
        assert!(EditorRole::Admin.can_edit());
        assert!(EditorRole::Editor.can_edit());
        assert!(!EditorRole::Viewer.can_edit());
    }
}
