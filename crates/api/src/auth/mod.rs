//! Editor authentication.
//!
//! - [`token`] -- HS256 editor tokens: roles, claims, verification, and a
//!   minting helper for tooling (issuance lives with the identity provider).

pub mod token;
