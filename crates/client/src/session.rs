/// Where to reach the API and how to authenticate.
///
/// Passed explicitly to [`ApiClient::new`](crate::api::ApiClient::new); there
/// is no process-wide session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Server origin, e.g. `http://localhost:3000`.
    pub base_url: String,
    /// Bearer token sent on mutating requests.
    pub token: String,
}

impl Session {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// `<base_url>/api/v1<path>` with no doubled slash.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url.trim_end_matches('/'))
    }
}
