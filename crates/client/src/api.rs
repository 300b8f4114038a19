//! REST client for the showroom API.
//!
//! Wraps the list and reorder endpoints using [`reqwest`]. Every request
//! carries a fixed timeout; there is no other cancellation.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use showroom_core::collection::Collection;
use showroom_core::ordering::{OrderPair, Orderable};
use showroom_core::types::{DbId, SortOrder, Timestamp};

use crate::error::ClientError;
use crate::reorder::OrderingBackend;
use crate::session::Session;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// An entity of any ordered collection, as listed by the API.
///
/// Only the fields the reorder board needs are typed; everything else is
/// kept verbatim in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedItem {
    pub id: DbId,
    pub order: SortOrder,
    pub is_active: bool,
    pub created_at: Timestamp,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl OrderedItem {
    /// A string field from the untyped remainder (e.g. `category`).
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(serde_json::Value::as_str)
    }
}

impl Orderable for OrderedItem {
    fn id(&self) -> DbId {
        self.id
    }
    fn order(&self) -> SortOrder {
        self.order
    }
    fn set_order(&mut self, order: SortOrder) {
        self.order = order;
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct ReorderBody<'a> {
    orders: &'a [OrderPair],
}

/// HTTP client bound to one [`Session`].
pub struct ApiClient {
    client: reqwest::Client,
    session: Session,
}

impl ApiClient {
    /// Build a client with the [`DEFAULT_TIMEOUT`].
    pub fn new(session: Session) -> Result<Self, ClientError> {
        Self::with_timeout(session, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(session: Session, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// `GET /<collection>`, including inactive items (admin view).
    pub async fn list(&self, collection: Collection) -> Result<Vec<OrderedItem>, ClientError> {
        let response = self
            .client
            .get(self.session.endpoint(&format!("/{}", collection.name())))
            .query(&[("includeInactive", "true")])
            .bearer_auth(&self.session.token)
            .send()
            .await?;

        let envelope: DataEnvelope<Vec<OrderedItem>> = Self::parse_response(response).await?;
        Ok(envelope.data)
    }

    /// `POST /<collection>/reorder` with the full working set.
    pub async fn reorder(
        &self,
        collection: Collection,
        orders: &[OrderPair],
    ) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.session.endpoint(&format!("/{}/reorder", collection.name())))
            .bearer_auth(&self.session.token)
            .json(&ReorderBody { orders })
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    // ---- private helpers ----

    /// Return the response unchanged on a 2xx status, otherwise a
    /// [`ClientError::Api`] carrying the server's `error` message.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

impl OrderingBackend for ApiClient {
    async fn fetch_items(&self, collection: Collection) -> Result<Vec<OrderedItem>, ClientError> {
        self.list(collection).await
    }

    async fn submit_orders(
        &self,
        collection: Collection,
        orders: &[OrderPair],
    ) -> Result<(), ClientError> {
        self.reorder(collection, orders).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_item_keeps_unknown_fields() {
        let json = r#"{
            "id": 3, "order": 1, "isActive": true,
            "createdAt": "2026-01-01T00:00:00Z",
            "title": "Roll", "category": "labels"
        }"#;
        let item: OrderedItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 3);
        assert_eq!(item.text("category"), Some("labels"));
        assert_eq!(item.text("missing"), None);
    }

    #[test]
    fn reorder_body_shape() {
        let orders = [OrderPair { id: 1, order: 0 }];
        let body = serde_json::to_value(ReorderBody { orders: &orders }).unwrap();
        assert_eq!(body, serde_json::json!({ "orders": [{ "id": 1, "order": 0 }] }));
    }
}
