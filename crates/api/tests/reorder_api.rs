//! HTTP-level integration tests for the reorder endpoints and the gallery
//! and testimonial collections.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, get, multipart, post_json, Part, TestApp, PNG_BYTES};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create(app: &TestApp, uri: &str, parts: &[Part<'_>]) -> Value {
    let response = multipart(app, Method::POST, uri, parts, true).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn create_testimonial(app: &TestApp, name: &str) -> i64 {
    let data = create(
        app,
        "/api/v1/testimonials",
        &[Part::Text("clientName", name), Part::Text("quote", "Great labels")],
    )
    .await;
    data["id"].as_i64().unwrap()
}

async fn list_ids(app: &TestApp, uri: &str) -> Vec<i64> {
    let response = get(app, uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_applies_full_working_set(pool: PgPool) {
    let app = build_test_app(pool);
    let a = create_testimonial(&app, "A").await;
    let b = create_testimonial(&app, "B").await;
    let c = create_testimonial(&app, "C").await;
    assert_eq!(list_ids(&app, "/api/v1/testimonials").await, vec![a, b, c]);

    // Drag C to the top: every position shifts.
    let response = post_json(
        &app,
        "/api/v1/testimonials/reorder",
        json!({ "orders": [
            { "id": c, "order": 0 },
            { "id": a, "order": 1 },
            { "id": b, "order": 2 },
        ]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["message"].is_string());

    assert_eq!(list_ids(&app, "/api/v1/testimonials").await, vec![c, a, b]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_skips_unknown_ids(pool: PgPool) {
    let app = build_test_app(pool);
    let a = create_testimonial(&app, "A").await;
    let b = create_testimonial(&app, "B").await;

    let response = post_json(
        &app,
        "/api/v1/testimonials/reorder",
        json!({ "orders": [
            { "id": a, "order": 5 },
            { "id": 424242, "order": 0 },
        ]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, &format!("/api/v1/testimonials/{a}")).await;
    assert_eq!(body_json(response).await["data"]["order"], 5);
    assert_eq!(list_ids(&app, "/api/v1/testimonials").await, vec![b, a]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_requires_token(pool: PgPool) {
    let app = build_test_app(pool);

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/v1/services/reorder")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(r#"{"orders":[]}"#))
        .unwrap();
    let response = common::send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_refuses_read_only_role(pool: PgPool) {
    let app = build_test_app(pool);
    let a = create_testimonial(&app, "A").await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/v1/testimonials/reorder")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", app.viewer_token()))
        .body(axum::body::Body::from(
            json!({ "orders": [{ "id": a, "order": 9 }] }).to_string(),
        ))
        .unwrap();
    let response = common::send(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");

    let response = get(&app, &format!("/api/v1/testimonials/{a}")).await;
    assert_eq!(body_json(response).await["data"]["order"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_reorder_body_uses_error_envelope(pool: PgPool) {
    let app = build_test_app(pool);
    let a = create_testimonial(&app, "A").await;

    let response = post_json(
        &app,
        "/api/v1/testimonials/reorder",
        json!({ "orders": [{ "id": a, "order": "first" }] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_JSON");
    assert!(body["error"].is_string());

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/v1/testimonials/reorder")
        .header("authorization", format!("Bearer {}", app.token))
        .body(axum::body::Body::from(r#"{"orders":[]}"#))
        .unwrap();
    let response = common::send(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body_json(response).await["code"], "INVALID_JSON");

    let response = get(&app, &format!("/api/v1/testimonials/{a}")).await;
    assert_eq!(body_json(response).await["data"]["order"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_uses_error_envelope(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(&app, "/api/v1/banners").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_leaves_order_gaps(pool: PgPool) {
    let app = build_test_app(pool);
    let a = create_testimonial(&app, "A").await;
    let b = create_testimonial(&app, "B").await;
    let c = create_testimonial(&app, "C").await;

    let response = common::delete(&app, &format!("/api/v1/testimonials/{b}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&app, "/api/v1/testimonials").await;
    let data = body_json(response).await["data"].clone();
    let pairs: Vec<(i64, i64)> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|t| (t["id"].as_i64().unwrap(), t["order"].as_i64().unwrap()))
        .collect();
    assert_eq!(pairs, vec![(a, 0), (c, 2)]);

    // The next create appends at the current count, not after the gap.
    let d = create(
        &app,
        "/api/v1/testimonials",
        &[Part::Text("clientName", "D"), Part::Text("quote", "Fast")],
    )
    .await;
    assert_eq!(d["order"], 2);
}

// ---------------------------------------------------------------------------
// Gallery
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_gallery_orders_within_category(pool: PgPool) {
    let app = build_test_app(pool);

    let labels_0 = create(
        &app,
        "/api/v1/gallery",
        &[
            Part::Text("title", "Roll"),
            Part::Text("category", "labels"),
            Part::File("image", PNG_BYTES),
        ],
    )
    .await;
    let tags_0 = create(
        &app,
        "/api/v1/gallery",
        &[
            Part::Text("title", "Swing Tag"),
            Part::Text("category", "tags"),
            Part::File("image", PNG_BYTES),
        ],
    )
    .await;
    let labels_1 = create(
        &app,
        "/api/v1/gallery",
        &[
            Part::Text("title", "Sheet"),
            Part::Text("category", "labels"),
            Part::File("image", PNG_BYTES),
        ],
    )
    .await;

    assert_eq!(labels_0["order"], 0);
    assert_eq!(tags_0["order"], 0);
    assert_eq!(labels_1["order"], 1);

    let ids = list_ids(&app, "/api/v1/gallery?category=labels").await;
    assert_eq!(
        ids,
        vec![labels_0["id"].as_i64().unwrap(), labels_1["id"].as_i64().unwrap()]
    );

    let response = get(&app, "/api/v1/gallery/slug/swing-tag").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_items_hidden_from_public_list(pool: PgPool) {
    let app = build_test_app(pool);

    create(
        &app,
        "/api/v1/gallery",
        &[
            Part::Text("title", "Draft"),
            Part::Text("isActive", "false"),
            Part::File("image", PNG_BYTES),
        ],
    )
    .await;

    assert!(list_ids(&app, "/api/v1/gallery").await.is_empty());
    assert_eq!(list_ids(&app, "/api/v1/gallery?includeInactive=true").await.len(), 1);
}

// ---------------------------------------------------------------------------
// Testimonials
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_testimonial_avatar_is_optional_and_replaceable(pool: PgPool) {
    let app = build_test_app(pool);

    let created = create(
        &app,
        "/api/v1/testimonials",
        &[
            Part::Text("clientName", "Acme"),
            Part::Text("quote", "Sharp print"),
            Part::Text("rating", "5"),
        ],
    )
    .await;
    assert!(created["avatar"].is_null());
    assert_eq!(created["rating"], 5);
    let id = created["id"].as_i64().unwrap();

    let response = multipart(
        &app,
        Method::PATCH,
        &format!("/api/v1/testimonials/{id}"),
        &[Part::File("avatar", PNG_BYTES)],
        true,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    let avatar = updated["avatar"].as_str().unwrap();
    assert!(avatar.starts_with("testimonials/"));
    assert!(app.media_file(avatar).exists());
    assert_eq!(updated["clientName"], "Acme");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_testimonial_rating_out_of_range_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = multipart(
        &app,
        Method::POST,
        "/api/v1/testimonials",
        &[
            Part::Text("clientName", "Acme"),
            Part::Text("quote", "Sharp print"),
            Part::Text("rating", "9"),
        ],
        true,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
