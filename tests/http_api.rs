mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use storefront_api::routes::create_app;
use tower::ServiceExt;

use common::{lazy_state, token, token_with_secret, unreachable_state};

fn app() -> Router {
    create_app(lazy_state())
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_as(uri: &str, bearer: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {bearer}"))
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: Method, uri: &str, bearer: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {bearer}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn health_is_public_and_tagged_with_request_id() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_a_json_not_found() {
    let (status, body) = send(get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
    assert_eq!(body["data"]["path"], "/nope");
}

#[tokio::test]
async fn admin_orders_require_a_bearer_token() {
    let (status, body) = send(get("/admin/orders")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing Authorization header");
}

#[tokio::test]
async fn admin_orders_reject_non_admin_role() {
    let (status, body) = send(get_as("/admin/orders", &token("customer"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden");
}

#[tokio::test]
async fn admin_orders_reject_token_signed_with_another_secret() {
    let forged = token_with_secret("admin", "not-the-secret");
    let (status, body) = send(get_as("/admin/orders", &forged)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn admin_orders_reject_basic_auth_scheme() {
    let request = Request::builder()
        .uri("/admin/orders")
        .header(header::AUTHORIZATION, "Basic YWRtaW46YWRtaW4=")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn force_reset_is_gated_behind_admin() {
    let (status, _) = send(get("/force-reset")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(get_as("/force-reset", &token("customer"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

fn assert_send<T: Send>(_: &T) {}

#[tokio::test]
async fn reset_future_can_run_on_the_server_runtime() {
    let state = lazy_state();
    let reset = storefront_api::seed::reset_database(&state.pool);
    assert_send(&reset);
}

#[tokio::test]
async fn place_order_rejects_malformed_body() {
    let (status, body) = send(json_request(Method::POST, "/orders", None, "{\"name\": ")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn place_order_rejects_missing_fields() {
    let payload = json!({ "name": "Ivan", "items": [] }).to_string();
    let (status, body) = send(json_request(Method::POST, "/orders", None, &payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn place_order_rejects_empty_item_list() {
    let payload = json!({
        "name": "Ivan",
        "phone": "+70000000000",
        "address": "Moscow",
        "items": []
    })
    .to_string();
    let (status, body) = send(json_request(Method::POST, "/orders", None, &payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Order must contain at least one item");
}

#[tokio::test]
async fn place_order_rejects_zero_quantity() {
    let payload = json!({
        "name": "Ivan",
        "phone": "+70000000000",
        "address": "Moscow",
        "items": [{ "product_id": 1, "quantity": 0, "price": 100 }]
    })
    .to_string();
    let (status, _) = send(json_request(Method::POST, "/orders", None, &payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_status_rejects_unknown_state() {
    let admin = token("admin");
    let payload = json!({ "status": "teleported" }).to_string();
    let (status, body) = send(json_request(
        Method::PUT,
        "/admin/orders/1",
        Some(&admin),
        &payload,
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("teleported"));
}

#[tokio::test]
async fn update_status_requires_status_field() {
    let admin = token("admin");
    let (status, _) = send(json_request(Method::PUT, "/admin/orders/1", Some(&admin), "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_order_id_must_be_numeric() {
    let (status, _) = send(get_as("/admin/orders/abc", &token("admin"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn products_reject_non_numeric_category() {
    let (status, body) = send(get("/products?category_id=tools")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn products_accept_any_recommended_value() {
    // The query parses, so the request reaches the store and fails there.
    for uri in ["/products?recommended=yes", "/products?recommended=1", "/products?recommended=TRUE"] {
        let response = create_app(unreachable_state()).oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
    }
}

#[tokio::test]
async fn categories_reject_non_numeric_parent() {
    let (status, _) = send(get("/categories?parent_id=root")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn order_history_requires_phone() {
    let (status, body) = send(get("/orders/history")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "phone is required");

    let (status, _) = send(get("/orders/history?phone=%20%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
