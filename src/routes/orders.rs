use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    routing::{get, post},
};

use crate::{
    dto::orders::{OrderList, OrderPlaced, PlaceOrderRequest},
    error::AppResult,
    response::ApiResponse,
    routes::params::OrderHistoryQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(place_order))
        .route("/orders/history", get(order_history))
}

#[utoipa::path(
    post,
    path = "/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 200, description = "Order placed", body = ApiResponse<OrderPlaced>),
        (status = 400, description = "Malformed body, invalid items or unknown product"),
    ),
    tag = "Orders"
)]
pub async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<OrderPlaced>>> {
    let Json(payload) = payload?;
    let resp = order_service::place_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/history",
    params(
        ("phone" = String, Query, description = "Customer phone number"),
    ),
    responses(
        (status = 200, description = "Orders placed with this phone, newest first", body = ApiResponse<OrderList>),
        (status = 400, description = "Missing phone"),
    ),
    tag = "Orders"
)]
pub async fn order_history(
    State(state): State<AppState>,
    query: Result<Query<OrderHistoryQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let Query(query) = query?;
    let resp = order_service::order_history(&state, query).await?;
    Ok(Json(resp))
}
