use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};

use crate::{
    dto::catalog::{CategoryList, ProductList},
    error::AppResult,
    response::ApiResponse,
    routes::params::{CategoryQuery, ProductQuery},
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/categories", get(list_categories))
}

#[utoipa::path(
    get,
    path = "/products",
    params(
        ("category_id" = Option<i32>, Query, description = "Only products of this category"),
        ("q" = Option<String>, Query, description = "Case-insensitive name search"),
        ("recommended" = Option<String>, Query, description = "Only the value `true` restricts to recommended products"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>),
        (status = 400, description = "Invalid query parameter"),
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<ProductQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let Query(query) = query?;
    let resp = catalog_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/categories",
    params(
        ("parent_id" = Option<i32>, Query, description = "Children of this category; roots when omitted"),
    ),
    responses(
        (status = 200, description = "List categories", body = ApiResponse<CategoryList>),
        (status = 400, description = "Invalid query parameter"),
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    query: Result<Query<CategoryQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let Query(query) = query?;
    let resp = catalog_service::list_categories(&state, query).await?;
    Ok(Json(resp))
}
