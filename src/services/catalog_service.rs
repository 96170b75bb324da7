use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    dto::catalog::{CategoryList, ProductList},
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        products::{Column as ProdCol, Entity as Products},
    },
    error::AppResult,
    response::ApiResponse,
    routes::params::{CategoryQuery, ProductQuery},
    state::AppState,
};

/// Lists products. All filters are optional and combined with AND.
pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let mut condition = Condition::all();

    if let Some(category_id) = query.category_id {
        condition = condition.add(ProdCol::CategoryId.eq(category_id));
    }

    if let Some(search) = query.search() {
        let pattern = format!("%{}%", search);
        condition = condition.add(Expr::col(ProdCol::Name).ilike(pattern));
    }

    if query.recommended_only() {
        condition = condition.add(ProdCol::IsRecommended.eq(true));
    }

    let items = Products::find()
        .filter(condition)
        .order_by_asc(ProdCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::data(ProductList { items }))
}

/// Lists the children of `parent_id`, or the root categories when it is absent.
pub async fn list_categories(
    state: &AppState,
    query: CategoryQuery,
) -> AppResult<ApiResponse<CategoryList>> {
    let condition = match query.parent_id {
        Some(parent_id) => CategoryCol::ParentId.eq(parent_id),
        None => CategoryCol::ParentId.is_null(),
    };

    let items = Categories::find()
        .filter(condition)
        .order_by_asc(CategoryCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ApiResponse::data(CategoryList { items }))
}
