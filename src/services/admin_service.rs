use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::{
    dto::orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderStatus},
    response::{ApiMessage, ApiResponse},
    seed::{SeedSummary, reset_database},
    services::order_service::attach_items,
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;

    let orders = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::Id)
        .all(&state.orm)
        .await?;

    let items = attach_items(&state.orm, orders).await?;
    Ok(ApiResponse::data(OrderList { items }))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;

    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let order = attach_items(&state.orm, vec![order])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::data(order))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let status: OrderStatus = payload.status.parse()?;

    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let mut active: OrderActive = existing.into();
    active.status = Set(status.as_str().to_string());
    let order = active.update(&state.orm).await?;

    tracing::info!(
        order_id = order.id,
        status = %status,
        by = %user.subject,
        "order status updated"
    );

    Ok(ApiResponse::success("Updated", order.into()))
}

/// Removes the order lines first, then the order itself.
pub async fn delete_order(state: &AppState, user: &AuthUser, id: i32) -> AppResult<ApiMessage> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;

    let items = OrderItems::delete_many()
        .filter(OrderItemCol::OrderId.eq(id))
        .exec(&txn)
        .await?;
    let result = Orders::delete_by_id(id).exec(&txn).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    txn.commit().await?;

    tracing::info!(
        order_id = id,
        items = items.rows_affected,
        by = %user.subject,
        "order deleted"
    );

    Ok(ApiMessage::new("Deleted"))
}

pub async fn force_reset(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<SeedSummary>> {
    ensure_admin(user)?;
    tracing::warn!(by = %user.subject, "force reset requested");

    let summary = reset_database(&state.pool).await?;
    Ok(ApiResponse::success(
        "Database wiped and reseeded",
        summary,
    ))
}
