use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};

use crate::{
    dto::orders::{
        OrderItemInput, OrderItemWithProduct, OrderList, OrderPlaced, OrderWithItems,
        PlaceOrderRequest,
    },
    entity::{
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    models::{OrderStatus, Product},
    response::ApiResponse,
    routes::params::OrderHistoryQuery,
    state::AppState,
};

/// Rejects orders that would persist meaningless lines.
pub fn validate_items(items: &[OrderItemInput]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::BadRequest("Order must contain at least one item".into()));
    }
    for item in items {
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(format!(
                "quantity must be greater than 0 for product {}",
                item.product_id
            )));
        }
        if item.price < 0 {
            return Err(AppError::BadRequest(format!(
                "price must not be negative for product {}",
                item.product_id
            )));
        }
    }
    Ok(())
}

/// Sum of `price * quantity` over all lines.
pub fn order_total(items: &[OrderItemInput]) -> AppResult<i64> {
    items.iter().try_fold(0_i64, |total, item| {
        item.price
            .checked_mul(i64::from(item.quantity))
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| AppError::BadRequest("Order total is out of range".into()))
    })
}

pub async fn place_order(
    state: &AppState,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<OrderPlaced>> {
    validate_items(&payload.items)?;
    let total_price = order_total(&payload.items)?;

    let txn = state.orm.begin().await?;

    let order = OrderActive {
        id: NotSet,
        customer_name: Set(payload.name),
        phone: Set(payload.phone),
        address: Set(payload.address),
        total_price: Set(total_price),
        status: Set(OrderStatus::New.as_str().to_string()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for item in &payload.items {
        OrderItemActive {
            id: NotSet,
            order_id: Set(order.id),
            product_id: Set(item.product_id),
            quantity: Set(item.quantity),
            price: Set(item.price),
        }
        .insert(&txn)
        .await
        .map_err(item_insert_error)?;
    }

    txn.commit().await?;

    tracing::info!(
        order_id = order.id,
        total_price,
        items = payload.items.len(),
        "order placed"
    );

    Ok(ApiResponse::success(
        "OK",
        OrderPlaced { order_id: order.id },
    ))
}

pub async fn order_history(
    state: &AppState,
    query: OrderHistoryQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let phone = query
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("phone is required".into()))?;

    let orders = Orders::find()
        .filter(OrderCol::Phone.eq(phone))
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::Id)
        .all(&state.orm)
        .await?;

    let items = attach_items(&state.orm, orders).await?;
    Ok(ApiResponse::data(OrderList { items }))
}

/// Loads the lines of every order, each with its product, preserving order.
pub(crate) async fn attach_items<C>(
    db: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<OrderWithItems>>
where
    C: ConnectionTrait,
{
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let lines = OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .order_by_asc(OrderItemCol::Id)
        .all(db)
        .await?;

    let mut product_ids: Vec<i32> = lines.iter().map(|l| l.product_id).collect();
    product_ids.sort_unstable();
    product_ids.dedup();

    let products: HashMap<i32, Product> = if product_ids.is_empty() {
        HashMap::new()
    } else {
        Products::find()
            .filter(ProdCol::Id.is_in(product_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, Product::from(p)))
            .collect()
    };

    let mut by_order: HashMap<i32, Vec<OrderItemWithProduct>> = HashMap::new();
    for line in lines {
        let product = products.get(&line.product_id).cloned();
        by_order
            .entry(line.order_id)
            .or_default()
            .push(OrderItemWithProduct {
                item: line.into(),
                product,
            });
    }

    Ok(orders
        .into_iter()
        .map(|order| OrderWithItems {
            items: by_order.remove(&order.id).unwrap_or_default(),
            order: order.into(),
        })
        .collect())
}

fn item_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            AppError::BadRequest("Order references an unknown product".into())
        }
        _ => AppError::OrmError(err),
    }
}
