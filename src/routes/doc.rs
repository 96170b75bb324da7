use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        catalog::{CategoryList, ProductList},
        orders::{
            OrderItemInput, OrderItemWithProduct, OrderList, OrderPlaced, OrderWithItems,
            PlaceOrderRequest, UpdateOrderStatusRequest,
        },
    },
    models::{Category, Order, OrderItem, OrderStatus, Product},
    response::{ApiMessage, ApiResponse},
    routes::{admin, catalog, health, orders},
    seed::SeedSummary,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        catalog::list_products,
        catalog::list_categories,
        orders::place_order,
        orders::order_history,
        admin::list_all_orders,
        admin::get_order,
        admin::update_order_status,
        admin::delete_order,
        admin::force_reset
    ),
    components(
        schemas(
            Product,
            Category,
            Order,
            OrderItem,
            OrderStatus,
            ProductList,
            CategoryList,
            PlaceOrderRequest,
            OrderItemInput,
            OrderPlaced,
            UpdateOrderStatusRequest,
            OrderItemWithProduct,
            OrderWithItems,
            OrderList,
            SeedSummary,
            ApiMessage,
            ApiResponse<ProductList>,
            ApiResponse<CategoryList>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<Order>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Product and category browsing"),
        (name = "Orders", description = "Order placement and history"),
        (name = "Admin", description = "Order administration and data reset"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
