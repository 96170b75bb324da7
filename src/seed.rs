use std::collections::HashMap;

use anyhow::anyhow;
use serde::Serialize;
use sqlx::{Executor, Postgres, Transaction, types::Json};
use utoipa::ToSchema;

use crate::{db::DbPool, error::AppResult};

const DROP_TABLES: &str = "DROP TABLE IF EXISTS order_items, orders, products, categories";
const SCHEMA: &str = include_str!("../migrations/20250101000000_create_storefront.sql");

struct SeedCategory {
    name: &'static str,
    parent: Option<&'static str>,
}

struct SeedProduct {
    category: &'static str,
    name: &'static str,
    description: &'static str,
    price: i64,
    image_urls: &'static [&'static str],
}

// Parents must come before their children.
const CATEGORIES: &[SeedCategory] = &[
    SeedCategory { name: "Инструменты", parent: None },
    SeedCategory { name: "Стройматериалы", parent: None },
    SeedCategory { name: "Электроинструмент", parent: Some("Инструменты") },
    SeedCategory { name: "Ручной инструмент", parent: Some("Инструменты") },
    SeedCategory { name: "Сухие смеси", parent: Some("Стройматериалы") },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        category: "Электроинструмент",
        name: "Дрель Makita",
        description: "Мощная ударная дрель (для теста)",
        price: 45000,
        image_urls: &[
            "https://cdn.vseinstrumenti.ru/images/goods/instrument/dreli-shurupoverty/826998/1200x800/53248856.jpg",
            "https://cdn.vseinstrumenti.ru/images/goods/instrument/dreli-shurupoverty/826998/1200x800/60451475.jpg",
        ],
    },
    SeedProduct {
        category: "Ручной инструмент",
        name: "Набор отверток",
        description: "Профессиональный набор, 8 штук.",
        price: 12000,
        image_urls: &[
            "https://cdn.vseinstrumenti.ru/images/goods/ruchnoy-instrument/otvertki/842358/1200x800/52675276.jpg",
        ],
    },
    SeedProduct {
        category: "Сухие смеси",
        name: "Цемент М500",
        description: "Мешок 50кг.",
        price: 6500,
        image_urls: &["https://st35.stpulscen.ru/images/product/282/684/669_big.jpg"],
    },
];

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct SeedSummary {
    pub categories: usize,
    pub products: usize,
}

/// Drops every storefront table, recreates the schema and loads the
/// demonstration catalog. Runs in a single transaction.
pub async fn reset_database(pool: &DbPool) -> AppResult<SeedSummary> {
    tracing::warn!("dropping and reseeding all storefront tables");

    let mut tx = pool.begin().await?;

    // Unbound text goes through the simple protocol, so the multi-statement schema runs as is.
    tx.execute(DROP_TABLES).await?;
    tx.execute(SCHEMA).await?;

    let category_ids = seed_categories(&mut tx).await?;
    let products = seed_products(&mut tx, &category_ids).await?;

    tx.commit().await?;

    let summary = SeedSummary {
        categories: category_ids.len(),
        products,
    };
    tracing::info!(
        categories = summary.categories,
        products = summary.products,
        "database reseeded"
    );
    Ok(summary)
}

async fn seed_categories(
    tx: &mut Transaction<'_, Postgres>,
) -> AppResult<HashMap<&'static str, i32>> {
    let mut ids = HashMap::with_capacity(CATEGORIES.len());

    for category in CATEGORIES {
        let parent_id = match category.parent {
            Some(parent) => Some(
                *ids.get(parent)
                    .ok_or_else(|| anyhow!("seed category {parent} is not loaded yet"))?,
            ),
            None => None,
        };

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO categories (name, image_url, parent_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(category.name)
        .bind("")
        .bind(parent_id)
        .fetch_one(&mut **tx)
        .await?;

        ids.insert(category.name, id);
    }

    Ok(ids)
}

async fn seed_products(
    tx: &mut Transaction<'_, Postgres>,
    category_ids: &HashMap<&'static str, i32>,
) -> AppResult<usize> {
    for product in PRODUCTS {
        let category_id = *category_ids
            .get(product.category)
            .ok_or_else(|| anyhow!("unknown seed category {}", product.category))?;

        sqlx::query(
            r#"
            INSERT INTO products (category_id, name, description, price, image_urls, is_recommended)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(category_id)
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(Json(product.image_urls))
        .bind(true)
        .execute(&mut **tx)
        .await?;
    }

    Ok(PRODUCTS.len())
}
