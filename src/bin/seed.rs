use storefront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    seed::reset_database,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = AppConfig::database_url_from_env()?;

    let pool = create_pool(&database_url, 1).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;

    let summary = reset_database(&pool).await?;

    println!(
        "Seed completed. Categories: {}, products: {}",
        summary.categories, summary.products
    );
    Ok(())
}
