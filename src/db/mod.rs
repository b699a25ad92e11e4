use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;
use crate::crypto;
use crate::db::models::Scout;

pub mod models;
pub mod queries;

pub const DEMO_SCOUT_EMAIL: &str = "scout@demo.com";
pub const DEMO_SCOUT_PASSWORD: &str = "password123";
pub const DEMO_SCOUT_NAME: &str = "Demo Scout";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS scouts (
        id UUID PRIMARY KEY,
        email TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        name TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id UUID PRIMARY KEY,
        scout_id UUID NOT NULL REFERENCES scouts(id),
        total NUMERIC(10,2) NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        payment_intent_id TEXT,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_orders_scout_id ON orders (scout_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_orders_payment_intent_id ON orders (payment_intent_id)",
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        id UUID PRIMARY KEY,
        order_id UUID NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
        cookie_type TEXT NOT NULL,
        quantity INTEGER NOT NULL,
        price NUMERIC(10,2) NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items (order_id)",
];

pub async fn create_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
}

/// Creates the tables if they do not exist yet. Safe to run on every start.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in SCHEMA {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!("Database schema ready");
    Ok(())
}

/// Inserts the demo scout when no accounts exist. Returns whether it did.
pub async fn seed_demo_scout(pool: &PgPool) -> anyhow::Result<bool> {
    if queries::count_scouts(pool).await? > 0 {
        return Ok(false);
    }

    let hash = crypto::hash_password_async(DEMO_SCOUT_PASSWORD.to_string()).await?;
    let scout = Scout::new(
        DEMO_SCOUT_EMAIL.to_string(),
        hash,
        DEMO_SCOUT_NAME.to_string(),
    );
    queries::insert_scout(pool, &scout).await?;
    tracing::info!(email = DEMO_SCOUT_EMAIL, "Seeded demo scout account");
    Ok(true)
}
