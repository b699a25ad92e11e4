use sqlx::postgres::PgExecutor;
use sqlx::{PgPool, Result};
use std::collections::HashMap;
use uuid::Uuid;

use crate::db::models::{OrderItemRow, OrderRow, Scout};
use crate::domain::order::{NewOrderItem, Order, OrderItem, OrderStatus};

const ORDER_COLUMNS: &str = "id, scout_id, total, status, payment_intent_id, created_at";

// --- Scout Queries ---

pub async fn insert_scout(pool: &PgPool, scout: &Scout) -> Result<Scout> {
    sqlx::query_as::<_, Scout>(
        r#"
        INSERT INTO scouts (id, email, password_hash, name, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(scout.id)
    .bind(&scout.email)
    .bind(&scout.password_hash)
    .bind(&scout.name)
    .bind(scout.created_at)
    .fetch_one(pool)
    .await
}

/// `email` must already be normalized.
pub async fn find_scout_by_email(pool: &PgPool, email: &str) -> Result<Option<Scout>> {
    sqlx::query_as::<_, Scout>("SELECT * FROM scouts WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn count_scouts(pool: &PgPool) -> Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM scouts")
        .fetch_one(pool)
        .await
}

// --- Order Queries ---

/// Inserts an order and all of its items in one transaction. The stored
/// total is the aggregate of the inserted item rows.
pub async fn insert_order(pool: &PgPool, scout_id: Uuid, items: &[NewOrderItem]) -> Result<Order> {
    let mut tx = pool.begin().await?;
    let id = Uuid::new_v4();

    sqlx::query("INSERT INTO orders (id, scout_id, total, status) VALUES ($1, $2, 0, $3)")
        .bind(id)
        .bind(scout_id)
        .bind(OrderStatus::Pending.as_str())
        .execute(&mut *tx)
        .await?;

    let mut inserted = Vec::with_capacity(items.len());
    for item in items {
        inserted.push(insert_item(&mut *tx, id, item).await?);
    }

    let row = recompute_total(&mut *tx, id).await?;
    tx.commit().await?;
    into_order(row, inserted)
}

pub async fn list_orders(pool: &PgPool, scout_id: Uuid) -> Result<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {} FROM orders WHERE scout_id = $1 ORDER BY created_at DESC",
        ORDER_COLUMNS
    ))
    .bind(scout_id)
    .fetch_all(pool)
    .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let mut items = fetch_items(pool, &ids).await?;

    rows.into_iter()
        .map(|row| {
            let order_items = items.remove(&row.id).unwrap_or_default();
            into_order(row, order_items)
        })
        .collect()
}

pub async fn get_order(pool: &PgPool, id: Uuid, scout_id: Uuid) -> Result<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {} FROM orders WHERE id = $1 AND scout_id = $2",
        ORDER_COLUMNS
    ))
    .bind(id)
    .bind(scout_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => load_order(pool, row).await.map(Some),
        None => Ok(None),
    }
}

/// Appends one item to an unpaid order owned by `scout_id` and recomputes
/// the stored total from every item row. `None` when no such order exists.
pub async fn append_item(
    pool: &PgPool,
    id: Uuid,
    scout_id: Uuid,
    item: &NewOrderItem,
) -> Result<Option<Order>> {
    let mut tx = pool.begin().await?;

    let locked = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM orders WHERE id = $1 AND scout_id = $2 AND status <> $3 FOR UPDATE",
    )
    .bind(id)
    .bind(scout_id)
    .bind(OrderStatus::Paid.as_str())
    .fetch_optional(&mut *tx)
    .await?;

    if locked.is_none() {
        tx.rollback().await?;
        return Ok(None);
    }

    insert_item(&mut *tx, id, item).await?;
    let row = recompute_total(&mut *tx, id).await?;

    let order = load_order(&mut *tx, row).await?;
    tx.commit().await?;
    Ok(Some(order))
}

/// Marks an unpaid order owned by `scout_id` as cancelled.
pub async fn cancel_order(pool: &PgPool, id: Uuid, scout_id: Uuid) -> Result<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "UPDATE orders SET status = $1 WHERE id = $2 AND scout_id = $3 AND status <> $4 RETURNING {}",
        ORDER_COLUMNS
    ))
    .bind(OrderStatus::Cancelled.as_str())
    .bind(id)
    .bind(scout_id)
    .bind(OrderStatus::Paid.as_str())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => load_order(pool, row).await.map(Some),
        None => Ok(None),
    }
}

pub async fn set_payment_intent(pool: &PgPool, id: Uuid, payment_intent_id: &str) -> Result<()> {
    sqlx::query("UPDATE orders SET payment_intent_id = $1 WHERE id = $2")
        .bind(payment_intent_id)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Sets the status of every order carrying `payment_intent_id` and returns
/// the ids of the orders that changed.
pub async fn update_status_by_payment_intent(
    pool: &PgPool,
    payment_intent_id: &str,
    status: OrderStatus,
) -> Result<Vec<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        "UPDATE orders SET status = $1 WHERE payment_intent_id = $2 RETURNING id",
    )
    .bind(status.as_str())
    .bind(payment_intent_id)
    .fetch_all(pool)
    .await
}

// --- Item helpers ---

/// Sets `orders.total` to the sum of the order's item rows. A sum that does
/// not fit the column fails with SQLSTATE 22003.
async fn recompute_total<'c, E>(executor: E, order_id: Uuid) -> Result<OrderRow>
where
    E: PgExecutor<'c>,
{
    sqlx::query_as::<_, OrderRow>(&format!(
        r#"
        UPDATE orders
        SET total = (
            SELECT COALESCE(SUM(quantity * price), 0) FROM order_items WHERE order_id = $1
        )
        WHERE id = $1
        RETURNING {}
        "#,
        ORDER_COLUMNS
    ))
    .bind(order_id)
    .fetch_one(executor)
    .await
}

async fn insert_item<'c, E>(executor: E, order_id: Uuid, item: &NewOrderItem) -> Result<OrderItem>
where
    E: PgExecutor<'c>,
{
    let row = sqlx::query_as::<_, OrderItemRow>(
        r#"
        INSERT INTO order_items (id, order_id, cookie_type, quantity, price)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, order_id, cookie_type, quantity, price, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(order_id)
    .bind(&item.cookie_type)
    .bind(item.quantity)
    .bind(&item.price)
    .fetch_one(executor)
    .await?;

    Ok(row.into())
}

async fn fetch_items<'c, E>(executor: E, order_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<OrderItem>>>
where
    E: PgExecutor<'c>,
{
    let rows = sqlx::query_as::<_, OrderItemRow>(
        r#"
        SELECT id, order_id, cookie_type, quantity, price, created_at
        FROM order_items
        WHERE order_id = ANY($1)
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(order_ids)
    .fetch_all(executor)
    .await?;

    let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for row in rows {
        grouped.entry(row.order_id).or_default().push(row.into());
    }
    Ok(grouped)
}

async fn load_order<'c, E>(executor: E, row: OrderRow) -> Result<Order>
where
    E: PgExecutor<'c>,
{
    let mut items = fetch_items(executor, &[row.id]).await?;
    let order_items = items.remove(&row.id).unwrap_or_default();
    into_order(row, order_items)
}

fn into_order(row: OrderRow, items: Vec<OrderItem>) -> Result<Order> {
    row.into_domain(items)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
