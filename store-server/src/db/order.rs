//! Order Repository

use chrono::NaiveDate;
use shared::error::ServiceResult;
use shared::models::{ORDER_COMPLETED, Order, OrderLine, OrderSummary};
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};

pub async fn create(
    db: impl SqliteExecutor<'_>,
    customer_id: i64,
    created_on: NaiveDate,
) -> ServiceResult<Order> {
    let order = sqlx::query_as::<_, Order>(
        "INSERT INTO orders (customer_id, created_on, status) VALUES (?, ?, ?) \
         RETURNING id, customer_id, created_on, status",
    )
    .bind(customer_id)
    .bind(created_on)
    .bind(ORDER_COMPLETED)
    .fetch_one(db)
    .await?;
    Ok(order)
}

pub async fn add_line(
    db: impl SqliteExecutor<'_>,
    order_id: i64,
    game_id: i64,
    quantity: i64,
) -> ServiceResult<OrderLine> {
    let line = sqlx::query_as::<_, OrderLine>(
        "INSERT INTO order_lines (order_id, game_id, quantity) VALUES (?, ?, ?) \
         RETURNING id, order_id, game_id, quantity",
    )
    .bind(order_id)
    .bind(game_id)
    .bind(quantity)
    .fetch_one(db)
    .await?;
    Ok(line)
}

/// Orders of one customer with their lines, oldest first
pub async fn find_by_customer(pool: &SqlitePool, customer_id: i64) -> ServiceResult<Vec<Order>> {
    let mut orders = sqlx::query_as::<_, Order>(
        "SELECT id, customer_id, created_on, status FROM orders WHERE customer_id = ? ORDER BY id",
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    if orders.is_empty() {
        return Ok(orders);
    }

    let mut qb = QueryBuilder::<Sqlite>::new(
        "SELECT id, order_id, game_id, quantity FROM order_lines WHERE order_id IN (",
    );
    let mut separated = qb.separated(", ");
    for order in &orders {
        separated.push_bind(order.id);
    }
    separated.push_unseparated(") ORDER BY id");
    let lines = qb.build_query_as::<OrderLine>().fetch_all(pool).await?;

    for line in lines {
        if let Some(order) = orders.iter_mut().find(|o| o.id == line.order_id) {
            order.lines.push(line);
        }
    }
    Ok(orders)
}

/// All orders for the listing page, newest first
pub async fn list_summaries(pool: &SqlitePool) -> ServiceResult<Vec<OrderSummary>> {
    let rows = sqlx::query_as::<_, OrderSummary>(
        "SELECT o.id, c.name AS customer_name, o.created_on, o.status, \
         COUNT(l.id) AS line_count, COALESCE(SUM(l.quantity), 0) AS total_quantity \
         FROM orders o \
         JOIN customers c ON c.id = o.customer_id \
         LEFT JOIN order_lines l ON l.order_id = o.id \
         GROUP BY o.id, c.name, o.created_on, o.status \
         ORDER BY o.created_on DESC, o.id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Delete an order; its lines go with it, sold copies are not restored
pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}
