//! Cart checkout
//!
//! Turns a cart into one completed order inside a single transaction:
//! stock is checked for every line before anything is written, and the sale
//! of each line removes the sold copies from the game's total. Any failure
//! rolls the whole transaction back and leaves the cart untouched.

use shared::error::{AppError, ErrorCode, ServiceResult};
use shared::models::{GameStock, Order};
use shared::util::today;
use sqlx::SqlitePool;

use crate::cart::Cart;
use crate::db;

/// One cart entry that passed the stock check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    pub game_id: i64,
    pub title: String,
    pub quantity: i64,
}

/// Match cart entries against loaded stock
///
/// Entries for games that no longer exist are skipped. The first entry
/// asking for more than is available aborts the plan.
pub fn plan(cart: &Cart, stocks: &[GameStock]) -> Result<Vec<CheckoutLine>, AppError> {
    let mut lines = Vec::new();
    for (game_id, quantity) in cart.iter() {
        let Some(stock) = stocks.iter().find(|s| s.game.id == game_id) else {
            tracing::warn!(game_id, "Skipping cart entry for missing game");
            continue;
        };
        let available = stock.available_copies();
        if available < quantity {
            return Err(AppError::with_message(
                ErrorCode::InsufficientStock,
                format!(
                    "Not enough stock of '{}' (available: {available})",
                    stock.game.title
                ),
            )
            .with_detail("game_id", game_id)
            .with_detail("requested", quantity)
            .with_detail("available", available));
        }
        lines.push(CheckoutLine {
            game_id,
            title: stock.game.title.clone(),
            quantity,
        });
    }
    if lines.is_empty() {
        return Err(AppError::new(ErrorCode::CartEmpty));
    }
    Ok(lines)
}

/// Place an order for `customer_id` with everything in `cart`
pub async fn checkout(pool: &SqlitePool, cart: &Cart, customer_id: i64) -> ServiceResult<Order> {
    if cart.is_empty() {
        return Err(AppError::new(ErrorCode::CartEmpty).into());
    }

    let mut tx = pool.begin().await?;

    if db::customer::find_by_id(&mut *tx, customer_id).await?.is_none() {
        return Err(AppError::not_found("Customer").into());
    }

    let stocks = db::game::find_stock_many(&mut *tx, &cart.game_ids()).await?;
    let lines = plan(cart, &stocks)?;

    let mut order = db::order::create(&mut *tx, customer_id, today()).await?;
    for line in &lines {
        let order_line = db::order::add_line(&mut *tx, order.id, line.game_id, line.quantity).await?;
        db::game::remove_copies(&mut *tx, line.game_id, line.quantity).await?;
        order.lines.push(order_line);
    }

    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        customer_id,
        lines = order.lines.len(),
        "Checkout completed"
    );
    Ok(order)
}
