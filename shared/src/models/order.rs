//! Order Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status written on every order; no other state exists
pub const ORDER_COMPLETED: &str = "COMPLETED";

/// Completed purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub created_on: NaiveDate,
    pub status: String,
    #[serde(default)]
    #[cfg_attr(feature = "db", sqlx(skip))]
    pub lines: Vec<OrderLine>,
}

/// One game of an order; deleted together with its order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    #[serde(skip_serializing)]
    pub order_id: i64,
    pub game_id: i64,
    pub quantity: i64,
}

/// Order listing row for the HTML orders page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub id: i64,
    pub customer_name: String,
    pub created_on: NaiveDate,
    pub status: String,
    pub line_count: i64,
    pub total_quantity: i64,
}
