//! Rental Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Rental status, stored as upper-case text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum RentalStatus {
    #[default]
    Rented,
    Returned,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Rented => "RENTED",
            RentalStatus::Returned => "RETURNED",
        }
    }

    /// Parse form input; anything but `RETURNED` means an open rental
    pub fn from_form(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("RETURNED") => RentalStatus::Returned,
            _ => RentalStatus::Rented,
        }
    }
}

/// A customer borrowing one copy of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Rental {
    pub id: i64,
    pub customer_id: i64,
    pub game_id: i64,
    pub picked_up_on: NaiveDate,
    pub expected_return_on: Option<NaiveDate>,
    pub returned_on: Option<NaiveDate>,
    pub status: RentalStatus,
}

/// Rental with the names needed by the listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RentalRow {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub rental: Rental,
    pub customer_name: String,
    pub game_title: String,
}

/// Validated rental creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalCreate {
    pub customer_id: i64,
    pub game_id: i64,
    pub picked_up_on: NaiveDate,
    pub expected_return_on: Option<NaiveDate>,
    pub status: RentalStatus,
}
