//! Inventory rules
//!
//! Available copies are never stored. They are derived on every read as the
//! owned total minus rentals still in status `RENTED`, so creating, deleting
//! or returning a rental changes availability without touching the game row.

use chrono::NaiveDate;
use shared::error::{AppError, ErrorCode, ServiceResult};
use shared::models::{GameStock, Rental, RentalCreate, RentalStatus};
use shared::util::today;
use sqlx::SqlitePool;

use crate::db;

/// A new rental needs a free copy unless it is recorded as already returned
pub fn ensure_rentable(stock: &GameStock, status: RentalStatus) -> Result<(), AppError> {
    if status == RentalStatus::Returned {
        return Ok(());
    }
    let available = stock.available_copies();
    if available <= 0 {
        return Err(AppError::with_message(
            ErrorCode::InsufficientStock,
            format!("No copies of '{}' available for rental", stock.game.title),
        )
        .with_detail("game_id", stock.game.id)
        .with_detail("available", available));
    }
    Ok(())
}

/// Return date stored for a status change
///
/// `RETURNED` keeps the supplied date or falls back to today; `RENTED`
/// always clears it.
pub fn return_date_for(status: RentalStatus, supplied: Option<NaiveDate>) -> Option<NaiveDate> {
    match status {
        RentalStatus::Returned => Some(supplied.unwrap_or_else(today)),
        RentalStatus::Rented => None,
    }
}

/// Register a rental after checking that both parties exist and a copy is free
pub async fn rent(pool: &SqlitePool, data: &RentalCreate) -> ServiceResult<Rental> {
    let mut tx = pool.begin().await?;

    if db::customer::find_by_id(&mut *tx, data.customer_id).await?.is_none() {
        return Err(AppError::not_found("Customer").into());
    }
    let stock = db::game::find_stock(&mut *tx, data.game_id)
        .await?
        .ok_or_else(|| AppError::not_found("Game"))?;
    ensure_rentable(&stock, data.status)?;

    let returned_on = (data.status == RentalStatus::Returned).then(today);
    let rental = db::rental::create(&mut *tx, data, returned_on).await?;
    tx.commit().await?;

    tracing::info!(
        rental_id = rental.id,
        game_id = rental.game_id,
        customer_id = rental.customer_id,
        status = rental.status.as_str(),
        "Rental created"
    );
    Ok(rental)
}

/// Change a rental's status, keeping the return date consistent with it
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: RentalStatus,
    returned_on: Option<NaiveDate>,
) -> ServiceResult<Rental> {
    let rental = db::rental::set_status(pool, id, status, return_date_for(status, returned_on))
        .await?
        .ok_or_else(|| AppError::not_found("Rental"))?;
    tracing::info!(rental_id = id, status = status.as_str(), "Rental status updated");
    Ok(rental)
}

/// Mark an open rental returned today
pub async fn mark_returned(pool: &SqlitePool, id: i64) -> ServiceResult<Rental> {
    let rental = db::rental::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Rental"))?;
    if rental.status == RentalStatus::Returned {
        return Err(AppError::new(ErrorCode::RentalAlreadyReturned)
            .with_detail("rental_id", id)
            .into());
    }
    update_status(pool, id, RentalStatus::Returned, None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;
    use shared::models::Game;

    fn game(total_copies: i64) -> Game {
        Game {
            id: 1,
            title: "Celeste".into(),
            genre: "Platformer".into(),
            release_year: 2018,
            platforms: "PC".into(),
            developer: "EXOK".into(),
            total_copies,
        }
    }

    #[test]
    fn test_ensure_rentable() {
        let stock = GameStock {
            game: game(1),
            active_rentals: 1,
        };
        let err = ensure_rentable(&stock, RentalStatus::Rented).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(ensure_rentable(&stock, RentalStatus::Returned).is_ok());
    }

    #[test]
    fn test_return_date_for() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
        assert_eq!(return_date_for(RentalStatus::Returned, Some(day)), Some(day));
        assert_eq!(return_date_for(RentalStatus::Returned, None), Some(today()));
        assert_eq!(return_date_for(RentalStatus::Rented, Some(day)), None);
    }

    #[tokio::test]
    async fn test_availability_follows_rental_lifecycle() {
        let pool = testing::pool().await;
        let game = testing::game(&pool, "Outer Wilds", 2).await;
        let customer = testing::customer(&pool, "314").await;
        let available = |pool: SqlitePool, id: i64| async move {
            db::game::find_stock(&pool, id)
                .await
                .unwrap()
                .unwrap()
                .available_copies()
        };
        assert_eq!(available(pool.clone(), game.id).await, 2);

        let data = RentalCreate {
            customer_id: customer.id,
            game_id: game.id,
            picked_up_on: today(),
            expected_return_on: None,
            status: RentalStatus::Rented,
        };
        let first = rent(&pool, &data).await.unwrap();
        assert_eq!(available(pool.clone(), game.id).await, 1);

        let returned = mark_returned(&pool, first.id).await.unwrap();
        assert_eq!(returned.returned_on, Some(today()));
        assert_eq!(available(pool.clone(), game.id).await, 2);

        let err: AppError = mark_returned(&pool, first.id).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::RentalAlreadyReturned);

        update_status(&pool, first.id, RentalStatus::Rented, Some(today()))
            .await
            .unwrap();
        assert_eq!(available(pool.clone(), game.id).await, 1);

        db::rental::delete(&pool, first.id).await.unwrap();
        assert_eq!(available(pool.clone(), game.id).await, 2);
    }

    #[tokio::test]
    async fn test_rent_rejects_when_no_copy_is_free() {
        let pool = testing::pool().await;
        let game = testing::game(&pool, "Inside", 1).await;
        let customer = testing::customer(&pool, "2718").await;
        let mut data = RentalCreate {
            customer_id: customer.id,
            game_id: game.id,
            picked_up_on: today(),
            expected_return_on: None,
            status: RentalStatus::Rented,
        };
        rent(&pool, &data).await.unwrap();

        let err: AppError = rent(&pool, &data).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        data.status = RentalStatus::Returned;
        let historic = rent(&pool, &data).await.unwrap();
        assert_eq!(historic.returned_on, Some(today()));
    }

    #[tokio::test]
    async fn test_rent_unknown_customer() {
        let pool = testing::pool().await;
        let game = testing::game(&pool, "Limbo", 1).await;
        let data = RentalCreate {
            customer_id: 77,
            game_id: game.id,
            picked_up_on: today(),
            expected_return_on: None,
            status: RentalStatus::Rented,
        };
        let err: AppError = rent(&pool, &data).await.unwrap_err().into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
