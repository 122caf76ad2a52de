//! Rental Repository

use chrono::NaiveDate;
use shared::error::ServiceResult;
use shared::models::{Rental, RentalCreate, RentalRow, RentalStatus};
use sqlx::{SqliteExecutor, SqlitePool};

const RENTAL_COLUMNS: &str =
    "id, customer_id, game_id, picked_up_on, expected_return_on, returned_on, status";

const ROW_SELECT: &str = "SELECT r.id, r.customer_id, r.game_id, r.picked_up_on, r.expected_return_on, \
     r.returned_on, r.status, c.name AS customer_name, g.title AS game_title \
     FROM rentals r \
     JOIN customers c ON c.id = r.customer_id \
     JOIN games g ON g.id = r.game_id";

/// Listing rows, most recent pickup first
pub async fn find_all_rows(pool: &SqlitePool) -> ServiceResult<Vec<RentalRow>> {
    let rows = sqlx::query_as::<_, RentalRow>(&format!(
        "{ROW_SELECT} ORDER BY r.picked_up_on DESC, r.id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> ServiceResult<Option<Rental>> {
    let row = sqlx::query_as::<_, Rental>(&format!(
        "SELECT {RENTAL_COLUMNS} FROM rentals WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Insert a rental; `returned_on` is only set for a rental recorded as already returned
pub async fn create(
    db: impl SqliteExecutor<'_>,
    data: &RentalCreate,
    returned_on: Option<NaiveDate>,
) -> ServiceResult<Rental> {
    let rental = sqlx::query_as::<_, Rental>(&format!(
        "INSERT INTO rentals (customer_id, game_id, picked_up_on, expected_return_on, returned_on, status) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING {RENTAL_COLUMNS}"
    ))
    .bind(data.customer_id)
    .bind(data.game_id)
    .bind(data.picked_up_on)
    .bind(data.expected_return_on)
    .bind(returned_on)
    .bind(data.status)
    .fetch_one(db)
    .await?;
    Ok(rental)
}

/// Overwrite status and actual return date together
pub async fn set_status(
    db: impl SqliteExecutor<'_>,
    id: i64,
    status: RentalStatus,
    returned_on: Option<NaiveDate>,
) -> ServiceResult<Option<Rental>> {
    let rental = sqlx::query_as::<_, Rental>(&format!(
        "UPDATE rentals SET status = ?, returned_on = ? WHERE id = ? RETURNING {RENTAL_COLUMNS}"
    ))
    .bind(status)
    .bind(returned_on)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(rental)
}

pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM rentals WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_rows_most_recent_first() {
        let pool = testing::pool().await;
        let game = testing::game(&pool, "Portal", 5).await;
        let customer = testing::customer(&pool, "42").await;

        for day in ["2024-03-01", "2024-05-01", "2024-04-01"] {
            let data = RentalCreate {
                customer_id: customer.id,
                game_id: game.id,
                picked_up_on: date(day),
                expected_return_on: None,
                status: RentalStatus::Rented,
            };
            create(&pool, &data, None).await.unwrap();
        }

        let rows = find_all_rows(&pool).await.unwrap();
        let days: Vec<_> = rows.iter().map(|r| r.rental.picked_up_on).collect();
        assert_eq!(days, [date("2024-05-01"), date("2024-04-01"), date("2024-03-01")]);
        assert_eq!(rows[0].game_title, "Portal");
        assert_eq!(rows[0].customer_name, customer.name);
    }

    #[tokio::test]
    async fn test_set_status_roundtrip() {
        let pool = testing::pool().await;
        let game = testing::game(&pool, "Braid", 1).await;
        let customer = testing::customer(&pool, "7").await;
        let data = RentalCreate {
            customer_id: customer.id,
            game_id: game.id,
            picked_up_on: date("2024-01-10"),
            expected_return_on: Some(date("2024-01-20")),
            status: RentalStatus::Rented,
        };
        let rental = create(&pool, &data, None).await.unwrap();
        assert_eq!(rental.status, RentalStatus::Rented);
        assert_eq!(rental.expected_return_on, Some(date("2024-01-20")));

        let returned = set_status(&pool, rental.id, RentalStatus::Returned, Some(date("2024-01-15")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(returned.status, RentalStatus::Returned);
        assert_eq!(returned.returned_on, Some(date("2024-01-15")));

        assert_eq!(find_all_rows(&pool).await.unwrap().len(), 1);
        assert!(delete(&pool, rental.id).await.unwrap());
        assert!(find_by_id(&pool, rental.id).await.unwrap().is_none());
    }
}
