//! Customer Repository

use shared::error::ServiceResult;
use shared::models::{Customer, CustomerInput};
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn find_all(pool: &SqlitePool) -> ServiceResult<Vec<Customer>> {
    let rows = sqlx::query_as::<_, Customer>(
        "SELECT id, name, phone, national_id, address FROM customers ORDER BY name, id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> ServiceResult<Option<Customer>> {
    let row = sqlx::query_as::<_, Customer>(
        "SELECT id, name, phone, national_id, address FROM customers WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Insert a customer; a duplicate `national_id` fails on the unique index
pub async fn create(db: impl SqliteExecutor<'_>, data: &CustomerInput) -> ServiceResult<Customer> {
    let customer = sqlx::query_as::<_, Customer>(
        "INSERT INTO customers (name, phone, national_id, address) VALUES (?, ?, ?, ?) \
         RETURNING id, name, phone, national_id, address",
    )
    .bind(data.name.trim())
    .bind(data.phone.trim())
    .bind(data.national_id.trim())
    .bind(data.address.trim())
    .fetch_one(db)
    .await?;
    Ok(customer)
}

pub async fn update(
    db: impl SqliteExecutor<'_>,
    id: i64,
    data: &CustomerInput,
) -> ServiceResult<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(
        "UPDATE customers SET name = ?, phone = ?, national_id = ?, address = ? WHERE id = ? \
         RETURNING id, name, phone, national_id, address",
    )
    .bind(data.name.trim())
    .bind(data.phone.trim())
    .bind(data.national_id.trim())
    .bind(data.address.trim())
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(customer)
}

/// Hard delete; rentals and orders referencing the customer block it
pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM customers WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;
    use shared::error::{AppError, ErrorCode};

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let pool = testing::pool().await;
        let mut bob = CustomerInput {
            name: "Bob".into(),
            phone: "1".into(),
            national_id: "111".into(),
            address: "Street".into(),
        };
        create(&pool, &bob).await.unwrap();
        bob.name = "Alice".into();
        bob.national_id = "222".into();
        create(&pool, &bob).await.unwrap();

        let names: Vec<_> = find_all(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Alice", "Bob"]);
    }

    #[tokio::test]
    async fn test_duplicate_national_id_is_constraint_error() {
        let pool = testing::pool().await;
        let existing = testing::customer(&pool, "123").await;

        let dup = CustomerInput {
            name: "Other".into(),
            phone: "2".into(),
            national_id: existing.national_id.clone(),
            address: "Elsewhere".into(),
        };
        let err = create(&pool, &dup).await.unwrap_err();
        assert!(err.is_unique_violation());
        let err: AppError = err.into();
        assert_eq!(err.code, ErrorCode::ConstraintViolation);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = testing::pool().await;
        let customer = testing::customer(&pool, "555").await;

        let input = CustomerInput {
            name: "Renamed".into(),
            phone: customer.phone.clone(),
            national_id: customer.national_id.clone(),
            address: customer.address.clone(),
        };
        let updated = update(&pool, customer.id, &input).await.unwrap().unwrap();
        assert_eq!(updated.name, "Renamed");

        assert!(delete(&pool, customer.id).await.unwrap());
        assert!(find_by_id(&pool, customer.id).await.unwrap().is_none());
    }
}
