//! Student Repository

use shared::error::ServiceResult;
use shared::models::Student;
use sqlx::{Any, AnyPool, Executor};

const COLUMNS: &str = "id, name, email, course, matriculation";

/// All students in registration order
pub async fn find_all(pool: &AnyPool) -> ServiceResult<Vec<Student>> {
    let rows = sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id<'e>(
    db: impl Executor<'e, Database = Any>,
    id: i64,
) -> ServiceResult<Option<Student>> {
    let row = sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Matriculation of the most recently inserted student of a course
pub async fn latest_matriculation<'e>(
    db: impl Executor<'e, Database = Any>,
    course: &str,
) -> ServiceResult<Option<String>> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT matriculation FROM students WHERE course = $1 ORDER BY id DESC LIMIT 1",
    )
    .bind(course)
    .fetch_optional(db)
    .await?;
    Ok(row.map(|(m,)| m))
}

/// Whether another student already uses `email`
pub async fn email_taken<'e>(
    db: impl Executor<'e, Database = Any>,
    email: &str,
    except_id: Option<i64>,
) -> ServiceResult<bool> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM students WHERE email = $1 AND id <> $2 LIMIT 1")
            .bind(email)
            .bind(except_id.unwrap_or(0))
            .fetch_optional(db)
            .await?;
    Ok(row.is_some())
}

pub async fn insert<'e>(
    db: impl Executor<'e, Database = Any>,
    name: &str,
    email: &str,
    course: &str,
    matriculation: &str,
) -> ServiceResult<Student> {
    let student = sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (name, email, course, matriculation) VALUES ($1, $2, $3, $4) \
         RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(email)
    .bind(course)
    .bind(matriculation)
    .fetch_one(db)
    .await?;
    Ok(student)
}

/// Overwrite every column of a student; `None` when the id is unknown
pub async fn update<'e>(
    db: impl Executor<'e, Database = Any>,
    id: i64,
    name: &str,
    email: &str,
    course: &str,
    matriculation: &str,
) -> ServiceResult<Option<Student>> {
    let student = sqlx::query_as::<_, Student>(&format!(
        "UPDATE students SET name = $1, email = $2, course = $3, matriculation = $4 \
         WHERE id = $5 RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(email)
    .bind(course)
    .bind(matriculation)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(student)
}

pub async fn delete(pool: &AnyPool, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM students WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
