//! Game Repository

use shared::error::{AppError, ErrorCode, ServiceResult};
use shared::models::{Game, GameInput, GameStock};
use sqlx::{QueryBuilder, Sqlite, SqliteExecutor, SqlitePool};

const STOCK_SELECT: &str = "SELECT g.id, g.title, g.genre, g.release_year, g.platforms, g.developer, g.total_copies, \
     (SELECT COUNT(*) FROM rentals r WHERE r.game_id = g.id AND r.status = 'RENTED') AS active_rentals \
     FROM games g";

/// All games with their active rental count, ordered by title
pub async fn find_all(pool: &SqlitePool) -> ServiceResult<Vec<GameStock>> {
    let rows = sqlx::query_as::<_, GameStock>(&format!("{STOCK_SELECT} ORDER BY g.title, g.id"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_stock(db: impl SqliteExecutor<'_>, id: i64) -> ServiceResult<Option<GameStock>> {
    let row = sqlx::query_as::<_, GameStock>(&format!("{STOCK_SELECT} WHERE g.id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Load several games in one query; unknown ids are simply absent
pub async fn find_stock_many(
    db: impl SqliteExecutor<'_>,
    ids: &[i64],
) -> ServiceResult<Vec<GameStock>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut qb = QueryBuilder::<Sqlite>::new(STOCK_SELECT);
    qb.push(" WHERE g.id IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY g.title, g.id");
    let rows = qb.build_query_as::<GameStock>().fetch_all(db).await?;
    Ok(rows)
}

pub async fn find_by_id(db: impl SqliteExecutor<'_>, id: i64) -> ServiceResult<Option<Game>> {
    let row = sqlx::query_as::<_, Game>(
        "SELECT id, title, genre, release_year, platforms, developer, total_copies FROM games WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn create(db: impl SqliteExecutor<'_>, data: &GameInput) -> ServiceResult<Game> {
    let game = sqlx::query_as::<_, Game>(
        "INSERT INTO games (title, genre, release_year, platforms, developer, total_copies) \
         VALUES (?, ?, ?, ?, ?, ?) \
         RETURNING id, title, genre, release_year, platforms, developer, total_copies",
    )
    .bind(&data.title)
    .bind(&data.genre)
    .bind(data.release_year)
    .bind(&data.platforms)
    .bind(&data.developer)
    .bind(data.total_copies)
    .fetch_one(db)
    .await?;
    Ok(game)
}

/// Replace every column; `None` when the game does not exist
pub async fn update(
    db: impl SqliteExecutor<'_>,
    id: i64,
    data: &GameInput,
) -> ServiceResult<Option<Game>> {
    let game = sqlx::query_as::<_, Game>(
        "UPDATE games SET title = ?, genre = ?, release_year = ?, platforms = ?, developer = ?, total_copies = ? \
         WHERE id = ? \
         RETURNING id, title, genre, release_year, platforms, developer, total_copies",
    )
    .bind(&data.title)
    .bind(&data.genre)
    .bind(data.release_year)
    .bind(&data.platforms)
    .bind(&data.developer)
    .bind(data.total_copies)
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(game)
}

/// Hard delete; fails with a constraint error while rentals or order lines reference the game
pub async fn delete(db: impl SqliteExecutor<'_>, id: i64) -> ServiceResult<bool> {
    let rows = sqlx::query("DELETE FROM games WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Remove sold copies from the owned total
///
/// Never clamps: if the total would drop below zero the statement matches
/// nothing and the caller gets an `InventoryInvariant` error to roll back on.
pub async fn remove_copies(db: impl SqliteExecutor<'_>, id: i64, quantity: i64) -> ServiceResult<()> {
    let rows = sqlx::query(
        "UPDATE games SET total_copies = total_copies - ? WHERE id = ? AND total_copies >= ?",
    )
    .bind(quantity)
    .bind(id)
    .bind(quantity)
    .execute(db)
    .await?;
    if rows.rows_affected() == 0 {
        tracing::error!(game_id = id, quantity, "Sale would make total copies negative");
        return Err(AppError::new(ErrorCode::InventoryInvariant)
            .with_detail("game_id", id)
            .with_detail("quantity", quantity)
            .into());
    }
    Ok(())
}
