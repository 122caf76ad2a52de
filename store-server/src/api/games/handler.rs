//! Game API Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use http::StatusCode;
use serde_json::{Map, Value};
use shared::models::{GameInput, GamePatch, GameView};
use shared::validation::{json_int, json_text};
use shared::{AppError, AppResult};

use crate::api::{MessageResponse, object_body, require_fields};
use crate::db::game;
use crate::state::AppState;

const REQUIRED: [&str; 6] = [
    "title",
    "genre",
    "release_year",
    "platforms",
    "developer",
    "total_copies",
];

fn text(body: &Map<String, Value>, field: &str) -> AppResult<Option<String>> {
    body.get(field).map(|v| json_text(v, field)).transpose()
}

fn year(body: &Map<String, Value>) -> AppResult<Option<i64>> {
    body.get("release_year")
        .map(|v| json_int(v, "release_year"))
        .transpose()
}

fn copies(body: &Map<String, Value>) -> AppResult<Option<i64>> {
    match body.get("total_copies") {
        None => Ok(None),
        Some(v) => match json_int(v, "total_copies") {
            Ok(n) if n > 0 => Ok(Some(n)),
            _ => Err(AppError::validation(
                "total_copies must be a positive integer",
            )),
        },
    }
}

fn patch_from(body: &Map<String, Value>) -> AppResult<GamePatch> {
    Ok(GamePatch {
        title: text(body, "title")?,
        genre: text(body, "genre")?,
        release_year: year(body)?,
        platforms: text(body, "platforms")?,
        developer: text(body, "developer")?,
        total_copies: copies(body)?,
    })
}

async fn view(state: &AppState, id: i64) -> AppResult<GameView> {
    let stock = game::find_stock(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Game"))?;
    Ok(stock.into())
}

/// GET /api/games
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<GameView>>> {
    let games = game::find_all(&state.pool).await?;
    Ok(Json(games.into_iter().map(GameView::from).collect()))
}

/// GET /api/games/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<GameView>> {
    Ok(Json(view(&state, id).await?))
}

/// POST /api/games
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<GameView>)> {
    let body = object_body(body)?;
    require_fields(&body, &REQUIRED)?;

    let release_year = year(&body).ok().flatten();
    let total_copies = copies(&body).ok().flatten();
    let (Some(release_year), Some(total_copies)) = (release_year, total_copies) else {
        return Err(AppError::validation(
            "release_year and total_copies must be valid integers",
        ));
    };
    let patch = patch_from(&body)?;
    let input = GameInput {
        title: patch.title.unwrap_or_default(),
        genre: patch.genre.unwrap_or_default(),
        release_year,
        platforms: patch.platforms.unwrap_or_default(),
        developer: patch.developer.unwrap_or_default(),
        total_copies,
    };
    input.validate()?;

    let created = game::create(&state.pool, &input)
        .await
        .map_err(|e| AppError::from(e).context("saving game"))?;
    tracing::info!(game_id = created.id, title = %created.title, "Game created");

    Ok((StatusCode::CREATED, Json(view(&state, created.id).await?)))
}

/// PUT /api/games/{id} - partial update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<GameView>> {
    let existing = game::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Game"))?;

    let body = object_body(body)?;
    // An incoming total_copies is already checked by `copies`
    let input = patch_from(&body)?.apply(&existing);
    input.validate_text()?;

    game::update(&state.pool, id, &input)
        .await
        .map_err(|e| AppError::from(e).context("updating game"))?
        .ok_or_else(|| AppError::not_found("Game"))?;
    tracing::info!(game_id = id, "Game updated");

    Ok(Json(view(&state, id).await?))
}

/// DELETE /api/games/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = game::delete(&state.pool, id)
        .await
        .map_err(|e| AppError::from(e).context("deleting game"))?;
    if !deleted {
        return Err(AppError::not_found("Game"));
    }
    tracing::info!(game_id = id, "Game deleted");
    Ok(MessageResponse::new("Game deleted successfully"))
}
