//! Game pages

use std::fmt::Write;

use axum::Form;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;
use shared::html::{escape, input, post_button};
use shared::models::{Game, GameInput};
use shared::session::Session;
use shared::validation::{non_blank, parse_int, parse_positive_int};
use shared::{AppError, AppResult};

use super::{OrRedirect, PageResult, done, fail, page};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct GameForm {
    title: Option<String>,
    genre: Option<String>,
    release_year: Option<String>,
    platforms: Option<String>,
    developer: Option<String>,
    total_copies: Option<String>,
}

impl GameForm {
    fn parse(&self) -> AppResult<GameInput> {
        let fields = (
            non_blank(self.title.as_deref()),
            non_blank(self.genre.as_deref()),
            non_blank(self.release_year.as_deref()),
            non_blank(self.platforms.as_deref()),
            non_blank(self.developer.as_deref()),
            non_blank(self.total_copies.as_deref()),
        );
        let (Some(title), Some(genre), Some(year), Some(platforms), Some(developer), Some(copies)) =
            fields
        else {
            return Err(AppError::required("Fill in all fields."));
        };

        let numbers = parse_int(&year, "release_year")
            .and_then(|y| parse_positive_int(&copies, "total_copies").map(|c| (y, c)));
        let Ok((release_year, total_copies)) = numbers else {
            return Err(AppError::validation(
                "Release year and copies must be valid numbers.",
            ));
        };

        let input = GameInput {
            title,
            genre,
            release_year,
            platforms,
            developer,
            total_copies,
        };
        input.validate()?;
        Ok(input)
    }
}

fn form_body(action: &str, game: Option<&Game>) -> String {
    let [title, genre, year, platforms, developer, copies] = game
        .map(|g| {
            [
                g.title.clone(),
                g.genre.clone(),
                g.release_year.to_string(),
                g.platforms.clone(),
                g.developer.clone(),
                g.total_copies.to_string(),
            ]
        })
        .unwrap_or_default();
    let mut body = format!(r#"<form method="post" action="{action}">"#);
    body.push_str(&input("Title", "title", "text", &title));
    body.push_str(&input("Genre", "genre", "text", &genre));
    body.push_str(&input("Release year", "release_year", "number", &year));
    body.push_str(&input("Platforms", "platforms", "text", &platforms));
    body.push_str(&input("Developer", "developer", "text", &developer));
    body.push_str(&input("Total copies", "total_copies", "number", &copies));
    body.push_str(r#"<button type="submit">Save</button></form>"#);
    body
}

/// GET /games
pub async fn list(State(state): State<AppState>, session: Session) -> PageResult {
    let games = db::game::find_all(&state.pool).await.or_redirect(&session, "/")?;

    let mut body = String::from(
        r#"<p><a href="/games/new">New game</a></p>
<table><tr><th>Title</th><th>Genre</th><th>Year</th><th>Platforms</th><th>Developer</th><th>Copies</th><th>Available</th><th></th></tr>"#,
    );
    for stock in &games {
        let g = &stock.game;
        let _ = write!(
            body,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href="/games/{id}/edit">Edit</a> {}</td></tr>"#,
            escape(&g.title),
            escape(&g.genre),
            g.release_year,
            escape(&g.platforms),
            escape(&g.developer),
            g.total_copies,
            stock.available_copies(),
            post_button(&format!("/games/{}/delete", g.id), "Delete"),
            id = g.id,
        );
    }
    body.push_str("</table>");
    Ok(page(session, "Games", &body))
}

/// GET /games/new
pub async fn new_form(session: Session) -> Response {
    page(session, "New game", &form_body("/games/new", None))
}

/// POST /games/new
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<GameForm>,
) -> Response {
    let input = match form.parse() {
        Ok(input) => input,
        Err(e) => return fail(session, e, "/games/new"),
    };
    match db::game::create(&state.pool, &input).await {
        Ok(game) => {
            tracing::info!(game_id = game.id, title = %game.title, "Game created");
            done(session, "Game registered successfully!", "/games")
        }
        Err(e) => fail(session, AppError::from(e).context("registering game"), "/games/new"),
    }
}

/// GET /games/{id}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> PageResult {
    let Some(game) = db::game::find_by_id(&state.pool, id).await.or_redirect(&session, "/games")? else {
        return Ok(fail(session, AppError::not_found("Game"), "/games"));
    };
    let action = format!("/games/{id}/edit");
    Ok(page(session, "Edit game", &form_body(&action, Some(&game))))
}

/// POST /games/{id}/edit
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<GameForm>,
) -> Response {
    let back = format!("/games/{id}/edit");
    let input = match form.parse() {
        Ok(input) => input,
        Err(e) => return fail(session, e, &back),
    };
    match db::game::update(&state.pool, id, &input).await {
        Ok(Some(_)) => {
            tracing::info!(game_id = id, "Game updated");
            done(session, "Game updated successfully!", "/games")
        }
        Ok(None) => fail(session, AppError::not_found("Game"), "/games"),
        Err(e) => fail(session, AppError::from(e).context("updating game"), &back),
    }
}

/// POST /games/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    match db::game::delete(&state.pool, id).await {
        Ok(true) => {
            tracing::info!(game_id = id, "Game deleted");
            done(session, "Game removed successfully!", "/games")
        }
        Ok(false) => fail(session, AppError::not_found("Game"), "/games"),
        Err(e) => fail(session, AppError::from(e).context("removing game"), "/games"),
    }
}
