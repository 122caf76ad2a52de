//! Rental pages

use std::fmt::Write;

use axum::Form;
use axum::extract::{Path, State};
use axum::response::Response;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::html::{escape, input, post_button, select};
use shared::models::{RentalCreate, RentalStatus};
use shared::session::Session;
use shared::util::{parse_date, parse_optional_date};
use shared::validation::{non_blank, parse_int};
use shared::{AppError, AppResult, ErrorCode};

use super::{OrRedirect, PageResult, done, fail, page, redirect};
use crate::db;
use crate::inventory;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RentalForm {
    customer_id: Option<String>,
    game_id: Option<String>,
    picked_up_on: Option<String>,
    expected_return_on: Option<String>,
    status: Option<String>,
}

impl RentalForm {
    fn parse(&self) -> AppResult<RentalCreate> {
        let (Some(customer), Some(game), Some(picked_up)) = (
            non_blank(self.customer_id.as_deref()),
            non_blank(self.game_id.as_deref()),
            non_blank(self.picked_up_on.as_deref()),
        ) else {
            return Err(AppError::required(
                "Fill in customer, game and pickup date.",
            ));
        };
        let (Ok(customer_id), Ok(game_id)) = (
            parse_int(&customer, "customer_id"),
            parse_int(&game, "game_id"),
        ) else {
            return Err(AppError::validation("Invalid customer or game."));
        };
        let picked_up_on = parse_date(&picked_up, "pickup date")?;
        let expected_return_on =
            parse_optional_date(self.expected_return_on.as_deref(), "expected return date")?;

        Ok(RentalCreate {
            customer_id,
            game_id,
            picked_up_on,
            expected_return_on,
            status: RentalStatus::from_form(self.status.as_deref()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RentalEditForm {
    status: Option<String>,
    returned_on: Option<String>,
}

impl RentalEditForm {
    fn parse(&self) -> AppResult<(RentalStatus, Option<NaiveDate>)> {
        let status = RentalStatus::from_form(self.status.as_deref());
        let returned_on = match status {
            RentalStatus::Returned => {
                parse_optional_date(self.returned_on.as_deref(), "return date")?
            }
            RentalStatus::Rented => None,
        };
        Ok((status, returned_on))
    }
}

fn status_options() -> Vec<(String, String)> {
    [RentalStatus::Rented, RentalStatus::Returned]
        .iter()
        .map(|s| (s.as_str().to_string(), s.as_str().to_string()))
        .collect()
}

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_default()
}

/// GET /rentals
pub async fn list(State(state): State<AppState>, session: Session) -> PageResult {
    let rows = db::rental::find_all_rows(&state.pool).await.or_redirect(&session, "/")?;

    let mut body = String::from(
        r#"<p><a href="/rentals/new">New rental</a></p>
<table><tr><th>Customer</th><th>Game</th><th>Picked up</th><th>Expected return</th><th>Returned</th><th>Status</th><th></th></tr>"#,
    );
    for row in &rows {
        let r = &row.rental;
        let mut actions = format!(r#"<a href="/rentals/{}/edit">Edit</a> "#, r.id);
        if r.status == RentalStatus::Rented {
            actions.push_str(&post_button(&format!("/rentals/{}/return", r.id), "Return"));
        }
        actions.push_str(&post_button(&format!("/rentals/{}/delete", r.id), "Delete"));
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{actions}</td></tr>",
            escape(&row.customer_name),
            escape(&row.game_title),
            r.picked_up_on,
            date_text(r.expected_return_on),
            date_text(r.returned_on),
            r.status.as_str(),
        );
    }
    body.push_str("</table>");
    Ok(page(session, "Rentals", &body))
}

/// GET /rentals/new
pub async fn new_form(State(state): State<AppState>, session: Session) -> PageResult {
    let customers = db::customer::find_all(&state.pool).await.or_redirect(&session, "/rentals")?;
    let games = db::game::find_all(&state.pool).await.or_redirect(&session, "/rentals")?;

    let customer_options: Vec<_> = customers
        .iter()
        .map(|c| (c.id.to_string(), c.name.clone()))
        .collect();
    let game_options: Vec<_> = games
        .iter()
        .map(|s| {
            (
                s.game.id.to_string(),
                format!("{} ({} available)", s.game.title, s.available_copies()),
            )
        })
        .collect();

    let mut body = String::from(r#"<form method="post" action="/rentals/new">"#);
    body.push_str(&select("Customer", "customer_id", &customer_options, ""));
    body.push_str(&select("Game", "game_id", &game_options, ""));
    body.push_str(&input(
        "Pickup date",
        "picked_up_on",
        "date",
        &shared::util::today().to_string(),
    ));
    body.push_str(&input("Expected return", "expected_return_on", "date", ""));
    body.push_str(&select(
        "Status",
        "status",
        &status_options(),
        RentalStatus::Rented.as_str(),
    ));
    body.push_str(r#"<button type="submit">Save</button></form>"#);
    Ok(page(session, "New rental", &body))
}

/// POST /rentals/new
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RentalForm>,
) -> Response {
    let data = match form.parse() {
        Ok(data) => data,
        Err(e) => return fail(session, e, "/rentals/new"),
    };
    match inventory::rent(&state.pool, &data).await {
        Ok(_) => done(session, "Rental registered successfully!", "/rentals"),
        Err(e) => fail(
            session,
            AppError::from(e).context("registering rental"),
            "/rentals/new",
        ),
    }
}

/// GET /rentals/{id}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> PageResult {
    let Some(rental) = db::rental::find_by_id(&state.pool, id).await.or_redirect(&session, "/rentals")? else {
        return Ok(fail(session, AppError::not_found("Rental"), "/rentals"));
    };

    let mut body = format!(
        "<p>Picked up on {}, expected back {}.</p>",
        rental.picked_up_on,
        rental
            .expected_return_on
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into())
    );
    let _ = write!(body, r#"<form method="post" action="/rentals/{id}/edit">"#);
    body.push_str(&select(
        "Status",
        "status",
        &status_options(),
        rental.status.as_str(),
    ));
    body.push_str(&input(
        "Returned on",
        "returned_on",
        "date",
        &date_text(rental.returned_on),
    ));
    body.push_str(r#"<button type="submit">Save</button></form>"#);
    Ok(page(session, "Edit rental", &body))
}

/// POST /rentals/{id}/edit
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<RentalEditForm>,
) -> Response {
    let (status, returned_on) = match form.parse() {
        Ok(parsed) => parsed,
        Err(e) => return fail(session, e, &format!("/rentals/{id}/edit")),
    };
    match inventory::update_status(&state.pool, id, status, returned_on).await {
        Ok(_) => done(session, "Rental updated successfully!", "/rentals"),
        Err(e) => fail(
            session,
            AppError::from(e).context("updating rental"),
            "/rentals",
        ),
    }
}

/// POST /rentals/{id}/return
pub async fn mark_returned(
    State(state): State<AppState>,
    mut session: Session,
    Path(id): Path<i64>,
) -> Response {
    match inventory::mark_returned(&state.pool, id).await {
        Ok(_) => done(session, "Return registered successfully!", "/rentals"),
        Err(e) => {
            let err = AppError::from(e);
            if err.code == ErrorCode::RentalAlreadyReturned {
                session.info("This rental is already marked as returned.");
                return redirect(session, "/rentals");
            }
            fail(session, err.context("registering return"), "/rentals")
        }
    }
}

/// POST /rentals/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    match db::rental::delete(&state.pool, id).await {
        Ok(true) => {
            tracing::info!(rental_id = id, "Rental deleted");
            done(session, "Rental removed successfully!", "/rentals")
        }
        Ok(false) => fail(session, AppError::not_found("Rental"), "/rentals"),
        Err(e) => fail(
            session,
            AppError::from(e).context("removing rental"),
            "/rentals",
        ),
    }
}
