//! HTML flows
//!
//! Every mutating form follows post/redirect/get: the outcome is stored as a
//! flash message in the session and shown by the page redirected to.

mod customer;
mod game;
mod order;
mod rental;
mod shop;

use axum::Router;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use shared::AppError;
use shared::html::Site;
use shared::session::Session;

use crate::state::AppState;

pub(crate) const SITE: Site = Site {
    name: "Game Store",
    nav: &[
        ("/", "Home"),
        ("/games", "Games"),
        ("/customers", "Customers"),
        ("/rentals", "Rentals"),
        ("/shop", "Shop"),
        ("/cart", "Cart"),
        ("/orders", "Orders"),
    ],
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        // Games
        .route("/games", get(game::list))
        .route("/games/new", get(game::new_form).post(game::create))
        .route("/games/{id}/edit", get(game::edit_form).post(game::update))
        .route("/games/{id}/delete", post(game::delete))
        // Customers
        .route("/customers", get(customer::list))
        .route("/customers/new", get(customer::new_form).post(customer::create))
        .route(
            "/customers/{id}/edit",
            get(customer::edit_form).post(customer::update),
        )
        .route("/customers/{id}/delete", post(customer::delete))
        // Shop and cart
        .route("/shop", get(shop::shop))
        .route("/cart", get(shop::cart))
        .route("/cart/add/{game_id}", post(shop::add))
        .route("/cart/remove/{game_id}", post(shop::remove))
        .route(
            "/cart/checkout",
            get(shop::checkout_form).post(shop::checkout),
        )
        // Rentals
        .route("/rentals", get(rental::list))
        .route("/rentals/new", get(rental::new_form).post(rental::create))
        .route("/rentals/{id}/edit", get(rental::edit_form).post(rental::update))
        .route("/rentals/{id}/delete", post(rental::delete))
        .route("/rentals/{id}/return", post(rental::mark_returned))
        // Orders
        .route("/orders", get(order::list))
        .route("/orders/{id}/delete", post(order::delete))
}

/// Render a page, consuming pending flash messages
pub(crate) fn page(mut session: Session, title: &str, body: &str) -> Response {
    let flashes = session.take_flashes();
    (session, SITE.page(title, &flashes, body)).into_response()
}

pub(crate) fn redirect(session: Session, to: &str) -> Response {
    (session, Redirect::to(to)).into_response()
}

/// Flash a success message and redirect
pub(crate) fn done(mut session: Session, message: &str, to: &str) -> Response {
    session.success(message);
    redirect(session, to)
}

/// Flash an error and redirect
pub(crate) fn fail(mut session: Session, err: AppError, to: &str) -> Response {
    tracing::debug!(code = %err.code, message = %err.message, "Form rejected");
    session.error(err.message);
    redirect(session, to)
}

/// A page that could not be loaded; answered like a rejected form
pub(crate) struct PageError {
    session: Session,
    err: AppError,
    to: &'static str,
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        fail(self.session, self.err.context("loading page"), self.to)
    }
}

pub(crate) type PageResult = Result<Response, PageError>;

/// Attach the session and a fallback location to a failed page load
pub(crate) trait OrRedirect<T> {
    fn or_redirect(self, session: &Session, to: &'static str) -> Result<T, PageError>;
}

impl<T, E: Into<AppError>> OrRedirect<T> for Result<T, E> {
    fn or_redirect(self, session: &Session, to: &'static str) -> Result<T, PageError> {
        self.map_err(|e| PageError {
            session: session.clone(),
            err: e.into(),
            to,
        })
    }
}

async fn index(session: Session) -> Response {
    let body = r#"<p>Manage the catalogue, customers and rentals, or sell games through the shop.</p>
<ul>
<li><a href="/games">Games</a></li>
<li><a href="/customers">Customers</a></li>
<li><a href="/rentals">Rentals</a></li>
<li><a href="/shop">Shop</a></li>
<li><a href="/orders">Orders</a></li>
</ul>"#;
    page(session, "Welcome", body)
}
