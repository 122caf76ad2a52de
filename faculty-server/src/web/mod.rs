//! HTML flows
//!
//! Post/redirect/get throughout: outcomes travel to the next page as
//! session flash messages.

mod student;

use axum::Router;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use shared::AppError;
use shared::html::Site;
use shared::session::Session;

use crate::state::AppState;

pub(crate) const SITE: Site = Site {
    name: "Faculty",
    nav: &[("/", "Home"), ("/students", "Students"), ("/students/new", "Register")],
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/students", get(student::list))
        .route("/students/new", get(student::new_form).post(student::create))
        .route(
            "/students/{id}/edit",
            get(student::edit_form).post(student::update),
        )
        .route("/students/{id}/delete", post(student::delete))
}

pub(crate) fn page(mut session: Session, title: &str, body: &str) -> Response {
    let flashes = session.take_flashes();
    (session, SITE.page(title, &flashes, body)).into_response()
}

pub(crate) fn done(mut session: Session, message: &str, to: &str) -> Response {
    session.success(message);
    (session, Redirect::to(to)).into_response()
}

pub(crate) fn fail(mut session: Session, err: AppError, to: &str) -> Response {
    tracing::debug!(code = %err.code, message = %err.message, "Form rejected");
    session.error(err.message);
    (session, Redirect::to(to)).into_response()
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
    page(
        session,
        "Student registration",
        r#"<p><a href="/students/new">Register a student</a> or browse the <a href="/students">student list</a>.</p>"#,
    )
}
