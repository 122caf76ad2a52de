//! Order pages

use std::fmt::Write;

use axum::extract::{Path, State};
use axum::response::Response;
use shared::html::{escape, post_button};
use shared::session::Session;
use shared::AppError;

use super::{OrRedirect, PageResult, done, fail, page};
use crate::db;
use crate::state::AppState;

/// GET /orders
pub async fn list(State(state): State<AppState>, session: Session) -> PageResult {
    let orders = db::order::list_summaries(&state.pool).await.or_redirect(&session, "/")?;

    let mut body = String::from(
        "<table><tr><th>#</th><th>Customer</th><th>Date</th><th>Status</th><th>Lines</th><th>Copies</th><th></th></tr>",
    );
    for o in &orders {
        let _ = write!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            o.id,
            escape(&o.customer_name),
            o.created_on,
            escape(&o.status),
            o.line_count,
            o.total_quantity,
            post_button(&format!("/orders/{}/delete", o.id), "Delete"),
        );
    }
    body.push_str("</table>");
    Ok(page(session, "Orders", &body))
}

/// POST /orders/{id}/delete
///
/// Lines are removed with the order. Sold copies stay sold.
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    match db::order::delete(&state.pool, id).await {
        Ok(true) => {
            tracing::info!(order_id = id, "Order deleted");
            done(session, "Order removed successfully!", "/orders")
        }
        Ok(false) => fail(session, AppError::not_found("Order"), "/orders"),
        Err(e) => fail(session, AppError::from(e).context("removing order"), "/orders"),
    }
}
