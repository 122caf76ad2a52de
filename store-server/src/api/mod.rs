//! JSON API
//!
//! CRUD for games and customers plus the read-only list of a customer's
//! orders. Bodies are parsed leniently: numeric fields take JSON numbers or
//! numeric strings, and every failure is answered with `{"error", "code"}`.

mod customers;
mod games;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use serde::Serialize;
use serde_json::{Map, Value};
use shared::{AppError, AppResult};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/games", games::router())
        .nest("/customers", customers::router())
}

/// Body of a successful DELETE
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// Unwrap a JSON object body, turning malformed input into a 400
pub(crate) fn object_body(body: Result<Json<Value>, JsonRejection>) -> AppResult<Map<String, Value>> {
    match body {
        Ok(Json(Value::Object(map))) => Ok(map),
        Ok(Json(_)) => Err(AppError::invalid_request("Request body must be a JSON object")),
        Err(rejection) => Err(AppError::invalid_request(rejection.body_text())),
    }
}

/// Fail unless every field in `fields` is present
pub(crate) fn require_fields(body: &Map<String, Value>, fields: &[&str]) -> AppResult<()> {
    if fields.iter().all(|f| body.contains_key(*f)) {
        return Ok(());
    }
    Err(AppError::required(format!("Required fields: {}", fields.join(", "))))
}
