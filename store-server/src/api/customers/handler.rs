//! Customer API Handlers

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use http::StatusCode;
use serde_json::{Map, Value};
use shared::models::{Customer, CustomerInput, CustomerPatch, Order};
use shared::validation::json_text;
use shared::{AppError, AppResult};

use crate::api::{MessageResponse, object_body, require_fields};
use crate::db::{customer, order};
use crate::state::AppState;

const REQUIRED: [&str; 4] = ["name", "phone", "national_id", "address"];

fn patch_from(body: &Map<String, Value>) -> AppResult<CustomerPatch> {
    let text = |field: &str| body.get(field).map(|v| json_text(v, field)).transpose();
    Ok(CustomerPatch {
        name: text("name")?,
        phone: text("phone")?,
        national_id: text("national_id")?,
        address: text("address")?,
    })
}

async fn find(state: &AppState, id: i64) -> AppResult<Customer> {
    let found = customer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))?;
    Ok(found)
}

/// GET /api/customers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    Ok(Json(customer::find_all(&state.pool).await?))
}

/// GET /api/customers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    Ok(Json(find(&state, id).await?))
}

/// POST /api/customers
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let body = object_body(body)?;
    require_fields(&body, &REQUIRED)?;
    let patch = patch_from(&body)?;
    let input = CustomerInput {
        name: patch.name.unwrap_or_default(),
        phone: patch.phone.unwrap_or_default(),
        national_id: patch.national_id.unwrap_or_default(),
        address: patch.address.unwrap_or_default(),
    };
    input.validate()?;

    let created = customer::create(&state.pool, &input)
        .await
        .map_err(|e| AppError::from(e).context("saving customer"))?;
    tracing::info!(customer_id = created.id, "Customer created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/customers/{id} - partial update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<Customer>> {
    let existing = find(&state, id).await?;
    let body = object_body(body)?;
    let input = patch_from(&body)?.apply(&existing);
    input.validate()?;

    let updated = customer::update(&state.pool, id, &input)
        .await
        .map_err(|e| AppError::from(e).context("updating customer"))?
        .ok_or_else(|| AppError::not_found("Customer"))?;
    tracing::info!(customer_id = id, "Customer updated");
    Ok(Json(updated))
}

/// DELETE /api/customers/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = customer::delete(&state.pool, id)
        .await
        .map_err(|e| AppError::from(e).context("removing customer"))?;
    if !deleted {
        return Err(AppError::not_found("Customer"));
    }
    tracing::info!(customer_id = id, "Customer deleted");
    Ok(MessageResponse::new("Customer deleted successfully"))
}

/// GET /api/customers/{id}/orders
pub async fn orders(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Order>>> {
    find(&state, id).await?;
    Ok(Json(order::find_by_customer(&state.pool, id).await?))
}
