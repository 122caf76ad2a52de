//! Customer pages

use std::fmt::Write;

use axum::Form;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;
use shared::html::{escape, input, post_button};
use shared::models::{Customer, CustomerInput};
use shared::session::Session;
use shared::validation::non_blank;
use shared::{AppError, AppResult};

use super::{OrRedirect, PageResult, done, fail, page};
use crate::db;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CustomerForm {
    name: Option<String>,
    phone: Option<String>,
    national_id: Option<String>,
    address: Option<String>,
}

impl CustomerForm {
    fn parse(&self) -> AppResult<CustomerInput> {
        let (Some(name), Some(phone), Some(national_id), Some(address)) = (
            non_blank(self.name.as_deref()),
            non_blank(self.phone.as_deref()),
            non_blank(self.national_id.as_deref()),
            non_blank(self.address.as_deref()),
        ) else {
            return Err(AppError::required("Fill in all fields."));
        };
        let input = CustomerInput {
            name,
            phone,
            national_id,
            address,
        };
        input.validate()?;
        Ok(input)
    }
}

fn form_body(action: &str, customer: Option<&Customer>) -> String {
    let (name, phone, national_id, address) = customer
        .map(|c| {
            (
                c.name.as_str(),
                c.phone.as_str(),
                c.national_id.as_str(),
                c.address.as_str(),
            )
        })
        .unwrap_or_default();
    let mut body = format!(r#"<form method="post" action="{action}">"#);
    body.push_str(&input("Name", "name", "text", name));
    body.push_str(&input("Phone", "phone", "text", phone));
    body.push_str(&input("National ID", "national_id", "text", national_id));
    body.push_str(&input("Address", "address", "text", address));
    body.push_str(r#"<button type="submit">Save</button></form>"#);
    body
}

/// GET /customers
pub async fn list(State(state): State<AppState>, session: Session) -> PageResult {
    let customers = db::customer::find_all(&state.pool).await.or_redirect(&session, "/")?;

    let mut body = String::from(
        r#"<p><a href="/customers/new">New customer</a></p>
<table><tr><th>Name</th><th>Phone</th><th>National ID</th><th>Address</th><th></th></tr>"#,
    );
    for c in &customers {
        let _ = write!(
            body,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href="/customers/{id}/edit">Edit</a> {}</td></tr>"#,
            escape(&c.name),
            escape(&c.phone),
            escape(&c.national_id),
            escape(&c.address),
            post_button(&format!("/customers/{}/delete", c.id), "Delete"),
            id = c.id,
        );
    }
    body.push_str("</table>");
    Ok(page(session, "Customers", &body))
}

/// GET /customers/new
pub async fn new_form(session: Session) -> Response {
    page(session, "New customer", &form_body("/customers/new", None))
}

/// POST /customers/new
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CustomerForm>,
) -> Response {
    let input = match form.parse() {
        Ok(input) => input,
        Err(e) => return fail(session, e, "/customers/new"),
    };
    match db::customer::create(&state.pool, &input).await {
        Ok(customer) => {
            tracing::info!(customer_id = customer.id, "Customer created");
            done(session, "Customer registered successfully!", "/customers")
        }
        Err(e) => fail(
            session,
            AppError::from(e).context("registering customer"),
            "/customers/new",
        ),
    }
}

/// GET /customers/{id}/edit
pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> PageResult {
    let Some(customer) = db::customer::find_by_id(&state.pool, id).await.or_redirect(&session, "/customers")? else {
        return Ok(fail(session, AppError::not_found("Customer"), "/customers"));
    };
    let action = format!("/customers/{id}/edit");
    Ok(page(session, "Edit customer", &form_body(&action, Some(&customer))))
}

/// POST /customers/{id}/edit
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
    Form(form): Form<CustomerForm>,
) -> Response {
    let back = format!("/customers/{id}/edit");
    let input = match form.parse() {
        Ok(input) => input,
        Err(e) => return fail(session, e, &back),
    };
    match db::customer::update(&state.pool, id, &input).await {
        Ok(Some(_)) => {
            tracing::info!(customer_id = id, "Customer updated");
            done(session, "Customer updated successfully!", "/customers")
        }
        Ok(None) => fail(session, AppError::not_found("Customer"), "/customers"),
        Err(e) => fail(session, AppError::from(e).context("updating customer"), &back),
    }
}

/// POST /customers/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i64>,
) -> Response {
    match db::customer::delete(&state.pool, id).await {
        Ok(true) => {
            tracing::info!(customer_id = id, "Customer deleted");
            done(session, "Customer removed successfully!", "/customers")
        }
        Ok(false) => fail(session, AppError::not_found("Customer"), "/customers"),
        Err(e) => fail(
            session,
            AppError::from(e).context("removing customer"),
            "/customers",
        ),
    }
}
