//! Shop, cart and checkout pages

use std::fmt::Write;

use axum::Form;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;
use shared::html::{escape, post_button, select};
use shared::session::Session;
use shared::validation::{non_blank, parse_int};
use shared::{AppError, ErrorCode};

use super::{OrRedirect, PageResult, done, fail, page};
use crate::cart::CartStore;
use crate::checkout::checkout as place_order;
use crate::db;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AddForm {
    quantity: Option<String>,
}

impl AddForm {
    /// Missing or unparsable quantities count as one; the cart coerces the rest
    fn quantity(&self) -> i64 {
        non_blank(self.quantity.as_deref())
            .and_then(|q| parse_int(&q, "quantity").ok())
            .unwrap_or(1)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    customer_id: Option<String>,
}

/// GET /shop
pub async fn shop(State(state): State<AppState>, session: Session) -> PageResult {
    let games = db::game::find_all(&state.pool).await.or_redirect(&session, "/")?;
    let cart = session.load_cart();

    let mut body = format!(
        r#"<p><a href="/cart">Cart ({} items)</a></p>
<table><tr><th>Title</th><th>Platforms</th><th>Available</th><th>In cart</th><th></th></tr>"#,
        cart.total_quantity()
    );
    for stock in &games {
        let g = &stock.game;
        let _ = write!(
            body,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><form class="inline" method="post" action="/cart/add/{}"><input type="number" name="quantity" value="1" min="1"> <button type="submit">Add to cart</button></form></td></tr>"#,
            escape(&g.title),
            escape(&g.platforms),
            stock.available_copies(),
            cart.quantity(g.id),
            g.id,
        );
    }
    body.push_str("</table>");
    Ok(page(session, "Shop", &body))
}

/// GET /cart
pub async fn cart(State(state): State<AppState>, session: Session) -> PageResult {
    let cart = session.load_cart();
    if cart.is_empty() {
        let body = r#"<p>Your cart is empty. <a href="/shop">Back to the shop</a></p>"#;
        return Ok(page(session, "Cart", body));
    }
    let games = db::game::find_stock_many(&state.pool, &cart.game_ids()).await.or_redirect(&session, "/shop")?;

    let mut body = String::from(
        "<table><tr><th>Game</th><th>Quantity</th><th>Available</th><th></th></tr>",
    );
    for (game_id, quantity) in cart.iter() {
        let (title, available) = match games.iter().find(|s| s.game.id == game_id) {
            Some(stock) => (escape(&stock.game.title), stock.available_copies().to_string()),
            None => (format!("Game #{game_id} (no longer exists)"), "-".to_string()),
        };
        let _ = write!(
            body,
            "<tr><td>{title}</td><td>{quantity}</td><td>{available}</td><td>{}</td></tr>",
            post_button(&format!("/cart/remove/{game_id}"), "Remove"),
        );
    }
    body.push_str(r#"</table><p><a href="/cart/checkout">Checkout</a></p>"#);
    Ok(page(session, "Cart", &body))
}

/// POST /cart/add/{game_id}
pub async fn add(
    mut session: Session,
    Path(game_id): Path<i64>,
    Form(form): Form<AddForm>,
) -> Response {
    let mut cart = session.load_cart();
    let total = cart.add(game_id, form.quantity());
    if let Err(e) = session.save_cart(&cart) {
        return fail(session, e, "/shop");
    }
    tracing::debug!(game_id, total, "Added to cart");
    done(session, "Game added to cart.", "/shop")
}

/// POST /cart/remove/{game_id}
pub async fn remove(mut session: Session, Path(game_id): Path<i64>) -> Response {
    let mut cart = session.load_cart();
    if !cart.remove(game_id) {
        return fail(session, AppError::new(ErrorCode::CartItemNotFound), "/cart");
    }
    if let Err(e) = session.save_cart(&cart) {
        return fail(session, e, "/cart");
    }
    done(session, "Item removed from cart.", "/cart")
}

/// GET /cart/checkout
pub async fn checkout_form(State(state): State<AppState>, session: Session) -> PageResult {
    let cart = session.load_cart();
    if cart.is_empty() {
        return Ok(fail(session, AppError::new(ErrorCode::CartEmpty), "/shop"));
    }

    let customers = db::customer::find_all(&state.pool).await.or_redirect(&session, "/cart")?;
    let mut options = vec![(String::new(), "Select a customer".to_string())];
    options.extend(
        customers
            .iter()
            .map(|c| (c.id.to_string(), format!("{} ({})", c.name, c.national_id))),
    );

    let mut body = format!(
        r#"<p>{} item(s) in the cart.</p><form method="post" action="/cart/checkout">"#,
        cart.total_quantity()
    );
    body.push_str(&select("Customer", "customer_id", &options, ""));
    body.push_str(r#"<button type="submit">Place order</button></form>"#);
    Ok(page(session, "Checkout", &body))
}

/// POST /cart/checkout
///
/// The cart is cleared only once the order is committed.
pub async fn checkout(
    State(state): State<AppState>,
    mut session: Session,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let mut cart = session.load_cart();
    if cart.is_empty() {
        return fail(session, AppError::new(ErrorCode::CartEmpty), "/shop");
    }

    let Some(raw_id) = non_blank(form.customer_id.as_deref()) else {
        return fail(
            session,
            AppError::required("Select a customer to complete the purchase."),
            "/cart/checkout",
        );
    };
    let Ok(customer_id) = parse_int(&raw_id, "customer_id") else {
        return fail(session, AppError::validation("Invalid customer."), "/cart/checkout");
    };

    match place_order(&state.pool, &cart, customer_id).await {
        Ok(order) => {
            cart.clear();
            if let Err(e) = session.save_cart(&cart) {
                return fail(session, e, "/shop");
            }
            tracing::info!(order_id = order.id, "Order placed from cart");
            done(session, "Purchase completed successfully!", "/shop")
        }
        Err(e) => {
            let err = AppError::from(e);
            let back = match err.code {
                ErrorCode::InsufficientStock => "/cart",
                ErrorCode::CartEmpty => "/shop",
                _ => "/cart/checkout",
            };
            fail(session, err.context("completing purchase"), back)
        }
    }
}
