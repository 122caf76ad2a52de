//! store-server: game rental and shop
//!
//! - HTML flows for games, customers, rentals, orders and the shop cart
//! - JSON API for games, customers and customer orders under `/api`

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod db;
pub mod inventory;
pub mod state;
pub mod web;

use axum::Router;
use http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Default)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// CORS for the JSON API: any origin starting with the configured prefix
fn api_cors(prefix: &str) -> CorsLayer {
    let prefix = prefix.to_string();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            origin
                .to_str()
                .map(|o| o.starts_with(&prefix))
                .unwrap_or(false)
        }))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE])
}

/// Build the full application with middleware and state
pub fn build_app(state: AppState) -> Router {
    let api = api::router().layer(api_cors(&state.cors_origin_prefix));

    Router::new()
        .merge(web::router())
        .nest("/api", api)
        .with_state(state)
        // Trace - request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Copy the request ID onto the response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Request ID - outermost, so every inner layer sees it
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}
