use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::trace::TraceLayer;

use crate::{
    middleware::{catch_panic_layer, cors_layer, json_error_middleware},
    state::AppState,
};

pub mod categories;
pub mod index;
pub mod todos;
pub mod users;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(index::router())
        .merge(categories::router(state.clone()))
        .merge(todos::router(state.clone()))
        .merge(users::router(state))
}

/// The router wrapped in the error, panic, CORS and tracing layers.
pub fn build_app(state: Arc<AppState>) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.cors)?;
    Ok(router(state)
        .layer(middleware::from_fn(json_error_middleware))
        .layer(catch_panic_layer())
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
