//! # acme_api
//!
//! HTTP sign-in API for Acme.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use acme_core::auth::UserStore;
use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{auth, health};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Where users are looked up by email.
    pub users: Arc<dyn UserStore>,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, config: ApiConfig) -> Self {
        Self { users, config }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_API_HEALTH, get(health::health_handler))
        .route(
            routes::POST_AUTH_CALLBACK_CREDENTIALS,
            post(auth::sign_in_handler),
        )
        .route(routes::POST_AUTH_SIGNOUT, post(auth::sign_out_handler))
        .route(routes::GET_AUTH_SESSION, get(auth::session_handler));

    // Protected routes (require a session)
    let protected = Router::new()
        .route(routes::GET_AUTH_ME, get(auth::me_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
