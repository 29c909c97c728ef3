use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_url_handler, delete_url_handler, health_handler, issue_token_handler,
    list_urls_handler, redirect_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/healthz", get(health_handler))
            .route("/api/token", post(issue_token_handler))
            .route(
                "/api/urls",
                post(create_url_handler).get(list_urls_handler),
            )
            .route("/api/urls/{code}", axum::routing::delete(delete_url_handler))
            // Public redirect, registered last so API routes win.
            .route("/{code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
