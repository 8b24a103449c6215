//! mindscreen-api
//!
//! HTTP binding over the screening engine. Loads the instrument registry once
//! at startup and serves scoring, interpretation, safety checks and severity
//! comparison as JSON.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/instruments", get(routes::instruments::list_instruments))
        .route(
            "/instruments/{id}",
            get(routes::instruments::get_instrument_detail),
        )
        .route(
            "/instruments/{id}/score",
            post(routes::scoring::score_responses),
        )
        .route(
            "/instruments/{id}/interpret",
            post(routes::scoring::interpret_score),
        )
        .route("/instruments/{id}/assess", post(routes::scoring::assess))
        .route("/safety", post(routes::safety::check_safety))
        .route("/compare", post(routes::compare::compare_severity))
        .layer(axum_mw::from_fn(middleware::request_log))
        .layer(cors)
        .with_state(state)
}
