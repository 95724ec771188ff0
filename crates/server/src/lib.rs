#![forbid(unsafe_code)]

pub mod config;
pub mod error;
mod handlers;
mod pages;
pub mod render;
mod state;

pub use config::Config;
pub use error::AppError;
pub use state::AppState;

use axum::Router;
use axum::routing::{delete, get, post};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::list_projects))
        .route("/health", get(handlers::health))
        .route("/projects/new", post(handlers::create_project))
        .route(
            "/projects",
            get(handlers::project_page).delete(handlers::delete_project),
        )
        .route("/api/graph", get(handlers::graph_json))
        .route("/store", post(handlers::store_triple))
        .route("/remove", delete(handlers::remove_pair))
        .route("/rename", post(handlers::rename_activity))
        .route("/delete", post(handlers::delete_activity))
        .route("/flip", get(handlers::flip))
        .with_state(state)
}
