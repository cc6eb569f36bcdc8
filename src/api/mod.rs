use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub mod error;
pub mod handlers;
pub mod types;

use handlers::{create_message, generate, health, list_messages};

/// Versioned public API.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/messages",
            get(list_messages).post(create_message),
        )
        .route("/api/v1/generate", post(generate))
}
