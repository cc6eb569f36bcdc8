use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use simple_chat_backend::config::Settings;
use simple_chat_backend::inference::{LazyMistral, MODEL_ID};
use simple_chat_backend::store::MessageStore;
use simple_chat_backend::{api, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // -----------------------------
    // Logging
    // -----------------------------
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env();
    println!("🚀 Starting {} ...", settings.app_name);

    // -----------------------------
    // Shared state / Dependencies
    // -----------------------------
    // The model itself is loaded lazily on the first /generate call.
    let state = AppState {
        store: Arc::new(MessageStore::new()),
        infer: Arc::new(LazyMistral::new(MODEL_ID)),
    };

    // -----------------------------
    // Router + CORS for the frontend
    // -----------------------------
    let cors = if settings.allow_any_origin() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_headers(Any)
            .allow_methods(Any)
    } else {
        let origins: Vec<HeaderValue> = settings
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_headers(Any)
            .allow_methods(Any)
    };

    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .with_state(state);

    println!("🌐 HTTP listening on http://{}", settings.bind_addr);

    let listener = TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
