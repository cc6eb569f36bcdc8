use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::api::error::ApiError;
use crate::api::types::{GenerateRequest, GenerateResponse, MessageCreate};
use crate::inference::{strip_prompt_echo, GenerationParams};
use crate::model::message::Message;
use crate::AppState;

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn list_messages(State(state): State<AppState>) -> Json<Vec<Message>> {
    Json(state.store.list().await)
}

pub async fn create_message(
    State(state): State<AppState>,
    Json(payload): Json<MessageCreate>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    payload.validate()?;

    let message = state.store.create(payload.text).await;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    req.validate()?;

    let params = GenerationParams {
        max_length: req.max_length,
        temperature: req.temperature,
    };
    info!(
        max_length = req.max_length,
        temperature = req.temperature,
        "generate request"
    );

    let raw = state.infer.generate(&req.prompt, &params).await?;
    let generated_text = strip_prompt_echo(&req.prompt, &raw);

    Ok(Json(GenerateResponse {
        generated_text,
        prompt: req.prompt,
    }))
}
