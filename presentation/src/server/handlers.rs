//! Request handlers for the chat, models and health routes

use super::{AppState, error::ApiError};
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use fiesta_domain::{Message, ModelDef, ProviderKey, ResponseRecord, model_catalog};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub providers: Vec<ProviderKey>,
}

pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ResponseRecord>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        warn!("Rejected chat request: {}", rejection.body_text());
        ApiError::from(rejection)
    })?;
    debug!("POST /api/chat ({} messages)", request.messages.len());

    let responses = state.use_case.execute_messages(request.messages).await?;
    info!(
        "Chat answered: {} ok, {} failed",
        responses.successes(),
        responses.failures()
    );
    Ok(Json(ResponseRecord::from(responses)))
}

pub async fn models() -> Json<&'static [ModelDef]> {
    Json(model_catalog())
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        providers: state.use_case.provider_keys(),
    })
}
