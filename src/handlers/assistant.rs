use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::SearchCriteria;
use crate::services::assistant::{handle_query, AssistantReply};
use crate::state::AppState;

// POST /api/assistant
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRequest {
    pub prompt: String,
    pub user_id: Option<i64>,
}

pub async fn assistant_query(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AssistantRequest>,
) -> Result<Json<AssistantReply>, AppError> {
    let prompt = non_empty_prompt(&body.prompt)?;
    let reply = handle_query(&state, prompt, body.user_id).await;
    Ok(Json(reply))
}

// POST /api/assistant/search
#[derive(Deserialize)]
pub struct SearchRequest {
    pub prompt: String,
}

pub async fn interpret_search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<SearchCriteria>, AppError> {
    let prompt = non_empty_prompt(&body.prompt)?;
    Ok(Json(state.interpreter.interpret_search(prompt).await))
}

fn non_empty_prompt(prompt: &str) -> Result<&str, AppError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::BadRequest("prompt is required".to_string()));
    }
    Ok(prompt)
}
