//! HTTP route handlers for the chat service API.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::ChatError;
use crate::models::{
    ChatRequest, ChatResponse, ErrorInfo, ResponseContext, ResponseMetadata, ResponseStatus,
    SUPPORTED_PROVIDER,
};

use super::state::AppState;

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(handle_chat))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "chatgpt-service"
    }))
}

/// Handle a chat request: parse, validate, run the turn, shape the envelope.
///
/// Every path produces exactly one response. The turn runs under the
/// configured request timeout; elapsing it cancels the upstream call.
async fn handle_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> (StatusCode, Json<ChatResponse>) {
    let started = Instant::now();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_response(&ChatError::InvalidRequest(rejection.body_text()), "");
        }
    };

    if let Err(err) = request.validate() {
        return error_response(&err, &request.session_id);
    }

    let turn = tokio::time::timeout(
        state.config.request_timeout,
        state.chat.run_turn(
            &request.session_id,
            &request.agent_id,
            &request.user_id,
            &request.message,
            &state.config.default_model,
        ),
    )
    .await
    .map_err(|_| ChatError::Timeout)
    .and_then(|result| result);

    match turn {
        Ok(turn) => {
            let response = ChatResponse {
                response: turn.reply,
                session_id: request.session_id,
                conversation_id: turn.thread_id.clone(),
                status: ResponseStatus::Success,
                metadata: ResponseMetadata {
                    model: state.config.default_model.clone(),
                    tokens_used: 0,
                    processing_time: started.elapsed().as_secs_f64(),
                    provider: SUPPORTED_PROVIDER.to_string(),
                    cost: 0.0,
                    request_id: request.metadata.request_id,
                },
                error: None,
                context: Some(ResponseContext {
                    thread_id: turn.thread_id,
                    assistant_id: String::new(),
                    next_actions: Vec::new(),
                }),
            };
            (StatusCode::OK, Json(response))
        }
        Err(err) => {
            tracing::error!("Error processing chat: {err}");
            error_response(&err, &request.session_id)
        }
    }
}

/// Map an error to its HTTP status and response envelope.
fn error_response(err: &ChatError, session_id: &str) -> (StatusCode, Json<ChatResponse>) {
    let status = if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    let info = ErrorInfo::new(err.code(), error_summary(err.code()), err.to_string());
    (status, Json(ChatResponse::error(session_id, info)))
}

/// Fixed human-readable summary for each taxonomy code.
fn error_summary(code: &str) -> &'static str {
    match code {
        "invalid_request" => "Invalid request format",
        "validation_error" => "Request validation failed",
        _ => "Error processing chat request",
    }
}
