//! Question relay endpoints: echo, fixed demo question, and ask-agent.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use relay_agent::{DispatchError, TextMessage};

use crate::state::AppState;

use super::ErrorResponse;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct QuestionRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AgentResponses {
    pub responses: Vec<TextMessage>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Client mistakes are 400; anything from the agent service is 500.
fn dispatch_error(e: DispatchError) -> ApiError {
    let status = match e {
        DispatchError::EmptyQuestion | DispatchError::NoAgent => StatusCode::BAD_REQUEST,
        DispatchError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %e, "agent relay failed");
    }
    (status, Json(ErrorResponse { error: e.to_string() }))
}

/// Body rejections keep axum's status but use the `{"error": ...}` shape.
fn body_error(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection.body_text(), "rejected request body");
    (rejection.status(), Json(ErrorResponse { error: rejection.body_text() }))
}

async fn relay(state: &AppState, question: &str) -> Result<Json<AgentResponses>, ApiError> {
    let responses = state.dispatcher.ask(question).await.map_err(dispatch_error)?;
    Ok(Json(AgentResponses { responses }))
}

/// Echo the posted question
#[utoipa::path(
    post,
    path = "/test",
    tag = "Relay",
    request_body = QuestionRequest,
    responses((status = 200, description = "The question, echoed under `Test`", body = Object))
)]
pub async fn test_echo(
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(body) = payload.map_err(body_error)?;
    let question = body.get("question").cloned().unwrap_or(serde_json::Value::Null);
    Ok(Json(serde_json::json!({ "Test": question })))
}

/// Relay the configured demo question
#[utoipa::path(
    get,
    path = "/test2",
    tag = "Relay",
    responses(
        (status = 200, description = "Agent replies", body = AgentResponses),
        (status = 400, description = "No question or no agent", body = ErrorResponse),
        (status = 500, description = "Agent service failure", body = ErrorResponse)
    )
)]
pub async fn test_fixed_question(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AgentResponses>, ApiError> {
    relay(&state, &state.config.demo.question).await
}

/// Classify a question and relay it to the matching agent
#[utoipa::path(
    post,
    path = "/ask-agent",
    tag = "Relay",
    request_body = QuestionRequest,
    responses(
        (status = 200, description = "Agent replies", body = AgentResponses),
        (status = 400, description = "No question, no agent, or malformed body", body = ErrorResponse),
        (status = 422, description = "Body does not match `QuestionRequest`", body = ErrorResponse),
        (status = 500, description = "Agent service failure", body = ErrorResponse)
    )
)]
pub async fn ask_agent(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QuestionRequest>, JsonRejection>,
) -> Result<Json<AgentResponses>, ApiError> {
    let Json(req) = payload.map_err(body_error)?;
    let question = req.question.unwrap_or_default();
    relay(&state, &question).await
}
