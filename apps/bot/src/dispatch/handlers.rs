//! Axum route handlers for the tool API.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::dispatch::Tool;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ToolCallResponse {
    pub tool: String,
    pub text: String,
}

/// GET /api/v1/tools
pub async fn handle_list_tools() -> Json<Vec<ToolInfo>> {
    Json(
        Tool::ALL
            .iter()
            .map(|tool| ToolInfo {
                name: tool.name(),
                description: tool.description(),
            })
            .collect(),
    )
}

/// POST /api/v1/tools/:name
///
/// The body is the tool's JSON argument object, read regardless of content type.
/// It may be omitted for tools without arguments; a body that is not JSON is a 400.
pub async fn handle_call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<ToolCallResponse>, AppError> {
    let args = parse_body(&body)?;
    let text = state.dispatcher.call(&name, args).await?;

    Ok(Json(ToolCallResponse { tool: name, text }))
}

fn parse_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Request body is not valid JSON: {e}")))
}
