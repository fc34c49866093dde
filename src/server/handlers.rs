//! Endpoint handlers

use crate::server::response::{self, ResponseCode};
use crate::server::AppContext;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// Validated `/process` input
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ProcessInput {
    Text(String),
    Missing,
    Invalid,
}

/// Extract and trim `text` from a request body.
///
/// Unparsable or non-object bodies count as `{}`.
pub(crate) fn read_text(body: &[u8]) -> ProcessInput {
    let object = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => object,
        _ => Map::new(),
    };

    match object.get("text") {
        None | Some(Value::Null) => ProcessInput::Missing,
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                ProcessInput::Invalid
            } else {
                ProcessInput::Text(text.to_string())
            }
        }
        Some(_) => ProcessInput::Invalid,
    }
}

/// GET /ping
pub async fn ping() -> Json<Value> {
    Json(json!({"status": ResponseCode::Success.text()}))
}

/// POST /process
pub async fn process(State(ctx): State<Arc<AppContext>>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("process", %request_id);

    async move {
        info!("Received request");

        let text = match read_text(&body) {
            ProcessInput::Text(text) => text,
            ProcessInput::Missing => {
                debug!("Missing 'text' field");
                return response::validation_error(
                    "Field 'text' is required",
                    json!({"missing_field": "text"}),
                );
            }
            ProcessInput::Invalid => {
                debug!("Empty or non-string 'text' field");
                return response::validation_error(
                    "'text' field can not be empty",
                    json!({"field": "text"}),
                );
            }
        };

        info!(text = %text, "Sending request to model");
        match ctx.requester.answer(&text).await {
            Ok(answer) => {
                info!(
                    iterations = answer.iterations,
                    tool_calls = answer.tool_calls,
                    "Request processed"
                );
                response::success("Text processed successfully", Value::String(answer.text))
            }
            Err(e) => {
                error!(error = %e, "Request failed");
                response::internal_error()
            }
        }
    }
    .instrument(span)
    .await
}

/// Fallback for unknown routes
pub async fn not_found() -> impl IntoResponse {
    response::not_found()
}
