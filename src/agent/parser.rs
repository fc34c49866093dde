//! Model reply → directive
//!
//! Accepts either a chat-completion envelope
//! (`choices[0].message.content`, string or object) or a bare tool-call
//! document with a `function` key. Anything else is `Invalid`. Failures are
//! logged, never raised.

use crate::types::ModelDirective;
use serde_json::Value;
use tracing::{debug, error};

/// Content of the first choice, when the envelope has one
pub fn message_content(response: &Value) -> Option<&Value> {
    response
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")
        .filter(|content| !content.is_null())
}

/// Content as transcript text; objects are stringified
pub fn content_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Classify one raw model response
pub fn parse_directive(response: &Value) -> ModelDirective {
    if !response.is_object() {
        error!("Model response is not an object");
        return ModelDirective::Invalid(Value::Null);
    }

    if response.get("choices").is_some() {
        let Some(content) = message_content(response) else {
            error!("Model response has no message content");
            return ModelDirective::Invalid(Value::Null);
        };

        return match content {
            Value::String(text) => match serde_json::from_str::<Value>(text.trim()) {
                Ok(parsed) => ModelDirective::from_value(parsed),
                Err(e) => {
                    error!(error = %e, "Model content is not valid JSON");
                    ModelDirective::Invalid(Value::Null)
                }
            },
            other => ModelDirective::from_value(other.clone()),
        };
    }

    if response.get("function").is_some() {
        return ModelDirective::from_value(response.clone());
    }

    debug!("Model response matched no known shape");
    ModelDirective::Invalid(Value::Null)
}
