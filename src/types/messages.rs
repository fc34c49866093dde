//! Message types for agent communication
//!
//! Defines the transcript turns exchanged with the chat model and the
//! directive parsed out of each model reply.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of the chat transcript, serialized in chat-completion shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Intent of one model reply
#[derive(Debug, Clone, PartialEq)]
pub enum ModelDirective {
    /// Model requests tool execution
    ToolCall {
        function: String,
        arguments: Map<String, Value>,
    },

    /// Final user-facing answer
    FinalAnswer { text: String },

    /// Reply matched neither format. Carries whatever structured value was
    /// recovered (`Value::Null` when nothing parsed).
    Invalid(Value),
}

impl ModelDirective {
    /// Classify an already-decoded reply document.
    ///
    /// `text` wins over `function` when both are present.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut object) = value else {
            return ModelDirective::Invalid(value);
        };

        if let Some(Value::String(text)) = object.get("text") {
            return ModelDirective::FinalAnswer { text: text.clone() };
        }

        let function = match object.get("function") {
            Some(Value::String(name)) => name.clone(),
            _ => return ModelDirective::Invalid(Value::Object(object)),
        };

        match object.remove("arguments") {
            None | Some(Value::Null) => ModelDirective::ToolCall {
                function,
                arguments: Map::new(),
            },
            Some(Value::Object(arguments)) => ModelDirective::ToolCall {
                function,
                arguments,
            },
            Some(other) => {
                object.insert("arguments".to_string(), other);
                ModelDirective::Invalid(Value::Object(object))
            }
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, ModelDirective::FinalAnswer { .. })
    }
}
