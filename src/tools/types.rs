//! Tool declarations and the callable seam

use crate::errors::{AgentError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declarative description of a tool, as listed in the tool catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool name (unique key)
    pub name: String,

    /// Human readable description shown to the model
    #[serde(default)]
    pub description: String,

    /// JSON schema of the arguments
    #[serde(default)]
    pub parameters: Value,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A callable tool.
///
/// Implementations bind `arguments` strictly: unknown names, missing
/// required values and type mismatches are `ToolDispatchFailure`.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the tool is registered under
    fn name(&self) -> &'static str;

    /// Run the tool with named arguments
    async fn call(&self, arguments: Map<String, Value>) -> Result<Value>;
}

/// Deserialize named arguments into a typed parameter struct
pub fn bind_arguments<T: DeserializeOwned>(tool: &str, arguments: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(arguments)).map_err(|e| AgentError::tool(tool, e.to_string()))
}
