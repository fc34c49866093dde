//! Tool dispatch by name
//!
//! Dispatch never fails: every problem (unknown tool, bad arguments, tool
//! error) is logged and folded into an empty result map, which the agent
//! loop turns into an explicit error turn.

use crate::errors::Result;
use crate::tools::registry::{ToolCatalog, ToolRegistry};
use crate::tools::types::Tool;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Key of the successful dispatch envelope
pub const RESULT_KEY: &str = "result";

/// Tool catalog plus resolved implementations
#[derive(Clone)]
pub struct ToolsDispatcher {
    catalog: ToolCatalog,
    registry: ToolRegistry,
}

impl ToolsDispatcher {
    pub fn new(catalog: ToolCatalog, registry: ToolRegistry) -> Self {
        Self { catalog, registry }
    }

    /// Load the catalog file and resolve it against `implementations`
    pub fn from_config(path: &Path, implementations: Vec<Arc<dyn Tool>>) -> Result<Self> {
        let catalog = ToolCatalog::load(path)?;
        let registry = ToolRegistry::resolve(&catalog, implementations);
        Ok(Self::new(catalog, registry))
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Catalog entries rendered for the system prompt
    pub fn catalog_json(&self) -> String {
        serde_json::to_string_pretty(self.catalog.entries()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Call a tool; `{"result": ...}` on success, `{}` on any failure
    pub async fn call(&self, name: &str, arguments: &Map<String, Value>) -> Map<String, Value> {
        let Some(tool) = self.registry.get(name) else {
            error!(tool = %name, "Function not registered");
            return Map::new();
        };

        info!(tool = %name, "Calling tool");
        match tool.call(arguments.clone()).await {
            Ok(result) => {
                info!(tool = %name, result = %result, "Tool returned");
                let mut envelope = Map::new();
                envelope.insert(RESULT_KEY.to_string(), result);
                envelope
            }
            Err(e) => {
                error!(tool = %name, error = %e, "Tool call failed");
                Map::new()
            }
        }
    }

    /// Validate a raw `{function, arguments}` request, then call
    pub async fn parse_and_call(&self, request: &Value) -> Map<String, Value> {
        let Some(request) = request.as_object() else {
            error!("Tool request is not an object");
            return Map::new();
        };
        let Some(function) = request.get("function").and_then(Value::as_str) else {
            error!("Tool request function name is missing or not a string");
            return Map::new();
        };

        let empty = Map::new();
        let arguments = match request.get("arguments") {
            None | Some(Value::Null) => &empty,
            Some(Value::Object(arguments)) => arguments,
            Some(_) => {
                error!(tool = %function, "Tool request arguments are not an object");
                return Map::new();
            }
        };

        self.call(function, arguments).await
    }
}
