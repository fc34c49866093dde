//! Tool catalog loading and name → implementation resolution
//!
//! The catalog file is a JSON array of
//! `{"type": "function", "function": {"name", "description", "parameters"}}`
//! entries. Entries that are not functions, or whose name has no
//! implementation, are dropped with a warning.

use crate::errors::{AgentError, Result};
use crate::tools::types::{Tool, ToolSpec};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Eligible catalog entries, kept both parsed and raw
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    specs: Vec<ToolSpec>,
    entries: Vec<Value>,
}

impl ToolCatalog {
    /// Read the catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AgentError::ConfigError(format!(
                "Tools config file not found: {} ({})",
                path.display(),
                e
            ))
        })?;
        let value: Value = serde_json::from_str(&contents).map_err(|e| {
            AgentError::ConfigError(format!(
                "Failed to parse tools config {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_value(value)
    }

    /// Build from an already parsed document
    pub fn from_value(value: Value) -> Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            _ => {
                return Err(AgentError::ConfigError(
                    "Tools config is not a list".to_string(),
                ))
            }
        };

        let mut catalog = Self::default();
        for item in items {
            if item.get("type").and_then(Value::as_str) != Some("function") {
                warn!(item = %item, "Skipped wrong tools config item");
                continue;
            }
            let Some(function) = item.get("function").filter(|f| f.is_object()) else {
                warn!(item = %item, "Function definition missing in tools config item");
                continue;
            };
            let spec = match serde_json::from_value::<ToolSpec>(function.clone()) {
                Ok(spec) => spec,
                Err(e) => {
                    warn!(item = %item, error = %e, "Invalid function definition");
                    continue;
                }
            };

            catalog.specs.push(spec);
            catalog.entries.push(item);
        }
        Ok(catalog)
    }

    pub fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    /// Eligible entries exactly as written in the catalog file
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Resolved tools by name
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Pair every spec with the same-named implementation
    pub fn resolve(catalog: &ToolCatalog, implementations: Vec<Arc<dyn Tool>>) -> Self {
        let available: HashMap<&'static str, Arc<dyn Tool>> = implementations
            .into_iter()
            .map(|tool| (tool.name(), tool))
            .collect();

        let mut tools = HashMap::new();
        for spec in catalog.specs() {
            match available.get(spec.name.as_str()) {
                Some(tool) => {
                    tools.insert(spec.name.clone(), Arc::clone(tool));
                }
                None => warn!(tool = %spec.name, "No implementation registered for tool"),
            }
        }

        if tools.is_empty() {
            warn!("No tools successfully mapped from tools config");
        } else {
            info!(tools = tools.len(), "Tool registry ready");
        }
        Self { tools }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
