//! Diagnostic tool that echoes its parameters

use crate::errors::Result;
use crate::tools::types::{bind_arguments, Tool};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::fmt::Write;

pub const NAME: &str = "example_tool";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExampleParams {
    string_param: String,
    number_param: Number,
    #[serde(default)]
    integer_param: Option<i64>,
    #[serde(default)]
    boolean_param: Option<bool>,
    #[serde(default)]
    simple_array: Option<Vec<String>>,
    #[serde(default)]
    object_array: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    nested_object: Option<Map<String, Value>>,
    #[serde(default)]
    mixed_array: Option<Vec<Value>>,
    #[serde(default = "default_optional_param")]
    optional_param: String,
}

fn default_optional_param() -> String {
    "default_value".to_string()
}

/// Renders every declared parameter, one per line
#[derive(Debug, Default, Clone, Copy)]
pub struct ExampleTool;

impl ExampleTool {
    fn render(params: &ExampleParams) -> String {
        let lines: [(&str, String); 9] = [
            ("string_param", params.string_param.clone()),
            ("number_param", params.number_param.to_string()),
            ("integer_param", optional(&params.integer_param)),
            ("boolean_param", optional(&params.boolean_param)),
            ("simple_array", compact(&params.simple_array)),
            ("object_array", compact(&params.object_array)),
            ("nested_object", compact(&params.nested_object)),
            ("mixed_array", compact(&params.mixed_array)),
            ("optional_param", params.optional_param.clone()),
        ];

        let mut out = String::from("Function parameters:\n");
        for (name, value) in lines {
            let _ = writeln!(out, "- {}: {}", name, value);
        }
        out.trim().to_string()
    }
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map_or_else(|| "None".to_string(), ToString::to_string)
}

fn compact<T: serde::Serialize>(value: &Option<T>) -> String {
    match value {
        Some(v) => serde_json::to_string(v).unwrap_or_else(|_| "None".to_string()),
        None => "None".to_string(),
    }
}

#[async_trait]
impl Tool for ExampleTool {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn call(&self, arguments: Map<String, Value>) -> Result<Value> {
        let params: ExampleParams = bind_arguments(NAME, arguments)?;
        Ok(Value::String(Self::render(&params)))
    }
}
