//! Tool-related type definitions

use super::base::ToolError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parameter value supplied by the model
///
/// Tools validate the shape they need at the point of use through the
/// typed getters on [`ToolCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<ParamValue>),
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short type name for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::List(_) => "array",
            Self::Map(_) => "object",
        }
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect()),
        }
    }
}

impl From<&ParamValue> for serde_json::Value {
    fn from(value: &ParamValue) -> Self {
        use serde_json::Value;
        match value {
            ParamValue::Null => Value::Null,
            ParamValue::Bool(b) => Value::Bool(*b),
            ParamValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ParamValue::String(s) => Value::String(s.clone()),
            ParamValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            ParamValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// A tool call from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlation id linking the call to its result
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParamValue>,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Build a call from a JSON-encoded argument object
    ///
    /// An empty string is treated as no arguments.
    pub fn from_json_arguments(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: &str,
    ) -> Result<Self, ToolError> {
        let mut call = Self::new(id, name);
        if arguments.trim().is_empty() {
            return Ok(call);
        }
        match serde_json::from_str::<serde_json::Value>(arguments)? {
            serde_json::Value::Object(map) => {
                call.parameters = map.into_iter().map(|(k, v)| (k, ParamValue::from(v))).collect();
                Ok(call)
            }
            other => Err(ToolError::InvalidArguments(format!(
                "arguments must be a JSON object, got {}",
                ParamValue::from(other).kind()
            ))),
        }
    }

    /// Parameters as a JSON object
    pub fn arguments_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.parameters
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::from(v)))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }

    /// Optional string parameter; present but non-string is an error
    pub fn get_str(&self, key: &str) -> Result<Option<&str>, ToolError> {
        match self.parameters.get(key) {
            None | Some(ParamValue::Null) => Ok(None),
            Some(ParamValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(ToolError::InvalidArguments(format!(
                "'{}' must be a string, got {}",
                key,
                other.kind()
            ))),
        }
    }

    /// Required string parameter
    pub fn require_str(&self, key: &str) -> Result<&str, ToolError> {
        self.get_str(key)?
            .ok_or_else(|| ToolError::InvalidArguments(format!("'{}' parameter is required", key)))
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.parameters.get(key) {
            Some(ParamValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_number(&self, key: &str) -> Option<f64> {
        match self.parameters.get(key) {
            Some(ParamValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

/// Outcome of one tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub call_id: String,
    pub tool_name: String,
    pub success: bool,
    /// Output on success, error message on failure
    pub result: String,
}

impl ToolResult {
    pub fn success(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            success: true,
            result: output.into(),
        }
    }

    pub fn error(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            success: false,
            result: error.into(),
        }
    }

    /// First line of the result, shortened for progress output
    pub fn summary(&self, max_chars: usize) -> String {
        let first_line = self.result.lines().next().unwrap_or_default();
        if first_line.chars().count() > max_chars {
            let head: String = first_line.chars().take(max_chars).collect();
            format!("{}...", head)
        } else {
            first_line.to_string()
        }
    }
}

/// Parameter definition for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    /// JSON schema type (string, number, boolean, object, array)
    pub param_type: String,
    pub required: bool,
    pub enum_values: Option<Vec<String>>,
}

impl ToolParameter {
    /// Create a required string parameter
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type: "string".to_string(),
            required: true,
            enum_values: None,
        }
    }

    /// Create an optional string parameter
    pub fn optional_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::string(name, description).optional()
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// JSON schema for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// Input parameters schema
    pub parameters: serde_json::Value,
}

impl ToolSchema {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ToolParameter>,
    ) -> Self {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in parameters {
            if param.required {
                required.push(param.name.clone());
            }

            let mut param_schema = serde_json::Map::new();
            param_schema.insert("type".to_string(), param.param_type.into());
            param_schema.insert("description".to_string(), param.description.into());
            if let Some(enum_values) = param.enum_values {
                param_schema.insert("enum".to_string(), enum_values.into());
            }

            properties.insert(param.name, param_schema.into());
        }

        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": required
            }),
        }
    }

    /// OpenAI `tools[]` entry
    pub fn to_openai(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }
}
