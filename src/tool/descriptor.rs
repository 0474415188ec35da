// ABOUTME: Defines ToolDescriptor and ParamSpec - the declared argument schema
// ABOUTME: of a tool, its JSON Schema rendering, and default merging.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::ToolKind;

/// Type of a declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    String,
    Number { minimum: f64, maximum: f64 },
    /// Whole numbers; an integral float such as `1024.0` also qualifies.
    Integer { minimum: u64, maximum: u64 },
    Enum { values: Vec<String> },
}

/// Declaration of one tool parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub description: String,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<Value>,
}

impl ParamSpec {
    /// Declare a required parameter (no default).
    pub fn required(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ParamKind,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: true,
            default: None,
        }
    }

    /// Declare an optional parameter with a default value.
    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ParamKind,
        default: impl Into<Value>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            default: Some(default.into()),
        }
    }

    /// Whether `value` satisfies this parameter's type, bounds, and allowed values.
    pub fn accepts(&self, value: &Value) -> bool {
        match &self.kind {
            ParamKind::String => value.is_string(),
            ParamKind::Number { minimum, maximum } => value
                .as_f64()
                .is_some_and(|n| n >= *minimum && n <= *maximum),
            ParamKind::Integer { minimum, maximum } => {
                integral_value(value).is_some_and(|n| n >= *minimum && n <= *maximum)
            }
            ParamKind::Enum { values } => value
                .as_str()
                .is_some_and(|s| values.iter().any(|v| v == s)),
        }
    }

    /// Render this parameter as a JSON Schema property.
    pub fn to_schema(&self) -> Value {
        let mut schema = match &self.kind {
            ParamKind::String => json!({ "type": "string" }),
            ParamKind::Number { minimum, maximum } => json!({
                "type": "number",
                "minimum": minimum,
                "maximum": maximum,
            }),
            ParamKind::Integer { minimum, maximum } => json!({
                "type": "integer",
                "minimum": minimum,
                "maximum": maximum,
            }),
            ParamKind::Enum { values } => json!({ "type": "string", "enum": values }),
        };
        schema["description"] = Value::String(self.description.clone());
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        schema
    }
}

/// The non-negative whole number held by `value`, if any.
///
/// JSON does not distinguish `1024` from `1024.0`, so integral floats count.
pub fn integral_value(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= u64::MAX as f64)
        .map(|n| n as u64)
}

/// Immutable description of a tool exposed to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub kind: ToolKind,
    pub name: String,
    pub description: String,
    pub params: Vec<ParamSpec>,
}

impl ToolDescriptor {
    /// Look up a declared parameter by name.
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// The argument schema as a JSON Schema object.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.clone(), p.to_schema()))
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Wire-ready definition for `tools/list`.
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema(),
        }
    }

    /// Merge declared defaults into `args`.
    ///
    /// Absent or `null` parameters take their default. An enum value outside
    /// the allowed set is replaced by the default. Nothing else is coerced or
    /// clamped, and unknown keys pass through untouched.
    pub fn resolve_arguments(&self, mut args: Map<String, Value>) -> Map<String, Value> {
        for param in &self.params {
            let Some(default) = &param.default else {
                continue;
            };
            match args.get(&param.name) {
                None | Some(Value::Null) => {
                    args.insert(param.name.clone(), default.clone());
                }
                Some(value)
                    if matches!(param.kind, ParamKind::Enum { .. }) && !param.accepts(value) =>
                {
                    tracing::warn!(
                        tool = %self.name,
                        param = %param.name,
                        value = %value,
                        fallback = %default,
                        "value not in allowed set, using default"
                    );
                    args.insert(param.name.clone(), default.clone());
                }
                Some(_) => {}
            }
        }
        args
    }
}

/// Definition of a tool as listed to MCP clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}
