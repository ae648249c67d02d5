use serde::Serialize;
use serde_json::{json, Value};

/// What the model sees of a tool: its name, when to use it, and its arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Descriptor for a tool taking a single required string argument.
    pub fn with_string_arg(
        name: impl Into<String>,
        description: impl Into<String>,
        arg: &str,
        arg_description: &str,
    ) -> Self {
        Self::new(
            name,
            description,
            json!({
                "type": "object",
                "properties": {
                    arg: {
                        "type": "string",
                        "description": arg_description
                    }
                },
                "required": [arg]
            }),
        )
    }

    /// Descriptor for a tool that takes no arguments.
    pub fn without_args(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            name,
            description,
            json!({"type": "object", "properties": {}}),
        )
    }
}
