use async_trait::async_trait;
use domain::tool_descriptor::ToolDescriptor;
use serde_json::Value;
use shared::types::Result;
use thiserror::Error;

/// Something the agent can call mid-reasoning.
#[async_trait]
pub trait Tool: Send + Sync {
    fn descriptor(&self) -> &ToolDescriptor;

    async fn call(&self, arguments: &Value) -> Result<String>;

    fn name(&self) -> &str {
        &self.descriptor().name
    }
}

#[derive(Debug, Error)]
pub enum ToolSetError {
    #[error("two or more tools are named `{0}`")]
    NameConflict(String),
}

#[derive(Debug, Error)]
pub enum ToolCallError {
    #[error("{name} is not a valid tool, try one of [{available}].")]
    NotFound { name: String, available: String },
    #[error("invalid arguments for {name}: {reason}")]
    InvalidArguments { name: String, reason: String },
    #[error("{name} failed: {reason:#}")]
    Failed { name: String, reason: anyhow::Error },
}

/// Tools offered to the agent, in registration order.
#[derive(Default)]
pub struct ToolSet {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn add_tool<T: Tool + 'static>(self, tool: T) -> std::result::Result<Self, ToolSetError> {
        self.add_boxed(Box::new(tool))
    }

    pub fn add_boxed(mut self, tool: Box<dyn Tool>) -> std::result::Result<Self, ToolSetError> {
        if self.get(tool.name()).is_some() {
            return Err(ToolSetError::NameConflict(tool.name().to_string()));
        }
        self.tools.push(tool);
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.iter().find(|t| t.name() == name).map(|t| t.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn try_tool_call(
        &self,
        tool_name: &str,
        arguments: &Value,
    ) -> std::result::Result<String, ToolCallError> {
        let tool = self.get(tool_name).ok_or_else(|| ToolCallError::NotFound {
            name: tool_name.to_string(),
            available: self.names().join(", "),
        })?;
        tool.call(arguments).await.map_err(|err| match err.downcast::<ToolCallError>() {
            Ok(typed) => typed,
            Err(reason) => ToolCallError::Failed {
                name: tool_name.to_string(),
                reason,
            },
        })
    }
}

/// Pull a string argument out of whatever shape the model sent.
///
/// Accepts `{"key": "..."}`, a bare JSON string, an object with a single
/// string value under a different key, or any of those encoded as a JSON
/// string.
pub fn string_arg(tool: &str, arguments: &Value, key: &str) -> Result<String> {
    let found = match arguments {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(decoded @ (Value::Object(_) | Value::String(_))) => {
                string_in(&decoded, key).map(str::to_string)
            }
            _ => Some(raw.clone()),
        },
        other => string_in(other, key).map(str::to_string),
    };
    found.ok_or_else(|| {
        ToolCallError::InvalidArguments {
            name: tool.to_string(),
            reason: format!("expected a string `{key}` argument, got {arguments}"),
        }
        .into()
    })
}

fn string_in<'a>(arguments: &'a Value, key: &str) -> Option<&'a str> {
    match arguments {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get(key).and_then(Value::as_str).or_else(|| {
            let mut strings = map.values().filter_map(Value::as_str);
            match (strings.next(), strings.next()) {
                (Some(only), None) => Some(only),
                _ => None,
            }
        }),
        _ => None,
    }
}
