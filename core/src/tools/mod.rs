pub mod builtin;
pub mod catalog;
pub mod function;
pub mod registry;
pub mod schema;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use catalog::ToolCatalogEntry;
pub use registry::{RegistryError, ToolRegistry};
pub use schema::{ParamType, ParameterSpec, ValidatedArgs, ValidationError};

/// A named, schema-described unit of work a model can ask to run.
///
/// The parameter specs returned by [`Tool::parameters`] are read once at
/// registration and must not change afterwards; arguments are always
/// validated against them before [`Tool::invoke`] is called.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> &[ParameterSpec];

    async fn invoke(&self, args: ValidatedArgs) -> Result<Value, ToolError>;

    fn catalog_entry(&self) -> ToolCatalogEntry {
        ToolCatalogEntry::from_tool(self)
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Failed to execute the call: {0}")]
    ToolCallError(#[from] Box<dyn std::error::Error + Send + Sync>),
    #[error("Json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("{0}")]
    Failed(String),
}

impl ToolError {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }
}

/// An invocation requested by the model: a tool name plus its raw arguments.
///
/// `arguments` is whatever the model produced; it only becomes trusted after
/// passing [`schema::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default = "empty_arguments")]
    pub arguments: Value,
}

impl InvocationRequest {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

fn empty_arguments() -> Value {
    Value::Object(Map::new())
}
