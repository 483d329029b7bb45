use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

use super::{builtin::calculator_tools, Tool, ToolCatalogEntry};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("A tool named `{0}` is already registered")]
    DuplicateName(String),
    #[error("Tool `{tool}` declares parameter `{parameter}` more than once")]
    DuplicateParameter { tool: String, parameter: String },
    #[error("Failed to find tool `{0}`")]
    NotFound(String),
}

/// Named tools in registration order.
///
/// Filled during start-up, then shared read-only (usually behind an `Arc`)
/// by everything that resolves or lists tools. There is no unregister.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `addition` and `multiplication`
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for tool in calculator_tools() {
            registry.register(tool)?;
        }
        Ok(registry)
    }

    /// Adds a tool. Fails without touching the registry if the name is taken
    /// or the tool repeats a parameter name.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = tool.parameters().iter().find(|p| !seen.insert(p.name())) {
            return Err(RegistryError::DuplicateParameter {
                tool: name,
                parameter: dup.name().to_string(),
            });
        }

        debug!(tool = %name, parameters = tool.parameters().len(), "Registered tool");
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&dyn Tool, RegistryError> {
        self.index
            .get(name)
            .map(|&i| self.tools[i].as_ref())
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Catalog entries in registration order
    #[must_use]
    pub fn catalog(&self) -> Vec<ToolCatalogEntry> {
        self.tools.iter().map(|t| t.catalog_entry()).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::{Addition, Multiplication};
    use crate::tools::function::FunctionTool;
    use crate::tools::{ParamType, ParameterSpec};
    use serde_json::{json, Value};

    fn constant(name: &str, value: Value) -> Box<dyn Tool> {
        Box::new(FunctionTool::new(name, "Returns a constant", vec![], move |_| {
            Ok(value.clone())
        }))
    }

    #[test]
    fn duplicate_name_is_rejected_and_first_kept() {
        let mut registry = ToolRegistry::new();
        registry.register(constant("answer", json!(42))).unwrap();

        let result = registry.register(constant("answer", json!(0)));
        assert_eq!(result, Err(RegistryError::DuplicateName("answer".to_string())));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.resolve("answer").unwrap().description(),
            "Returns a constant"
        );
    }

    #[tokio::test]
    async fn first_registration_still_answers_after_duplicate() {
        let mut registry = ToolRegistry::new();
        registry.register(constant("answer", json!(42))).unwrap();
        assert!(registry.register(constant("answer", json!(0))).is_err());

        let tool = registry.resolve("answer").unwrap();
        let value = tool.invoke(Default::default()).await.unwrap();
        assert_eq!(value, json!(42));
    }

    #[test]
    fn duplicate_parameter_is_rejected() {
        let mut registry = ToolRegistry::new();
        let tool = FunctionTool::new(
            "broken",
            "Declares `x` twice",
            vec![
                ParameterSpec::new("x", ParamType::Number, "first"),
                ParameterSpec::new("x", ParamType::String, "second"),
            ],
            |_| Ok(Value::Null),
        );
        assert_eq!(
            registry.register(Box::new(tool)),
            Err(RegistryError::DuplicateParameter {
                tool: "broken".to_string(),
                parameter: "x".to_string()
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn resolve_unknown_name() {
        let registry = ToolRegistry::with_builtins().unwrap();
        assert_eq!(
            registry.resolve("division").err(),
            Some(RegistryError::NotFound("division".to_string()))
        );
    }

    #[test]
    fn catalog_follows_registration_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Addition::new())).unwrap();
        registry.register(Box::new(Multiplication::new())).unwrap();

        let names: Vec<_> = registry.catalog().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["addition", "multiplication"]);

        let mut reversed = ToolRegistry::new();
        reversed.register(Box::new(Multiplication::new())).unwrap();
        reversed.register(Box::new(Addition::new())).unwrap();
        assert_eq!(
            reversed.names().collect::<Vec<_>>(),
            vec!["multiplication", "addition"]
        );
    }
}
