use async_trait::async_trait;
use serde_json::Value;

use super::{ParameterSpec, Tool, ToolError, ValidatedArgs};

/// A tool backed by a plain synchronous closure
pub struct FunctionTool<F> {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
    handler: F,
}

impl<F> FunctionTool<F>
where
    F: Fn(&ValidatedArgs) -> Result<Value, ToolError> + Send + Sync,
{
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ParameterSpec>,
        handler: F,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            handler,
        }
    }
}

#[async_trait]
impl<F> Tool for FunctionTool<F>
where
    F: Fn(&ValidatedArgs) -> Result<Value, ToolError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    async fn invoke(&self, args: ValidatedArgs) -> Result<Value, ToolError> {
        (self.handler)(&args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{schema::validate, ParamType};
    use serde_json::json;

    #[tokio::test]
    async fn closure_receives_validated_args() {
        let tool = FunctionTool::new(
            "capitalize",
            "Capitalizes all words in a string",
            vec![ParameterSpec::new("input", ParamType::String, "The text to capitalize")],
            |args| {
                let input = args
                    .string("input")
                    .ok_or_else(|| ToolError::failed("input is required"))?;
                Ok(json!(input.to_uppercase()))
            },
        );
        let args = validate(tool.parameters(), &json!({"input": "capital"})).unwrap();
        assert_eq!(tool.invoke(args).await.unwrap(), json!("CAPITAL"));
    }
}
