use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use super::{ParamType, Tool};

/// The form of a registered tool that gets shown to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCatalogEntry {
    pub name: String,
    pub description: String,
    pub parameters: ParametersSchema,
}

/// JSON-schema object describing a tool's arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParametersSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: ParamType,
    pub description: String,
}

impl ToolCatalogEntry {
    pub fn from_tool<T: Tool + ?Sized>(tool: &T) -> Self {
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();
        for param in tool.parameters() {
            properties.insert(
                param.name().to_string(),
                PropertySchema {
                    kind: param.kind(),
                    description: param.description().to_string(),
                },
            );
            if param.is_required() {
                required.push(param.name().to_string());
            }
        }

        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: ParametersSchema {
                kind: "object".to_string(),
                properties,
                required,
            },
        }
    }

    /// Wraps the entry in the `{"type": "function", ...}` envelope used by
    /// OpenAI-compatible chat endpoints
    #[must_use]
    pub fn to_function_tool(&self) -> Value {
        json!({
            "type": "function",
            "function": self,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::Addition;
    use crate::tools::function::FunctionTool;
    use crate::tools::ParameterSpec;

    #[test]
    fn catalog_entry_has_expected_wire_shape() {
        let entry = Addition::new().catalog_entry();
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({
                "name": "addition",
                "description": "Adds two numbers and returns the sum",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "a": {"type": "number", "description": "The first number"},
                        "b": {"type": "number", "description": "The second number"}
                    },
                    "required": ["a", "b"]
                }
            })
        );
    }

    #[test]
    fn optional_parameters_are_left_out_of_required() {
        let tool = FunctionTool::new(
            "greet",
            "Greets a user",
            vec![
                ParameterSpec::new("name", ParamType::String, "Name of the user"),
                ParameterSpec::new("formal", ParamType::Boolean, "Use a formal greeting").optional(),
            ],
            |_args| Ok(Value::Null),
        );
        let entry = tool.catalog_entry();
        assert_eq!(entry.parameters.required, vec!["name".to_string()]);
        assert_eq!(entry.parameters.properties.len(), 2);
    }

    #[test]
    fn function_tool_envelope() {
        let wrapped = Addition::new().catalog_entry().to_function_tool();
        assert_eq!(wrapped["type"], "function");
        assert_eq!(wrapped["function"]["name"], "addition");
        assert_eq!(wrapped["function"]["parameters"]["type"], "object");
    }
}
