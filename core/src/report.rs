//! Console rendering of requests and results.
//!
//! Kept apart from the dispatcher, which only produces data.

use serde_json::Value;
use std::fmt;

use crate::dispatch::InvocationResult;
use crate::session::SessionOutcome;
use crate::tools::InvocationRequest;

/// Renders a request as `Tool: <name> Args: <args>`
pub struct RequestLine<'a>(pub &'a InvocationRequest);

impl fmt::Display for RequestLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tool: {} Args: {}", self.0.name, self.0.arguments)
    }
}

/// Renders a result as `Result for: <name> with: <args> = <value>`, or
/// `Failed: <name> with: <args> -> <reason>`
pub struct ResultLine<'a>(pub &'a InvocationResult);

impl fmt::Display for ResultLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = &self.0.request;
        match &self.0.outcome {
            Ok(value) => write!(
                f,
                "Result for: {} with: {} = {}",
                request.name,
                request.arguments,
                DisplayValue(value)
            ),
            Err(failure) => write!(
                f,
                "Failed: {} with: {} -> {}",
                request.name, request.arguments, failure
            ),
        }
    }
}

// strings print bare, everything else as compact JSON
struct DisplayValue<'a>(&'a Value);

impl fmt::Display for DisplayValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

/// Every request line followed by every result line
#[must_use]
pub fn render(outcome: &SessionOutcome) -> Vec<String> {
    outcome
        .requests
        .iter()
        .map(|r| RequestLine(r).to_string())
        .chain(outcome.results.iter().map(|r| ResultLine(r).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::InvocationFailure;
    use serde_json::json;

    #[test]
    fn renders_the_calculator_transcript() {
        let addition = InvocationRequest::new("addition", json!({"a": 30, "b": 12}));
        let unknown = InvocationRequest::new("division", json!({"a": 84, "b": 2}));
        let outcome = SessionOutcome {
            requests: vec![addition.clone(), unknown.clone()],
            results: vec![
                InvocationResult {
                    request: addition,
                    outcome: Ok(json!(42)),
                },
                InvocationResult {
                    request: unknown,
                    outcome: Err(InvocationFailure::UnknownTool {
                        name: "division".to_string(),
                    }),
                },
            ],
        };

        assert_eq!(
            render(&outcome),
            vec![
                r#"Tool: addition Args: {"a":30,"b":12}"#,
                r#"Tool: division Args: {"a":84,"b":2}"#,
                r#"Result for: addition with: {"a":30,"b":12} = 42"#,
                r#"Failed: division with: {"a":84,"b":2} -> Unknown tool `division`"#,
            ]
        );
    }

    #[test]
    fn string_results_print_without_quotes() {
        let result = InvocationResult {
            request: InvocationRequest::new("greet", json!({"name": "Ada"})),
            outcome: Ok(json!("Hello Ada!")),
        };
        assert_eq!(
            ResultLine(&result).to_string(),
            r#"Result for: greet with: {"name":"Ada"} = Hello Ada!"#
        );
    }
}
