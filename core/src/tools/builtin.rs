use async_trait::async_trait;
use serde_json::{Number, Value};

use super::{ParamType, ParameterSpec, Tool, ToolError, ValidatedArgs};

fn operands() -> Vec<ParameterSpec> {
    vec![
        ParameterSpec::new("a", ParamType::Number, "The first number"),
        ParameterSpec::new("b", ParamType::Number, "The second number"),
    ]
}

/// Applies a binary operation to the `a` and `b` arguments.
///
/// Integer inputs stay integers unless the result overflows `i64`.
fn binary_op(
    args: &ValidatedArgs,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, ToolError> {
    let (a, b) = match (args.get("a"), args.get("b")) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => (a, b),
        _ => return Err(ToolError::failed("`a` and `b` must both be numbers")),
    };

    if let Some(result) = a.as_i64().zip(b.as_i64()).and_then(|(a, b)| int_op(a, b)) {
        return Ok(Value::from(result));
    }

    let (a, b) = a
        .as_f64()
        .zip(b.as_f64())
        .ok_or_else(|| ToolError::failed("operands are not representable as f64"))?;
    Number::from_f64(float_op(a, b))
        .map(Value::Number)
        .ok_or_else(|| ToolError::failed(format!("result of {a} and {b} is not a finite number")))
}

/// Adds two numbers
pub struct Addition {
    parameters: Vec<ParameterSpec>,
}

impl Addition {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parameters: operands(),
        }
    }
}

impl Default for Addition {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for Addition {
    fn name(&self) -> &str {
        "addition"
    }
    fn description(&self) -> &str {
        "Adds two numbers and returns the sum"
    }
    fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }
    async fn invoke(&self, args: ValidatedArgs) -> Result<Value, ToolError> {
        binary_op(&args, i64::checked_add, |a, b| a + b)
    }
}

/// Multiplies two numbers
pub struct Multiplication {
    parameters: Vec<ParameterSpec>,
}

impl Multiplication {
    #[must_use]
    pub fn new() -> Self {
        Self {
            parameters: operands(),
        }
    }
}

impl Default for Multiplication {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for Multiplication {
    fn name(&self) -> &str {
        "multiplication"
    }
    fn description(&self) -> &str {
        "Multiplies two numbers and returns the product"
    }
    fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }
    async fn invoke(&self, args: ValidatedArgs) -> Result<Value, ToolError> {
        binary_op(&args, i64::checked_mul, |a, b| a * b)
    }
}

/// `addition` followed by `multiplication`
#[must_use]
pub fn calculator_tools() -> Vec<Box<dyn Tool>> {
    vec![Box::new(Addition::new()), Box::new(Multiplication::new())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::schema::validate;
    use serde_json::json;

    async fn run(tool: &dyn Tool, args: Value) -> Result<Value, ToolError> {
        let args = validate(tool.parameters(), &args).unwrap();
        tool.invoke(args).await
    }

    #[tokio::test]
    async fn integer_arithmetic_stays_integral() {
        assert_eq!(run(&Addition::new(), json!({"a": 30, "b": 12})).await.unwrap(), json!(42));
        assert_eq!(
            run(&Multiplication::new(), json!({"a": 21, "b": 2})).await.unwrap(),
            json!(42)
        );
    }

    #[tokio::test]
    async fn mixed_operands_fall_back_to_floats() {
        assert_eq!(
            run(&Addition::new(), json!({"a": 0.5, "b": 2})).await.unwrap(),
            json!(2.5)
        );
        assert_eq!(
            run(&Multiplication::new(), json!({"a": 1.5, "b": 4})).await.unwrap(),
            json!(6.0)
        );
    }

    #[tokio::test]
    async fn integer_overflow_widens_to_float() {
        let result = run(&Multiplication::new(), json!({"a": i64::MAX, "b": 2}))
            .await
            .unwrap();
        assert!(result.is_f64());
    }

    #[tokio::test]
    async fn non_finite_result_is_an_error() {
        let result = run(&Multiplication::new(), json!({"a": f64::MAX, "b": 10.0})).await;
        assert!(matches!(result, Err(ToolError::Failed(_))));
    }
}
