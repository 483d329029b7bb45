use schemars::{gen::SchemaSettings, JsonSchema};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// JSON type a tool parameter is declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Number,
    String,
    Boolean,
    Object,
    Array,
}

impl ParamType {
    /// Whether `value` holds this type. Strings are never coerced, `"3"` is not a number.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Number, Value::Number(_))
                | (Self::String, Value::String(_))
                | (Self::Boolean, Value::Bool(_))
                | (Self::Object, Value::Object(_))
                | (Self::Array, Value::Array(_))
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    fn from_json_type(name: &str) -> Option<Self> {
        match name {
            "number" | "integer" => Some(Self::Number),
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            _ => None,
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of the JSON type `value` actually holds
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single declared argument of a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    name: String,
    #[serde(rename = "type")]
    kind: ParamType,
    description: String,
    required: bool,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Type `{0}` doesn't map onto a single JSON parameter type")]
    UnsupportedType(String),
    #[error("Failed to render schema for `{0}`: {1}")]
    Render(String, serde_json::Error),
}

impl ParameterSpec {
    /// Declares a required parameter
    pub fn new(name: impl Into<String>, kind: ParamType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            required: true,
        }
    }

    /// Marks the parameter as optional
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Declares a parameter whose JSON type is taken from the schema of `T`.
    ///
    /// `Option<T>` yields an optional parameter.
    pub fn infer<T: JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, SchemaError> {
        let type_name = std::any::type_name::<T>();
        let settings = SchemaSettings::default().with(|s| {
            s.inline_subschemas = true;
            s.option_nullable = false;
            s.option_add_null_type = true;
        });
        let schema = settings.into_generator().into_root_schema_for::<T>();
        let schema = serde_json::to_value(&schema)
            .map_err(|e| SchemaError::Render(type_name.to_string(), e))?;

        let (kind, nullable) = match &schema["type"] {
            Value::String(t) => (ParamType::from_json_type(t), false),
            Value::Array(types) => {
                let mut nullable = false;
                let mut kinds = vec![];
                for t in types.iter().filter_map(Value::as_str) {
                    if t == "null" {
                        nullable = true;
                    } else {
                        kinds.push(t);
                    }
                }
                match kinds.as_slice() {
                    [single] => (ParamType::from_json_type(single), nullable),
                    _ => (None, nullable),
                }
            }
            _ => (None, false),
        };
        let kind = kind.ok_or_else(|| SchemaError::UnsupportedType(type_name.to_string()))?;

        let spec = Self::new(name, kind, description);
        Ok(if nullable { spec.optional() } else { spec })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ParamType {
        self.kind
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }
}

/// Which rule a set of arguments broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    NotAnObject,
    MissingArgument,
    TypeMismatch,
    UnknownArgument,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Arguments must be a JSON object, got {actual}")]
    NotAnObject { actual: &'static str },
    #[error("Missing required argument `{field}`")]
    MissingArgument { field: String },
    #[error("Argument `{field}` expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: ParamType,
        actual: &'static str,
    },
    #[error("Unknown argument `{field}`")]
    UnknownArgument { field: String },
}

impl ValidationError {
    #[must_use]
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::NotAnObject { .. } => ValidationErrorKind::NotAnObject,
            Self::MissingArgument { .. } => ValidationErrorKind::MissingArgument,
            Self::TypeMismatch { .. } => ValidationErrorKind::TypeMismatch,
            Self::UnknownArgument { .. } => ValidationErrorKind::UnknownArgument,
        }
    }

    /// The offending argument name, if the error concerns one
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::NotAnObject { .. } => None,
            Self::MissingArgument { field }
            | Self::TypeMismatch { field, .. }
            | Self::UnknownArgument { field } => Some(field),
        }
    }
}

/// Arguments that passed validation against a tool's parameter specs.
///
/// Holds only declared keys; absent optional parameters are simply missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArgs(Map<String, Value>);

impl ValidatedArgs {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn number(&self, name: &str) -> Option<f64> {
        self.0.get(name).and_then(Value::as_f64)
    }

    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.0.get(name).and_then(Value::as_bool)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deserializes the arguments into a typed parameter struct
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Checks `args` against `spec`.
///
/// Unknown keys are reported first (in key order), then each declared
/// parameter is checked in declaration order. A `null` value counts as absent.
pub fn validate(spec: &[ParameterSpec], args: &Value) -> Result<ValidatedArgs, ValidationError> {
    let supplied = args.as_object().ok_or(ValidationError::NotAnObject {
        actual: json_type_name(args),
    })?;

    if let Some(unknown) = supplied
        .keys()
        .find(|key| !spec.iter().any(|p| p.name == **key))
    {
        return Err(ValidationError::UnknownArgument {
            field: unknown.clone(),
        });
    }

    let mut validated = Map::new();
    for param in spec {
        match supplied.get(&param.name) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(ValidationError::MissingArgument {
                        field: param.name.clone(),
                    });
                }
            }
            Some(value) if param.kind.matches(value) => {
                validated.insert(param.name.clone(), value.clone());
            }
            Some(value) => {
                return Err(ValidationError::TypeMismatch {
                    field: param.name.clone(),
                    expected: param.kind,
                    actual: json_type_name(value),
                });
            }
        }
    }
    Ok(ValidatedArgs(validated))
}
