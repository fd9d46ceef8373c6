//! Field-by-field argument checks used by tool handlers

use serde_json::Value;

use crate::types::{ToolArgs, ToolCallResult};

/// Caller mistakes, reported before any backend call is made
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("Missing required argument: {0}")]
    Missing(String),

    #[error("Argument '{0}' must not be empty")]
    Empty(String),

    #[error("Argument '{field}' must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("Unrecognized helper platform in '{0}'")]
    UnknownPlatform(String),

    #[error("{0}")]
    Invalid(String),
}

impl ArgumentError {
    fn wrong_type(field: &str, expected: &'static str) -> Self {
        Self::WrongType {
            field: field.to_string(),
            expected,
        }
    }
}

impl From<ArgumentError> for ToolCallResult {
    fn from(err: ArgumentError) -> Self {
        ToolCallResult::error(err.to_string())
    }
}

pub type ArgResult<T> = Result<T, ArgumentError>;

/// A string argument; absent and `null` both read as `None`
pub fn optional_str<'a>(args: &'a ToolArgs, field: &str) -> ArgResult<Option<&'a str>> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ArgumentError::wrong_type(field, "a string")),
    }
}

/// A string argument that must be present and non-empty
pub fn required_str<'a>(args: &'a ToolArgs, field: &str) -> ArgResult<&'a str> {
    match optional_str(args, field)? {
        None => Err(ArgumentError::Missing(field.to_string())),
        Some(s) if s.trim().is_empty() => Err(ArgumentError::Empty(field.to_string())),
        Some(s) => Ok(s),
    }
}

pub fn optional_bool(args: &ToolArgs, field: &str) -> ArgResult<Option<bool>> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ArgumentError::wrong_type(field, "a boolean")),
    }
}

pub fn optional_array<'a>(args: &'a ToolArgs, field: &str) -> ArgResult<Option<&'a Vec<Value>>> {
    match args.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(ArgumentError::wrong_type(field, "an array")),
    }
}

/// An array argument that must be present and hold at least one element
pub fn required_array<'a>(args: &'a ToolArgs, field: &str) -> ArgResult<&'a Vec<Value>> {
    match optional_array(args, field)? {
        None => Err(ArgumentError::Missing(field.to_string())),
        Some(items) if items.is_empty() => Err(ArgumentError::Empty(field.to_string())),
        Some(items) => Ok(items),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ToolArgs {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_optional_str() {
        let a = args(json!({ "state": "on", "nothing": null, "count": 3 }));
        assert_eq!(optional_str(&a, "state"), Ok(Some("on")));
        assert_eq!(optional_str(&a, "nothing"), Ok(None));
        assert_eq!(optional_str(&a, "absent"), Ok(None));
        assert_eq!(
            optional_str(&a, "count").unwrap_err().to_string(),
            "Argument 'count' must be a string"
        );
    }

    #[test]
    fn test_required_str() {
        let a = args(json!({ "alias": "  ", "id": "x" }));
        assert_eq!(required_str(&a, "id"), Ok("x"));
        assert_eq!(required_str(&a, "alias"), Err(ArgumentError::Empty("alias".into())));
        assert_eq!(
            required_str(&a, "missing").unwrap_err().to_string(),
            "Missing required argument: missing"
        );
    }

    #[test]
    fn test_bool_and_arrays() {
        let a = args(json!({ "verbose": "yes", "actions": [], "triggers": [{}] }));
        assert!(optional_bool(&a, "verbose").is_err());
        assert_eq!(optional_bool(&a, "other"), Ok(None));
        assert_eq!(required_array(&a, "actions"), Err(ArgumentError::Empty("actions".into())));
        assert_eq!(required_array(&a, "triggers").unwrap().len(), 1);
    }

    #[test]
    fn test_into_error_result() {
        let result: ToolCallResult = ArgumentError::UnknownPlatform("light.kitchen".into()).into();
        assert!(result.is_error);
        assert_eq!(result.text(), "Unrecognized helper platform in 'light.kitchen'");
    }
}
