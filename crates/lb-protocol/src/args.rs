//! Typed access to JSON tool arguments.
//!
//! Absent and `null` arguments read as `None`; present arguments of the wrong
//! type are an [`ArgError`] naming the parameter.

use serde_json::Value;

/// A tool argument was present but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid argument '{param}': {message}")]
pub struct ArgError {
    pub param: String,
    pub message: String,
}

impl ArgError {
    pub fn new(param: &str, message: impl Into<String>) -> Self {
        Self {
            param: param.to_string(),
            message: message.into(),
        }
    }

    pub fn missing(param: &str) -> Self {
        Self::new(param, "required")
    }
}

fn present<'a>(args: &'a Value, key: &str) -> Option<&'a Value> {
    args.get(key).filter(|v| !v.is_null())
}

pub fn opt_str<'a>(args: &'a Value, key: &str) -> Result<Option<&'a str>, ArgError> {
    match present(args, key) {
        None => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ArgError::new(key, format!("expected a string, got {other}"))),
    }
}

pub fn req_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ArgError> {
    opt_str(args, key)?.ok_or_else(|| ArgError::missing(key))
}

/// Integer argument; numeric strings are accepted.
pub fn opt_i64(args: &Value, key: &str) -> Result<Option<i64>, ArgError> {
    match present(args, key) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| ArgError::new(key, format!("expected an integer, got {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ArgError::new(key, format!("expected an integer, got '{s}'"))),
        Some(other) => Err(ArgError::new(key, format!("expected an integer, got {other}"))),
    }
}

pub fn i64_or(args: &Value, key: &str, default: i64) -> Result<i64, ArgError> {
    Ok(opt_i64(args, key)?.unwrap_or(default))
}

/// Float argument; numeric strings are accepted.
pub fn opt_f64(args: &Value, key: &str) -> Result<Option<f64>, ArgError> {
    match present(args, key) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ArgError::new(key, format!("expected a number, got '{s}'"))),
        Some(other) => Err(ArgError::new(key, format!("expected a number, got {other}"))),
    }
}

pub fn bool_or(args: &Value, key: &str, default: bool) -> Result<bool, ArgError> {
    match present(args, key) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(ArgError::new(key, format!("expected a boolean, got {other}"))),
    }
}

/// A user identifier given as a number or a string, returned as text.
pub fn req_id(args: &Value, key: &str) -> Result<String, ArgError> {
    match present(args, key) {
        None => Err(ArgError::missing(key)),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(other) => Err(ArgError::new(key, format!("expected an id, got {other}"))),
    }
}

pub fn opt_str_list(args: &Value, key: &str) -> Result<Option<Vec<String>>, ArgError> {
    match present(args, key) {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|i| {
                i.as_str()
                    .map(String::from)
                    .ok_or_else(|| ArgError::new(key, "expected a list of strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(ArgError::new(key, "expected a list of strings")),
    }
}
