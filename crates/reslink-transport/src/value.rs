//! Reading arguments and results off the wire.
//!
//! Values travel as `serde_json::Value`. Editors reached through a text
//! bridge report numbers and booleans as strings, so every reader here
//! accepts both spellings.

use serde::de::DeserializeOwned;
use serde_json::Value;

use reslink_core::TransportError;

use crate::method::Method;

/// Positional argument reader for one call.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    method: Method,
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub fn new(method: Method, values: &'a [Value]) -> Self {
        Self { method, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn get(&self, index: usize) -> Result<&'a Value, TransportError> {
        self.values.get(index).ok_or_else(|| {
            TransportError::fault(self.method.as_str(), format!("missing argument {index}"))
        })
    }

    fn bad(&self, index: usize, expected: &str) -> TransportError {
        TransportError::fault(
            self.method.as_str(),
            format!("argument {index} is not {expected}"),
        )
    }

    pub fn str(&self, index: usize) -> Result<&'a str, TransportError> {
        self.get(index)?
            .as_str()
            .ok_or_else(|| self.bad(index, "a string"))
    }

    pub fn int(&self, index: usize) -> Result<i64, TransportError> {
        lenient_i64(self.get(index)?).ok_or_else(|| self.bad(index, "an integer"))
    }

    pub fn bool(&self, index: usize) -> Result<bool, TransportError> {
        lenient_bool(self.get(index)?).ok_or_else(|| self.bad(index, "a boolean"))
    }

    /// Integer argument where a negative value means "use the default".
    pub fn opt_int(&self, index: usize) -> Result<Option<i64>, TransportError> {
        let value = self.int(index)?;
        Ok((value >= 0).then_some(value))
    }
}

fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn lenient_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

// ── Result decoding ──────────────────────────────────────────────

fn malformed(method: Method, expected: &str, value: &Value) -> TransportError {
    TransportError::fault(
        method.as_str(),
        format!("expected {expected} in result, got {value}"),
    )
}

pub fn as_i64(method: Method, value: &Value) -> Result<i64, TransportError> {
    lenient_i64(value).ok_or_else(|| malformed(method, "an integer", value))
}

pub fn as_f64(method: Method, value: &Value) -> Result<f64, TransportError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| malformed(method, "a number", value))
}

pub fn as_bool(method: Method, value: &Value) -> Result<bool, TransportError> {
    lenient_bool(value).ok_or_else(|| malformed(method, "a boolean", value))
}

/// Strings come back as-is; numbers are rendered so ids survive either way.
pub fn as_string(method: Method, value: &Value) -> Result<String, TransportError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(malformed(method, "a string", other)),
    }
}

/// A list of strings; a newline-separated string is accepted too.
pub fn as_string_list(method: Method, value: &Value) -> Result<Vec<String>, TransportError> {
    match value {
        Value::Array(items) => items.iter().map(|v| as_string(method, v)).collect(),
        Value::String(s) => Ok(s.lines().filter(|l| !l.is_empty()).map(String::from).collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(malformed(method, "a list", other)),
    }
}

/// Decode a structured record.
pub fn record<T: DeserializeOwned>(method: Method, value: Value) -> Result<T, TransportError> {
    serde_json::from_value(value).map_err(|e| {
        TransportError::fault(method.as_str(), format!("malformed result: {e}"))
    })
}

/// Decode a record, treating an empty object or null as "absent".
pub fn record_opt<T: DeserializeOwned>(
    method: Method,
    value: Value,
) -> Result<Option<T>, TransportError> {
    match &value {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        _ => record(method, value).map(Some),
    }
}

/// Decode a list of records.
pub fn records<T: DeserializeOwned>(method: Method, value: Value) -> Result<Vec<T>, TransportError> {
    match value {
        Value::Null => Ok(Vec::new()),
        other => record(method, other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_args_accept_text_numbers() {
        let values = vec![json!("3"), json!(42), json!("true"), json!(-1), json!("name")];
        let args = Args::new(Method::InsertClip, &values);
        assert_eq!(args.int(0).unwrap(), 3);
        assert_eq!(args.int(1).unwrap(), 42);
        assert!(args.bool(2).unwrap());
        assert_eq!(args.opt_int(3).unwrap(), None);
        assert_eq!(args.str(4).unwrap(), "name");
        assert!(args.int(4).is_err());
        assert!(matches!(
            args.str(9),
            Err(TransportError::RemoteFault { .. })
        ));
    }

    #[test]
    fn test_result_decoding() {
        assert_eq!(as_i64(Method::AddTrack, &json!("7")).unwrap(), 7);
        assert!((as_f64(Method::GetProjectFps, &json!("23.976")).unwrap() - 23.976).abs() < 1e-9);
        assert_eq!(as_string(Method::ImportMedia, &json!(12)).unwrap(), "12");
        assert_eq!(
            as_string_list(Method::GetAllClipIds, &json!("1\n2\n")).unwrap(),
            vec!["1", "2"]
        );
        let absent: Option<serde_json::Map<String, Value>> =
            record_opt(Method::GetTimelineClipInfo, json!({})).unwrap();
        assert!(absent.is_none());
    }
}
