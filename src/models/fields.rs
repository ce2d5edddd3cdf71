//! Typed accessors over a loosely-shaped JSON object.
//!
//! Model output is tolerated where it is merely sloppy (nulls, missing
//! optional keys, identifiers emitted as numbers) and rejected where it is
//! wrong (non-ISO dates, objects where text is expected). Every error names
//! the offending key.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::SchemaError;

pub struct FieldReader<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    pub fn new(object: &'a Map<String, Value>) -> Self {
        Self { object }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// Required identifier: present, textual, non-empty after trimming.
    /// Returned trimmed.
    pub fn required_trimmed(&self, key: &str) -> Result<String, SchemaError> {
        let value = self
            .optional_string(key)?
            .ok_or_else(|| SchemaError::field(key, "is required"))?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SchemaError::field(key, "must not be empty"));
        }
        Ok(trimmed.to_string())
    }

    pub fn optional_string(&self, key: &str) -> Result<Option<String>, SchemaError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            // Identifiers frequently come back as bare numbers.
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(SchemaError::field(key, "expected text")),
        }
    }

    pub fn optional_f64(&self, key: &str) -> Result<Option<f64>, SchemaError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| SchemaError::field(key, "number out of range")),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| SchemaError::field(key, format!("'{s}' is not a number"))),
            Some(_) => Err(SchemaError::field(key, "expected a number")),
        }
    }

    /// Whole number of any sign. Integral floats (`6.0`) and numeric
    /// strings are accepted; fractions are not.
    pub fn optional_i64(&self, key: &str) -> Result<Option<i64>, SchemaError> {
        let invalid = || SchemaError::field(key, "expected an integer");
        match self.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => {
                if let Some(v) = n.as_i64() {
                    return Ok(Some(v));
                }
                match n.as_f64() {
                    Some(v) if v.fract() == 0.0 && (i64::MIN as f64..=i64::MAX as f64).contains(&v) => {
                        Ok(Some(v as i64))
                    }
                    _ => Err(invalid()),
                }
            }
            Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }

    /// Calendar date in ISO `YYYY-MM-DD` form; no other format is coerced.
    pub fn optional_date(&self, key: &str) -> Result<Option<NaiveDate>, SchemaError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => parse_iso_date(s)
                .map(Some)
                .ok_or_else(|| SchemaError::field(key, format!("'{s}' is not an ISO date (YYYY-MM-DD)"))),
            Some(_) => Err(SchemaError::field(key, "expected an ISO date string")),
        }
    }

    /// Array of JSON objects. Missing or null yields an empty list.
    pub fn object_array(&self, key: &str) -> Result<Vec<&'a Map<String, Value>>, SchemaError> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_object()
                        .ok_or_else(|| SchemaError::field(&format!("{key}[{i}]"), "expected an object"))
                })
                .collect(),
            Some(_) => Err(SchemaError::field(key, "expected an array")),
        }
    }
}

/// Strict ISO calendar date. chrono alone accepts unpadded months and days,
/// so the shape is checked first.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
