//! The value tree packed and unpacked by this crate.
//!
//! Mirrors JSON types but separates integers from floats (the wire format
//! stores them in different dictionaries) and uses `Vec<(String, Value)>`
//! for objects to keep insertion order. Conversion to and from
//! `serde_json::Value` lives here; binding a decoded tree to a concrete Rust
//! type is serde's job, not this crate's.

use crate::error::EncodeError;
use serde_json::Number;

/// A JSON-shaped value supported by the packed encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    /// Key-value pairs in insertion order.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Convert a `serde_json::Value` tree into a packable tree.
    ///
    /// Fails on unsigned integers above `i64::MAX`: the integer dictionary
    /// is 64-bit signed, and rounding such values through `f64` would corrupt
    /// them silently.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, EncodeError> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Self::from_number(n)?,
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            serde_json::Value::Object(map) => {
                let mut fields = Vec::with_capacity(map.len());
                for (key, val) in map {
                    fields.push((key.clone(), Self::from_json(val)?));
                }
                Value::Object(fields)
            }
        })
    }

    fn from_number(n: &Number) -> Result<Self, EncodeError> {
        if let Some(i) = n.as_i64() {
            return Ok(Value::Int(i));
        }
        if n.as_u64().is_some() {
            return Err(EncodeError::Unsupported(format!(
                "integer {n} does not fit in 64 signed bits"
            )));
        }
        match n.as_f64() {
            Some(f) => Ok(Self::from_f64(f)),
            None => Err(EncodeError::Unsupported(format!("number {n}"))),
        }
    }

    /// Classify a float: a value with no fractional part narrows to `Int`.
    /// One-way and intentional; an integral float and the equal integer are
    /// indistinguishable after a round trip.
    pub(crate) fn from_f64(f: f64) -> Self {
        // upper bound is strict: `i64::MAX as f64` rounds up to 2^63, which
        // would saturate the cast
        if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
            Value::Int(f as i64)
        } else {
            Value::Float(f)
        }
    }

    /// Convert back into a `serde_json::Value` tree.
    ///
    /// A non-finite float has no JSON number representation and maps to
    /// null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::Number(Number::from(*n)),
            Value::Float(f) => match Number::from_f64(*f) {
                Some(n) => serde_json::Value::Number(n),
                None => serde_json::Value::Null,
            },
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(fields) => {
                let mut map = serde_json::Map::with_capacity(fields.len());
                for (key, val) in fields {
                    map.insert(key.clone(), val.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}
