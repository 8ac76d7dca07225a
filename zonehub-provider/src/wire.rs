//! Wire parameter marshalling.
//!
//! Tencent Cloud rejects a request when a field's JSON type differs from the
//! declared schema type (a TTL sent as `"600"` instead of `600`, for example),
//! so request parameters are collected as [`WireValue`]s and checked before
//! serialization instead of going through an untyped `serde_json::Value`.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde_json::{Map, Number, Value};

use crate::error::{ProviderError, Result};
use crate::utils::datetime::format_tencent;

/// A single request parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    /// JSON string.
    Str(String),
    /// JSON unsigned integer.
    UInt(u64),
    /// Signed integer; only non-negative values can be marshalled.
    Int(i64),
    /// JSON boolean.
    Bool(bool),
    /// JSON number with a fractional part; must be finite.
    Float(f64),
    /// Sent as a `YYYY-MM-DD HH:MM:SS` string.
    Timestamp(NaiveDateTime),
}

impl WireValue {
    /// Check the value against the wire schema and produce its JSON form.
    pub fn to_json(&self, key: &str) -> Result<Value> {
        Ok(match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::UInt(n) => Value::Number((*n).into()),
            Self::Int(n) => {
                let n = u64::try_from(*n).map_err(|_| {
                    ProviderError::marshalling(key, format!("value {n} cannot be negative"))
                })?;
                Value::Number(n.into())
            }
            Self::Bool(b) => Value::Bool(*b),
            Self::Float(f) => Number::from_f64(*f).map(Value::Number).ok_or_else(|| {
                ProviderError::marshalling(key, format!("float value {f} is not finite"))
            })?,
            Self::Timestamp(dt) => Value::String(format_tencent(dt)),
        })
    }

    /// Render the value as a form field, applying the same checks as [`to_json`](Self::to_json).
    pub fn to_form(&self, key: &str) -> Result<String> {
        Ok(match self.to_json(key)? {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// Convert an untyped JSON value.
    ///
    /// Integers that fit `u64` become [`UInt`](Self::UInt), other integers
    /// [`Int`](Self::Int). `null`, arrays and objects have no wire
    /// representation and are rejected with the key named.
    pub fn from_json(key: &str, value: &Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::Str(s.clone())),
            Value::Bool(b) => Ok(Self::Bool(*b)),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(Self::UInt(u))
                } else if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else {
                    n.as_f64().map(Self::Float).ok_or_else(|| {
                        ProviderError::marshalling(key, format!("unsupported number {n}"))
                    })
                }
            }
            Value::Null => Err(ProviderError::marshalling(key, "unsupported type null")),
            Value::Array(_) => Err(ProviderError::marshalling(key, "unsupported type array")),
            Value::Object(_) => Err(ProviderError::marshalling(key, "unsupported type object")),
        }
    }
}

impl From<&str> for WireValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for WireValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<u64> for WireValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<u32> for WireValue {
    fn from(v: u32) -> Self {
        Self::UInt(u64::from(v))
    }
}

impl From<u16> for WireValue {
    fn from(v: u16) -> Self {
        Self::UInt(u64::from(v))
    }
}

impl From<i64> for WireValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for WireValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<bool> for WireValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for WireValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for WireValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<NaiveDateTime> for WireValue {
    fn from(v: NaiveDateTime) -> Self {
        Self::Timestamp(v)
    }
}

/// Ordered parameter map for one API call.
///
/// Keys are kept sorted so the serialized payload, and with it the request
/// signature, is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireParams {
    params: BTreeMap<String, WireValue>,
}

impl WireParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<WireValue>) -> &mut Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Chaining form of [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<WireValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert only when `value` is `Some`.
    #[must_use]
    pub fn with_opt<V: Into<WireValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.params.get(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Build from an untyped JSON object, see [`WireValue::from_json`].
    pub fn from_json_map(map: &Map<String, Value>) -> Result<Self> {
        let params = map
            .iter()
            .map(|(k, v)| WireValue::from_json(k, v).map(|wv| (k.clone(), wv)))
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(Self { params })
    }

    /// Check every value and produce the JSON object.
    pub fn to_json_value(&self) -> Result<Value> {
        let mut object = Map::with_capacity(self.params.len());
        for (key, value) in &self.params {
            object.insert(key.clone(), value.to_json(key)?);
        }
        Ok(Value::Object(object))
    }

    /// Check every value and serialize to a compact JSON string.
    pub fn marshal(&self) -> Result<String> {
        Ok(self.to_json_value()?.to_string())
    }

    /// Check every value and encode as `application/x-www-form-urlencoded`.
    pub fn to_form_body(&self) -> Result<String> {
        let mut pairs = Vec::with_capacity(self.params.len());
        for (key, value) in &self.params {
            let rendered = value.to_form(key)?;
            pairs.push(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&rendered)
            ));
        }
        Ok(pairs.join("&"))
    }
}
