//! Native value tree carried in request and response bodies.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Number};

use crate::CodecError;
use crate::typed::TypedArray;

/// A value that can cross the wire.
///
/// Integers that fit `i64` are always held as [`Value::Int`]; only values
/// above `i64::MAX` use [`Value::UInt`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    /// UTF-8 text, written with the MessagePack `str` family.
    String(String),
    /// Raw bytes, written with the MessagePack `bin` family.
    Binary(Vec<u8>),
    /// Generic list. Numeric elements lose any width information.
    Array(Vec<Value>),
    /// Ordered key/value pairs.
    Map(Vec<(Value, Value)>),
    TypedArray(TypedArray),
    /// Extension value whose tag has no meaning to this codec.
    Ext { tag: i8, data: Vec<u8> },
}

impl Value {
    /// Look up a string key in a map value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        let Self::Map(entries) = self else {
            return None;
        };
        entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Consume a map value and return the entry stored under `key`.
    #[must_use]
    pub fn into_entry(self, key: &str) -> Option<Value> {
        let Self::Map(entries) = self else {
            return None;
        };
        entries
            .into_iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_typed_array(&self) -> Option<&TypedArray> {
        match self {
            Self::TypedArray(v) => Some(v),
            _ => None,
        }
    }

    /// Convert a JSON value. Integral numbers stay integers.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Nil,
            serde_json::Value::Bool(v) => Self::Bool(*v),
            serde_json::Value::Number(v) => number_to_value(v),
            serde_json::Value::String(v) => Self::String(v.clone()),
            serde_json::Value::Array(v) => Self::Array(v.iter().map(Self::from_json).collect()),
            serde_json::Value::Object(v) => Self::Map(
                v.iter()
                    .map(|(k, v)| (Self::String(k.clone()), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render as JSON for display.
    ///
    /// Typed arrays and binary become numeric arrays, opaque extensions become
    /// `{"ext": tag, "data": [...]}`, non-string map keys are stringified and
    /// non-finite floats become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Nil => serde_json::Value::Null,
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::Int(v) => serde_json::Value::from(*v),
            Self::UInt(v) => serde_json::Value::from(*v),
            Self::Float(v) => float_to_json(*v),
            Self::String(v) => serde_json::Value::String(v.clone()),
            Self::Binary(v) => v.iter().copied().map(serde_json::Value::from).collect(),
            Self::Array(v) => v.iter().map(Self::to_json).collect(),
            Self::Map(v) => serde_json::Value::Object(
                v.iter()
                    .map(|(k, v)| (json_key(k), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
            Self::TypedArray(v) => match v {
                TypedArray::Int8(xs) => xs.iter().copied().map(serde_json::Value::from).collect(),
                TypedArray::UInt8(xs) => xs.iter().copied().map(serde_json::Value::from).collect(),
                TypedArray::Int16(xs) => xs.iter().copied().map(serde_json::Value::from).collect(),
                TypedArray::UInt16(xs) => xs.iter().copied().map(serde_json::Value::from).collect(),
                TypedArray::Int32(xs) => xs.iter().copied().map(serde_json::Value::from).collect(),
                TypedArray::UInt32(xs) => xs.iter().copied().map(serde_json::Value::from).collect(),
                TypedArray::Float32(_) | TypedArray::Float64(_) => {
                    v.to_f64_vec().into_iter().map(float_to_json).collect()
                }
            },
            Self::Ext { tag, data } => serde_json::json!({ "ext": tag, "data": data }),
        }
    }
}

/// Convert any serializable native value into a [`Value`].
///
/// Floats keep NaN and infinities, map keys keep their type, and values that
/// serialize as bytes become [`Value::Binary`]. Structs become arrays of
/// their field values in declaration order.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedType`], carrying the value's `Debug`
/// rendering, when the value has no msgpack representation (for example a
/// 128-bit integer outside the 64-bit range).
pub fn to_value<T: Serialize + fmt::Debug + ?Sized>(value: &T) -> Result<Value, CodecError> {
    let wire = rmpv::ext::to_value(value)
        .map_err(|e| CodecError::UnsupportedType(format!("{value:?}: {e}")))?;
    crate::wire_to_value(wire)
}

fn number_to_value(number: &Number) -> Value {
    if let Some(v) = number.as_i64() {
        Value::Int(v)
    } else if let Some(v) = number.as_u64() {
        Value::UInt(v)
    } else {
        Value::Float(number.as_f64().unwrap_or(f64::NAN))
    }
}

fn float_to_json(v: f64) -> serde_json::Value {
    Number::from_f64(v).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

fn json_key(key: &Value) -> String {
    match key {
        Value::String(v) => v.clone(),
        other => other.to_json().to_string(),
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Self::UInt(v), Self::Int)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Self::from(v as u64)
    }
}

macro_rules! value_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<TypedArray> for Value {
    fn from(v: TypedArray) -> Self {
        Self::TypedArray(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Value>> From<BTreeMap<String, V>> for Value {
    fn from(v: BTreeMap<String, V>) -> Self {
        Self::Map(
            v.into_iter()
                .map(|(k, v)| (Self::String(k), v.into()))
                .collect(),
        )
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Nil, Into::into)
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
