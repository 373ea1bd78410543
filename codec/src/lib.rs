//! MessagePack value model and codec for notebook RPC bodies.
//!
//! This crate owns the wire representation shared by the client and the CLI.
//! Payloads stay flexible ([`Value`]) while fixed-width numeric arrays are
//! carried as MessagePack extension values so their element kind survives the
//! round trip. Extension tags outside the table in [`ElementKind::tag`] are
//! passed through untouched.

mod typed;
mod value;

pub use typed::{ElementKind, TypedArray};
pub use value::{Value, to_value};

/// Error returned by the codec.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A native value, typecode or element kind has no wire representation.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),
    /// Writing the MessagePack stream failed.
    #[error("failed to encode msgpack value: {0}")]
    Encode(String),
    /// The raw bytes could not be decoded as MessagePack.
    #[error("failed to decode msgpack value: {0}")]
    Decode(#[from] rmpv::decode::Error),
    /// Bytes remained after the first complete value.
    #[error("{0} trailing bytes after msgpack value")]
    TrailingBytes(usize),
    /// A typed-array extension payload is not a whole number of elements.
    #[error("{len} bytes is not a whole number of {kind} elements")]
    MisalignedArray { kind: ElementKind, len: usize },
    /// A `str` value held bytes that are not valid UTF-8.
    #[error("msgpack string is not valid utf-8")]
    InvalidUtf8,
}

/// Encode a value into MessagePack bytes.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if the underlying writer fails.
pub fn encode(value: &Value) -> Result<Vec<u8>, CodecError> {
    let wire = value_to_wire(value);

    let mut out = Vec::new();
    rmpv::encode::write_value(&mut out, &wire).map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(out)
}

/// Convert a serializable native value and encode it.
///
/// # Errors
///
/// Returns [`CodecError::UnsupportedType`] when the value cannot be
/// represented on the wire, otherwise as [`encode`].
pub fn encode_native<T>(value: &T) -> Result<Vec<u8>, CodecError>
where
    T: serde::Serialize + std::fmt::Debug + ?Sized,
{
    encode(&to_value(value)?)
}

/// Decode exactly one MessagePack value.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed bytes,
/// [`CodecError::TrailingBytes`] when more than one value is present,
/// [`CodecError::MisalignedArray`] for a typed-array payload of the wrong
/// length and [`CodecError::InvalidUtf8`] for non-UTF-8 strings.
pub fn decode(bytes: &[u8]) -> Result<Value, CodecError> {
    let mut rest = bytes;
    let wire = rmpv::decode::read_value(&mut rest)?;
    if !rest.is_empty() {
        return Err(CodecError::TrailingBytes(rest.len()));
    }
    wire_to_value(wire)
}

fn value_to_wire(value: &Value) -> rmpv::Value {
    match value {
        Value::Nil => rmpv::Value::Nil,
        Value::Bool(v) => rmpv::Value::Boolean(*v),
        Value::Int(v) => rmpv::Value::from(*v),
        Value::UInt(v) => rmpv::Value::from(*v),
        Value::Float(v) => rmpv::Value::F64(*v),
        Value::String(v) => rmpv::Value::String(v.as_str().into()),
        Value::Binary(v) => rmpv::Value::Binary(v.clone()),
        Value::Array(v) => rmpv::Value::Array(v.iter().map(value_to_wire).collect()),
        Value::Map(v) => rmpv::Value::Map(
            v.iter()
                .map(|(k, v)| (value_to_wire(k), value_to_wire(v)))
                .collect(),
        ),
        Value::TypedArray(v) => rmpv::Value::Ext(v.kind().tag(), v.to_le_bytes()),
        Value::Ext { tag, data } => rmpv::Value::Ext(*tag, data.clone()),
    }
}

pub(crate) fn wire_to_value(wire: rmpv::Value) -> Result<Value, CodecError> {
    Ok(match wire {
        rmpv::Value::Nil => Value::Nil,
        rmpv::Value::Boolean(v) => Value::Bool(v),
        rmpv::Value::Integer(v) => match (v.as_i64(), v.as_u64()) {
            (Some(i), _) => Value::Int(i),
            (None, Some(u)) => Value::UInt(u),
            (None, None) => return Err(CodecError::UnsupportedType(format!("integer {v:?}"))),
        },
        rmpv::Value::F32(v) => Value::Float(f64::from(v)),
        rmpv::Value::F64(v) => Value::Float(v),
        rmpv::Value::String(v) => Value::String(v.into_str().ok_or(CodecError::InvalidUtf8)?),
        rmpv::Value::Binary(v) => Value::Binary(v),
        rmpv::Value::Array(v) => Value::Array(
            v.into_iter()
                .map(wire_to_value)
                .collect::<Result<_, _>>()?,
        ),
        rmpv::Value::Map(v) => Value::Map(
            v.into_iter()
                .map(|(k, v)| Ok((wire_to_value(k)?, wire_to_value(v)?)))
                .collect::<Result<_, CodecError>>()?,
        ),
        rmpv::Value::Ext(tag, data) => match ElementKind::from_tag(tag) {
            Some(kind) => Value::TypedArray(TypedArray::from_le_bytes(kind, &data)?),
            None => Value::Ext { tag, data },
        },
    })
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
