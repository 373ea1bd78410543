//! Fixed-width numeric arrays and their MessagePack extension tags.

use std::fmt;
use std::str::FromStr;

use crate::CodecError;

/// Element kind of a [`TypedArray`].
///
/// Each kind owns one MessagePack extension tag; the payload of that extension
/// is the tight-packed little-endian bytes of the elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
}

impl ElementKind {
    /// Every supported kind, in tag order.
    pub const ALL: [Self; 8] = [
        Self::Int8,
        Self::UInt8,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Float32,
        Self::Float64,
    ];

    /// Extension tag written on the wire for this kind.
    #[must_use]
    pub fn tag(self) -> i8 {
        match self {
            Self::Int8 => 0x11,
            Self::UInt8 => 0x12,
            Self::Int16 => 0x13,
            Self::UInt16 => 0x14,
            Self::Int32 => 0x15,
            Self::UInt32 => 0x16,
            Self::Float32 => 0x17,
            Self::Float64 => 0x18,
        }
    }

    /// Map an extension tag back to a kind. `None` for tags outside the table.
    #[must_use]
    pub fn from_tag(tag: i8) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Size of one element in bytes.
    #[must_use]
    pub fn width(self) -> usize {
        match self {
            Self::Int8 | Self::UInt8 => 1,
            Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Float32 => 4,
            Self::Float64 => 8,
        }
    }

    /// Lowercase name, e.g. `"float32"`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::UInt8 => "uint8",
            Self::Int16 => "int16",
            Self::UInt16 => "uint16",
            Self::Int32 => "int32",
            Self::UInt32 => "uint32",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Single-character array typecode (`b B h H i I f d`) used by the
    /// notebook server's reference clients.
    #[must_use]
    pub fn typecode(self) -> char {
        match self {
            Self::Int8 => 'b',
            Self::UInt8 => 'B',
            Self::Int16 => 'h',
            Self::UInt16 => 'H',
            Self::Int32 => 'i',
            Self::UInt32 => 'I',
            Self::Float32 => 'f',
            Self::Float64 => 'd',
        }
    }

    /// Parse a single-character array typecode.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedType`] for typecodes with no
    /// extension tag (for example `q`, a 64-bit integer).
    pub fn from_typecode(code: char) -> Result<Self, CodecError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.typecode() == code)
            .ok_or_else(|| CodecError::UnsupportedType(format!("array typecode {code:?}")))
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| CodecError::UnsupportedType(format!("array element kind {s:?}")))
    }
}

/// Homogeneous fixed-width numeric array whose element kind survives the wire.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedArray {
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl TypedArray {
    /// Empty array of the given kind.
    #[must_use]
    pub fn empty(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Int8 => Self::Int8(Vec::new()),
            ElementKind::UInt8 => Self::UInt8(Vec::new()),
            ElementKind::Int16 => Self::Int16(Vec::new()),
            ElementKind::UInt16 => Self::UInt16(Vec::new()),
            ElementKind::Int32 => Self::Int32(Vec::new()),
            ElementKind::UInt32 => Self::UInt32(Vec::new()),
            ElementKind::Float32 => Self::Float32(Vec::new()),
            ElementKind::Float64 => Self::Float64(Vec::new()),
        }
    }

    /// Element kind carried by this array.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Int8(_) => ElementKind::Int8,
            Self::UInt8(_) => ElementKind::UInt8,
            Self::Int16(_) => ElementKind::Int16,
            Self::UInt16(_) => ElementKind::UInt16,
            Self::Int32(_) => ElementKind::Int32,
            Self::UInt32(_) => ElementKind::UInt32,
            Self::Float32(_) => ElementKind::Float32,
            Self::Float64(_) => ElementKind::Float64,
        }
    }

    /// Number of elements, not bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::UInt8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::UInt16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::UInt32(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
        }
    }

    /// True when the array holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw little-endian element bytes, tight-packed.
    #[must_use]
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Self::Int8(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            Self::UInt8(v) => v.clone(),
            Self::Int16(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            Self::UInt16(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            Self::Int32(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            Self::UInt32(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            Self::Float32(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
            Self::Float64(v) => v.iter().flat_map(|x| x.to_le_bytes()).collect(),
        }
    }

    /// Rebuild an array from raw little-endian element bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::MisalignedArray`] when `bytes.len()` is not a
    /// multiple of the element width.
    pub fn from_le_bytes(kind: ElementKind, bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() % kind.width() != 0 {
            return Err(CodecError::MisalignedArray {
                kind,
                len: bytes.len(),
            });
        }

        Ok(match kind {
            ElementKind::Int8 => Self::Int8(read_le(bytes, i8::from_le_bytes)),
            ElementKind::UInt8 => Self::UInt8(bytes.to_vec()),
            ElementKind::Int16 => Self::Int16(read_le(bytes, i16::from_le_bytes)),
            ElementKind::UInt16 => Self::UInt16(read_le(bytes, u16::from_le_bytes)),
            ElementKind::Int32 => Self::Int32(read_le(bytes, i32::from_le_bytes)),
            ElementKind::UInt32 => Self::UInt32(read_le(bytes, u32::from_le_bytes)),
            ElementKind::Float32 => Self::Float32(read_le(bytes, f32::from_le_bytes)),
            ElementKind::Float64 => Self::Float64(read_le(bytes, f64::from_le_bytes)),
        })
    }

    /// Parse comma-separated element values, e.g. `"1, 2.5, 3"` as `float64`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedType`] when an element does not parse
    /// as the requested kind (out of range, fractional integer, ...).
    pub fn parse_list(kind: ElementKind, list: &str) -> Result<Self, CodecError> {
        let items = list
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty());

        Ok(match kind {
            ElementKind::Int8 => Self::Int8(parse_items(kind, items)?),
            ElementKind::UInt8 => Self::UInt8(parse_items(kind, items)?),
            ElementKind::Int16 => Self::Int16(parse_items(kind, items)?),
            ElementKind::UInt16 => Self::UInt16(parse_items(kind, items)?),
            ElementKind::Int32 => Self::Int32(parse_items(kind, items)?),
            ElementKind::UInt32 => Self::UInt32(parse_items(kind, items)?),
            ElementKind::Float32 => Self::Float32(parse_items(kind, items)?),
            ElementKind::Float64 => Self::Float64(parse_items(kind, items)?),
        })
    }

    /// Elements widened to `f64`, for display.
    #[must_use]
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Self::Int8(v) => v.iter().copied().map(f64::from).collect(),
            Self::UInt8(v) => v.iter().copied().map(f64::from).collect(),
            Self::Int16(v) => v.iter().copied().map(f64::from).collect(),
            Self::UInt16(v) => v.iter().copied().map(f64::from).collect(),
            Self::Int32(v) => v.iter().copied().map(f64::from).collect(),
            Self::UInt32(v) => v.iter().copied().map(f64::from).collect(),
            Self::Float32(v) => v.iter().copied().map(f64::from).collect(),
            Self::Float64(v) => v.clone(),
        }
    }
}

fn read_le<const N: usize, T>(bytes: &[u8], from_le: fn([u8; N]) -> T) -> Vec<T> {
    bytes
        .chunks_exact(N)
        .map(|chunk| {
            let mut buf = [0_u8; N];
            buf.copy_from_slice(chunk);
            from_le(buf)
        })
        .collect()
}

fn parse_items<'a, T: FromStr>(
    kind: ElementKind,
    items: impl Iterator<Item = &'a str>,
) -> Result<Vec<T>, CodecError> {
    items
        .map(|item| {
            item.parse::<T>()
                .map_err(|_| CodecError::UnsupportedType(format!("{item:?} as {kind}")))
        })
        .collect()
}

macro_rules! typed_array_from_vec {
    ($($elem:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$elem>> for TypedArray {
                fn from(values: Vec<$elem>) -> Self {
                    Self::$variant(values)
                }
            }
        )*
    };
}

typed_array_from_vec! {
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    f32 => Float32,
    f64 => Float64,
}

#[cfg(test)]
#[path = "typed_test.rs"]
mod tests;
