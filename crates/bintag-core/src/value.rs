//! In-memory model for the tagged binary value tree.
//!
//! A [`Value`] is an explicit sum type over every kind the on-disk format can
//! carry: six scalar widths, UTF-8 strings, homogeneous arrays of each scalar
//! kind, heterogeneous value arrays, and string-keyed [`Compound`] nodes.
//! Values own their children exclusively; compounds and arrays form a tree
//! with no back-references.
//!
//! Every kind exposes two accessors:
//!
//! - a **strict** accessor (`as_int`, `as_str`, …) returning
//!   `Err(TagError::TypeMismatch)` when the stored kind differs — use it when
//!   the schema is known and a mismatch is a bug;
//! - a **safe** accessor (`as_int_safe`, `as_str_safe`, …) returning `None`
//!   instead — use it for exploratory reads.
//!
//! There is no coercion in either path: reading a string where an int was
//! stored never parses or zero-fills.

use std::collections::HashMap;
use std::fmt;

use crate::error::{Result, TagError};

/// Maximum nesting depth the codec accepts, writing and reading alike.
///
/// A format limit like the u32 length prefixes: deeper trees fail loudly
/// ([`TagError::TooDeep`] from the writer, `Malformed` from the reader)
/// instead of overflowing the stack on recursion.
pub const MAX_DEPTH: usize = 512;

/// Kind discriminator for a [`Value`], as written to the stream.
///
/// The numeric values are the wire format: one byte per serialized value,
/// preceding its payload. They must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    Byte = 0,
    Short = 1,
    Int = 2,
    Long = 3,
    Float = 4,
    Double = 5,
    String = 6,
    ByteArray = 7,
    ShortArray = 8,
    IntArray = 9,
    LongArray = 10,
    FloatArray = 11,
    DoubleArray = 12,
    StringArray = 13,
    ValueArray = 14,
    Compound = 15,
}

impl Kind {
    /// The discriminator byte for this kind.
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Decode a discriminator byte. Returns `None` for bytes outside the
    /// defined range, which the reader reports as malformed data.
    pub fn from_tag(tag: u8) -> Option<Kind> {
        Some(match tag {
            0 => Kind::Byte,
            1 => Kind::Short,
            2 => Kind::Int,
            3 => Kind::Long,
            4 => Kind::Float,
            5 => Kind::Double,
            6 => Kind::String,
            7 => Kind::ByteArray,
            8 => Kind::ShortArray,
            9 => Kind::IntArray,
            10 => Kind::LongArray,
            11 => Kind::FloatArray,
            12 => Kind::DoubleArray,
            13 => Kind::StringArray,
            14 => Kind::ValueArray,
            15 => Kind::Compound,
            _ => return None,
        })
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Byte => "byte",
            Kind::Short => "short",
            Kind::Int => "int",
            Kind::Long => "long",
            Kind::Float => "float",
            Kind::Double => "double",
            Kind::String => "string",
            Kind::ByteArray => "byte array",
            Kind::ShortArray => "short array",
            Kind::IntArray => "int array",
            Kind::LongArray => "long array",
            Kind::FloatArray => "float array",
            Kind::DoubleArray => "double array",
            Kind::StringArray => "string array",
            Kind::ValueArray => "value array",
            Kind::Compound => "compound",
        };
        f.write_str(name)
    }
}

/// A single node in the tagged value tree.
///
/// The runtime kind is fixed at construction; accessors never change or
/// reinterpret it. Comparison is structural (`PartialEq`), with float
/// payloads compared by IEEE semantics.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    ByteArray(Vec<i8>),
    ShortArray(Vec<i16>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    FloatArray(Vec<f32>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
    /// Elements may be of any kind, including compounds.
    ValueArray(Vec<Value>),
    Compound(Compound),
}

macro_rules! copy_accessors {
    ($($strict:ident / $safe:ident => $variant:ident -> $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Strict accessor: the `", stringify!($variant),
                "` payload, or `TypeMismatch` for any other kind.")]
            pub fn $strict(&self) -> Result<$ty> {
                match self {
                    Value::$variant(v) => Ok(*v),
                    other => Err(TagError::TypeMismatch {
                        expected: Kind::$variant,
                        found: other.kind(),
                    }),
                }
            }

            #[doc = concat!("Safe accessor: the `", stringify!($variant),
                "` payload, or `None` for any other kind.")]
            pub fn $safe(&self) -> Option<$ty> {
                match self {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        )*
    };
}

macro_rules! ref_accessors {
    ($($strict:ident / $safe:ident => $variant:ident -> $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Strict accessor: the `", stringify!($variant),
                "` payload, or `TypeMismatch` for any other kind.")]
            pub fn $strict(&self) -> Result<&$ty> {
                match self {
                    Value::$variant(v) => Ok(v),
                    other => Err(TagError::TypeMismatch {
                        expected: Kind::$variant,
                        found: other.kind(),
                    }),
                }
            }

            #[doc = concat!("Safe accessor: the `", stringify!($variant),
                "` payload, or `None` for any other kind.")]
            pub fn $safe(&self) -> Option<&$ty> {
                match self {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        )*
    };
}

impl Value {
    /// The kind of this value, matching its wire discriminator.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Byte(_) => Kind::Byte,
            Value::Short(_) => Kind::Short,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::String(_) => Kind::String,
            Value::ByteArray(_) => Kind::ByteArray,
            Value::ShortArray(_) => Kind::ShortArray,
            Value::IntArray(_) => Kind::IntArray,
            Value::LongArray(_) => Kind::LongArray,
            Value::FloatArray(_) => Kind::FloatArray,
            Value::DoubleArray(_) => Kind::DoubleArray,
            Value::StringArray(_) => Kind::StringArray,
            Value::ValueArray(_) => Kind::ValueArray,
            Value::Compound(_) => Kind::Compound,
        }
    }

    /// Whether this value is a compound node.
    pub fn is_compound(&self) -> bool {
        matches!(self, Value::Compound(_))
    }

    copy_accessors! {
        as_byte / as_byte_safe => Byte -> i8,
        as_short / as_short_safe => Short -> i16,
        as_int / as_int_safe => Int -> i32,
        as_long / as_long_safe => Long -> i64,
        as_float / as_float_safe => Float -> f32,
        as_double / as_double_safe => Double -> f64,
    }

    ref_accessors! {
        as_str / as_str_safe => String -> str,
        as_byte_array / as_byte_array_safe => ByteArray -> [i8],
        as_short_array / as_short_array_safe => ShortArray -> [i16],
        as_int_array / as_int_array_safe => IntArray -> [i32],
        as_long_array / as_long_array_safe => LongArray -> [i64],
        as_float_array / as_float_array_safe => FloatArray -> [f32],
        as_double_array / as_double_array_safe => DoubleArray -> [f64],
        as_string_array / as_string_array_safe => StringArray -> [String],
        as_value_array / as_value_array_safe => ValueArray -> [Value],
        as_compound / as_compound_safe => Compound -> Compound,
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    String => String,
    Vec<i8> => ByteArray,
    Vec<i16> => ShortArray,
    Vec<i32> => IntArray,
    Vec<i64> => LongArray,
    Vec<f32> => FloatArray,
    Vec<f64> => DoubleArray,
    Vec<String> => StringArray,
    Vec<Value> => ValueArray,
    Compound => Compound,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

/// A string-keyed mapping node ("tags").
///
/// Keys are unique; inserting an existing key overwrites (last write wins).
/// Iteration order is unspecified — the format does not preserve insertion
/// order, and equality is order-independent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: HashMap<String, Value>,
}

impl Compound {
    /// An empty compound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Strict lookup: the value under `key`, or `MissingKey` when absent.
    pub fn get(&self, key: &str) -> Result<&Value> {
        self.entries
            .get(key)
            .ok_or_else(|| TagError::MissingKey(key.to_owned()))
    }

    /// Safe lookup: the value under `key`, or `None` when absent.
    pub fn get_safe(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Mutable lookup, for editing a tree in place.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Whether `key` is present.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove an entry, returning it if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the compound has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Compound {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Compound {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
