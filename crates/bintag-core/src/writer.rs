//! Binary writer — serializes a [`Value`] tree to a byte sink.
//!
//! Wire layout per value: one discriminator byte, then the payload. Numbers
//! are big-endian; strings are a u32 byte length followed by raw UTF-8 (no
//! terminator); arrays and compounds are a u32 count followed by their
//! elements. Homogeneous arrays do not re-tag every element — only value
//! arrays and compound entries recurse with full tags.
//!
//! Writing is a single pass with no shared state: the emitted bytes are the
//! whole contract between writer and reader.

use std::io::Write;

use crate::error::{Result, TagError};
use crate::value::{Value, MAX_DEPTH};

/// Serialize a value tree into a fresh byte buffer.
pub fn to_bytes(value: &Value) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write(value, &mut buf)?;
    Ok(buf)
}

/// Serialize a value tree to a byte sink.
///
/// Emits the discriminator byte, then the payload, recursing into value
/// arrays and compounds. Fails with [`TagError::TooLong`] when a string or
/// collection exceeds the u32 length prefix, with [`TagError::TooDeep`]
/// when the tree nests past [`MAX_DEPTH`], and with [`TagError::Io`] when
/// the sink fails; nothing useful is in the sink after an error.
pub fn write<W: Write>(value: &Value, out: &mut W) -> Result<()> {
    write_nested(value, out, 0)
}

fn write_nested<W: Write>(value: &Value, out: &mut W, depth: usize) -> Result<()> {
    if depth >= MAX_DEPTH {
        return Err(TagError::TooDeep(MAX_DEPTH));
    }
    out.write_all(&[value.kind().tag()])?;
    write_payload(value, out, depth)
}

fn write_payload<W: Write>(value: &Value, out: &mut W, depth: usize) -> Result<()> {
    match value {
        Value::Byte(v) => out.write_all(&v.to_be_bytes())?,
        Value::Short(v) => out.write_all(&v.to_be_bytes())?,
        Value::Int(v) => out.write_all(&v.to_be_bytes())?,
        Value::Long(v) => out.write_all(&v.to_be_bytes())?,
        Value::Float(v) => out.write_all(&v.to_be_bytes())?,
        Value::Double(v) => out.write_all(&v.to_be_bytes())?,
        Value::String(s) => write_string(s, out)?,
        Value::ByteArray(items) => {
            write_len("byte array", items.len(), out)?;
            for v in items {
                out.write_all(&v.to_be_bytes())?;
            }
        }
        Value::ShortArray(items) => {
            write_len("short array", items.len(), out)?;
            for v in items {
                out.write_all(&v.to_be_bytes())?;
            }
        }
        Value::IntArray(items) => {
            write_len("int array", items.len(), out)?;
            for v in items {
                out.write_all(&v.to_be_bytes())?;
            }
        }
        Value::LongArray(items) => {
            write_len("long array", items.len(), out)?;
            for v in items {
                out.write_all(&v.to_be_bytes())?;
            }
        }
        Value::FloatArray(items) => {
            write_len("float array", items.len(), out)?;
            for v in items {
                out.write_all(&v.to_be_bytes())?;
            }
        }
        Value::DoubleArray(items) => {
            write_len("double array", items.len(), out)?;
            for v in items {
                out.write_all(&v.to_be_bytes())?;
            }
        }
        Value::StringArray(items) => {
            write_len("string array", items.len(), out)?;
            for s in items {
                write_string(s, out)?;
            }
        }
        Value::ValueArray(items) => {
            write_len("value array", items.len(), out)?;
            for v in items {
                write_nested(v, out, depth + 1)?;
            }
        }
        Value::Compound(compound) => {
            write_len("compound", compound.len(), out)?;
            for (key, v) in compound.iter() {
                write_string(key, out)?;
                write_nested(v, out, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn write_string<W: Write>(s: &str, out: &mut W) -> Result<()> {
    write_len("string", s.len(), out)?;
    out.write_all(s.as_bytes())?;
    Ok(())
}

/// Emit a u32 big-endian length/count prefix, rejecting anything larger.
fn write_len<W: Write>(what: &'static str, len: usize, out: &mut W) -> Result<()> {
    let prefix = u32::try_from(len).map_err(|_| TagError::TooLong { what, len })?;
    out.write_all(&prefix.to_be_bytes())?;
    Ok(())
}
