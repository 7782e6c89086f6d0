//! Binary reader — reconstructs a [`Value`] tree from a byte source.
//!
//! Exact mirror of the writer: read the discriminator byte, branch on it,
//! then decode the payload with the matching length-prefixed layout. The
//! reader consumes exactly the bytes a matching writer produced, with no
//! lookahead beyond declared lengths.
//!
//! Malformed input — truncation, an unknown discriminator, a length prefix
//! pointing past the end of the stream, invalid UTF-8, nesting past
//! [`MAX_DEPTH`] — fails with [`TagError::Malformed`] carrying the byte
//! offset; a partial value is never returned.

use std::io::{ErrorKind, Read};

use crate::error::{Result, TagError};
use crate::value::{Compound, Kind, Value, MAX_DEPTH};

/// Decode one value tree from a byte source.
///
/// Reads exactly one complete value and leaves the source positioned after
/// it; trailing bytes are the caller's business. Use [`from_bytes`] to
/// additionally reject trailing garbage.
pub fn read<R: Read>(input: &mut R) -> Result<Value> {
    Reader::new(input).read_value()
}

/// Decode one value tree from a byte slice, rejecting trailing bytes.
pub fn from_bytes(bytes: &[u8]) -> Result<Value> {
    let mut remaining = bytes;
    let mut reader = Reader::new(&mut remaining);
    let value = reader.read_value()?;
    let consumed = reader.offset;
    if !remaining.is_empty() {
        return Err(TagError::Malformed {
            offset: consumed,
            message: format!("{} trailing bytes after value", remaining.len()),
        });
    }
    Ok(value)
}

/// Elements read one at a time are still pre-reserved up to this bound, so a
/// hostile count prefix hits end-of-stream before it can force a huge
/// allocation.
const RESERVE_LIMIT: usize = 4096;

struct Reader<R> {
    inner: R,
    offset: u64,
    depth: usize,
}

macro_rules! read_num {
    ($($name:ident -> $ty:ty),* $(,)?) => {
        $(
            fn $name(&mut self) -> Result<$ty> {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                self.fill(&mut buf)?;
                Ok(<$ty>::from_be_bytes(buf))
            }
        )*
    };
}

impl<R: Read> Reader<R> {
    fn new(inner: R) -> Self {
        Reader {
            inner,
            offset: 0,
            depth: 0,
        }
    }

    fn malformed(&self, message: impl Into<String>) -> TagError {
        TagError::Malformed {
            offset: self.offset,
            message: message.into(),
        }
    }

    /// Read exactly `buf.len()` bytes, mapping end-of-stream to `Malformed`.
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                Err(self.malformed("unexpected end of stream"))
            }
            Err(e) => Err(TagError::Io(e)),
        }
    }

    read_num! {
        read_u8 -> u8,
        read_u32 -> u32,
        read_i8 -> i8,
        read_i16 -> i16,
        read_i32 -> i32,
        read_i64 -> i64,
        read_f32 -> f32,
        read_f64 -> f64,
    }

    fn read_len(&mut self) -> Result<usize> {
        Ok(self.read_u32()? as usize)
    }

    fn read_string(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes).map_err(|_| self.malformed("invalid UTF-8 in string"))
    }

    /// Read `len` raw bytes in bounded chunks.
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        const CHUNK: usize = 64 * 1024;
        let mut buf = Vec::with_capacity(len.min(CHUNK));
        let mut remaining = len;
        while remaining > 0 {
            let take = remaining.min(CHUNK);
            let start = buf.len();
            buf.resize(start + take, 0);
            self.fill(&mut buf[start..])?;
            remaining -= take;
        }
        Ok(buf)
    }

    /// Read a count prefix followed by untagged elements.
    fn read_array<T>(&mut self, read_elem: fn(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let len = self.read_len()?;
        let mut items = Vec::with_capacity(len.min(RESERVE_LIMIT));
        for _ in 0..len {
            items.push(read_elem(self)?);
        }
        Ok(items)
    }

    fn read_value(&mut self) -> Result<Value> {
        // Each level of nesting is one level of recursion; a crafted stream
        // of repeated value-array headers must not overflow the stack.
        if self.depth >= MAX_DEPTH {
            return Err(self.malformed(format!("nesting depth exceeds {MAX_DEPTH}")));
        }
        self.depth += 1;
        let value = self.read_tagged()?;
        self.depth -= 1;
        Ok(value)
    }

    fn read_tagged(&mut self) -> Result<Value> {
        let tag_offset = self.offset;
        let tag = self.read_u8()?;
        let kind = Kind::from_tag(tag).ok_or_else(|| TagError::Malformed {
            offset: tag_offset,
            message: format!("unknown discriminator 0x{tag:02x}"),
        })?;
        Ok(match kind {
            Kind::Byte => Value::Byte(self.read_i8()?),
            Kind::Short => Value::Short(self.read_i16()?),
            Kind::Int => Value::Int(self.read_i32()?),
            Kind::Long => Value::Long(self.read_i64()?),
            Kind::Float => Value::Float(self.read_f32()?),
            Kind::Double => Value::Double(self.read_f64()?),
            Kind::String => Value::String(self.read_string()?),
            Kind::ByteArray => Value::ByteArray(self.read_array(Self::read_i8)?),
            Kind::ShortArray => Value::ShortArray(self.read_array(Self::read_i16)?),
            Kind::IntArray => Value::IntArray(self.read_array(Self::read_i32)?),
            Kind::LongArray => Value::LongArray(self.read_array(Self::read_i64)?),
            Kind::FloatArray => Value::FloatArray(self.read_array(Self::read_f32)?),
            Kind::DoubleArray => Value::DoubleArray(self.read_array(Self::read_f64)?),
            Kind::StringArray => Value::StringArray(self.read_array(Self::read_string)?),
            Kind::ValueArray => Value::ValueArray(self.read_array(Self::read_value)?),
            Kind::Compound => {
                let len = self.read_len()?;
                let mut compound = Compound::new();
                for _ in 0..len {
                    let key = self.read_string()?;
                    let value = self.read_value()?;
                    compound.set(key, value);
                }
                Value::Compound(compound)
            }
        })
    }
}
