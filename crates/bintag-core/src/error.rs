//! Error types for the tagged binary format.

use thiserror::Error;

use crate::value::Kind;

/// Errors surfaced by the codec and the strict value accessors.
///
/// All failures are local and synchronous; nothing here is transient, so
/// there is no retry path. Callers choose strict vs. safe accessors to opt
/// into or out of the `MissingKey`/`TypeMismatch` variants.
#[derive(Error, Debug)]
pub enum TagError {
    /// The input stream cannot be decoded: truncated, an unknown
    /// discriminator byte, an inconsistent length prefix, or invalid UTF-8.
    /// `offset` is the byte position where decoding stopped.
    #[error("malformed data at byte {offset}: {message}")]
    Malformed { offset: u64, message: String },

    /// Strict compound lookup on an absent key.
    #[error("missing key `{0}`")]
    MissingKey(String),

    /// Strict accessor invoked against a value of a different kind.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    /// A string or collection exceeds the u32 length prefix at write time.
    /// This is a format limit, never a silent truncation.
    #[error("{what} length {len} exceeds the format's u32 limit")]
    TooLong { what: &'static str, len: usize },

    /// A value tree nested past [`MAX_DEPTH`](crate::value::MAX_DEPTH) at
    /// write time. The reader reports the same limit as `Malformed`.
    #[error("nesting depth exceeds the format limit of {0}")]
    TooDeep(usize),

    /// A JSON value with no counterpart in the format (null, boolean, or an
    /// integer outside i64).
    #[error("cannot represent {0} in the tagged binary format")]
    Unrepresentable(&'static str),

    /// An underlying sink/source failure other than truncation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout bintag-core.
pub type Result<T> = std::result::Result<T, TagError>;
