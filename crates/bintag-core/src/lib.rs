//! # bintag-core
//!
//! A **tagged binary value store**: a self-describing container format for
//! heterogeneous structured data, built for game save and settings files. A
//! tree of scalars, homogeneous arrays, heterogeneous value arrays, and
//! string-keyed compounds serializes to a compact binary stream — one
//! discriminator byte per value, big-endian numbers, u32 length prefixes —
//! and reads back with no external schema.
//!
//! ## Quick start
//!
//! ```rust
//! use bintag_core::{from_bytes, to_bytes, Compound, Value};
//!
//! let mut save = Compound::new();
//! save.set("version", "0.1.0");
//! save.set("level", 1i32);
//! save.set("scores", vec![95i32, 87, 92]);
//!
//! let bytes = to_bytes(&Value::from(save)).unwrap();
//! let restored = from_bytes(&bytes).unwrap();
//!
//! let tags = restored.as_compound().unwrap();
//! assert_eq!(tags.get("level").unwrap().as_int().unwrap(), 1);
//! assert_eq!(tags.get("scores").unwrap().as_int_array().unwrap(), &[95, 87, 92]);
//! ```
//!
//! The round-trip law holds for every constructible tree: `read(write(v))`
//! is structurally equal to `v`, including empty compounds and arbitrary
//! finite nesting.
//!
//! ## Modules
//!
//! - [`value`] — the [`Value`]/[`Compound`] tree and its strict/safe accessors
//! - [`writer`] — `Value` → byte sink
//! - [`reader`] — byte source → `Value`, with deterministic malformed-data errors
//! - [`json`] — bridge to `serde_json::Value` for inspection and authoring
//! - [`config`] — properties/JSON key-value settings stores with auto-save
//! - [`error`] — [`TagError`] and the crate [`Result`] alias

pub mod config;
pub mod error;
pub mod json;
pub mod reader;
pub mod value;
pub mod writer;

pub use error::{Result, TagError};
pub use json::{from_json, to_json};
pub use reader::{from_bytes, read};
pub use value::{Compound, Kind, Value, MAX_DEPTH};
pub use writer::{to_bytes, write};
