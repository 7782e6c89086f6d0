//! Key-value configuration stores for application settings.
//!
//! Configuration lives alongside the binary save format, not through it:
//! these stores are plain text on disk (a `key=value` properties file or a
//! flat JSON object) with typed getters, explicit `load`/`save`, and an
//! optional managed path so callers don't thread the file location through
//! every call. With auto-save enabled, every `set` rewrites the managed
//! file.
//!
//! Typed getters never coerce: asking [`JsonConfig`] for an int where a
//! string is stored is a [`ConfigError::Parse`], not a parse-or-zero.
//! [`PropertiesConfig`] stores everything as strings, so its typed getters
//! parse on read and fail loudly when the text doesn't parse.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value as Json};
use thiserror::Error;

/// Errors from configuration load/save and typed access.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration root is not a JSON object")]
    RootNotObject,

    #[error("missing property `{0}`")]
    Missing(String),

    #[error("property `{key}` is not a valid {expected}: `{value}`")]
    Parse {
        key: String,
        expected: &'static str,
        value: String,
    },

    /// `load_managed`/`save_managed` without a managed path.
    #[error("no managed file for this configuration")]
    NotManaged,
}

/// A value accepted by [`Config::set`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    fn render(&self) -> String {
        match self {
            Scalar::Bool(v) => v.to_string(),
            Scalar::Int(v) => v.to_string(),
            Scalar::Float(v) => v.to_string(),
            Scalar::Str(v) => v.clone(),
        }
    }

    fn to_json(&self) -> Json {
        match self {
            Scalar::Bool(v) => Json::from(*v),
            Scalar::Int(v) => Json::from(*v),
            Scalar::Float(v) => Number::from_f64(*v).map_or(Json::Null, Json::Number),
            Scalar::Str(v) => Json::from(v.as_str()),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant(v.into())
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    f32 => Float,
    f64 => Float,
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

/// Managed-file state shared by every configuration store.
#[derive(Debug, Default)]
pub struct Managed {
    path: Option<PathBuf>,
    auto_save: bool,
}

/// A typed key-value configuration with explicit load/save.
pub trait Config {
    fn managed(&self) -> &Managed;
    fn managed_mut(&mut self) -> &mut Managed;

    /// Insert or overwrite a property; with auto-save on, also rewrites the
    /// managed file.
    fn set_scalar(&mut self, key: &str, value: Scalar) -> Result<(), ConfigError>;

    fn has(&self, key: &str) -> bool;

    fn get_str(&self, key: &str) -> Result<String, ConfigError>;
    fn get_bool(&self, key: &str) -> Result<bool, ConfigError>;
    fn get_int(&self, key: &str) -> Result<i32, ConfigError>;
    fn get_long(&self, key: &str) -> Result<i64, ConfigError>;
    fn get_float(&self, key: &str) -> Result<f32, ConfigError>;
    fn get_double(&self, key: &str) -> Result<f64, ConfigError>;

    /// Replace the current contents with the file at `path`.
    fn load(&mut self, path: &Path) -> Result<(), ConfigError>;

    /// Write the current contents to `path`.
    fn save(&self, path: &Path) -> Result<(), ConfigError>;

    /// Convenience form of [`Config::set_scalar`].
    fn set(&mut self, key: &str, value: impl Into<Scalar>) -> Result<(), ConfigError>
    where
        Self: Sized,
    {
        self.set_scalar(key, value.into())
    }

    /// Remember `path` so `load_managed`/`save_managed` (and auto-save) know
    /// where to go.
    fn manage(&mut self, path: impl Into<PathBuf>)
    where
        Self: Sized,
    {
        self.managed_mut().path = Some(path.into());
    }

    fn managed_path(&self) -> Option<&Path> {
        self.managed().path.as_deref()
    }

    fn set_auto_save(&mut self, auto_save: bool) {
        self.managed_mut().auto_save = auto_save;
    }

    fn auto_save(&self) -> bool {
        self.managed().auto_save
    }

    fn load_managed(&mut self) -> Result<(), ConfigError> {
        let path = self
            .managed()
            .path
            .clone()
            .ok_or(ConfigError::NotManaged)?;
        self.load(&path)
    }

    fn save_managed(&self) -> Result<(), ConfigError> {
        let path = self.managed().path.as_deref().ok_or(ConfigError::NotManaged)?;
        self.save(path)
    }

    fn get_str_or(&self, key: &str, default: &str) -> String {
        self.get_str(key).unwrap_or_else(|_| default.to_owned())
    }

    fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    fn get_int_or(&self, key: &str, default: i32) -> i32 {
        self.get_int(key).unwrap_or(default)
    }

    fn get_long_or(&self, key: &str, default: i64) -> i64 {
        self.get_long(key).unwrap_or(default)
    }

    fn get_float_or(&self, key: &str, default: f32) -> f32 {
        self.get_float(key).unwrap_or(default)
    }

    fn get_double_or(&self, key: &str, default: f64) -> f64 {
        self.get_double(key).unwrap_or(default)
    }
}

/// Configuration backed by a `key=value` properties file.
///
/// Lines starting with `#` or `!` are comments. The first unescaped `=` or
/// `:` separates key from value; `\=`, `\:`, `\\`, `\n`, `\r` and `\t`
/// escapes are honored on both sides. Everything is stored as a string, and
/// saves are sorted by key so the file is stable under rewrites.
#[derive(Debug, Default)]
pub struct PropertiesConfig {
    entries: BTreeMap<String, String>,
    managed: Managed,
}

impl PropertiesConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_prop<T: std::str::FromStr>(
    key: &str,
    raw: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Parse {
        key: key.to_owned(),
        expected,
        value: raw.to_owned(),
    })
}

/// Split one properties line into key and value, or `None` for blanks and
/// comments. Unescapes as it scans; leading whitespace of the value is
/// dropped unless escaped.
fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
        return None;
    }
    let mut key = String::new();
    let mut value = String::new();
    let mut in_value = false;
    let mut value_started = false;
    // Escaped characters in the key (e.g. `\ `) are content; only the raw
    // whitespace after the last of them may be trimmed away below.
    let mut key_floor = 0;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let target = if in_value { &mut value } else { &mut key };
                match chars.next() {
                    Some('n') => target.push('\n'),
                    Some('r') => target.push('\r'),
                    Some('t') => target.push('\t'),
                    Some(other) => target.push(other),
                    None => {}
                }
                value_started = in_value;
                if !in_value {
                    key_floor = key.len();
                }
            }
            '=' | ':' if !in_value => in_value = true,
            _ if in_value => {
                if !value_started && c.is_whitespace() {
                    continue;
                }
                value_started = true;
                value.push(c);
            }
            _ => key.push(c),
        }
    }
    let kept = key_floor + key[key_floor..].trim_end().len();
    key.truncate(kept);
    Some((key, value))
}

fn escape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '=' => out.push_str("\\="),
            ':' => out.push_str("\\:"),
            ' ' => out.push_str("\\ "),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // A leading space would be trimmed on reload.
            ' ' if i == 0 => out.push_str("\\ "),
            _ => out.push(c),
        }
    }
    out
}

impl Config for PropertiesConfig {
    fn managed(&self) -> &Managed {
        &self.managed
    }

    fn managed_mut(&mut self) -> &mut Managed {
        &mut self.managed
    }

    fn set_scalar(&mut self, key: &str, value: Scalar) -> Result<(), ConfigError> {
        self.entries.insert(key.to_owned(), value.render());
        if self.managed.auto_save {
            self.save_managed()?;
        }
        Ok(())
    }

    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get_str(&self, key: &str) -> Result<String, ConfigError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| ConfigError::Missing(key.to_owned()))
    }

    fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        parse_prop(key, &self.get_str(key)?, "bool")
    }

    fn get_int(&self, key: &str) -> Result<i32, ConfigError> {
        parse_prop(key, &self.get_str(key)?, "int")
    }

    fn get_long(&self, key: &str) -> Result<i64, ConfigError> {
        parse_prop(key, &self.get_str(key)?, "long")
    }

    fn get_float(&self, key: &str) -> Result<f32, ConfigError> {
        parse_prop(key, &self.get_str(key)?, "float")
    }

    fn get_double(&self, key: &str) -> Result<f64, ConfigError> {
        parse_prop(key, &self.get_str(key)?, "double")
    }

    fn load(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = fs::read_to_string(path)?;
        self.entries.clear();
        for line in text.lines() {
            if let Some((key, value)) = parse_line(line) {
                self.entries.insert(key, value);
            }
        }
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(&escape_key(key));
            out.push('=');
            out.push_str(&escape_value(value));
            out.push('\n');
        }
        fs::write(path, out)?;
        Ok(())
    }
}

/// Configuration backed by a flat JSON object of scalars, pretty-printed on
/// save. Getters are strict about the stored JSON type.
#[derive(Debug, Default)]
pub struct JsonConfig {
    entries: Map<String, Json>,
    managed: Managed,
}

impl JsonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: &str) -> Result<&Json, ConfigError> {
        self.entries
            .get(key)
            .ok_or_else(|| ConfigError::Missing(key.to_owned()))
    }

    fn typed<T>(
        &self,
        key: &str,
        expected: &'static str,
        extract: impl Fn(&Json) -> Option<T>,
    ) -> Result<T, ConfigError> {
        let json = self.entry(key)?;
        extract(json).ok_or_else(|| ConfigError::Parse {
            key: key.to_owned(),
            expected,
            value: json.to_string(),
        })
    }
}

impl Config for JsonConfig {
    fn managed(&self) -> &Managed {
        &self.managed
    }

    fn managed_mut(&mut self) -> &mut Managed {
        &mut self.managed
    }

    fn set_scalar(&mut self, key: &str, value: Scalar) -> Result<(), ConfigError> {
        self.entries.insert(key.to_owned(), value.to_json());
        if self.managed.auto_save {
            self.save_managed()?;
        }
        Ok(())
    }

    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get_str(&self, key: &str) -> Result<String, ConfigError> {
        self.typed(key, "string", |j| j.as_str().map(str::to_owned))
    }

    fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        self.typed(key, "bool", Json::as_bool)
    }

    fn get_int(&self, key: &str) -> Result<i32, ConfigError> {
        self.typed(key, "int", |j| {
            j.as_i64().and_then(|i| i32::try_from(i).ok())
        })
    }

    fn get_long(&self, key: &str) -> Result<i64, ConfigError> {
        self.typed(key, "long", Json::as_i64)
    }

    fn get_float(&self, key: &str) -> Result<f32, ConfigError> {
        self.typed(key, "float", |j| j.as_f64().map(|f| f as f32))
    }

    fn get_double(&self, key: &str) -> Result<f64, ConfigError> {
        self.typed(key, "double", Json::as_f64)
    }

    fn load(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = fs::read_to_string(path)?;
        match serde_json::from_str::<Json>(&text)? {
            Json::Object(map) => {
                self.entries = map;
                Ok(())
            }
            _ => Err(ConfigError::RootNotObject),
        }
    }

    fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let mut text = serde_json::to_string_pretty(&Json::Object(self.entries.clone()))?;
        text.push('\n');
        fs::write(path, text)?;
        Ok(())
    }
}
