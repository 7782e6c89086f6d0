//! Save/load and auto-save behavior of the configuration stores.

use std::fs;
use std::path::PathBuf;

use bintag_core::config::{Config, ConfigError, JsonConfig, PropertiesConfig};

/// A per-test temp file path; removed (best-effort) by `Cleanup` on drop.
fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("bintag-config-{}-{name}", std::process::id()));
    path
}

struct Cleanup(PathBuf);

impl Drop for Cleanup {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

// ============================================================================
// PropertiesConfig
// ============================================================================

#[test]
fn properties_save_load_roundtrip() {
    let path = temp_path("props-roundtrip.properties");
    let _cleanup = Cleanup(path.clone());

    let mut config = PropertiesConfig::new();
    config.set("title", "Breakout").unwrap();
    config.set("width", 800i32).unwrap();
    config.set("fullscreen", false).unwrap();
    config.set("scale", 1.5f64).unwrap();
    config.save(&path).unwrap();

    let mut loaded = PropertiesConfig::new();
    loaded.load(&path).unwrap();
    assert_eq!(loaded.get_str("title").unwrap(), "Breakout");
    assert_eq!(loaded.get_int("width").unwrap(), 800);
    assert!(!loaded.get_bool("fullscreen").unwrap());
    assert_eq!(loaded.get_double("scale").unwrap(), 1.5);
}

#[test]
fn properties_typed_get_fails_on_unparsable_text() {
    let mut config = PropertiesConfig::new();
    config.set("width", "not a number").unwrap();
    match config.get_int("width") {
        Err(ConfigError::Parse { key, expected, .. }) => {
            assert_eq!(key, "width");
            assert_eq!(expected, "int");
        }
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn properties_missing_key_and_defaults() {
    let config = PropertiesConfig::new();
    assert!(matches!(
        config.get_str("absent"),
        Err(ConfigError::Missing(_))
    ));
    assert_eq!(config.get_int_or("absent", 60), 60);
    assert_eq!(config.get_str_or("absent", "vsync"), "vsync");
}

#[test]
fn properties_comments_and_separators_parse() {
    let path = temp_path("props-parse.properties");
    let _cleanup = Cleanup(path.clone());
    fs::write(
        &path,
        "# engine settings\n! legacy comment\ntitle=Breakout\nserver:localhost\n\n",
    )
    .unwrap();

    let mut config = PropertiesConfig::new();
    config.load(&path).unwrap();
    assert_eq!(config.get_str("title").unwrap(), "Breakout");
    assert_eq!(config.get_str("server").unwrap(), "localhost");
    assert!(!config.has("# engine settings"));
}

#[test]
fn properties_keys_with_edge_whitespace_survive_reload() {
    let path = temp_path("props-space-key.properties");
    let _cleanup = Cleanup(path.clone());

    let mut config = PropertiesConfig::new();
    config.set("key ", "v").unwrap();
    config.set(" padded ", "w").unwrap();
    config.save(&path).unwrap();

    let mut loaded = PropertiesConfig::new();
    loaded.load(&path).unwrap();
    assert!(loaded.has("key "));
    assert_eq!(loaded.get_str("key ").unwrap(), "v");
    assert_eq!(loaded.get_str(" padded ").unwrap(), "w");
}

#[test]
fn properties_auto_save_rewrites_managed_file_on_set() {
    let path = temp_path("props-autosave.properties");
    let _cleanup = Cleanup(path.clone());

    let mut config = PropertiesConfig::new();
    config.manage(path.clone());
    config.set_auto_save(true);
    config.set("lives", 3i32).unwrap();

    // No explicit save: the set itself must have written the file.
    let mut fresh = PropertiesConfig::new();
    fresh.load(&path).unwrap();
    assert_eq!(fresh.get_int("lives").unwrap(), 3);
}

#[test]
fn save_managed_without_path_is_an_error() {
    let config = PropertiesConfig::new();
    assert!(matches!(
        config.save_managed(),
        Err(ConfigError::NotManaged)
    ));
}

// ============================================================================
// JsonConfig
// ============================================================================

#[test]
fn json_save_load_roundtrip() {
    let path = temp_path("json-roundtrip.json");
    let _cleanup = Cleanup(path.clone());

    let mut config = JsonConfig::new();
    config.set("title", "Breakout").unwrap();
    config.set("lives", 3i32).unwrap();
    config.set("volume", 0.25f64).unwrap();
    config.set("muted", true).unwrap();
    config.save(&path).unwrap();

    let mut loaded = JsonConfig::new();
    loaded.load(&path).unwrap();
    assert_eq!(loaded.get_str("title").unwrap(), "Breakout");
    assert_eq!(loaded.get_int("lives").unwrap(), 3);
    assert_eq!(loaded.get_double("volume").unwrap(), 0.25);
    assert!(loaded.get_bool("muted").unwrap());
}

#[test]
fn json_getters_are_strict_about_stored_type() {
    let mut config = JsonConfig::new();
    config.set("lives", "3").unwrap();
    // The stored value is a JSON string; an int read must not parse it.
    assert!(matches!(
        config.get_int("lives"),
        Err(ConfigError::Parse { .. })
    ));
    assert_eq!(config.get_str("lives").unwrap(), "3");
}

#[test]
fn json_non_object_root_is_rejected() {
    let path = temp_path("json-array-root.json");
    let _cleanup = Cleanup(path.clone());
    fs::write(&path, "[1, 2, 3]\n").unwrap();

    let mut config = JsonConfig::new();
    assert!(matches!(
        config.load(&path),
        Err(ConfigError::RootNotObject)
    ));
}

#[test]
fn json_auto_save_rewrites_managed_file_on_set() {
    let path = temp_path("json-autosave.json");
    let _cleanup = Cleanup(path.clone());

    let mut config = JsonConfig::new();
    config.manage(path.clone());
    config.set_auto_save(true);
    config.set("level", 2i32).unwrap();

    let mut fresh = JsonConfig::new();
    fresh.load(&path).unwrap();
    assert_eq!(fresh.get_int("level").unwrap(), 2);
}

#[test]
fn json_save_is_pretty_printed() {
    let path = temp_path("json-pretty.json");
    let _cleanup = Cleanup(path.clone());

    let mut config = JsonConfig::new();
    config.set("a", 1i32).unwrap();
    config.set("b", 2i32).unwrap();
    config.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'), "expected pretty output, got: {text}");
    assert!(text.ends_with('\n'));
}
