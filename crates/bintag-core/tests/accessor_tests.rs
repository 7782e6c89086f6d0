//! Strict vs. safe accessor behavior on values and compounds.

use bintag_core::{Compound, Kind, TagError, Value};

#[test]
fn strict_accessor_matches_stored_kind() {
    assert_eq!(Value::Int(7).as_int().unwrap(), 7);
    assert_eq!(Value::from("hi").as_str().unwrap(), "hi");
    assert_eq!(Value::LongArray(vec![1, 2]).as_long_array().unwrap(), &[1, 2]);
}

#[test]
fn strict_accessor_fails_with_type_mismatch() {
    match Value::from("42").as_int() {
        Err(TagError::TypeMismatch { expected, found }) => {
            assert_eq!(expected, Kind::Int);
            assert_eq!(found, Kind::String);
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn strict_accessor_never_coerces_between_widths() {
    // A byte is not an int, even though the value would fit.
    assert!(Value::Byte(1).as_int().is_err());
    assert!(Value::Int(1).as_long().is_err());
}

#[test]
fn safe_accessor_returns_none_on_mismatch() {
    assert_eq!(Value::from("42").as_int_safe(), None);
    assert_eq!(Value::Int(1).as_str_safe(), None);
    assert_eq!(Value::Int(1).as_compound_safe(), None);
}

#[test]
fn safe_accessor_returns_payload_on_match() {
    assert_eq!(Value::Double(0.5).as_double_safe(), Some(0.5));
    let tags = Compound::new();
    assert!(Value::from(tags).as_compound_safe().is_some());
}

#[test]
fn kind_reports_wire_discriminator() {
    assert_eq!(Value::Byte(0).kind().tag(), 0);
    assert_eq!(Value::from("s").kind().tag(), 6);
    assert_eq!(Value::ValueArray(vec![]).kind().tag(), 14);
    assert_eq!(Value::Compound(Compound::new()).kind().tag(), 15);
}

// ============================================================================
// Compound lookup
// ============================================================================

#[test]
fn strict_get_fails_with_missing_key() {
    let tags = Compound::new();
    match tags.get("absent") {
        Err(TagError::MissingKey(key)) => assert_eq!(key, "absent"),
        other => panic!("expected MissingKey, got {other:?}"),
    }
}

#[test]
fn safe_get_returns_none_when_absent() {
    let tags = Compound::new();
    assert!(tags.get_safe("absent").is_none());
}

#[test]
fn last_write_wins_on_duplicate_key() {
    let mut tags = Compound::new();
    tags.set("level", 1i32);
    tags.set("level", 2i32);
    assert_eq!(tags.len(), 1);
    assert_eq!(tags.get("level").unwrap().as_int().unwrap(), 2);
}

#[test]
fn compound_membership_and_removal() {
    let mut tags = Compound::new();
    tags.set("a", 1i32);
    assert!(tags.has("a"));
    assert_eq!(tags.remove("a"), Some(Value::Int(1)));
    assert!(!tags.has("a"));
    assert!(tags.is_empty());
}

#[test]
fn get_mut_edits_in_place() {
    let mut tags = Compound::new();
    tags.set("level", 1i32);
    if let Some(level) = tags.get_mut("level") {
        *level = Value::Int(9);
    }
    assert_eq!(tags.get("level").unwrap().as_int().unwrap(), 9);
}

#[test]
fn lookup_then_typed_access_composes() {
    // The pattern save files use: strict when the schema is known, safe
    // when probing.
    let mut tags = Compound::new();
    tags.set("version", "0.1.0");
    tags.set("level", 1i32);

    assert_eq!(tags.get("version").unwrap().as_str().unwrap(), "0.1.0");
    assert_eq!(tags.get("level").unwrap().as_int().unwrap(), 1);
    assert!(tags
        .get_safe("level")
        .and_then(Value::as_compound_safe)
        .is_none());
}
