use std::path::PathBuf;

use configs::{ConfigError, ConfigStore, ConfigValue, ValueKind};
use serde_json::json;
use uuid::Uuid;

/// Temp file removed on drop so failed assertions don't leak files.
struct TempJson(PathBuf);

impl TempJson {
    fn with_contents(contents: &str) -> anyhow::Result<Self> {
        let path = std::env::temp_dir().join(format!("config_test_{}.json", Uuid::new_v4()));
        std::fs::write(&path, contents)?;
        Ok(Self(path))
    }
}

impl Drop for TempJson {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn written_options_load_back_identically() -> anyhow::Result<()> {
    let mut store = ConfigStore::new();
    store.set("int", 1);
    store.set("bool", true);
    store.set("string", "string");
    store.set("type", ConfigValue::from(json!({"A": 1, "nested": {"deep": [1, 2.5, null]}})));
    let expected = store.clone();

    let file = TempJson::with_contents(&serde_json::to_string(&store.to_json())?)?;
    store.reset();
    assert!(store.is_empty());

    store.load_file(&file.0)?;
    assert_eq!(store, expected);
    Ok(())
}

#[test]
fn loading_keeps_keys_missing_from_document() -> anyhow::Result<()> {
    let file = TempJson::with_contents(r#"{"b": 2}"#)?;
    let mut store = ConfigStore::new();
    store.set("a", 1);

    store.load_file(&file.0)?;
    assert_eq!(store.to_json(), json!({"a": 1, "b": 2}));
    Ok(())
}

#[test]
fn later_loads_win_and_may_change_type() -> anyhow::Result<()> {
    let first = TempJson::with_contents(r#"{"port": 8080, "name": "a"}"#)?;
    let second = TempJson::with_contents(r#"{"port": "auto"}"#)?;

    let mut store = ConfigStore::from_file(&first.0)?;
    store.load_file(&second.0)?;

    assert_eq!(store.get_string("port")?, "auto");
    assert_eq!(store.get_string("name")?, "a");
    assert!(store.get_int("port").is_err());
    Ok(())
}

#[test]
fn bad_files_are_rejected_without_partial_merge() -> anyhow::Result<()> {
    let malformed = TempJson::with_contents(r#"{"a": 2, "b": "#)?;
    let not_object = TempJson::with_contents(r#"["a", "b"]"#)?;
    let missing = std::env::temp_dir().join(format!("config_test_absent_{}.json", Uuid::new_v4()));

    let mut store = ConfigStore::new();
    store.set("a", 1);

    let err = store.load_file(&malformed.0).unwrap_err();
    assert!(matches!(err, ConfigError::Decode { .. }), "{err}");

    let err = store.load_file(&not_object.0).unwrap_err();
    assert!(matches!(err, ConfigError::NotAnObject { found: ValueKind::Array, .. }), "{err}");

    let err = store.load_file(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err}");

    assert_eq!(store.to_json(), json!({"a": 1}));
    Ok(())
}

#[test]
fn end_to_end_lookup_after_load() -> anyhow::Result<()> {
    let file = TempJson::with_contents(r#"{"x": 5, "bool": true}"#)?;
    let mut store = ConfigStore::new();
    store.load_file(&file.0)?;

    assert_eq!(store.get("x"), Some(&ConfigValue::Int(5)));
    assert!(store.get_bool_default("bool", false)?);
    assert!(!store.get_bool_default("absent", false)?);
    assert_eq!(store.get_int_default("x", 99)?, 5);
    assert_eq!(store.get_int_default("missing", 99)?, 99);

    match store.get_string_default("x", "z") {
        Err(ConfigError::TypeMismatch { key, expected, found }) => {
            assert_eq!(key, "x");
            assert_eq!(expected, ValueKind::String);
            assert_eq!(found, Some(ValueKind::Int));
        }
        other => panic!("expected a type mismatch, got {other:?}"),
    }
    Ok(())
}

#[test]
fn load_default_reads_config_path() -> anyhow::Result<()> {
    let file = TempJson::with_contents(r#"{"from_env_path": true}"#)?;
    std::env::set_var("CONFIG_PATH", &file.0);

    let store = configs::load_default()?;
    assert!(store.get_bool("from_env_path")?);

    std::env::remove_var("CONFIG_PATH");
    Ok(())
}
