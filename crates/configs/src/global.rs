//! Process-wide option store.
//!
//! Thin free-function facade over one lazily created [`ConfigStore`]. Code that
//! can pass a store around should prefer doing so; this exists for call sites
//! that only need "the" configuration of the running process.

use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

use crate::error::Result;
use crate::store::ConfigStore;
use crate::value::ConfigValue;

static OPTIONS: Lazy<RwLock<ConfigStore>> = Lazy::new(|| RwLock::new(ConfigStore::new()));

// The store only holds plain data, so a panic mid-write cannot leave it in a
// state worse than "partially merged"; keep serving it.
fn read() -> RwLockReadGuard<'static, ConfigStore> {
    OPTIONS.read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> RwLockWriteGuard<'static, ConfigStore> {
    OPTIONS.write().unwrap_or_else(PoisonError::into_inner)
}

/// Merge the JSON object at `path` into the process-wide options.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<()> {
    // decode before locking so readers are not blocked on file I/O
    let loaded = ConfigStore::from_file(path)?;
    write().merge(loaded);
    Ok(())
}

pub fn get(key: &str) -> Option<ConfigValue> {
    read().get(key).cloned()
}

pub fn get_default(key: &str, default: ConfigValue) -> ConfigValue {
    read().get_default(key, default)
}

pub fn get_int(key: &str) -> Result<i64> {
    read().get_int(key)
}

pub fn get_int_default(key: &str, default: i64) -> Result<i64> {
    read().get_int_default(key, default)
}

pub fn get_bool(key: &str) -> Result<bool> {
    read().get_bool(key)
}

pub fn get_bool_default(key: &str, default: bool) -> Result<bool> {
    read().get_bool_default(key, default)
}

pub fn get_string(key: &str) -> Result<String> {
    read().get_string(key)
}

pub fn get_string_default(key: &str, default: &str) -> Result<String> {
    read().get_string_default(key, default)
}

pub fn has(key: &str) -> bool {
    read().has(key)
}

pub fn set(key: &str, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
    write().set(key, value)
}

pub fn reset() {
    write().reset();
}

/// Copy of the process-wide options.
pub fn snapshot() -> ConfigStore {
    read().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use std::sync::Mutex;

    // tests in this module share the process-wide store
    static SERIAL: Mutex<()> = Mutex::new(());

    fn serial() -> std::sync::MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[test]
    fn set_get_and_reset() {
        let _guard = serial();
        reset();

        set("int", 1);
        set("bool", true);
        set("string", "string");

        assert_eq!(get_int("int").unwrap(), 1);
        assert!(get_bool("bool").unwrap());
        assert_eq!(get_string("string").unwrap(), "string");
        assert_eq!(get_int_default("foo", 99).unwrap(), 99);
        assert!(get_default("clown", ConfigValue::Null).is_null());

        reset();
        reset();
        assert!(!has("int"));
        assert!(snapshot().is_empty());
    }

    #[test]
    fn load_file_merges_into_global_options() -> anyhow::Result<()> {
        let _guard = serial();
        reset();
        set("a", 1);

        let tmp = std::env::temp_dir().join(format!("global_config_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&tmp, r#"{"b": 2}"#)?;
        load_file(&tmp)?;

        assert_eq!(get("a"), Some(ConfigValue::Int(1)));
        assert_eq!(get("b"), Some(ConfigValue::Int(2)));
        assert!(matches!(
            get_string_default("b", "z"),
            Err(ConfigError::TypeMismatch { .. })
        ));

        reset();
        let _ = std::fs::remove_file(&tmp);
        Ok(())
    }
}
