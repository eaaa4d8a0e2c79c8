use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::value::{ConfigValue, Map, ValueKind};

/// Key-value option store populated from JSON documents.
///
/// Loads merge into the existing options: keys present in the document
/// overwrite, keys absent from it are left alone. Only [`ConfigStore::reset`]
/// removes everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigStore {
    options: Map,
}

/// Parse a JSON document whose top-level value must be an object.
///
/// Nothing is merged here, so callers can decode fully before mutating state.
pub(crate) fn decode_document(bytes: &[u8], origin: &str) -> Result<Map> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|source| {
        ConfigError::Decode { origin: origin.to_string(), source }
    })?;
    match ConfigValue::from(value) {
        ConfigValue::Object(map) => Ok(map),
        other => Err(ConfigError::NotAnObject { origin: origin.to_string(), found: other.kind() }),
    }
}

impl ConfigStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding only the options in `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut store = Self::new();
        store.load_file(path)?;
        Ok(store)
    }

    /// Read a JSON object from `path` and merge its top-level keys into the store.
    ///
    /// On any error the store is left exactly as it was.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let decoded = std::fs::read(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })
            .and_then(|bytes| decode_document(&bytes, &path.display().to_string()));

        match decoded {
            Ok(options) => {
                debug!(path = %path.display(), keys = options.len(), "loaded config file");
                self.merge_options(options);
                Ok(())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config file");
                Err(e)
            }
        }
    }

    /// Merge a JSON object held in memory.
    pub fn load_str(&mut self, json: &str) -> Result<()> {
        let options = decode_document(json.as_bytes(), "<string>")?;
        self.merge_options(options);
        Ok(())
    }

    /// Merge a JSON object read to completion from `reader`.
    pub fn load_reader<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| ConfigError::Read { origin: "<reader>".to_string(), source })?;
        let options = decode_document(&bytes, "<reader>")?;
        self.merge_options(options);
        Ok(())
    }

    /// Merge every option of `other` into this store, `other` winning on conflicts.
    pub fn merge(&mut self, other: ConfigStore) {
        self.merge_options(other.options);
    }

    fn merge_options(&mut self, options: Map) {
        self.options.extend(options);
    }

    /// Write the current options to `path` as a JSON object.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = serde_json::to_vec_pretty(&self.options).map_err(ConfigError::Encode)?;
        std::fs::write(path, data)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), keys = self.options.len(), "saved config file");
        Ok(())
    }

    /// Current options as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.options.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
        )
    }

    /// Look up a value without any type check.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.options.get(key)
    }

    /// Stored value if present, otherwise `default` as given.
    pub fn get_default(&self, key: &str, default: ConfigValue) -> ConfigValue {
        self.options.get(key).cloned().unwrap_or(default)
    }

    /// Stored integer; absent or non-integer values are a type mismatch.
    pub fn get_int(&self, key: &str) -> Result<i64> {
        self.typed(key, ValueKind::Int, ConfigValue::as_int)
    }

    /// Stored integer, or `default` when the key is not set.
    pub fn get_int_default(&self, key: &str, default: i64) -> Result<i64> {
        self.typed_default(key, default, ValueKind::Int, ConfigValue::as_int)
    }

    /// Stored boolean; absent or non-boolean values are a type mismatch.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.typed(key, ValueKind::Bool, ConfigValue::as_bool)
    }

    /// Stored boolean, or `default` when the key is not set.
    pub fn get_bool_default(&self, key: &str, default: bool) -> Result<bool> {
        self.typed_default(key, default, ValueKind::Bool, ConfigValue::as_bool)
    }

    /// Stored string; absent or non-string values are a type mismatch.
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.typed(key, ValueKind::String, |v| v.as_str().map(str::to_string))
    }

    /// Stored string, or `default` when the key is not set.
    pub fn get_string_default(&self, key: &str, default: impl Into<String>) -> Result<String> {
        self.typed_default(key, default.into(), ValueKind::String, |v| {
            v.as_str().map(str::to_string)
        })
    }

    /// Stored number as a float; integers are accepted and widened.
    pub fn get_float(&self, key: &str) -> Result<f64> {
        self.typed(key, ValueKind::Float, ConfigValue::as_float)
    }

    /// Stored number as a float, or `default` when the key is not set.
    pub fn get_float_default(&self, key: &str, default: f64) -> Result<f64> {
        self.typed_default(key, default, ValueKind::Float, ConfigValue::as_float)
    }

    /// Stored nested object.
    pub fn get_object(&self, key: &str) -> Result<&Map> {
        self.typed(key, ValueKind::Object, ConfigValue::as_object)
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        expected: ValueKind,
        extract: impl FnOnce(&'a ConfigValue) -> Option<T>,
    ) -> Result<T> {
        let value = self
            .options
            .get(key)
            .ok_or_else(|| ConfigError::type_mismatch(key, expected, None))?;
        extract(value).ok_or_else(|| ConfigError::type_mismatch(key, expected, Some(value.kind())))
    }

    // A present key of the wrong type is an error, not a reason to fall back.
    fn typed_default<'a, T>(
        &'a self,
        key: &str,
        default: T,
        expected: ValueKind,
        extract: impl FnOnce(&'a ConfigValue) -> Option<T>,
    ) -> Result<T> {
        if !self.has(key) {
            return Ok(default);
        }
        self.typed(key, expected, extract)
    }

    /// True if `key` is set, whatever its value (including null).
    pub fn has(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Assign a single option, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.options.insert(key.into(), value.into())
    }

    /// Remove a single option, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.options.remove(key)
    }

    /// Drop every option.
    pub fn reset(&mut self) {
        self.options.clear();
        debug!("config store reset");
    }

    /// Iterate over the option names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    /// Iterate over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// True when no option is set.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl From<Map> for ConfigStore {
    fn from(options: Map) -> Self {
        Self { options }
    }
}
