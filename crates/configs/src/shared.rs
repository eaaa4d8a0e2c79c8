use std::{path::Path, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::{debug, warn};

use crate::error::{ConfigError, Result};
use crate::store::{decode_document, ConfigStore};
use crate::value::ConfigValue;

/// Cloneable handle to a [`ConfigStore`] guarded by a single async RwLock.
///
/// Every clone sees the same options. Loads decode outside the lock and only
/// take the write lock for the merge itself.
#[derive(Clone, Default)]
pub struct SharedConfigStore {
    inner: Arc<RwLock<ConfigStore>>,
}

impl SharedConfigStore {
    /// Empty shared store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Share an already populated store.
    pub fn from_store(store: ConfigStore) -> Self {
        Self { inner: Arc::new(RwLock::new(store)) }
    }

    /// Read and merge a JSON object file.
    pub async fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                warn!(path = %path.display(), error = %source, "failed to read config file");
                return Err(ConfigError::Io { path: path.to_path_buf(), source });
            }
        };
        let options = decode_document(&bytes, &path.display().to_string()).map_err(|e| {
            warn!(path = %path.display(), error = %e, "failed to decode config file");
            e
        })?;

        debug!(path = %path.display(), keys = options.len(), "loaded config file");
        let mut store = self.inner.write().await;
        store.merge(ConfigStore::from(options));
        Ok(())
    }

    /// Merge a JSON object held in memory.
    pub async fn load_str(&self, json: &str) -> Result<()> {
        let options = decode_document(json.as_bytes(), "<string>")?;
        self.inner.write().await.merge(ConfigStore::from(options));
        Ok(())
    }

    /// Write the current options to `path`.
    pub async fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let data = {
            let store = self.inner.read().await;
            serde_json::to_vec_pretty(&store.to_json()).map_err(ConfigError::Encode)?
        };
        fs::write(path, data)
            .await
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Ok(())
    }

    /// Clone of the stored value, if any.
    pub async fn get(&self, key: &str) -> Option<ConfigValue> {
        self.inner.read().await.get(key).cloned()
    }

    /// Stored value if present, otherwise `default`.
    pub async fn get_default(&self, key: &str, default: ConfigValue) -> ConfigValue {
        self.inner.read().await.get_default(key, default)
    }

    /// Stored integer, or a type mismatch.
    pub async fn get_int(&self, key: &str) -> Result<i64> {
        self.inner.read().await.get_int(key)
    }

    /// Stored integer, or `default` when the key is not set.
    pub async fn get_int_default(&self, key: &str, default: i64) -> Result<i64> {
        self.inner.read().await.get_int_default(key, default)
    }

    /// Stored boolean, or a type mismatch.
    pub async fn get_bool(&self, key: &str) -> Result<bool> {
        self.inner.read().await.get_bool(key)
    }

    /// Stored boolean, or `default` when the key is not set.
    pub async fn get_bool_default(&self, key: &str, default: bool) -> Result<bool> {
        self.inner.read().await.get_bool_default(key, default)
    }

    /// Stored string, or a type mismatch.
    pub async fn get_string(&self, key: &str) -> Result<String> {
        self.inner.read().await.get_string(key)
    }

    /// Stored string, or `default` when the key is not set.
    pub async fn get_string_default(&self, key: &str, default: &str) -> Result<String> {
        self.inner.read().await.get_string_default(key, default)
    }

    /// Stored number as a float, or a type mismatch.
    pub async fn get_float(&self, key: &str) -> Result<f64> {
        self.inner.read().await.get_float(key)
    }

    /// Stored number as a float, or `default` when the key is not set.
    pub async fn get_float_default(&self, key: &str, default: f64) -> Result<f64> {
        self.inner.read().await.get_float_default(key, default)
    }

    /// True if `key` is set.
    pub async fn has(&self, key: &str) -> bool {
        self.inner.read().await.has(key)
    }

    /// Assign a single option, returning the previous value.
    pub async fn set(&self, key: &str, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.inner.write().await.set(key, value)
    }

    /// Drop every option.
    pub async fn reset(&self) {
        self.inner.write().await.reset();
    }

    /// Copy of the current options.
    pub async fn snapshot(&self) -> ConfigStore {
        self.inner.read().await.clone()
    }

    /// Apply a mutation to the underlying store under one write lock.
    pub async fn update<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut ConfigStore) -> T,
    {
        let mut store = self.inner.write().await;
        f(&mut store)
    }
}
