//! JSON-backed option store.
//! - `ConfigStore`: owned map of options, loaded by merging JSON object files.
//! - `SharedConfigStore`: clonable handle behind one async RwLock.
//! - `global`: process-wide store with free-function accessors.
//!
//! Typed getters never panic: absent keys and wrong types both surface as
//! `ConfigError::TypeMismatch`.

pub mod error;
pub mod global;
pub mod shared;
pub mod store;
pub mod value;

pub use error::{ConfigError, Result};
pub use shared::SharedConfigStore;
pub use store::ConfigStore;
pub use value::{ConfigValue, Map, ValueKind};

/// Path used by [`load_default`] when `CONFIG_PATH` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Path of the default config file: `CONFIG_PATH`, else `config.json`.
pub fn default_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Load a fresh store from [`default_path`].
pub fn load_default() -> Result<ConfigStore> {
    ConfigStore::from_file(default_path())
}
