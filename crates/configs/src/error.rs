use std::path::PathBuf;

use thiserror::Error;

use crate::value::ValueKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON in {origin}: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("top-level value in {origin} must be an object, found {found}")]
    NotAnObject { origin: String, found: ValueKind },
    #[error("cannot encode options: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("option `{key}`: expected {expected}, {}", describe_found(.found))]
    TypeMismatch {
        key: String,
        expected: ValueKind,
        found: Option<ValueKind>,
    },
}

fn describe_found(found: &Option<ValueKind>) -> String {
    match found {
        Some(kind) => format!("found {kind}"),
        None => "key is not set".to_string(),
    }
}

impl ConfigError {
    pub fn type_mismatch(key: &str, expected: ValueKind, found: Option<ValueKind>) -> Self {
        Self::TypeMismatch { key: key.to_string(), expected, found }
    }

    /// True for errors raised while loading a document (as opposed to lookups).
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Read { .. } | Self::Decode { .. } | Self::NotAnObject { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_messages() {
        let absent = ConfigError::type_mismatch("port", ValueKind::Int, None);
        assert_eq!(absent.to_string(), "option `port`: expected int, key is not set");

        let wrong = ConfigError::type_mismatch("x", ValueKind::String, Some(ValueKind::Int));
        assert_eq!(wrong.to_string(), "option `x`: expected string, found int");
        assert!(!wrong.is_load_error());
    }
}
