//! Error types for schema building, configuration, and the semantic oracle.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building schema trees or loading engine configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// The input is not well-formed JSON. No partial tree is produced.
    #[error("malformed JSON document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document nests deeper than the configured limit.
    #[error("document nesting depth {depth} exceeds the limit of {limit}")]
    TooDeep { depth: usize, limit: usize },

    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;

/// Failure of a [`SemanticOracle`](crate::oracle::SemanticOracle) call.
///
/// The field matcher never propagates these; a failed call contributes no
/// semantic matches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum OracleError {
    #[error("semantic oracle unavailable: {0}")]
    Unavailable(String),

    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),
}
