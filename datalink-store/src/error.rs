//! Error types for datalink-store.

use std::path::PathBuf;

use thiserror::Error;

use datalink_core::{Flag, GatewayError, Identifier, Role};

/// All errors that can arise from the storage adapter, config, and naming.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (save path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error (config save path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A repository file could not be parsed.
    #[error("failed to parse repository at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The config file could not be parsed.
    #[error("failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    #[error("config not found at {path}; run `datalink init` first")]
    ConfigNotFound { path: PathBuf },

    /// A repository file holds a row for a different role than expected.
    #[error("repository at {path} belongs to the {found} role, expected {expected}")]
    RoleMismatch {
        path: PathBuf,
        expected: Role,
        found: Role,
    },

    /// A stored row carries a flag its role does not define.
    #[error("{role} row {identifier} carries flag {flag}, which {role} does not define")]
    ForbiddenFlag {
        role: Role,
        identifier: Identifier,
        flag: Flag,
    },

    /// `password_env` names a variable that is not set.
    #[error("environment variable {var} named by password_env is not set")]
    MissingSecret { var: String },

    /// A host, schema or table name that cannot be used as a path segment.
    #[error("{field} {value:?} cannot name a repository")]
    InvalidName { field: &'static str, value: String },

    /// Two roles of one link resolve to the same repository.
    #[error("{first} and {second} repositories would share {path}")]
    RepositoryCollision {
        first: Role,
        second: Role,
        path: PathBuf,
    },

    /// Gateway-level rejection surfaced through an operator helper.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Convenience constructor for [`StoreError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.into(),
        source,
    }
}
