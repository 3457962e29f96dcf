//! Link configuration and repository wiring.
//!
//! # Storage layout
//!
//! ```text
//! ~/.datalink/
//!   config.yaml                          (mode 0600)
//!   data/                                (default data_dir)
//!     <source host>/<source schema>/<table>.json
//!     <source host>/<outbound schema>/<outbound name>.json
//!     <local host>/<local schema>/<table>.json
//! ```
//!
//! Every filesystem function has an explicit-home `_at` form; tests must use
//! those and never the `dirs::home_dir()` wrappers.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use datalink_core::Role;

use crate::backend::{Credentials, FileBackend};
use crate::error::{io_err, StoreError};
use crate::gateway::{LocalTable, OutboundTable, SourceTable};
use crate::naming;

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Host plus credentials for one side of the link.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub host: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Name of an environment variable holding the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,
}

impl Connection {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: None,
            password: None,
            password_env: None,
        }
    }

    /// Resolve credentials once, at startup. An inline password wins over
    /// `password_env`; a named variable that is unset is an error.
    pub fn resolve_credentials(&self) -> Result<Credentials, StoreError> {
        let password = match (&self.password, &self.password_env) {
            (Some(p), _) => Some(p.clone()),
            (None, Some(var)) => Some(
                std::env::var(var).map_err(|_| StoreError::MissingSecret { var: var.clone() })?,
            ),
            (None, None) => None,
        };
        Ok(Credentials {
            user: self.user.clone(),
            password,
        })
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("password_env", &self.password_env)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(flatten)]
    pub connection: Connection,
    pub schema: String,
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConfig {
    #[serde(flatten)]
    pub connection: Connection,
    pub schema: String,
}

/// Root of `~/.datalink/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkConfig {
    pub source: SourceConfig,
    pub local: LocalConfig,
    /// Schema holding the outbound control table on the source host.
    /// Defaults to `<source schema>_outbound`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbound_schema: Option<String>,
    /// Root of the file-backed repositories. Defaults to `~/.datalink/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl LinkConfig {
    pub fn outbound_schema(&self) -> String {
        self.outbound_schema
            .clone()
            .unwrap_or_else(|| format!("{}_outbound", self.source.schema))
    }

    pub fn data_dir_at(&self, home: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| datalink_root(home).join("data"))
    }

    /// Repository file for `role`, under `home`'s data dir unless overridden.
    pub fn repository_path_at(&self, home: &Path, role: Role) -> PathBuf {
        let [host, schema, table] = self.location(role);
        self.data_dir_at(home)
            .join(host)
            .join(schema)
            .join(format!("{table}.json"))
    }

    /// Reject names that escape the data dir and links whose roles share a
    /// repository.
    pub fn validate(&self) -> Result<(), StoreError> {
        let names = [
            ("source host", &self.source.connection.host),
            ("source schema", &self.source.schema),
            ("table", &self.source.table),
            ("local host", &self.local.connection.host),
            ("local schema", &self.local.schema),
        ];
        for (field, value) in names {
            check_name(field, value)?;
        }
        if let Some(schema) = &self.outbound_schema {
            check_name("outbound schema", schema)?;
        }

        let roles = [Role::Source, Role::Outbound, Role::Local];
        for (i, first) in roles.iter().enumerate() {
            for second in &roles[i + 1..] {
                if self.location(*first) == self.location(*second) {
                    let [host, schema, table] = self.location(*first);
                    return Err(StoreError::RepositoryCollision {
                        first: *first,
                        second: *second,
                        path: [host, schema, table].iter().collect(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Host, schema and table segments of `role`'s repository.
    fn location(&self, role: Role) -> [String; 3] {
        let (host, schema, table) = match role {
            Role::Source => (
                self.source.connection.host.clone(),
                self.source.schema.clone(),
                self.source.table.clone(),
            ),
            Role::Outbound => (
                self.source.connection.host.clone(),
                self.outbound_schema(),
                naming::outbound_table_name(self),
            ),
            Role::Local => (
                self.local.connection.host.clone(),
                self.local.schema.clone(),
                self.source.table.clone(),
            ),
        };
        [segment(&host), segment(&schema), segment(&table)]
    }
}

/// File-backed gateways for one configured link.
#[derive(Debug)]
pub struct FileRepositories {
    pub source: SourceTable<FileBackend>,
    pub outbound: OutboundTable<FileBackend>,
    pub local: LocalTable<FileBackend>,
}

/// Resolve credentials and build the three gateways for `config`.
///
/// Outbound lives on the source host and uses the source credentials.
pub fn open_at(home: &Path, config: &LinkConfig) -> Result<FileRepositories, StoreError> {
    config.validate()?;
    let source_creds = config.source.connection.resolve_credentials()?;
    let local_creds = config.local.connection.resolve_credentials()?;
    let backend = |role: Role, creds: &Credentials| {
        FileBackend::new(config.repository_path_at(home, role), role, creds.clone())
    };
    tracing::debug!(
        outbound = %naming::outbound_table_name(config),
        "opening file repositories"
    );
    Ok(FileRepositories {
        source: SourceTable::new(backend(Role::Source, &source_creds)),
        outbound: OutboundTable::new(backend(Role::Outbound, &source_creds)),
        local: LocalTable::new(backend(Role::Local, &local_creds)),
    })
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.datalink`
pub fn datalink_root(home: &Path) -> PathBuf {
    home.join(".datalink")
}

/// `<home>/.datalink/config.yaml`
pub fn config_path_at(home: &Path) -> PathBuf {
    datalink_root(home).join("config.yaml")
}

fn segment(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

fn check_name(field: &'static str, value: &str) -> Result<(), StoreError> {
    match segment(value).as_str() {
        "" | "." | ".." => Err(StoreError::InvalidName {
            field,
            value: value.to_string(),
        }),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load `<home>/.datalink/config.yaml`.
///
/// Returns `StoreError::ConfigNotFound` if absent,
/// `StoreError::ConfigParse` (with path) if malformed.
pub fn load_at(home: &Path) -> Result<LinkConfig, StoreError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Err(StoreError::ConfigNotFound { path });
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| StoreError::ConfigParse { path, source: e })
}

/// Atomically save the config: `.yaml.tmp` sibling → `chmod 0600` → rename.
pub fn save_at(home: &Path, config: &LinkConfig) -> Result<(), StoreError> {
    let root = datalink_root(home);
    std::fs::create_dir_all(&root).map_err(|e| io_err(&root, e))?;
    let path = config_path_at(home);
    let tmp = path.with_extension("yaml.tmp");

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// Write `config` unless a config already exists; returns the config in
/// effect.
pub fn init_at(home: &Path, config: LinkConfig) -> Result<LinkConfig, StoreError> {
    if config_path_at(home).exists() {
        return load_at(home);
    }
    config.validate()?;
    save_at(home, &config)?;
    Ok(config)
}

pub fn home() -> Result<PathBuf, StoreError> {
    dirs::home_dir().ok_or(StoreError::HomeNotFound)
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}
