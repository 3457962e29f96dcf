//! Persistence backends for [`Table`] documents.
//!
//! ## `FileBackend` save protocol
//!
//! 1. Serialize the table to pretty JSON.
//! 2. Write to `<path>.tmp` in the same directory.
//! 3. `chmod 0600` the `.tmp` file.
//! 4. Rename over the final path (atomic on POSIX).
//!
//! A reader therefore sees either the old table or the new one, never a
//! half-applied batch.

use std::fmt;
use std::path::{Path, PathBuf};

use datalink_core::Role;

use crate::error::{io_err, StoreError};
use crate::table::Table;

/// Load / save of one repository's table.
pub trait Backend {
    fn load(&self) -> Result<Table, StoreError>;
    fn save(&mut self, table: &Table) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// Keeps the table in process memory.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    table: Table,
}

impl MemoryBackend {
    pub fn new(role: Role) -> Self {
        Self {
            table: Table::new(role),
        }
    }
}

impl Backend for MemoryBackend {
    fn load(&self) -> Result<Table, StoreError> {
        Ok(self.table.clone())
    }

    fn save(&mut self, table: &Table) -> Result<(), StoreError> {
        self.table = table.clone();
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Resolved connection credentials, passed explicitly at construction.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub user: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// Persists the table as a JSON document at `path`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    role: Role,
    /// Not read by the JSON format; carried so a backend that talks to a
    /// real server gets its credentials through the same constructor.
    credentials: Credentials,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>, role: Role, credentials: Credentials) -> Self {
        Self {
            path: path.into(),
            role,
            credentials,
        }
    }

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl Backend for FileBackend {
    /// A missing file is an empty table of the backend's role.
    fn load(&self) -> Result<Table, StoreError> {
        tracing::debug!(
            path = %self.path.display(),
            role = %self.role,
            user = self.credentials.user.as_deref().unwrap_or("-"),
            "loading repository"
        );
        if !self.path.exists() {
            return Ok(Table::new(self.role));
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| io_err(&self.path, e))?;
        let table: Table = serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;
        if table.role != self.role {
            return Err(StoreError::RoleMismatch {
                path: self.path.clone(),
                expected: self.role,
                found: table.role,
            });
        }
        table.validate()?;
        Ok(table)
    }

    fn save(&mut self, table: &Table) -> Result<(), StoreError> {
        let Some(dir) = self.path.parent() else {
            return Err(io_err(
                &self.path,
                std::io::Error::other("invalid repository path"),
            ));
        };
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

        let json = serde_json::to_string_pretty(table)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        set_file_permissions(&tmp)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&self.path, e));
        }
        tracing::debug!(path = %self.path.display(), rows = table.rows.len(), "saved repository");
        Ok(())
    }
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
