//! Session lifecycle around one database snapshot
//!
//! A session owns the in-memory [`Database`] loaded from (or destined for)
//! a snapshot path. Changes reach disk only through [`Session::save`] or
//! [`Session::close`], so a run that fails halfway leaves the snapshot
//! untouched.
//!
//! Sessions do not lock the snapshot file. Running two mutating sessions
//! against the same path at once is the caller's responsibility.

use std::path::{Path, PathBuf};

use coexpr_core::errors::{ExError, ExErrorKind};
use coexpr_core::Database;

use crate::errors::{read_only, Result};
use crate::snapshot::{load_snapshot, save_snapshot, SnapshotInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadWrite,
    ReadOnly,
}

#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    database: Database,
    mode: AccessMode,
    dirty: bool,
    last_snapshot: Option<SnapshotInfo>,
}

impl Session {
    /// Start a new, empty database at `path`
    ///
    /// Nothing is written until the session is saved.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if a file is already present at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Err(ExError::new(ExErrorKind::AlreadyExists)
                .with_op("session_create")
                .with_path(path.display().to_string())
                .with_message("A database already exists at this path"));
        }
        Ok(Self {
            path: path.to_path_buf(),
            database: Database::new(),
            mode: AccessMode::ReadWrite,
            dirty: true,
            last_snapshot: None,
        })
    }

    /// Open an existing database for reading and writing
    ///
    /// # Errors
    ///
    /// Fails if the snapshot cannot be read or verified.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path.as_ref(), AccessMode::ReadWrite)
    }

    /// Open an existing database for reading only
    ///
    /// # Errors
    ///
    /// Fails if the snapshot cannot be read or verified.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path.as_ref(), AccessMode::ReadOnly)
    }

    fn open_with(path: &Path, mode: AccessMode) -> Result<Self> {
        let (database, info) = load_snapshot(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            database,
            mode,
            dirty: false,
            last_snapshot: Some(info),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == AccessMode::ReadOnly
    }

    /// Digest and time of the snapshot last loaded or saved
    pub fn last_snapshot(&self) -> Option<&SnapshotInfo> {
        self.last_snapshot.as_ref()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Mutable access; marks the session dirty
    ///
    /// # Errors
    ///
    /// Returns `ReadOnly` for a read-only session.
    pub fn database_mut(&mut self) -> Result<&mut Database> {
        if self.is_read_only() {
            return Err(read_only("database_mut", &self.path));
        }
        self.dirty = true;
        Ok(&mut self.database)
    }

    /// Give up the session and keep the database as a scratch copy
    ///
    /// Used by analysis runs that extend the database in memory without
    /// ever persisting it.
    pub fn into_database(self) -> Database {
        self.database
    }

    /// Write the database to the snapshot path
    ///
    /// # Errors
    ///
    /// Returns `ReadOnly` for a read-only session, otherwise any snapshot
    /// write error.
    pub fn save(&mut self) -> Result<()> {
        if self.is_read_only() {
            return Err(read_only("save", &self.path));
        }
        let info = save_snapshot(&self.path, &self.database)?;
        self.last_snapshot = Some(info);
        self.dirty = false;
        Ok(())
    }

    /// Save pending changes and end the session
    ///
    /// # Errors
    ///
    /// Any error from [`Session::save`].
    pub fn close(mut self) -> Result<()> {
        if self.dirty && !self.is_read_only() {
            self.save()?;
        }
        Ok(())
    }
}
