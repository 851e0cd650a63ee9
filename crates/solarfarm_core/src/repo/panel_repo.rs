//! Panel repository contract and storage error type.
//!
//! # Responsibility
//! - Declare the CRUD surface the service layer depends on.
//! - Carry infrastructure failures separately from business-rule rejections.
//!
//! # Invariants
//! - `update`/`delete_by_id` report a missing id as `Ok(false)`.
//! - `find_by_id` reports a missing id as `Ok(None)`.

use crate::db::DbError;
use crate::model::solar_panel::{PanelId, SolarPanel};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StorageResult<T> = Result<T, StorageError>;

/// Infrastructure failure raised by any panel repository.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Flat-file read or write failure other than "file does not exist".
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Persisted data cannot be converted to a valid panel.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "could not access panel file `{}`: {source}", path.display())
            }
            Self::InvalidData(message) => write!(f, "invalid persisted panel data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "panel repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "panel repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "panel repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for panel CRUD operations.
pub trait PanelRepository {
    /// Lists every panel ordered by section, row, column.
    fn find_all(&self) -> StorageResult<Vec<SolarPanel>>;
    /// Lists panels whose section matches case-insensitively.
    fn find_by_section(&self, section: &str) -> StorageResult<Vec<SolarPanel>>;
    /// Gets one panel by surrogate key.
    fn find_by_id(&self, id: PanelId) -> StorageResult<Option<SolarPanel>>;
    /// Persists a new panel and returns it with its assigned id.
    fn create(&self, panel: &SolarPanel) -> StorageResult<SolarPanel>;
    /// Replaces the panel with `panel.id`; `false` when no such record exists.
    fn update(&self, panel: &SolarPanel) -> StorageResult<bool>;
    /// Removes the panel with `id`; `false` when no such record exists.
    fn delete_by_id(&self, id: PanelId) -> StorageResult<bool>;
}

impl<R: PanelRepository + ?Sized> PanelRepository for &R {
    fn find_all(&self) -> StorageResult<Vec<SolarPanel>> {
        (**self).find_all()
    }

    fn find_by_section(&self, section: &str) -> StorageResult<Vec<SolarPanel>> {
        (**self).find_by_section(section)
    }

    fn find_by_id(&self, id: PanelId) -> StorageResult<Option<SolarPanel>> {
        (**self).find_by_id(id)
    }

    fn create(&self, panel: &SolarPanel) -> StorageResult<SolarPanel> {
        (**self).create(panel)
    }

    fn update(&self, panel: &SolarPanel) -> StorageResult<bool> {
        (**self).update(panel)
    }

    fn delete_by_id(&self, id: PanelId) -> StorageResult<bool> {
        (**self).delete_by_id(id)
    }
}

impl<R: PanelRepository + ?Sized> PanelRepository for Box<R> {
    fn find_all(&self) -> StorageResult<Vec<SolarPanel>> {
        (**self).find_all()
    }

    fn find_by_section(&self, section: &str) -> StorageResult<Vec<SolarPanel>> {
        (**self).find_by_section(section)
    }

    fn find_by_id(&self, id: PanelId) -> StorageResult<Option<SolarPanel>> {
        (**self).find_by_id(id)
    }

    fn create(&self, panel: &SolarPanel) -> StorageResult<SolarPanel> {
        (**self).create(panel)
    }

    fn update(&self, panel: &SolarPanel) -> StorageResult<bool> {
        (**self).update(panel)
    }

    fn delete_by_id(&self, id: PanelId) -> StorageResult<bool> {
        (**self).delete_by_id(id)
    }
}

/// Sorts panels into the canonical `section, row, column` order.
pub(crate) fn sort_panels(panels: &mut [SolarPanel]) {
    panels.sort_by(|left, right| {
        left.section_str()
            .cmp(right.section_str())
            .then(left.row.cmp(&right.row))
            .then(left.column.cmp(&right.column))
    });
}
