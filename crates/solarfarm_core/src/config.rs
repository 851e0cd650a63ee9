//! Storage backend selection.
//!
//! # Responsibility
//! - Resolve which repository implementation backs the service.
//! - Open that repository, bootstrapping SQLite when selected.
//!
//! # Invariants
//! - Unknown backend names are rejected, never defaulted silently.
//! - Environment lookup is injectable (`from_lookup`) for tests.
//! - Explicit values win; the environment is read only for what they leave
//!   open.
//! - `SOLARFARM_DATA_PATH` applies only to the backend the environment names.

use crate::db::open_db;
use crate::repo::file_panel_repo::FilePanelRepository;
use crate::repo::panel_repo::{PanelRepository, StorageError};
use crate::repo::sqlite_panel_repo::SqlitePanelRepository;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

pub const STORAGE_ENV: &str = "SOLARFARM_STORAGE";
pub const DATA_PATH_ENV: &str = "SOLARFARM_DATA_PATH";

const DEFAULT_FILE_PATH: &str = "./data/solarfarm.txt";
const DEFAULT_SQLITE_PATH: &str = "./data/solarfarm.sqlite3";

/// Which repository implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// `~`-delimited flat file.
    #[default]
    File,
    /// SQLite database file.
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Sqlite => "sqlite",
        }
    }

    /// Data path used when none is configured.
    pub fn default_path(self) -> PathBuf {
        match self {
            Self::File => PathBuf::from(DEFAULT_FILE_PATH),
            Self::Sqlite => PathBuf::from(DEFAULT_SQLITE_PATH),
        }
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Configuration failures, raised before any storage is touched.
#[derive(Debug)]
pub enum ConfigError {
    UnknownBackend(String),
    EmptyDataPath,
    Storage(StorageError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => {
                write!(f, "unsupported storage backend `{value}`; expected file|sqlite")
            }
            Self::EmptyDataPath => write!(f, "data path cannot be empty"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StorageError> for ConfigError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Resolved storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: PathBuf,
}

impl StorageConfig {
    /// Builds a config, rejecting an empty path.
    pub fn new(backend: StorageBackend, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataPath);
        }
        Ok(Self { backend, path })
    }

    /// Reads `SOLARFARM_STORAGE` and `SOLARFARM_DATA_PATH`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with a caller-supplied variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::resolve_with(None, None, lookup)
    }

    /// Fills whatever `backend`/`path` leave unset from the environment.
    pub fn resolve(
        backend: Option<StorageBackend>,
        path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        Self::resolve_with(backend, path, |key| std::env::var(key).ok())
    }

    /// Same as `resolve` with a caller-supplied variable lookup.
    pub fn resolve_with(
        backend: Option<StorageBackend>,
        path: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let backend = match backend {
            Some(backend) => backend,
            None => env_backend(&lookup)?,
        };
        let path = match path {
            Some(path) => path,
            // An explicit backend only inherits the env path when the env agrees.
            None if env_backend(&lookup).ok() == Some(backend) => lookup(DATA_PATH_ENV)
                .map(|value| PathBuf::from(value.trim()))
                .unwrap_or_else(|| backend.default_path()),
            None => backend.default_path(),
        };
        Self::new(backend, path)
    }

    /// Opens the configured repository.
    ///
    /// # Side effects
    /// - SQLite: creates/migrates the database file.
    /// - File: nothing until the first write.
    pub fn open_repository(&self) -> Result<Box<dyn PanelRepository>, ConfigError> {
        info!(
            "event=storage_open module=config status=start backend={} path={}",
            self.backend.as_str(),
            self.path.display()
        );
        let repo: Box<dyn PanelRepository> = match self.backend {
            StorageBackend::File => Box::new(FilePanelRepository::new(self.path.clone())),
            StorageBackend::Sqlite => {
                let conn = open_db(&self.path).map_err(StorageError::from)?;
                Box::new(SqlitePanelRepository::try_new(conn)?)
            }
        };
        Ok(repo)
    }
}

fn env_backend(lookup: &impl Fn(&str) -> Option<String>) -> Result<StorageBackend, ConfigError> {
    match lookup(STORAGE_ENV).filter(|value| !value.trim().is_empty()) {
        Some(value) => value.parse::<StorageBackend>(),
        None => Ok(StorageBackend::default()),
    }
}
