//! Core domain logic for the solar farm inventory.
//! Validation rules live here; storage backends are swappable collaborators.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, StorageBackend, StorageConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::solar_panel::{Material, ParseMaterialError, PanelId, SolarPanel, MAX_ROW_COLUMN};
pub use repo::file_panel_repo::FilePanelRepository;
pub use repo::panel_repo::{PanelRepository, StorageError, StorageResult};
pub use repo::sqlite_panel_repo::SqlitePanelRepository;
pub use service::panel_result::{ErrorMessage, PanelResult, ResultKind};
pub use service::panel_service::PanelService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
