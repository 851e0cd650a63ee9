//! Panel use-case service.
//!
//! # Responsibility
//! - Validate panel payloads (ranges, year, required fields, natural key).
//! - Delegate reads and accepted writes to a `PanelRepository`.
//!
//! # Invariants
//! - Rule violations are returned inside `PanelResult`; only storage
//!   failures are `Err`.
//! - The uniqueness lookup runs only when every field rule passed.
//! - Uniqueness is read-then-write: two concurrent creators of the same
//!   `(section, row, column)` can both pass. Storage does not close this gap.

use crate::clock::{Clock, SystemClock};
use crate::model::solar_panel::{PanelId, SolarPanel, MAX_ROW_COLUMN};
use crate::repo::panel_repo::{PanelRepository, StorageResult};
use crate::service::panel_result::{PanelResult, ResultKind};
use log::{info, warn};

/// Validation and orchestration facade over a panel repository.
pub struct PanelService<R: PanelRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
}

impl<R: PanelRepository> PanelService<R> {
    /// Creates a service that reads the year from the wall clock.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: PanelRepository, C: Clock> PanelService<R, C> {
    /// Creates a service with an explicit year source.
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Latest year a panel may have been installed.
    pub fn max_installation_year(&self) -> i32 {
        self.clock.current_year()
    }

    pub fn find_all(&self) -> StorageResult<Vec<SolarPanel>> {
        self.repo.find_all()
    }

    pub fn find_by_section(&self, section: &str) -> StorageResult<Vec<SolarPanel>> {
        self.repo.find_by_section(section)
    }

    pub fn find_by_id(&self, id: PanelId) -> StorageResult<Option<SolarPanel>> {
        self.repo.find_by_id(id)
    }

    /// Validates and persists a new panel.
    ///
    /// # Contract
    /// - `panel.id` must be unset (`<= 0`).
    /// - On success the result carries the panel with its assigned id.
    pub fn create(&self, panel: Option<SolarPanel>) -> StorageResult<PanelResult> {
        let mut result = self.validate(panel.as_ref())?;

        if panel.as_ref().is_some_and(|panel| panel.id > 0) {
            result.add_error("SolarPanel `id` should not be set.", ResultKind::Invalid);
        }

        if let Some(panel) = panel.filter(|_| result.is_success()) {
            let created = self.repo.create(&panel)?;
            info!(
                "event=panel_create module=service status=ok id={}",
                created.id
            );
            result.set_panel(created);
        } else {
            log_rejected("panel_create", &result);
        }

        Ok(result)
    }

    /// Validates and fully replaces an existing panel, matched by id.
    ///
    /// # Contract
    /// - `panel.id` must be set (`> 0`).
    /// - A valid payload for an unknown id yields a `NotFound` error.
    pub fn update(&self, panel: Option<SolarPanel>) -> StorageResult<PanelResult> {
        let mut result = self.validate(panel.as_ref())?;

        if panel.as_ref().is_some_and(|panel| panel.id <= 0) {
            result.add_error("SolarPanel `id` is required.", ResultKind::Invalid);
        }

        let Some(panel) = panel.filter(|_| result.is_success()) else {
            log_rejected("panel_update", &result);
            return Ok(result);
        };

        if self.repo.update(&panel)? {
            info!(
                "event=panel_update module=service status=ok id={}",
                panel.id
            );
            result.set_panel(panel);
        } else {
            result.add_error(not_found_message(panel.id), ResultKind::NotFound);
            log_rejected("panel_update", &result);
        }

        Ok(result)
    }

    /// Removes a panel by id.
    pub fn delete_by_id(&self, id: PanelId) -> StorageResult<PanelResult> {
        let mut result = PanelResult::new();
        if self.repo.delete_by_id(id)? {
            info!("event=panel_delete module=service status=ok id={id}");
        } else {
            result.add_error(not_found_message(id), ResultKind::NotFound);
            log_rejected("panel_delete", &result);
        }
        Ok(result)
    }

    /// Applies the rule set shared by create and update.
    fn validate(&self, panel: Option<&SolarPanel>) -> StorageResult<PanelResult> {
        let mut result = PanelResult::new();

        let Some(panel) = panel else {
            result.add_error("SolarPanel cannot be null.", ResultKind::Invalid);
            return Ok(result);
        };

        if panel.section_str().trim().is_empty() {
            result.add_error("SolarPanel `section` is required.", ResultKind::Invalid);
        }

        if !in_row_column_range(panel.row) {
            result.add_error(
                format!(
                    "SolarPanel `row` must be a positive number less than or equal to {MAX_ROW_COLUMN}."
                ),
                ResultKind::Invalid,
            );
        }

        if !in_row_column_range(panel.column) {
            result.add_error(
                format!(
                    "SolarPanel `column` must be a positive number less than or equal to {MAX_ROW_COLUMN}."
                ),
                ResultKind::Invalid,
            );
        }

        if panel.year_installed > self.max_installation_year() {
            result.add_error(
                "SolarPanel `yearInstalled` must be in the past.",
                ResultKind::Invalid,
            );
        }

        if panel.material.is_none() {
            result.add_error("SolarPanel `material` is required.", ResultKind::Invalid);
        }

        if result.is_success() {
            // One error per conflicting record, not deduplicated.
            for existing in self.repo.find_by_section(panel.section_str())? {
                if existing.id != panel.id && existing.same_natural_key(panel) {
                    result.add_error(
                        "SolarPanel `section`, `row`, and `column` must be unique.",
                        ResultKind::Invalid,
                    );
                }
            }
        }

        Ok(result)
    }
}

fn in_row_column_range(value: i32) -> bool {
    (1..MAX_ROW_COLUMN).contains(&value)
}

fn not_found_message(id: PanelId) -> String {
    format!("SolarPanel id {id} was not found.")
}

fn log_rejected(event: &str, result: &PanelResult) {
    warn!(
        "event={} module=service status=rejected error_count={} kind={:?}",
        event,
        result.errors().len(),
        result.kind()
    );
}
