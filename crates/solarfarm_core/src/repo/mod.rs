//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the panel storage contract shared by every backend.
//! - Isolate flat-file and SQLite details from the validation service.
//!
//! # Invariants
//! - Absence of a record is a normal return value, never an error.
//! - Every infrastructure failure surfaces as `StorageError`.
//! - `find_all` and `find_by_section` return `section, row, column` order.

pub mod file_panel_repo;
pub mod panel_repo;
pub mod sqlite_panel_repo;
