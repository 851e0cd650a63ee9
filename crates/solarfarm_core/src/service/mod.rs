//! Core use-case services.
//!
//! # Responsibility
//! - Enforce panel business rules above the repository layer.
//! - Report rule violations as `PanelResult` data, not as errors.
//!
//! # Invariants
//! - Only `StorageError` travels through `Err`.
//! - A rejected request never reaches a repository write.

pub mod panel_result;
pub mod panel_service;
