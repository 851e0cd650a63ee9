//! Domain model for the solar farm inventory.
//!
//! # Responsibility
//! - Define the panel record shared by validation, storage, and front ends.
//! - Keep the closed material set and its stable wire names in one place.
//!
//! # Invariants
//! - `(section, row, column)` is the natural key; `id` is the surrogate key.
//! - `id == 0` means the panel has not been persisted yet.

pub mod solar_panel;
