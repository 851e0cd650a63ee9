//! Solar panel domain model.
//!
//! # Responsibility
//! - Define the canonical panel record and its material enumeration.
//! - Provide natural-key helpers used by validation and storage lookups.
//!
//! # Invariants
//! - `row` and `column` are meaningful only in `1..MAX_ROW_COLUMN`.
//! - Section comparison is case-insensitive everywhere in core.
//! - `Material` wire names (`POLY_SI`, ...) are stable; they are persisted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Surrogate key assigned by storage.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PanelId = i64;

/// Exclusive upper bound for `row` and `column`.
pub const MAX_ROW_COLUMN: i32 = 250;

/// Photovoltaic material of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Material {
    /// Multicrystalline silicon.
    PolySi,
    /// Monocrystalline silicon.
    MonoSi,
    /// Amorphous silicon.
    ASi,
    /// Cadmium telluride.
    CdTe,
    /// Copper indium gallium selenide.
    Cigs,
}

impl Material {
    /// Every material, in declaration order.
    pub const ALL: [Material; 5] = [
        Material::PolySi,
        Material::MonoSi,
        Material::ASi,
        Material::CdTe,
        Material::Cigs,
    ];

    /// Returns the enumerant name used by the file and SQL formats.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PolySi => "POLY_SI",
            Self::MonoSi => "MONO_SI",
            Self::ASi => "A_SI",
            Self::CdTe => "CD_TE",
            Self::Cigs => "CIGS",
        }
    }

    /// Human-readable label for front ends.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::PolySi => "Multicrystalline Silicon",
            Self::MonoSi => "Monocrystalline Silicon",
            Self::ASi => "Amorphous Silicon",
            Self::CdTe => "Cadmium Telluride",
            Self::Cigs => "Copper Indium Gallium Selenide",
        }
    }
}

impl Display for Material {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text is not one of the known material names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMaterialError(pub String);

impl Display for ParseMaterialError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown material `{}`; expected POLY_SI|MONO_SI|A_SI|CD_TE|CIGS",
            self.0
        )
    }
}

impl Error for ParseMaterialError {}

impl FromStr for Material {
    type Err = ParseMaterialError;

    /// Parses the exact enumerant name; case-sensitive like the stored form.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Material::ALL
            .into_iter()
            .find(|material| material.as_str() == value)
            .ok_or_else(|| ParseMaterialError(value.to_string()))
    }
}

/// One installed (or to-be-installed) solar panel.
///
/// `section` and `material` are optional so an incoming payload can carry
/// missing values to validation instead of failing at deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarPanel {
    #[serde(default)]
    pub id: PanelId,
    #[serde(default)]
    pub section: Option<String>,
    #[serde(default)]
    pub row: i32,
    #[serde(default)]
    pub column: i32,
    #[serde(default)]
    pub year_installed: i32,
    #[serde(default)]
    pub material: Option<Material>,
    #[serde(default)]
    pub tracking: bool,
}

impl SolarPanel {
    /// Creates an unsaved panel (`id == 0`) with every field set.
    pub fn new(
        section: impl Into<String>,
        row: i32,
        column: i32,
        year_installed: i32,
        material: Material,
        tracking: bool,
    ) -> Self {
        Self::with_id(0, section, row, column, year_installed, material, tracking)
    }

    /// Creates a panel with a caller-provided id.
    ///
    /// Used by storage read paths and by callers targeting an update.
    pub fn with_id(
        id: PanelId,
        section: impl Into<String>,
        row: i32,
        column: i32,
        year_installed: i32,
        material: Material,
        tracking: bool,
    ) -> Self {
        Self {
            id,
            section: Some(section.into()),
            row,
            column,
            year_installed,
            material: Some(material),
            tracking,
        }
    }

    /// Section text, or `""` when absent.
    pub fn section_str(&self) -> &str {
        self.section.as_deref().unwrap_or_default()
    }

    /// Whether this panel has been assigned a surrogate key.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// Case-insensitive section comparison.
    pub fn in_section(&self, section: &str) -> bool {
        sections_match(self.section_str(), section)
    }

    /// Whether `other` occupies the same `(section, row, column)` slot.
    pub fn same_natural_key(&self, other: &SolarPanel) -> bool {
        self.in_section(other.section_str()) && self.row == other.row && self.column == other.column
    }
}

/// Case-insensitive section equality shared by core and both storage backends.
pub fn sections_match(left: &str, right: &str) -> bool {
    left == right || section_key(left) == section_key(right)
}

/// Case-folded form of a section, as stored in `solar_panel.section_key`.
///
/// Folds the full Unicode range, not only ASCII.
pub fn section_key(section: &str) -> String {
    section.to_lowercase()
}
