//! Flat-file implementation of the panel repository.
//!
//! # Responsibility
//! - Persist panels as one `~`-delimited line per record.
//! - Assign ids as `max(existing id) + 1`.
//!
//! # Invariants
//! - A missing file reads as zero panels; it is created on first write.
//! - Lines that do not split into exactly 7 fields are skipped.
//! - `~`, `\r` and `\n` are stripped from `section` before writing, so a
//!   section containing them does not survive a round trip unchanged.
//! - Stripping happens after validation, so two sections that differ only in
//!   those characters (`A~B` and `AB`) both pass the natural-key check and
//!   end up stored as the same `(section, row, column)`.
//! - Id assignment fails with `InvalidData` once `PanelId::MAX` is taken.
//! - Single writer assumed; every mutation rewrites the whole file.
//!
//! Line layout: `id~section~row~column~yearInstalled~material~tracking`.

use crate::model::solar_panel::{sections_match, Material, PanelId, SolarPanel};
use crate::repo::panel_repo::{sort_panels, PanelRepository, StorageError, StorageResult};
use log::{debug, error};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DELIMITER: char = '~';
const FIELD_COUNT: usize = 7;

/// File-backed panel repository.
#[derive(Debug, Clone)]
pub struct FilePanelRepository {
    path: PathBuf,
}

impl FilePanelRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing data file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record in file order.
    fn read_all(&self) -> StorageResult<Vec<SolarPanel>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                error!(
                    "event=file_repo_read module=repo status=error path={} error={}",
                    self.path.display(),
                    err
                );
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        let mut panels = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            match line_to_panel(line)? {
                Some(panel) => panels.push(panel),
                None => debug!(
                    "event=file_repo_read module=repo status=skipped line={}",
                    index + 1
                ),
            }
        }
        Ok(panels)
    }

    fn write_all(&self, panels: &[SolarPanel]) -> StorageResult<()> {
        let mut buffer = String::with_capacity(panels.len() * 48);
        for panel in panels {
            buffer.push_str(&panel_to_line(panel));
            buffer.push('\n');
        }

        std::fs::write(&self.path, buffer).map_err(|err| {
            error!(
                "event=file_repo_write module=repo status=error path={} error={}",
                self.path.display(),
                err
            );
            StorageError::Io {
                path: self.path.clone(),
                source: err,
            }
        })
    }
}

impl PanelRepository for FilePanelRepository {
    fn find_all(&self) -> StorageResult<Vec<SolarPanel>> {
        let mut panels = self.read_all()?;
        sort_panels(&mut panels);
        Ok(panels)
    }

    fn find_by_section(&self, section: &str) -> StorageResult<Vec<SolarPanel>> {
        let mut panels = self.find_all()?;
        panels.retain(|panel| sections_match(panel.section_str(), section));
        Ok(panels)
    }

    fn find_by_id(&self, id: PanelId) -> StorageResult<Option<SolarPanel>> {
        Ok(self.read_all()?.into_iter().find(|panel| panel.id == id))
    }

    fn create(&self, panel: &SolarPanel) -> StorageResult<SolarPanel> {
        let mut all = self.read_all()?;
        let mut created = panel.clone();
        created.id = next_id(&all)?;
        all.push(created.clone());
        self.write_all(&all)?;
        debug!(
            "event=file_repo_create module=repo status=ok id={}",
            created.id
        );
        Ok(created)
    }

    fn update(&self, panel: &SolarPanel) -> StorageResult<bool> {
        let mut all = self.read_all()?;
        // Matched by id so the natural key itself can be reassigned.
        let Some(slot) = all.iter_mut().find(|existing| existing.id == panel.id) else {
            return Ok(false);
        };
        *slot = panel.clone();
        self.write_all(&all)?;
        Ok(true)
    }

    fn delete_by_id(&self, id: PanelId) -> StorageResult<bool> {
        let mut all = self.read_all()?;
        let Some(index) = all.iter().position(|existing| existing.id == id) else {
            return Ok(false);
        };
        all.remove(index);
        self.write_all(&all)?;
        Ok(true)
    }
}

fn next_id(panels: &[SolarPanel]) -> StorageResult<PanelId> {
    panels
        .iter()
        .map(|panel| panel.id)
        .max()
        .unwrap_or(0)
        .max(0)
        .checked_add(1)
        .ok_or_else(|| StorageError::InvalidData("panel id space exhausted".to_string()))
}

/// Parses one line; `Ok(None)` when the field count is wrong.
fn line_to_panel(line: &str) -> StorageResult<Option<SolarPanel>> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Ok(None);
    }

    let material = fields[5].parse::<Material>().map_err(|_| {
        StorageError::InvalidData(format!("invalid material `{}` in panel file", fields[5]))
    })?;

    Ok(Some(SolarPanel {
        id: parse_number(fields[0], "id")?,
        section: Some(fields[1].to_string()),
        row: parse_number(fields[2], "row")?,
        column: parse_number(fields[3], "column")?,
        year_installed: parse_number(fields[4], "yearInstalled")?,
        material: Some(material),
        tracking: fields[6] == "true",
    }))
}

fn parse_number<T: std::str::FromStr>(value: &str, field: &str) -> StorageResult<T> {
    value.trim().parse::<T>().map_err(|_| {
        StorageError::InvalidData(format!("invalid {field} value `{value}` in panel file"))
    })
}

fn panel_to_line(panel: &SolarPanel) -> String {
    format!(
        "{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}{DELIMITER}{}",
        panel.id,
        clean_field(panel.section_str()),
        panel.row,
        panel.column,
        panel.year_installed,
        panel.material.map_or("", Material::as_str),
        panel.tracking,
    )
}

fn clean_field(value: &str) -> String {
    value.replace([DELIMITER, '\r', '\n'], "")
}

#[cfg(test)]
mod tests {
    use super::{clean_field, line_to_panel, next_id, panel_to_line};
    use crate::model::solar_panel::{Material, PanelId, SolarPanel};
    use crate::repo::panel_repo::StorageError;

    #[test]
    fn line_format_matches_field_order() {
        let panel = SolarPanel::with_id(3, "The Ridge", 4, 5, 2017, Material::CdTe, true);
        assert_eq!(panel_to_line(&panel), "3~The Ridge~4~5~2017~CD_TE~true");
    }

    #[test]
    fn clean_field_strips_delimiter_and_line_breaks() {
        assert_eq!(clean_field("a~b\r\nc"), "abc");
    }

    #[test]
    fn wrong_field_count_is_skipped() {
        assert!(line_to_panel("1~Main~1~1~2020~POLY_SI").unwrap().is_none());
        assert!(line_to_panel("").unwrap().is_none());
    }

    #[test]
    fn non_true_tracking_reads_as_false() {
        let panel = line_to_panel("1~Main~1~1~2020~A_SI~yes").unwrap().unwrap();
        assert!(!panel.tracking);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = line_to_panel("x~Main~1~1~2020~POLY_SI~true").unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(message) if message.contains("id")));

        let err = line_to_panel("1~Main~1~1~2020~GLASS~true").unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(message) if message.contains("GLASS")));
    }

    #[test]
    fn next_id_follows_max() {
        let panels = vec![
            SolarPanel::with_id(4, "A", 1, 1, 2020, Material::Cigs, false),
            SolarPanel::with_id(2, "A", 1, 2, 2020, Material::Cigs, false),
        ];
        assert_eq!(next_id(&panels).unwrap(), 5);
        assert_eq!(next_id(&[]).unwrap(), 1);
    }

    #[test]
    fn next_id_reports_exhausted_id_space() {
        let panels = vec![SolarPanel::with_id(
            PanelId::MAX,
            "Main",
            1,
            1,
            2020,
            Material::Cigs,
            true,
        )];
        let err = next_id(&panels).unwrap_err();
        assert!(matches!(err, StorageError::InvalidData(message) if message.contains("exhausted")));
    }
}
