//! SQLite implementation of the panel repository.
//!
//! # Responsibility
//! - Map `PanelRepository` operations onto the `solar_panel` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - The connection must be migrated before construction (`try_new` checks).
//! - Read paths reject invalid persisted state instead of masking it.
//! - `id` values come from `AUTOINCREMENT` and are never reused.
//! - `section_key` always holds `section_key(section)`; section lookups match
//!   on it so case folding agrees with the file backend beyond ASCII.

use crate::db::migrations::{current_user_version, latest_version};
use crate::model::solar_panel::{section_key, Material, PanelId, SolarPanel};
use crate::repo::panel_repo::{PanelRepository, StorageError, StorageResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const PANEL_SELECT_SQL: &str = "SELECT
    id,
    section,
    \"row\",
    \"column\",
    year_installed,
    material,
    is_tracking
FROM solar_panel";

const PANEL_ORDER_SQL: &str = "ORDER BY section, \"row\", \"column\"";

const REQUIRED_COLUMNS: [&str; 8] = [
    "id",
    "section",
    "row",
    "column",
    "year_installed",
    "material",
    "is_tracking",
    "section_key",
];

/// SQLite-backed panel repository owning its connection.
pub struct SqlitePanelRepository {
    conn: Connection,
}

impl SqlitePanelRepository {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` is behind.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the schema drifted.
    pub fn try_new(conn: Connection) -> StorageResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Borrows the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn query_panels(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> StorageResult<Vec<SolarPanel>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut panels = Vec::new();

        while let Some(row) = rows.next()? {
            panels.push(parse_panel_row(row)?);
        }

        Ok(panels)
    }
}

impl PanelRepository for SqlitePanelRepository {
    fn find_all(&self) -> StorageResult<Vec<SolarPanel>> {
        self.query_panels(&format!("{PANEL_SELECT_SQL} {PANEL_ORDER_SQL};"), [])
    }

    fn find_by_section(&self, section: &str) -> StorageResult<Vec<SolarPanel>> {
        self.query_panels(
            &format!("{PANEL_SELECT_SQL} WHERE section_key = ?1 {PANEL_ORDER_SQL};"),
            [section_key(section)],
        )
    }

    fn find_by_id(&self, id: PanelId) -> StorageResult<Option<SolarPanel>> {
        let mut panels =
            self.query_panels(&format!("{PANEL_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(panels.pop())
    }

    fn create(&self, panel: &SolarPanel) -> StorageResult<SolarPanel> {
        let material = required_material(panel)?;
        self.conn.execute(
            "INSERT INTO solar_panel (
                section,
                \"row\",
                \"column\",
                year_installed,
                material,
                is_tracking,
                section_key
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                panel.section_str(),
                panel.row,
                panel.column,
                panel.year_installed,
                material.as_str(),
                bool_to_int(panel.tracking),
                section_key(panel.section_str()),
            ],
        )?;

        let mut created = panel.clone();
        created.id = self.conn.last_insert_rowid();
        debug!(
            "event=sqlite_repo_create module=repo status=ok id={}",
            created.id
        );
        Ok(created)
    }

    fn update(&self, panel: &SolarPanel) -> StorageResult<bool> {
        let material = required_material(panel)?;
        let changed = self.conn.execute(
            "UPDATE solar_panel
             SET
                section = ?1,
                \"row\" = ?2,
                \"column\" = ?3,
                year_installed = ?4,
                material = ?5,
                is_tracking = ?6,
                section_key = ?7
             WHERE id = ?8;",
            params![
                panel.section_str(),
                panel.row,
                panel.column,
                panel.year_installed,
                material.as_str(),
                bool_to_int(panel.tracking),
                section_key(panel.section_str()),
                panel.id,
            ],
        )?;

        Ok(changed > 0)
    }

    fn delete_by_id(&self, id: PanelId) -> StorageResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM solar_panel WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_panel_row(row: &Row<'_>) -> StorageResult<SolarPanel> {
    let material_text: String = row.get("material")?;
    let material = material_text.parse::<Material>().map_err(|_| {
        StorageError::InvalidData(format!(
            "invalid material `{material_text}` in solar_panel.material"
        ))
    })?;

    let tracking = match row.get::<_, i64>("is_tracking")? {
        0 => false,
        1 => true,
        other => {
            return Err(StorageError::InvalidData(format!(
                "invalid is_tracking value `{other}` in solar_panel.is_tracking"
            )));
        }
    };

    Ok(SolarPanel {
        id: row.get("id")?,
        section: Some(row.get("section")?),
        row: row.get("row")?,
        column: row.get("column")?,
        year_installed: row.get("year_installed")?,
        material: Some(material),
        tracking,
    })
}

fn required_material(panel: &SolarPanel) -> StorageResult<Material> {
    panel
        .material
        .ok_or_else(|| StorageError::InvalidData("panel material must be set".to_string()))
}

fn ensure_connection_ready(conn: &Connection) -> StorageResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(StorageError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "solar_panel")? {
        return Err(StorageError::MissingRequiredTable("solar_panel"));
    }

    for column in REQUIRED_COLUMNS {
        if !table_has_column(conn, "solar_panel", column)? {
            return Err(StorageError::MissingRequiredColumn {
                table: "solar_panel",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StorageResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StorageResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
