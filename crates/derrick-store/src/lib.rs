//! SQLite-backed record store for derrick.
//!
//! [`WellStore`] is a key-indexed store over the `api_well_data` table:
//! insert, lookup by API number, select-all, and upsert (replace-or-insert
//! preserving the surrogate row id). One connection sits behind a mutex;
//! every operation takes the guard for the duration of a single statement
//! batch and releases it on all exit paths.
//!
//! Upsert is check-then-write: two writers racing on the same API number may
//! interleave. The ingest pipeline is strictly sequential, so this is a
//! documented limitation rather than a supported mode.

use std::path::Path;

use chrono::NaiveDate;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

use derrick_core::Well;

/// Errors from the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A row vanished between write and read-back.
    #[error("no stored row for api number '{0}' after upsert")]
    MissingAfterUpsert(String),
}

/// A persisted well: the storage-assigned surrogate id plus the record.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredWell {
    /// Surrogate primary key, assigned on first insert and preserved across
    /// upserts.
    pub id: i64,
    /// The well record.
    pub well: Well,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS api_well_data (
    id                     INTEGER PRIMARY KEY,
    api_number             TEXT NOT NULL UNIQUE,
    operator_name          TEXT,
    operator_id            INTEGER,
    status                 TEXT,
    well_type              TEXT,
    work_type              TEXT,
    directional_status     TEXT,
    multi_lateral          TEXT,
    mineral_owner          TEXT,
    surface_owner          TEXT,
    surface_location       TEXT,
    gl_elevation           REAL,
    kb_elevation           REAL,
    df_elevation           REAL,
    single_mult_completion TEXT,
    potash_waiver          TEXT,
    spud_date              TEXT,
    last_inspection_date   TEXT,
    tvd                    REAL,
    latitude               REAL,
    longitude              REAL,
    crs                    TEXT
);
";

const COLUMNS: &str = "id, api_number, operator_name, operator_id, status, well_type, \
     work_type, directional_status, multi_lateral, mineral_owner, surface_owner, \
     surface_location, gl_elevation, kb_elevation, df_elevation, \
     single_mult_completion, potash_waiver, spud_date, last_inspection_date, \
     tvd, latitude, longitude, crs";

/// Key-indexed record store over a single SQLite database.
pub struct WellStore {
    conn: Mutex<Connection>,
}

impl WellStore {
    /// Opens (creating if necessary) the database at `path` and bootstraps
    /// the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory database, for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Inserts a new record, returning it with its assigned id.
    ///
    /// Fails on a duplicate API number; use [`WellStore::upsert`] to
    /// replace-or-insert.
    pub fn insert(&self, well: &Well) -> Result<StoredWell, StoreError> {
        let conn = self.conn.lock();
        insert_row(&conn, well)?;
        let id = conn.last_insert_rowid();
        Ok(StoredWell {
            id,
            well: well.clone(),
        })
    }

    /// Looks up one record by API number.
    pub fn find_by_api_number(&self, api_number: &str) -> Result<Option<StoredWell>, StoreError> {
        let conn = self.conn.lock();
        find_in(&conn, api_number)
    }

    /// Returns every stored record in insertion (id) order.
    pub fn all(&self) -> Result<Vec<StoredWell>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare(&format!("SELECT {COLUMNS} FROM api_well_data ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_stored)?;
        let mut wells = Vec::new();
        for row in rows {
            wells.push(row?);
        }
        Ok(wells)
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM api_well_data", [], |r| r.get(0))?;
        Ok(n.unsigned_abs())
    }

    /// Replace-or-insert by API number.
    ///
    /// When a row with the same API number exists, every field is replaced
    /// wholesale (no field-level merging) and the surrogate id is kept.
    /// Otherwise a new row is created. Returns the stored row as re-read
    /// from the database.
    pub fn upsert(&self, well: &Well) -> Result<StoredWell, StoreError> {
        let conn = self.conn.lock();
        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM api_well_data WHERE api_number = ?1",
                params![well.api_number],
                |r| r.get(0),
            )
            .optional()?;

        match existing {
            Some(id) => {
                update_row(&conn, id, well)?;
                tracing::debug!(api_number = %well.api_number, id, "replaced stored well");
            }
            None => {
                insert_row(&conn, well)?;
                tracing::debug!(api_number = %well.api_number, "inserted new well");
            }
        }

        find_in(&conn, &well.api_number)?
            .ok_or_else(|| StoreError::MissingAfterUpsert(well.api_number.clone()))
    }
}

fn insert_row(conn: &Connection, well: &Well) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO api_well_data (
            api_number, operator_name, operator_id, status, well_type, work_type,
            directional_status, multi_lateral, mineral_owner, surface_owner,
            surface_location, gl_elevation, kb_elevation, df_elevation,
            single_mult_completion, potash_waiver, spud_date, last_inspection_date,
            tvd, latitude, longitude, crs
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                  ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
        well_params(well),
    )?;
    Ok(())
}

fn update_row(conn: &Connection, id: i64, well: &Well) -> Result<(), StoreError> {
    conn.execute(
        "UPDATE api_well_data SET
            api_number = ?1, operator_name = ?2, operator_id = ?3, status = ?4,
            well_type = ?5, work_type = ?6, directional_status = ?7,
            multi_lateral = ?8, mineral_owner = ?9, surface_owner = ?10,
            surface_location = ?11, gl_elevation = ?12, kb_elevation = ?13,
            df_elevation = ?14, single_mult_completion = ?15, potash_waiver = ?16,
            spud_date = ?17, last_inspection_date = ?18, tvd = ?19,
            latitude = ?20, longitude = ?21, crs = ?22
         WHERE id = ?23",
        rusqlite::params_from_iter(
            well_param_values(well)
                .into_iter()
                .chain(std::iter::once(rusqlite::types::Value::from(id))),
        ),
    )?;
    Ok(())
}

fn find_in(conn: &Connection, api_number: &str) -> Result<Option<StoredWell>, StoreError> {
    let stored = conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM api_well_data WHERE api_number = ?1"),
            params![api_number],
            row_to_stored,
        )
        .optional()?;
    Ok(stored)
}

fn well_params(well: &Well) -> impl rusqlite::Params {
    rusqlite::params_from_iter(well_param_values(well))
}

fn well_param_values(well: &Well) -> Vec<rusqlite::types::Value> {
    use rusqlite::types::Value;
    let opt_text = |v: &Option<String>| {
        v.as_ref()
            .map_or(Value::Null, |s| Value::Text(s.clone()))
    };
    let opt_real = |v: Option<f64>| v.map_or(Value::Null, Value::Real);
    let opt_date = |v: Option<NaiveDate>| {
        v.map_or(Value::Null, |d| Value::Text(d.format("%Y-%m-%d").to_string()))
    };

    vec![
        Value::Text(well.api_number.clone()),
        opt_text(&well.operator_name),
        well.operator_id.map_or(Value::Null, Value::Integer),
        opt_text(&well.status),
        opt_text(&well.well_type),
        opt_text(&well.work_type),
        opt_text(&well.directional_status),
        opt_text(&well.multi_lateral),
        opt_text(&well.mineral_owner),
        opt_text(&well.surface_owner),
        opt_text(&well.surface_location),
        opt_real(well.gl_elevation),
        opt_real(well.kb_elevation),
        opt_real(well.df_elevation),
        opt_text(&well.single_mult_completion),
        opt_text(&well.potash_waiver),
        opt_date(well.spud_date),
        opt_date(well.last_inspection_date),
        opt_real(well.tvd),
        opt_real(well.latitude),
        opt_real(well.longitude),
        opt_text(&well.crs),
    ]
}

fn row_to_stored(row: &Row<'_>) -> rusqlite::Result<StoredWell> {
    let date_col = |idx: usize| -> rusqlite::Result<Option<NaiveDate>> {
        let raw: Option<String> = row.get(idx)?;
        raw.map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })
        })
        .transpose()
    };

    let mut well = Well::new(row.get::<_, String>(1)?);
    well.operator_name = row.get(2)?;
    well.operator_id = row.get(3)?;
    well.status = row.get(4)?;
    well.well_type = row.get(5)?;
    well.work_type = row.get(6)?;
    well.directional_status = row.get(7)?;
    well.multi_lateral = row.get(8)?;
    well.mineral_owner = row.get(9)?;
    well.surface_owner = row.get(10)?;
    well.surface_location = row.get(11)?;
    well.gl_elevation = row.get(12)?;
    well.kb_elevation = row.get(13)?;
    well.df_elevation = row.get(14)?;
    well.single_mult_completion = row.get(15)?;
    well.potash_waiver = row.get(16)?;
    well.spud_date = date_col(17)?;
    well.last_inspection_date = date_col(18)?;
    well.tvd = row.get(19)?;
    well.latitude = row.get(20)?;
    well.longitude = row.get(21)?;
    well.crs = row.get(22)?;

    Ok(StoredWell {
        id: row.get(0)?,
        well,
    })
}
