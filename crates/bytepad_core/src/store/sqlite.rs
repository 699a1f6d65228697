//! Durable store over a single SQLite database.
//!
//! # Responsibility
//! - Open file or in-memory databases, bootstrap pragmas, run migrations.
//! - Persist workspace records in a key/value table and asset blobs in
//!   their own table.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`; databases newer
//!   than this binary are refused, never half-migrated.
//! - Record keys match the original storage layout (`board_<id>`,
//!   `connections_<id>`, `meta`, `config`).
//!
//! # See also
//! - `crate::store` for the contracts this implements.

use std::path::Path;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};

use super::{
    board_key, connections_key, AssetRecord, AssetStore, BoardConfig, BoardStore, StoreError,
    StoreResult, WorkspaceMeta, CONFIG_KEY, META_KEY,
};
use crate::model::connection::Connection as NoteLink;
use crate::model::note::{AssetId, BoardId};
use crate::model::snapshot::BoardSnapshot;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("sql/0001_state.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("sql/0002_assets.sql"),
    },
];

/// Latest schema version known by this binary.
pub fn latest_schema_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Opens a database file and applies all pending migrations.
///
/// # Side effects
/// - Emits `store_open` logging events with duration and status.
pub fn open_store(path: impl AsRef<Path>) -> StoreResult<SqliteStore> {
    let started_at = Instant::now();
    info!("event=store_open module=store status=start mode=file");
    finish_open(Connection::open(path), "file", started_at)
}

/// Opens an in-memory database and applies all pending migrations.
///
/// # Side effects
/// - Emits `store_open` logging events with duration and status.
pub fn open_store_in_memory() -> StoreResult<SqliteStore> {
    let started_at = Instant::now();
    info!("event=store_open module=store status=start mode=memory");
    finish_open(Connection::open_in_memory(), "memory", started_at)
}

fn finish_open(
    opened: rusqlite::Result<Connection>,
    mode: &str,
    started_at: Instant,
) -> StoreResult<SqliteStore> {
    let mut conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=store_open module=store status=error mode={} duration_ms={} error_code=store_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn) {
        Ok(()) => {
            info!(
                "event=store_open module=store status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(SqliteStore { conn })
        }
        Err(err) => {
            error!(
                "event=store_open module=store status=error mode={} duration_ms={} error_code=store_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> StoreResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn)?;
    Ok(())
}

fn apply_migrations(conn: &mut Connection) -> StoreResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = latest_schema_version();

    if current_version > latest {
        return Err(StoreError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn current_user_version(conn: &Connection) -> StoreResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn unix_epoch_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Store over an owned, fully migrated connection.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Current `PRAGMA user_version` of the underlying database.
    pub fn schema_version(&self) -> StoreResult<u32> {
        current_user_version(&self.conn)
    }

    fn put_entry(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO state_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, unix_epoch_secs()],
        )?;
        Ok(())
    }

    fn get_entry(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM state_entries WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl BoardStore for SqliteStore {
    fn save_board(&self, board_id: &BoardId, snapshot: &BoardSnapshot) -> StoreResult<()> {
        let payload = serde_json::to_string(snapshot)?;
        self.put_entry(&board_key(board_id), &payload)
    }

    fn load_board(&self, board_id: &BoardId) -> StoreResult<Option<BoardSnapshot>> {
        match self.get_entry(&board_key(board_id))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save_connections(&self, board_id: &BoardId, connections: &[NoteLink]) -> StoreResult<()> {
        let payload = serde_json::to_string(connections)?;
        self.put_entry(&connections_key(board_id), &payload)
    }

    fn load_connections(&self, board_id: &BoardId) -> StoreResult<Vec<NoteLink>> {
        match self.get_entry(&connections_key(board_id))? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_meta(&self, meta: &WorkspaceMeta) -> StoreResult<()> {
        let payload = serde_json::to_string(meta)?;
        self.put_entry(META_KEY, &payload)
    }

    fn load_meta(&self) -> StoreResult<Option<WorkspaceMeta>> {
        match self.get_entry(META_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save_config(&self, config: &BoardConfig) -> StoreResult<()> {
        let payload = serde_json::to_string(config)?;
        self.put_entry(CONFIG_KEY, &payload)
    }

    fn load_config(&self) -> StoreResult<Option<BoardConfig>> {
        match self.get_entry(CONFIG_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

impl AssetStore for SqliteStore {
    fn put_asset(&self, id: &AssetId, record: &AssetRecord) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO assets (asset_id, bytes, mime, name, created_at) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(asset_id) DO UPDATE SET bytes = excluded.bytes, mime = excluded.mime, name = excluded.name",
            params![
                id.as_str(),
                record.bytes,
                record.mime,
                record.name,
                unix_epoch_secs()
            ],
        )?;
        Ok(())
    }

    fn get_asset(&self, id: &AssetId) -> StoreResult<Option<AssetRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT bytes, mime, name FROM assets WHERE asset_id = ?1",
                params![id.as_str()],
                |row| {
                    Ok(AssetRecord {
                        bytes: row.get(0)?,
                        mime: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn delete_asset(&self, id: &AssetId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM assets WHERE asset_id = ?1", params![id.as_str()])?;
        Ok(())
    }

    fn list_asset_ids(&self) -> StoreResult<Vec<AssetId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT asset_id FROM assets ORDER BY asset_id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(AssetId::from_raw(row?));
        }
        Ok(out)
    }
}
