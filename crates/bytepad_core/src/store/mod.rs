//! Persistence boundary for boards, workspace records and assets.
//!
//! # Responsibility
//! - Define the narrow store contracts the session talks through.
//! - Define the workspace records (board registry, typed config) that
//!   live next to board payloads.
//!
//! # Invariants
//! - Stores hold serialized snapshots; the in-memory graph never depends
//!   on a store read succeeding after startup.
//! - Writes are last-write-wins per record; there is no cross-record
//!   ordering guarantee.
//!
//! # See also
//! - `crate::store::sqlite` for the durable implementation.
//! - `crate::store::memory` for the test/ephemeral implementation.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::model::connection::Connection;
use crate::model::note::{AssetId, BoardId, ColorTag};
use crate::model::snapshot::BoardSnapshot;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{open_store, open_store_in_memory, SqliteStore};

pub type StoreResult<T> = Result<T, StoreError>;

// Record keys shared by every key/value-shaped store implementation.
// They mirror the original storage layout so old data keeps loading.
pub(crate) const META_KEY: &str = "meta";
pub(crate) const CONFIG_KEY: &str = "config";

pub(crate) fn board_key(board_id: &BoardId) -> String {
    format!("board_{board_id}")
}

pub(crate) fn connections_key(board_id: &BoardId) -> String {
    format!("connections_{board_id}")
}

#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Json(serde_json::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "payload encoding failed: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "store schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// One registered board in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInfo {
    pub id: BoardId,
    pub title: String,
}

/// Workspace registry: which boards exist and which one is current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMeta {
    pub boards: Vec<BoardInfo>,
    pub current_board_id: BoardId,
}

impl WorkspaceMeta {
    /// The registry a fresh workspace starts with: a single "Main" board.
    pub fn bootstrap() -> Self {
        let id = BoardId::from_raw("main");
        Self {
            boards: vec![BoardInfo {
                id: id.clone(),
                title: "Main".to_owned(),
            }],
            current_board_id: id,
        }
    }

    pub fn contains(&self, id: &BoardId) -> bool {
        self.boards.iter().any(|b| &b.id == id)
    }

    pub fn title_of(&self, id: &BoardId) -> Option<&str> {
        self.boards
            .iter()
            .find(|b| &b.id == id)
            .map(|b| b.title.as_str())
    }
}

/// Typed session configuration, persisted as one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    /// Color newly created notes start with.
    #[serde(default)]
    pub default_color: ColorTag,
    /// Grid snapping toggle; sibling-edge magnetism is unaffected.
    #[serde(default = "default_snap")]
    pub snap_enabled: bool,
}

fn default_snap() -> bool {
    true
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            default_color: ColorTag::default(),
            snap_enabled: true,
        }
    }
}

/// Stored media blob plus the metadata needed to re-offer it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub name: String,
}

/// Board-state persistence contract.
///
/// Implementations serialize records however they like; the session only
/// ever hands them typed values. Every method is fallible and every
/// failure is recoverable: the caller logs, notifies, and keeps going
/// with in-memory state.
pub trait BoardStore {
    /// Persists the full snapshot of a board (connections included).
    fn save_board(&self, board_id: &BoardId, snapshot: &BoardSnapshot) -> StoreResult<()>;

    /// Loads a board snapshot. `Ok(None)` when the board was never saved.
    fn load_board(&self, board_id: &BoardId) -> StoreResult<Option<BoardSnapshot>>;

    /// Persists just the connection list of a board. Kept separate so
    /// connect-mode commits don't rewrite the whole board payload, and
    /// for compatibility with boards stored before snapshots embedded
    /// connections.
    fn save_connections(&self, board_id: &BoardId, connections: &[Connection]) -> StoreResult<()>;

    /// Loads the separately stored connection list; empty when absent.
    fn load_connections(&self, board_id: &BoardId) -> StoreResult<Vec<Connection>>;

    fn save_meta(&self, meta: &WorkspaceMeta) -> StoreResult<()>;

    fn load_meta(&self) -> StoreResult<Option<WorkspaceMeta>>;

    fn save_config(&self, config: &BoardConfig) -> StoreResult<()>;

    fn load_config(&self) -> StoreResult<Option<BoardConfig>>;
}

/// Asset blob store contract (the original kept these in IndexedDB,
/// separate from board state).
pub trait AssetStore {
    fn put_asset(&self, id: &AssetId, record: &AssetRecord) -> StoreResult<()>;

    fn get_asset(&self, id: &AssetId) -> StoreResult<Option<AssetRecord>>;

    fn delete_asset(&self, id: &AssetId) -> StoreResult<()>;

    /// Every stored asset id, for orphan cleanup.
    fn list_asset_ids(&self) -> StoreResult<Vec<AssetId>>;
}
