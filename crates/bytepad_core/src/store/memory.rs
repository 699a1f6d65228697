//! Ephemeral store for tests and unsaved scratch sessions.
//!
//! # Responsibility
//! - Implement both store contracts over plain maps, serializing payloads
//!   exactly like the durable store so wire bugs surface in fast tests.
//!
//! # Invariants
//! - Interior mutability only; the store hands out owned copies.
//! - Clones share the same underlying maps, so a caller can keep a handle
//!   to the store a session owns.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{
    board_key, connections_key, AssetRecord, AssetStore, BoardConfig, BoardStore, StoreResult,
    WorkspaceMeta, CONFIG_KEY, META_KEY,
};
use crate::model::connection::Connection;
use crate::model::note::{AssetId, BoardId};
use crate::model::snapshot::BoardSnapshot;

#[derive(Debug, Default)]
struct MemoryInner {
    entries: BTreeMap<String, String>,
    assets: BTreeMap<AssetId, AssetRecord>,
}

/// Key/value store holding JSON strings, plus a separate asset map. The
/// in-memory analog of the original's localStorage + IndexedDB pair.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw JSON stored under a key. Test hook for asserting the exact
    /// wire shape a record persisted with.
    pub fn raw_entry(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    fn put(&self, key: String, value: String) {
        self.inner.borrow_mut().entries.insert(key, value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }
}

impl BoardStore for MemoryStore {
    fn save_board(&self, board_id: &BoardId, snapshot: &BoardSnapshot) -> StoreResult<()> {
        let payload = serde_json::to_string(snapshot)?;
        self.put(board_key(board_id), payload);
        Ok(())
    }

    fn load_board(&self, board_id: &BoardId) -> StoreResult<Option<BoardSnapshot>> {
        match self.get(&board_key(board_id)) {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save_connections(&self, board_id: &BoardId, connections: &[Connection]) -> StoreResult<()> {
        let payload = serde_json::to_string(connections)?;
        self.put(connections_key(board_id), payload);
        Ok(())
    }

    fn load_connections(&self, board_id: &BoardId) -> StoreResult<Vec<Connection>> {
        match self.get(&connections_key(board_id)) {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_meta(&self, meta: &WorkspaceMeta) -> StoreResult<()> {
        let payload = serde_json::to_string(meta)?;
        self.put(META_KEY.to_owned(), payload);
        Ok(())
    }

    fn load_meta(&self) -> StoreResult<Option<WorkspaceMeta>> {
        match self.get(META_KEY) {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save_config(&self, config: &BoardConfig) -> StoreResult<()> {
        let payload = serde_json::to_string(config)?;
        self.put(CONFIG_KEY.to_owned(), payload);
        Ok(())
    }

    fn load_config(&self) -> StoreResult<Option<BoardConfig>> {
        match self.get(CONFIG_KEY) {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

impl AssetStore for MemoryStore {
    fn put_asset(&self, id: &AssetId, record: &AssetRecord) -> StoreResult<()> {
        self.inner
            .borrow_mut()
            .assets
            .insert(id.clone(), record.clone());
        Ok(())
    }

    fn get_asset(&self, id: &AssetId) -> StoreResult<Option<AssetRecord>> {
        Ok(self.inner.borrow().assets.get(id).cloned())
    }

    fn delete_asset(&self, id: &AssetId) -> StoreResult<()> {
        self.inner.borrow_mut().assets.remove(id);
        Ok(())
    }

    fn list_asset_ids(&self) -> StoreResult<Vec<AssetId>> {
        Ok(self.inner.borrow().assets.keys().cloned().collect())
    }
}
