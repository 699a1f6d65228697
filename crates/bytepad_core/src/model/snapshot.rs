//! Serialized board capture.
//!
//! # Responsibility
//! - Define the wire shape history entries, stored boards and export files
//!   share: `{ version, items, connections }` with camelCase item fields.
//! - Convert between the typed [`Note`] model and wire items.
//!
//! # Invariants
//! - Items keep board stacking order (the graph's insertion order).
//! - `connections` travels inside the snapshot so an undo/redo apply can
//!   never desynchronize links from notes.
//! - Loading accepts the legacy spellings `v` (version) and `html`/`text`
//!   (body content); unknown colors fall back to yellow; sizes clamp to
//!   the minimum on the way in.

use serde::{Deserialize, Serialize};

use super::connection::Connection;
use super::note::{
    AssetAttachment, AssetId, AssetKind, ColorTag, Note, NoteId, PlaylistTrack, DEFAULT_NOTE_SIZE,
    DEFAULT_Z,
};
use crate::geometry::{Point, Size};

/// Current snapshot schema version. Bumped to 5 when connections moved
/// inside the snapshot; version 4 payloads (items only) still load.
pub const SNAPSHOT_VERSION: u32 = 5;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

fn default_title() -> String {
    "Note".to_owned()
}

fn default_coord() -> f64 {
    40.0
}

fn default_w() -> f64 {
    DEFAULT_NOTE_SIZE.w
}

fn default_h() -> f64 {
    DEFAULT_NOTE_SIZE.h
}

fn default_z() -> i64 {
    DEFAULT_Z
}

/// One note in wire form. Asset metadata is flattened the way stored
/// boards have always carried it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItem {
    pub id: NoteId,
    #[serde(default)]
    pub color: ColorTag,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default, alias = "html", alias = "text")]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<AssetId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_kind: Option<AssetKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_mime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist: Option<Vec<PlaylistTrack>>,
    #[serde(default = "default_coord")]
    pub x: f64,
    #[serde(default = "default_coord")]
    pub y: f64,
    #[serde(default = "default_w")]
    pub w: f64,
    #[serde(default = "default_h")]
    pub h: f64,
    #[serde(default = "default_z")]
    pub z: i64,
}

impl SnapshotItem {
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            color: note.color,
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags.clone(),
            asset_id: note.asset.as_ref().map(|a| a.id.clone()),
            asset_kind: note.asset.as_ref().map(|a| a.kind),
            asset_mime: note.asset.as_ref().and_then(|a| a.mime.clone()),
            asset_name: note.asset.as_ref().and_then(|a| a.name.clone()),
            playlist: if note.playlist.is_empty() {
                None
            } else {
                Some(note.playlist.clone())
            },
            x: note.position.x,
            y: note.position.y,
            w: note.size.w,
            h: note.size.h,
            z: note.z,
        }
    }

    /// Rebuilds the typed note. Sizes clamp to the floor; an asset id with
    /// no recorded kind defaults to a generic file attachment.
    pub fn into_note(self) -> Note {
        let asset = self.asset_id.map(|id| AssetAttachment {
            id,
            kind: self.asset_kind.unwrap_or(AssetKind::File),
            mime: self.asset_mime,
            name: self.asset_name,
        });
        let mut note = Note {
            id: self.id,
            color: self.color,
            title: self.title,
            content: self.content,
            tags: self.tags,
            asset,
            playlist: self.playlist.unwrap_or_default(),
            position: Point::new(self.x, self.y),
            size: Size::new(self.w, self.h),
            z: self.z,
        };
        note.clamp_size();
        note
    }
}

/// Full capture of one board: the history unit and the persisted payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default = "default_version", alias = "v")]
    pub version: u32,
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

impl BoardSnapshot {
    pub fn empty() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            items: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.connections.is_empty()
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
