//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record that the board graph owns.
//! - Mint stable string ids in the wire shape persisted boards use.
//! - Keep tag/color/asset data typed; serialization happens only at the
//!   store and export boundaries.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `size` never goes below [`MIN_NOTE_SIZE`] through model helpers.
//! - `tags` holds no duplicates, no empty entries and no commas.
//!
//! # See also
//! - `crate::model::snapshot` for the serialized capture of a board.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Rect, Size};

/// Default size for a freshly created note, in board pixels.
pub const DEFAULT_NOTE_SIZE: Size = Size {
    w: 220.0,
    h: 170.0,
};

/// Hard floor for note dimensions; resize and import clamp to this.
pub const MIN_NOTE_SIZE: Size = Size { w: 160.0, h: 120.0 };

/// Default stacking order for notes that never had `bring_to_front` applied.
pub const DEFAULT_Z: i64 = 10;

fn minted(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}

/// Stable identifier of a note (`n_` prefix, hex tail).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Mints a fresh id. Never collides with ids already on the board.
    pub fn generate() -> Self {
        Self(minted("n_"))
    }

    /// Wraps an externally provided id (import, tests, persistence).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of a stored media asset (`a_` prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn generate() -> Self {
        Self(minted("a_"))
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier of a board within the workspace (`b_` prefix).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(String);

impl BoardId {
    pub fn generate() -> Self {
        Self(minted("b_"))
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Visual color family of a note.
///
/// The wire form is the camelCase token stored boards and exports carry.
/// Unknown tokens parse to [`ColorTag::Yellow`] so old or foreign payloads
/// still import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorTag {
    #[default]
    Yellow,
    Pink,
    Blue,
    Green,
    Purple,
    ClassicYellow,
    Whiteout,
    SmokeSilver,
    Blackout,
}

impl ColorTag {
    pub const ALL: [ColorTag; 9] = [
        ColorTag::Yellow,
        ColorTag::Pink,
        ColorTag::Blue,
        ColorTag::Green,
        ColorTag::Purple,
        ColorTag::ClassicYellow,
        ColorTag::Whiteout,
        ColorTag::SmokeSilver,
        ColorTag::Blackout,
    ];

    /// Parses a wire token, falling back to yellow for anything unknown.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "yellow" => ColorTag::Yellow,
            "pink" => ColorTag::Pink,
            "blue" => ColorTag::Blue,
            "green" => ColorTag::Green,
            "purple" => ColorTag::Purple,
            "classicYellow" => ColorTag::ClassicYellow,
            "whiteout" => ColorTag::Whiteout,
            "smokeSilver" => ColorTag::SmokeSilver,
            "blackout" => ColorTag::Blackout,
            _ => ColorTag::Yellow,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorTag::Yellow => "yellow",
            ColorTag::Pink => "pink",
            ColorTag::Blue => "blue",
            ColorTag::Green => "green",
            ColorTag::Purple => "purple",
            ColorTag::ClassicYellow => "classicYellow",
            ColorTag::Whiteout => "whiteout",
            ColorTag::SmokeSilver => "smokeSilver",
            ColorTag::Blackout => "blackout",
        }
    }
}

impl<'de> Deserialize<'de> for ColorTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ColorTag::parse(&raw))
    }
}

/// Media category of an attached asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Audio,
    Video,
    File,
}

/// Reference to a single stored asset attached to a note.
///
/// The blob itself lives behind [`crate::store::AssetStore`]; the note only
/// carries the id plus the metadata needed to render a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetAttachment {
    pub id: AssetId,
    pub kind: AssetKind,
    /// MIME type reported when the asset was captured.
    pub mime: Option<String>,
    /// Display name, usually the source file name.
    pub name: Option<String>,
}

/// One entry of an audio playlist note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistTrack {
    pub asset_id: AssetId,
    pub name: String,
}

/// Canonical note record.
///
/// Rendering state (DOM nodes, selection highlight, guides) is never stored
/// here; the graph is the single source of truth and everything visual is a
/// projection of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub color: ColorTag,
    pub title: String,
    /// Sanitized body content. Opaque to the core; whatever the configured
    /// `ContentSanitizer` emitted goes in here unmodified.
    pub content: String,
    pub tags: Vec<String>,
    pub asset: Option<AssetAttachment>,
    pub playlist: Vec<PlaylistTrack>,
    pub position: Point,
    pub size: Size,
    pub z: i64,
}

impl Note {
    /// Creates an empty yellow note of default size at the given position.
    pub fn new_at(position: Point) -> Self {
        Self::with_id(NoteId::generate(), position)
    }

    /// Creates a note with a caller-provided id (import and paste paths).
    pub fn with_id(id: NoteId, position: Point) -> Self {
        Self {
            id,
            color: ColorTag::default(),
            title: String::new(),
            content: String::new(),
            tags: Vec::new(),
            asset: None,
            playlist: Vec::new(),
            position,
            size: DEFAULT_NOTE_SIZE,
            z: DEFAULT_Z,
        }
    }

    /// Bounding box in board coordinates.
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    /// Geometric center, used as a connection curve endpoint.
    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// Applies the size floor. Import and resize paths call this so no note
    /// ever ends up too small to grab.
    pub fn clamp_size(&mut self) {
        self.size.w = self.size.w.max(MIN_NOTE_SIZE.w);
        self.size.h = self.size.h.max(MIN_NOTE_SIZE.h);
    }

    /// Adds a tag after normalization (trim, strip commas). Returns `true`
    /// when the tag was actually added; blanks and duplicates are refused.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let tag = raw.trim().replace(',', "");
        if tag.is_empty() || self.tags.iter().any(|t| t == &tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Removes a tag by exact value. Returns `true` when something changed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    /// Case-insensitive substring match against any tag.
    pub fn matches_tag_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.tags
            .iter()
            .any(|t| t.to_lowercase().contains(&needle))
    }

    /// Every asset id this note references: the single attachment and all
    /// playlist tracks. Used by hydration and orphan cleanup.
    pub fn referenced_assets(&self) -> Vec<AssetId> {
        let mut out = Vec::new();
        if let Some(asset) = &self.asset {
            out.push(asset.id.clone());
        }
        for track in &self.playlist {
            out.push(track.asset_id.clone());
        }
        out
    }
}
