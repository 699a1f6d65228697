//! In-session clipboard payloads for copy, cut, and paste.
//!
//! # Responsibility
//! - Capture the portable part of a note: styling, content, tags, and
//!   attachments, but never its identity or placement.
//! - Mint fresh notes from captured payloads at a caller-chosen position.
//!
//! # Invariants
//! - A payload carries no note id, position, or z-order; every paste mints a
//!   new id and receives its own placement and stacking.
//! - Pasting the same payload twice yields two independent notes.
//!
//! # See also
//! - `crate::session`: drives copy/cut/paste and the paste cascade.
//! - `crate::model::note`: the note type payloads are captured from.

use crate::geometry::{Point, Size};
use crate::model::note::{AssetAttachment, ColorTag, Note, NoteId, PlaylistTrack};

/// Offset applied per pasted note so repeated pastes fan out diagonally.
pub const PASTE_CASCADE: f64 = 24.0;

/// Offset applied to a duplicated note relative to its source.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Everything copied from a note except identity and placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardNote {
    pub color: ColorTag,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub asset: Option<AssetAttachment>,
    pub playlist: Vec<PlaylistTrack>,
    pub size: Size,
}

impl ClipboardNote {
    pub fn capture(note: &Note) -> Self {
        Self {
            color: note.color,
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags.clone(),
            asset: note.asset.clone(),
            playlist: note.playlist.clone(),
            size: note.size,
        }
    }

    /// Builds a new note from this payload with a fresh id at `position`.
    pub fn instantiate(&self, position: Point) -> Note {
        let mut note = Note::with_id(NoteId::generate(), position);
        note.color = self.color;
        note.title = self.title.clone();
        note.content = self.content.clone();
        note.tags = self.tags.clone();
        note.asset = self.asset.clone();
        note.playlist = self.playlist.clone();
        note.size = self.size;
        note.clamp_size();
        note
    }
}
