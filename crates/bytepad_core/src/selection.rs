//! Selection state for the current board.
//!
//! # Responsibility
//! - Track which notes are selected and which single note is flagged
//!   "on top" (most recently interacted with).
//! - Provide the three selection gestures: exclusive select, toggle, and
//!   lasso.
//!
//! # Invariants
//! - Selection is transient: never serialized, never part of history.
//! - At most one note carries the on-top flag at any time.
//! - Deleting a note invalidates its membership here; board switches
//!   clear everything.

use std::collections::HashSet;

use crate::geometry::Rect;
use crate::model::note::NoteId;

/// Per-board selection set plus the exclusive on-top flag.
#[derive(Debug, Default, Clone)]
pub struct SelectionModel {
    selected: HashSet<NoteId>,
    on_top: Option<NoteId>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears everything and selects just `id`.
    pub fn select_only(&mut self, id: NoteId) {
        self.selected.clear();
        self.selected.insert(id);
    }

    /// Toggles `id`. Non-additive toggles clear the rest first, so the net
    /// effect of a plain click on any note is that note selected alone.
    pub fn select_toggle(&mut self, id: NoteId, additive: bool) {
        if !additive {
            self.selected.clear();
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Lasso selection: every candidate whose rect intersects `rect`
    /// (inclusive, edge-touching counts) joins the selection. Non-additive
    /// lassos replace the previous selection; additive ones only ever add.
    pub fn lasso_select<'a, I>(&mut self, rect: Rect, additive: bool, candidates: I)
    where
        I: IntoIterator<Item = (&'a NoteId, Rect)>,
    {
        if !additive {
            self.selected.clear();
        }
        for (id, note_rect) in candidates {
            if rect.intersects(&note_rect) {
                self.selected.insert(id.clone());
            }
        }
    }

    /// Selects every given note (select-all path).
    pub fn select_many<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a NoteId>,
    {
        for id in ids {
            self.selected.insert(id.clone());
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.on_top = None;
    }

    pub fn is_selected(&self, id: &NoteId) -> bool {
        self.selected.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Snapshot of the selected ids. Order is unspecified.
    pub fn ids(&self) -> Vec<NoteId> {
        self.selected.iter().cloned().collect()
    }

    /// Moves the exclusive on-top flag to `id`.
    pub fn mark_on_top(&mut self, id: NoteId) {
        self.on_top = Some(id);
    }

    pub fn on_top(&self) -> Option<&NoteId> {
        self.on_top.as_ref()
    }

    /// Drops a deleted note from the selection and the on-top flag.
    pub fn forget(&mut self, id: &NoteId) {
        self.selected.remove(id);
        if self.on_top.as_ref() == Some(id) {
            self.on_top = None;
        }
    }

    /// Keeps only ids the given predicate accepts. Called after snapshot
    /// applies so the selection never points at vanished notes.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&NoteId) -> bool,
    {
        self.selected.retain(|id| keep(id));
        if let Some(top) = &self.on_top {
            if !keep(top) {
                self.on_top = None;
            }
        }
    }
}
