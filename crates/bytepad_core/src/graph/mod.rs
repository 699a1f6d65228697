//! Live note graph: the single source of truth for one board.
//!
//! # Responsibility
//! - Own the notes and the undirected connection list of the current
//!   board, in stacking-stable insertion order.
//! - Provide the whole-graph operations gestures and commands build on:
//!   group move/resize, connection editing, capture/apply, projections.
//!
//! # Invariants
//! - Note ids are unique within the graph.
//! - Every connection's endpoints reference notes currently present;
//!   removing a note prunes its connections in the same operation.
//! - At most one connection exists per unordered note pair; self-loops
//!   are never stored.
//! - Operations apply fully or not at all.
//!
//! # See also
//! - `crate::model::snapshot` for the serialized capture shape.
//! - `crate::session` for the command layer driving this structure.

use std::collections::BTreeSet;
use std::fmt;

use crate::geometry::{
    link_curve, rect_in_viewport, CubicBezier, Point, Rect, Size, CONNECTION_CULL_PAD,
    NOTE_CULL_PAD,
};
use crate::model::connection::Connection;
use crate::model::note::{AssetId, Note, NoteId};
use crate::model::snapshot::{BoardSnapshot, SnapshotItem, SNAPSHOT_VERSION};

/// Errors for graph mutations that reject their input outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// `add_note` refused a note whose id is already on the board.
    DuplicateNoteId(NoteId),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::DuplicateNoteId(id) => write!(f, "note id already on board: {id}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// What `remove_note` took out: the note itself plus every connection
/// that referenced it, pruned atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedNote {
    pub note: Note,
    pub pruned: Vec<Connection>,
}

/// A connection projected to its renderable curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionCurve {
    pub from: NoteId,
    pub to: NoteId,
    pub curve: CubicBezier,
}

/// Notes plus connections of one board.
#[derive(Debug, Default, Clone)]
pub struct NoteGraph {
    notes: Vec<Note>,
    connections: Vec<Connection>,
}

impl NoteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.note(id).is_some()
    }

    /// Runs `edit` against the note, if present. Returns `false` (and
    /// calls nothing) for unknown ids, so callers racing a deletion
    /// degrade to a no-op.
    pub fn update_note<F>(&mut self, id: &NoteId, edit: F) -> bool
    where
        F: FnOnce(&mut Note),
    {
        match self.notes.iter_mut().find(|n| &n.id == id) {
            Some(note) => {
                edit(note);
                true
            }
            None => false,
        }
    }

    /// Adds a note. Fails when the id is already present; the graph is
    /// untouched in that case.
    pub fn add_note(&mut self, note: Note) -> Result<(), GraphError> {
        if self.contains(&note.id) {
            return Err(GraphError::DuplicateNoteId(note.id));
        }
        self.notes.push(note);
        Ok(())
    }

    /// Removes a note and prunes every connection referencing it, in one
    /// operation. `None` when the id is unknown (nothing changes).
    pub fn remove_note(&mut self, id: &NoteId) -> Option<RemovedNote> {
        let index = self.notes.iter().position(|n| &n.id == id)?;
        let note = self.notes.remove(index);
        let mut pruned = Vec::new();
        self.connections.retain(|c| {
            if c.touches(id) {
                pruned.push(c.clone());
                false
            } else {
                true
            }
        });
        Some(RemovedNote { note, pruned })
    }

    /// Adds an undirected connection. Silently refuses self-loops,
    /// duplicates of an existing pair (either direction), and pairs with
    /// a missing endpoint. Returns whether a connection was stored.
    pub fn add_connection(&mut self, from: NoteId, to: NoteId) -> bool {
        if from == to {
            return false;
        }
        if !self.contains(&from) || !self.contains(&to) {
            return false;
        }
        if self.has_connection(&from, &to) {
            return false;
        }
        self.connections.push(Connection::new(from, to));
        true
    }

    /// Whether a connection joins the pair, in either direction.
    pub fn has_connection(&self, a: &NoteId, b: &NoteId) -> bool {
        self.connections.iter().any(|c| c.links(a, b))
    }

    /// Translates every member by the delta between the leader's current
    /// position and `new_leader_pos`. All members move by the identical
    /// vector, so relative offsets are preserved; members are never
    /// snapped individually. Ids in `members` are expected unique; ids no
    /// longer on the board are skipped. `false` when the leader itself is
    /// missing (nothing moves).
    pub fn move_group(&mut self, leader: &NoteId, new_leader_pos: Point, members: &[NoteId]) -> bool {
        let Some(lead) = self.note(leader) else {
            return false;
        };
        let dx = new_leader_pos.x - lead.position.x;
        let dy = new_leader_pos.y - lead.position.y;
        for id in members {
            if let Some(note) = self.notes.iter_mut().find(|n| &n.id == id) {
                note.position = note.position.offset(dx, dy);
            }
        }
        true
    }

    /// Resizes every member by the leader's size delta, each relative to
    /// its own gesture-start size carried in `members`, clamped to
    /// `floor`. The leader's start size is read from its `members` entry;
    /// without one nothing resizes.
    pub fn resize_group(
        &mut self,
        leader: &NoteId,
        new_leader_size: Size,
        members: &[(NoteId, Size)],
        floor: Size,
    ) -> bool {
        let Some((_, leader_start)) = members.iter().find(|(id, _)| id == leader) else {
            return false;
        };
        let dw = new_leader_size.w - leader_start.w;
        let dh = new_leader_size.h - leader_start.h;
        for (id, start) in members {
            if let Some(note) = self.notes.iter_mut().find(|n| &n.id == id) {
                note.size = Size::new(start.w + dw, start.h + dh).clamped_to(floor);
            }
        }
        true
    }

    /// Raises the note above everything else: max existing z plus one.
    pub fn bring_to_front(&mut self, id: &NoteId) -> bool {
        if !self.contains(id) {
            return false;
        }
        let top = self.notes.iter().map(|n| n.z).max().unwrap_or(0);
        self.update_note(id, |n| n.z = top + 1)
    }

    /// Notes sorted top-most first, for a layers panel.
    pub fn stacked_notes(&self) -> Vec<&Note> {
        let mut out: Vec<&Note> = self.notes.iter().collect();
        out.sort_by(|a, b| b.z.cmp(&a.z));
        out
    }

    /// Removes every note and connection.
    pub fn clear(&mut self) {
        self.notes.clear();
        self.connections.clear();
    }

    /// Detached capture of the whole board, connections included.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            version: SNAPSHOT_VERSION,
            items: self.notes.iter().map(SnapshotItem::from_note).collect(),
            connections: self.connections.clone(),
        }
    }

    /// Replaces the whole board with the snapshot's content. Connections
    /// are re-added through [`NoteGraph::add_connection`], so entries of a
    /// foreign payload that are self-loops, duplicates, or dangling are
    /// dropped rather than violating graph invariants. Duplicate item ids
    /// keep their first occurrence.
    pub fn apply_snapshot(&mut self, snapshot: &BoardSnapshot) {
        self.clear();
        for item in &snapshot.items {
            let _ = self.add_note(item.clone().into_note());
        }
        for connection in &snapshot.connections {
            self.add_connection(connection.from.clone(), connection.to.clone());
        }
    }

    /// Ids of notes whose tags match `query`, case-insensitive substring.
    /// `None` for a blank query: the filter is off, not "nothing matches".
    pub fn filter_by_tag(&self, query: &str) -> Option<Vec<NoteId>> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        Some(
            self.notes
                .iter()
                .filter(|n| n.matches_tag_query(query))
                .map(|n| n.id.clone())
                .collect(),
        )
    }

    /// Notes intersecting the viewport grown by the standard note pad.
    pub fn visible_notes(&self, viewport: &Rect) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|n| rect_in_viewport(&n.rect(), viewport, NOTE_CULL_PAD))
            .collect()
    }

    /// Curves for the connections a renderer should draw. With a viewport,
    /// a connection is skipped when neither endpoint is within the
    /// connection pad of it; without one, every connection projects.
    pub fn connection_curves(&self, viewport: Option<&Rect>) -> Vec<ConnectionCurve> {
        let mut out = Vec::new();
        for connection in &self.connections {
            let (Some(from), Some(to)) = (self.note(&connection.from), self.note(&connection.to))
            else {
                continue;
            };
            if let Some(vp) = viewport {
                let from_visible = rect_in_viewport(&from.rect(), vp, CONNECTION_CULL_PAD);
                let to_visible = rect_in_viewport(&to.rect(), vp, CONNECTION_CULL_PAD);
                if !from_visible && !to_visible {
                    continue;
                }
            }
            out.push(ConnectionCurve {
                from: connection.from.clone(),
                to: connection.to.clone(),
                curve: link_curve(from.center(), to.center()),
            });
        }
        out
    }

    /// Every asset id any note references, attachments and playlists
    /// alike. Input to orphan cleanup.
    pub fn referenced_asset_ids(&self) -> BTreeSet<AssetId> {
        let mut out = BTreeSet::new();
        for note in &self.notes {
            out.extend(note.referenced_assets());
        }
        out
    }
}
