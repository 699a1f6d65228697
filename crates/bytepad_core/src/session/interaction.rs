//! Pointer state machine: drag, resize, and marquee gestures.
//!
//! # Responsibility
//! - Turn pointer down/move/up reports into graph mutations and selection
//!   changes, one gesture at a time.
//! - Resolve drag positions through snapping and surface the resulting
//!   guide lines while the drag is live.
//!
//! # Invariants
//! - At most one gesture is active; a new pointer down replaces whatever
//!   was in flight.
//! - Gestures never write history; they mark the board dirty on pointer up
//!   and the debounced commit captures the final state.
//! - In connect mode, pointer downs only drive connection picking; drag,
//!   resize, and marquee never start.
//! - A note deleted mid-gesture degrades the gesture to a no-op.
//!
//! # See also
//! - `crate::geometry::snap` for the snapping rules drags go through.
//! - `crate::session` for the commands gestures sit alongside.

use std::time::Instant;

use crate::geometry::{
    compute_snap, snap_to_grid, GuideLines, Point, Rect, Size, SnapOptions, GRID_SPACING,
};
use crate::model::note::{NoteId, MIN_NOTE_SIZE};
use crate::store::BoardStore;

use super::BoardSession;

/// Where on a note a pointer press landed.
///
/// Only the header is a drag handle; presses on editor surfaces stay with
/// the editor. Holding alt turns any region into a drag handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteRegion {
    Header,
    Title,
    Body,
    Media,
    ResizeHandle,
    TagEditor,
}

/// What the pointer went down on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    /// Empty board surface.
    Board,
    Note { id: NoteId, region: NoteRegion },
}

/// Modifier keys held at pointer down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

/// The gesture currently in flight, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    /// Group drag. `members` is the selection frozen at pointer down; the
    /// leader's snapped delta moves every member by the same vector.
    Dragging {
        leader: NoteId,
        cursor_origin: Point,
        leader_origin: Point,
        members: Vec<NoteId>,
    },
    /// Group resize. Each entry carries the member's size at pointer down;
    /// the leader's clamped delta applies to all of them.
    Resizing {
        leader: NoteId,
        cursor_origin: Point,
        members: Vec<(NoteId, Size)>,
    },
    /// Rubber-band selection on the board surface.
    Marquee {
        origin: Point,
        current: Point,
        additive: bool,
    },
}

impl<S: BoardStore> BoardSession<S> {
    /// Starts a gesture (or picks a connection endpoint in connect mode).
    pub fn pointer_down(
        &mut self,
        at: Point,
        target: PointerTarget,
        modifiers: Modifiers,
        now: Instant,
    ) {
        if self.connect_mode {
            self.connect_pick(target, now);
            return;
        }

        match target {
            PointerTarget::Note { id, region } => {
                if !self.graph.contains(&id) {
                    return;
                }
                self.selection.mark_on_top(id.clone());

                if modifiers.alt || region == NoteRegion::Header {
                    self.begin_drag(id, at, modifiers);
                } else if region == NoteRegion::ResizeHandle {
                    self.begin_resize(id, at);
                }
                // Presses on title/body/media/tag surfaces stay with the
                // editor under the pointer.
            }
            PointerTarget::Board => {
                if !modifiers.shift {
                    self.selection.clear();
                }
                self.gesture = Gesture::Marquee {
                    origin: at,
                    current: at,
                    additive: modifiers.shift,
                };
            }
        }
    }

    /// Advances the active gesture. Drags resolve through snapping and
    /// refresh the guide lines; marquees just track the cursor.
    pub fn pointer_move(&mut self, at: Point) {
        match self.gesture.clone() {
            Gesture::Idle => {}
            Gesture::Dragging {
                leader,
                cursor_origin,
                leader_origin,
                members,
            } => {
                let Some(size) = self.graph.note(&leader).map(|n| n.size) else {
                    self.gesture = Gesture::Idle;
                    self.guides = GuideLines::default();
                    return;
                };
                let proposed =
                    leader_origin.offset(at.x - cursor_origin.x, at.y - cursor_origin.y);
                let siblings: Vec<Rect> = self
                    .graph
                    .notes()
                    .iter()
                    .filter(|n| !members.contains(&n.id))
                    .map(|n| n.rect())
                    .collect();
                let options = SnapOptions {
                    grid_enabled: self.config.snap_enabled,
                    ..SnapOptions::default()
                };
                let resolved = compute_snap(proposed, size, &siblings, options);
                self.graph.move_group(&leader, resolved.position, &members);
                self.guides = resolved.guides;
            }
            Gesture::Resizing {
                leader,
                cursor_origin,
                members,
            } => {
                let Some((_, leader_start)) = members.iter().find(|(id, _)| id == &leader) else {
                    self.gesture = Gesture::Idle;
                    return;
                };
                // The leader clamps to the minimum, then rounds to the grid
                // (grid rounding applies to resize regardless of the snap
                // toggle); members follow its delta and clamp individually.
                let target = Size::new(
                    snap_to_grid(
                        (leader_start.w + (at.x - cursor_origin.x)).max(MIN_NOTE_SIZE.w),
                        GRID_SPACING,
                    ),
                    snap_to_grid(
                        (leader_start.h + (at.y - cursor_origin.y)).max(MIN_NOTE_SIZE.h),
                        GRID_SPACING,
                    ),
                );
                self.graph
                    .resize_group(&leader, target, &members, MIN_NOTE_SIZE);
            }
            Gesture::Marquee {
                origin, additive, ..
            } => {
                self.gesture = Gesture::Marquee {
                    origin,
                    current: at,
                    additive,
                };
            }
        }
    }

    /// Finishes the active gesture. Drags and resizes mark the board dirty
    /// (one debounced history entry per gesture); a marquee applies its
    /// selection without touching history.
    pub fn pointer_up(&mut self, at: Point, now: Instant) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => {}
            Gesture::Dragging { .. } => {
                self.guides = GuideLines::default();
                self.mark_dirty(now);
            }
            Gesture::Resizing { .. } => {
                self.mark_dirty(now);
            }
            Gesture::Marquee {
                origin, additive, ..
            } => {
                let rect = Rect::from_corners(origin, at);
                self.selection.lasso_select(
                    rect,
                    additive,
                    self.graph.notes().iter().map(|n| (&n.id, n.rect())),
                );
            }
        }
    }

    /// Guide lines of the drag in flight; empty outside drags.
    pub fn active_guides(&self) -> GuideLines {
        self.guides
    }

    /// The live marquee rectangle, for the renderer's rubber band.
    pub fn marquee_rect(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::Marquee {
                origin, current, ..
            } => Some(Rect::from_corners(*origin, *current)),
            _ => None,
        }
    }

    pub fn gesture_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    fn begin_drag(&mut self, id: NoteId, at: Point, modifiers: Modifiers) {
        self.graph.bring_to_front(&id);
        // Grabbing a selected member keeps the whole group; grabbing an
        // unselected note selects it (adding to the group with shift).
        if !self.selection.is_selected(&id) {
            if modifiers.shift {
                self.selection.select_toggle(id.clone(), true);
            } else {
                self.selection.select_only(id.clone());
            }
        }
        let Some(origin) = self.graph.note(&id).map(|n| n.position) else {
            return;
        };
        self.guides = GuideLines::default();
        self.gesture = Gesture::Dragging {
            leader: id,
            cursor_origin: at,
            leader_origin: origin,
            members: self.selection.ids(),
        };
    }

    fn begin_resize(&mut self, id: NoteId, at: Point) {
        // Resizing never changes the selection; it applies to the group
        // only when the grabbed note is already part of it.
        let member_ids: Vec<NoteId> = if self.selection.is_selected(&id) {
            self.selection.ids()
        } else {
            vec![id.clone()]
        };
        let members: Vec<(NoteId, Size)> = member_ids
            .iter()
            .filter_map(|m| self.graph.note(m).map(|n| (m.clone(), n.size)))
            .collect();
        self.gesture = Gesture::Resizing {
            leader: id,
            cursor_origin: at,
            members,
        };
    }

    /// Connect-mode pointer down: first pick arms the connection, a second
    /// pick on a different note completes it. Picking the same note again
    /// keeps it armed; leaving connect mode disarms.
    fn connect_pick(&mut self, target: PointerTarget, now: Instant) {
        let PointerTarget::Note { id, .. } = target else {
            return;
        };
        if !self.graph.contains(&id) {
            return;
        }
        match self.pending_connection.take() {
            Some(first) if first != id => {
                if self.add_connection(&first, &id, now) {
                    self.notices.push("Connected".to_owned());
                }
            }
            _ => {
                self.pending_connection = Some(id);
                self.notices
                    .push("Click another note to connect".to_owned());
            }
        }
    }
}
