//! Board session: the command surface of the engine.
//!
//! # Responsibility
//! - Own the live state of one open workspace: current graph, selection,
//!   per-board histories, pending commit, connect mode, clipboard.
//! - Expose every user-level command (note edits, board management,
//!   clipboard, import/export, undo/redo) as a plain method.
//! - Decide the commit policy: continuous edits debounce into one history
//!   entry, structural changes commit immediately.
//!
//! # Invariants
//! - The graph is the single source of truth; history entries and stored
//!   payloads are detached captures of it.
//! - Store failures never abort a command: the session logs, queues a
//!   notice, and keeps the in-memory state authoritative.
//! - Undo/redo cancel any pending debounced commit before applying, so a
//!   stale capture can never overwrite the restored state.
//! - Switching boards persists the outgoing board first and clears every
//!   transient (selection, gesture, pending connection).
//!
//! # See also
//! - `crate::session::interaction` for the pointer state machine.
//! - `crate::history` for the snapshot stack this layer feeds.

use std::collections::HashMap;
use std::time::Instant;

use log::{info, warn};

use crate::export::{self, BoardFileExport, ImportError};
use crate::geometry::{GuideLines, Point, Rect};
use crate::graph::{ConnectionCurve, NoteGraph};
use crate::history::HistoryManager;
use crate::model::note::{
    AssetAttachment, AssetId, BoardId, ColorTag, Note, NoteId, PlaylistTrack,
};
use crate::model::snapshot::BoardSnapshot;
use crate::sanitize::{looks_like_markup, ContentSanitizer, PlainTextSanitizer};
use crate::selection::SelectionModel;
use crate::store::{
    AssetRecord, AssetStore, BoardConfig, BoardInfo, BoardStore, StoreResult, WorkspaceMeta,
};

pub mod clipboard;
pub mod commit;
pub mod interaction;

pub use clipboard::{ClipboardNote, DUPLICATE_OFFSET, PASTE_CASCADE};
pub use commit::{CommitScheduler, DEBOUNCE_MS};
pub use interaction::{Gesture, Modifiers, NoteRegion, PointerTarget};

/// Undo depth a session keeps per board.
pub const HISTORY_DEPTH: usize = 80;

/// Where the new-note command places a note when no position is given.
const NEW_NOTE_AT: Point = Point::new(60.0, 60.0);

/// Paste lands left of and above the viewport center, so the first pasted
/// note reads as "roughly centered" rather than starting at the center.
const PASTE_CENTER_OFFSET: Point = Point::new(-120.0, -80.0);

/// What an import applied, for callers that show a summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Board title carried by wrapper payloads; bare snapshots have none.
    pub title: Option<String>,
    pub notes: usize,
    pub connections: usize,
}

/// One attachment resolved against an asset store. `record` is `None` when
/// the blob is gone; renderers show a placeholder for those.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydratedAsset {
    pub note_id: NoteId,
    pub asset_id: AssetId,
    pub record: Option<AssetRecord>,
}

/// Live state and command surface of one open workspace.
pub struct BoardSession<S: BoardStore> {
    store: S,
    meta: WorkspaceMeta,
    config: BoardConfig,
    graph: NoteGraph,
    selection: SelectionModel,
    history: HistoryManager,
    stashed_histories: HashMap<BoardId, HistoryManager>,
    commit: CommitScheduler,
    gesture: Gesture,
    guides: GuideLines,
    connect_mode: bool,
    pending_connection: Option<NoteId>,
    clipboard: Vec<ClipboardNote>,
    viewport: Option<Rect>,
    notices: Vec<String>,
    sanitizer: Box<dyn ContentSanitizer>,
}

impl<S: BoardStore> BoardSession<S> {
    /// Opens a session over the store. Never fails: unreadable records are
    /// logged and replaced by their bootstrap defaults, and the board loads
    /// empty when its payload is gone.
    pub fn open(store: S) -> Self {
        let meta = match store.load_meta() {
            Ok(Some(meta)) => meta,
            Ok(None) => WorkspaceMeta::bootstrap(),
            Err(err) => {
                warn!("event=session_open module=session status=degraded record=meta error={err}");
                WorkspaceMeta::bootstrap()
            }
        };
        let config = match store.load_config() {
            Ok(Some(config)) => config,
            Ok(None) => BoardConfig::default(),
            Err(err) => {
                warn!(
                    "event=session_open module=session status=degraded record=config error={err}"
                );
                BoardConfig::default()
            }
        };

        let mut session = Self {
            store,
            meta,
            config,
            graph: NoteGraph::new(),
            selection: SelectionModel::new(),
            history: HistoryManager::with_max_depth(HISTORY_DEPTH),
            stashed_histories: HashMap::new(),
            commit: CommitScheduler::new(),
            gesture: Gesture::Idle,
            guides: GuideLines::default(),
            connect_mode: false,
            pending_connection: None,
            clipboard: Vec::new(),
            viewport: None,
            notices: Vec::new(),
            sanitizer: Box::new(PlainTextSanitizer),
        };

        if session.meta.boards.is_empty() {
            session.meta = WorkspaceMeta::bootstrap();
        } else if !session.meta.contains(&session.meta.current_board_id) {
            session.meta.current_board_id = session.meta.boards[0].id.clone();
        }

        session.load_board_into_graph();
        session.history.push(session.graph.snapshot());
        info!(
            "event=session_open module=session status=ok boards={} board={} notes={}",
            session.meta.boards.len(),
            session.meta.current_board_id,
            session.graph.len()
        );
        session
    }

    /// Replaces the content sanitizer notes are edited through.
    pub fn set_sanitizer(&mut self, sanitizer: Box<dyn ContentSanitizer>) {
        self.sanitizer = sanitizer;
    }

    // ---- read surface -------------------------------------------------

    pub fn graph(&self) -> &NoteGraph {
        &self.graph
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn boards(&self) -> &[BoardInfo] {
        &self.meta.boards
    }

    pub fn current_board_id(&self) -> &BoardId {
        &self.meta.current_board_id
    }

    pub fn current_board_title(&self) -> &str {
        self.meta
            .title_of(&self.meta.current_board_id)
            .unwrap_or("Board")
    }

    /// Queued user-facing messages, drained oldest first.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    pub fn has_pending_commit(&self) -> bool {
        self.commit.pending()
    }

    // ---- viewport projections -----------------------------------------

    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Option<&Rect> {
        self.viewport.as_ref()
    }

    /// Notes a renderer should draw for the registered viewport; every note
    /// when no viewport is registered.
    pub fn visible_notes(&self) -> Vec<&Note> {
        match &self.viewport {
            Some(viewport) => self.graph.visible_notes(viewport),
            None => self.graph.notes().iter().collect(),
        }
    }

    /// Connection curves culled against the registered viewport.
    pub fn connection_curves(&self) -> Vec<ConnectionCurve> {
        self.graph.connection_curves(self.viewport.as_ref())
    }

    pub fn filter_by_tag(&self, query: &str) -> Option<Vec<NoteId>> {
        self.graph.filter_by_tag(query)
    }

    // ---- note commands (debounced) ------------------------------------

    /// Creates a note at `at` (default spawn point otherwise) in the
    /// configured default color and raises it above everything.
    pub fn create_note(&mut self, at: Option<Point>, now: Instant) -> NoteId {
        let mut note = Note::new_at(at.unwrap_or(NEW_NOTE_AT));
        note.color = self.config.default_color;
        let id = note.id.clone();
        let _ = self.graph.add_note(note);
        self.graph.bring_to_front(&id);
        self.mark_dirty(now);
        self.notices.push("New note".to_owned());
        id
    }

    /// Clones a note slightly offset from its source, with a fresh id.
    pub fn duplicate_note(&mut self, id: &NoteId, now: Instant) -> Option<NoteId> {
        let source = self.graph.note(id)?.clone();
        let copy = ClipboardNote::capture(&source).instantiate(
            source.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET),
        );
        let new_id = copy.id.clone();
        let _ = self.graph.add_note(copy);
        self.graph.bring_to_front(&new_id);
        self.mark_dirty(now);
        self.notices.push("Duplicated".to_owned());
        Some(new_id)
    }

    pub fn set_note_title(&mut self, id: &NoteId, title: &str, now: Instant) -> bool {
        let applied = self.graph.update_note(id, |note| note.title = title.to_owned());
        if applied {
            self.mark_dirty(now);
        }
        applied
    }

    /// Stores note body content. Input that already looks like markup is
    /// kept as is; plain text goes through the sanitizer.
    pub fn set_note_content(&mut self, id: &NoteId, raw: &str, now: Instant) -> bool {
        let content = if looks_like_markup(raw) {
            raw.to_owned()
        } else {
            self.sanitizer.sanitize(raw)
        };
        let applied = self.graph.update_note(id, |note| note.content = content);
        if applied {
            self.mark_dirty(now);
        }
        applied
    }

    pub fn set_note_color(&mut self, id: &NoteId, color: ColorTag, now: Instant) -> bool {
        let applied = self.graph.update_note(id, |note| note.color = color);
        if applied {
            self.mark_dirty(now);
        }
        applied
    }

    pub fn set_note_asset(
        &mut self,
        id: &NoteId,
        asset: Option<AssetAttachment>,
        now: Instant,
    ) -> bool {
        let applied = self.graph.update_note(id, |note| note.asset = asset);
        if applied {
            self.mark_dirty(now);
        }
        applied
    }

    pub fn set_note_playlist(
        &mut self,
        id: &NoteId,
        tracks: Vec<PlaylistTrack>,
        now: Instant,
    ) -> bool {
        let applied = self.graph.update_note(id, |note| note.playlist = tracks);
        if applied {
            self.mark_dirty(now);
        }
        applied
    }

    /// Adds a tag to a note. `false` when the note is gone, the tag is
    /// blank, or the note already carries it.
    pub fn add_note_tag(&mut self, id: &NoteId, raw: &str, now: Instant) -> bool {
        let mut added = false;
        self.graph.update_note(id, |note| added = note.add_tag(raw));
        if added {
            self.mark_dirty(now);
        }
        added
    }

    pub fn remove_note_tag(&mut self, id: &NoteId, tag: &str, now: Instant) -> bool {
        let mut removed = false;
        self.graph.update_note(id, |note| removed = note.remove_tag(tag));
        if removed {
            self.mark_dirty(now);
        }
        removed
    }

    /// Raises a note above everything and marks it most recently touched.
    pub fn bring_note_to_front(&mut self, id: &NoteId, now: Instant) -> bool {
        if !self.graph.bring_to_front(id) {
            return false;
        }
        self.selection.mark_on_top(id.clone());
        self.mark_dirty(now);
        true
    }

    // ---- selection commands -------------------------------------------

    pub fn select_all(&mut self) {
        let ids: Vec<NoteId> = self.graph.notes().iter().map(|n| n.id.clone()).collect();
        self.selection.select_many(ids.iter());
        self.notices.push("Selected all".to_owned());
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---- connections ---------------------------------------------------

    /// Toggling connect mode off also forgets a half-finished connection.
    pub fn set_connect_mode(&mut self, on: bool) {
        self.connect_mode = on;
        if !on {
            self.pending_connection = None;
        }
    }

    pub fn connect_mode(&self) -> bool {
        self.connect_mode
    }

    pub fn pending_connection(&self) -> Option<&NoteId> {
        self.pending_connection.as_ref()
    }

    /// Connects two notes. Refusals (self-loop, duplicate pair, missing
    /// endpoint) leave everything untouched and return `false`.
    pub fn add_connection(&mut self, from: &NoteId, to: &NoteId, now: Instant) -> bool {
        if !self.graph.add_connection(from.clone(), to.clone()) {
            return false;
        }
        if let Err(err) = self
            .store
            .save_connections(&self.meta.current_board_id, self.graph.connections())
        {
            warn!(
                "event=connections_save module=session status=error board={} error={err}",
                self.meta.current_board_id
            );
        }
        self.mark_dirty(now);
        true
    }

    // ---- structural commands (commit immediately) ----------------------

    /// Deletes every selected note, pruning their connections. Commits at
    /// once so a single undo restores the whole set.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        self.flush_pending();
        let removed = self.remove_selected_notes();
        if removed > 0 {
            self.commit_now();
            self.notices.push("Deleted".to_owned());
        }
        removed
    }

    /// Removes all notes and connections of the current board.
    pub fn clear_board(&mut self) -> usize {
        self.flush_pending();
        let removed = self.graph.len();
        self.graph.clear();
        self.selection.clear();
        self.pending_connection = None;
        self.commit_now();
        self.notices.push("Cleared".to_owned());
        removed
    }

    // ---- clipboard -----------------------------------------------------

    /// Captures the selected notes. The payload carries styling, content,
    /// tags and attachments but no identity or placement.
    pub fn copy_selection(&mut self) -> usize {
        let captured = self.capture_selection();
        if captured.is_empty() {
            self.notices.push("Select note(s) to copy".to_owned());
            return 0;
        }
        let count = captured.len();
        self.clipboard = captured;
        self.notices.push(format!("Copied {count} note(s)"));
        count
    }

    /// Copy plus delete, committed immediately.
    pub fn cut_selection(&mut self) -> usize {
        let captured = self.capture_selection();
        if captured.is_empty() {
            self.notices.push("Select note(s) to copy".to_owned());
            return 0;
        }
        self.flush_pending();
        self.clipboard = captured;
        let removed = self.remove_selected_notes();
        self.commit_now();
        self.notices.push(format!("Cut {removed} note(s)"));
        removed
    }

    /// Pastes the clipboard as fresh notes. Without an explicit position
    /// they land near the viewport center, each successive note offset by
    /// the cascade step so none fully covers another.
    pub fn paste_clipboard(&mut self, at: Option<Point>) -> Vec<NoteId> {
        if self.clipboard.is_empty() {
            self.notices.push("Clipboard empty".to_owned());
            return Vec::new();
        }
        self.flush_pending();
        let base = at.unwrap_or_else(|| match &self.viewport {
            Some(viewport) => viewport
                .center()
                .offset(PASTE_CENTER_OFFSET.x, PASTE_CENTER_OFFSET.y),
            None => NEW_NOTE_AT,
        });
        let payloads = self.clipboard.clone();
        let mut minted = Vec::with_capacity(payloads.len());
        for (index, payload) in payloads.iter().enumerate() {
            let step = PASTE_CASCADE * index as f64;
            let note = payload.instantiate(base.offset(step, step));
            let id = note.id.clone();
            let _ = self.graph.add_note(note);
            self.graph.bring_to_front(&id);
            minted.push(id);
        }
        self.commit_now();
        self.notices.push(format!("Pasted {} note(s)", minted.len()));
        minted
    }

    pub fn clipboard_len(&self) -> usize {
        self.clipboard.len()
    }

    // ---- history -------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Steps back one history entry. A pending debounced commit is
    /// discarded first: it captured state the user is leaving.
    pub fn undo(&mut self) -> bool {
        self.commit.cancel();
        let graph = &mut self.graph;
        let applied = self.history.undo(|snapshot| graph.apply_snapshot(snapshot));
        if applied {
            self.after_history_apply("Undo");
        }
        applied
    }

    pub fn redo(&mut self) -> bool {
        self.commit.cancel();
        let graph = &mut self.graph;
        let applied = self.history.redo(|snapshot| graph.apply_snapshot(snapshot));
        if applied {
            self.after_history_apply("Redo");
        }
        applied
    }

    /// Flushes the debounced commit once its deadline passes. Embedders
    /// call this from their frame or timer loop.
    pub fn tick(&mut self, now: Instant) {
        if self.commit.take_due(now) {
            self.commit_now();
        }
    }

    /// Commits and persists right now, pending debounce or not.
    pub fn save_now(&mut self) {
        self.commit_now();
        self.notices.push("Saved".to_owned());
    }

    // ---- boards --------------------------------------------------------

    /// Switches to another registered board. The outgoing board is
    /// persisted (flushing any pending commit into its history first) and
    /// every transient is reset. `false` for unknown ids and for the
    /// current board.
    pub fn switch_board(&mut self, target: &BoardId) -> bool {
        if target == &self.meta.current_board_id || !self.meta.contains(target) {
            return false;
        }
        let outgoing = self.meta.current_board_id.clone();
        self.leave_current_board();
        self.meta.current_board_id = target.clone();
        self.load_board_into_graph();
        match self.stashed_histories.remove(target) {
            Some(history) => self.history = history,
            None => {
                self.history.push(self.graph.snapshot());
            }
        }
        self.persist_meta();
        info!("event=board_switch module=session status=ok from={outgoing} to={target}");
        true
    }

    /// Registers a new empty board and switches to it. `None` for a blank
    /// title.
    pub fn create_board(&mut self, title: &str) -> Option<BoardId> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        self.leave_current_board();
        let id = BoardId::generate();
        self.meta.boards.push(BoardInfo {
            id: id.clone(),
            title: title.to_owned(),
        });
        self.meta.current_board_id = id.clone();
        self.graph.clear();
        self.history.push(self.graph.snapshot());
        self.persist_current();
        self.notices.push(format!("Created: {title}"));
        info!("event=board_create module=session status=ok board={id}");
        Some(id)
    }

    /// Renames a registered board. `false` for unknown ids or blank titles.
    pub fn rename_board(&mut self, id: &BoardId, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(entry) = self.meta.boards.iter_mut().find(|b| &b.id == id) else {
            return false;
        };
        entry.title = title.to_owned();
        self.persist_meta();
        self.notices.push("Renamed".to_owned());
        true
    }

    // ---- import / export -----------------------------------------------

    /// Replaces the current board with a parsed board file. The payload is
    /// validated in full before anything is touched; on any parse error the
    /// board stays exactly as it was. A successful import commits
    /// immediately, so one undo steps back to the pre-import state.
    pub fn import_board_file(&mut self, raw: &str) -> Result<ImportOutcome, ImportError> {
        let parsed = match export::parse_board_file(raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("event=board_import module=session status=error error={err}");
                return Err(err);
            }
        };
        self.flush_pending();
        self.graph.apply_snapshot(&parsed.snapshot);
        self.selection.clear();
        self.pending_connection = None;
        self.commit_now();
        let outcome = ImportOutcome {
            title: parsed.title.clone(),
            notes: self.graph.len(),
            connections: self.graph.connections().len(),
        };
        self.notices.push(match &parsed.title {
            Some(title) => format!("Imported {title}"),
            None => "Imported".to_owned(),
        });
        info!(
            "event=board_import module=session status=ok board={} notes={} connections={}",
            self.meta.current_board_id, outcome.notes, outcome.connections
        );
        Ok(outcome)
    }

    /// Wraps the current board in the portable export envelope.
    pub fn export_board_file(&self) -> BoardFileExport {
        export::board_file(
            &self.meta.current_board_id,
            self.current_board_title(),
            &self.graph.snapshot(),
        )
    }

    /// File name suggestion derived from the board title.
    pub fn export_file_name(&self) -> String {
        export::suggested_file_name(self.current_board_title())
    }

    // ---- assets --------------------------------------------------------

    /// Resolves every attachment of the current board against the asset
    /// store. Read failures are logged and reported as missing.
    pub fn hydrate_assets<A: AssetStore>(&self, assets: &A) -> Vec<HydratedAsset> {
        let mut out = Vec::new();
        for note in self.graph.notes() {
            for asset_id in note.referenced_assets() {
                let record = match assets.get_asset(&asset_id) {
                    Ok(record) => record,
                    Err(err) => {
                        warn!(
                            "event=asset_hydrate module=session status=error asset={asset_id} error={err}"
                        );
                        None
                    }
                };
                out.push(HydratedAsset {
                    note_id: note.id.clone(),
                    asset_id,
                    record,
                });
            }
        }
        out
    }

    /// Deletes stored assets no board references anymore. References are
    /// collected across every registered board, not just the current one,
    /// so a blob shared between boards survives. Fails without deleting
    /// anything when a board payload cannot be read.
    pub fn cleanup_unused_assets<A: AssetStore>(
        &mut self,
        assets: &A,
    ) -> StoreResult<Vec<AssetId>> {
        let mut referenced = self.graph.referenced_asset_ids();
        for board in &self.meta.boards {
            if board.id == self.meta.current_board_id {
                continue;
            }
            if let Some(snapshot) = self.store.load_board(&board.id)? {
                for item in &snapshot.items {
                    if let Some(id) = &item.asset_id {
                        referenced.insert(id.clone());
                    }
                    if let Some(playlist) = &item.playlist {
                        for track in playlist {
                            referenced.insert(track.asset_id.clone());
                        }
                    }
                }
            }
        }

        let mut removed = Vec::new();
        for id in assets.list_asset_ids()? {
            if !referenced.contains(&id) {
                assets.delete_asset(&id)?;
                removed.push(id);
            }
        }
        if removed.is_empty() {
            self.notices.push("No unused assets".to_owned());
        } else {
            self.notices
                .push(format!("Removed {} unused assets", removed.len()));
        }
        info!(
            "event=asset_cleanup module=session status=ok removed={}",
            removed.len()
        );
        Ok(removed)
    }

    // ---- configuration -------------------------------------------------

    pub fn set_snap_enabled(&mut self, on: bool) {
        self.config.snap_enabled = on;
        self.persist_config();
    }

    pub fn set_default_color(&mut self, color: ColorTag) {
        self.config.default_color = color;
        self.persist_config();
    }

    // ---- internals -----------------------------------------------------

    fn capture_selection(&self) -> Vec<ClipboardNote> {
        self.graph
            .notes()
            .iter()
            .filter(|n| self.selection.is_selected(&n.id))
            .map(ClipboardNote::capture)
            .collect()
    }

    fn remove_selected_notes(&mut self) -> usize {
        let ids = self.selection.ids();
        let mut removed = 0;
        for id in &ids {
            if self.graph.remove_note(id).is_some() {
                removed += 1;
            }
            self.selection.forget(id);
        }
        removed
    }

    fn after_history_apply(&mut self, label: &str) {
        self.selection.retain(|id| self.graph.contains(id));
        self.pending_connection = None;
        self.guides = GuideLines::default();
        self.persist_current();
        self.notices.push(label.to_owned());
    }

    fn mark_dirty(&mut self, now: Instant) {
        self.commit.schedule(now);
    }

    /// Flushes a pending debounced commit into history. Structural commands
    /// call this before mutating, so the state the debounce was tracking
    /// stays reachable through undo.
    fn flush_pending(&mut self) {
        if self.commit.pending() {
            self.commit_now();
        }
    }

    /// Pushes the live state onto history and persists it. Used by both
    /// the debounce flush and the immediate structural commands.
    fn commit_now(&mut self) {
        self.commit.cancel();
        self.history.push(self.graph.snapshot());
        self.persist_current();
    }

    /// Persists the outgoing board and parks its transients before the
    /// session points at another board.
    fn leave_current_board(&mut self) {
        if self.commit.pending() {
            self.commit_now();
        } else {
            self.persist_current();
        }
        let outgoing = self.meta.current_board_id.clone();
        let history = std::mem::replace(
            &mut self.history,
            HistoryManager::with_max_depth(HISTORY_DEPTH),
        );
        self.stashed_histories.insert(outgoing, history);
        self.selection.clear();
        self.gesture = Gesture::Idle;
        self.guides = GuideLines::default();
        self.pending_connection = None;
    }

    /// Loads the current board from the store into the graph. Payloads
    /// stored before connections moved into the snapshot fall back to the
    /// separate connections record.
    fn load_board_into_graph(&mut self) {
        let board_id = self.meta.current_board_id.clone();
        let mut snapshot = match self.store.load_board(&board_id) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => BoardSnapshot::empty(),
            Err(err) => {
                warn!(
                    "event=board_load module=session status=degraded board={board_id} error={err}"
                );
                self.notices.push("Could not load saved board".to_owned());
                BoardSnapshot::empty()
            }
        };
        if snapshot.connections.is_empty() {
            match self.store.load_connections(&board_id) {
                Ok(connections) => snapshot.connections = connections,
                Err(err) => warn!(
                    "event=board_load module=session status=degraded board={board_id} record=connections error={err}"
                ),
            }
        }
        self.graph.apply_snapshot(&snapshot);
        info!(
            "event=board_load module=session status=ok board={board_id} notes={} connections={}",
            self.graph.len(),
            self.graph.connections().len()
        );
    }

    fn persist_current(&mut self) {
        let board_id = self.meta.current_board_id.clone();
        let snapshot = self.graph.snapshot();
        let mut failed = false;
        if let Err(err) = self.store.save_board(&board_id, &snapshot) {
            warn!("event=board_save module=session status=error board={board_id} error={err}");
            failed = true;
        }
        if let Err(err) = self
            .store
            .save_connections(&board_id, self.graph.connections())
        {
            warn!(
                "event=connections_save module=session status=error board={board_id} error={err}"
            );
            failed = true;
        }
        if let Err(err) = self.store.save_meta(&self.meta) {
            warn!("event=meta_save module=session status=error error={err}");
            failed = true;
        }
        if failed {
            self.notices.push("Save failed".to_owned());
        }
    }

    fn persist_meta(&mut self) {
        if let Err(err) = self.store.save_meta(&self.meta) {
            warn!("event=meta_save module=session status=error error={err}");
            self.notices.push("Save failed".to_owned());
        }
    }

    fn persist_config(&mut self) {
        if let Err(err) = self.store.save_config(&self.config) {
            warn!("event=config_save module=session status=error error={err}");
            self.notices.push("Save failed".to_owned());
        }
    }
}
