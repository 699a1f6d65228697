//! Core interaction engine for BytePad boards.
//! This crate is the single source of truth for board state and invariants.

pub mod export;
pub mod geometry;
pub mod graph;
pub mod history;
pub mod logging;
pub mod model;
pub mod sanitize;
pub mod selection;
pub mod session;
pub mod store;

pub use export::{parse_board_file, suggested_file_name, BoardFileExport, ImportError};
pub use geometry::{compute_snap, GuideLines, Point, Rect, Size, SnapOptions, SnapResult};
pub use graph::{GraphError, NoteGraph};
pub use history::HistoryManager;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{AssetId, BoardId, ColorTag, Note, NoteId};
pub use model::snapshot::BoardSnapshot;
pub use selection::SelectionModel;
pub use session::{BoardSession, Gesture, Modifiers, NoteRegion, PointerTarget};
pub use store::{
    open_store, open_store_in_memory, AssetRecord, AssetStore, BoardStore, MemoryStore,
    SqliteStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
