//! Portable board file encoding and parsing.
//!
//! # Responsibility
//! - Build the `BytePadStudioExport` wrapper around a board snapshot.
//! - Parse incoming files into a snapshot without touching any board
//!   state: parsing either fully succeeds or reports which step failed.
//!
//! # Invariants
//! - Accepted inputs: the wrapper format, or a bare snapshot object
//!   (legacy exports, including `v`/`html`/`text` era payloads).
//! - Asset blobs never travel in these files, only their ids.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::connection::Connection;
use crate::model::note::BoardId;
use crate::model::snapshot::{BoardSnapshot, SnapshotItem, SNAPSHOT_VERSION};

/// Wrapper format tag. Files declaring any other format are refused.
pub const EXPORT_FORMAT: &str = "BytePadStudioExport";

/// Version of the wrapper itself (not of the snapshot inside).
pub const EXPORT_FILE_VERSION: u32 = 1;

const EXPORT_HINT: &str =
    "Asset blobs are stored separately. Re-import restores layout and connections.";

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+").expect("valid slug regex"));

/// Why an import was refused. The board is untouched in every case.
#[derive(Debug)]
pub enum ImportError {
    /// The raw text is not JSON.
    Json(serde_json::Error),
    /// Valid JSON, but neither the wrapper format nor a bare snapshot.
    UnrecognizedPayload,
    /// A wrapper declaring a format this build does not read.
    UnsupportedFormat { found: String },
    /// The payload was recognized but its board content failed to decode.
    InvalidSnapshot(serde_json::Error),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "import parse failed: not valid JSON: {err}"),
            Self::UnrecognizedPayload => {
                write!(f, "import parse failed: no board payload recognized")
            }
            Self::UnsupportedFormat { found } => {
                write!(f, "import parse failed: unsupported format tag {found:?}")
            }
            Self::InvalidSnapshot(err) => {
                write!(f, "import parse failed: board content invalid: {err}")
            }
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) | Self::InvalidSnapshot(err) => Some(err),
            _ => None,
        }
    }
}

/// The wrapper written to disk on export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardFileExport {
    pub format: String,
    pub version: u32,
    #[serde(default)]
    pub exported_at_ms: i64,
    pub board: ExportedBoard,
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Human hint for people peeking into the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Board section of the wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedBoard {
    pub id: BoardId,
    pub title: String,
    #[serde(default)]
    pub items: Vec<SnapshotItem>,
}

/// Parse result: the snapshot to apply plus the title the file carried,
/// when it carried one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBoardFile {
    pub title: Option<String>,
    pub snapshot: BoardSnapshot,
}

/// Builds the export wrapper for one board.
pub fn board_file(board_id: &BoardId, title: &str, snapshot: &BoardSnapshot) -> BoardFileExport {
    BoardFileExport {
        format: EXPORT_FORMAT.to_owned(),
        version: EXPORT_FILE_VERSION,
        exported_at_ms: epoch_millis(),
        board: ExportedBoard {
            id: board_id.clone(),
            title: title.to_owned(),
            items: snapshot.items.clone(),
        },
        connections: snapshot.connections.clone(),
        note: Some(EXPORT_HINT.to_owned()),
    }
}

impl BoardFileExport {
    /// Pretty-printed JSON, the shape written to disk.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Parses a board file. No board state is involved; callers apply the
/// returned snapshot only after this fully succeeds.
pub fn parse_board_file(raw: &str) -> Result<ParsedBoardFile, ImportError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(ImportError::Json)?;
    let object = value.as_object().ok_or(ImportError::UnrecognizedPayload)?;

    if let Some(format) = object.get("format") {
        let found = format.as_str().unwrap_or_default();
        if found != EXPORT_FORMAT {
            return Err(ImportError::UnsupportedFormat {
                found: found.to_owned(),
            });
        }
        let file: BoardFileExport =
            serde_json::from_value(value.clone()).map_err(ImportError::InvalidSnapshot)?;
        return Ok(ParsedBoardFile {
            title: Some(file.board.title),
            snapshot: BoardSnapshot {
                version: SNAPSHOT_VERSION,
                items: file.board.items,
                connections: file.connections,
            },
        });
    }

    if object.contains_key("items") {
        let snapshot: BoardSnapshot =
            serde_json::from_value(value).map_err(ImportError::InvalidSnapshot)?;
        return Ok(ParsedBoardFile {
            title: None,
            snapshot,
        });
    }

    Err(ImportError::UnrecognizedPayload)
}

/// Download name for an exported board: `bytepad-<slug>.json`.
pub fn suggested_file_name(title: &str) -> String {
    let trimmed = title.trim();
    let base = if trimmed.is_empty() { "board" } else { trimmed };
    let slug = SLUG_RE.replace_all(base, "-").to_lowercase();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "bytepad-board.json".to_owned()
    } else {
        format!("bytepad-{slug}.json")
    }
}

fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
