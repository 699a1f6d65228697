//! Connection record between two notes.

use serde::{Deserialize, Serialize};

use super::note::NoteId;

/// Undirected link between two notes.
///
/// `from`/`to` record the creation order for the wire format, but equality
/// of a pair ignores direction: `(a, b)` and `(b, a)` are the same
/// connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: NoteId,
    pub to: NoteId,
}

impl Connection {
    pub fn new(from: NoteId, to: NoteId) -> Self {
        Self { from, to }
    }

    /// Whether this connection joins exactly the given pair, in either
    /// direction.
    pub fn links(&self, a: &NoteId, b: &NoteId) -> bool {
        (&self.from == a && &self.to == b) || (&self.from == b && &self.to == a)
    }

    /// Whether this connection has `id` as either endpoint.
    pub fn touches(&self, id: &NoteId) -> bool {
        &self.from == id || &self.to == id
    }
}
