//! Domain model for boards, notes and connections.
//!
//! # Responsibility
//! - Define canonical data structures used by core board logic.
//! - Keep one typed shape per concept; serialization lives at the edges.
//!
//! # Invariants
//! - Every domain object is identified by a stable string id.
//! - The wire forms in `snapshot` are the only serialized board shapes.
//!
//! # See also
//! - `crate::graph` for the live structure owning these records.

pub mod connection;
pub mod note;
pub mod snapshot;
