//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `bytepad_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use std::time::Instant;

use bytepad_core::geometry::Point;
use bytepad_core::session::BoardSession;
use bytepad_core::store::MemoryStore;

fn main() {
    println!("bytepad_core ping={}", bytepad_core::ping());
    println!("bytepad_core version={}", bytepad_core::core_version());

    // Exercise a full in-memory session so the probe catches wiring
    // regressions beyond linkage.
    let mut session = BoardSession::open(MemoryStore::new());
    let now = Instant::now();
    let first = session.create_note(Some(Point::new(100.0, 100.0)), now);
    let second = session.create_note(Some(Point::new(400.0, 100.0)), now);
    let connected = session.add_connection(&first, &second, now);
    session.save_now();
    let undone = session.undo();
    println!(
        "bytepad_core smoke notes={} connected={} undo={}",
        session.graph().len(),
        connected,
        undone
    );
}
