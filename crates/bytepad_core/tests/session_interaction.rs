use std::time::{Duration, Instant};

use bytepad_core::session::DEBOUNCE_MS;
use bytepad_core::{
    BoardSession, MemoryStore, Modifiers, NoteId, NoteRegion, Point, PointerTarget, Rect, Size,
};

#[test]
fn dragging_a_selected_member_moves_the_whole_group() {
    let mut session = BoardSession::open(MemoryStore::new());
    let t0 = Instant::now();
    let a = session.create_note(Some(Point::new(100.0, 100.0)), t0);
    let b = session.create_note(Some(Point::new(300.0, 250.0)), t0);
    session.select_all();

    session.pointer_down(Point::new(110.0, 110.0), header(&a), Modifiers::default(), t0);
    session.pointer_move(Point::new(160.0, 130.0));
    let released = t0 + Duration::from_millis(50);
    session.pointer_up(Point::new(160.0, 130.0), released);

    assert_eq!(position(&session, &a), Point::new(150.0, 120.0));
    assert_eq!(position(&session, &b), Point::new(350.0, 270.0));

    // The creates and the drag are still one pending commit; the release
    // pushed the deadline past the creates' original one.
    assert!(session.has_pending_commit());
    session.tick(t0 + Duration::from_millis(200));
    assert_eq!(session.history().depth(), 1);
    session.tick(after_debounce(released));
    assert_eq!(session.history().depth(), 2);
    assert!(!session.has_pending_commit());

    assert!(session.undo());
    assert!(session.graph().is_empty());
}

#[test]
fn only_header_grabs_or_alt_presses_start_a_drag() {
    let mut session = BoardSession::open(MemoryStore::new());
    let t0 = Instant::now();
    let a = session.create_note(Some(Point::new(100.0, 100.0)), t0);
    session.tick(after_debounce(t0));

    session.pointer_down(Point::new(150.0, 150.0), body(&a), Modifiers::default(), t0);
    assert!(!session.gesture_active());
    session.pointer_move(Point::new(400.0, 400.0));
    assert_eq!(position(&session, &a), Point::new(100.0, 100.0));

    let alt = Modifiers {
        alt: true,
        ..Modifiers::default()
    };
    session.pointer_down(Point::new(150.0, 150.0), body(&a), alt, t0);
    assert!(session.gesture_active());
    session.pointer_move(Point::new(180.0, 170.0));
    session.pointer_up(Point::new(180.0, 170.0), t0);
    assert_eq!(position(&session, &a), Point::new(130.0, 120.0));
}

#[test]
fn drags_snap_to_sibling_edges_and_surface_guides() {
    let mut session = BoardSession::open(MemoryStore::new());
    let t0 = Instant::now();
    let _anchor = session.create_note(Some(Point::new(400.0, 400.0)), t0);
    let dragged = session.create_note(Some(Point::new(200.0, 100.0)), t0);
    session.tick(after_debounce(t0));

    session.pointer_down(
        Point::new(210.0, 110.0),
        header(&dragged),
        Modifiers::default(),
        t0,
    );
    // Proposed x lands at 397, within tolerance of the anchor's left edge.
    session.pointer_move(Point::new(407.0, 110.0));

    assert_eq!(position(&session, &dragged), Point::new(400.0, 100.0));
    assert_eq!(session.active_guides().vertical, Some(400.0));
    assert_eq!(session.active_guides().horizontal, None);

    session.pointer_up(Point::new(407.0, 110.0), t0);
    assert!(!session.active_guides().any());
}

#[test]
fn resizes_clamp_to_the_minimum_and_round_to_the_grid() {
    let mut session = BoardSession::open(MemoryStore::new());
    let t0 = Instant::now();
    let a = session.create_note(Some(Point::new(100.0, 100.0)), t0);
    session.tick(after_debounce(t0));

    session.pointer_down(Point::new(320.0, 270.0), handle(&a), Modifiers::default(), t0);
    session.pointer_move(Point::new(220.0, 170.0));
    assert_eq!(size(&session, &a), Size::new(160.0, 120.0));

    session.pointer_move(Point::new(357.0, 293.0));
    assert_eq!(size(&session, &a), Size::new(260.0, 190.0));

    session.pointer_up(Point::new(357.0, 293.0), t0);
    // Resizing never changes the selection.
    assert!(session.selection().is_empty());
    session.tick(after_debounce(t0));
    assert_eq!(session.history().depth(), 3);
}

#[test]
fn marquee_selection_applies_on_release() {
    let mut session = BoardSession::open(MemoryStore::new());
    let t0 = Instant::now();
    let a = session.create_note(Some(Point::new(100.0, 100.0)), t0);
    let b = session.create_note(Some(Point::new(600.0, 600.0)), t0);
    session.tick(after_debounce(t0));

    session.pointer_down(
        Point::new(90.0, 90.0),
        PointerTarget::Board,
        Modifiers::default(),
        t0,
    );
    session.pointer_move(Point::new(330.0, 280.0));
    assert_eq!(
        session.marquee_rect(),
        Some(Rect::from_parts(90.0, 90.0, 240.0, 190.0))
    );

    session.pointer_up(Point::new(330.0, 280.0), t0);
    assert!(session.marquee_rect().is_none());
    assert!(session.selection().is_selected(&a));
    assert!(!session.selection().is_selected(&b));

    // Shift extends instead of replacing.
    let shift = Modifiers {
        shift: true,
        ..Modifiers::default()
    };
    session.pointer_down(Point::new(590.0, 590.0), PointerTarget::Board, shift, t0);
    session.pointer_up(Point::new(830.0, 790.0), t0);
    assert!(session.selection().is_selected(&a));
    assert!(session.selection().is_selected(&b));

    // A plain board press clears the selection before the lasso starts.
    session.pointer_down(
        Point::new(0.0, 0.0),
        PointerTarget::Board,
        Modifiers::default(),
        t0,
    );
    assert!(session.selection().is_empty());
    session.pointer_up(Point::new(5.0, 5.0), t0);
    assert!(session.selection().is_empty());
}

#[test]
fn connect_mode_suppresses_gestures_and_links_notes() {
    let mut session = BoardSession::open(MemoryStore::new());
    let t0 = Instant::now();
    let a = session.create_note(Some(Point::new(100.0, 100.0)), t0);
    let b = session.create_note(Some(Point::new(500.0, 100.0)), t0);
    session.tick(after_debounce(t0));
    session.take_notices();

    session.set_connect_mode(true);
    session.pointer_down(Point::new(110.0, 110.0), header(&a), Modifiers::default(), t0);
    assert!(!session.gesture_active());
    assert_eq!(session.pending_connection(), Some(&a));
    assert!(session
        .take_notices()
        .contains(&"Click another note to connect".to_string()));

    // Picking the armed note again re-arms instead of completing.
    session.pointer_down(Point::new(120.0, 120.0), header(&a), Modifiers::default(), t0);
    assert_eq!(session.pending_connection(), Some(&a));

    // Board presses in connect mode change nothing.
    session.pointer_down(
        Point::new(0.0, 0.0),
        PointerTarget::Board,
        Modifiers::default(),
        t0,
    );
    assert_eq!(session.pending_connection(), Some(&a));
    assert!(!session.gesture_active());

    session.pointer_down(Point::new(510.0, 110.0), header(&b), Modifiers::default(), t0);
    assert!(session.graph().has_connection(&a, &b));
    assert_eq!(session.pending_connection(), None);
    assert!(session.take_notices().contains(&"Connected".to_string()));
    assert!(session.selection().is_empty());

    // A second attempt at the same pair is refused quietly.
    session.pointer_down(Point::new(110.0, 110.0), header(&a), Modifiers::default(), t0);
    session.pointer_down(Point::new(510.0, 110.0), header(&b), Modifiers::default(), t0);
    assert_eq!(session.graph().connections().len(), 1);
    assert!(!session.take_notices().contains(&"Connected".to_string()));

    // Leaving connect mode disarms a half-made connection.
    session.pointer_down(Point::new(110.0, 110.0), header(&a), Modifiers::default(), t0);
    assert_eq!(session.pending_connection(), Some(&a));
    session.set_connect_mode(false);
    assert_eq!(session.pending_connection(), None);
}

#[test]
fn gestures_degrade_when_the_note_vanishes_mid_flight() {
    let mut session = BoardSession::open(MemoryStore::new());
    let t0 = Instant::now();
    let a = session.create_note(Some(Point::new(100.0, 100.0)), t0);
    session.tick(after_debounce(t0));

    session.pointer_down(Point::new(110.0, 110.0), header(&a), Modifiers::default(), t0);
    assert!(session.gesture_active());
    assert_eq!(session.delete_selected(), 1);

    session.pointer_move(Point::new(300.0, 300.0));
    assert!(!session.gesture_active());
    session.pointer_up(Point::new(300.0, 300.0), t0);
    assert!(session.graph().is_empty());

    // Stray moves and releases with nothing in flight are no-ops.
    session.pointer_move(Point::new(50.0, 50.0));
    session.pointer_up(Point::new(50.0, 50.0), t0);

    // So are presses on ids that are already gone.
    session.pointer_down(Point::new(110.0, 110.0), header(&a), Modifiers::default(), t0);
    assert!(!session.gesture_active());
}

#[test]
fn a_burst_of_drags_collapses_into_one_history_entry() {
    let mut session = BoardSession::open(MemoryStore::new());
    let t0 = Instant::now();
    let a = session.create_note(Some(Point::new(100.0, 100.0)), t0);
    session.tick(after_debounce(t0));
    assert_eq!(session.history().depth(), 2);

    let mut cursor = Point::new(110.0, 110.0);
    let mut at = t0 + Duration::from_millis(300);
    for _ in 0..3 {
        session.pointer_down(cursor, header(&a), Modifiers::default(), at);
        cursor = cursor.offset(30.0, 20.0);
        session.pointer_move(cursor);
        at += Duration::from_millis(90);
        session.pointer_up(cursor, at);
    }

    // Every release landed inside the previous deadline, so nothing has
    // committed yet.
    assert_eq!(session.history().depth(), 2);
    assert!(session.has_pending_commit());

    session.tick(after_debounce(at));
    assert_eq!(session.history().depth(), 3);
    assert_eq!(position(&session, &a), Point::new(190.0, 160.0));

    assert!(session.undo());
    assert_eq!(position(&session, &a), Point::new(100.0, 100.0));
}

#[test]
fn the_snap_toggle_only_disables_the_grid_fallback() {
    let mut session = BoardSession::open(MemoryStore::new());
    let t0 = Instant::now();
    session.set_snap_enabled(false);
    let a = session.create_note(Some(Point::new(100.0, 100.0)), t0);
    session.tick(after_debounce(t0));

    session.pointer_down(Point::new(110.0, 110.0), header(&a), Modifiers::default(), t0);
    session.pointer_move(Point::new(113.7, 128.2));
    session.pointer_up(Point::new(113.7, 128.2), t0);

    let landed = position(&session, &a);
    assert!((landed.x - 103.7).abs() < 1e-9);
    assert!((landed.y - 118.2).abs() < 1e-9);
}

fn header(id: &NoteId) -> PointerTarget {
    PointerTarget::Note {
        id: id.clone(),
        region: NoteRegion::Header,
    }
}

fn body(id: &NoteId) -> PointerTarget {
    PointerTarget::Note {
        id: id.clone(),
        region: NoteRegion::Body,
    }
}

fn handle(id: &NoteId) -> PointerTarget {
    PointerTarget::Note {
        id: id.clone(),
        region: NoteRegion::ResizeHandle,
    }
}

fn position(session: &BoardSession<MemoryStore>, id: &NoteId) -> Point {
    session.graph().note(id).unwrap().position
}

fn size(session: &BoardSession<MemoryStore>, id: &NoteId) -> Size {
    session.graph().note(id).unwrap().size
}

fn after_debounce(from: Instant) -> Instant {
    from + Duration::from_millis(DEBOUNCE_MS + 1)
}
