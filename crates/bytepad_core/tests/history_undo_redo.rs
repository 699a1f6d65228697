use bytepad_core::history::DEFAULT_MAX_DEPTH;
use bytepad_core::{BoardSnapshot, HistoryManager, Note, NoteGraph, Point};

#[test]
fn undo_returns_to_the_previous_snapshot() {
    let mut graph = NoteGraph::new();
    let mut history = HistoryManager::new();
    history.push(graph.snapshot());

    graph
        .add_note(Note::new_at(Point::new(100.0, 100.0)))
        .unwrap();
    history.push(graph.snapshot());
    assert_eq!(graph.len(), 1);

    assert!(history.undo(|snapshot| graph.apply_snapshot(snapshot)));
    assert!(graph.is_empty());

    assert!(history.redo(|snapshot| graph.apply_snapshot(snapshot)));
    assert_eq!(graph.len(), 1);
}

#[test]
fn pushing_behind_the_tip_destroys_the_redo_branch() {
    let mut history = HistoryManager::new();
    for notes in 0..5 {
        history.push(board_with(notes));
    }
    assert_eq!(history.depth(), 5);

    let mut sink = NoteGraph::new();
    assert!(history.undo(|s| sink.apply_snapshot(s)));
    assert!(history.undo(|s| sink.apply_snapshot(s)));
    assert_eq!(sink.len(), 2);
    assert!(history.can_redo());

    history.push(board_with(9));
    assert!(!history.can_redo());
    assert_eq!(history.depth(), 4);
    assert_eq!(history.peek().unwrap().items.len(), 9);
}

#[test]
fn the_oldest_entries_are_evicted_at_the_depth_cap() {
    let mut history = HistoryManager::with_max_depth(3);
    for notes in 0..5 {
        history.push(board_with(notes));
    }
    assert_eq!(history.depth(), 3);
    assert_eq!(history.max_depth(), 3);

    let mut sink = NoteGraph::new();
    assert!(history.undo(|s| sink.apply_snapshot(s)));
    assert!(history.undo(|s| sink.apply_snapshot(s)));
    // The two oldest captures (empty and one note) were evicted.
    assert_eq!(sink.len(), 2);
    assert!(!history.can_undo());
}

#[test]
fn depth_caps_have_a_floor_of_one() {
    assert_eq!(HistoryManager::new().max_depth(), DEFAULT_MAX_DEPTH);
    assert_eq!(HistoryManager::with_max_depth(0).max_depth(), 1);
}

#[test]
fn peek_is_none_only_before_the_first_push() {
    let mut history = HistoryManager::new();
    assert!(history.peek().is_none());
    assert!(!history.can_undo());
    assert!(!history.can_redo());

    history.push(board_with(1));
    assert_eq!(history.depth(), 1);
    assert_eq!(history.peek().unwrap().items.len(), 1);
    assert!(!history.can_undo());
}

#[test]
fn undo_at_the_oldest_entry_never_invokes_apply() {
    let mut history = HistoryManager::new();
    history.push(board_with(1));

    let mut applied = false;
    assert!(!history.undo(|_| applied = true));
    assert!(!applied);

    assert!(!history.redo(|_| applied = true));
    assert!(!applied);
}

fn board_with(notes: usize) -> BoardSnapshot {
    let mut graph = NoteGraph::new();
    for i in 0..notes {
        graph
            .add_note(Note::new_at(Point::new(40.0 * i as f64, 60.0)))
            .unwrap();
    }
    graph.snapshot()
}
