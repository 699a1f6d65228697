use bytepad_core::geometry::{snap_to_grid, GRID_SPACING};
use bytepad_core::{compute_snap, Point, Rect, Size, SnapOptions};

#[test]
fn grid_rounds_the_position_when_no_sibling_is_near() {
    let result = compute_snap(
        Point::new(203.0, 118.0),
        Size::new(220.0, 170.0),
        &[],
        SnapOptions::default(),
    );
    assert_eq!(result.position, Point::new(200.0, 120.0));
    assert!(!result.guides.any());
}

#[test]
fn sibling_edges_win_over_the_grid_and_surface_a_guide() {
    // The sibling sits off-grid at x 97; the dragged note must land on 97
    // exactly, not on the grid line at 100.
    let sibling = Rect::from_parts(97.0, 400.0, 220.0, 170.0);
    let result = compute_snap(
        Point::new(95.0, 100.0),
        Size::new(220.0, 170.0),
        &[sibling],
        SnapOptions::default(),
    );
    assert_eq!(result.position, Point::new(97.0, 100.0));
    assert_eq!(result.guides.vertical, Some(97.0));
    assert_eq!(result.guides.horizontal, None);
}

#[test]
fn the_leading_edge_outranks_center_and_trailing_candidates() {
    // Leading (98) and trailing (298) are both 2 px from a sibling line;
    // the leading candidate is tried first and decides the axis.
    let sibling = Rect::from_parts(100.0, 500.0, 200.0, 100.0);
    let result = compute_snap(
        Point::new(98.0, 500.0),
        Size::new(200.0, 100.0),
        &[sibling],
        SnapOptions::default(),
    );
    assert_eq!(result.position.x, 100.0);
    assert_eq!(result.guides.vertical, Some(100.0));
}

#[test]
fn center_alignment_snaps_the_midline() {
    // Sibling center line at x 200; the note's center (148 + 50 = 198)
    // falls within tolerance of it.
    let sibling = Rect::from_parts(100.0, 600.0, 200.0, 100.0);
    let result = compute_snap(
        Point::new(148.0, 100.0),
        Size::new(100.0, 100.0),
        &[sibling],
        SnapOptions::default(),
    );
    assert_eq!(result.position.x, 150.0);
    assert_eq!(result.guides.vertical, Some(200.0));
}

#[test]
fn axes_snap_independently() {
    let sibling = Rect::from_parts(95.0, 200.0, 220.0, 170.0);
    let result = compute_snap(
        Point::new(97.0, 203.0),
        Size::new(220.0, 170.0),
        &[sibling],
        SnapOptions::default(),
    );
    assert_eq!(result.position, Point::new(95.0, 200.0));
    assert_eq!(result.guides.vertical, Some(95.0));
    assert_eq!(result.guides.horizontal, Some(200.0));
    assert!(result.guides.any());
}

#[test]
fn matches_beyond_the_tolerance_fall_back_to_the_grid() {
    // Every sibling line is 7 px from its nearest candidate, one past the
    // tolerance, so x rounds to the grid without a guide.
    let sibling = Rect::from_parts(110.0, 600.0, 200.0, 100.0);
    let result = compute_snap(
        Point::new(103.0, 600.0),
        Size::new(200.0, 100.0),
        &[sibling],
        SnapOptions::default(),
    );
    assert_eq!(result.position.x, 100.0);
    assert_eq!(result.guides.vertical, None);
}

#[test]
fn disabling_the_grid_leaves_free_axes_exact() {
    let options = SnapOptions {
        grid_enabled: false,
        ..SnapOptions::default()
    };
    let free = compute_snap(
        Point::new(203.7, 118.2),
        Size::new(220.0, 170.0),
        &[],
        options,
    );
    assert_eq!(free.position, Point::new(203.7, 118.2));
    assert!(!free.guides.any());

    // Sibling magnetism still applies with the grid off.
    let sibling = Rect::from_parts(200.0, 600.0, 220.0, 170.0);
    let snapped = compute_snap(
        Point::new(203.7, 118.2),
        Size::new(220.0, 170.0),
        &[sibling],
        options,
    );
    assert_eq!(snapped.position.x, 200.0);
    assert_eq!(snapped.position.y, 118.2);
    assert_eq!(snapped.guides.vertical, Some(200.0));
    assert_eq!(snapped.guides.horizontal, None);
}

#[test]
fn snap_to_grid_rounds_to_the_nearest_line() {
    assert_eq!(snap_to_grid(203.0, GRID_SPACING), 200.0);
    assert_eq!(snap_to_grid(118.0, GRID_SPACING), 120.0);
    assert_eq!(snap_to_grid(15.0, GRID_SPACING), 20.0);
    assert_eq!(snap_to_grid(-13.0, GRID_SPACING), -10.0);
}
