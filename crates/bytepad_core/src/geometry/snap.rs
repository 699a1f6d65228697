//! Snap resolution for note dragging.
//!
//! # Responsibility
//! - Resolve a proposed note position against sibling edges and the grid.
//! - Report which alignment guides a renderer should draw.
//!
//! # Invariants
//! - Axes are independent: a sibling match on x never affects y.
//! - A sibling match overrides grid rounding for that axis; the grid is a
//!   fallback, not a second pass.
//! - Guides are emitted only for sibling matches, never for grid rounding.

use super::{Point, Rect, Size};

/// Default grid cell size in board pixels.
pub const GRID_SPACING: f64 = 10.0;

/// Default magnet distance for sibling-edge matches, in board pixels.
pub const SNAP_TOLERANCE: f64 = 6.0;

/// Tuning for one [`compute_snap`] call.
#[derive(Debug, Clone, Copy)]
pub struct SnapOptions {
    pub grid: f64,
    pub tolerance: f64,
    /// Grid fallback toggle. Sibling-edge matching is always on; this only
    /// controls the rounding applied when no sibling is close enough.
    pub grid_enabled: bool,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            grid: GRID_SPACING,
            tolerance: SNAP_TOLERANCE,
            grid_enabled: true,
        }
    }
}

/// Alignment guide lines for the renderer: at most one vertical (an x
/// coordinate) and one horizontal (a y coordinate).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GuideLines {
    pub vertical: Option<f64>,
    pub horizontal: Option<f64>,
}

impl GuideLines {
    pub fn any(&self) -> bool {
        self.vertical.is_some() || self.horizontal.is_some()
    }
}

/// Outcome of snap resolution: the adjusted position plus guide lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub position: Point,
    pub guides: GuideLines,
}

/// Rounds a coordinate to the nearest grid line.
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    (value / grid).round() * grid
}

struct AxisSnap {
    value: f64,
    guide: f64,
}

fn nearest_edge(value: f64, edges: &[f64]) -> Option<(f64, f64)> {
    let mut best: Option<(f64, f64)> = None;
    for &edge in edges {
        let dist = (edge - value).abs();
        match best {
            Some((_, best_dist)) if best_dist <= dist => {}
            _ => best = Some((edge, dist)),
        }
    }
    best
}

/// Tries the moving note's leading edge, center, and trailing edge against
/// the sibling edge set, in that priority order. The first candidate whose
/// nearest edge falls within tolerance wins the axis.
fn snap_axis(leading: f64, extent: f64, edges: &[f64], tolerance: f64) -> Option<AxisSnap> {
    let candidates = [
        (leading, 0.0),
        (leading + extent / 2.0, extent / 2.0),
        (leading + extent, extent),
    ];
    for (probe, offset) in candidates {
        if let Some((edge, dist)) = nearest_edge(probe, edges) {
            if dist <= tolerance {
                return Some(AxisSnap {
                    value: edge - offset,
                    guide: edge,
                });
            }
        }
    }
    None
}

/// Resolves a proposed position for a note of `size` against `siblings`.
///
/// Sibling candidate lines are each sibling's leading edge, center, and
/// trailing edge on both axes. When no sibling line is within tolerance and
/// the grid is enabled, the coordinate rounds to the grid instead (without
/// a guide).
pub fn compute_snap(
    proposed: Point,
    size: Size,
    siblings: &[Rect],
    options: SnapOptions,
) -> SnapResult {
    let mut edges_x = Vec::with_capacity(siblings.len() * 3);
    let mut edges_y = Vec::with_capacity(siblings.len() * 3);
    for rect in siblings {
        edges_x.push(rect.left());
        edges_x.push(rect.center().x);
        edges_x.push(rect.right());
        edges_y.push(rect.top());
        edges_y.push(rect.center().y);
        edges_y.push(rect.bottom());
    }

    let mut position = proposed;
    let mut guides = GuideLines::default();

    match snap_axis(proposed.x, size.w, &edges_x, options.tolerance) {
        Some(snap) => {
            position.x = snap.value;
            guides.vertical = Some(snap.guide);
        }
        None if options.grid_enabled => position.x = snap_to_grid(proposed.x, options.grid),
        None => {}
    }

    match snap_axis(proposed.y, size.h, &edges_y, options.tolerance) {
        Some(snap) => {
            position.y = snap.value;
            guides.horizontal = Some(snap.guide);
        }
        None if options.grid_enabled => position.y = snap_to_grid(proposed.y, options.grid),
        None => {}
    }

    SnapResult { position, guides }
}
