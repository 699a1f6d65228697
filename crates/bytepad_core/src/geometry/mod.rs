//! Board-space geometry primitives.
//!
//! # Responsibility
//! - Provide the point/size/rect math every other module builds on.
//! - Stay pure: no logging, no I/O, no knowledge of notes or sessions.
//!
//! # Invariants
//! - All coordinates are board pixels as `f64`, origin at the top-left.
//! - Rect intersection is inclusive: touching edges count as overlap.
//!
//! # See also
//! - `crate::geometry::snap` for snap resolution and alignment guides.
//! - `crate::geometry::curve` for connection curve projection.

pub mod curve;
pub mod snap;

pub use curve::{link_curve, rect_in_viewport, CubicBezier, CONNECTION_CULL_PAD, NOTE_CULL_PAD};
pub use snap::{
    compute_snap, snap_to_grid, GuideLines, SnapOptions, SnapResult, GRID_SPACING, SNAP_TOLERANCE,
};

use serde::{Deserialize, Serialize};

/// A position in board coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point translated by the given deltas.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Width and height of a note or viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Component-wise lower bound against `floor`.
    pub fn clamped_to(self, floor: Size) -> Self {
        Self {
            w: self.w.max(floor.w),
            h: self.h.max(floor.h),
        }
    }
}

/// Axis-aligned rectangle in board coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn from_parts(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            w: size.w,
            h: size.h,
        }
    }

    /// Normalized rect spanning two arbitrary corner points. Used for the
    /// lasso marquee, where the drag can go in any direction.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            w: (a.x - b.x).abs(),
            h: (a.y - b.y).abs(),
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Inclusive overlap test: rects that merely touch still intersect.
    /// Lasso selection relies on this so a marquee grazing a note's edge
    /// picks it up.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// Rect grown by `pad` on every side. Negative pads shrink.
    pub fn expanded(&self, pad: f64) -> Rect {
        Rect {
            x: self.x - pad,
            y: self.y - pad,
            w: self.w + pad * 2.0,
            h: self.h + pad * 2.0,
        }
    }
}
