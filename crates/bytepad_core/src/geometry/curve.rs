//! Connection curve projection and viewport culling.
//!
//! # Responsibility
//! - Build the cubic bezier between two note centers.
//! - Decide which rects are close enough to the viewport to render.
//!
//! # Invariants
//! - Control points sit at the horizontal midpoint, lifted 40px above
//!   their endpoint, giving every link the same arched silhouette.

use super::{Point, Rect};

/// Viewport padding for general note visibility checks.
pub const NOTE_CULL_PAD: f64 = 120.0;

/// Viewport padding for connection endpoints. Tighter than the note pad so
/// off-screen link webs don't dominate redraw time.
pub const CONNECTION_CULL_PAD: f64 = 80.0;

const CONTROL_LIFT: f64 = 40.0;

/// Cubic bezier in board coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub from: Point,
    pub control1: Point,
    pub control2: Point,
    pub to: Point,
}

impl CubicBezier {
    /// SVG path data (`M x,y C ...`) for this curve.
    pub fn svg_path(&self) -> String {
        format!(
            "M {},{} C {},{} {},{} {},{}",
            self.from.x,
            self.from.y,
            self.control1.x,
            self.control1.y,
            self.control2.x,
            self.control2.y,
            self.to.x,
            self.to.y
        )
    }
}

/// Builds the link curve between two note centers.
pub fn link_curve(from: Point, to: Point) -> CubicBezier {
    let mid_x = from.x + (to.x - from.x) / 2.0;
    CubicBezier {
        from,
        control1: Point::new(mid_x, from.y - CONTROL_LIFT),
        control2: Point::new(mid_x, to.y - CONTROL_LIFT),
        to,
    }
}

/// Whether `rect` is within `pad` of the viewport (inclusive).
pub fn rect_in_viewport(rect: &Rect, viewport: &Rect, pad: f64) -> bool {
    rect.intersects(&viewport.expanded(pad))
}
