use serde::{Deserialize, Serialize};

mod sampling;

pub use sampling::{
    MAX_SEGMENT_SAMPLES, MIN_SAMPLE_SPACING, RETAIN_THRESHOLD_SQ, Sample, resample,
    sample_spacing, should_retain,
};

/// Largest coordinate magnitude a stored action may use: four times the
/// largest texture side egui hands out.
pub const MAX_COORDINATE: f32 = 65_536.0;

/// A position on the canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Finite and no further than [`MAX_COORDINATE`] from the origin on either axis.
    pub fn is_within_limits(self) -> bool {
        self.x.abs() <= MAX_COORDINATE && self.y.abs() <= MAX_COORDINATE
    }
}

impl From<egui::Pos2> for Point {
    fn from(pos: egui::Pos2) -> Self {
        Self::new(pos.x, pos.y)
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// Distance from `point` to the segment `a`-`b`.
pub(crate) fn distance_to_segment(point: Point, a: Point, b: Point) -> f32 {
    let seg_x = b.x - a.x;
    let seg_y = b.y - a.y;
    let len_sq = seg_x * seg_x + seg_y * seg_y;
    if len_sq == 0.0 {
        return point.distance(a);
    }

    let t = (((point.x - a.x) * seg_x + (point.y - a.y) * seg_y) / len_sq).clamp(0.0, 1.0);
    point.distance(a.lerp(b, t))
}

/// Axis-aligned bounds of a set of points as `(min, max)`, grown by `padding`.
pub(crate) fn calculate_bounds(points: &[Point], padding: f32) -> Option<(Point, Point)> {
    let first = points.first()?;
    let (mut min, mut max) = (*first, *first);
    for point in &points[1..] {
        min.x = min.x.min(point.x);
        min.y = min.y.min(point.y);
        max.x = max.x.max(point.x);
        max.y = max.y.max(point.y);
    }

    Some((
        Point::new(min.x - padding, min.y - padding),
        Point::new(max.x + padding, max.y + padding),
    ))
}
