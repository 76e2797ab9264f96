use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::Rgb;
use crate::geometry::{MAX_COORDINATE, Point};

/// The kind of bounding-box shape to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    #[default]
    #[serde(alias = "rect")]
    Rectangle,
    Square,
    Circle,
    Triangle,
}

impl ShapeType {
    pub const ALL: [ShapeType; 4] = [
        ShapeType::Rectangle,
        ShapeType::Square,
        ShapeType::Circle,
        ShapeType::Triangle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Square => "square",
            ShapeType::Circle => "circle",
            ShapeType::Triangle => "triangle",
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("rect") {
            return Ok(ShapeType::Rectangle);
        }
        ShapeType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown shape type {s:?}"))
    }
}

/// A shape defined by the box between `start` and `end`, with its style frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    #[serde(rename = "type")]
    pub shape_type: ShapeType,
    pub stroke_size: f32,
    pub stroke_color: Rgb,
    pub fill_color: Rgb,
    pub start: Point,
    pub end: Point,
}

impl Shape {
    /// Starts a shape at `start`; the box is empty until `end` moves.
    pub fn new(
        shape_type: ShapeType,
        stroke_size: f32,
        stroke_color: Rgb,
        fill_color: Rgb,
        start: Point,
    ) -> Self {
        Self {
            shape_type,
            stroke_size,
            stroke_color,
            fill_color,
            start,
            end: start,
        }
    }

    /// Signed box extents `(w, h)` from `start` to `end`.
    pub fn extent(&self) -> (f32, f32) {
        (self.end.x - self.start.x, self.end.y - self.start.y)
    }

    /// A box with no width or no height has nothing to draw.
    pub fn is_degenerate(&self) -> bool {
        let (w, h) = self.extent();
        w == 0.0 || h == 0.0
    }

    pub fn is_valid(&self) -> bool {
        (0.0..=MAX_COORDINATE).contains(&self.stroke_size)
            && self.start.is_within_limits()
            && self.end.is_within_limits()
            && !self.is_degenerate()
    }
}

// Shape being dragged out
#[derive(Debug, Clone)]
pub struct MutableShape {
    shape: Shape,
}

impl MutableShape {
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }

    pub fn set_end(&mut self, end: Point) {
        if end.is_finite() {
            self.shape.end = end;
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Freezes the shape, or `None` if its box is empty.
    pub fn finish(self) -> Option<Shape> {
        if self.shape.is_degenerate() {
            log::debug!("Dropping degenerate {} at {:?}", self.shape.shape_type, self.shape.start);
            return None;
        }
        Some(self.shape)
    }
}
