use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::Rgb;
use crate::geometry::{MAX_COORDINATE, Point, should_retain};

/// The rendering style of a freehand stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeType {
    #[default]
    Pencil,
    Brush,
    Marker,
    Eraser,
}

impl StrokeType {
    pub const ALL: [StrokeType; 4] = [
        StrokeType::Pencil,
        StrokeType::Brush,
        StrokeType::Marker,
        StrokeType::Eraser,
    ];

    /// Dense sample spacing as a fraction of the pen size.
    pub fn spacing_factor(self) -> f32 {
        match self {
            StrokeType::Pencil => 0.25,
            StrokeType::Brush => 0.2,
            StrokeType::Marker => 0.15,
            StrokeType::Eraser => 0.3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StrokeType::Pencil => "pencil",
            StrokeType::Brush => "brush",
            StrokeType::Marker => "marker",
            StrokeType::Eraser => "eraser",
        }
    }
}

impl fmt::Display for StrokeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrokeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrokeType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown stroke type {s:?}"))
    }
}

// Immutable stroke, as committed to history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    stroke_type: StrokeType,
    pen_size: f32,
    color: Rgb,
    points: Vec<Point>,
}

impl Stroke {
    pub fn new(stroke_type: StrokeType, pen_size: f32, color: Rgb, points: Vec<Point>) -> Self {
        Self {
            stroke_type,
            pen_size,
            color,
            points,
        }
    }

    pub fn stroke_type(&self) -> StrokeType {
        self.stroke_type
    }

    pub fn pen_size(&self) -> f32 {
        self.pen_size
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// A stroke needs at least two points to be drawn.
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Whether the stroke could have come out of [`MutableStroke::finish`]: a
    /// positive pen size, at least two points, every coordinate within limits.
    pub fn is_valid(&self) -> bool {
        self.pen_size > 0.0
            && self.pen_size <= MAX_COORDINATE
            && self.is_renderable()
            && self.points.iter().all(|p| p.is_within_limits())
    }
}

// Stroke being drawn; points are filtered through the retain policy
#[derive(Debug, Clone)]
pub struct MutableStroke {
    stroke_type: StrokeType,
    pen_size: f32,
    color: Rgb,
    points: Vec<Point>,
}

impl MutableStroke {
    /// Starts a stroke with a style frozen at creation time.
    pub fn new(stroke_type: StrokeType, pen_size: f32, color: Rgb) -> Self {
        Self {
            stroke_type,
            pen_size,
            color,
            points: Vec::new(),
        }
    }

    /// Adds `point` if it moved far enough from the last stored point.
    /// Returns whether the point was stored.
    pub fn add_point(&mut self, point: Point) -> bool {
        if !point.is_finite() || !should_retain(self.points.last().copied(), point) {
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn stroke_type(&self) -> StrokeType {
        self.stroke_type
    }

    pub fn pen_size(&self) -> f32 {
        self.pen_size
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    // Snapshot for preview rendering
    pub fn to_stroke(&self) -> Stroke {
        Stroke::new(self.stroke_type, self.pen_size, self.color, self.points.clone())
    }

    /// Freezes the stroke, or `None` if it has too few points to keep.
    pub fn finish(self) -> Option<Stroke> {
        if self.points.len() < 2 {
            log::debug!("Dropping {} stroke with {} point(s)", self.stroke_type, self.points.len());
            return None;
        }
        Some(Stroke::new(self.stroke_type, self.pen_size, self.color, self.points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_point_applies_retain_policy() {
        let mut stroke = MutableStroke::new(StrokeType::Pencil, 2.0, Rgb::BLACK);
        assert!(stroke.add_point(Point::new(10.0, 10.0)));
        assert!(!stroke.add_point(Point::new(10.0, 14.0)));
        assert!(stroke.add_point(Point::new(20.0, 10.0)));
        assert!(!stroke.add_point(Point::new(f32::NAN, 0.0)));
        assert_eq!(stroke.points(), &[Point::new(10.0, 10.0), Point::new(20.0, 10.0)]);
    }

    #[test]
    fn test_finish_rejects_degenerate() {
        let empty = MutableStroke::new(StrokeType::Brush, 4.0, Rgb::BLACK);
        assert!(empty.finish().is_none());

        let mut single = MutableStroke::new(StrokeType::Brush, 4.0, Rgb::BLACK);
        single.add_point(Point::new(1.0, 1.0));
        assert!(single.finish().is_none());
    }

    #[test]
    fn test_finish_freezes_style() {
        let mut stroke = MutableStroke::new(StrokeType::Marker, 6.0, Rgb::new(10, 20, 30));
        stroke.add_point(Point::new(0.0, 0.0));
        stroke.add_point(Point::new(30.0, 0.0));

        let frozen = stroke.finish().unwrap();
        assert_eq!(frozen.stroke_type(), StrokeType::Marker);
        assert_eq!(frozen.pen_size(), 6.0);
        assert_eq!(frozen.color(), Rgb::new(10, 20, 30));
        assert!(frozen.is_renderable());
    }

    #[test]
    fn test_validity_matches_what_finish_produces() {
        let line = |points: Vec<Point>| Stroke::new(StrokeType::Pencil, 2.0, Rgb::BLACK, points);

        assert!(line(vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)]).is_valid());
        assert!(!line(vec![]).is_valid());
        assert!(!line(vec![Point::new(1.0, 1.0)]).is_valid());
        assert!(!line(vec![Point::new(0.0, 0.0), Point::new(1e30, 0.0)]).is_valid());
        assert!(!line(vec![Point::new(0.0, 0.0), Point::new(f32::NAN, 0.0)]).is_valid());

        let points = vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)];
        assert!(!Stroke::new(StrokeType::Brush, 0.0, Rgb::BLACK, points.clone()).is_valid());
        assert!(!Stroke::new(StrokeType::Brush, f32::INFINITY, Rgb::BLACK, points).is_valid());
    }

    #[test]
    fn test_stroke_type_names() {
        for stroke_type in StrokeType::ALL {
            assert_eq!(stroke_type.name().parse::<StrokeType>(), Ok(stroke_type));
        }
        assert_eq!("Brush".parse::<StrokeType>(), Ok(StrokeType::Brush));
        assert!("crayon".parse::<StrokeType>().is_err());
    }

    #[test]
    fn test_json_field_names() {
        let stroke = Stroke::new(
            StrokeType::Eraser,
            3.0,
            Rgb::WHITE,
            vec![Point::new(1.0, 2.0), Point::new(9.0, 2.0)],
        );
        let json = serde_json::to_value(&stroke).unwrap();
        assert_eq!(json["strokeType"], "eraser");
        assert_eq!(json["penSize"], 3.0);
        assert_eq!(json["color"], serde_json::json!([255, 255, 255]));
        assert_eq!(json["points"][1]["x"], 9.0);
    }
}
