use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::geometry::Point;
use crate::shape::{MutableShape, Shape, ShapeType};
use crate::stroke::{MutableStroke, StrokeType};

/// Which kind of action a pointer-down starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    #[default]
    Stroke,
    Shape,
}

impl std::str::FromStr for ToolMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stroke" | "pen" => Ok(ToolMode::Stroke),
            "shape" => Ok(ToolMode::Shape),
            _ => Err(format!("unknown tool {s:?}")),
        }
    }
}

/// The current tool and style settings, changed only by intents.
///
/// Every stroke or shape copies the settings it needs when it starts, so
/// later changes never affect committed work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolConfig {
    pub mode: ToolMode,
    pub stroke_type: StrokeType,
    pub shape_type: ShapeType,
    pub pen_size: f32,
    pub pen_color: Rgb,
    pub shape_stroke_size: f32,
    pub shape_stroke_color: Rgb,
    pub shape_fill_color: Rgb,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            mode: ToolMode::Stroke,
            stroke_type: StrokeType::Pencil,
            shape_type: ShapeType::Rectangle,
            pen_size: 1.0,
            pen_color: Rgb::BLACK,
            shape_stroke_size: 2.0,
            shape_stroke_color: Rgb::BLACK,
            shape_fill_color: Rgb::WHITE,
        }
    }
}

impl ToolConfig {
    pub fn begin_stroke(&self) -> MutableStroke {
        MutableStroke::new(self.stroke_type, self.pen_size, self.pen_color)
    }

    pub fn begin_shape(&self, start: Point) -> MutableShape {
        MutableShape::new(Shape::new(
            self.shape_type,
            self.shape_stroke_size,
            self.shape_stroke_color,
            self.shape_fill_color,
            start,
        ))
    }
}

/// Canvas dimensions and storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: Rgb,
    pub storage_key: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            background: Rgb::WHITE,
            storage_key: "draw-history".to_owned(),
        }
    }
}

impl CanvasConfig {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn background_rgba(&self) -> Rgba<u8> {
        self.background.opaque()
    }

    /// Whether `point` lies on the canvas.
    pub fn contains(&self, point: Point) -> bool {
        point.is_finite()
            && point.x >= 0.0
            && point.y >= 0.0
            && point.x < self.width as f32
            && point.y < self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_config_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.mode, ToolMode::Stroke);
        assert_eq!(config.stroke_type, StrokeType::Pencil);
        assert_eq!(config.shape_type, ShapeType::Rectangle);
        assert_eq!(config.pen_size, 1.0);
        assert_eq!(config.shape_stroke_size, 2.0);
        assert_eq!(config.shape_fill_color, Rgb::WHITE);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: ToolConfig = serde_json::from_str(r#"{"mode":"shape","penSize":5}"#).unwrap();
        assert_eq!(config.mode, ToolMode::Shape);
        assert_eq!(config.pen_size, 5.0);
        assert_eq!(config.pen_color, Rgb::BLACK);

        let canvas: CanvasConfig = serde_json::from_str(r#"{"width":300}"#).unwrap();
        assert_eq!(canvas.width, 300);
        assert_eq!(canvas.height, 768);
        assert_eq!(canvas.storage_key, "draw-history");
    }

    #[test]
    fn test_contains_is_half_open() {
        let canvas = CanvasConfig::with_size(100, 50);
        assert!(canvas.contains(Point::new(0.0, 0.0)));
        assert!(canvas.contains(Point::new(99.5, 49.9)));
        assert!(!canvas.contains(Point::new(100.0, 10.0)));
        assert!(!canvas.contains(Point::new(-0.1, 10.0)));
    }

    #[test]
    fn test_style_is_snapshotted() {
        let mut config = ToolConfig {
            pen_size: 4.0,
            ..ToolConfig::default()
        };
        let stroke = config.begin_stroke();
        config.pen_size = 9.0;
        assert_eq!(stroke.pen_size(), 4.0);
    }
}
