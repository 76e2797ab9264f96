use serde_json::Value;

use crate::color::Rgb;
use crate::error::IntentError;
use crate::pattern::PatternParams;
use crate::shape::ShapeType;
use crate::state::ToolMode;
use crate::stroke::StrokeType;

/// Tool mode plus the optional sub-type selected with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSelection {
    Stroke(Option<StrokeType>),
    Shape(Option<ShapeType>),
}

impl ToolSelection {
    pub fn mode(self) -> ToolMode {
        match self {
            ToolSelection::Stroke(_) => ToolMode::Stroke,
            ToolSelection::Shape(_) => ToolMode::Shape,
        }
    }
}

/// A request to change tool state or run a canvas operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetPenSize(f32),
    SetPenColor(Rgb),
    SetBrushType(StrokeType),
    SetTool(ToolSelection),
    SetShape(ShapeType),
    SetShapeStrokeSize(f32),
    SetShapeStrokeColor(Rgb),
    SetShapeFillColor(Rgb),
    /// Encoded image bytes (PNG, JPEG, ...) to place at the canvas origin.
    AddPicture(Vec<u8>),
    Clear,
    Undo,
    Redo,
    SketchPattern(PatternParams),
}

impl Intent {
    /// The external message name this intent corresponds to.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SetPenSize(_) => "pen.setSize",
            Intent::SetPenColor(_) => "pen.setColor",
            Intent::SetBrushType(_) => "pen.setBrushType",
            Intent::SetTool(_) => "setTool",
            Intent::SetShape(_) => "shape.setShape",
            Intent::SetShapeStrokeSize(_) => "shape.setStrokeSize",
            Intent::SetShapeStrokeColor(_) => "shape.setStrokeColor",
            Intent::SetShapeFillColor(_) => "shape.setFillColor",
            Intent::AddPicture(_) => "addPicture",
            Intent::Clear => "clear",
            Intent::Undo => "undo",
            Intent::Redo => "redo",
            Intent::SketchPattern(_) => "sketch.pattern",
        }
    }

    /// Parses a named message with a JSON payload.
    ///
    /// A `canvas:` prefix on the name is ignored. Binary payloads (pictures)
    /// are given as an array of byte values.
    pub fn from_message(name: &str, payload: &Value) -> Result<Intent, IntentError> {
        let name = name.strip_prefix("canvas:").unwrap_or(name);
        let intent = match name {
            "pen.setSize" => Intent::SetPenSize(parse_size(payload)?),
            "pen.setColor" => Intent::SetPenColor(parse_color("pen.setColor", payload)?),
            "pen.setBrushType" => Intent::SetBrushType(parse_brush_type(payload)?),
            "setTool" => Intent::SetTool(parse_tool(payload)?),
            "shape.setShape" => {
                let name = expect_str("shape.setShape", payload)?;
                Intent::SetShape(name.parse().map_err(IntentError::InvalidToolType)?)
            }
            "shape.setStrokeSize" => Intent::SetShapeStrokeSize(parse_size(payload)?),
            "shape.setStrokeColor" => {
                Intent::SetShapeStrokeColor(parse_color("shape.setStrokeColor", payload)?)
            }
            "shape.setFillColor" => {
                Intent::SetShapeFillColor(parse_color("shape.setFillColor", payload)?)
            }
            // Image drops arrive under both names
            "addPicture" | "setShape" => Intent::AddPicture(parse_bytes(payload)?),
            "clear" => Intent::Clear,
            "undo" => Intent::Undo,
            "redo" => Intent::Redo,
            "sketch.pattern" => Intent::SketchPattern(parse_pattern(payload)?),
            other => return Err(IntentError::UnknownMessage(other.to_owned())),
        };
        Ok(intent)
    }
}

fn expect_str<'a>(name: &'static str, payload: &'a Value) -> Result<&'a str, IntentError> {
    payload.as_str().ok_or(IntentError::InvalidPayload {
        name,
        expected: "a string",
    })
}

fn parse_size(payload: &Value) -> Result<f32, IntentError> {
    let size = payload.as_f64().ok_or(IntentError::InvalidPayload {
        name: "size",
        expected: "a number",
    })?;
    if !size.is_finite() || size <= 0.0 {
        return Err(IntentError::InvalidSize(size));
    }
    Ok(size as f32)
}

fn parse_color(name: &'static str, payload: &Value) -> Result<Rgb, IntentError> {
    Ok(Rgb::from_hex(expect_str(name, payload)?)?)
}

// Accepts a type name or an index into `StrokeType::ALL`
fn parse_brush_type(payload: &Value) -> Result<StrokeType, IntentError> {
    if let Some(index) = payload.as_u64() {
        return usize::try_from(index)
            .ok()
            .and_then(|i| StrokeType::ALL.get(i).copied())
            .ok_or_else(|| IntentError::InvalidToolType(format!("brush index {index}")));
    }
    expect_str("pen.setBrushType", payload)?
        .parse()
        .map_err(IntentError::InvalidToolType)
}

fn parse_tool(payload: &Value) -> Result<ToolSelection, IntentError> {
    const EXPECTED: IntentError = IntentError::InvalidPayload {
        name: "setTool",
        expected: "{tool, tool_type}",
    };
    let tool = payload.get("tool").and_then(Value::as_str).ok_or(EXPECTED)?;
    let tool_type = match payload.get("tool_type") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.as_str()),
        Some(_) => return Err(EXPECTED),
    };

    let mode: ToolMode = tool.parse().map_err(IntentError::InvalidToolType)?;
    let selection = match mode {
        ToolMode::Stroke => ToolSelection::Stroke(
            tool_type
                .map(str::parse)
                .transpose()
                .map_err(IntentError::InvalidToolType)?,
        ),
        ToolMode::Shape => ToolSelection::Shape(
            tool_type
                .map(str::parse)
                .transpose()
                .map_err(IntentError::InvalidToolType)?,
        ),
    };
    Ok(selection)
}

fn parse_bytes(payload: &Value) -> Result<Vec<u8>, IntentError> {
    const EXPECTED: IntentError = IntentError::InvalidPayload {
        name: "addPicture",
        expected: "an array of bytes",
    };
    payload
        .as_array()
        .ok_or(EXPECTED)?
        .iter()
        .map(|v| v.as_u64().and_then(|b| u8::try_from(b).ok()).ok_or(EXPECTED))
        .collect()
}

fn parse_pattern(payload: &Value) -> Result<PatternParams, IntentError> {
    if payload.is_null() {
        return Ok(PatternParams::default());
    }
    serde_json::from_value(payload.clone()).map_err(|_| IntentError::InvalidPayload {
        name: "sketch.pattern",
        expected: "{seed, fix, zoom, startColour}",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(name: &str, payload: Value) -> Result<Intent, IntentError> {
        Intent::from_message(name, &payload)
    }

    #[test]
    fn test_pen_messages() {
        assert_eq!(parse("pen.setSize", json!(12)).unwrap(), Intent::SetPenSize(12.0));
        assert_eq!(
            parse("canvas:pen.setColor", json!("#ff8000")).unwrap(),
            Intent::SetPenColor(Rgb::new(255, 128, 0))
        );
        assert_eq!(
            parse("pen.setBrushType", json!(2)).unwrap(),
            Intent::SetBrushType(StrokeType::Marker)
        );
        assert_eq!(
            parse("pen.setBrushType", json!("eraser")).unwrap(),
            Intent::SetBrushType(StrokeType::Eraser)
        );
    }

    #[test]
    fn test_shape_messages() {
        assert_eq!(
            parse("shape.setShape", json!("triangle")).unwrap(),
            Intent::SetShape(ShapeType::Triangle)
        );
        assert_eq!(
            parse("shape.setStrokeSize", json!(3.5)).unwrap(),
            Intent::SetShapeStrokeSize(3.5)
        );
        assert_eq!(
            parse("shape.setStrokeColor", json!("#000")).unwrap(),
            Intent::SetShapeStrokeColor(Rgb::BLACK)
        );
        assert_eq!(
            parse("shape.setFillColor", json!("00ff00")).unwrap(),
            Intent::SetShapeFillColor(Rgb::new(0, 255, 0))
        );
    }

    #[test]
    fn test_set_tool() {
        assert_eq!(
            parse("setTool", json!({"tool": "shape", "tool_type": "circle"})).unwrap(),
            Intent::SetTool(ToolSelection::Shape(Some(ShapeType::Circle)))
        );
        assert_eq!(
            parse("setTool", json!({"tool": "stroke", "tool_type": ""})).unwrap(),
            Intent::SetTool(ToolSelection::Stroke(None))
        );
        assert!(parse("setTool", json!({"tool": "stroke", "tool_type": "circle"})).is_err());
        assert!(parse("setTool", json!("shape")).is_err());
    }

    #[test]
    fn test_operations() {
        assert_eq!(parse("clear", Value::Null).unwrap(), Intent::Clear);
        assert_eq!(parse("undo", Value::Null).unwrap(), Intent::Undo);
        assert_eq!(parse("redo", Value::Null).unwrap(), Intent::Redo);
        assert_eq!(
            parse("addPicture", json!([137, 80, 78, 71])).unwrap(),
            Intent::AddPicture(vec![137, 80, 78, 71])
        );
        assert_eq!(
            parse("setShape", json!([1, 2])).unwrap(),
            Intent::AddPicture(vec![1, 2])
        );
        assert_eq!(
            parse("sketch.pattern", Value::Null).unwrap(),
            Intent::SketchPattern(PatternParams::default())
        );
        match parse("sketch.pattern", json!({"seed": 7, "fix": 1.5})).unwrap() {
            Intent::SketchPattern(params) => {
                assert_eq!(params.seed, Some(7));
                assert_eq!(params.fix, Some(1.5));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_invalid_payloads() {
        assert!(matches!(parse("pen.setSize", json!(0)), Err(IntentError::InvalidSize(_))));
        assert!(matches!(parse("pen.setSize", json!(-3)), Err(IntentError::InvalidSize(_))));
        assert!(parse("pen.setSize", json!("big")).is_err());
        assert!(matches!(
            parse("pen.setColor", json!("#12")),
            Err(IntentError::InvalidColor(_))
        ));
        assert!(parse("pen.setBrushType", json!(9)).is_err());
        assert!(parse("addPicture", json!([300])).is_err());
        assert!(parse("sketch.pattern", json!({"seed": "x"})).is_err());
        assert!(matches!(parse("explode", Value::Null), Err(IntentError::UnknownMessage(_))));
    }

    #[test]
    fn test_name_matches_parser() {
        let intents = [
            Intent::SetPenSize(1.0),
            Intent::SetShape(ShapeType::Square),
            Intent::Clear,
            Intent::Undo,
            Intent::Redo,
        ];
        let payloads = [json!(1), json!("square"), Value::Null, Value::Null, Value::Null];
        for (intent, payload) in intents.into_iter().zip(payloads) {
            assert_eq!(Intent::from_message(intent.name(), &payload).unwrap(), intent);
        }
    }
}
