use crate::geometry::Point;
use crate::shape::{Shape, ShapeType};
use crate::surface::DrawSurface;

/// Renders `shape` with its frozen style as a single primitive.
///
/// Negative extents are drawn as given, so dragging up or left mirrors the
/// shape around its start point.
pub fn draw_shape(surface: &mut dyn DrawSurface, shape: &Shape) {
    let (x, y) = (shape.start.x, shape.start.y);
    let (w, h) = shape.extent();

    surface.push();
    surface.set_fill(Some(shape.fill_color.opaque()));
    if shape.stroke_size > 0.0 {
        surface.set_stroke(Some(shape.stroke_color.opaque()));
        surface.set_stroke_weight(shape.stroke_size);
    } else {
        surface.set_stroke(None);
    }

    match shape.shape_type {
        ShapeType::Rectangle => surface.rect(shape.start, w, h),
        ShapeType::Square => {
            let side = w.abs().min(h.abs());
            surface.rect(shape.start, side * w.signum(), side * h.signum());
        }
        ShapeType::Circle => {
            surface.ellipse(Point::new(x + w / 2.0, y + h / 2.0), w.abs(), h.abs());
        }
        ShapeType::Triangle => surface.triangle(
            Point::new(x, y + h),
            Point::new(x + w / 2.0, y),
            Point::new(x + w, y + h),
        ),
    }
    surface.pop();
}
