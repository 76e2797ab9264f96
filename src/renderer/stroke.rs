//! Freehand stroke rendering.
//!
//! Every style stamps a primitive at each dense sample produced by
//! [`resample`]. The output depends only on the stroke itself.

use std::f32::consts::PI;

use crate::color::Rgb;
use crate::geometry::{Point, Sample, resample, sample_spacing};
use crate::stroke::{Stroke, StrokeType};
use crate::surface::DrawSurface;

const PENCIL_ALPHA: u8 = 110;
const PENCIL_DIAMETER: f32 = 0.85;

const BRUSH_ASPECT: f32 = 0.6;
const BRUSH_SHOULDER_SCALE: f32 = 1.15;
const BRUSH_SHOULDER_ALPHA: u8 = 179;

const MARKER_ALPHA: u8 = 230;
const MARKER_WIDTH: f32 = 1.4;
const MARKER_HEIGHT: f32 = 0.55;
const MARKER_NIB_ANGLE: f32 = -PI / 6.0;

const ERASER_DIAMETER: f32 = 1.6;

/// Renders `stroke` onto `surface`. Strokes with fewer than two points draw nothing.
pub fn draw_stroke(surface: &mut dyn DrawSurface, stroke: &Stroke) {
    if !stroke.is_renderable() {
        return;
    }

    let spacing = sample_spacing(stroke.pen_size(), stroke.stroke_type().spacing_factor());
    let samples = resample(stroke.points(), spacing);

    surface.push();
    surface.set_stroke(None);
    match stroke.stroke_type() {
        StrokeType::Pencil => draw_pencil(surface, &samples, stroke.pen_size(), stroke.color()),
        StrokeType::Brush => draw_brush(surface, &samples, stroke.pen_size(), stroke.color()),
        StrokeType::Marker => draw_marker(surface, &samples, stroke.pen_size(), stroke.color()),
        StrokeType::Eraser => draw_eraser(surface, &samples, stroke.pen_size()),
    }
    surface.pop();
}

// Translucent dots that build up where the path overlaps itself
fn draw_pencil(surface: &mut dyn DrawSurface, samples: &[Sample], pen_size: f32, color: Rgb) {
    surface.set_fill(Some(color.with_alpha(PENCIL_ALPHA)));
    let diameter = pen_size * PENCIL_DIAMETER;
    for sample in samples {
        surface.circle(sample.pos, diameter);
    }
}

fn draw_brush(surface: &mut dyn DrawSurface, samples: &[Sample], pen_size: f32, color: Rgb) {
    let core = (pen_size, pen_size * BRUSH_ASPECT);
    let shoulder = (core.0 * BRUSH_SHOULDER_SCALE, core.1 * BRUSH_SHOULDER_SCALE);
    let origin = Point::new(0.0, 0.0);

    for sample in samples {
        surface.push();
        surface.translate(sample.pos.x, sample.pos.y);
        surface.rotate(sample.angle);
        surface.set_fill(Some(color.with_alpha(BRUSH_SHOULDER_ALPHA)));
        surface.ellipse(origin, shoulder.0, shoulder.1);
        surface.set_fill(Some(color.opaque()));
        surface.ellipse(origin, core.0, core.1);
        surface.pop();
    }
}

fn draw_marker(surface: &mut dyn DrawSurface, samples: &[Sample], pen_size: f32, color: Rgb) {
    surface.set_fill(Some(color.with_alpha(MARKER_ALPHA)));
    let (width, height) = (pen_size * MARKER_WIDTH, pen_size * MARKER_HEIGHT);
    let origin = Point::new(0.0, 0.0);

    for sample in samples {
        surface.push();
        surface.translate(sample.pos.x, sample.pos.y);
        surface.rotate(MARKER_NIB_ANGLE);
        surface.ellipse(origin, width, height);
        surface.pop();
    }
}

// Overpaints with the background color; layers have no erase-to-alpha
fn draw_eraser(surface: &mut dyn DrawSurface, samples: &[Sample], pen_size: f32) {
    surface.set_fill(Some(Rgb::WHITE.opaque()));
    let diameter = pen_size * ERASER_DIAMETER;
    for sample in samples {
        surface.circle(sample.pos, diameter);
    }
}
