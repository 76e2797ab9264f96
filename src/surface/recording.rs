use image::{Rgba, RgbaImage};

use super::DrawSurface;
use crate::geometry::Point;

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Rgba<u8>),
    SetFill(Option<Rgba<u8>>),
    SetStroke(Option<Rgba<u8>>),
    SetStrokeWeight(f32),
    Push,
    Pop,
    Translate(f32, f32),
    Rotate(f32),
    Line(Point, Point),
    Ellipse { center: Point, width: f32, height: f32 },
    Rect { origin: Point, width: f32, height: f32 },
    Triangle(Point, Point, Point),
    Image { size: (u32, u32), origin: Point },
}

impl DrawCall {
    /// Whether the call puts pixels down, as opposed to changing state.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            DrawCall::Line(..)
                | DrawCall::Ellipse { .. }
                | DrawCall::Rect { .. }
                | DrawCall::Triangle(..)
                | DrawCall::Image { .. }
        )
    }
}

/// A surface that records calls instead of drawing them.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// The calls that put pixels down, in order.
    pub fn primitives(&self) -> Vec<&DrawCall> {
        self.calls.iter().filter(|call| call.is_primitive()).collect()
    }

    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: Rgba<u8>) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn set_fill(&mut self, color: Option<Rgba<u8>>) {
        self.calls.push(DrawCall::SetFill(color));
    }

    fn set_stroke(&mut self, color: Option<Rgba<u8>>) {
        self.calls.push(DrawCall::SetStroke(color));
    }

    fn set_stroke_weight(&mut self, weight: f32) {
        self.calls.push(DrawCall::SetStrokeWeight(weight));
    }

    fn push(&mut self) {
        self.calls.push(DrawCall::Push);
    }

    fn pop(&mut self) {
        self.calls.push(DrawCall::Pop);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.calls.push(DrawCall::Translate(dx, dy));
    }

    fn rotate(&mut self, angle: f32) {
        self.calls.push(DrawCall::Rotate(angle));
    }

    fn line(&mut self, from: Point, to: Point) {
        self.calls.push(DrawCall::Line(from, to));
    }

    fn ellipse(&mut self, center: Point, width: f32, height: f32) {
        self.calls.push(DrawCall::Ellipse {
            center,
            width,
            height,
        });
    }

    fn rect(&mut self, origin: Point, width: f32, height: f32) {
        self.calls.push(DrawCall::Rect {
            origin,
            width,
            height,
        });
    }

    fn triangle(&mut self, a: Point, b: Point, c: Point) {
        self.calls.push(DrawCall::Triangle(a, b, c));
    }

    fn image(&mut self, image: &RgbaImage, origin: Point) {
        self.calls.push(DrawCall::Image {
            size: image.dimensions(),
            origin,
        });
    }
}
