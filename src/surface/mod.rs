//! The immediate-mode drawing interface everything renders through.
//!
//! Both canvas layers and the recording surface used by tests implement
//! [`DrawSurface`], so renderers and the pattern generator never need to
//! know what they are drawing onto.

use image::{Rgba, RgbaImage};

use crate::geometry::Point;

mod raster;
mod recording;

pub use raster::RasterLayer;
pub(crate) use raster::blend_over;
pub use recording::{DrawCall, RecordingSurface};

/// Fully transparent pixel, used to reset overlay layers.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A 2D immediate-mode canvas in the style of p5/processing.
///
/// Fill and stroke color, stroke weight and the current transform form the
/// drawing state. `push` saves it and `pop` restores the last saved state.
/// A `None` fill or stroke disables that part of the primitive.
pub trait DrawSurface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Replaces every pixel with `color`, without blending.
    fn clear(&mut self, color: Rgba<u8>);

    fn set_fill(&mut self, color: Option<Rgba<u8>>);

    fn set_stroke(&mut self, color: Option<Rgba<u8>>);

    fn set_stroke_weight(&mut self, weight: f32);

    fn push(&mut self);

    fn pop(&mut self);

    fn translate(&mut self, dx: f32, dy: f32);

    /// Rotates subsequent drawing by `angle` radians (clockwise on screen).
    fn rotate(&mut self, angle: f32);

    fn line(&mut self, from: Point, to: Point);

    /// Ellipse centered on `center`, with the given full width and height.
    fn ellipse(&mut self, center: Point, width: f32, height: f32);

    fn circle(&mut self, center: Point, diameter: f32) {
        self.ellipse(center, diameter, diameter);
    }

    /// Rectangle from `origin` spanning `width` x `height`. Negative extents
    /// draw towards the left or up.
    fn rect(&mut self, origin: Point, width: f32, height: f32);

    fn triangle(&mut self, a: Point, b: Point, c: Point);

    /// Draws `image` with its top-left corner at `origin`.
    fn image(&mut self, image: &RgbaImage, origin: Point);
}
