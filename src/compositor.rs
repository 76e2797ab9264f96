use image::{Rgba, RgbaImage};

use crate::surface::{DrawSurface, RasterLayer, TRANSPARENT, blend_over};

/// The two canvas layers and the frame composed from them.
///
/// `permanent` holds finalized work and only changes when something is
/// committed, undone or cleared. `preview` is wiped every frame and holds
/// the action in flight.
#[derive(Debug, Clone)]
pub struct Compositor {
    permanent: RasterLayer,
    preview: RasterLayer,
    output: RgbaImage,
    background: Rgba<u8>,
}

impl Compositor {
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            permanent: RasterLayer::new(width, height, background),
            preview: RasterLayer::new(width, height, TRANSPARENT),
            output: RgbaImage::from_pixel(width, height, background),
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.output.width()
    }

    pub fn height(&self) -> u32 {
        self.output.height()
    }

    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    pub fn permanent(&self) -> &RasterLayer {
        &self.permanent
    }

    pub fn permanent_mut(&mut self) -> &mut RasterLayer {
        &mut self.permanent
    }

    pub fn preview(&self) -> &RasterLayer {
        &self.preview
    }

    /// Wipes the preview layer and hands it out for this frame's drawing.
    pub fn begin_frame(&mut self) -> &mut RasterLayer {
        self.preview.reset_style();
        self.preview.clear(TRANSPARENT);
        &mut self.preview
    }

    /// Clears the permanent layer back to the background color.
    pub fn reset_permanent(&mut self) {
        self.permanent.reset_style();
        self.permanent.clear(self.background);
    }

    /// Composes preview over permanent into the output frame.
    pub fn composite(&mut self) -> &RgbaImage {
        self.output.clone_from(self.permanent.pixels());
        for (out, top) in self.output.pixels_mut().zip(self.preview.pixels().pixels()) {
            *out = blend_over(*out, *top);
        }
        &self.output
    }

    /// The last composed frame.
    pub fn output(&self) -> &RgbaImage {
        &self.output
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        let size = [self.output.width() as usize, self.output.height() as usize];
        egui::ColorImage::from_rgba_unmultiplied(size, self.output.as_raw())
    }
}
