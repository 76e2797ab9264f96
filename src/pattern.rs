//! Spiral line pattern drawn straight onto a surface.
//!
//! The pattern is overpaint: it never enters history, so the next repaint
//! of the permanent layer removes it.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::geometry::Point;
use crate::surface::DrawSurface;
use crate::util::time;

const ITERATIONS: u32 = 360;

/// Optional overrides for the pattern; anything unset is drawn from the seed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatternParams {
    pub seed: Option<u64>,
    /// Turn per segment, in radians.
    pub fix: Option<f32>,
    /// Length lost per segment.
    pub zoom: Option<f32>,
    /// Colour counter of the first segment; see [`segment_colour`].
    pub start_colour: Option<f32>,
}

/// The values a pattern was actually drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternSettings {
    pub seed: u64,
    pub step: f32,
    pub magnify: f32,
    pub start_colour: f32,
}

// SplitMix64; small and stable across platforms
struct SeededRng(u64);

impl SeededRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

impl PatternParams {
    /// Fills in every unset value. Without a seed, the clock provides one.
    pub fn resolve(&self, surface_height: u32) -> PatternSettings {
        let seed = self.seed.unwrap_or_else(time::now_millis);
        let mut rng = SeededRng(seed);
        let random_step = (rng.next_unit() * 360.0).round() as f32;
        let random_colour = (rng.next_unit() * 360.0).round() as f32;

        PatternSettings {
            seed,
            step: self.fix.unwrap_or(random_step),
            magnify: self.zoom.unwrap_or(surface_height as f32 / 500.0),
            start_colour: self.start_colour.unwrap_or(random_colour),
        }
    }
}

/// Stroke colour for a segment. The counter wraps at 360 and drives the red
/// channel, which saturates past 255; green and blue stay fixed.
pub fn segment_colour(colour: f32) -> Rgb {
    let red = colour.rem_euclid(360.0).round().min(255.0) as u8;
    Rgb::new(red, 100, 50)
}

/// Clears `surface` to white and draws the spiral from its center.
pub fn draw_pattern(surface: &mut dyn DrawSurface, params: &PatternParams) -> PatternSettings {
    let settings = params.resolve(surface.height());
    log::info!(
        "Drawing pattern (seed {}, step {}, colour {})",
        settings.seed,
        settings.step,
        settings.start_colour
    );

    surface.push();
    surface.clear(Rgb::WHITE.opaque());
    surface.set_fill(None);
    surface.set_stroke_weight(1.0);

    let mut old = Point::new(surface.width() as f32 / 2.0, surface.height() as f32 / 2.0);
    let mut length = 0.0f32;
    let mut angle = 0.0f32;
    let mut colour = settings.start_colour;

    for _ in 0..ITERATIONS {
        surface.set_stroke(Some(segment_colour(colour).opaque()));
        let new = Point::new(old.x + length * angle.cos(), old.y + length * angle.sin());
        surface.line(old, new);

        old = new;
        angle += settings.step;
        length -= settings.magnify;
        colour += 1.0;
    }
    surface.pop();

    settings
}
