//! Two sampling passes over pointer input.
//!
//! The *retain* pass decides which raw pointer positions are stored in a
//! stroke. It is movement-triggered, so a pointer held still does not grow
//! the history. The *resample* pass runs at render time and produces evenly
//! spaced samples along the stored path, with a density that depends on the
//! stroke style rather than on how often the pointer reported.

use super::Point;

/// A new pointer position is stored only if its squared distance from the
/// last stored point exceeds this value (a 4 px move).
pub const RETAIN_THRESHOLD_SQ: f32 = 16.0;

/// Lower bound on the distance between two dense render samples.
pub const MIN_SAMPLE_SPACING: f32 = 0.5;

/// Upper bound on dense samples emitted for one stored segment.
pub const MAX_SEGMENT_SAMPLES: usize = 16_384;

/// A dense render sample: a position along the path and the direction of
/// travel at that position, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub pos: Point,
    pub angle: f32,
}

/// Whether `candidate` should be stored after `last`.
pub fn should_retain(last: Option<Point>, candidate: Point) -> bool {
    match last {
        None => true,
        Some(last) => last.distance_sq(candidate) > RETAIN_THRESHOLD_SQ,
    }
}

/// Spacing between dense samples for a pen of `pen_size` and a tool's spacing factor.
pub fn sample_spacing(pen_size: f32, spacing_factor: f32) -> f32 {
    (pen_size * spacing_factor).max(MIN_SAMPLE_SPACING)
}

/// Resamples the stored path into evenly spaced samples no further apart than `spacing`.
///
/// Every stored point appears in the output exactly once, in order.
pub fn resample(points: &[Point], spacing: f32) -> Vec<Sample> {
    if points.len() < 2 {
        return points
            .iter()
            .map(|&pos| Sample { pos, angle: 0.0 })
            .collect();
    }

    let spacing = spacing.max(MIN_SAMPLE_SPACING);
    let mut samples = Vec::with_capacity(points.len());
    let mut angle = 0.0;

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        angle = (b.y - a.y).atan2(b.x - a.x);

        let steps = ((a.distance(b) / spacing).ceil() as usize).clamp(1, MAX_SEGMENT_SAMPLES);
        for step in 0..steps {
            let t = step as f32 / steps as f32;
            samples.push(Sample {
                pos: a.lerp(b, t),
                angle,
            });
        }
    }

    if let Some(&last) = points.last() {
        samples.push(Sample { pos: last, angle });
    }

    samples
}
