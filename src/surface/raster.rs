use image::{Rgba, RgbaImage};

use super::DrawSurface;
use crate::geometry::{Point, calculate_bounds, distance_to_segment};

/// Column-major 2x3 affine transform: `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Affine {
    const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    fn translated(&self, dx: f32, dy: f32) -> Affine {
        Affine {
            e: self.a * dx + self.c * dy + self.e,
            f: self.b * dx + self.d * dy + self.f,
            ..*self
        }
    }

    fn rotated(&self, angle: f32) -> Affine {
        let (sin, cos) = angle.sin_cos();
        Affine {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..*self
        }
    }

    fn inverse(&self) -> Option<Affine> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Affine {
            a: self.d / det,
            b: -self.b / det,
            c: -self.c / det,
            d: self.a / det,
            e: (self.c * self.f - self.d * self.e) / det,
            f: (self.b * self.e - self.a * self.f) / det,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct DrawStyle {
    fill: Option<Rgba<u8>>,
    stroke: Option<Rgba<u8>>,
    weight: f32,
    transform: Affine,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            fill: Some(Rgba([255, 255, 255, 255])),
            stroke: Some(Rgba([0, 0, 0, 255])),
            weight: 1.0,
            transform: Affine::IDENTITY,
        }
    }
}

/// Unpremultiplied source-over blend of `src` onto `dst`.
pub(crate) fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    // Fast paths: nothing to blend, or plain overwrite
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let src_a = src[3] as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let c = (src[i] as f32 * src_a + dst[i] as f32 * dst_a * (1.0 - src_a)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// A software raster layer.
///
/// Coverage is binary and sampled at pixel centers, so the same sequence
/// of calls always produces the same bytes.
#[derive(Debug, Clone)]
pub struct RasterLayer {
    pixels: RgbaImage,
    style: DrawStyle,
    saved: Vec<DrawStyle>,
}

impl RasterLayer {
    /// Creates a layer of the given size with every pixel set to `background`.
    pub fn new(width: u32, height: u32, background: Rgba<u8>) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, background),
            style: DrawStyle::default(),
            saved: Vec::new(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.pixels.width() && y < self.pixels.height()).then(|| *self.pixels.get_pixel(x, y))
    }

    /// Drops any unbalanced `push` and returns to the default drawing state.
    pub fn reset_style(&mut self) {
        self.style = DrawStyle::default();
        self.saved.clear();
    }

    /// Blends `color` onto every pixel whose center, mapped back into local
    /// coordinates, satisfies `inside`. `min`/`max` bound the shape locally.
    fn paint_region(
        &mut self,
        min: Point,
        max: Point,
        color: Rgba<u8>,
        inside: impl Fn(Point) -> bool,
    ) {
        if color[3] == 0 || !min.is_finite() || !max.is_finite() {
            return;
        }
        let transform = self.style.transform;
        let Some(inverse) = transform.inverse() else {
            return;
        };

        let corners = [
            transform.apply(min),
            transform.apply(Point::new(max.x, min.y)),
            transform.apply(max),
            transform.apply(Point::new(min.x, max.y)),
        ];
        let Some((dev_min, dev_max)) = calculate_bounds(&corners, 0.0) else {
            return;
        };

        let (width, height) = self.pixels.dimensions();
        let x0 = dev_min.x.floor().max(0.0) as u32;
        let y0 = dev_min.y.floor().max(0.0) as u32;
        let x1 = (dev_max.x.ceil().max(0.0) as u32).min(width);
        let y1 = (dev_max.y.ceil().max(0.0) as u32).min(height);

        for py in y0..y1 {
            for px in x0..x1 {
                let center = Point::new(px as f32 + 0.5, py as f32 + 0.5);
                if inside(inverse.apply(center)) {
                    let pixel = self.pixels.get_pixel_mut(px, py);
                    *pixel = blend_over(*pixel, color);
                }
            }
        }
    }

    fn half_weight(&self) -> f32 {
        self.style.weight.max(0.0) / 2.0
    }
}

fn inside_ellipse(p: Point, center: Point, rx: f32, ry: f32) -> bool {
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let nx = (p.x - center.x) / rx;
    let ny = (p.y - center.y) / ry;
    nx * nx + ny * ny <= 1.0
}

fn inside_box(p: Point, min: Point, max: Point) -> bool {
    p.x >= min.x && p.x < max.x && p.y >= min.y && p.y < max.y
}

fn edge(a: Point, b: Point, p: Point) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn inside_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
    let (e0, e1, e2) = (edge(a, b, p), edge(b, c, p), edge(c, a, p));
    let has_neg = e0 < 0.0 || e1 < 0.0 || e2 < 0.0;
    let has_pos = e0 > 0.0 || e1 > 0.0 || e2 > 0.0;
    !(has_neg && has_pos) && edge(a, b, c) != 0.0
}

impl DrawSurface for RasterLayer {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn clear(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = color;
        }
    }

    fn set_fill(&mut self, color: Option<Rgba<u8>>) {
        self.style.fill = color;
    }

    fn set_stroke(&mut self, color: Option<Rgba<u8>>) {
        self.style.stroke = color;
    }

    fn set_stroke_weight(&mut self, weight: f32) {
        self.style.weight = weight;
    }

    fn push(&mut self) {
        self.saved.push(self.style);
    }

    fn pop(&mut self) {
        match self.saved.pop() {
            Some(style) => self.style = style,
            None => log::warn!("RasterLayer::pop without matching push"),
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.style.transform = self.style.transform.translated(dx, dy);
    }

    fn rotate(&mut self, angle: f32) {
        self.style.transform = self.style.transform.rotated(angle);
    }

    fn line(&mut self, from: Point, to: Point) {
        let Some(color) = self.style.stroke else {
            return;
        };
        let radius = self.half_weight().max(0.5);
        let min = Point::new(from.x.min(to.x) - radius, from.y.min(to.y) - radius);
        let max = Point::new(from.x.max(to.x) + radius, from.y.max(to.y) + radius);
        self.paint_region(min, max, color, |p| {
            distance_to_segment(p, from, to) <= radius
        });
    }

    fn ellipse(&mut self, center: Point, width: f32, height: f32) {
        let rx = width.abs() / 2.0;
        let ry = height.abs() / 2.0;

        if let Some(fill) = self.style.fill {
            let min = Point::new(center.x - rx, center.y - ry);
            let max = Point::new(center.x + rx, center.y + ry);
            self.paint_region(min, max, fill, |p| inside_ellipse(p, center, rx, ry));
        }

        let hw = self.half_weight();
        if let Some(stroke) = self.style.stroke.filter(|_| hw > 0.0) {
            let (outer_x, outer_y) = (rx + hw, ry + hw);
            let (inner_x, inner_y) = (rx - hw, ry - hw);
            let min = Point::new(center.x - outer_x, center.y - outer_y);
            let max = Point::new(center.x + outer_x, center.y + outer_y);
            self.paint_region(min, max, stroke, |p| {
                inside_ellipse(p, center, outer_x, outer_y)
                    && !inside_ellipse(p, center, inner_x, inner_y)
            });
        }
    }

    fn rect(&mut self, origin: Point, width: f32, height: f32) {
        let min = Point::new(origin.x.min(origin.x + width), origin.y.min(origin.y + height));
        let max = Point::new(origin.x.max(origin.x + width), origin.y.max(origin.y + height));

        if let Some(fill) = self.style.fill {
            self.paint_region(min, max, fill, |p| inside_box(p, min, max));
        }

        let hw = self.half_weight();
        if let Some(stroke) = self.style.stroke.filter(|_| hw > 0.0) {
            let outer_min = Point::new(min.x - hw, min.y - hw);
            let outer_max = Point::new(max.x + hw, max.y + hw);
            let inner_min = Point::new(min.x + hw, min.y + hw);
            let inner_max = Point::new(max.x - hw, max.y - hw);
            self.paint_region(outer_min, outer_max, stroke, |p| {
                inside_box(p, outer_min, outer_max) && !inside_box(p, inner_min, inner_max)
            });
        }
    }

    fn triangle(&mut self, a: Point, b: Point, c: Point) {
        let hw = self.half_weight();
        let Some((min, max)) = calculate_bounds(&[a, b, c], hw) else {
            return;
        };

        if let Some(fill) = self.style.fill {
            self.paint_region(min, max, fill, |p| inside_triangle(p, a, b, c));
        }

        if let Some(stroke) = self.style.stroke.filter(|_| hw > 0.0) {
            self.paint_region(min, max, stroke, |p| {
                distance_to_segment(p, a, b) <= hw
                    || distance_to_segment(p, b, c) <= hw
                    || distance_to_segment(p, c, a) <= hw
            });
        }
    }

    fn image(&mut self, image: &RgbaImage, origin: Point) {
        let origin = self.style.transform.apply(origin);
        if !origin.is_finite() {
            return;
        }
        let (ox, oy) = (origin.x.round() as i64, origin.y.round() as i64);
        let (width, height) = (self.pixels.width() as i64, self.pixels.height() as i64);

        for (sx, sy, src) in image.enumerate_pixels() {
            let (dx, dy) = (ox + sx as i64, oy + sy as i64);
            if dx < 0 || dy < 0 || dx >= width || dy >= height {
                continue;
            }
            let pixel = self.pixels.get_pixel_mut(dx as u32, dy as u32);
            *pixel = blend_over(*pixel, *src);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn count(layer: &RasterLayer, color: Rgba<u8>) -> usize {
        layer.pixels().pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_blend_over() {
        let half_red = Rgba([255, 0, 0, 128]);
        assert_eq!(blend_over(WHITE, Rgba([0, 0, 0, 0])), WHITE);
        assert_eq!(blend_over(WHITE, RED), RED);

        let mixed = blend_over(WHITE, half_red);
        assert_eq!(mixed[0], 255);
        assert_eq!(mixed[1], 127);
        assert_eq!(mixed[3], 255);

        // Over a transparent pixel the source passes through unchanged
        assert_eq!(blend_over(Rgba([0, 0, 0, 0]), half_red), half_red);
    }

    #[test]
    fn test_rect_fill_covers_exact_pixels() {
        let mut layer = RasterLayer::new(100, 100, WHITE);
        layer.set_stroke(None);
        layer.set_fill(Some(RED));
        layer.rect(Point::new(10.0, 20.0), 50.0, 30.0);

        assert_eq!(count(&layer, RED), 50 * 30);
        assert_eq!(layer.pixel(10, 20), Some(RED));
        assert_eq!(layer.pixel(59, 49), Some(RED));
        assert_eq!(layer.pixel(60, 49), Some(WHITE));
    }

    #[test]
    fn test_negative_rect_is_mirrored() {
        let mut forward = RasterLayer::new(64, 64, WHITE);
        let mut mirrored = RasterLayer::new(64, 64, WHITE);
        forward.rect(Point::new(10.0, 10.0), 20.0, 15.0);
        mirrored.rect(Point::new(30.0, 25.0), -20.0, -15.0);
        assert_eq!(forward.pixels(), mirrored.pixels());
    }

    #[test]
    fn test_circle_is_round() {
        let mut layer = RasterLayer::new(40, 40, WHITE);
        layer.set_stroke(None);
        layer.set_fill(Some(RED));
        layer.circle(Point::new(20.0, 20.0), 20.0);

        assert_eq!(layer.pixel(20, 20), Some(RED));
        assert_eq!(layer.pixel(11, 20), Some(RED));
        assert_eq!(layer.pixel(11, 11), Some(WHITE));
        let area = count(&layer, RED) as f32;
        let expected = std::f32::consts::PI * 100.0;
        assert!((area - expected).abs() / expected < 0.05);
    }

    #[test]
    fn test_rotation_turns_ellipse() {
        let mut layer = RasterLayer::new(40, 40, WHITE);
        layer.set_stroke(None);
        layer.set_fill(Some(RED));
        layer.push();
        layer.translate(20.0, 20.0);
        layer.rotate(std::f32::consts::FRAC_PI_2);
        layer.ellipse(Point::new(0.0, 0.0), 30.0, 6.0);
        layer.pop();

        // A wide ellipse turned a quarter is tall
        assert_eq!(layer.pixel(20, 6), Some(RED));
        assert_eq!(layer.pixel(6, 20), Some(WHITE));
    }

    #[test]
    fn test_push_pop_restores_style() {
        let mut layer = RasterLayer::new(10, 10, WHITE);
        layer.set_fill(Some(RED));
        layer.push();
        layer.set_fill(None);
        layer.translate(100.0, 0.0);
        layer.pop();
        layer.set_stroke(None);
        layer.rect(Point::new(0.0, 0.0), 2.0, 2.0);
        assert_eq!(layer.pixel(0, 0), Some(RED));
    }

    #[test]
    fn test_line_and_triangle() {
        let mut layer = RasterLayer::new(50, 50, WHITE);
        layer.set_stroke(Some(RED));
        layer.set_stroke_weight(3.0);
        layer.line(Point::new(5.0, 5.0), Point::new(45.0, 5.0));
        assert_eq!(layer.pixel(25, 5), Some(RED));
        assert_eq!(layer.pixel(25, 9), Some(WHITE));

        let mut layer = RasterLayer::new(50, 50, WHITE);
        layer.set_stroke(None);
        layer.set_fill(Some(RED));
        layer.triangle(
            Point::new(0.0, 40.0),
            Point::new(20.0, 0.0),
            Point::new(40.0, 40.0),
        );
        assert_eq!(layer.pixel(20, 30), Some(RED));
        assert_eq!(layer.pixel(2, 2), Some(WHITE));
    }

    #[test]
    fn test_image_blit_clips() {
        let mut layer = RasterLayer::new(10, 10, WHITE);
        let stamp = RgbaImage::from_pixel(4, 4, RED);
        layer.image(&stamp, Point::new(8.0, -2.0));
        assert_eq!(count(&layer, RED), 2 * 2);
        assert_eq!(layer.pixel(9, 1), Some(RED));
    }

    #[test]
    fn test_clear_does_not_blend() {
        let mut layer = RasterLayer::new(4, 4, WHITE);
        layer.clear(crate::surface::TRANSPARENT);
        assert_eq!(count(&layer, crate::surface::TRANSPARENT), 16);
    }
}
