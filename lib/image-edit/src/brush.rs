//! Freehand drawing
//!
//! A [`DrawingCanvas`] collects drag gestures as strokes on top of an image and
//! flattens them into pixels only when asked to render.

use crate::ImageBuffer;
use derivative::Derivative;
use derive_setters::Setters;
use image::{GrayImage, Luma, Rgba};
use imageproc::drawing::draw_filled_circle_mut;

pub const MIN_BRUSH_SIZE: f32 = 1.0;
pub const MAX_BRUSH_SIZE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Brush used for the next stroke
#[derive(Debug, Clone, Copy, PartialEq, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BrushSettings {
    #[derivative(Default(value = "Rgba([0, 0, 0, 255])"))]
    pub color: Rgba<u8>,

    /// Stroke width in pixels, 1..=100
    #[setters(skip)]
    #[derivative(Default(value = "10.0"))]
    pub size: f32,

    /// 0.0 (invisible) ..= 1.0 (opaque)
    #[setters(skip)]
    #[derivative(Default(value = "1.0"))]
    pub opacity: f32,
}

impl BrushSettings {
    pub const PALETTE: [Rgba<u8>; 10] = [
        Rgba([0x29, 0x62, 0xFF, 0xFF]),
        Rgba([0x8D, 0x6E, 0x63, 0xFF]),
        Rgba([0x2E, 0x7D, 0x32, 0xFF]),
        Rgba([0xFF, 0xA0, 0x00, 0xFF]),
        Rgba([0xFF, 0x52, 0x52, 0xFF]),
        Rgba([0x00, 0x00, 0x00, 0xFF]),
        Rgba([0xFF, 0x70, 0x43, 0xFF]),
        Rgba([0x4D, 0xD0, 0xE1, 0xFF]),
        Rgba([0x95, 0x75, 0xCD, 0xFF]),
        Rgba([0xFF, 0xC1, 0x07, 0xFF]),
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

// Rasterization window in f64, wide enough for any f32 coordinate difference
#[derive(Debug, Clone, Copy)]
struct Area {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Area {
    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Part of the segment `a`-`b` inside the area (Liang-Barsky)
    fn clip(&self, a: (f64, f64), b: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

        for (p, q) in [
            (-dx, a.0 - self.min_x),
            (dx, self.max_x - a.0),
            (-dy, a.1 - self.min_y),
            (dy, self.max_y - a.1),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else {
                let t = q / p;
                if p < 0.0 {
                    t0 = t0.max(t);
                } else {
                    t1 = t1.min(t);
                }
                if t0 > t1 {
                    return None;
                }
            }
        }

        // huge coordinates lose precision here, keep the result inside
        let at = |t: f64| {
            (
                (a.0 + dx * t).clamp(self.min_x, self.max_x),
                (a.1 + dy * t).clamp(self.min_y, self.max_y),
            )
        };
        Some((at(t0), at(t1)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
    brush: BrushSettings,
}

impl Stroke {
    pub fn new(brush: BrushSettings, points: Vec<Point>) -> Self {
        Self { points, brush }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    /// Box around every point, grown by half the brush width
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.points.first()?;
        let half = self.brush.size / 2.0;

        let bounds = self.points.iter().fold(
            Bounds {
                min_x: first.x,
                min_y: first.y,
                max_x: first.x,
                max_y: first.y,
            },
            |b, p| Bounds {
                min_x: b.min_x.min(p.x),
                min_y: b.min_y.min(p.y),
                max_x: b.max_x.max(p.x),
                max_y: b.max_y.max(p.y),
            },
        );

        Some(Bounds {
            min_x: bounds.min_x - half,
            min_y: bounds.min_y - half,
            max_x: bounds.max_x + half,
            max_y: bounds.max_y + half,
        })
    }

    // Coverage of the round-capped polyline, 255 where the brush touched.
    // Segments are clipped to the image grown by the radius, so far-off or
    // non-finite points never reach the rasterizer.
    fn coverage(&self, width: u32, height: u32) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        let radius = (self.brush.size / 2.0).round() as i32;
        let step = (radius as f64 / 2.0).max(1.0);

        let margin = radius as f64 + 1.0;
        let area = Area {
            min_x: -margin,
            min_y: -margin,
            max_x: width as f64 + margin,
            max_y: height as f64 + margin,
        };
        let max_steps = ((area.max_x - area.min_x) + (area.max_y - area.min_y)) / step;

        let mut stamp = |x: f64, y: f64| {
            let (cx, cy) = (x.round() as i32, y.round() as i32);
            if radius == 0 {
                if cx >= 0 && cy >= 0 && (cx as u32) < width && (cy as u32) < height {
                    mask.put_pixel(cx as u32, cy as u32, Luma([255]));
                }
            } else {
                draw_filled_circle_mut(&mut mask, (cx, cy), radius, Luma([255]));
            }
        };

        let points = self
            .points
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .map(|p| (p.x as f64, p.y as f64))
            .collect::<Vec<_>>();

        match points.as_slice() {
            [] => {}
            [(x, y)] => {
                if area.contains(*x, *y) {
                    stamp(*x, *y);
                }
            }
            points => {
                for pair in points.windows(2) {
                    let Some(((ax, ay), (bx, by))) = area.clip(pair[0], pair[1]) else {
                        continue;
                    };

                    let len = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
                    let steps = (len / step).ceil().clamp(1.0, max_steps.max(1.0)) as u32;

                    for i in 0..=steps {
                        let t = i as f64 / steps as f64;
                        stamp(ax + (bx - ax) * t, ay + (by - ay) * t);
                    }
                }
            }
        }

        mask
    }

    fn paint(&self, image: &mut ImageBuffer) {
        let mask = self.coverage(image.width(), image.height());
        let alpha = self.brush.opacity * self.brush.color[3] as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }

        let color = self.brush.color;
        for (pixel, coverage) in image.pixels_mut().zip(mask.pixels()) {
            if coverage[0] == 0 {
                continue;
            }

            for i in 0..3 {
                let src = pixel[i] as f32;
                pixel[i] = (src + (color[i] as f32 - src) * alpha)
                    .clamp(0.0, 255.0)
                    .round() as u8;
            }

            let a = pixel[3] as f32;
            pixel[3] = (a + (255.0 - a) * alpha).clamp(0.0, 255.0).round() as u8;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawingCanvas {
    brush: BrushSettings,
    strokes: Vec<Stroke>,
    current: Option<Stroke>,
}

impl DrawingCanvas {
    pub fn new(brush: BrushSettings) -> Self {
        Self {
            brush,
            ..Default::default()
        }
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    /// Only affects strokes started afterwards
    pub fn set_brush(&mut self, brush: BrushSettings) {
        self.brush = brush;
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty() && self.current.is_none()
    }

    /// Start a new path. A path still in progress is committed first.
    pub fn begin(&mut self, point: Point) {
        self.end();
        self.current = Some(Stroke::new(self.brush, vec![point]));
    }

    pub fn extend(&mut self, point: Point) {
        if let Some(stroke) = self.current.as_mut() {
            stroke.points.push(point);
        }
    }

    pub fn end(&mut self) {
        if let Some(stroke) = self.current.take() {
            self.strokes.push(stroke);
        }
    }

    /// Record a whole path at once
    pub fn add_path(&mut self, points: impl IntoIterator<Item = Point>) {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return;
        };

        self.begin(first);
        for p in points {
            self.extend(p);
        }
        self.end();
    }

    /// Remove every committed stroke whose bounds contain `point`
    pub fn erase_at(&mut self, point: Point) -> usize {
        let before = self.strokes.len();
        self.strokes
            .retain(|s| !s.bounds().is_some_and(|b| b.contains(point)));

        let removed = before - self.strokes.len();
        if removed > 0 {
            log::debug!("eraser removed {removed} stroke(s)");
        }
        removed
    }

    pub fn undo(&mut self) -> Option<Stroke> {
        self.strokes.pop()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.current = None;
    }

    /// Flatten committed strokes onto a copy of `image`
    pub fn render(&self, image: &ImageBuffer) -> ImageBuffer {
        let mut out = image.clone();
        for stroke in &self.strokes {
            stroke.paint(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    fn white(width: u32, height: u32) -> ImageBuffer {
        ImageBuffer::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_brush_clamping() {
        let brush = BrushSettings::new().with_size(500.0).with_opacity(-1.0);
        assert_eq!(brush.size, MAX_BRUSH_SIZE);
        assert_eq!(brush.opacity, 0.0);

        let brush = BrushSettings::new().with_size(0.0).with_opacity(3.0);
        assert_eq!(brush.size, MIN_BRUSH_SIZE);
        assert_eq!(brush.opacity, 1.0);
    }

    #[test]
    fn test_path_accumulation() {
        let mut canvas = DrawingCanvas::default();
        canvas.extend(p(1.0, 1.0));
        assert!(canvas.is_empty());

        canvas.begin(p(0.0, 0.0));
        canvas.extend(p(5.0, 0.0));
        canvas.extend(p(5.0, 5.0));
        assert!(canvas.is_drawing());
        assert!(canvas.strokes().is_empty());

        canvas.end();
        assert!(!canvas.is_drawing());
        assert_eq!(canvas.strokes().len(), 1);
        assert_eq!(canvas.strokes()[0].points().len(), 3);

        canvas.end();
        assert_eq!(canvas.strokes().len(), 1);
    }

    #[test]
    fn test_brush_change_applies_to_new_strokes() {
        let mut canvas = DrawingCanvas::default();
        canvas.add_path([p(0.0, 0.0)]);
        canvas.set_brush(BrushSettings::new().with_color(BrushSettings::PALETTE[0]));
        canvas.add_path([p(1.0, 1.0)]);

        assert_eq!(canvas.strokes()[0].brush().color, Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.strokes()[1].brush().color, BrushSettings::PALETTE[0]);
    }

    #[test]
    fn test_erase_hits_only_covering_strokes() {
        let mut canvas = DrawingCanvas::new(BrushSettings::new().with_size(4.0));
        canvas.add_path([p(0.0, 0.0), p(10.0, 0.0)]);
        canvas.add_path([p(0.0, 20.0), p(10.0, 20.0)]);
        canvas.add_path([p(5.0, -5.0), p(5.0, 25.0)]);

        assert_eq!(canvas.erase_at(p(50.0, 50.0)), 0);
        assert_eq!(canvas.erase_at(p(2.0, 1.5)), 1);
        assert_eq!(canvas.strokes().len(), 2);
        assert_eq!(canvas.erase_at(p(5.0, 20.0)), 2);
        assert!(canvas.strokes().is_empty());
    }

    #[test]
    fn test_render_line() {
        let mut canvas = DrawingCanvas::new(BrushSettings::new().with_size(4.0));
        canvas.add_path([p(2.0, 10.0), p(17.0, 10.0)]);

        let img = white(20, 20);
        let out = canvas.render(&img);

        assert_eq!(out.dimensions(), img.dimensions());
        assert_eq!(*out.get_pixel(10, 10), Rgba([0, 0, 0, 255]));
        assert_eq!(*out.get_pixel(10, 2), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(10, 10), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_render_blends_each_stroke_once() {
        let brush = BrushSettings::new().with_size(6.0).with_opacity(0.5);
        let mut canvas = DrawingCanvas::new(brush);
        canvas.add_path([p(5.0, 5.0), p(5.5, 5.0), p(5.0, 5.0), p(5.2, 5.1)]);

        let out = canvas.render(&white(10, 10));
        assert_eq!(*out.get_pixel(5, 5), Rgba([128, 128, 128, 255]));

        canvas.add_path([p(5.0, 5.0)]);
        let out = canvas.render(&white(10, 10));
        assert_eq!(*out.get_pixel(5, 5), Rgba([64, 64, 64, 255]));
    }

    #[test]
    fn test_render_raises_alpha_and_clips() {
        let mut canvas = DrawingCanvas::new(BrushSettings::new().with_size(8.0));
        canvas.add_path([p(-20.0, 2.0), p(3.0, 2.0)]);

        let clear = ImageBuffer::new(6, 6);
        let out = canvas.render(&clear);
        assert_eq!(*out.get_pixel(0, 2), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_render_far_off_points() {
        let img = white(4, 4);

        let mut canvas = DrawingCanvas::default();
        canvas.add_path([p(3.0e9, 2.0)]);
        canvas.add_path([p(-1.0e30, -1.0e30), p(-1.0e30, 1.0e30)]);
        assert_eq!(canvas.render(&img), img);

        // long segment crossing the image is drawn only where it overlaps
        canvas.clear();
        canvas.add_path([p(0.0, 2.0), p(2.0e7, 2.0)]);
        let out = canvas.render(&img);
        assert_eq!(*out.get_pixel(3, 2), Rgba([0, 0, 0, 255]));

        canvas.clear();
        canvas.add_path([p(-3.0e38, 1.0), p(3.0e38, 1.0)]);
        assert_eq!(canvas.render(&img).dimensions(), (4, 4));
    }

    #[test]
    fn test_render_skips_non_finite_points() {
        let img = white(6, 6);
        let mut canvas = DrawingCanvas::new(BrushSettings::new().with_size(2.0));
        canvas.add_path([p(f32::INFINITY, 2.0), p(f32::NAN, f32::NAN)]);
        assert_eq!(canvas.render(&img), img);

        canvas.add_path([p(1.0, 1.0), p(f32::NEG_INFINITY, 1.0), p(4.0, 1.0)]);
        let out = canvas.render(&img);
        assert_eq!(*out.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*out.get_pixel(4, 1), Rgba([0, 0, 0, 255]));
    }
}
