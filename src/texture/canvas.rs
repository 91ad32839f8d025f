//! Software 2D canvas
//!
//! A tiny subset of the HTML canvas drawing model: a transform stack
//! (`save`/`restore`/`translate`/`rotate`), fill and stroke styles, and a
//! handful of shape primitives. Shapes are rasterized per pixel from signed
//! distance fields and composited source-over.

use glam::{Affine2, Vec2};

use super::sdf::{coverage, sd_arc, sd_circle, sd_polygon, sd_round_rect};

/// Straight-alpha color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    /// Opaque color from `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }
}

/// Encoded sprite: straight-alpha RGBA8, row-major, top row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl SpriteImage {
    /// RGBA of one pixel
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    /// Number of pixels with any coverage
    pub fn covered_pixels(&self) -> usize {
        self.rgba.chunks_exact(4).filter(|px| px[3] > 0).count()
    }
}

/// Offscreen square drawing surface with its origin at the center
pub struct Canvas {
    size: u32,
    /// Premultiplied RGBA accumulators
    pixels: Vec<[f32; 4]>,
    transform: Affine2,
    stack: Vec<Affine2>,
    fill: Color,
    stroke: Color,
    line_width: f32,
}

impl Canvas {
    /// Create a transparent canvas pre-translated to its center
    pub fn new(size: u32) -> Self {
        let half = size as f32 / 2.0;
        Self {
            size,
            pixels: vec![[0.0; 4]; (size * size) as usize],
            transform: Affine2::from_translation(Vec2::splat(half)),
            stack: Vec::new(),
            fill: Color::hex(0x000000),
            stroke: Color::hex(0x000000),
            line_width: 1.0,
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Push the current transform
    pub fn save(&mut self) {
        self.stack.push(self.transform);
    }

    /// Pop back to the last `save` (no-op on an empty stack, like the DOM)
    pub fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.transform = self.transform * Affine2::from_translation(Vec2::new(x, y));
    }

    /// Rotate the local frame (clockwise on screen for positive angles)
    pub fn rotate(&mut self, angle: f32) {
        self.transform = self.transform * Affine2::from_angle(angle);
    }

    pub fn set_fill(&mut self, color: Color) {
        self.fill = color;
    }

    pub fn set_stroke(&mut self, color: Color, line_width: f32) {
        self.stroke = color;
        self.line_width = line_width;
    }

    pub fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        let center = Vec2::new(x, y);
        let reach = Vec2::splat(radius);
        let color = self.fill;
        self.paint(center - reach, center + reach, color, |p| {
            sd_circle(p, center, radius)
        });
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.fill_round_rect(x, y, w, h, 0.0);
    }

    pub fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        let min = Vec2::new(x.min(x + w), y.min(y + h));
        let size = Vec2::new(w.abs(), h.abs());
        let color = self.fill;
        self.paint(min, min + size, color, |p| sd_round_rect(p, min, size, radius));
    }

    /// Fill a closed path through `points`
    pub fn fill_polygon(&mut self, points: &[Vec2]) {
        let Some(first) = points.first() else {
            return;
        };
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        let color = self.fill;
        self.paint(min, max, color, |p| sd_polygon(p, points));
    }

    /// Stroke an arc with the current stroke style
    pub fn stroke_arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        let center = Vec2::new(x, y);
        let half = self.line_width * 0.5;
        let reach = Vec2::splat(radius + half);
        let width = self.line_width;
        let color = self.stroke;
        self.paint(center - reach, center + reach, color, |p| {
            sd_arc(p, center, radius, start, end, width)
        });
    }

    /// Finish drawing and encode straight-alpha RGBA8
    pub fn into_image(self) -> SpriteImage {
        let mut rgba = Vec::with_capacity(self.pixels.len() * 4);
        for [r, g, b, a] in self.pixels {
            if a <= 0.0 {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
            rgba.extend_from_slice(&[to_u8(r / a), to_u8(g / a), to_u8(b / a), to_u8(a)]);
        }
        SpriteImage {
            width: self.size,
            height: self.size,
            rgba,
        }
    }

    /// Composite a shape given by its local-space bounds and distance field
    fn paint<F>(&mut self, local_min: Vec2, local_max: Vec2, color: Color, sdf: F)
    where
        F: Fn(Vec2) -> f32,
    {
        if color.a <= 0.0 {
            return;
        }

        // Device-space bounding box of the transformed local bounds
        let corners = [
            local_min,
            Vec2::new(local_max.x, local_min.y),
            local_max,
            Vec2::new(local_min.x, local_max.y),
        ]
        .map(|c| self.transform.transform_point2(c));
        let lo = corners.iter().fold(Vec2::splat(f32::MAX), |acc, c| acc.min(*c));
        let hi = corners.iter().fold(Vec2::splat(f32::MIN), |acc, c| acc.max(*c));

        let size = self.size as f32;
        let x0 = (lo.x - 1.0).floor().clamp(0.0, size) as u32;
        let y0 = (lo.y - 1.0).floor().clamp(0.0, size) as u32;
        let x1 = (hi.x + 1.0).ceil().clamp(0.0, size) as u32;
        let y1 = (hi.y + 1.0).ceil().clamp(0.0, size) as u32;

        let inverse = self.transform.inverse();
        for y in y0..y1 {
            for x in x0..x1 {
                let device = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let alpha = coverage(sdf(inverse.transform_point2(device))) * color.a;
                if alpha <= 0.0 {
                    continue;
                }
                let dst = &mut self.pixels[(y * self.size + x) as usize];
                let keep = 1.0 - alpha;
                dst[0] = color.r * alpha + dst[0] * keep;
                dst[1] = color.g * alpha + dst[1] * keep;
                dst[2] = color.b * alpha + dst[2] * keep;
                dst[3] = alpha + dst[3] * keep;
            }
        }
    }
}
