//! Software surface backed by an RGBA image buffer
//!
//! Used for headless snapshots: the console front end draws a frame into
//! an [`ImageSurface`] and writes it out as a PNG.

use anyhow::{Context, Result};
use image::{Rgba as ImgRgba, RgbaImage};
use std::path::Path;

use super::{Rect, Rgba, Surface};
use crate::simulation::Position;

/// Fill used for sprites when no atlas image is loaded
const MISSING_SPRITE: Rgba = Rgba::opaque(0x80, 0x80, 0x80);

pub struct ImageSurface {
    canvas: RgbaImage,
    atlas: Option<RgbaImage>,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width, height),
            atlas: None,
        }
    }

    pub fn with_atlas(mut self, atlas: RgbaImage) -> Self {
        self.atlas = Some(atlas);
        self
    }

    /// Load the sprite sheet from an image file
    pub fn load_atlas(&mut self, path: &Path) -> Result<()> {
        let atlas = image::open(path)
            .with_context(|| format!("Failed to open atlas {}", path.display()))?
            .to_rgba8();
        self.atlas = Some(atlas);
        Ok(())
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.canvas
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Source-over blend one pixel; out-of-canvas writes are dropped
    fn blend(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.canvas.width() as i64 || y >= self.canvas.height() as i64 {
            return;
        }
        let alpha = color[3] as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }
        let pixel = self.canvas.get_pixel_mut(x as u32, y as u32);
        let dst = pixel.0;
        let mix = |s: u8, d: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
        let out_alpha = (alpha * 255.0 + dst[3] as f32 * (1.0 - alpha)).round() as u8;
        *pixel = ImgRgba([
            mix(color[0], dst[0]),
            mix(color[1], dst[1]),
            mix(color[2], dst[2]),
            out_alpha,
        ]);
    }

    /// Integer pixel span covered by `[start, start + len)`
    fn span(start: f32, len: f32) -> std::ops::Range<i64> {
        (start.round() as i64)..((start + len).round() as i64)
    }
}

fn to_bytes(color: Rgba) -> [u8; 4] {
    [
        color.r,
        color.g,
        color.b,
        (color.a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

impl Surface for ImageSurface {
    fn clear(&mut self, color: Rgba) {
        let fill = ImgRgba(to_bytes(color));
        for pixel in self.canvas.pixels_mut() {
            *pixel = fill;
        }
    }

    fn draw_sprite(&mut self, source: Rect, dest: Rect) {
        let Some(atlas) = self.atlas.take() else {
            self.fill_rect(dest, MISSING_SPRITE);
            return;
        };

        // Nearest-neighbour scaling from the sheet
        let (sx_scale, sy_scale) = (source.w / dest.w.max(1.0), source.h / dest.h.max(1.0));
        let (x0, y0) = (dest.x.round() as i64, dest.y.round() as i64);
        for py in Self::span(dest.y, dest.h) {
            for px in Self::span(dest.x, dest.w) {
                let ax = (source.x + (px - x0) as f32 * sx_scale) as u32;
                let ay = (source.y + (py - y0) as f32 * sy_scale) as u32;
                if ax < atlas.width() && ay < atlas.height() {
                    self.blend(px, py, atlas.get_pixel(ax, ay).0);
                }
            }
        }
        self.atlas = Some(atlas);
    }

    fn fill_rect(&mut self, dest: Rect, color: Rgba) {
        let bytes = to_bytes(color);
        for py in Self::span(dest.y, dest.h) {
            for px in Self::span(dest.x, dest.w) {
                self.blend(px, py, bytes);
            }
        }
    }

    fn stroke_rect(&mut self, dest: Rect, color: Rgba, line_width: f32) {
        let half = line_width / 2.0;
        let (left, top) = (dest.x - half, dest.y - half);
        let (width, height) = (dest.w + line_width, dest.h + line_width);
        self.fill_rect(Rect::new(left, top, width, line_width), color);
        self.fill_rect(Rect::new(left, top + height - line_width, width, line_width), color);
        self.fill_rect(Rect::new(left, top + line_width, line_width, height - 2.0 * line_width), color);
        self.fill_rect(
            Rect::new(left + width - line_width, top + line_width, line_width, height - 2.0 * line_width),
            color,
        );
    }

    fn fill_circle(&mut self, center: Position, radius: f32, color: Rgba) {
        let bytes = to_bytes(color);
        for py in Self::span(center.y - radius, radius * 2.0) {
            for px in Self::span(center.x - radius, radius * 2.0) {
                let dx = px as f32 + 0.5 - center.x;
                let dy = py as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= radius * radius {
                    self.blend(px, py, bytes);
                }
            }
        }
    }

    fn fill_triangle(&mut self, points: [Position; 3], color: Rgba) {
        let bytes = to_bytes(color);
        let [a, b, c] = points;
        let edge = |p: Position, q: Position, x: f32, y: f32| (q.x - p.x) * (y - p.y) - (q.y - p.y) * (x - p.x);

        let min_x = a.x.min(b.x).min(c.x).floor() as i64;
        let max_x = a.x.max(b.x).max(c.x).ceil() as i64;
        let min_y = a.y.min(b.y).min(c.y).floor() as i64;
        let max_y = a.y.max(b.y).max(c.y).ceil() as i64;

        for py in min_y..max_y {
            for px in min_x..max_x {
                let (x, y) = (px as f32 + 0.5, py as f32 + 0.5);
                let (e0, e1, e2) = (edge(a, b, x, y), edge(b, c, x, y), edge(c, a, x, y));
                let inside = (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0);
                if inside {
                    self.blend(px, py, bytes);
                }
            }
        }
    }

    fn line(&mut self, from: Position, to: Position, color: Rgba, line_width: f32) {
        let length = from.distance(&to);
        let steps = (length * 2.0).ceil().max(1.0) as usize;
        let half = line_width / 2.0;
        let bytes = to_bytes(color);
        let mut last = None;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = from.x + (to.x - from.x) * t;
            let y = from.y + (to.y - from.y) * t;
            let pixel = ((x - half).round() as i64, (y - half).round() as i64);
            if last == Some(pixel) {
                continue;
            }
            last = Some(pixel);
            let size = line_width.round().max(1.0) as i64;
            for py in pixel.1..pixel.1 + size {
                for px in pixel.0..pixel.0 + size {
                    self.blend(px, py, bytes);
                }
            }
        }
    }
}
