//! CPU rasterizer.
//!
//! [`Raster`] implements [`Canvas`] over an [`image::RgbaImage`] so effects can
//! be rendered without a window, for thumbnails or the `pfxd-render` tool.
//! Pixels are sampled at their centers without anti-aliasing.
//!
//! | Blend mode | Compositing |
//! |------------|-------------|
//! | `Normal` | Source-over alpha blending |
//! | `Additive` | Premultiplied colors summed and clamped |
//!
//! Glyph particles have no font engine behind them and render as a disc of
//! the glyph size.

use crate::canvas::{BlendMode, BlendStack, Canvas, Stroke};
use crate::color::{Paint, Rgb};
use crate::error::ProjectError;
use glam::DVec2;
use image::{ImageFormat, Rgba, RgbaImage};
use std::f64::consts::TAU;
use std::path::Path;

/// Segments used when a circle outline is stroked.
const CIRCLE_SEGMENTS: usize = 64;

/// Software canvas.
#[derive(Clone, Debug)]
pub struct Raster {
    image: RgbaImage,
    blend: BlendStack,
}

impl Raster {
    /// Transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            blend: BlendStack::default(),
        }
    }

    /// Fill every pixel with an opaque color.
    pub fn clear(&mut self, color: Rgb) {
        let pixel = Rgba([color.r, color.g, color.b, 255]);
        for p in self.image.pixels_mut() {
            *p = pixel;
        }
    }

    /// Reset every pixel to transparent.
    pub fn clear_transparent(&mut self) {
        for p in self.image.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// RGBA at a pixel, `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Write the canvas as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ProjectError> {
        let path = path.as_ref();
        self.image.save_with_format(path, ImageFormat::Png)?;
        log::info!(
            "wrote {}x{} PNG to {}",
            self.width(),
            self.height(),
            path.display()
        );
        Ok(())
    }

    /// Blend `paint` into every pixel in the box whose center satisfies `inside`.
    fn fill_where(&mut self, min: DVec2, max: DVec2, paint: Paint, inside: impl Fn(DVec2) -> bool) {
        if paint.alpha <= 0.0 {
            return;
        }
        let (w, h) = (self.image.width() as f64, self.image.height() as f64);
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = max.x.ceil().min(w) as u32;
        let y1 = max.y.ceil().min(h) as u32;
        let mode = self.blend.current();

        for y in y0..y1 {
            for x in x0..x1 {
                let center = DVec2::new(x as f64 + 0.5, y as f64 + 0.5);
                if inside(center) {
                    let dst = self.image.get_pixel_mut(x, y);
                    *dst = composite(*dst, paint, mode);
                }
            }
        }
    }
}

fn composite(dst: Rgba<u8>, paint: Paint, mode: BlendMode) -> Rgba<u8> {
    let sa = paint.alpha.clamp(0.0, 1.0);
    let [sr, sg, sb] = paint.color.to_unit();
    let [dr, dg, db, da] = dst.0.map(|c| c as f64 / 255.0);

    let (out_a, premul) = match mode {
        BlendMode::Normal => {
            let keep = da * (1.0 - sa);
            (
                sa + keep,
                [sr * sa + dr * keep, sg * sa + dg * keep, sb * sa + db * keep],
            )
        }
        BlendMode::Additive => (
            (sa + da).min(1.0),
            [
                (sr * sa + dr * da).min(1.0),
                (sg * sa + dg * da).min(1.0),
                (sb * sa + db * da).min(1.0),
            ],
        ),
    };

    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let to_byte = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba([
        to_byte(premul[0] / out_a),
        to_byte(premul[1] / out_a),
        to_byte(premul[2] / out_a),
        to_byte(out_a),
    ])
}

fn bounds(points: &[DVec2]) -> (DVec2, DVec2) {
    points.iter().fold(
        (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
        |(min, max), &p| (min.min(p), max.max(p)),
    )
}

/// Even-odd point-in-polygon test.
fn contains(polygon: &[DVec2], p: DVec2) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn distance_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Split a polyline into the visible pieces of a dash pattern.
///
/// The pattern runs continuously across vertices.
fn dash_segments(points: &[DVec2], dash: Option<[f64; 2]>) -> Vec<(DVec2, DVec2)> {
    let segments = points.windows(2).map(|w| (w[0], w[1]));
    let [on, off] = match dash {
        Some([on, off]) if on > 0.0 && off >= 0.0 => [on, off],
        _ => return segments.collect(),
    };

    let mut pieces = Vec::new();
    let mut drawing = true;
    let mut remaining = on;
    for (a, b) in segments {
        let length = a.distance(b);
        if length == 0.0 {
            continue;
        }
        let dir = (b - a) / length;
        let mut pos = 0.0;
        while pos < length {
            let step = remaining.min(length - pos);
            if drawing {
                pieces.push((a + dir * pos, a + dir * (pos + step)));
            }
            pos += step;
            remaining -= step;
            if remaining <= 0.0 {
                drawing = !drawing;
                remaining = if drawing { on } else { off };
            }
        }
    }
    pieces
}

impl Canvas for Raster {
    fn save(&mut self) {
        self.blend.save();
    }

    fn restore(&mut self) {
        self.blend.restore();
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend.set(mode);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, paint: Paint) {
        if radius <= 0.0 {
            return;
        }
        let r = DVec2::splat(radius);
        let r_sq = radius * radius;
        self.fill_where(center - r, center + r, paint, |p| {
            p.distance_squared(center) <= r_sq
        });
    }

    fn fill_polygon(&mut self, points: &[DVec2], paint: Paint) {
        if points.len() < 3 {
            return;
        }
        let (min, max) = bounds(points);
        self.fill_where(min, max, paint, |p| contains(points, p));
    }

    fn stroke_path(&mut self, points: &[DVec2], stroke: &Stroke) {
        if points.len() < 2 || stroke.width <= 0.0 {
            return;
        }
        let pieces = dash_segments(points, stroke.dash);
        if pieces.is_empty() {
            return;
        }
        let half = stroke.width / 2.0;
        let (min, max) = bounds(points);
        let pad = DVec2::splat(half);
        // One coverage test per pixel so joints are not blended twice
        self.fill_where(min - pad, max + pad, stroke.paint, |p| {
            pieces
                .iter()
                .any(|&(a, b)| distance_to_segment(p, a, b) <= half)
        });
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, stroke: &Stroke) {
        let points: Vec<DVec2> = (0..=CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = i as f64 / CIRCLE_SEGMENTS as f64 * TAU;
                center + DVec2::from_angle(angle) * radius
            })
            .collect();
        self.stroke_path(&points, stroke);
    }

    fn fill_glyph(&mut self, center: DVec2, size: f64, _rotation: f64, _glyph: &str, paint: Paint) {
        self.fill_circle(center, size / 2.0, paint);
    }
}
