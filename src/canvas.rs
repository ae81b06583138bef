//! Drawing surface abstraction.
//!
//! Particles and emitter indicators render through the [`Canvas`] trait, so
//! the simulation never depends on a concrete backend. Coordinates are in
//! canvas pixels with +y pointing down.
//!
//! # Backends
//!
//! | Type | Description |
//! |------|-------------|
//! | [`DrawList`](crate::DrawList) | Records commands, used for tests and headless callers |
//! | [`Raster`](crate::Raster) | CPU rasterizer with PNG export |
//!
//! Like a 2D canvas context, blend state is scoped by [`Canvas::save`] and
//! [`Canvas::restore`]; a restore brings back the blend mode that was active
//! at the matching save.

use crate::color::Paint;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// How a layer's particles composite onto what is already drawn.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
pub enum BlendMode {
    /// Regular alpha compositing.
    #[default]
    #[serde(rename = "source-over")]
    Normal,
    /// Colors add up toward white; used for glows.
    #[serde(rename = "lighter")]
    Additive,
}

impl BlendMode {
    pub fn variants() -> &'static [&'static str] {
        &["source-over", "lighter"]
    }

    /// Name as written in project files.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::Normal => "source-over",
            BlendMode::Additive => "lighter",
        }
    }
}

/// Line style for outlines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f64,
    /// `[dash, gap]` lengths, `None` for a solid line.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    pub fn solid(paint: Paint, width: f64) -> Self {
        Self {
            paint,
            width,
            dash: None,
        }
    }

    pub fn dashed(paint: Paint, width: f64, dash: f64, gap: f64) -> Self {
        Self {
            paint,
            width,
            dash: Some([dash, gap]),
        }
    }

    pub fn with_dash(self, dash: Option<[f64; 2]>) -> Self {
        Self { dash, ..self }
    }
}

/// A 2D drawing target.
pub trait Canvas {
    /// Push the current blend state.
    fn save(&mut self);

    /// Pop back to the blend state of the matching [`Canvas::save`].
    fn restore(&mut self);

    /// Set the blend mode for subsequent draws.
    fn set_blend_mode(&mut self, mode: BlendMode);

    fn fill_circle(&mut self, center: DVec2, radius: f64, paint: Paint);

    /// Fill a closed simple polygon.
    fn fill_polygon(&mut self, points: &[DVec2], paint: Paint);

    /// Stroke an open polyline.
    fn stroke_path(&mut self, points: &[DVec2], stroke: &Stroke);

    fn stroke_circle(&mut self, center: DVec2, radius: f64, stroke: &Stroke);

    /// Draw a text glyph centered on `center`, `size` pixels tall.
    fn fill_glyph(&mut self, center: DVec2, size: f64, rotation: f64, glyph: &str, paint: Paint);

    fn stroke_segment(&mut self, from: DVec2, to: DVec2, stroke: &Stroke) {
        self.stroke_path(&[from, to], stroke);
    }

    fn stroke_rect(&mut self, min: DVec2, size: DVec2, stroke: &Stroke) {
        let max = min + size;
        self.stroke_path(
            &[
                min,
                DVec2::new(max.x, min.y),
                max,
                DVec2::new(min.x, max.y),
                min,
            ],
            stroke,
        );
    }
}

/// Tracks the blend mode under nested save/restore pairs.
///
/// Shared by the canvas backends.
#[derive(Clone, Debug, Default)]
pub struct BlendStack {
    current: BlendMode,
    saved: Vec<BlendMode>,
}

impl BlendStack {
    pub fn current(&self) -> BlendMode {
        self.current
    }

    pub fn set(&mut self, mode: BlendMode) {
        self.current = mode;
    }

    pub fn save(&mut self) {
        self.saved.push(self.current);
    }

    /// Unbalanced restores are ignored, as on an HTML canvas.
    pub fn restore(&mut self) {
        if let Some(mode) = self.saved.pop() {
            self.current = mode;
        }
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}
