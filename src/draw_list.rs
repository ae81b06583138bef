//! A canvas that records draw calls instead of producing pixels.

use crate::canvas::{BlendMode, BlendStack, Canvas, Stroke};
use crate::color::Paint;
use glam::DVec2;

/// Primitive recorded by a [`DrawList`].
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    FillCircle {
        center: DVec2,
        radius: f64,
        paint: Paint,
    },
    FillPolygon {
        points: Vec<DVec2>,
        paint: Paint,
    },
    StrokePath {
        points: Vec<DVec2>,
        stroke: Stroke,
    },
    StrokeCircle {
        center: DVec2,
        radius: f64,
        stroke: Stroke,
    },
    FillGlyph {
        center: DVec2,
        size: f64,
        rotation: f64,
        glyph: String,
        paint: Paint,
    },
}

/// A recorded primitive with the blend mode that was active when it was drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    pub blend: BlendMode,
    pub primitive: Primitive,
}

/// Recording canvas.
#[derive(Clone, Debug, Default)]
pub struct DrawList {
    blend: BlendStack,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all recorded commands, keeping blend state.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Current save/restore nesting depth.
    pub fn save_depth(&self) -> usize {
        self.blend.depth()
    }

    fn push(&mut self, primitive: Primitive) {
        self.commands.push(DrawCommand {
            blend: self.blend.current(),
            primitive,
        });
    }
}

impl Canvas for DrawList {
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
        self.push(Primitive::FillCircle { center, radius, paint });
    }

    fn fill_polygon(&mut self, points: &[DVec2], paint: Paint) {
        self.push(Primitive::FillPolygon {
            points: points.to_vec(),
            paint,
        });
    }

    fn stroke_path(&mut self, points: &[DVec2], stroke: &Stroke) {
        self.push(Primitive::StrokePath {
            points: points.to_vec(),
            stroke: *stroke,
        });
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, stroke: &Stroke) {
        self.push(Primitive::StrokeCircle {
            center,
            radius,
            stroke: *stroke,
        });
    }

    fn fill_glyph(&mut self, center: DVec2, size: f64, rotation: f64, glyph: &str, paint: Paint) {
        self.push(Primitive::FillGlyph {
            center,
            size,
            rotation,
            glyph: glyph.to_string(),
            paint,
        });
    }
}
