//! Live preview inside an egui panel.
//!
//! [`EguiCanvas`] maps canvas pixels onto a screen rectangle and forwards draw
//! calls to an [`egui::Painter`]. Additive blending uses premultiplied colors
//! with zero alpha, which egui composites as `dst + src`.

use egui::emath::Rot2;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Vec2};
use pfxd::canvas::BlendStack;
use pfxd::{BlendMode, Canvas, DVec2, Paint, Stroke};

/// A [`Canvas`] that paints into an egui rectangle.
pub struct EguiCanvas<'a> {
    painter: &'a Painter,
    rect: Rect,
    scale: f32,
    blend: BlendStack,
}

impl<'a> EguiCanvas<'a> {
    /// Fit a `canvas_size` pixel area into `rect`, preserving aspect ratio.
    pub fn new(painter: &'a Painter, rect: Rect, canvas_size: DVec2) -> Self {
        let scale = (rect.width() / canvas_size.x as f32).min(rect.height() / canvas_size.y as f32);
        let used = Vec2::new(canvas_size.x as f32, canvas_size.y as f32) * scale;
        let rect = Rect::from_center_size(rect.center(), used);
        Self {
            painter,
            rect,
            scale,
            blend: BlendStack::default(),
        }
    }

    /// Screen area the canvas covers.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Map a screen position back to canvas pixels, for click-to-move.
    pub fn to_canvas(&self, pos: Pos2) -> DVec2 {
        let local = (pos - self.rect.min) / self.scale;
        DVec2::new(local.x as f64, local.y as f64)
    }

    fn to_screen(&self, point: DVec2) -> Pos2 {
        self.rect.min + Vec2::new(point.x as f32, point.y as f32) * self.scale
    }

    fn color(&self, paint: Paint) -> Color32 {
        let alpha = paint.alpha.clamp(0.0, 1.0);
        let premul = |c: u8| (c as f64 * alpha).round() as u8;
        let a = match self.blend.current() {
            BlendMode::Normal => (alpha * 255.0).round() as u8,
            BlendMode::Additive => 0,
        };
        Color32::from_rgba_premultiplied(
            premul(paint.color.r),
            premul(paint.color.g),
            premul(paint.color.b),
            a,
        )
    }

    fn stroke(&self, stroke: &Stroke) -> egui::Stroke {
        egui::Stroke::new(stroke.width as f32 * self.scale, self.color(stroke.paint))
    }
}

impl Canvas for EguiCanvas<'_> {
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
        self.painter.circle_filled(
            self.to_screen(center),
            radius as f32 * self.scale,
            self.color(paint),
        );
    }

    fn fill_polygon(&mut self, points: &[DVec2], paint: Paint) {
        if points.len() < 3 {
            return;
        }
        // Particle outlines are star-shaped around their centroid, so a fan
        // of triangles fills them exactly.
        let centroid = points.iter().copied().sum::<DVec2>() / points.len() as f64;
        let fill = self.color(paint);
        let hub = self.to_screen(centroid);
        let fan = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .map(|(&a, &b)| {
                Shape::convex_polygon(
                    vec![hub, self.to_screen(a), self.to_screen(b)],
                    fill,
                    egui::Stroke::NONE,
                )
            });
        self.painter.extend(fan);
    }

    fn stroke_path(&mut self, points: &[DVec2], stroke: &Stroke) {
        let path: Vec<Pos2> = points.iter().map(|&p| self.to_screen(p)).collect();
        let egui_stroke = self.stroke(stroke);
        match stroke.dash {
            Some([dash, gap]) => self.painter.extend(Shape::dashed_line(
                &path,
                egui_stroke,
                dash as f32 * self.scale,
                gap as f32 * self.scale,
            )),
            None => {
                self.painter.add(Shape::line(path, egui_stroke));
            }
        }
    }

    fn stroke_circle(&mut self, center: DVec2, radius: f64, stroke: &Stroke) {
        if stroke.dash.is_none() {
            self.painter.circle_stroke(
                self.to_screen(center),
                radius as f32 * self.scale,
                self.stroke(stroke),
            );
            return;
        }
        let ring: Vec<DVec2> = (0..=64)
            .map(|i| {
                let theta = i as f64 / 64.0 * std::f64::consts::TAU;
                center + DVec2::from_angle(theta) * radius
            })
            .collect();
        self.stroke_path(&ring, stroke);
    }

    fn fill_glyph(&mut self, center: DVec2, size: f64, rotation: f64, glyph: &str, paint: Paint) {
        let font = FontId::proportional(size as f32 * self.scale);
        let color = self.color(paint);
        if rotation == 0.0 {
            self.painter
                .text(self.to_screen(center), Align2::CENTER_CENTER, glyph, font, color);
            return;
        }
        let galley = self.painter.layout_no_wrap(glyph.to_string(), font, color);
        let angle = rotation as f32;
        let half = galley.size() / 2.0;
        let pos = self.to_screen(center) - Rot2::from_angle(angle) * half;
        self.painter
            .add(egui::epaint::TextShape::new(pos, galley, color).with_angle(angle));
    }
}
