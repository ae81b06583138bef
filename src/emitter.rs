//! Particle emitters.
//!
//! An emitter is one layer of an effect. It spawns particles at a steady rate
//! from a point, line, circle or rectangle, advances them every frame and
//! renders them with its blend mode.
//!
//! # Emitter Shapes
//!
//! | Shape | Spawn position |
//! |-------|----------------|
//! | [`EmitterShape::Point`] | The emitter position |
//! | [`EmitterShape::Line`] | Uniform along a horizontal line of `width` |
//! | [`EmitterShape::Circle`] | Uniform over the disc of `radius`, or on its rim when not `filled` |
//! | [`EmitterShape::Rectangle`] | Uniform inside a `width` x `height` box |
//!
//! # Spawn Rate
//!
//! Spawning uses a fractional accumulator: each frame adds `rate * dt` and one
//! particle is spawned per whole unit. The residual carries over, so the
//! average rate is independent of the frame rate.
//!
//! # Example
//!
//! ```ignore
//! let mut emitter = Emitter::new("Sparks").with_seed(1);
//! emitter.update_config(&LayerData {
//!     emitter: Some(EmitterData { rate: Some(120.0), ..Default::default() }),
//!     ..Default::default()
//! });
//! emitter.update(1.0 / 60.0);
//! emitter.draw(&mut canvas, true);
//! ```

use crate::canvas::{BlendMode, Canvas, Stroke};
use crate::color::{Paint, Rgb};
use crate::particle::{Particle, ParticleConfig, ParticleShape};
use crate::schema::{EmitterData, LayerData, LegacyProject, ParticleData, LEGACY_VERSION};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::sync::Arc;

/// Name given to an emitter created without one.
pub const DEFAULT_NAME: &str = "Layer 1";

/// Glyph used by the `emoji` particle shape until one is chosen.
pub const DEFAULT_GLYPH: &str = "❤️";

/// Color of the emitter indicator overlay.
const INDICATOR_PAINT: Paint = Paint::new(Rgb::new(155, 89, 182), 0.5);

/// Length of the indicator's direction line in pixels.
const INDICATOR_DIRECTION_LENGTH: f64 = 20.0;

/// Region particles spawn from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmitterShape {
    #[default]
    Point,
    Line,
    Circle,
    Rectangle,
}

impl EmitterShape {
    pub const ALL: [EmitterShape; 4] = [
        EmitterShape::Point,
        EmitterShape::Line,
        EmitterShape::Circle,
        EmitterShape::Rectangle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmitterShape::Point => "point",
            EmitterShape::Line => "line",
            EmitterShape::Circle => "circle",
            EmitterShape::Rectangle => "rectangle",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["point", "line", "circle", "rectangle"]
    }
}

/// Where and how fast particles are emitted.
#[derive(Clone, Debug, PartialEq)]
pub struct EmissionSettings {
    pub position: DVec2,
    /// Particles per second.
    pub rate: f64,
    /// Base lifetime in seconds.
    pub lifetime: f64,
    pub speed: f64,
    /// Degrees.
    pub spread: f64,
    /// Pixels per second squared, positive is down.
    pub gravity: f64,
    /// Degrees.
    pub angle: f64,
    pub shape: EmitterShape,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    /// Circle only.
    pub filled: bool,
}

impl Default for EmissionSettings {
    fn default() -> Self {
        Self {
            position: DVec2::new(400.0, 300.0),
            rate: 50.0,
            lifetime: 2.0,
            speed: 100.0,
            spread: 45.0,
            gravity: 0.0,
            angle: -90.0,
            shape: EmitterShape::Point,
            width: 100.0,
            height: 50.0,
            radius: 50.0,
            filled: true,
        }
    }
}

impl EmissionSettings {
    /// Overwrite the fields present in `data`.
    pub fn merge(&mut self, data: &EmitterData) {
        if let Some(x) = data.x {
            self.position.x = x;
        }
        if let Some(y) = data.y {
            self.position.y = y;
        }
        if let Some(rate) = data.rate {
            self.rate = rate;
        }
        if let Some(lifetime) = data.lifetime {
            self.lifetime = lifetime;
        }
        if let Some(speed) = data.speed {
            self.speed = speed;
        }
        if let Some(spread) = data.spread {
            self.spread = spread;
        }
        if let Some(gravity) = data.gravity {
            self.gravity = gravity;
        }
        if let Some(angle) = data.angle {
            self.angle = angle;
        }
        if let Some(shape) = data.emitter_shape {
            self.shape = shape;
        }
        if let Some(width) = data.emitter_width {
            self.width = width;
        }
        if let Some(height) = data.emitter_height {
            self.height = height;
        }
        if let Some(radius) = data.emitter_radius {
            self.radius = radius;
        }
        if let Some(filled) = data.emitter_filled {
            self.filled = filled;
        }
    }

    pub fn to_data(&self) -> EmitterData {
        EmitterData {
            x: Some(self.position.x),
            y: Some(self.position.y),
            rate: Some(self.rate),
            lifetime: Some(self.lifetime),
            speed: Some(self.speed),
            spread: Some(self.spread),
            gravity: Some(self.gravity),
            angle: Some(self.angle),
            emitter_shape: Some(self.shape),
            emitter_width: Some(self.width),
            emitter_height: Some(self.height),
            emitter_radius: Some(self.radius),
            emitter_filled: Some(self.filled),
        }
    }

    /// Sample a spawn position for the configured shape.
    ///
    /// Filled circles take the square root of the radial sample so points
    /// are uniform per unit area rather than bunched at the center. Only
    /// circles have an edge-only mode.
    pub fn sample_spawn_position<R: Rng>(&self, rng: &mut R) -> DVec2 {
        let origin = self.position;
        match self.shape {
            EmitterShape::Point => origin,
            EmitterShape::Line => {
                DVec2::new(origin.x + (rng.gen::<f64>() - 0.5) * self.width, origin.y)
            }
            EmitterShape::Circle => {
                let angle = rng.gen::<f64>() * TAU;
                let radius = if self.filled {
                    rng.gen::<f64>().sqrt() * self.radius
                } else {
                    self.radius
                };
                origin + DVec2::from_angle(angle) * radius
            }
            EmitterShape::Rectangle => DVec2::new(
                origin.x + (rng.gen::<f64>() - 0.5) * self.width,
                origin.y + (rng.gen::<f64>() - 0.5) * self.height,
            ),
        }
    }
}

/// How particles look over their life.
#[derive(Clone, Debug, PartialEq)]
pub struct AppearanceSettings {
    pub shape: ParticleShape,
    /// Glyph for [`ParticleShape::Emoji`].
    pub emoji: String,
    pub size_start: f64,
    pub size_end: f64,
    /// `#rrggbb`
    pub color_start: String,
    /// `#rrggbb`
    pub color_end: String,
    pub opacity_start: f64,
    pub opacity_end: f64,
    pub blend_mode: BlendMode,
    /// Velocity kept per 1/60 s, 1 = no friction.
    pub friction: f64,
}

impl Default for AppearanceSettings {
    fn default() -> Self {
        Self {
            shape: ParticleShape::Circle,
            emoji: DEFAULT_GLYPH.to_string(),
            size_start: 12.0,
            size_end: 4.0,
            color_start: "#ff6600".to_string(),
            color_end: "#ff0000".to_string(),
            opacity_start: 1.0,
            opacity_end: 0.0,
            blend_mode: BlendMode::Normal,
            friction: 1.0,
        }
    }
}

impl AppearanceSettings {
    /// Overwrite the fields present in `data`.
    pub fn merge(&mut self, data: &ParticleData) {
        if let Some(shape) = data.shape {
            self.shape = shape;
        }
        if let Some(emoji) = &data.emoji {
            self.emoji = emoji.clone();
        }
        if let Some(size_start) = data.size_start {
            self.size_start = size_start;
        }
        if let Some(size_end) = data.size_end {
            self.size_end = size_end;
        }
        if let Some(color) = &data.color_start {
            warn_unparseable(color);
            self.color_start = color.clone();
        }
        if let Some(color) = &data.color_end {
            warn_unparseable(color);
            self.color_end = color.clone();
        }
        if let Some(opacity_start) = data.opacity_start {
            self.opacity_start = opacity_start;
        }
        if let Some(opacity_end) = data.opacity_end {
            self.opacity_end = opacity_end;
        }
        if let Some(blend_mode) = data.blend_mode {
            self.blend_mode = blend_mode;
        }
        if let Some(friction) = data.friction {
            self.friction = friction;
        }
    }

    pub fn to_data(&self) -> ParticleData {
        ParticleData {
            shape: Some(self.shape),
            emoji: Some(self.emoji.clone()),
            size_start: Some(self.size_start),
            size_end: Some(self.size_end),
            color_start: Some(self.color_start.clone()),
            color_end: Some(self.color_end.clone()),
            opacity_start: Some(self.opacity_start),
            opacity_end: Some(self.opacity_end),
            blend_mode: Some(self.blend_mode),
            friction: Some(self.friction),
        }
    }
}

fn warn_unparseable(color: &str) {
    if Rgb::from_hex(color).is_none() {
        log::warn!("color {color:?} is not #rrggbb, particles will render white");
    }
}

/// A particle emitter and the particles it owns.
#[derive(Clone, Debug)]
pub struct Emitter {
    pub name: String,
    pub visible: bool,
    pub emission: EmissionSettings,
    pub appearance: AppearanceSettings,
    particles: Vec<Particle>,
    accumulator: f64,
    paused: bool,
    rng: StdRng,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl Emitter {
    /// Create an emitter with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            emission: EmissionSettings::default(),
            appearance: AppearanceSettings::default(),
            particles: Vec::new(),
            accumulator: 0.0,
            paused: false,
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a deterministic random sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Build an emitter from a layer, applying defaults for absent fields.
    pub fn from_layer_data(data: &LayerData) -> Self {
        let mut emitter = Self::default();
        emitter.update_config(data);
        emitter
    }

    /// Build an emitter from a single-layer v1.x document.
    pub fn from_legacy(data: &LegacyProject) -> Self {
        let mut emitter = Self::default();
        emitter.emission.merge(&data.emitter);
        emitter.appearance.merge(&data.particle);
        emitter
    }

    /// Merge a partial configuration.
    ///
    /// Only fields present in `data` change. Live particles keep the
    /// settings they were spawned with.
    pub fn update_config(&mut self, data: &LayerData) {
        if let Some(name) = &data.name {
            self.name = name.clone();
        }
        if let Some(visible) = data.visible {
            self.visible = visible;
        }
        if let Some(emitter) = &data.emitter {
            self.emission.merge(emitter);
        }
        if let Some(particle) = &data.particle {
            self.appearance.merge(particle);
        }
    }

    /// Full layer description, without live particles.
    pub fn to_layer_data(&self) -> LayerData {
        LayerData {
            name: Some(self.name.clone()),
            visible: Some(self.visible),
            emitter: Some(self.emission.to_data()),
            particle: Some(self.appearance.to_data()),
        }
    }

    /// Single-layer v1.1 document.
    pub fn to_legacy(&self) -> LegacyProject {
        LegacyProject {
            version: LEGACY_VERSION.to_string(),
            emitter: self.emission.to_data(),
            particle: self.appearance.to_data(),
        }
    }

    /// Snapshot of the settings new particles are spawned with.
    pub fn particle_config(&self) -> ParticleConfig {
        let appearance = &self.appearance;
        ParticleConfig {
            lifetime: self.emission.lifetime,
            speed: self.emission.speed,
            spread: self.emission.spread,
            gravity: self.emission.gravity,
            friction: appearance.friction,
            angle: self.emission.angle,
            shape: appearance.shape,
            glyph: appearance
                .shape
                .is_glyph()
                .then(|| Arc::from(appearance.emoji.as_str())),
            size_start: appearance.size_start,
            size_end: appearance.size_end,
            color_start: Rgb::parse_or_white(&appearance.color_start),
            color_end: Rgb::parse_or_white(&appearance.color_end),
            opacity_start: appearance.opacity_start,
            opacity_end: appearance.opacity_end,
        }
    }

    /// Sample a spawn position for the current emitter shape.
    pub fn spawn_position(&mut self) -> DVec2 {
        self.emission.sample_spawn_position(&mut self.rng)
    }

    /// Spawn one particle.
    pub fn spawn(&mut self) {
        let config = self.particle_config();
        self.spawn_with(&config);
    }

    fn spawn_with(&mut self, config: &ParticleConfig) {
        let position = self.spawn_position();
        let particle = Particle::spawn(position, config, &mut self.rng);
        self.particles.push(particle);
    }

    /// Advance the emitter by `dt` seconds.
    ///
    /// Live particles are advanced and the dead ones dropped even while
    /// paused; pausing only stops new spawns. Particles spawned this frame
    /// start at their spawn position with age zero.
    pub fn update(&mut self, dt: f64) {
        self.particles.retain_mut(|particle| particle.update(dt));

        if self.paused {
            return;
        }

        self.accumulator += self.emission.rate.max(0.0) * dt;
        if self.accumulator < 1.0 {
            return;
        }

        let config = self.particle_config();
        while self.accumulator >= 1.0 {
            self.spawn_with(&config);
            self.accumulator -= 1.0;
        }
    }

    /// Render particles, then optionally the emitter indicator on top.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, show_indicator: bool) {
        canvas.save();
        canvas.set_blend_mode(self.appearance.blend_mode);
        for particle in &self.particles {
            particle.draw(canvas);
        }
        canvas.restore();

        if show_indicator {
            self.draw_indicator(canvas);
        }
    }

    /// Outline of the spawn region, a center marker and the emission direction.
    pub fn draw_indicator<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let emission = &self.emission;
        let center = emission.position;
        let solid = Stroke::solid(INDICATOR_PAINT, 2.0);
        let dashed = solid.with_dash(Some([4.0, 4.0]));

        canvas.save();
        canvas.set_blend_mode(BlendMode::Normal);

        match emission.shape {
            EmitterShape::Line => {
                let half = DVec2::new(emission.width / 2.0, 0.0);
                canvas.stroke_segment(center - half, center + half, &dashed);
                canvas.stroke_circle(center - half, 4.0, &solid);
                canvas.stroke_circle(center + half, 4.0, &solid);
            }
            EmitterShape::Circle => {
                canvas.stroke_circle(center, emission.radius, &dashed);
                canvas.fill_circle(center, 3.0, INDICATOR_PAINT);
            }
            EmitterShape::Rectangle => {
                let size = DVec2::new(emission.width, emission.height);
                canvas.stroke_rect(center - size / 2.0, size, &dashed);
                canvas.fill_circle(center, 3.0, INDICATOR_PAINT);
            }
            EmitterShape::Point => {
                canvas.stroke_circle(center, 8.0, &solid);
            }
        }

        let direction = DVec2::from_angle(emission.angle.to_radians());
        canvas.stroke_segment(
            center,
            center + direction * INDICATOR_DIRECTION_LENGTH,
            &solid,
        );

        canvas.restore();
    }

    pub fn position(&self) -> DVec2 {
        self.emission.position
    }

    pub fn set_position(&mut self, position: DVec2) {
        self.emission.position = position;
    }

    /// Remove every particle and reset the spawn accumulator.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.accumulator = 0.0;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Flip the paused flag. Returns `true` if the emitter is now playing.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        !self.paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Fractional spawn credit carried into the next frame.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw_list::{DrawList, Primitive};
    use approx::assert_relative_eq;

    fn emitter() -> Emitter {
        Emitter::new("Test").with_seed(42)
    }

    #[test]
    fn test_defaults() {
        let e = Emitter::default();
        assert_eq!(e.name, "Layer 1");
        assert!(e.visible);
        assert_eq!(e.position(), DVec2::new(400.0, 300.0));
        assert_eq!(e.emission.shape, EmitterShape::Point);
        assert_eq!(e.appearance.emoji, DEFAULT_GLYPH);
        assert_eq!(e.appearance.blend_mode, BlendMode::Normal);
        assert_eq!(e.particle_count(), 0);
    }

    #[test]
    fn test_update_config_is_partial() {
        let mut e = emitter();
        e.set_position(DVec2::new(10.0, 20.0));
        e.update_config(&LayerData {
            emitter: Some(EmitterData {
                rate: Some(80.0),
                ..Default::default()
            }),
            particle: Some(ParticleData {
                color_end: Some("#00ff00".into()),
                ..Default::default()
            }),
            ..Default::default()
        });

        assert_eq!(e.emission.rate, 80.0);
        assert_eq!(e.appearance.color_end, "#00ff00");
        // Untouched fields survive
        assert_eq!(e.position(), DVec2::new(10.0, 20.0));
        assert_eq!(e.emission.lifetime, 2.0);
        assert_eq!(e.appearance.color_start, "#ff6600");
        assert_eq!(e.name, "Test");
    }

    #[test]
    fn test_accumulator_spawns_whole_units() {
        let mut e = emitter();
        e.emission.rate = 10.0;

        e.update(0.15); // 1.5 credits
        assert_eq!(e.particle_count(), 1);
        assert_relative_eq!(e.accumulator(), 0.5, epsilon = 1e-12);

        e.update(0.06); // 0.5 + 0.6
        assert_eq!(e.particle_count(), 2);
        assert!(e.accumulator() < 1.0);
    }

    #[test]
    fn test_negative_rate_spawns_nothing_and_keeps_accumulator() {
        let mut e = Emitter::from_layer_data(&LayerData::from_value(&serde_json::json!({
            "emitter": { "rate": -50 }
        })))
        .with_seed(3);
        assert_eq!(e.emission.rate, -50.0);

        for _ in 0..60 {
            e.update(1.0 / 60.0);
        }
        assert_eq!(e.particle_count(), 0);
        assert_eq!(e.accumulator(), 0.0);

        e.emission.rate = 50.0;
        for _ in 0..60 {
            e.update(1.0 / 60.0);
        }
        assert!((49..=50).contains(&e.particle_count()));
    }

    #[test]
    fn test_average_rate_is_frame_rate_independent() {
        let mut fine = emitter();
        fine.emission.lifetime = 100.0;
        let mut coarse = fine.clone();

        for _ in 0..120 {
            fine.update(1.0 / 120.0);
        }
        coarse.update(1.0);

        assert_eq!(coarse.particle_count(), 50);
        assert!((fine.particle_count() as i64 - 50).abs() <= 1);
    }

    #[test]
    fn test_pause_stops_spawning_not_motion() {
        let mut e = emitter();
        e.update(0.1);
        let count = e.particle_count();
        assert!(count > 0);
        let before = e.particles()[0].position;

        e.pause();
        assert!(e.is_paused());
        e.update(0.1);
        assert_eq!(e.particle_count(), count);
        assert_ne!(e.particles()[0].position, before);

        assert!(e.toggle_pause());
        assert!(!e.is_paused());
        assert!(!e.toggle_pause());
        e.resume();
        e.update(0.1);
        assert!(e.particle_count() > count);
    }

    #[test]
    fn test_dead_particles_are_removed() {
        let mut e = emitter();
        e.emission.lifetime = 0.5;
        e.update(0.2);
        assert_eq!(e.particle_count(), 10);
        e.pause();
        // Lifetimes are at most 0.6s
        e.update(0.7);
        assert_eq!(e.particle_count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut e = emitter();
        e.update(0.13);
        assert!(e.particle_count() > 0);
        e.clear();
        assert_eq!(e.particle_count(), 0);
        assert_eq!(e.accumulator(), 0.0);
    }

    #[test]
    fn test_spawn_positions_per_shape() {
        let mut e = emitter();
        e.set_position(DVec2::new(100.0, 100.0));

        e.emission.shape = EmitterShape::Point;
        assert_eq!(e.spawn_position(), DVec2::new(100.0, 100.0));

        e.emission.shape = EmitterShape::Line;
        for _ in 0..200 {
            let p = e.spawn_position();
            assert_eq!(p.y, 100.0);
            assert!((p.x - 100.0).abs() <= 50.0);
        }

        e.emission.shape = EmitterShape::Rectangle;
        for _ in 0..200 {
            let p = e.spawn_position();
            assert!((p.x - 100.0).abs() <= 50.0);
            assert!((p.y - 100.0).abs() <= 25.0);
        }

        e.emission.shape = EmitterShape::Circle;
        e.emission.filled = true;
        for _ in 0..200 {
            assert!(e.spawn_position().distance(DVec2::new(100.0, 100.0)) <= 50.0);
        }
    }

    #[test]
    fn test_edge_only_applies_to_circle() {
        let mut e = emitter();
        e.emission.filled = false;
        e.emission.shape = EmitterShape::Rectangle;
        let inside = (0..200)
            .map(|_| e.spawn_position() - e.position())
            .any(|d| d.x.abs() < 40.0 && d.y.abs() < 20.0);
        assert!(inside, "rectangles ignore the edge-only flag");
    }

    #[test]
    fn test_draw_isolates_indicator_blend() {
        let mut e = emitter();
        e.appearance.blend_mode = BlendMode::Additive;
        e.update(0.1);

        let mut list = DrawList::new();
        e.draw(&mut list, true);

        let particles = e.particle_count();
        let (particle_cmds, indicator_cmds) = list.commands().split_at(particles);
        assert!(particle_cmds.iter().all(|c| c.blend == BlendMode::Additive));
        assert!(!indicator_cmds.is_empty());
        assert!(indicator_cmds.iter().all(|c| c.blend == BlendMode::Normal));
        assert_eq!(list.save_depth(), 0);
    }

    #[test]
    fn test_indicator_outline_per_shape() {
        let mut e = emitter();
        let mut list = DrawList::new();

        e.emission.shape = EmitterShape::Circle;
        e.draw(&mut list, true);
        assert!(matches!(
            list.commands()[0].primitive,
            Primitive::StrokeCircle { radius, stroke, .. } if radius == 50.0 && stroke.dash.is_some()
        ));

        list.clear();
        e.emission.shape = EmitterShape::Rectangle;
        e.draw(&mut list, false);
        assert!(list.is_empty());
        e.draw(&mut list, true);
        match &list.commands()[0].primitive {
            Primitive::StrokePath { points, .. } => {
                assert_eq!(points.len(), 5);
                assert_eq!(points[0], DVec2::new(350.0, 275.0));
            }
            other => panic!("unexpected {:?}", other),
        }

        // Direction line last, pointing up for -90 degrees
        match &list.commands().last().unwrap().primitive {
            Primitive::StrokePath { points, .. } => {
                assert_relative_eq!(points[1].x, 400.0, epsilon = 1e-9);
                assert_relative_eq!(points[1].y, 280.0, epsilon = 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_layer_round_trip() {
        let mut e = emitter();
        e.name = "Glow".into();
        e.visible = false;
        e.emission.shape = EmitterShape::Circle;
        e.emission.spread = 0.0;
        e.emission.gravity = -12.5;
        e.appearance.blend_mode = BlendMode::Additive;
        e.appearance.shape = ParticleShape::Snowflake;
        e.appearance.friction = 0.97;
        e.update(0.5);

        let data = e.to_layer_data();
        let copy = Emitter::from_layer_data(&data);
        assert_eq!(copy.to_layer_data(), data);
        assert_eq!(copy.particle_count(), 0);
    }

    #[test]
    fn test_legacy_export_has_no_identity() {
        let e = emitter();
        let legacy = e.to_legacy();
        assert_eq!(legacy.version, "1.1");
        let value = serde_json::to_value(&legacy).unwrap();
        assert!(value.get("name").is_none());
        assert!(value.get("visible").is_none());
        assert_eq!(value["emitter"]["emitterShape"], "point");
        assert_eq!(value["particle"]["blendMode"], "source-over");

        let restored = Emitter::from_legacy(&legacy);
        assert_eq!(restored.emission, e.emission);
        assert_eq!(restored.appearance, e.appearance);
    }

    #[test]
    fn test_particle_config_projection() {
        let mut e = emitter();
        e.appearance.shape = ParticleShape::Emoji;
        e.appearance.emoji = "🔥".into();
        e.appearance.color_start = "bogus".into();
        let config = e.particle_config();
        assert_eq!(config.glyph.as_deref(), Some("🔥"));
        assert_eq!(config.color_start, Rgb::WHITE);
        assert_eq!(config.angle, -90.0);

        e.appearance.shape = ParticleShape::Star;
        assert!(e.particle_config().glyph.is_none());
    }
}
