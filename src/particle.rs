//! Individual particles.
//!
//! A particle is born with randomized physics and fixed visual extremes. Its
//! look at any moment is a pure function of its normalized age
//! `t = min(age / lifetime, 1)`: size, opacity and color are each linearly
//! interpolated between the start and end values.

use crate::canvas::{Canvas, Stroke};
use crate::color::{lerp, Paint, Rgb};
use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_3, PI, TAU};
use std::sync::Arc;

/// Ratio of a star's inner radius to its outer radius.
pub const STAR_INNER_RATIO: f64 = 0.4;

/// Number of points on a star.
pub const STAR_SPIKES: usize = 5;

/// Friction is expressed per tick of this rate.
pub const FRICTION_REFERENCE_HZ: f64 = 60.0;

/// Half-range of the random rotation speed (rad/s) for geometric shapes.
const ROTATION_SPEED_RANGE: f64 = 2.0;

/// Particle render shape.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    #[default]
    Circle,
    Square,
    Star,
    Spark,
    Snowflake,
    /// A text glyph, usually an emoji.
    Emoji,
}

impl ParticleShape {
    pub const ALL: [ParticleShape; 6] = [
        ParticleShape::Circle,
        ParticleShape::Square,
        ParticleShape::Star,
        ParticleShape::Spark,
        ParticleShape::Snowflake,
        ParticleShape::Emoji,
    ];

    /// Shapes drawn with geometry rather than a glyph.
    pub const GEOMETRIC: [ParticleShape; 5] = [
        ParticleShape::Circle,
        ParticleShape::Square,
        ParticleShape::Star,
        ParticleShape::Spark,
        ParticleShape::Snowflake,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticleShape::Circle => "circle",
            ParticleShape::Square => "square",
            ParticleShape::Star => "star",
            ParticleShape::Spark => "spark",
            ParticleShape::Snowflake => "snowflake",
            ParticleShape::Emoji => "emoji",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &["circle", "square", "star", "spark", "snowflake", "emoji"]
    }

    pub fn is_glyph(&self) -> bool {
        matches!(self, ParticleShape::Emoji)
    }
}

/// Everything a particle needs at spawn time.
///
/// A pure-data projection of an emitter's settings, without the emitter's
/// position, identity or spawn shape.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleConfig {
    pub lifetime: f64,
    pub speed: f64,
    /// Degrees.
    pub spread: f64,
    pub gravity: f64,
    pub friction: f64,
    /// Degrees.
    pub angle: f64,
    pub shape: ParticleShape,
    /// Only set for glyph shapes.
    pub glyph: Option<Arc<str>>,
    pub size_start: f64,
    pub size_end: f64,
    pub color_start: Rgb,
    pub color_end: Rgb,
    pub opacity_start: f64,
    pub opacity_end: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            lifetime: 2.0,
            speed: 100.0,
            spread: 45.0,
            gravity: 0.0,
            friction: 1.0,
            angle: -90.0,
            shape: ParticleShape::Circle,
            glyph: None,
            size_start: 12.0,
            size_end: 4.0,
            color_start: Rgb::new(0xff, 0x66, 0x00),
            color_end: Rgb::new(0xff, 0x00, 0x00),
            opacity_start: 1.0,
            opacity_end: 0.0,
        }
    }
}

/// Interpolated look of a particle at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    pub size: f64,
    pub opacity: f64,
    pub color: Rgb,
}

/// A single simulated particle.
#[derive(Clone, Debug)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    /// Seconds since spawn.
    pub age: f64,
    /// Seconds until death.
    pub lifetime: f64,
    pub rotation: f64,
    /// Radians per second.
    pub rotation_speed: f64,
    pub gravity: f64,
    pub friction: f64,
    pub shape: ParticleShape,
    pub glyph: Option<Arc<str>>,
    pub size_start: f64,
    pub size_end: f64,
    pub color_start: Rgb,
    pub color_end: Rgb,
    pub opacity_start: f64,
    pub opacity_end: f64,
}

impl Particle {
    /// Spawn a particle at `position`.
    ///
    /// - lifetime: `config.lifetime * U(0.8, 1.2)`
    /// - direction: `angle + U(-spread/2, spread/2)`
    /// - speed: `config.speed * U(0.7, 1.3)`
    /// - rotation: `U(0, 2π)`, spinning at `U(-2, 2)` rad/s, or `U(-1, 1)` for glyphs
    pub fn spawn<R: Rng>(position: DVec2, config: &ParticleConfig, rng: &mut R) -> Self {
        let lifetime = config.lifetime * rng.gen_range(0.8..1.2);

        let angle = config.angle.to_radians();
        let spread = config.spread.to_radians();
        let direction = angle + (rng.gen::<f64>() - 0.5) * spread;
        let speed = config.speed * rng.gen_range(0.7..1.3);

        let spin_range = if config.shape.is_glyph() {
            ROTATION_SPEED_RANGE / 2.0
        } else {
            ROTATION_SPEED_RANGE
        };

        Self {
            position,
            velocity: DVec2::from_angle(direction) * speed,
            age: 0.0,
            lifetime,
            rotation: rng.gen::<f64>() * TAU,
            rotation_speed: (rng.gen::<f64>() - 0.5) * 2.0 * spin_range,
            gravity: config.gravity,
            friction: config.friction.clamp(0.0, 1.0),
            shape: config.shape,
            glyph: if config.shape.is_glyph() {
                config.glyph.clone()
            } else {
                None
            },
            size_start: config.size_start,
            size_end: config.size_end,
            color_start: config.color_start,
            color_end: config.color_end,
            opacity_start: config.opacity_start,
            opacity_end: config.opacity_end,
        }
    }

    /// Advance by `dt` seconds. Returns whether the particle is still alive.
    pub fn update(&mut self, dt: f64) -> bool {
        self.age += dt;

        self.velocity.y += self.gravity * dt;

        // Exponential damping calibrated to 60 Hz, so the result does not
        // depend on how dt is sliced.
        if self.friction < 1.0 {
            self.velocity *= self.friction.powf(dt * FRICTION_REFERENCE_HZ);
        }

        self.position += self.velocity * dt;
        self.rotation += self.rotation_speed * dt;

        self.is_alive()
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }

    /// Normalized age in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.lifetime > 0.0 {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn appearance(&self) -> Appearance {
        let t = self.progress();
        Appearance {
            size: lerp(self.size_start, self.size_end, t).max(0.0),
            opacity: lerp(self.opacity_start, self.opacity_end, t).clamp(0.0, 1.0),
            color: self.color_start.lerp(self.color_end, t),
        }
    }

    /// Render at the current age. Does not modify the particle.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let look = self.appearance();
        let paint = Paint::new(look.color, look.opacity);
        let half = look.size / 2.0;
        let rotation = DVec2::from_angle(self.rotation);
        let to_canvas = |local: DVec2| self.position + rotation.rotate(local);

        match self.shape {
            ParticleShape::Circle => canvas.fill_circle(self.position, half, paint),
            ParticleShape::Square => {
                let corners = [
                    DVec2::new(-half, -half),
                    DVec2::new(half, -half),
                    DVec2::new(half, half),
                    DVec2::new(-half, half),
                ]
                .map(to_canvas);
                canvas.fill_polygon(&corners, paint);
            }
            ParticleShape::Star => {
                let points: Vec<DVec2> = star_points(STAR_SPIKES, half, half * STAR_INNER_RATIO)
                    .into_iter()
                    .map(to_canvas)
                    .collect();
                canvas.fill_polygon(&points, paint);
            }
            ParticleShape::Spark => {
                let stroke = Stroke::solid(paint, 2.0);
                canvas.stroke_segment(
                    to_canvas(DVec2::new(0.0, -half)),
                    to_canvas(DVec2::new(0.0, half)),
                    &stroke,
                );
            }
            ParticleShape::Snowflake => {
                let stroke = Stroke::solid(paint, 1.5);
                for (spoke, branch) in snowflake_strokes(half) {
                    canvas.stroke_path(&spoke.map(to_canvas), &stroke);
                    canvas.stroke_path(&branch.map(to_canvas), &stroke);
                }
            }
            ParticleShape::Emoji => {
                if let Some(glyph) = &self.glyph {
                    canvas.fill_glyph(self.position, look.size, self.rotation, glyph, paint);
                }
            }
        }
    }
}

/// Outline of a star centered on the origin, first spike pointing up.
///
/// Alternates outer and inner vertices, `2 * spikes` points in total.
pub fn star_points(spikes: usize, outer: f64, inner: f64) -> Vec<DVec2> {
    let step = PI / spikes as f64;
    let mut angle = PI * 1.5;
    let mut points = Vec::with_capacity(spikes * 2);
    for _ in 0..spikes {
        points.push(DVec2::from_angle(angle) * outer);
        angle += step;
        points.push(DVec2::from_angle(angle) * inner);
        angle += step;
    }
    points
}

/// The six arms of a snowflake of arm length `size`.
///
/// Each arm is a spoke from the center plus a V-shaped pair of branches
/// joined 60% of the way out.
fn snowflake_strokes(size: f64) -> impl Iterator<Item = ([DVec2; 2], [DVec2; 3])> {
    (0..6).map(move |i| {
        let arm = DVec2::from_angle(i as f64 * FRAC_PI_3);
        let spoke = [DVec2::ZERO, arm.rotate(DVec2::new(0.0, -size))];
        let branch = [
            arm.rotate(DVec2::new(-size * 0.3, -size * 0.8)),
            arm.rotate(DVec2::new(0.0, -size * 0.6)),
            arm.rotate(DVec2::new(size * 0.3, -size * 0.8)),
        ];
        (spoke, branch)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw_list::{DrawList, Primitive};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn spawn_with(config: ParticleConfig) -> Particle {
        Particle::spawn(DVec2::new(400.0, 300.0), &config, &mut rng())
    }

    #[test]
    fn test_spawn_ranges() {
        let config = ParticleConfig::default();
        let mut rng = rng();
        for _ in 0..500 {
            let p = Particle::spawn(DVec2::ZERO, &config, &mut rng);
            assert!(p.lifetime >= 1.6 && p.lifetime < 2.4);
            let speed = p.velocity.length();
            assert!(speed >= 70.0 - 1e-9 && speed < 130.0 + 1e-9);
            assert!(p.rotation >= 0.0 && p.rotation < TAU);
            assert!(p.rotation_speed.abs() <= 2.0);
            // Direction within -90 ± 22.5 degrees
            let heading = p.velocity.y.atan2(p.velocity.x).to_degrees();
            assert!((heading + 90.0).abs() <= 22.5 + 1e-9);
        }
    }

    #[test]
    fn test_glyph_spins_slower() {
        let config = ParticleConfig {
            shape: ParticleShape::Emoji,
            glyph: Some(Arc::from("*")),
            ..Default::default()
        };
        let mut rng = rng();
        for _ in 0..500 {
            let p = Particle::spawn(DVec2::ZERO, &config, &mut rng);
            assert!(p.rotation_speed.abs() <= 1.0);
        }
    }

    #[test]
    fn test_zero_spread_is_exact_direction() {
        let p = spawn_with(ParticleConfig {
            spread: 0.0,
            angle: -90.0,
            ..Default::default()
        });
        assert!(p.velocity.x.abs() < 1e-9);
        assert!(p.velocity.y < 0.0);
    }

    #[test]
    fn test_age_accumulates_and_dies_once() {
        let mut p = spawn_with(ParticleConfig::default());
        p.lifetime = 1.0;

        let steps = [0.25, 0.25, 0.25];
        for dt in steps {
            assert!(p.update(dt));
        }
        assert_relative_eq!(p.age, 0.75);

        assert!(!p.update(0.25));
        assert_relative_eq!(p.age, 1.0);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_gravity_accelerates_down() {
        let mut p = spawn_with(ParticleConfig {
            speed: 0.0,
            gravity: 100.0,
            ..Default::default()
        });
        p.update(0.5);
        assert_relative_eq!(p.velocity.y, 50.0);
        assert_relative_eq!(p.position.y, 300.0 + 25.0);
    }

    #[test]
    fn test_friction_is_frame_rate_independent() {
        let config = ParticleConfig {
            friction: 0.95,
            lifetime: 100.0,
            ..Default::default()
        };
        let mut fine = spawn_with(config.clone());
        let mut coarse = fine.clone();

        for _ in 0..60 {
            fine.update(1.0 / 60.0);
        }
        coarse.update(1.0);

        assert_relative_eq!(fine.velocity.x, coarse.velocity.x, epsilon = 1e-9);
        assert_relative_eq!(fine.velocity.y, coarse.velocity.y, epsilon = 1e-9);
        let initial = spawn_with(config).velocity.length();
        assert_relative_eq!(coarse.velocity.length(), initial * 0.95f64.powi(60), epsilon = 1e-9);
    }

    #[test]
    fn test_appearance_interpolates() {
        let mut p = spawn_with(ParticleConfig::default());
        p.lifetime = 2.0;
        p.age = 1.0;
        let look = p.appearance();
        assert_relative_eq!(look.size, 8.0);
        assert_relative_eq!(look.opacity, 0.5);
        assert_eq!(look.color, Rgb::new(255, 51, 0));

        // Past the end of life the look holds at the end values.
        p.age = 5.0;
        let look = p.appearance();
        assert_relative_eq!(look.size, 4.0);
        assert_relative_eq!(look.opacity, 0.0);
        assert_eq!(look.color, Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_star_geometry() {
        let points = star_points(5, 10.0, 4.0);
        assert_eq!(points.len(), 10);
        assert_relative_eq!(points[0].x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(points[0].y, -10.0, epsilon = 1e-12);
        for (i, p) in points.iter().enumerate() {
            let expected = if i % 2 == 0 { 10.0 } else { 4.0 };
            assert_relative_eq!(p.length(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_draw_dispatches_per_shape() {
        let counts = [
            (ParticleShape::Circle, 1),
            (ParticleShape::Square, 1),
            (ParticleShape::Star, 1),
            (ParticleShape::Spark, 1),
            (ParticleShape::Snowflake, 12),
            (ParticleShape::Emoji, 1),
        ];
        for (shape, expected) in counts {
            let p = spawn_with(ParticleConfig {
                shape,
                glyph: Some(Arc::from("❄")),
                ..Default::default()
            });
            let mut list = DrawList::new();
            p.draw(&mut list);
            assert_eq!(list.len(), expected, "{:?}", shape);
        }
    }

    #[test]
    fn test_draw_uses_interpolated_size() {
        let mut p = spawn_with(ParticleConfig::default());
        p.age = p.lifetime;
        let mut list = DrawList::new();
        p.draw(&mut list);
        match &list.commands()[0].primitive {
            Primitive::FillCircle { center, radius, paint } => {
                assert_eq!(*center, p.position);
                assert_relative_eq!(*radius, 2.0);
                assert_relative_eq!(paint.alpha, 0.0);
            }
            other => panic!("unexpected primitive {:?}", other),
        }
    }

    #[test]
    fn test_emoji_without_glyph_draws_nothing() {
        let p = spawn_with(ParticleConfig {
            shape: ParticleShape::Emoji,
            glyph: None,
            ..Default::default()
        });
        let mut list = DrawList::new();
        p.draw(&mut list);
        assert!(list.is_empty());
    }
}
