//! Built-in effect presets.
//!
//! A preset is a partial layer: it sets emission and appearance but never
//! position, name or visibility, so applying one keeps the layer where it is.

use pfxd::{EmitterData, LayerData, ParticleData, ParticleShape};

pub struct Preset {
    /// Lookup key, e.g. `"fire"`.
    pub key: &'static str,
    pub name: &'static str,
    pub config: fn() -> LayerData,
}

impl Preset {
    /// The settings this preset applies.
    pub fn layer_data(&self) -> LayerData {
        (self.config)()
    }
}

/// Look up a preset by key.
pub fn find(key: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.key == key)
}

struct Motion {
    rate: f64,
    lifetime: f64,
    speed: f64,
    spread: f64,
    gravity: f64,
    angle: f64,
}

struct Look {
    shape: ParticleShape,
    size: (f64, f64),
    color: (&'static str, &'static str),
    opacity: (f64, f64),
}

fn layer(motion: Motion, look: Look) -> LayerData {
    LayerData {
        emitter: Some(EmitterData {
            rate: Some(motion.rate),
            lifetime: Some(motion.lifetime),
            speed: Some(motion.speed),
            spread: Some(motion.spread),
            gravity: Some(motion.gravity),
            angle: Some(motion.angle),
            ..Default::default()
        }),
        particle: Some(ParticleData {
            shape: Some(look.shape),
            size_start: Some(look.size.0),
            size_end: Some(look.size.1),
            color_start: Some(look.color.0.to_string()),
            color_end: Some(look.color.1.to_string()),
            opacity_start: Some(look.opacity.0),
            opacity_end: Some(look.opacity.1),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub static PRESETS: &[Preset] = &[
    Preset {
        key: "fire",
        name: "Fire",
        config: || {
            layer(
                Motion {
                    rate: 80.0,
                    lifetime: 1.2,
                    speed: 120.0,
                    spread: 25.0,
                    gravity: -100.0,
                    angle: -90.0,
                },
                Look {
                    shape: ParticleShape::Circle,
                    size: (18.0, 4.0),
                    color: ("#ffaa00", "#ff2200"),
                    opacity: (1.0, 0.0),
                },
            )
        },
    },
    Preset {
        key: "smoke",
        name: "Smoke",
        config: || {
            layer(
                Motion {
                    rate: 25.0,
                    lifetime: 3.0,
                    speed: 40.0,
                    spread: 30.0,
                    gravity: -20.0,
                    angle: -90.0,
                },
                Look {
                    shape: ParticleShape::Circle,
                    size: (15.0, 40.0),
                    color: ("#666666", "#333333"),
                    opacity: (0.6, 0.0),
                },
            )
        },
    },
    Preset {
        key: "sparkles",
        name: "Sparkles",
        config: || {
            layer(
                Motion {
                    rate: 40.0,
                    lifetime: 1.5,
                    speed: 80.0,
                    spread: 360.0,
                    gravity: 0.0,
                    angle: 0.0,
                },
                Look {
                    shape: ParticleShape::Star,
                    size: (10.0, 2.0),
                    color: ("#ffff00", "#ff00ff"),
                    opacity: (1.0, 0.0),
                },
            )
        },
    },
    Preset {
        key: "snow",
        name: "Snow",
        config: || {
            layer(
                Motion {
                    rate: 40.0,
                    lifetime: 5.0,
                    speed: 30.0,
                    spread: 40.0,
                    gravity: 30.0,
                    angle: 90.0,
                },
                Look {
                    shape: ParticleShape::Snowflake,
                    size: (8.0, 6.0),
                    color: ("#ffffff", "#aaddff"),
                    opacity: (1.0, 0.3),
                },
            )
        },
    },
    Preset {
        key: "rain",
        name: "Rain",
        config: || {
            layer(
                Motion {
                    rate: 100.0,
                    lifetime: 1.0,
                    speed: 300.0,
                    spread: 10.0,
                    gravity: 200.0,
                    angle: 100.0,
                },
                Look {
                    shape: ParticleShape::Spark,
                    size: (3.0, 2.0),
                    color: ("#88ccff", "#4488ff"),
                    opacity: (0.8, 0.2),
                },
            )
        },
    },
    Preset {
        key: "explosion",
        name: "Explosion",
        config: || {
            layer(
                Motion {
                    rate: 200.0,
                    lifetime: 0.8,
                    speed: 200.0,
                    spread: 360.0,
                    gravity: 50.0,
                    angle: 0.0,
                },
                Look {
                    shape: ParticleShape::Circle,
                    size: (12.0, 3.0),
                    color: ("#ffcc00", "#ff4400"),
                    opacity: (1.0, 0.0),
                },
            )
        },
    },
    Preset {
        key: "fireworks",
        name: "Fireworks",
        config: || {
            layer(
                Motion {
                    rate: 60.0,
                    lifetime: 1.5,
                    speed: 150.0,
                    spread: 360.0,
                    gravity: 80.0,
                    angle: 0.0,
                },
                Look {
                    shape: ParticleShape::Star,
                    size: (8.0, 2.0),
                    color: ("#ff0088", "#00ffff"),
                    opacity: (1.0, 0.0),
                },
            )
        },
    },
    Preset {
        key: "bubbles",
        name: "Bubbles",
        config: || {
            layer(
                Motion {
                    rate: 15.0,
                    lifetime: 4.0,
                    speed: 50.0,
                    spread: 45.0,
                    gravity: -40.0,
                    angle: -90.0,
                },
                Look {
                    shape: ParticleShape::Circle,
                    size: (20.0, 25.0),
                    color: ("#88ddff", "#aaeeff"),
                    opacity: (0.5, 0.1),
                },
            )
        },
    },
    Preset {
        key: "leaves",
        name: "Leaves",
        config: || {
            layer(
                Motion {
                    rate: 20.0,
                    lifetime: 4.0,
                    speed: 60.0,
                    spread: 60.0,
                    gravity: 40.0,
                    angle: 120.0,
                },
                Look {
                    shape: ParticleShape::Square,
                    size: (12.0, 10.0),
                    color: ("#88cc44", "#cc8844"),
                    opacity: (1.0, 0.3),
                },
            )
        },
    },
    Preset {
        key: "magic",
        name: "Magic",
        config: || {
            layer(
                Motion {
                    rate: 50.0,
                    lifetime: 2.0,
                    speed: 60.0,
                    spread: 360.0,
                    gravity: -30.0,
                    angle: 0.0,
                },
                Look {
                    shape: ParticleShape::Star,
                    size: (14.0, 4.0),
                    color: ("#aa44ff", "#44aaff"),
                    opacity: (1.0, 0.0),
                },
            )
        },
    },
];
