//! Random effect generation.

use glam::DVec2;
use pfxd::color::hsl_to_hex;
use pfxd::{
    BlendMode, EmitterData, EmitterShape, LayerData, LayerStack, ParticleData, ParticleShape,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Upper bound for [`RandomizeMode::Create`].
pub const MAX_RANDOM_LAYERS: usize = 8;

/// Half extent of the area unlinked random layers are scattered over.
const SCATTER: DVec2 = DVec2::new(200.0, 150.0);

/// What the randomizer touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RandomizeMode {
    /// The selected layer; keeps its name and position.
    Current,
    /// Every layer; keeps names. `link` moves all emitters to the canvas center.
    All { link: bool },
    /// Replace the stack with `count` new layers (clamped to `1..=8`). Linked
    /// layers share the canvas center, the others are scattered around it.
    Create { count: usize, link: bool },
}

/// `floor(min + U(0,1) * span)`
fn whole<R: Rng>(rng: &mut R, min: f64, span: f64) -> f64 {
    (min + rng.gen::<f64>() * span).floor()
}

/// A start/end color pair two hues apart.
///
/// Half the time the second hue is analogous (30-90 degrees away), otherwise
/// roughly complementary (150-210 degrees away).
pub fn random_palette<R: Rng>(rng: &mut R) -> (String, String) {
    let hue_start = rng.gen::<f64>() * 360.0;
    let offset = if rng.gen_bool(0.5) {
        30.0 + rng.gen::<f64>() * 60.0
    } else {
        150.0 + rng.gen::<f64>() * 60.0
    };
    let hue_end = (hue_start + offset) % 360.0;

    let start = hsl_to_hex(
        hue_start,
        60.0 + rng.gen::<f64>() * 40.0,
        50.0 + rng.gen::<f64>() * 30.0,
    );
    let end = hsl_to_hex(
        hue_end,
        60.0 + rng.gen::<f64>() * 40.0,
        30.0 + rng.gen::<f64>() * 40.0,
    );
    (start, end)
}

/// A full random emitter and particle configuration.
///
/// Position, name and visibility are left unset.
pub fn random_settings<R: Rng>(rng: &mut R) -> LayerData {
    let emitter_shape = *EmitterShape::ALL.choose(rng).unwrap_or(&EmitterShape::Point);
    let shape = *ParticleShape::GEOMETRIC
        .choose(rng)
        .unwrap_or(&ParticleShape::Circle);
    let (color_start, color_end) = random_palette(rng);

    LayerData {
        emitter: Some(EmitterData {
            rate: Some(whole(rng, 20.0, 130.0)),
            lifetime: Some(0.5 + rng.gen::<f64>() * 3.5),
            speed: Some(whole(rng, 30.0, 220.0)),
            spread: Some(whole(rng, 15.0, 345.0)),
            gravity: Some(whole(rng, -150.0, 300.0)),
            angle: Some(whole(rng, -180.0, 360.0)),
            emitter_shape: Some(emitter_shape),
            emitter_width: Some(whole(rng, 50.0, 150.0)),
            emitter_height: Some(whole(rng, 30.0, 100.0)),
            emitter_radius: Some(whole(rng, 30.0, 120.0)),
            emitter_filled: Some(rng.gen_bool(0.7)),
            ..Default::default()
        }),
        particle: Some(ParticleData {
            shape: Some(shape),
            size_start: Some(whole(rng, 4.0, 30.0)),
            size_end: Some(whole(rng, 1.0, 15.0)),
            color_start: Some(color_start),
            color_end: Some(color_end),
            opacity_start: Some(0.7 + rng.gen::<f64>() * 0.3),
            opacity_end: Some(rng.gen::<f64>() * 0.3),
            blend_mode: Some(if rng.gen_bool(0.4) {
                BlendMode::Additive
            } else {
                BlendMode::Normal
            }),
            friction: Some(0.95 + rng.gen::<f64>() * 0.05),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Randomize the selected layer in place and clear its particles.
pub fn randomize_selected<R: Rng>(layers: &mut LayerStack, rng: &mut R) {
    let settings = random_settings(rng);
    let emitter = layers.selected_mut();
    emitter.update_config(&settings);
    emitter.clear();
}

/// Randomize every layer, optionally moving all of them to `link_to`.
pub fn randomize_all<R: Rng>(layers: &mut LayerStack, link_to: Option<DVec2>, rng: &mut R) {
    for emitter in layers.iter_mut() {
        emitter.update_config(&random_settings(rng));
        if let Some(center) = link_to {
            emitter.set_position(center);
        }
        emitter.clear();
    }
}

/// Layer data for `count` new random layers named "Random Layer i".
///
/// With `link` every layer sits at `center`; otherwise positions are uniform
/// in a 400 x 300 box around it.
pub fn random_layers<R: Rng>(
    count: usize,
    center: DVec2,
    link: bool,
    rng: &mut R,
) -> Vec<LayerData> {
    let count = count.clamp(1, MAX_RANDOM_LAYERS);
    (0..count)
        .map(|i| {
            let position = if link {
                center
            } else {
                center - SCATTER + DVec2::new(rng.gen::<f64>(), rng.gen::<f64>()) * SCATTER * 2.0
            };
            let mut data = random_settings(rng);
            data.name = Some(format!("Random Layer {}", i + 1));
            if let Some(emitter) = data.emitter.as_mut() {
                emitter.x = Some(position.x);
                emitter.y = Some(position.y);
            }
            data
        })
        .collect()
}
