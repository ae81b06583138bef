//! # pfxd - Particle FX Designer
//!
//! Layered 2D particle effects: emitters spawn particles with randomized
//! physics, interpolate their size, color and opacity over their lifetime, and
//! composite layer over layer onto any [`Canvas`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use pfxd::prelude::*;
//!
//! let mut layers = LayerStack::new();
//! layers.selected_mut().update_config(&LayerData {
//!     emitter: Some(EmitterData {
//!         emitter_shape: Some(EmitterShape::Circle),
//!         rate: Some(120.0),
//!         ..Default::default()
//!     }),
//!     particle: Some(ParticleData {
//!         blend_mode: Some(BlendMode::Additive),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! });
//!
//! let mut clock = SimulationClock::new();
//! let mut canvas = Raster::new(800, 600);
//! for frame in 0..120 {
//!     canvas.clear_transparent();
//!     clock.run_frame(frame as f64 * 1000.0 / 60.0, &mut layers, &mut canvas, false);
//! }
//! canvas.save_png("frame.png")?;
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! A [`Particle`] is spawned with a jittered lifetime, direction and speed,
//! then integrates gravity and frame-rate independent friction. Its look is a
//! pure function of normalized age.
//!
//! ### Emitters
//!
//! An [`Emitter`] is one layer. It samples spawn positions from a point,
//! line, circle or rectangle and spawns at a fixed rate through a fractional
//! accumulator. Its particles render with the layer's [`BlendMode`].
//!
//! ### Layers
//!
//! The [`LayerStack`] keeps the layers in render order plus the selection.
//! It never becomes empty.
//!
//! ### Project Files
//!
//! Layers serialize to JSON via [`LayerData`]. Layered `2.0` documents and
//! single-layer `1.x` documents both load; every field is optional and
//! malformed values fall back to defaults.
//!
//! ## Canvases
//!
//! | Type | Use |
//! |------|-----|
//! | [`DrawList`] | Records draw calls |
//! | [`Raster`] | CPU pixels with PNG export |

pub mod canvas;
pub mod clock;
pub mod color;
mod draw_list;
pub mod emitter;
pub mod error;
pub mod layers;
pub mod particle;
mod raster;
pub mod schema;

pub use canvas::{BlendMode, Canvas, Stroke};
pub use clock::{SimulationClock, MAX_FRAME_DELTA};
pub use color::{Paint, Rgb};
pub use draw_list::{DrawCommand, DrawList, Primitive};
pub use emitter::{AppearanceSettings, EmissionSettings, Emitter, EmitterShape};
pub use error::{LayerError, ProjectError};
pub use glam::DVec2;
pub use layers::LayerStack;
pub use particle::{Particle, ParticleConfig, ParticleShape};
pub use raster::Raster;
pub use schema::{
    decode_layers, parse_project, EmitterData, LayerData, LegacyProject, ParticleData,
    ProjectFile, ProjectFormat,
};

/// Common imports.
///
/// ```ignore
/// use pfxd::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{BlendMode, Canvas};
    pub use crate::clock::SimulationClock;
    pub use crate::draw_list::DrawList;
    pub use crate::emitter::{Emitter, EmitterShape};
    pub use crate::layers::LayerStack;
    pub use crate::particle::ParticleShape;
    pub use crate::raster::Raster;
    pub use crate::schema::{EmitterData, LayerData, ParticleData};
    pub use glam::DVec2;
}
