//! Frame timing for the simulation loop.
//!
//! The host calls [`SimulationClock::advance`] with its frame timestamp in
//! milliseconds, as an animation-frame callback provides.
//!
//! # Example
//!
//! ```ignore
//! use pfxd::{DrawList, LayerStack, SimulationClock};
//!
//! let mut clock = SimulationClock::new();
//! let mut layers = LayerStack::new();
//! let mut canvas = DrawList::new();
//!
//! // In the frame callback:
//! clock.run_frame(timestamp_ms, &mut layers, &mut canvas, true);
//! println!("{:.1} fps, {} particles", clock.fps(), layers.total_particle_count());
//! ```

use crate::canvas::Canvas;
use crate::layers::LayerStack;

/// Upper bound on the step handed to the simulation, in seconds.
///
/// Long stalls (a backgrounded tab, a debugger break) advance the simulation by
/// at most this much instead of emitting a burst of particles.
pub const MAX_FRAME_DELTA: f64 = 0.1;

/// Seconds between FPS recalculations.
const FPS_UPDATE_INTERVAL: f64 = 0.5;

/// Per-frame delta time, frame counting and FPS.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Timestamp of the previous frame in milliseconds.
    last_timestamp: Option<f64>,
    /// Clamped step of the last frame in seconds.
    delta: f64,
    /// Unclamped time between the last two frames in seconds.
    raw_delta: f64,
    /// Sum of clamped steps.
    elapsed: f64,
    frame_count: u64,
    fps: f64,
    /// Frames and seconds in the current FPS window.
    fps_frames: u64,
    fps_window: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationClock {
    pub fn new() -> Self {
        Self {
            last_timestamp: None,
            delta: 0.0,
            raw_delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frames: 0,
            fps_window: 0.0,
        }
    }

    /// Record a frame at `timestamp_ms` and return the simulation step.
    ///
    /// The first frame yields 0. Later frames yield the time since the
    /// previous one, clamped to `[0, MAX_FRAME_DELTA]`.
    pub fn advance(&mut self, timestamp_ms: f64) -> f64 {
        self.raw_delta = match self.last_timestamp {
            Some(last) => {
                let raw = (timestamp_ms - last) / 1000.0;
                self.fps_frames += 1;
                self.fps_window += raw.max(0.0);
                raw
            }
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.delta = self.raw_delta.clamp(0.0, MAX_FRAME_DELTA);
        self.elapsed += self.delta;
        self.frame_count += 1;

        if self.fps_window >= FPS_UPDATE_INTERVAL {
            self.fps = self.fps_frames as f64 / self.fps_window;
            self.fps_frames = 0;
            self.fps_window = 0.0;
        }

        self.delta
    }

    /// Advance the clock, update every layer, then draw every visible layer.
    ///
    /// Returns the step used.
    pub fn run_frame<C: Canvas + ?Sized>(
        &mut self,
        timestamp_ms: f64,
        layers: &mut LayerStack,
        canvas: &mut C,
        show_indicator: bool,
    ) -> f64 {
        let dt = self.advance(timestamp_ms);
        layers.update(dt);
        layers.draw(canvas, show_indicator);
        dt
    }

    /// Clamped step of the last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Unclamped wall time between the last two frames in seconds.
    ///
    /// Timers that should run on real time, such as the history debounce,
    /// tick with this.
    #[inline]
    pub fn raw_delta(&self) -> f64 {
        self.raw_delta
    }

    /// Simulated seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Forget the previous timestamp so the next frame steps by 0.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw_list::DrawList;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.advance(12_345.0), 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_delta_from_timestamps() {
        let mut clock = SimulationClock::new();
        clock.advance(1000.0);
        assert_relative_eq!(clock.advance(1016.0), 0.016, epsilon = 1e-12);
        assert_relative_eq!(clock.elapsed(), 0.016, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut clock = SimulationClock::new();
        clock.advance(0.0);
        assert_eq!(clock.advance(5000.0), MAX_FRAME_DELTA);
        assert_relative_eq!(clock.raw_delta(), 5.0);

        // Timestamps going backwards never step the simulation backwards
        assert_eq!(clock.advance(4000.0), 0.0);
        assert_relative_eq!(clock.raw_delta(), -1.0);
    }

    #[test]
    fn test_fps() {
        let mut clock = SimulationClock::new();
        for i in 0..=60 {
            clock.advance(i as f64 * 10.0);
        }
        // 100 Hz frames
        assert_relative_eq!(clock.fps(), 100.0, epsilon = 1e-6);
    }

    #[test]
    fn test_run_frame_updates_then_draws() {
        let mut clock = SimulationClock::new();
        let mut layers = LayerStack::new().with_seed(9);
        let mut canvas = DrawList::new();

        clock.run_frame(0.0, &mut layers, &mut canvas, false);
        assert_eq!(layers.total_particle_count(), 0);

        clock.run_frame(100.0, &mut layers, &mut canvas, false);
        assert_eq!(layers.total_particle_count(), 5);
        // Every particle spawned this frame was drawn
        assert_eq!(canvas.len(), 5);
    }

    #[test]
    fn test_reset() {
        let mut clock = SimulationClock::new();
        clock.advance(0.0);
        clock.advance(50.0);
        clock.reset();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.advance(10_000.0), 0.0);
    }
}
