//! Editor controller.
//!
//! [`EditorState`] owns the layer stack, the undo history and the frame clock,
//! and is the single entry point for user actions. Every action that changes
//! the effect records a history entry and marks the project dirty. Outcomes
//! the user should see are queued as [`Notice`]s for the host UI to display.

use crate::history::{History, HistoryInfo, DEFAULT_DEBOUNCE};
use crate::presets;
use crate::project::{load_project, save_project};
use crate::randomize::{self, RandomizeMode};
use glam::DVec2;
use pfxd::{
    Canvas, LayerData, LayerError, LayerStack, ParticleData, ParticleShape, ProjectError,
    SimulationClock,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Editor-wide settings, stored as camelCase JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    /// Canvas size in pixels.
    pub canvas_size: DVec2,
    /// Quiet period before a continuous edit is recorded, in seconds.
    pub history_debounce: f64,
    /// Draw the selected layer's emitter outline.
    pub show_indicator: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            canvas_size: DVec2::new(800.0, 600.0),
            history_debounce: DEFAULT_DEBOUNCE,
            show_indicator: true,
        }
    }
}

impl EditorSettings {
    pub fn canvas_center(&self) -> DVec2 {
        self.canvas_size / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Shortcut-level actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Ctrl+S
    Save,
    /// Ctrl+Z
    Undo,
    /// Ctrl+Y / Ctrl+Shift+Z
    Redo,
    /// Space
    TogglePlay,
    /// R
    ResetParticles,
    /// Delete
    DeleteLayer,
    /// Ctrl+D
    DuplicateLayer,
}

/// Application state for one open project.
#[derive(Debug)]
pub struct EditorState {
    layers: LayerStack,
    history: History,
    clock: SimulationClock,
    settings: EditorSettings,
    rng: StdRng,
    current_file: Option<PathBuf>,
    notices: Vec<Notice>,
    dirty: bool,
    playing: bool,
    link_positions: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditorState {
    pub fn new(settings: EditorSettings) -> Self {
        Self::with_parts(settings, LayerStack::new(), StdRng::from_entropy())
    }

    /// An editor whose emitters and randomizer are deterministic.
    pub fn with_seed(settings: EditorSettings, seed: u64) -> Self {
        Self::with_parts(
            settings,
            LayerStack::new().with_seed(seed),
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_parts(settings: EditorSettings, layers: LayerStack, rng: StdRng) -> Self {
        let mut history = History::new();
        history.init(&layers);
        Self {
            layers,
            history,
            clock: SimulationClock::new(),
            settings,
            rng,
            current_file: None,
            notices: Vec::new(),
            dirty: false,
            playing: true,
            link_positions: false,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_info(&self) -> HistoryInfo {
        self.history.info()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut EditorSettings {
        &mut self.settings
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether canvas clicks should move every emitter.
    pub fn link_positions(&self) -> bool {
        self.link_positions
    }

    pub fn set_link_positions(&mut self, link: bool) {
        self.link_positions = link;
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        log::debug!("{level:?}: {message}");
        self.notices.push(Notice { level, message });
    }

    fn record(&mut self, label: &str) {
        if self.history.save_state(&self.layers, label) {
            self.dirty = true;
        }
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Advance and render one frame at `timestamp_ms`.
    ///
    /// The debounce timer ticks on wall time, the simulation on the clamped
    /// step.
    pub fn frame<C: Canvas + ?Sized>(&mut self, timestamp_ms: f64, canvas: &mut C) -> f64 {
        let show_indicator = self.settings.show_indicator;
        let dt = self
            .clock
            .run_frame(timestamp_ms, &mut self.layers, canvas, show_indicator);
        if self.history.tick(self.clock.raw_delta(), &self.layers) {
            self.dirty = true;
        }
        dt
    }

    /// Run a shortcut action.
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Save => self.save(),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
            Command::TogglePlay => {
                self.toggle_play();
            }
            Command::ResetParticles => self.reset_particles(),
            Command::DeleteLayer => self.delete_layer(),
            Command::DuplicateLayer => self.duplicate_layer(),
        }
    }

    // ========================================================================
    // Layer settings
    // ========================================================================

    /// Apply a discrete change to the selected layer and record it.
    pub fn edit_selected(&mut self, patch: &LayerData, label: &str) {
        self.layers.selected_mut().update_config(patch);
        self.record(label);
    }

    /// Apply a continuous change (slider, color picker) to the selected layer.
    ///
    /// Recorded once edits pause for the debounce period.
    pub fn adjust_selected(&mut self, patch: &LayerData, label: &str) {
        self.layers.selected_mut().update_config(patch);
        self.dirty = true;
        self.history
            .save_state_debounced(label, self.settings.history_debounce);
    }

    /// Switch the selected layer to glyph particles drawing `glyph`.
    pub fn set_glyph(&mut self, glyph: &str) {
        let patch = LayerData {
            particle: Some(ParticleData {
                shape: Some(ParticleShape::Emoji),
                emoji: Some(glyph.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let emitter = self.layers.selected_mut();
        emitter.update_config(&patch);
        emitter.clear();
        self.record("Change Emoji");
    }

    /// Move the selected emitter, or every emitter when `link_all` is set.
    pub fn move_emitter(&mut self, position: DVec2, link_all: bool) {
        if link_all {
            self.layers.center_all(position);
            self.record("Move All Emitters");
        } else {
            self.layers.selected_mut().set_position(position);
            self.record("Move Emitter");
        }
    }

    /// Merge a built-in preset into the selected layer.
    pub fn apply_preset(&mut self, key: &str) {
        let Some(preset) = presets::find(key) else {
            log::warn!("unknown preset {key:?}");
            self.notify(NoticeLevel::Warning, format!("Unknown preset: {key}"));
            return;
        };

        let emitter = self.layers.selected_mut();
        emitter.update_config(&preset.layer_data());
        emitter.clear();
        let message = format!("Loaded \"{}\" preset to {}", preset.name, emitter.name);

        self.record("Load Preset");
        self.notify(NoticeLevel::Info, message);
    }

    pub fn randomize(&mut self, mode: RandomizeMode) {
        let center = self.settings.canvas_center();
        match mode {
            RandomizeMode::Current => {
                randomize::randomize_selected(&mut self.layers, &mut self.rng);
                let name = self.layers.selected().name.clone();
                self.record("Randomize Layer");
                self.notify(NoticeLevel::Success, format!("Randomized {name}!"));
            }
            RandomizeMode::All { link } => {
                randomize::randomize_all(&mut self.layers, link.then_some(center), &mut self.rng);
                let count = self.layers.len();
                let linked = link && count > 1;
                if linked {
                    self.link_positions = true;
                }
                self.record("Randomize All Layers");
                self.notify(
                    NoticeLevel::Success,
                    format!("Randomized all {count} layers!{}", linked_suffix(linked)),
                );
            }
            RandomizeMode::Create { count, link } => {
                let data = randomize::random_layers(count, center, link, &mut self.rng);
                let count = data.len();
                self.layers.replace_layers(&data, 0);
                let linked = link && count > 1;
                if linked {
                    self.link_positions = true;
                }
                self.record("Create Random Layers");
                self.notify(
                    NoticeLevel::Success,
                    format!("Created {count} random layers!{}", linked_suffix(linked)),
                );
            }
        }
    }

    // ========================================================================
    // Layer management
    // ========================================================================

    pub fn add_layer(&mut self) {
        let index = self.layers.add_layer();
        let name = self.layers.layers()[index].name.clone();
        self.record("Add Layer");
        self.notify(NoticeLevel::Success, format!("Added new layer: {name}"));
    }

    pub fn delete_layer(&mut self) {
        match self.layers.delete_selected() {
            Ok(removed) => {
                self.record("Delete Layer");
                self.notify(NoticeLevel::Info, format!("Deleted layer: {}", removed.name));
            }
            Err(LayerError::LastLayer) => {
                self.notify(NoticeLevel::Error, "Cannot delete the only layer");
            }
            Err(e) => self.notify(NoticeLevel::Error, e.to_string()),
        }
    }

    pub fn duplicate_layer(&mut self) {
        let source = self.layers.selected().name.clone();
        self.layers.duplicate_selected();
        self.record("Duplicate Layer");
        self.notify(NoticeLevel::Success, format!("Duplicated layer: {source}"));
    }

    pub fn move_layer_up(&mut self) {
        if self.layers.move_selected_up() {
            self.record("Reorder Layers");
        }
    }

    pub fn move_layer_down(&mut self) {
        if self.layers.move_selected_down() {
            self.record("Reorder Layers");
        }
    }

    pub fn center_all_layers(&mut self) {
        self.layers.center_all(self.settings.canvas_center());
        self.record("Center All Layers");
        self.notify(NoticeLevel::Success, "All layers centered");
    }

    /// Change the selected layer. Selection is not an undoable change.
    pub fn select_layer(&mut self, index: usize) -> bool {
        self.layers.select(index)
    }

    pub fn toggle_visibility(&mut self, index: usize) {
        match self.layers.toggle_visibility(index) {
            Ok(_) => self.record("Toggle Visibility"),
            Err(e) => self.notify(NoticeLevel::Error, e.to_string()),
        }
    }

    pub fn rename_layer(&mut self, index: usize, name: &str) {
        match self.layers.rename(index, name) {
            Ok(true) => {
                let name = self.layers.layers()[index].name.clone();
                self.record("Rename Layer");
                self.notify(NoticeLevel::Success, format!("Renamed to \"{name}\""));
            }
            Ok(false) => {}
            Err(e) => self.notify(NoticeLevel::Error, e.to_string()),
        }
    }

    // ========================================================================
    // Playback and history
    // ========================================================================

    /// Pause or resume spawning on every layer. Returns `true` if now playing.
    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        if self.playing {
            self.layers.resume_all();
        } else {
            self.layers.pause_all();
        }
        self.playing
    }

    pub fn reset_particles(&mut self) {
        self.layers.clear_all();
    }

    pub fn undo(&mut self) {
        match self.history.undo(&mut self.layers) {
            Some(label) => {
                self.sync_play_state();
                self.dirty = true;
                self.notify(NoticeLevel::Info, format!("Undo: {label}"));
            }
            None => self.notify(NoticeLevel::Info, "Nothing to undo"),
        }
    }

    pub fn redo(&mut self) {
        match self.history.redo(&mut self.layers) {
            Some(label) => {
                self.sync_play_state();
                self.dirty = true;
                self.notify(NoticeLevel::Info, format!("Redo: {label}"));
            }
            None => self.notify(NoticeLevel::Info, "Nothing to redo"),
        }
    }

    /// Rebuilt layers start playing; keep them in line with the toolbar.
    fn sync_play_state(&mut self) {
        if !self.playing {
            self.layers.pause_all();
        }
    }

    // ========================================================================
    // Project lifecycle
    // ========================================================================

    /// Replace the project with a single default layer.
    pub fn new_project(&mut self) {
        self.layers.replace_layers(&[], 0);
        self.history.init(&self.layers);
        self.current_file = None;
        self.playing = true;
        self.dirty = false;
        self.notify(NoticeLevel::Success, "New project created");
    }

    /// The project as a v2.0 document.
    pub fn project_data(&self) -> Value {
        self.layers.project_data()
    }

    /// Pretty-printed v2.0 JSON.
    pub fn export_json(&self) -> Result<String, ProjectError> {
        self.layers.export().to_json_pretty()
    }

    /// Load a v1.x or v2.0 document. The history restarts from it.
    pub fn load_project_data(&mut self, value: &Value) {
        self.layers.load_project_value(value);
        self.sync_play_state();
        self.history.init(&self.layers);
        self.dirty = false;
    }

    pub fn open(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match load_project(path) {
            Ok(layers) => {
                self.layers.replace_layers(&layers, 0);
                self.sync_play_state();
                self.history.init(&self.layers);
                self.current_file = Some(path.to_path_buf());
                self.dirty = false;
                self.notify(NoticeLevel::Success, format!("Loaded {}", path.display()));
            }
            Err(e) => self.notify(NoticeLevel::Error, format!("Load failed: {e}")),
        }
    }

    /// Save to the current file.
    pub fn save(&mut self) {
        match self.current_file.clone() {
            Some(path) => self.save_as(path),
            None => self.notify(NoticeLevel::Warning, "No project file chosen"),
        }
    }

    pub fn save_as(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match save_project(&self.layers, path) {
            Ok(()) => {
                self.current_file = Some(path.to_path_buf());
                self.dirty = false;
                self.notify(NoticeLevel::Success, format!("Saved to {}", path.display()));
            }
            Err(e) => self.notify(NoticeLevel::Error, format!("Save failed: {e}")),
        }
    }
}

fn linked_suffix(linked: bool) -> &'static str {
    if linked {
        " (positions linked)"
    } else {
        ""
    }
}
