//! Editing layer for pfxd particle effects.
//!
//! - [`EditorState`] - the controller behind the designer UI
//! - [`History`] - snapshot undo/redo with debounced recording
//! - [`presets`] - built-in effect presets
//! - [`randomize`] - random effect generation
//! - [`project`] - project files on disk
//!
//! The `egui` feature adds [`preview::EguiCanvas`] for drawing the live effect
//! in an egui panel.

pub mod app;
pub mod history;
pub mod presets;
#[cfg(feature = "egui")]
pub mod preview;
pub mod project;
pub mod randomize;

pub use app::{Command, EditorSettings, EditorState, Notice, NoticeLevel};
pub use history::{Debounce, History, HistoryInfo, Snapshot, DEFAULT_DEBOUNCE, MAX_HISTORY_SIZE};
pub use presets::{Preset, PRESETS};
pub use project::{load_project, save_project};
pub use randomize::RandomizeMode;
