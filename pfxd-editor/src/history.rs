//! Undo/redo history.
//!
//! Every recorded change stores a [`Snapshot`] of all layer settings. The top
//! of the undo stack always matches the current state, so undo pops it onto the
//! redo stack and restores the entry beneath.
//!
//! Continuous edits such as slider drags go through
//! [`History::save_state_debounced`], which coalesces a burst of calls into one
//! entry once input has been quiet for the delay.

use pfxd::{LayerData, LayerStack};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum number of undo entries kept.
pub const MAX_HISTORY_SIZE: usize = 50;

/// Default quiet period before a debounced save fires, in seconds.
pub const DEFAULT_DEBOUNCE: f64 = 0.5;

/// Saved layer settings plus selection.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub layers: Vec<LayerData>,
    pub selected: usize,
    pub label: String,
    /// Milliseconds since the UNIX epoch.
    pub timestamp: u64,
}

impl Snapshot {
    pub fn capture(layers: &LayerStack, label: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            layers: layers.to_layer_data(),
            selected: layers.selected_index(),
            label: label.into(),
            timestamp,
        }
    }
}

/// Trailing-edge debounce timer.
///
/// `Idle` becomes `Pending` on [`Debounce::schedule`]. A pending timer fires
/// once its remaining time runs out under [`Debounce::tick`], or is cancelled.
/// Both return it to `Idle`.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Debounce {
    #[default]
    Idle,
    Pending { label: String, remaining: f64 },
}

impl Debounce {
    /// Start or restart the timer. A pending label is replaced.
    pub fn schedule(&mut self, label: impl Into<String>, delay: f64) {
        *self = Debounce::Pending {
            label: label.into(),
            remaining: delay.max(0.0),
        };
    }

    /// Drop a pending timer. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.is_pending();
        *self = Debounce::Idle;
        was_pending
    }

    /// Advance by `elapsed` seconds. Returns the label when the timer fires.
    pub fn tick(&mut self, elapsed: f64) -> Option<String> {
        let Debounce::Pending { remaining, .. } = self else {
            return None;
        };
        *remaining -= elapsed.max(0.0);
        if *remaining > 0.0 {
            return None;
        }
        match std::mem::take(self) {
            Debounce::Pending { label, .. } => Some(label),
            Debounce::Idle => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Debounce::Pending { .. })
    }

    pub fn pending_label(&self) -> Option<&str> {
        match self {
            Debounce::Pending { label, .. } => Some(label),
            Debounce::Idle => None,
        }
    }
}

/// Stack sizes and availability, for toolbar state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryInfo {
    pub undo_count: usize,
    pub redo_count: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Snapshot undo/redo stacks.
#[derive(Debug)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    restoring: bool,
    debounce: Debounce,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_SIZE)
    }

    /// History keeping at most `capacity` undo entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            restoring: false,
            debounce: Debounce::Idle,
            capacity: capacity.max(1),
        }
    }

    /// Reset both stacks and seed them with an "Initial" snapshot.
    pub fn init(&mut self, layers: &LayerStack) {
        self.clear();
        self.undo.push_back(Snapshot::capture(layers, "Initial"));
    }

    /// Drop every entry and any pending debounced save.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.debounce.cancel();
    }

    /// Record the current state.
    ///
    /// Cancels a pending debounced save. Returns `false` without recording
    /// while a restore is in progress or when nothing changed since the last
    /// entry.
    pub fn save_state(&mut self, layers: &LayerStack, label: &str) -> bool {
        if self.restoring {
            return false;
        }
        self.debounce.cancel();

        let snapshot = Snapshot::capture(layers, label);
        if self
            .undo
            .back()
            .is_some_and(|last| last.layers == snapshot.layers)
        {
            log::debug!("skipping history entry {label:?}: no change");
            return false;
        }

        self.undo.push_back(snapshot);
        if self.undo.len() > self.capacity {
            self.undo.pop_front();
        }
        self.redo.clear();
        log::debug!("recorded {label:?} ({} undo entries)", self.undo.len());
        true
    }

    /// Record the state once `delay` seconds pass without another call.
    pub fn save_state_debounced(&mut self, label: &str, delay: f64) {
        if self.restoring {
            return;
        }
        self.debounce.schedule(label, delay);
    }

    /// Advance the debounce timer by the frame's wall time.
    ///
    /// Returns whether a debounced save fired and recorded an entry.
    pub fn tick(&mut self, elapsed: f64, layers: &LayerStack) -> bool {
        match self.debounce.tick(elapsed) {
            Some(label) => self.save_state(layers, &label),
            None => false,
        }
    }

    /// Step back one entry. Returns the label of the undone change, or `None`
    /// if only the initial entry remains.
    pub fn undo(&mut self, layers: &mut LayerStack) -> Option<String> {
        if self.undo.len() <= 1 {
            return None;
        }
        let undone = self.undo.pop_back()?;
        let label = undone.label.clone();
        self.redo.push(undone);

        if let Some(previous) = self.undo.back() {
            self.restoring = true;
            apply(previous, layers);
            self.restoring = false;
        }
        log::info!("undo: {label}");
        Some(label)
    }

    /// Re-apply the last undone entry. Returns its label, or `None` if there
    /// is nothing to redo.
    pub fn redo(&mut self, layers: &mut LayerStack) -> Option<String> {
        let snapshot = self.redo.pop()?;
        self.restoring = true;
        apply(&snapshot, layers);
        self.restoring = false;

        let label = snapshot.label.clone();
        self.undo.push_back(snapshot);
        log::info!("redo: {label}");
        Some(label)
    }

    /// Rebuild `layers` from `snapshot` without recording anything.
    pub fn restore(&mut self, snapshot: &Snapshot, layers: &mut LayerStack) {
        self.restoring = true;
        apply(snapshot, layers);
        self.restoring = false;
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn debounce(&self) -> &Debounce {
        &self.debounce
    }

    /// Label of the entry an undo would revert.
    pub fn undo_label(&self) -> Option<&str> {
        if self.undo.len() > 1 {
            self.undo.back().map(|s| s.label.as_str())
        } else {
            None
        }
    }

    pub fn info(&self) -> HistoryInfo {
        HistoryInfo {
            undo_count: self.undo.len(),
            redo_count: self.redo.len(),
            can_undo: self.undo.len() > 1,
            can_redo: !self.redo.is_empty(),
        }
    }
}

/// Replace every layer with the snapshot's, dropping live particles.
fn apply(snapshot: &Snapshot, layers: &mut LayerStack) {
    layers.replace_layers(&snapshot.layers, snapshot.selected);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_states() {
        let mut debounce = Debounce::default();
        assert_eq!(debounce.tick(1.0), None);

        debounce.schedule("a", 0.5);
        assert_eq!(debounce.tick(0.3), None);
        debounce.schedule("b", 0.5);
        assert_eq!(debounce.tick(0.3), None);
        assert_eq!(debounce.pending_label(), Some("b"));
        assert_eq!(debounce.tick(0.3), Some("b".to_string()));
        assert!(!debounce.is_pending());

        debounce.schedule("c", 0.5);
        assert!(debounce.cancel());
        assert!(!debounce.cancel());
        assert_eq!(debounce.tick(1.0), None);
    }

    #[test]
    fn test_init_seeds_initial_entry() {
        let layers = LayerStack::new();
        let mut history = History::new();
        history.init(&layers);
        let info = history.info();
        assert_eq!(info.undo_count, 1);
        assert!(!info.can_undo);
        assert!(!info.can_redo);
        assert_eq!(history.undo_label(), None);
    }

    #[test]
    fn test_unchanged_state_is_skipped() {
        let mut layers = LayerStack::new();
        let mut history = History::new();
        history.init(&layers);
        assert!(!history.save_state(&layers, "Nothing"));

        layers.add_layer();
        assert!(history.save_state(&layers, "Add Layer"));
        assert_eq!(history.undo_label(), Some("Add Layer"));
    }

    #[test]
    fn test_selection_alone_is_not_a_change() {
        let mut layers = LayerStack::new();
        layers.add_layer();
        let mut history = History::new();
        history.init(&layers);
        layers.select(0);
        assert!(!history.save_state(&layers, "Select"));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut layers = LayerStack::new();
        let mut history = History::with_capacity(3);
        history.init(&layers);
        for rate in 1..=5 {
            layers.selected_mut().emission.rate = rate as f64;
            history.save_state(&layers, "Change rate");
        }
        assert_eq!(history.info().undo_count, 3);

        while history.undo(&mut layers).is_some() {}
        assert_eq!(layers.selected().emission.rate, 3.0);
    }

    #[test]
    fn test_restore_drops_particles_and_clamps_selection() {
        let mut layers = LayerStack::new().with_seed(4);
        layers.update(0.5);
        assert!(layers.total_particle_count() > 0);

        let mut snapshot = Snapshot::capture(&layers, "x");
        snapshot.selected = 7;
        let mut history = History::new();
        history.restore(&snapshot, &mut layers);

        assert_eq!(layers.total_particle_count(), 0);
        assert_eq!(layers.selected_index(), 0);
        assert!(!history.is_restoring());
    }

    #[test]
    fn test_save_cancels_pending_debounce() {
        let mut layers = LayerStack::new();
        let mut history = History::new();
        history.init(&layers);

        history.save_state_debounced("Slider", DEFAULT_DEBOUNCE);
        layers.add_layer();
        assert!(history.save_state(&layers, "Add Layer"));
        assert!(!history.debounce().is_pending());
        assert!(!history.tick(1.0, &layers));
        assert_eq!(history.info().undo_count, 2);
    }
}
