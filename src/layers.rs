//! Ordered stack of emitter layers.
//!
//! Layer 0 renders first (bottom), the last layer renders on top. One layer is
//! always selected and the stack never becomes empty.

use crate::canvas::Canvas;
use crate::emitter::Emitter;
use crate::error::LayerError;
use crate::schema::{decode_layers, LayerData, ProjectFile};
use glam::DVec2;
use serde_json::Value;

/// Layers plus the selection.
#[derive(Clone, Debug)]
pub struct LayerStack {
    layers: Vec<Emitter>,
    selected: usize,
    seed: Option<u64>,
    seeded: u64,
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStack {
    /// A stack holding a single default layer named "Layer 1".
    pub fn new() -> Self {
        Self {
            layers: vec![Emitter::new("Layer 1")],
            selected: 0,
            seed: None,
            seeded: 0,
        }
    }

    /// Give every current and future layer a deterministic random sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.seeded = 0;
        let layers = std::mem::take(&mut self.layers);
        let reseeded: Vec<Emitter> = layers.into_iter().map(|e| self.adopt(e)).collect();
        self.layers = reseeded;
        self
    }

    /// Build a stack from decoded layers. An empty list yields one default
    /// layer and the selection is clamped into range.
    pub fn from_layer_data(layers: &[LayerData], selected: usize) -> Self {
        let mut stack = Self::new();
        stack.replace_layers(layers, selected);
        stack
    }

    /// Replace every layer, dropping all live particles.
    pub fn replace_layers(&mut self, layers: &[LayerData], selected: usize) {
        let mut rebuilt: Vec<Emitter> = layers
            .iter()
            .map(|data| self.adopt(Emitter::from_layer_data(data)))
            .collect();
        if rebuilt.is_empty() {
            rebuilt.push(self.adopt(Emitter::new("Layer 1")));
        }
        self.selected = selected.min(rebuilt.len() - 1);
        self.layers = rebuilt;
    }

    /// Replace the stack with the layers of a v1.x or v2.0 document.
    pub fn load_project_value(&mut self, value: &Value) {
        let layers = decode_layers(value);
        log::info!("loading {} layer(s)", layers.len().max(1));
        self.replace_layers(&layers, 0);
    }

    fn adopt(&mut self, emitter: Emitter) -> Emitter {
        match self.seed {
            Some(seed) => {
                self.seeded += 1;
                emitter.with_seed(seed.wrapping_add(self.seeded))
            }
            None => emitter,
        }
    }

    fn check_index(&self, index: usize) -> Result<(), LayerError> {
        if index < self.layers.len() {
            Ok(())
        } else {
            Err(LayerError::IndexOutOfRange {
                index,
                len: self.layers.len(),
            })
        }
    }

    /// Append a default layer named "Layer N" and select it.
    pub fn add_layer(&mut self) -> usize {
        let name = format!("Layer {}", self.layers.len() + 1);
        let emitter = self.adopt(Emitter::new(name));
        self.layers.push(emitter);
        self.selected = self.layers.len() - 1;
        self.selected
    }

    /// Remove the selected layer and return it.
    pub fn delete_selected(&mut self) -> Result<Emitter, LayerError> {
        if self.layers.len() <= 1 {
            return Err(LayerError::LastLayer);
        }
        let removed = self.layers.remove(self.selected);
        if self.selected >= self.layers.len() {
            self.selected = self.layers.len() - 1;
        }
        Ok(removed)
    }

    /// Copy the selected layer's settings into a new visible layer directly
    /// above it and select the copy.
    pub fn duplicate_selected(&mut self) -> usize {
        let source = &self.layers[self.selected];
        let mut data = source.to_layer_data();
        data.name = Some(format!("{} (Copy)", source.name));
        data.visible = Some(true);

        let copy = self.adopt(Emitter::from_layer_data(&data));
        self.layers.insert(self.selected + 1, copy);
        self.selected += 1;
        self.selected
    }

    /// Swap the selected layer with the one rendered above it.
    pub fn move_selected_up(&mut self) -> bool {
        if self.selected + 1 >= self.layers.len() {
            return false;
        }
        self.layers.swap(self.selected, self.selected + 1);
        self.selected += 1;
        true
    }

    /// Swap the selected layer with the one rendered below it.
    pub fn move_selected_down(&mut self) -> bool {
        if self.selected == 0 {
            return false;
        }
        self.layers.swap(self.selected, self.selected - 1);
        self.selected -= 1;
        true
    }

    /// Move every emitter to `center`.
    pub fn center_all(&mut self, center: DVec2) {
        for layer in &mut self.layers {
            layer.set_position(center);
        }
    }

    /// Change the selection. Returns `false` when out of range or already selected.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.layers.len() || index == self.selected {
            return false;
        }
        self.selected = index;
        true
    }

    /// Flip a layer's visibility and return the new value.
    pub fn toggle_visibility(&mut self, index: usize) -> Result<bool, LayerError> {
        self.check_index(index)?;
        let layer = &mut self.layers[index];
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Rename a layer to the trimmed `name`.
    ///
    /// Returns `Ok(false)` if the name did not change.
    pub fn rename(&mut self, index: usize, name: &str) -> Result<bool, LayerError> {
        self.check_index(index)?;
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(LayerError::BlankName);
        }
        let layer = &mut self.layers[index];
        if layer.name == trimmed {
            return Ok(false);
        }
        layer.name = trimmed.to_string();
        Ok(true)
    }

    pub fn selected(&self) -> &Emitter {
        &self.layers[self.selected]
    }

    pub fn selected_mut(&mut self) -> &mut Emitter {
        &mut self.layers[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn get(&self, index: usize) -> Option<&Emitter> {
        self.layers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Emitter> {
        self.layers.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Emitter> {
        self.layers.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Emitter> {
        self.layers.iter_mut()
    }

    pub fn layers(&self) -> &[Emitter] {
        &self.layers
    }

    /// Advance every layer, hidden ones included.
    pub fn update(&mut self, dt: f64) {
        for layer in &mut self.layers {
            layer.update(dt);
        }
    }

    /// Draw visible layers bottom to top. Only the selected layer gets an
    /// indicator.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, show_indicator: bool) {
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.visible {
                layer.draw(canvas, show_indicator && i == self.selected);
            }
        }
    }

    pub fn total_particle_count(&self) -> usize {
        self.layers.iter().map(Emitter::particle_count).sum()
    }

    pub fn pause_all(&mut self) {
        self.layers.iter_mut().for_each(Emitter::pause);
    }

    pub fn resume_all(&mut self) {
        self.layers.iter_mut().for_each(Emitter::resume);
    }

    pub fn clear_all(&mut self) {
        self.layers.iter_mut().for_each(Emitter::clear);
    }

    /// Configuration of every layer, without particles.
    pub fn to_layer_data(&self) -> Vec<LayerData> {
        self.layers.iter().map(Emitter::to_layer_data).collect()
    }

    /// A v2.0 document of the whole stack.
    pub fn export(&self) -> ProjectFile {
        ProjectFile::new(self.to_layer_data())
    }

    /// The v2.0 document as JSON.
    pub fn project_data(&self) -> Value {
        self.export().to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw_list::DrawList;
    use serde_json::json;

    fn names(stack: &LayerStack) -> Vec<&str> {
        stack.iter().map(|l| l.name.as_str()).collect()
    }

    #[test]
    fn test_new_has_one_layer() {
        let stack = LayerStack::new();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.selected_index(), 0);
        assert_eq!(stack.selected().name, "Layer 1");
    }

    #[test]
    fn test_add_and_delete() {
        let mut stack = LayerStack::new();
        assert_eq!(stack.add_layer(), 1);
        assert_eq!(stack.add_layer(), 2);
        assert_eq!(names(&stack), ["Layer 1", "Layer 2", "Layer 3"]);

        let removed = stack.delete_selected().unwrap();
        assert_eq!(removed.name, "Layer 3");
        assert_eq!(stack.selected_index(), 1);

        stack.select(0);
        stack.delete_selected().unwrap();
        assert_eq!(names(&stack), ["Layer 2"]);
        assert_eq!(stack.delete_selected().unwrap_err(), LayerError::LastLayer);
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_duplicate_inserts_after_source() {
        let mut stack = LayerStack::new().with_seed(3);
        stack.add_layer();
        stack.select(0);
        stack.selected_mut().visible = false;
        stack.selected_mut().emission.rate = 7.0;
        stack.update(1.0);

        assert_eq!(stack.duplicate_selected(), 1);
        assert_eq!(names(&stack), ["Layer 1", "Layer 1 (Copy)", "Layer 2"]);
        let copy = stack.selected();
        assert!(copy.visible);
        assert_eq!(copy.emission.rate, 7.0);
        assert_eq!(copy.particle_count(), 0);
    }

    #[test]
    fn test_reorder_follows_selection() {
        let mut stack = LayerStack::new();
        stack.add_layer();
        stack.select(0);

        assert!(stack.move_selected_up());
        assert_eq!(names(&stack), ["Layer 2", "Layer 1"]);
        assert_eq!(stack.selected_index(), 1);
        assert!(!stack.move_selected_up());

        assert!(stack.move_selected_down());
        assert!(!stack.move_selected_down());
        assert_eq!(names(&stack), ["Layer 1", "Layer 2"]);
    }

    #[test]
    fn test_select_rules() {
        let mut stack = LayerStack::new();
        stack.add_layer();
        assert!(!stack.select(1));
        assert!(!stack.select(5));
        assert!(stack.select(0));
    }

    #[test]
    fn test_rename() {
        let mut stack = LayerStack::new();
        assert_eq!(stack.rename(0, "  Embers "), Ok(true));
        assert_eq!(stack.selected().name, "Embers");
        assert_eq!(stack.rename(0, "Embers"), Ok(false));
        assert_eq!(stack.rename(0, "   "), Err(LayerError::BlankName));
        assert_eq!(
            stack.rename(3, "x"),
            Err(LayerError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(stack.selected().name, "Embers");
    }

    #[test]
    fn test_toggle_visibility_hides_from_draw() {
        let mut stack = LayerStack::new().with_seed(1);
        stack.update(0.1);
        assert_eq!(stack.toggle_visibility(0), Ok(false));

        let mut list = DrawList::new();
        stack.draw(&mut list, true);
        assert!(list.is_empty());
        // Hidden layers still simulate
        assert_eq!(stack.total_particle_count(), 5);
    }

    #[test]
    fn test_indicator_only_on_selected() {
        let mut stack = LayerStack::new();
        stack.add_layer();
        let mut one = DrawList::new();
        stack.draw(&mut one, true);

        let mut solo = DrawList::new();
        stack.selected().draw_indicator(&mut solo);
        assert_eq!(one.len(), solo.len());
    }

    #[test]
    fn test_replace_layers_clamps_and_never_empties() {
        let mut stack = LayerStack::new();
        stack.replace_layers(&[], 4);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.selected_index(), 0);

        let data = vec![LayerData::default(), LayerData::default()];
        let stack = LayerStack::from_layer_data(&data, 9);
        assert_eq!(stack.selected_index(), 1);
    }

    #[test]
    fn test_center_and_pause_all() {
        let mut stack = LayerStack::new();
        stack.add_layer();
        stack.center_all(DVec2::new(10.0, 20.0));
        assert!(stack.iter().all(|l| l.position() == DVec2::new(10.0, 20.0)));

        stack.pause_all();
        assert!(stack.iter().all(Emitter::is_paused));
        stack.update(1.0);
        assert_eq!(stack.total_particle_count(), 0);
        stack.resume_all();
        stack.update(1.0);
        assert_eq!(stack.total_particle_count(), 100);
        stack.clear_all();
        assert_eq!(stack.total_particle_count(), 0);
    }

    #[test]
    fn test_project_data_is_v2() {
        let mut stack = LayerStack::new();
        stack.add_layer();
        let value = stack.project_data();
        assert_eq!(value["version"], "2.0");
        assert_eq!(value["layers"].as_array().unwrap().len(), 2);
        assert_eq!(value["layers"][1]["name"], "Layer 2");

        let mut loaded = LayerStack::new();
        loaded.load_project_value(&json!({"version": "2.0", "layers": []}));
        assert_eq!(loaded.len(), 1);
        loaded.load_project_value(&value);
        assert_eq!(loaded.to_layer_data(), stack.to_layer_data());
    }
}
