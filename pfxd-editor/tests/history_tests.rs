//! Undo/redo behavior through the public API.

use pfxd::{DrawList, DVec2, EmitterData, LayerData, LayerStack};
use pfxd_editor::{EditorSettings, EditorState, History, NoticeLevel, DEFAULT_DEBOUNCE};

fn rate_patch(rate: f64) -> LayerData {
    LayerData {
        emitter: Some(EmitterData {
            rate: Some(rate),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[test]
fn test_undo_then_redo_restores_final_state() {
    let mut layers = LayerStack::new().with_seed(1);
    let mut history = History::new();
    history.init(&layers);

    for i in 1..=6 {
        layers
            .selected_mut()
            .update_config(&rate_patch(10.0 * i as f64 + 1.0));
        if i % 2 == 0 {
            layers.add_layer();
        }
        assert!(history.save_state(&layers, &format!("Step {i}")));
    }
    let final_state = layers.to_layer_data();
    let final_selected = layers.selected_index();

    let mut undone = 0;
    while history.undo(&mut layers).is_some() {
        undone += 1;
    }
    assert_eq!(undone, 6);
    assert_eq!(layers.len(), 1);
    assert_eq!(layers.selected().emission.rate, 50.0);

    for _ in 0..6 {
        assert!(history.redo(&mut layers).is_some());
    }
    assert!(history.redo(&mut layers).is_none());
    assert_eq!(layers.to_layer_data(), final_state);
    assert_eq!(layers.selected_index(), final_selected);
}

#[test]
fn test_undo_with_only_initial_entry_is_noop() {
    let mut layers = LayerStack::new();
    let mut history = History::new();
    history.init(&layers);
    let before = layers.to_layer_data();

    assert_eq!(history.undo(&mut layers), None);
    assert_eq!(layers.to_layer_data(), before);
    assert_eq!(history.info().undo_count, 1);
}

#[test]
fn test_new_save_after_undo_clears_redo() {
    let mut layers = LayerStack::new();
    let mut history = History::new();
    history.init(&layers);

    layers.add_layer();
    history.save_state(&layers, "Add Layer");
    history.undo(&mut layers);
    assert!(history.info().can_redo);

    layers.rename(0, "Smoke").unwrap();
    history.save_state(&layers, "Rename Layer");
    let info = history.info();
    assert!(!info.can_redo);
    assert_eq!(info.undo_count, 2);
}

#[test]
fn test_burst_of_debounced_saves_records_once() {
    let mut layers = LayerStack::new();
    let mut history = History::new();
    history.init(&layers);

    for i in 0..10 {
        layers.selected_mut().update_config(&rate_patch(60.0 + i as f64));
        history.save_state_debounced("Change rate", DEFAULT_DEBOUNCE);
        assert!(!history.tick(0.05, &layers));
    }
    assert!(history.tick(DEFAULT_DEBOUNCE, &layers));
    assert!(!history.tick(DEFAULT_DEBOUNCE, &layers));

    assert_eq!(history.info().undo_count, 2);
    assert_eq!(history.undo_label(), Some("Change rate"));

    history.undo(&mut layers);
    assert_eq!(layers.selected().emission.rate, 50.0);
}

#[test]
fn test_undo_drops_live_particles() {
    let mut editor = EditorState::with_seed(EditorSettings::default(), 3);
    let mut canvas = DrawList::new();
    editor.move_emitter(DVec2::new(200.0, 200.0), false);
    for frame in 0..30 {
        editor.frame(frame as f64 * 16.0, &mut canvas);
    }
    assert!(editor.layers().total_particle_count() > 0);

    editor.undo();
    assert_eq!(editor.layers().total_particle_count(), 0);
    assert_eq!(editor.layers().selected().position(), DVec2::new(400.0, 300.0));
}

#[test]
fn test_editor_session() {
    let mut editor = EditorState::with_seed(EditorSettings::default(), 11);

    editor.apply_preset("fire");
    editor.add_layer();
    editor.apply_preset("magic");
    editor.rename_layer(1, "Sparkles");
    assert!(editor.is_dirty());

    let messages: Vec<String> = editor
        .take_notices()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        [
            "Loaded \"Fire\" preset to Layer 1",
            "Added new layer: Layer 2",
            "Loaded \"Magic\" preset to Layer 2",
            "Renamed to \"Sparkles\"",
        ]
    );

    let json = editor.export_json().unwrap();
    let mut reopened = EditorState::with_seed(EditorSettings::default(), 11);
    reopened.load_project_data(&serde_json::from_str(&json).unwrap());
    assert_eq!(
        reopened.layers().to_layer_data(),
        editor.layers().to_layer_data()
    );
    assert!(!reopened.is_dirty());

    reopened.undo();
    let notice = reopened.take_notices().pop().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.message, "Nothing to undo");
}
