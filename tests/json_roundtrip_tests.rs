//! Roundtrip-Tests für das Persistenz-Format.

use approx::assert_abs_diff_eq;
use glam::DVec3;
use hermite_track_editor::{Selector, Track, TrackEditor};

fn irregular_points() -> Vec<DVec3> {
    vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(120.0, -5.0, 2.0),
        DVec3::new(180.0, 60.0, 4.5),
        DVec3::new(90.0, 140.0, 1.0),
        DVec3::new(-30.0, 80.0, 0.0),
    ]
}

#[test]
fn test_roundtrip_preserves_points_and_styles() {
    let mut editor = TrackEditor::default();
    editor.set_data(irregular_points(), Some(vec![1, 0, 2, 2, 7]));
    editor.set_style(1, 3).expect("Style setzen");

    let text = editor.serialize().expect("Serialisieren");

    let mut restored = TrackEditor::default();
    restored.deserialize(&text).expect("Deserialisieren");

    assert_eq!(restored.track().point_count(), 5);
    assert_eq!(restored.track().styles(), &[1, 3, 2, 2, 7]);
    for (a, b) in restored
        .track()
        .points()
        .iter()
        .zip(editor.track().points())
    {
        assert_abs_diff_eq!(a.distance(*b), 0.0, epsilon = 1e-12);
    }
    assert!(!restored.can_undo());
    assert!(!restored.can_redo());
}

#[test]
fn test_deserialize_clears_history_and_selection() {
    let mut editor = TrackEditor::default();
    editor
        .select(&Selector::Indices(vec![1]), false)
        .expect("Selektion gültig");
    editor.add_after().expect("Einfügen");
    assert!(editor.can_undo());

    let text = editor.serialize().expect("Serialisieren");
    editor.deserialize(&text).expect("Deserialisieren");

    assert!(!editor.can_undo());
    assert!(editor.track().selected_points().is_empty());
    assert_eq!(editor.track().point_count(), 11);
}

#[test]
fn test_derived_data_close_after_roundtrip() {
    let track = Track::new(irregular_points(), None);
    let text = track.serialize().expect("Serialisieren");

    let mut restored = Track::default();
    restored.deserialize(&text).expect("Deserialisieren");

    assert_abs_diff_eq!(
        restored.total_length(),
        track.total_length(),
        epsilon = 1e-6
    );
}

#[test]
fn test_invalid_text_leaves_editor_unchanged() {
    let mut editor = TrackEditor::default();
    editor.set_style(0, 1).expect("Style setzen");
    let before = editor.track().points().to_vec();

    assert!(editor.deserialize("[[1, 2]]").is_err());
    assert_eq!(editor.track().points(), before.as_slice());
    assert!(editor.can_undo());
}

#[test]
fn test_short_file_falls_back_to_default_track() {
    let mut editor = TrackEditor::default();
    editor
        .deserialize("[[0, 0, 0, 4], [1, 0, 0, 4]]")
        .expect("Deserialisieren");
    assert_eq!(editor.track().point_count(), 10);
    assert_eq!(editor.track().styles(), &[0; 10]);
}

#[test]
fn test_file_roundtrip_through_editor() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("strecke.json");

    let mut editor = TrackEditor::default();
    editor.set_data(irregular_points(), None);
    editor.save_file(&path).expect("Speichern");

    let mut loaded = TrackEditor::default();
    loaded.load_file(&path).expect("Laden");
    assert_eq!(loaded.track().points(), editor.track().points());
}
