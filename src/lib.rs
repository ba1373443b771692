//! Hermite Track Editor Library.
//! Kurven-Kern (Geometrie, Solver, Track-Modell) plus Undo/Redo und
//! Hintergrund-Optimierung als Library exportiert für Frontends und Tests.

pub mod app;
pub mod core;
pub mod json;
pub mod shared;

pub use app::{
    EditError, EditHistory, HistoryEntry, HistoryError, RefineScheduler, TrackEditor, Undoable,
};
pub use core::{
    default_layout, CurveFrame, OptimizeParams, OptimizeReport, SampleSteps, Samples,
    SelectionMask, Selector, SpatialIndex, SpatialMatch, Track, TrackError, TrackSettings,
    TrackSnapshot, MIN_POINTS,
};
pub use json::{load_track_file, parse_track_json, save_track_file, write_track_json, TrackData};
pub use shared::EditorOptions;
