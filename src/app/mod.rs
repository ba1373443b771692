//! Application-Layer: Editor-Fassade, Undo/Redo und Hintergrund-Verfeinerung.

pub mod editor;
pub mod error;
pub mod history;
pub mod refine;

pub use editor::TrackEditor;
pub use error::EditError;
pub use history::{EditHistory, HistoryEntry, HistoryError, Undoable};
pub use refine::RefineScheduler;
