//! Geteilte Konfiguration für `core`, `app` und die Binary.

pub mod options;

pub use options::EditorOptions;
