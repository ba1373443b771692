//! Core-Domäne: Hermite-Geometrie, Solver, Selektion und das Strecken-Modell.

pub mod error;
/// Zustandslose Geometrie-Funktionen
///
/// Tangenten, Koeffizienten, Auswertung, Krümmung und Längenschätzung
/// für geschlossene kubische Hermite-Kurven.
pub mod hermite;
pub mod selection;
pub mod solver;
pub mod spatial;
pub mod track;

pub use error::TrackError;
pub use hermite::{SampleSteps, Samples};
pub use selection::{SelectionMask, Selector};
pub use solver::{CurveFrame, OptimizeParams, OptimizeReport};
pub use spatial::{SpatialIndex, SpatialMatch};
pub use track::{default_layout, Track, TrackSettings, TrackSnapshot, MIN_POINTS};
