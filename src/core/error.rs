//! Fehler der Strecken-Operationen.
//!
//! Alle Varianten sind Vorbedingungsverletzungen: sie werden vor jeder
//! Mutation erkannt, die Strecke bleibt unverändert.

use thiserror::Error;

/// Vorbedingung einer Strecken-Operation nicht erfüllt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// Keine Kontrollpunkte selektiert
    #[error("No control points selected.")]
    NoPointsSelected,
    /// Keine Segmente (zwei benachbarte Punkte) selektiert
    #[error("No segments selected.")]
    NoSegmentsSelected,
    /// Leere Zielliste für die Unterteilung
    #[error("Nothing to subdivide.")]
    NothingToSubdivide,
    /// Leere Zielliste zum Löschen
    #[error("Nothing to delete.")]
    NothingToDelete,
    /// Kein Punkt mit beiden Nachbarn selektiert
    #[error("Nothing to dissolve.")]
    NothingToDissolve,
    /// Löschen würde unter die Mindestanzahl fallen
    #[error("There must be at least three points at all times ({remaining} would remain).")]
    TooFewPoints {
        /// Verbleibende Punkte nach dem Löschen
        remaining: usize,
    },
    /// Index außerhalb der Strecke
    #[error("Control point {index} out of range (track has {len} points).")]
    IndexOutOfRange {
        /// Angefragter Index
        index: usize,
        /// Aktuelle Punktanzahl
        len: usize,
    },
}
