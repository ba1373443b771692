//! Fehler der Editor-Operationen.

use super::HistoryError;
use crate::core::TrackError;
use thiserror::Error;

/// Fehler einer Editor-Operation; der Zustand ist in jedem Fall unverändert.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Vorbedingung der Strecken-Operation verletzt
    #[error(transparent)]
    Track(#[from] TrackError),
    /// Undo/Redo ohne Einträge
    #[error(transparent)]
    History(#[from] HistoryError),
}
