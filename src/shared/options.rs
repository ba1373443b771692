//! Zentrale Konfiguration für den Hermite-Strecken-Editor.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::app::RefineScheduler;
use crate::core::solver::MIN_SAMPLES_PER_SEGMENT;
use crate::core::{OptimizeParams, TrackSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Dateiname der Optionen-Datei neben der Binary.
pub const OPTIONS_FILE_NAME: &str = "hermite_track_editor.toml";

// ── Solver ──────────────────────────────────────────────────────────

/// Relaxations-Iterationen beim Laden bzw. nach strukturellen Änderungen.
pub const LOAD_ITERATIONS: usize = 20;
/// Stützstellen pro Segment für die Längenschätzung.
pub const SAMPLES_PER_SEGMENT: usize = 32;

// ── Hintergrund-Verfeinerung ────────────────────────────────────────

/// Iterationen pro Verfeinerungs-Schub.
pub const REFINE_ITERATIONS_PER_BURST: usize = 10;
/// Maximale Anzahl Schübe nach einer Änderung.
pub const REFINE_MAX_BURSTS: usize = 20;
/// Mindestabstand zwischen zwei Schüben in Millisekunden.
pub const REFINE_INTERVAL_MS: u64 = 50;

// ── History ─────────────────────────────────────────────────────────

/// Maximale Anzahl Undo-Schritte.
pub const HISTORY_DEPTH: usize = 100;

// ── Standard-Strecke ────────────────────────────────────────────────

/// Punktanzahl der Standard-Strecke (Kreis).
pub const DEFAULT_POINT_COUNT: usize = 10;
/// Umfang der Standard-Strecke.
pub const DEFAULT_TRACK_LENGTH: f64 = 1000.0;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Editor-Optionen.
/// Wird als `hermite_track_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorOptions {
    // ── Solver ──────────────────────────────────────────────────
    /// Relaxations-Iterationen nach Laden und strukturellen Änderungen
    pub load_iterations: usize,
    /// Stützstellen pro Segment für die Längenschätzung
    pub samples_per_segment: usize,

    // ── Verfeinerung ────────────────────────────────────────────
    /// Iterationen pro Hintergrund-Schub
    pub refine_iterations_per_burst: usize,
    /// Maximale Anzahl Schübe
    pub refine_max_bursts: usize,
    /// Mindestabstand zwischen Schüben (ms)
    pub refine_interval_ms: u64,

    // ── History ─────────────────────────────────────────────────
    /// Maximale Undo-Tiefe
    pub history_depth: usize,

    // ── Standard-Strecke ────────────────────────────────────────
    /// Punktanzahl bei leerer oder zu kleiner Eingabe
    pub default_point_count: usize,
    /// Umfang der Standard-Strecke
    pub default_track_length: f64,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            load_iterations: LOAD_ITERATIONS,
            samples_per_segment: SAMPLES_PER_SEGMENT,

            refine_iterations_per_burst: REFINE_ITERATIONS_PER_BURST,
            refine_max_bursts: REFINE_MAX_BURSTS,
            refine_interval_ms: REFINE_INTERVAL_MS,

            history_depth: HISTORY_DEPTH,

            default_point_count: DEFAULT_POINT_COUNT,
            default_track_length: DEFAULT_TRACK_LENGTH,
        }
    }
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("hermite-track-editor"))
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(OPTIONS_FILE_NAME)
    }

    /// `samples_per_segment`, mindestens zwei Stützstellen je Segment.
    pub fn effective_samples_per_segment(&self) -> usize {
        if self.samples_per_segment < MIN_SAMPLES_PER_SEGMENT {
            log::warn!(
                "samples_per_segment = {} ist zu klein, verwende {}",
                self.samples_per_segment,
                MIN_SAMPLES_PER_SEGMENT
            );
            MIN_SAMPLES_PER_SEGMENT
        } else {
            self.samples_per_segment
        }
    }

    /// Einstellungen für Neuaufbau und Standard-Strecke.
    pub fn track_settings(&self) -> TrackSettings {
        TrackSettings {
            rebuild: OptimizeParams {
                max_iterations: self.load_iterations,
                samples_per_segment: self.effective_samples_per_segment(),
            },
            default_point_count: self.default_point_count,
            default_track_length: self.default_track_length,
        }
    }

    /// Inaktiver Scheduler mit den konfigurierten Schub-Parametern.
    pub fn refine_scheduler(&self) -> RefineScheduler {
        RefineScheduler::new(
            OptimizeParams {
                max_iterations: self.refine_iterations_per_burst,
                samples_per_segment: self.effective_samples_per_segment(),
            },
            self.refine_max_bursts,
            Duration::from_millis(self.refine_interval_ms),
        )
    }
}
