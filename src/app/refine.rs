//! Hintergrund-Verfeinerung der Kurve in kurzen Schüben.
//!
//! Nach jeder Änderung läuft die günstige Konstruktion synchron; die teure
//! Krümmungs-Relaxation wird auf mehrere Schübe mit begrenzter
//! Iterationszahl verteilt. Der Host ruft `poll` aus seiner Frame- oder
//! Timer-Schleife auf, jeder Schub ist eine vollständige, konsistente
//! Aktualisierung der Strecke.
//!
//! - `restart` (nach Änderungen): Budget zurücksetzen
//! - `tick` / `poll`: vorhandenes Budget weiter verbrauchen

use crate::core::{OptimizeParams, OptimizeReport, Track};
use std::time::{Duration, Instant};

/// Zustand der Schub-Planung.
#[derive(Debug, Clone)]
pub struct RefineScheduler {
    burst: OptimizeParams,
    max_bursts: usize,
    interval: Duration,
    bursts_done: usize,
    active: bool,
    last_run: Option<Instant>,
    last_report: Option<OptimizeReport>,
}

impl Default for RefineScheduler {
    fn default() -> Self {
        Self::new(
            OptimizeParams {
                max_iterations: 10,
                samples_per_segment: 32,
            },
            20,
            Duration::from_millis(50),
        )
    }
}

impl RefineScheduler {
    /// Erstellt einen inaktiven Scheduler.
    pub fn new(burst: OptimizeParams, max_bursts: usize, interval: Duration) -> Self {
        Self {
            burst,
            max_bursts,
            interval,
            bursts_done: 0,
            active: false,
            last_run: None,
            last_report: None,
        }
    }

    /// Startet die Verfeinerung neu; ein laufendes Budget wird zurückgesetzt.
    pub fn restart(&mut self) {
        self.bursts_done = 0;
        self.active = self.max_bursts > 0;
        self.last_run = None;
        log::debug!("Verfeinerung (neu) gestartet");
    }

    /// Stoppt weitere Schübe; der zuletzt berechnete Zustand bleibt gültig.
    pub fn stop(&mut self) {
        self.active = false;
    }

    /// `true` solange noch Schübe geplant sind.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Bereits ausgeführte Schübe seit dem letzten Neustart.
    pub fn bursts_done(&self) -> usize {
        self.bursts_done
    }

    /// Noch verbleibende Schübe.
    pub fn remaining_bursts(&self) -> usize {
        if self.active {
            self.max_bursts.saturating_sub(self.bursts_done)
        } else {
            0
        }
    }

    /// Ergebnis des letzten Schubs.
    pub fn last_report(&self) -> Option<OptimizeReport> {
        self.last_report
    }

    /// Führt sofort einen Schub aus, falls aktiv.
    ///
    /// Stoppt nach Erreichen des Budgets oder bei Konvergenz.
    pub fn tick(&mut self, track: &mut Track) -> Option<OptimizeReport> {
        if !self.active {
            return None;
        }

        let report = track.optimize(self.burst);
        self.bursts_done += 1;
        self.last_report = Some(report);

        if report.converged || self.bursts_done >= self.max_bursts {
            self.active = false;
            log::debug!(
                "Verfeinerung beendet nach {} Schub/Schüben (Rest {:.3e})",
                self.bursts_done,
                report.residual
            );
        }

        Some(report)
    }

    /// Führt einen Schub aus, wenn seit dem letzten mindestens `interval` vergangen ist.
    pub fn poll(&mut self, now: Instant, track: &mut Track) -> Option<OptimizeReport> {
        if !self.active {
            return None;
        }
        if let Some(last) = self.last_run {
            if now.saturating_duration_since(last) < self.interval {
                return None;
            }
        }
        self.last_run = Some(now);
        self.tick(track)
    }

    /// Arbeitet das restliche Budget blockierend ab (Batch-Betrieb, Tests).
    pub fn run_to_completion(&mut self, track: &mut Track) -> Option<OptimizeReport> {
        while self.active {
            self.tick(track);
        }
        self.last_report
    }
}
