//! Editor-Fassade: Strecke, Undo/Redo und Hintergrund-Verfeinerung.
//!
//! Das ist die Mutations-API für Frontends. Jede mutierende Operation läuft
//! als Transaktion: Snapshot vor der Mutation, Mutation (bricht bei
//! verletzter Vorbedingung ohne Änderung ab), bei Erfolg benannter
//! Undo-Eintrag und Neustart der Verfeinerung.

use super::{EditError, EditHistory, RefineScheduler, Undoable};
use crate::core::{OptimizeReport, Selector, Track, TrackError, TrackSnapshot};
use crate::shared::EditorOptions;
use anyhow::Result;
use glam::DVec3;
use std::path::Path;
use std::time::Instant;

impl Undoable for Track {
    type Snapshot = TrackSnapshot;

    fn create_snapshot(&self) -> TrackSnapshot {
        Track::create_snapshot(self)
    }

    fn restore_snapshot(&mut self, snapshot: TrackSnapshot) {
        Track::restore_snapshot(self, snapshot)
    }
}

/// Laufende Verschiebe-Interaktion (z.B. Maus-Drag).
#[derive(Debug)]
struct PendingMove {
    snapshot: TrackSnapshot,
    modified: bool,
}

/// Strecke plus Undo-History und Verfeinerungs-Scheduler.
#[derive(Debug)]
pub struct TrackEditor {
    track: Track,
    history: EditHistory<TrackSnapshot>,
    refiner: RefineScheduler,
    pending_move: Option<PendingMove>,
}

impl Default for TrackEditor {
    fn default() -> Self {
        Self::new(&EditorOptions::default())
    }
}

impl TrackEditor {
    /// Erstellt einen Editor mit der Standard-Strecke.
    pub fn new(options: &EditorOptions) -> Self {
        let track = Track::with_settings(Vec::new(), None, options.track_settings());
        Self::with_track(track, options)
    }

    /// Erstellt einen Editor für eine bestehende Strecke.
    pub fn with_track(track: Track, options: &EditorOptions) -> Self {
        let mut refiner = options.refine_scheduler();
        refiner.restart();
        Self {
            track,
            history: EditHistory::new_with_capacity(options.history_depth),
            refiner,
            pending_move: None,
        }
    }

    /// Read-only Zugriff auf die Strecke (gültig bis zur nächsten Mutation).
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Undo/Redo-History.
    pub fn history(&self) -> &EditHistory<TrackSnapshot> {
        &self.history
    }

    /// Zustand der Hintergrund-Verfeinerung.
    pub fn refiner(&self) -> &RefineScheduler {
        &self.refiner
    }

    fn transaction<F>(&mut self, name: &str, geometry: bool, op: F) -> Result<(), EditError>
    where
        F: FnOnce(&mut Track) -> Result<(), TrackError>,
    {
        self.commit_pending_move();
        let snapshot = self.track.create_snapshot();
        op(&mut self.track)?;
        self.history.record_snapshot(name, snapshot);
        if geometry {
            self.refiner.restart();
        }
        log::info!("{} ({} Kontrollpunkte)", name, self.track.point_count());
        Ok(())
    }

    // ── Daten ersetzen ──────────────────────────────────────────────

    /// Ersetzt alle Daten; die History wird geleert.
    pub fn set_data(&mut self, points: Vec<DVec3>, styles: Option<Vec<u32>>) {
        self.track.set_data(points, styles);
        self.after_replace();
    }

    fn after_replace(&mut self) {
        self.history.clear();
        self.pending_move = None;
        self.refiner.restart();
    }

    /// Punkte und Styles im Persistenz-Format.
    pub fn serialize(&self) -> Result<String> {
        self.track.serialize()
    }

    /// Ersetzt die Daten aus dem Persistenz-Format; die History wird geleert.
    pub fn deserialize(&mut self, text: &str) -> Result<()> {
        self.track.deserialize(text)?;
        self.after_replace();
        Ok(())
    }

    /// Lädt eine Streckendatei; die History wird geleert.
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let data = crate::json::load_track_file(path)?;
        self.set_data(data.points, Some(data.styles));
        log::info!(
            "Strecke geladen aus {}: {} Kontrollpunkte",
            path.display(),
            self.track.point_count()
        );
        Ok(())
    }

    /// Speichert die Strecke als Datei.
    pub fn save_file(&self, path: &Path) -> Result<()> {
        crate::json::save_track_file(path, self.track.points(), self.track.styles())
    }

    // ── Selektion ───────────────────────────────────────────────────

    /// Ändert die Selektion (nicht Teil der Undo-History).
    pub fn select(&mut self, selector: &Selector, multi: bool) -> Result<(), EditError> {
        self.track.select(selector, multi)?;
        Ok(())
    }

    // ── Strukturelle Operationen ────────────────────────────────────

    /// Unterteilt alle selektierten Segmente.
    pub fn subdivide(&mut self) -> Result<(), EditError> {
        self.transaction("Subdivide Segments", true, Track::subdivide)
    }

    /// Fügt hinter jedem selektierten Punkt einen neuen ein.
    pub fn add_after(&mut self) -> Result<(), EditError> {
        self.transaction("Add After Control Points", true, Track::add_after)
    }

    /// Fügt vor jedem selektierten Punkt einen neuen ein.
    pub fn add_before(&mut self) -> Result<(), EditError> {
        self.transaction("Add Before Control Points", true, Track::add_before)
    }

    /// Löscht alle selektierten Punkte.
    pub fn delete(&mut self) -> Result<(), EditError> {
        self.transaction("Delete Control Points", true, Track::delete)
    }

    /// Löscht die inneren Punkte selektierter Läufe.
    pub fn dissolve(&mut self) -> Result<(), EditError> {
        self.transaction("Dissolve Segments", true, Track::dissolve)
    }

    /// Unterteilt explizit angegebene Segmente.
    pub fn subdivide_segments(&mut self, segments: &[usize]) -> Result<(), EditError> {
        self.transaction("Subdivide Segments", true, |t| t.subdivide_segments(segments))
    }

    /// Löscht explizit angegebene Punkte.
    pub fn delete_points(&mut self, indices: &[usize]) -> Result<(), EditError> {
        self.transaction("Delete Control Points", true, |t| t.delete_points(indices))
    }

    // ── Positionen / Styles ─────────────────────────────────────────

    /// Setzt die Position eines Kontrollpunkts.
    pub fn set_point(&mut self, index: usize, position: DVec3) -> Result<(), EditError> {
        self.transaction("Move Control Point", true, |t| t.set_point(index, position))
    }

    /// Verschiebt die gegebenen Kontrollpunkte um `offset`.
    pub fn translate_points(&mut self, indices: &[usize], offset: DVec3) -> Result<(), EditError> {
        self.transaction("Move Control Points", true, |t| {
            t.translate_points(indices, offset)
        })
    }

    /// Setzt den Style eines Kontrollpunkts.
    pub fn set_style(&mut self, index: usize, style: u32) -> Result<(), EditError> {
        self.transaction("Set Style", false, |t| t.set_style(index, style))
    }

    /// Beginnt eine Verschiebe-Interaktion; der Snapshot wird jetzt erfasst.
    pub fn begin_move(&mut self) {
        self.pending_move = Some(PendingMove {
            snapshot: self.track.create_snapshot(),
            modified: false,
        });
    }

    /// Verschiebt die selektierten Punkte.
    ///
    /// Innerhalb von `begin_move`/`finish_move` entsteht ein gemeinsamer
    /// Undo-Eintrag, sonst einer pro Aufruf.
    pub fn translate_selected(&mut self, offset: DVec3) -> Result<(), EditError> {
        match self.pending_move.as_mut() {
            Some(pending) => {
                self.track.translate_selected(offset)?;
                pending.modified = true;
                self.refiner.restart();
                Ok(())
            }
            None => self.transaction("Move Control Points", true, |t| {
                t.translate_selected(offset)
            }),
        }
    }

    /// Schließt die Verschiebe-Interaktion ab; `true` wenn ein Undo-Eintrag entstand.
    pub fn finish_move(&mut self) -> bool {
        let modified = self.pending_move.as_ref().is_some_and(|p| p.modified);
        self.commit_pending_move();
        modified
    }

    /// Beendet eine laufende Verschiebung; bei Änderung entsteht ihr Undo-Eintrag.
    ///
    /// Muss vor jedem anderen Eintrag laufen, sonst landet der ältere
    /// Snapshot über neueren Einträgen.
    fn commit_pending_move(&mut self) {
        if let Some(PendingMove {
            snapshot,
            modified: true,
        }) = self.pending_move.take()
        {
            self.history.record_snapshot("Move Control Points", snapshot);
            log::info!("Move Control Points");
        }
    }

    // ── Undo / Redo ─────────────────────────────────────────────────

    /// Macht den letzten Schritt rückgängig; gibt dessen Namen zurück.
    pub fn undo(&mut self) -> Result<String, EditError> {
        let name = self.history.undo(&mut self.track)?;
        self.pending_move = None;
        self.refiner.restart();
        log::info!("Undo ausgeführt: {}", name);
        Ok(name)
    }

    /// Stellt den zuletzt rückgängig gemachten Schritt wieder her.
    pub fn redo(&mut self) -> Result<String, EditError> {
        let name = self.history.redo(&mut self.track)?;
        self.pending_move = None;
        self.refiner.restart();
        log::info!("Redo ausgeführt: {}", name);
        Ok(name)
    }

    /// Prüft ob Undo möglich ist.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Prüft ob Redo möglich ist.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Name des nächsten Undo-Schritts (z.B. für Menü-Einträge).
    pub fn undo_name(&self) -> Option<&str> {
        self.history.undo_name()
    }

    /// Name des nächsten Redo-Schritts.
    pub fn redo_name(&self) -> Option<&str> {
        self.history.redo_name()
    }

    /// Legt einen Undo-Eintrag ab; ohne Snapshot wird der aktuelle Zustand gesichert.
    pub fn push_undo_record(&mut self, name: &str, snapshot: Option<TrackSnapshot>) {
        self.commit_pending_move();
        let snapshot = snapshot.unwrap_or_else(|| self.track.create_snapshot());
        self.history.record_snapshot(name, snapshot);
    }

    /// Verwirft Undo- und Redo-History.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ── Hintergrund-Verfeinerung ────────────────────────────────────

    /// Für Timer-/Frame-Schleifen: führt bei Fälligkeit einen Schub aus.
    pub fn poll(&mut self, now: Instant) -> Option<OptimizeReport> {
        self.refiner.poll(now, &mut self.track)
    }

    /// Führt sofort einen Schub aus, falls Verfeinerung aktiv ist.
    pub fn tick(&mut self) -> Option<OptimizeReport> {
        self.refiner.tick(&mut self.track)
    }

    /// Arbeitet die Verfeinerung blockierend ab.
    pub fn refine_to_completion(&mut self) -> Option<OptimizeReport> {
        self.refiner.run_to_completion(&mut self.track)
    }
}
