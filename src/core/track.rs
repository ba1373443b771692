//! Das Strecken-Modell: Kontrollpunkte, Styles, Selektion und abgeleitete Kurvendaten.
//!
//! Alle Arrays haben dieselbe Länge `n >= 3` und sind zyklisch. Abgeleitete
//! Daten (Tangenten, Längen, Koeffizienten, Distanzen) werden nie von außen
//! geschrieben, sondern nach jeder Änderung neu berechnet, bevor eine
//! Methode zurückkehrt. Schreibzugriffe laufen ausschließlich über Setter.
//!
//! Strukturelle Operationen prüfen alle Vorbedingungen vor der ersten
//! Mutation; ein `Err` lässt die Strecke unverändert.

use super::hermite::{self, SampleSteps, Samples};
use super::solver::{self, CurveFrame, OptimizeParams, OptimizeReport};
use super::{SelectionMask, Selector, SpatialIndex, TrackError};
use glam::{DVec2, DVec3};

/// Mindestanzahl an Kontrollpunkten einer geschlossenen Strecke.
pub const MIN_POINTS: usize = 3;

/// Parameter, die das Modell selbst für Rebuilds benötigt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSettings {
    /// Optimierungs-Budget nach Laden, Strukturänderung und Wiederherstellung
    pub rebuild: OptimizeParams,
    /// Punktanzahl der Ersatz-Strecke
    pub default_point_count: usize,
    /// Umfang der Ersatz-Strecke
    pub default_track_length: f64,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            rebuild: OptimizeParams {
                max_iterations: 20,
                samples_per_segment: 32,
            },
            default_point_count: 10,
            default_track_length: 1000.0,
        }
    }
}

/// Unveränderliche Tiefenkopie des editierbaren Zustands.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSnapshot {
    points: Vec<DVec3>,
    styles: Vec<u32>,
    selection: SelectionMask,
}

impl TrackSnapshot {
    /// Punkte zum Zeitpunkt des Snapshots.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Styles zum Zeitpunkt des Snapshots.
    pub fn styles(&self) -> &[u32] {
        &self.styles
    }

    /// Selektion zum Zeitpunkt des Snapshots.
    pub fn selection(&self) -> &SelectionMask {
        &self.selection
    }
}

/// Geschlossene Hermite-Strecke
#[derive(Debug, Clone)]
pub struct Track {
    points: Vec<DVec3>,
    styles: Vec<u32>,
    selection: SelectionMask,
    curve: CurveFrame,
    /// `[start, ende]` der kumulierten Distanz je Segment
    distances: Vec<[f64; 2]>,
    spatial_index: SpatialIndex,
    settings: TrackSettings,
}

/// Regelmäßiges Polygon auf einem Kreis mit dem gegebenen Umfang.
///
/// Punkt 0 liegt auf der positiven y-Achse, die Reihenfolge läuft im Uhrzeigersinn.
pub fn default_layout(count: usize, circumference: f64) -> Vec<DVec3> {
    let count = count.max(MIN_POINTS);
    let radius = circumference / std::f64::consts::TAU;
    (0..count)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / count as f64;
            DVec3::new(radius * angle.sin(), radius * angle.cos(), 0.0)
        })
        .collect()
}

impl Default for Track {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl Track {
    /// Erstellt eine Strecke; weniger als drei Punkte ergeben die Ersatz-Strecke.
    pub fn new(points: Vec<DVec3>, styles: Option<Vec<u32>>) -> Self {
        Self::with_settings(points, styles, TrackSettings::default())
    }

    /// Wie [`Track::new`], mit eigenen Rebuild-Parametern.
    pub fn with_settings(
        points: Vec<DVec3>,
        styles: Option<Vec<u32>>,
        settings: TrackSettings,
    ) -> Self {
        let mut track = Self {
            points: Vec::new(),
            styles: Vec::new(),
            selection: SelectionMask::new(0),
            curve: CurveFrame::default(),
            distances: Vec::new(),
            spatial_index: SpatialIndex::empty(),
            settings,
        };
        track.set_data(points, styles);
        track
    }

    /// Ersetzt alle Daten. Selektion wird geleert, Kurve neu konstruiert und optimiert.
    ///
    /// Weniger als drei Punkte sind kein Fehler: dann wird die Ersatz-Strecke geladen.
    pub fn set_data(&mut self, points: Vec<DVec3>, styles: Option<Vec<u32>>) {
        let (points, styles) = if points.len() < MIN_POINTS {
            if !points.is_empty() {
                log::warn!(
                    "Nur {} Kontrollpunkt(e), verwende Standard-Strecke",
                    points.len()
                );
            }
            let layout = default_layout(
                self.settings.default_point_count,
                self.settings.default_track_length,
            );
            (layout, None)
        } else {
            (points, styles)
        };

        let n = points.len();
        let mut styles = styles.unwrap_or_else(|| vec![0; n]);
        if styles.len() != n {
            log::warn!(
                "{} Styles für {} Punkte, fehlende werden mit 0 aufgefüllt",
                styles.len(),
                n
            );
            styles.resize(n, 0);
        }

        self.points = points;
        self.styles = styles;
        self.selection = SelectionMask::new(n);
        self.refresh_topology();
        log::debug!("Strecke mit {} Kontrollpunkten gesetzt", n);
    }

    // ── Lesezugriffe ────────────────────────────────────────────────

    /// Anzahl der Kontrollpunkte (= Anzahl der Segmente).
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Positionen der Kontrollpunkte.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Einheitstangenten je Kontrollpunkt.
    pub fn tangents(&self) -> &[DVec3] {
        &self.curve.tangents
    }

    /// Segmentlängen (Bogenlängen-Schätzung nach Optimierung).
    pub fn segment_lengths(&self) -> &[f64] {
        &self.curve.lengths
    }

    /// Skalierte Starttangenten `M0` je Segment.
    pub fn scaled_tangents(&self) -> &[DVec3] {
        &self.curve.m0
    }

    /// Kubische Koeffizienten `A` je Segment.
    pub fn coeff_a(&self) -> &[DVec3] {
        &self.curve.a
    }

    /// Quadratische Koeffizienten `B` je Segment.
    pub fn coeff_b(&self) -> &[DVec3] {
        &self.curve.b
    }

    /// Alle abgeleiteten Kurvendaten.
    pub fn curve(&self) -> &CurveFrame {
        &self.curve
    }

    /// `[start, ende]` der kumulierten Distanz je Segment.
    pub fn distances(&self) -> &[[f64; 2]] {
        &self.distances
    }

    /// Länge der geschlossenen Kurve.
    pub fn total_length(&self) -> f64 {
        self.distances.last().map(|d| d[1]).unwrap_or(0.0)
    }

    /// Style je Kontrollpunkt.
    pub fn styles(&self) -> &[u32] {
        &self.styles
    }

    /// Aktuell wirksame Rebuild-Parameter.
    pub fn settings(&self) -> &TrackSettings {
        &self.settings
    }

    /// Selektionsmaske (inkl. Spiegel-Eintrag).
    pub fn selection(&self) -> &SelectionMask {
        &self.selection
    }

    /// Selektierte Kontrollpunkte.
    pub fn selected_points(&self) -> Vec<usize> {
        self.selection.selected_points()
    }

    /// Segmente mit selektiertem Start- und Endpunkt.
    pub fn selected_segments(&self) -> Vec<usize> {
        self.selection.selected_segments()
    }

    /// Selektierte Punkte mit selektierten Nachbarn.
    pub fn selected_inner(&self) -> Vec<usize> {
        self.selection.selected_inner()
    }

    /// Wertet alle Segmente aus (für Renderer und Vorschau).
    pub fn evaluate(&self, steps: &SampleSteps) -> Samples {
        self.curve.evaluate(&self.points, steps)
    }

    /// Dichte Distanz-Reihe entlang der Kurve, `samples_per_segment` Werte je Segment.
    pub fn sample_distances(&self, samples_per_segment: usize) -> Vec<f64> {
        hermite::estimate_distances(&self.evaluate(&SampleSteps::Uniform(samples_per_segment)))
    }

    /// Summe der absoluten Krümmungssprünge an allen Kontrollpunkten.
    pub fn residual(&self) -> f64 {
        hermite::discontinuity(&self.evaluate(&SampleSteps::endpoints()))
            .iter()
            .map(|e| e.abs())
            .sum()
    }

    /// Nächster Kontrollpunkt (xy) innerhalb von `radius`.
    pub fn nearest_point(&self, position: DVec2, radius: f64) -> Option<usize> {
        self.spatial_index
            .nearest(position)
            .filter(|m| m.distance <= radius)
            .map(|m| m.index)
    }

    /// Alle Kontrollpunkte (xy) innerhalb von `radius`, der nächste zuerst.
    pub fn points_within_radius(&self, position: DVec2, radius: f64) -> Vec<usize> {
        self.spatial_index
            .within_radius(position, radius)
            .into_iter()
            .map(|m| m.index)
            .collect()
    }

    /// Alle Kontrollpunkte (xy) innerhalb des Rechtecks.
    pub fn points_within_rect(&self, min: DVec2, max: DVec2) -> Vec<usize> {
        self.spatial_index.within_rect(min, max)
    }

    // ── Ableitung / Optimierung ─────────────────────────────────────

    /// Konstruiert die Kurve neu.
    ///
    /// Mit `keep_estimates` bleiben Tangenten und Längen erhalten (nur Positionen
    /// geändert), sonst werden sie aus den Punkten geschätzt.
    pub fn rebuild(&mut self, keep_estimates: bool) {
        let curve = std::mem::take(&mut self.curve);
        self.curve = if keep_estimates && curve.tangents.len() == self.points.len() {
            solver::construct(&self.points, Some(curve.tangents), Some(curve.lengths))
        } else {
            solver::construct(&self.points, None, None)
        };
        self.update_distances();
    }

    /// Führt eine Optimierung ausgehend von den aktuellen Tangenten/Längen aus.
    pub fn optimize(&mut self, params: OptimizeParams) -> OptimizeReport {
        let curve = std::mem::take(&mut self.curve);
        let (curve, report) = solver::optimize(&self.points, curve.tangents, curve.lengths, params);
        self.curve = curve;
        self.update_distances();
        report
    }

    fn update_distances(&mut self) {
        let mut start = 0.0;
        self.distances = self
            .curve
            .lengths
            .iter()
            .map(|len| {
                let end = start + len;
                let entry = [start, end];
                start = end;
                entry
            })
            .collect();
    }

    /// Nach Änderung der Topologie: Index, Konstruktion und Optimierung komplett neu.
    fn refresh_topology(&mut self) {
        self.spatial_index = SpatialIndex::from_points(&self.points);
        self.rebuild(false);
        self.optimize(self.settings.rebuild);
    }

    /// Nach reiner Positionsänderung: Index neu, Konstruktion mit alten Schätzungen.
    fn refresh_positions(&mut self) {
        self.spatial_index = SpatialIndex::from_points(&self.points);
        self.rebuild(true);
    }

    fn check_index(&self, index: usize) -> Result<(), TrackError> {
        if index < self.points.len() {
            Ok(())
        } else {
            Err(TrackError::IndexOutOfRange {
                index,
                len: self.points.len(),
            })
        }
    }

    // ── Positionen / Styles ─────────────────────────────────────────

    /// Setzt die Position eines Kontrollpunkts.
    pub fn set_point(&mut self, index: usize, position: DVec3) -> Result<(), TrackError> {
        self.check_index(index)?;
        self.points[index] = position;
        self.refresh_positions();
        Ok(())
    }

    /// Verschiebt die gegebenen Kontrollpunkte um `offset`.
    pub fn translate_points(&mut self, indices: &[usize], offset: DVec3) -> Result<(), TrackError> {
        for &i in indices {
            self.check_index(i)?;
        }
        let mut targets = indices.to_vec();
        targets.sort_unstable();
        targets.dedup();
        for i in targets {
            self.points[i] += offset;
        }
        self.refresh_positions();
        Ok(())
    }

    /// Verschiebt alle selektierten Kontrollpunkte.
    pub fn translate_selected(&mut self, offset: DVec3) -> Result<(), TrackError> {
        let selected = self.selected_points();
        if selected.is_empty() {
            return Err(TrackError::NoPointsSelected);
        }
        self.translate_points(&selected, offset)
    }

    /// Setzt den Style eines Kontrollpunkts; die Geometrie bleibt unberührt.
    pub fn set_style(&mut self, index: usize, style: u32) -> Result<(), TrackError> {
        self.check_index(index)?;
        self.styles[index] = style;
        Ok(())
    }

    // ── Selektion ───────────────────────────────────────────────────

    /// Schaltet die Punkte des Selektors um; ohne `multi` wird vorher geleert.
    pub fn select(&mut self, selector: &Selector, multi: bool) -> Result<(), TrackError> {
        let n = self.points.len();
        let indices = selector
            .resolve(n)
            .map_err(|index| TrackError::IndexOutOfRange { index, len: n })?;
        if !multi {
            self.selection.clear();
        }
        self.selection.toggle(&indices);
        Ok(())
    }

    // ── Strukturelle Änderungen ─────────────────────────────────────

    /// Fügt in jedes Zielsegment einen neuen, selektierten Punkt bei t = 0.5 ein.
    ///
    /// Der neue Punkt übernimmt den Style des Segment-Startpunkts.
    pub fn subdivide_segments(&mut self, segments: &[usize]) -> Result<(), TrackError> {
        if segments.is_empty() {
            return Err(TrackError::NothingToSubdivide);
        }
        let n = self.points.len();
        let mut targeted = vec![false; n];
        for &s in segments {
            self.check_index(s)?;
            targeted[s] = true;
        }

        let midpoints = self.evaluate(&SampleSteps::midpoint());
        let added = targeted.iter().filter(|&&t| t).count();
        let mut points = Vec::with_capacity(n + added);
        let mut styles = Vec::with_capacity(n + added);
        for i in 0..n {
            points.push(self.points[i]);
            styles.push(self.styles[i]);
            if targeted[i] {
                points.push(midpoints.positions(i)[0]);
                styles.push(self.styles[i]);
            }
        }

        self.points = points;
        self.styles = styles;
        self.selection.insert_after(&targeted, true);
        self.refresh_topology();
        log::debug!("{} Segment(e) unterteilt", added);
        Ok(())
    }

    /// Entfernt die gegebenen Kontrollpunkte.
    pub fn delete_points(&mut self, indices: &[usize]) -> Result<(), TrackError> {
        if indices.is_empty() {
            return Err(TrackError::NothingToDelete);
        }
        let n = self.points.len();
        let mut removed = vec![false; n];
        for &i in indices {
            self.check_index(i)?;
            removed[i] = true;
        }
        let remaining = removed.iter().filter(|&&r| !r).count();
        if remaining < MIN_POINTS {
            return Err(TrackError::TooFewPoints { remaining });
        }

        let mut index = 0;
        self.points.retain(|_| {
            let keep = !removed[index];
            index += 1;
            keep
        });
        let mut index = 0;
        self.styles.retain(|_| {
            let keep = !removed[index];
            index += 1;
            keep
        });
        self.selection.remove(&removed);
        self.refresh_topology();
        log::debug!("{} Kontrollpunkt(e) entfernt", n - remaining);
        Ok(())
    }

    /// Unterteilt alle selektierten Segmente.
    pub fn subdivide(&mut self) -> Result<(), TrackError> {
        let segments = self.selected_segments();
        if segments.is_empty() {
            return Err(TrackError::NoSegmentsSelected);
        }
        self.subdivide_segments(&segments)
    }

    /// Fügt hinter jedem selektierten Punkt einen neuen ein.
    pub fn add_after(&mut self) -> Result<(), TrackError> {
        let selected = self.selected_points();
        if selected.is_empty() {
            return Err(TrackError::NoPointsSelected);
        }
        self.subdivide_segments(&selected)
    }

    /// Fügt vor jedem selektierten Punkt einen neuen ein.
    pub fn add_before(&mut self) -> Result<(), TrackError> {
        let selected = self.selected_points();
        if selected.is_empty() {
            return Err(TrackError::NoPointsSelected);
        }
        let n = self.points.len();
        let segments: Vec<usize> = selected.iter().map(|&i| (i + n - 1) % n).collect();
        self.subdivide_segments(&segments)
    }

    /// Löscht alle selektierten Punkte.
    pub fn delete(&mut self) -> Result<(), TrackError> {
        let selected = self.selected_points();
        if selected.is_empty() {
            return Err(TrackError::NoPointsSelected);
        }
        self.delete_points(&selected)
    }

    /// Löscht die inneren Punkte selektierter Läufe, Randpunkte bleiben.
    pub fn dissolve(&mut self) -> Result<(), TrackError> {
        let inner = self.selected_inner();
        if inner.is_empty() {
            return Err(TrackError::NothingToDissolve);
        }
        self.delete_points(&inner)
    }

    // ── Snapshots / Persistenz ──────────────────────────────────────

    /// Tiefenkopie von Punkten, Styles und Selektion.
    pub fn create_snapshot(&self) -> TrackSnapshot {
        TrackSnapshot {
            points: self.points.clone(),
            styles: self.styles.clone(),
            selection: self.selection.clone(),
        }
    }

    /// Stellt einen Snapshot wieder her und leitet die Kurve komplett neu ab.
    pub fn restore_snapshot(&mut self, snapshot: TrackSnapshot) {
        self.points = snapshot.points;
        self.styles = snapshot.styles;
        self.selection = snapshot.selection;
        self.refresh_topology();
    }

    /// Punkte und Styles im Persistenz-Format.
    pub fn serialize(&self) -> anyhow::Result<String> {
        crate::json::write_track_json(&self.points, &self.styles)
    }

    /// Ersetzt die Daten aus dem Persistenz-Format (wie [`Track::set_data`]).
    pub fn deserialize(&mut self, text: &str) -> anyhow::Result<()> {
        let data = crate::json::parse_track_json(text)?;
        self.set_data(data.points, Some(data.styles));
        Ok(())
    }
}
