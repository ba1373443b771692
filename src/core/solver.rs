//! Kurven-Solver: einmalige Konstruktion und iterative Optimierung.
//!
//! Die Konstruktion liefert sofort eine gültige Kurve aus Sehnenlängen und
//! zentralen Differenzen. Die Optimierung nähert danach schrittweise
//! konstante Geschwindigkeit (Längen aus dichter Abtastung) und stetige
//! Krümmung (Tangenten drehen gegen den Krümmungssprung) an.

use super::hermite::{self, SampleSteps, Samples};
use glam::DVec3;

/// Unterhalb dieser Summe der Krümmungssprünge gilt die Kurve als konvergiert.
pub const CONVERGENCE_TOLERANCE: f64 = 1e-10;

/// Mindestanzahl Abtastpunkte pro Segment; darunter ist keine Sehne messbar.
pub const MIN_SAMPLES_PER_SEGMENT: usize = 2;

/// Vollständig abgeleitete Kurvendaten für eine Punktmenge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveFrame {
    /// Einheitstangenten je Kontrollpunkt
    pub tangents: Vec<DVec3>,
    /// Segmentlängen (Sehne oder Bogenlängen-Schätzung)
    pub lengths: Vec<f64>,
    /// Skalierte Starttangenten je Segment
    pub m0: Vec<DVec3>,
    /// Kubischer Koeffizient je Segment
    pub a: Vec<DVec3>,
    /// Quadratischer Koeffizient je Segment
    pub b: Vec<DVec3>,
}

impl CurveFrame {
    fn build(points: &[DVec3], tangents: Vec<DVec3>, lengths: Vec<f64>) -> Self {
        let (m0, a, b) = hermite::segment_coefficients(points, &tangents, &lengths);
        Self {
            tangents,
            lengths,
            m0,
            a,
            b,
        }
    }

    fn rebuild(&mut self, points: &[DVec3]) {
        let (m0, a, b) = hermite::segment_coefficients(points, &self.tangents, &self.lengths);
        self.m0 = m0;
        self.a = a;
        self.b = b;
    }

    /// Wertet alle Segmente an den gegebenen Parametern aus.
    pub fn evaluate(&self, points: &[DVec3], steps: &SampleSteps) -> Samples {
        hermite::evaluate(points, &self.m0, &self.a, &self.b, &self.lengths, steps)
    }

    /// Ersetzt die Längen durch die Bogenlängen-Schätzung und baut neu auf.
    fn resample_lengths(&mut self, points: &[DVec3], samples_per_segment: usize) {
        let steps = SampleSteps::Uniform(samples_per_segment.max(MIN_SAMPLES_PER_SEGMENT));
        let samples = self.evaluate(points, &steps);
        self.lengths = hermite::estimate_lengths(&samples);
        self.rebuild(points);
    }

    /// Summe der Segmentlängen.
    pub fn total_length(&self) -> f64 {
        self.lengths.iter().sum()
    }
}

/// Budget einer Optimierung.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeParams {
    /// Maximale Anzahl Relaxations-Iterationen
    pub max_iterations: usize,
    /// Abtastpunkte pro Segment für die Längenschätzung
    pub samples_per_segment: usize,
}

impl Default for OptimizeParams {
    fn default() -> Self {
        Self {
            max_iterations: 1,
            samples_per_segment: 32,
        }
    }
}

/// Ergebnis einer Optimierung.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OptimizeReport {
    /// Tatsächlich ausgeführte Iterationen
    pub iterations: usize,
    /// `true` wenn die Toleranz erreicht wurde
    pub converged: bool,
    /// Summe der absoluten Krümmungssprünge der letzten Messung
    pub residual: f64,
}

/// Konstruiert die Kurve; fehlende Tangenten/Längen werden geschätzt.
///
/// Übergebene Werte werden wiederverwendet, wenn sich nur Positionen, nicht
/// aber die Topologie geändert haben.
pub fn construct(
    points: &[DVec3],
    tangents: Option<Vec<DVec3>>,
    lengths: Option<Vec<f64>>,
) -> CurveFrame {
    let tangents = tangents.unwrap_or_else(|| hermite::base_tangents(points));
    let lengths = lengths.unwrap_or_else(|| hermite::base_lengths(points));
    CurveFrame::build(points, tangents, lengths)
}

/// Iterative Relaxation ausgehend von gegebenen Tangenten und Längen.
///
/// Nicht-Konvergenz ist kein Fehler: zurückgegeben wird die beste Näherung
/// innerhalb des Budgets. Der abschließende Längen-Durchlauf sorgt dafür,
/// dass Längen und Koeffizienten exakt zusammenpassen.
pub fn optimize(
    points: &[DVec3],
    tangents: Vec<DVec3>,
    lengths: Vec<f64>,
    params: OptimizeParams,
) -> (CurveFrame, OptimizeReport) {
    let mut frame = CurveFrame::build(points, tangents, lengths);
    let mut report = OptimizeReport::default();

    for _ in 0..params.max_iterations {
        report.iterations += 1;
        frame.resample_lengths(points, params.samples_per_segment);

        let boundary = frame.evaluate(points, &SampleSteps::endpoints());
        let errors = hermite::discontinuity(&boundary);
        report.residual = errors.iter().map(|e| e.abs()).sum();
        if report.residual < CONVERGENCE_TOLERANCE {
            report.converged = true;
            break;
        }

        frame.tangents = hermite::rotate_tangents(&frame.tangents, &errors);
        frame.rebuild(points);
    }

    frame.resample_lengths(points, params.samples_per_segment);

    log::debug!(
        "Optimierung: {} Iteration(en), Rest {:.3e}, konvergiert: {}",
        report.iterations,
        report.residual,
        report.converged
    );

    (frame, report)
}
