//! Geometrie-Kern für geschlossene kubische Hermite-Kurven.
//!
//! Reine Funktionen ohne Zustand. Alle Arrays sind zyklisch: Segment `i`
//! verläuft von Punkt `i` nach Punkt `(i + 1) % n`, das letzte Segment
//! schließt die Kurve.
//!
//! Die Basis arbeitet auf t ∈ [0, 1] mit `M = Tangente · Segmentlänge`.
//! Ableitungen werden deshalb mit `1 / Länge` zurückskaliert, damit sie
//! sich auf die (geschätzte) Bogenlänge beziehen.

use glam::DVec3;

/// Parameterwerte, an denen jedes Segment ausgewertet wird.
#[derive(Debug, Clone, PartialEq)]
pub enum SampleSteps {
    /// `count` gleichverteilte Werte in [0, 1], beide Enden eingeschlossen
    Uniform(usize),
    /// Explizite Parameterwerte (z.B. nur die Segmentenden)
    Explicit(Vec<f64>),
}

impl SampleSteps {
    /// Nur Segmentanfang und -ende, für Stoßstellen-Prüfungen.
    pub fn endpoints() -> Self {
        Self::Explicit(vec![0.0, 1.0])
    }

    /// Nur die Segmentmitte (Unterteilung).
    pub fn midpoint() -> Self {
        Self::Explicit(vec![0.5])
    }

    /// Liefert die konkreten Parameterwerte.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            Self::Uniform(0) => Vec::new(),
            Self::Uniform(1) => vec![0.0],
            Self::Uniform(count) => {
                let last = (*count - 1) as f64;
                (0..*count).map(|i| i as f64 / last).collect()
            }
            Self::Explicit(values) => values.clone(),
        }
    }
}

/// Abgetastete Kurve: pro Segment `steps` aufeinanderfolgende Werte.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Samples {
    segment_count: usize,
    steps: usize,
    /// Positionen, segmentweise hintereinander
    pub position: Vec<DVec3>,
    /// Erste Ableitung nach der Bogenlänge
    pub velocity: Vec<DVec3>,
    /// Zweite Ableitung nach der Bogenlänge
    pub acceleration: Vec<DVec3>,
}

impl Samples {
    /// Anzahl der ausgewerteten Segmente.
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Anzahl der Werte pro Segment.
    pub fn steps(&self) -> usize {
        self.steps
    }

    fn range(&self, segment: usize) -> std::ops::Range<usize> {
        segment * self.steps..(segment + 1) * self.steps
    }

    /// Positionen eines Segments.
    pub fn positions(&self, segment: usize) -> &[DVec3] {
        &self.position[self.range(segment)]
    }

    /// Geschwindigkeiten eines Segments.
    pub fn velocities(&self, segment: usize) -> &[DVec3] {
        &self.velocity[self.range(segment)]
    }

    /// Beschleunigungen eines Segments.
    pub fn accelerations(&self, segment: usize) -> &[DVec3] {
        &self.acceleration[self.range(segment)]
    }
}

/// Tangenten aus zentralen Differenzen: `normalize(P[i+1] - P[i-1])`.
///
/// Fallen beide Nachbarn zusammen, entsteht NaN und wird weitergereicht.
pub fn base_tangents(points: &[DVec3]) -> Vec<DVec3> {
    let n = points.len();
    (0..n)
        .map(|i| (points[(i + 1) % n] - points[(i + n - 1) % n]).normalize())
        .collect()
}

/// Sehnenlängen `|P[i+1] - P[i]|` als erste Schätzung der Segmentlängen.
pub fn base_lengths(points: &[DVec3]) -> Vec<f64> {
    let n = points.len();
    (0..n)
        .map(|i| points[i].distance(points[(i + 1) % n]))
        .collect()
}

/// Skalierte Tangenten am Anfang (`M0`) und Ende (`M1`) jedes Segments.
pub fn scaled_tangents(tangents: &[DVec3], lengths: &[f64]) -> (Vec<DVec3>, Vec<DVec3>) {
    let n = tangents.len();
    let m0 = (0..n).map(|i| tangents[i] * lengths[i]).collect();
    let m1 = (0..n)
        .map(|i| tangents[(i + 1) % n] * lengths[i])
        .collect();
    (m0, m1)
}

/// Kubische Koeffizienten `(A, B)` eines Hermite-Segments.
pub fn coefficients(p0: DVec3, p1: DVec3, m0: DVec3, m1: DVec3) -> (DVec3, DVec3) {
    let a = 2.0 * p0 + m0 - 2.0 * p1 + m1;
    let b = -3.0 * p0 - 2.0 * m0 + 3.0 * p1 - m1;
    (a, b)
}

/// Baut `(M0, A, B)` für alle Segmente aus Punkten, Tangenten und Längen.
pub fn segment_coefficients(
    points: &[DVec3],
    tangents: &[DVec3],
    lengths: &[f64],
) -> (Vec<DVec3>, Vec<DVec3>, Vec<DVec3>) {
    let n = points.len();
    let (m0, m1) = scaled_tangents(tangents, lengths);
    let (a, b): (Vec<DVec3>, Vec<DVec3>) = (0..n)
        .map(|i| coefficients(points[i], points[(i + 1) % n], m0[i], m1[i]))
        .unzip();
    (m0, a, b)
}

/// Wertet alle Segmente an den gegebenen Parametern aus.
///
/// `r(t) = A·t³ + B·t² + M0·t + P0`, Ableitungen durch die Segmentlänge geteilt.
pub fn evaluate(
    points: &[DVec3],
    m0: &[DVec3],
    a: &[DVec3],
    b: &[DVec3],
    lengths: &[f64],
    steps: &SampleSteps,
) -> Samples {
    let params = steps.parameters();
    let n = points.len();
    let total = n * params.len();

    let mut samples = Samples {
        segment_count: n,
        steps: params.len(),
        position: Vec::with_capacity(total),
        velocity: Vec::with_capacity(total),
        acceleration: Vec::with_capacity(total),
    };

    for i in 0..n {
        let inv_len = 1.0 / lengths[i];
        for &t in &params {
            let t2 = t * t;
            let t3 = t2 * t;
            samples
                .position
                .push(a[i] * t3 + b[i] * t2 + m0[i] * t + points[i]);
            samples
                .velocity
                .push((3.0 * a[i] * t2 + 2.0 * b[i] * t + m0[i]) * inv_len);
            samples
                .acceleration
                .push((6.0 * a[i] * t + 2.0 * b[i]) * inv_len * inv_len);
        }
    }

    samples
}

/// Vorzeichenbehaftete Krümmung in der xy-Ebene: `(vx·ay − vy·ax) / |v|³`.
pub fn curvature(velocity: DVec3, acceleration: DVec3) -> f64 {
    let num = velocity.x * acceleration.y - velocity.y * acceleration.x;
    num / velocity.length().powi(3)
}

/// Krümmung für jeden Abtastwert.
pub fn curvatures(samples: &Samples) -> Vec<f64> {
    samples
        .velocity
        .iter()
        .zip(&samples.acceleration)
        .map(|(v, a)| curvature(*v, *a))
        .collect()
}

/// Segmentlängen als Summe der Sehnen zwischen aufeinanderfolgenden Abtastpunkten.
pub fn estimate_lengths(samples: &Samples) -> Vec<f64> {
    (0..samples.segment_count())
        .map(|i| {
            samples
                .positions(i)
                .windows(2)
                .map(|w| w[0].distance(w[1]))
                .sum()
        })
        .collect()
}

/// Kumulierte Distanz entlang der Kurve für jeden Abtastwert.
///
/// Der erste Wert eines Segments entspricht der Gesamtlänge aller vorherigen
/// Segmente, die Reihe ist damit über die ganze Kurve monoton steigend.
pub fn estimate_distances(samples: &Samples) -> Vec<f64> {
    let mut distances = Vec::with_capacity(samples.position.len());
    let mut offset = 0.0;
    for i in 0..samples.segment_count() {
        let positions = samples.positions(i);
        let mut running = offset;
        for (j, p) in positions.iter().enumerate() {
            if j > 0 {
                running += positions[j - 1].distance(*p);
            }
            distances.push(running);
        }
        offset = running;
    }
    distances
}

/// Krümmungssprung je Kontrollpunkt: Ende des vorherigen Segments minus
/// Anfang des nächsten. Das ist die Größe, die der Optimierer gegen Null treibt.
pub fn discontinuity(samples: &Samples) -> Vec<f64> {
    let n = samples.segment_count();
    let steps = samples.steps();
    if steps == 0 {
        return vec![0.0; n];
    }
    let c = curvatures(samples);
    (0..n)
        .map(|i| {
            let prev = (i + n - 1) % n;
            c[prev * steps + steps - 1] - c[i * steps]
        })
        .collect()
}

/// Dreht eine Tangente in der xy-Ebene um `angle` (Bogenmaß) und normiert neu.
///
/// Die z-Komponente bleibt unverändert. Für echte 3D-Kurven ist das nur eine
/// Näherung; eine Rotationsachse für den 3D-Fall ist bisher nicht festgelegt.
pub fn rotate_tangent(tangent: DVec3, angle: f64) -> DVec3 {
    let (sin, cos) = angle.sin_cos();
    DVec3::new(
        tangent.x * cos + tangent.y * sin,
        -tangent.x * sin + tangent.y * cos,
        tangent.z,
    )
    .normalize()
}

/// Dreht jede Tangente um ihren eigenen Winkel.
pub fn rotate_tangents(tangents: &[DVec3], angles: &[f64]) -> Vec<DVec3> {
    tangents
        .iter()
        .zip(angles)
        .map(|(t, angle)| rotate_tangent(*t, *angle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn simple_2d() -> Vec<DVec3> {
        vec![
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(-1.0, 0.0, 0.0),
            DVec3::new(0.0, -1.0, 0.0),
        ]
    }

    fn simple_3d() -> Vec<DVec3> {
        vec![
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(-1.0, 0.0, -1.0),
            DVec3::new(0.0, -1.0, 0.0),
        ]
    }

    /// Unregelmäßiger Kreis: dichte Punkte oben, grobe unten.
    fn uneven_circle() -> Vec<DVec3> {
        (0..180)
            .step_by(15)
            .chain((180..360).step_by(45))
            .map(|d| {
                let r = (d as f64).to_radians();
                DVec3::new(r.sin(), r.cos(), 0.0)
            })
            .collect()
    }

    fn fixtures() -> Vec<Vec<DVec3>> {
        vec![simple_2d(), simple_3d(), uneven_circle()]
    }

    #[test]
    fn test_uniform_parameters_include_both_ends() {
        assert_eq!(SampleSteps::Uniform(3).parameters(), vec![0.0, 0.5, 1.0]);
        assert_eq!(SampleSteps::Uniform(1).parameters(), vec![0.0]);
        assert!(SampleSteps::Uniform(0).parameters().is_empty());
        assert_eq!(SampleSteps::endpoints().parameters(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_shapes_match_point_count() {
        for points in fixtures() {
            let n = points.len();
            let tangents = base_tangents(&points);
            let lengths = base_lengths(&points);
            assert_eq!(tangents.len(), n);
            assert_eq!(lengths.len(), n);

            let (m0, a, b) = segment_coefficients(&points, &tangents, &lengths);
            assert_eq!(m0.len(), n);
            assert_eq!(a.len(), n);
            assert_eq!(b.len(), n);

            let samples = evaluate(&points, &m0, &a, &b, &lengths, &SampleSteps::Uniform(9));
            assert_eq!(samples.segment_count(), n);
            assert_eq!(samples.steps(), 9);
            assert_eq!(samples.position.len(), n * 9);
            assert_eq!(samples.velocity.len(), n * 9);
            assert_eq!(samples.acceleration.len(), n * 9);

            assert_eq!(curvatures(&samples).len(), n * 9);
            assert_eq!(estimate_distances(&samples).len(), n * 9);
            assert_eq!(estimate_lengths(&samples).len(), n);
            assert_eq!(discontinuity(&samples).len(), n);
        }
    }

    #[test]
    fn test_tangents_are_unit_length() {
        for points in fixtures() {
            for t in base_tangents(&points) {
                assert_abs_diff_eq!(t.length(), 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_segments_interpolate_control_points_and_close() {
        for points in fixtures() {
            let n = points.len();
            let tangents = base_tangents(&points);
            let lengths = base_lengths(&points);
            let (m0, a, b) = segment_coefficients(&points, &tangents, &lengths);
            let samples = evaluate(&points, &m0, &a, &b, &lengths, &SampleSteps::endpoints());

            for i in 0..n {
                let start = samples.positions(i)[0];
                let end = samples.positions(i)[1];
                assert_abs_diff_eq!(start.distance(points[i]), 0.0, epsilon = 1e-12);
                assert_abs_diff_eq!(end.distance(points[(i + 1) % n]), 0.0, epsilon = 1e-12);
                // Startgeschwindigkeit entspricht der Einheitstangente
                assert_abs_diff_eq!(
                    samples.velocities(i)[0].distance(tangents[i]),
                    0.0,
                    epsilon = 1e-12
                );
            }

            let last_end = samples.positions(n - 1)[1];
            let first_start = samples.positions(0)[0];
            assert_abs_diff_eq!(last_end.distance(first_start), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_curvature_of_counter_clockwise_unit_circle() {
        // Geschwindigkeit tangential, Beschleunigung zum Zentrum
        let v = DVec3::new(0.0, 1.0, 0.0);
        let a = DVec3::new(-1.0, 0.0, 0.0);
        assert_abs_diff_eq!(curvature(v, a), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curvature(-v, -a), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curvature(v, -a), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_distances_are_monotonic_and_end_at_total_length() {
        let points = uneven_circle();
        let tangents = base_tangents(&points);
        let lengths = base_lengths(&points);
        let (m0, a, b) = segment_coefficients(&points, &tangents, &lengths);
        let samples = evaluate(&points, &m0, &a, &b, &lengths, &SampleSteps::Uniform(16));

        let distances = estimate_distances(&samples);
        assert!(distances.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(distances[0], 0.0);

        let total: f64 = estimate_lengths(&samples).iter().sum();
        let last = distances.last().copied().unwrap_or_default();
        assert_abs_diff_eq!(last, total, epsilon = 1e-9);
    }

    #[test]
    fn test_regular_polygon_has_no_discontinuity() {
        let points: Vec<DVec3> = (0..8)
            .map(|i| {
                let r = (i as f64 * 45.0).to_radians();
                DVec3::new(r.cos(), r.sin(), 0.0)
            })
            .collect();
        let tangents = base_tangents(&points);
        let lengths = base_lengths(&points);
        let (m0, a, b) = segment_coefficients(&points, &tangents, &lengths);
        let samples = evaluate(&points, &m0, &a, &b, &lengths, &SampleSteps::endpoints());

        for e in discontinuity(&samples) {
            assert_abs_diff_eq!(e, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rotate_tangent_quarter_turn() {
        let rotated = rotate_tangent(DVec3::X, std::f64::consts::FRAC_PI_2);
        assert_abs_diff_eq!(rotated.distance(DVec3::new(0.0, -1.0, 0.0)), 0.0, epsilon = 1e-12);

        let unchanged = rotate_tangent(DVec3::new(0.6, 0.8, 0.0), 0.0);
        assert_abs_diff_eq!(unchanged.distance(DVec3::new(0.6, 0.8, 0.0)), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_tangent_keeps_unit_length_in_3d() {
        let t = DVec3::new(1.0, 1.0, 1.0).normalize();
        let rotated = rotate_tangent(t, 0.3);
        assert_abs_diff_eq!(rotated.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_coincident_neighbours_propagate_nan() {
        let points = vec![DVec3::ZERO, DVec3::X, DVec3::ZERO];
        let tangents = base_tangents(&points);
        assert!(tangents[1].x.is_nan());
    }
}
