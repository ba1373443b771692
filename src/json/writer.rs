//! Writer für Streckendateien.

use anyhow::{bail, Context, Result};
use glam::DVec3;
use serde::Serialize;

/// Schreibt Punkte und Styles als eingerücktes JSON-Array von `[x, y, z, style]`.
pub fn write_track_json(points: &[DVec3], styles: &[u32]) -> Result<String> {
    if points.len() != styles.len() {
        bail!("{} Punkte, aber {} Styles", points.len(), styles.len());
    }

    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        bail!("Kontrollpunkt {} hat keine endlichen Koordinaten", index);
    }

    let records: Vec<[f64; 4]> = points
        .iter()
        .zip(styles)
        .map(|(p, &style)| [p.x, p.y, p.z, f64::from(style)])
        .collect();

    let mut output = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut output, formatter);
    records
        .serialize(&mut serializer)
        .context("Strecke nicht serialisierbar")?;
    output.push(b'\n');

    String::from_utf8(output).context("Ausgabe ist kein UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_record_per_point() {
        let text = write_track_json(
            &[DVec3::new(1.0, 2.0, 3.0), DVec3::new(-1.5, 0.0, 0.5)],
            &[0, 7],
        )
        .expect("schreiben");
        let parsed: Vec<Vec<f64>> = serde_json::from_str(&text).expect("gültiges JSON");
        assert_eq!(parsed, vec![vec![1.0, 2.0, 3.0, 0.0], vec![-1.5, 0.0, 0.5, 7.0]]);
        assert!(text.contains("\n        1.0,"));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        assert!(write_track_json(&[DVec3::ZERO], &[]).is_err());
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let points = [DVec3::ZERO, DVec3::new(f64::NAN, 0.0, 0.0)];
        let err = write_track_json(&points, &[0, 0]).unwrap_err();
        assert!(err.to_string().contains("Kontrollpunkt 1"));
        assert!(write_track_json(&[DVec3::new(0.0, f64::INFINITY, 0.0)], &[0]).is_err());
    }
}
