//! JSON Import/Export für Strecken.
//!
//! Das Format ist ein Array von Datensätzen, einer pro Kontrollpunkt in
//! Streckenreihenfolge: `[x, y, z, style]`, der Style als Gleitkommazahl.

pub mod parser;
pub mod writer;

use anyhow::{Context, Result};
use glam::DVec3;
use std::path::Path;

pub use parser::parse_track_json;
pub use writer::write_track_json;

/// Persistierte Streckendaten: Punkte und Styles gleicher Länge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackData {
    /// Kontrollpunkte in Streckenreihenfolge
    pub points: Vec<DVec3>,
    /// Style je Kontrollpunkt
    pub styles: Vec<u32>,
}

/// Liest eine Streckendatei.
pub fn load_track_file(path: &Path) -> Result<TrackData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Streckendatei nicht lesbar: {}", path.display()))?;
    parse_track_json(&content)
        .with_context(|| format!("Ungültige Streckendatei: {}", path.display()))
}

/// Schreibt Punkte und Styles als Streckendatei.
pub fn save_track_file(path: &Path, points: &[DVec3], styles: &[u32]) -> Result<()> {
    let content = write_track_json(points, styles)?;
    std::fs::write(path, content)
        .with_context(|| format!("Streckendatei nicht schreibbar: {}", path.display()))?;
    log::info!(
        "Strecke gespeichert nach {}: {} Kontrollpunkte",
        path.display(),
        points.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("track.json");
        let points = vec![
            DVec3::new(1.0, 2.0, 3.0),
            DVec3::new(-4.5, 0.25, 0.0),
            DVec3::new(7.0, -8.0, 1.5),
        ];
        let styles = vec![0, 3, 1];

        save_track_file(&path, &points, &styles).expect("speichern");
        let data = load_track_file(&path).expect("laden");
        assert_eq!(data.points, points);
        assert_eq!(data.styles, styles);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_track_file(&dir.path().join("fehlt.json")).unwrap_err();
        assert!(err.to_string().contains("nicht lesbar"));
    }
}
