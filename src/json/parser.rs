//! Parser für Streckendateien.

use super::TrackData;
use anyhow::{bail, Context, Result};
use glam::DVec3;

/// Parsed eine Strecke aus einem JSON-String.
///
/// Jeder Datensatz braucht mindestens vier Zahlen; weitere Werte werden
/// ignoriert. Der Style muss eine nicht-negative Ganzzahl im `u32`-Bereich sein.
pub fn parse_track_json(json_content: &str) -> Result<TrackData> {
    let records: Vec<Vec<f64>> =
        serde_json::from_str(json_content).context("Erwartet: Array von Zahlen-Arrays")?;

    let mut data = TrackData {
        points: Vec::with_capacity(records.len()),
        styles: Vec::with_capacity(records.len()),
    };

    for (index, record) in records.iter().enumerate() {
        if record.len() < 4 {
            bail!(
                "Datensatz {}: erwartet [x, y, z, style], gefunden {} Werte",
                index,
                record.len()
            );
        }
        let style = parse_style(record[3]).with_context(|| format!("Datensatz {}", index))?;
        data.points.push(DVec3::new(record[0], record[1], record[2]));
        data.styles.push(style);
    }

    log::debug!("{} Datensätze gelesen", data.points.len());
    Ok(data)
}

fn parse_style(value: f64) -> Result<u32> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(u32::MAX) {
        bail!("ungültiger Style-Wert {}", value);
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_records_in_order() {
        let data = parse_track_json("[[1, 2, 3, 0], [4.5, -1, 0, 2.0], [0, 0, 7, 1]]")
            .expect("gültige Datei");
        assert_eq!(data.points.len(), 3);
        assert_eq!(data.points[1], DVec3::new(4.5, -1.0, 0.0));
        assert_eq!(data.styles, vec![0, 2, 1]);
    }

    #[test]
    fn empty_array_is_valid() {
        let data = parse_track_json("[]").expect("leeres Array");
        assert!(data.points.is_empty());
        assert!(data.styles.is_empty());
    }

    #[test]
    fn extra_values_are_ignored() {
        let data = parse_track_json("[[1, 2, 3, 4, 99]]").expect("gültige Datei");
        assert_eq!(data.styles, vec![4]);
    }

    #[test]
    fn short_record_is_rejected() {
        let err = parse_track_json("[[1, 2, 3, 0], [1, 2, 3]]").unwrap_err();
        assert!(err.to_string().contains("Datensatz 1"));
    }

    #[test]
    fn invalid_styles_are_rejected() {
        assert!(parse_track_json("[[0, 0, 0, -1]]").is_err());
        assert!(parse_track_json("[[0, 0, 0, 1.5]]").is_err());
        assert!(parse_track_json("[[0, 0, 0, 1e20]]").is_err());
    }

    #[test]
    fn non_array_input_is_rejected() {
        assert!(parse_track_json("{\"points\": []}").is_err());
        assert!(parse_track_json("[[0, 0, \"a\", 0]]").is_err());
        assert!(parse_track_json("").is_err());
    }
}
