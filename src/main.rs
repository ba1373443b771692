//! Hermite Track Editor, Kommandozeile.
//!
//! Lädt eine Strecke (oder erzeugt die Standard-Strecke), verfeinert die
//! Kurve vollständig und schreibt sie optional zurück.
//!
//! Aufruf: `hermite-track-editor [EINGABE.json] [AUSGABE.json]`

use anyhow::Result;
use hermite_track_editor::{EditorOptions, TrackEditor};
use std::path::PathBuf;

fn main() -> Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!(
        "Hermite Track Editor v{} startet...",
        env!("CARGO_PKG_VERSION")
    );

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let input = args.next();
    let output = args.next();

    let options = EditorOptions::load_from_file(&EditorOptions::config_path());
    let mut editor = TrackEditor::new(&options);

    if let Some(path) = input.as_deref() {
        editor.load_file(path)?;
    } else {
        log::info!(
            "Keine Eingabedatei, verwende Standard-Strecke mit {} Kontrollpunkten",
            editor.track().point_count()
        );
    }

    if let Some(report) = editor.refine_to_completion() {
        log::info!(
            "Verfeinerung: {} Schübe, Rest-Diskontinuität {:.3e}, konvergiert: {}",
            editor.refiner().bursts_done(),
            report.residual,
            report.converged
        );
    }

    let track = editor.track();
    println!("Kontrollpunkte: {}", track.point_count());
    println!("Gesamtlänge:    {:.3}", track.total_length());
    for (i, length) in track.segment_lengths().iter().enumerate() {
        println!("  Segment {:>4}: {:>12.3}", i, length);
    }

    if let Some(path) = output.as_deref() {
        editor.save_file(path)?;
    }

    Ok(())
}
