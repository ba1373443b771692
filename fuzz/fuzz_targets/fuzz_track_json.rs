#![no_main]

use hermite_track_editor::{parse_track_json, Track};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if parse_track_json(text).is_err() {
        return;
    }
    // Gültige Eingaben müssen sich laden und wieder schreiben lassen
    let mut track = Track::default();
    if track.deserialize(text).is_ok() {
        let _ = track.serialize();
    }
});
