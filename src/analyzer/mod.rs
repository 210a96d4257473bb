pub mod decode;

#[cfg(test)]
pub(crate) mod fixtures;

use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error(transparent)]
    Decode(#[from] decode::DecodeError),
    #[error("Invalid key signature: {sharps} sharps/flats (minor: {minor})")]
    InvalidKeySignature { sharps: i8, minor: bool },
}

/// Chromatic pitch-class names, starting at C.
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch-class name for every MIDI note number (0..=127).
pub static NOTE_NAMES: [&str; 128] = build_note_names();

const fn build_note_names() -> [&'static str; 128] {
    let mut table = [""; 128];
    let mut n = 0;
    while n < 128 {
        table[n] = PITCH_CLASSES[n % 12];
        n += 1;
    }
    table
}

// Indexed by sharps/flats + 7
const MAJOR_KEYS: [&str; 15] = [
    "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
];
const MINOR_KEYS: [&str; 15] = [
    "Abm", "Ebm", "Bbm", "Fm", "Cm", "Gm", "Dm", "Am", "Em", "Bm", "F#m", "C#m", "G#m", "D#m",
    "A#m",
];

/// What a successfully decoded file contributes to the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiAnalysis {
    /// Sorted distinct key names joined with `_`, or `NONE`.
    pub keys: String,
    /// Sorted distinct pitch-class names over all note-on events.
    pub noteset: Vec<String>,
    /// Number of note-on events across all tracks.
    pub notecount: i64,
}

/// Pitch-class name for a MIDI note number. Note numbers above 127 wrap.
pub fn pitch_class(note: u8) -> &'static str {
    NOTE_NAMES[note as usize % NOTE_NAMES.len()]
}

/// Conventional name for a key-signature meta event, e.g. `(-2, false)` → `Bb`.
pub fn key_signature_name(sharps: i8, minor: bool) -> Option<&'static str> {
    if !(-7..=7).contains(&sharps) {
        return None;
    }
    let idx = (sharps + 7) as usize;
    Some(if minor { MINOR_KEYS[idx] } else { MAJOR_KEYS[idx] })
}

/// Open and analyze one file.
pub fn analyze_file(path: &Path) -> Result<MidiAnalysis, AnalyzeError> {
    log::debug!("Analyzing: {}", path.display());
    let bytes = decode::read_bytes(path)?;
    let smf = decode::parse_smf(&bytes)?;
    analyze_smf(&smf)
}

/// Collect key signatures, pitch classes and the note-on count from a decoded file.
pub fn analyze_smf(smf: &Smf<'_>) -> Result<MidiAnalysis, AnalyzeError> {
    let mut keys: BTreeSet<&'static str> = BTreeSet::new();
    let mut notes: BTreeSet<&'static str> = BTreeSet::new();
    let mut notecount: i64 = 0;

    for track in &smf.tracks {
        for event in track {
            match event.kind {
                TrackEventKind::Meta(MetaMessage::KeySignature(sharps, minor)) => {
                    let name = key_signature_name(sharps, minor)
                        .ok_or(AnalyzeError::InvalidKeySignature { sharps, minor })?;
                    keys.insert(name);
                }
                // Velocity-0 note-ons are still note-on events
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, .. },
                    ..
                } => {
                    notes.insert(pitch_class(key.as_int()));
                    notecount += 1;
                }
                _ => {}
            }
        }
    }

    Ok(MidiAnalysis {
        keys: key_label(&keys),
        noteset: notes.into_iter().map(String::from).collect(),
        notecount,
    })
}

fn key_label(keys: &BTreeSet<&str>) -> String {
    if keys.is_empty() {
        crate::NO_KEY_LABEL.to_string()
    } else {
        keys.iter().copied().collect::<Vec<_>>().join("_")
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{
        HEADER_LEN, end_of_track, key_signature, note_off, note_on, notes_len, smf_from_tracks,
        write_smf, write_truncated_notes,
    };
    use super::*;

    #[test]
    fn note_table_is_periodic() {
        for n in 0..116u8 {
            assert_eq!(pitch_class(n), pitch_class(n + 12), "note {n}");
        }
        assert_eq!(pitch_class(0), "C");
        assert_eq!(pitch_class(60), "C");
        assert_eq!(pitch_class(61), "C#");
        assert_eq!(pitch_class(127), "G");
    }

    #[test]
    fn note_table_uses_only_chromatic_names() {
        for name in NOTE_NAMES.iter() {
            assert!(PITCH_CLASSES.contains(name));
        }
    }

    #[test]
    fn key_signature_names() {
        assert_eq!(key_signature_name(0, false), Some("C"));
        assert_eq!(key_signature_name(0, true), Some("Am"));
        assert_eq!(key_signature_name(-2, false), Some("Bb"));
        assert_eq!(key_signature_name(3, true), Some("F#m"));
        assert_eq!(key_signature_name(7, false), Some("C#"));
        assert_eq!(key_signature_name(-7, true), Some("Abm"));
        assert_eq!(key_signature_name(8, false), None);
        assert_eq!(key_signature_name(-8, true), None);
    }

    #[test]
    fn two_notes_without_key_signature() {
        let smf = smf_from_tracks(vec![vec![
            note_on(60),
            note_off(60),
            note_on(64),
            note_off(64),
            end_of_track(),
        ]]);
        let analysis = analyze_smf(&smf).unwrap();
        assert_eq!(analysis.keys, "NONE");
        assert_eq!(analysis.noteset, vec!["C", "E"]);
        assert_eq!(analysis.notecount, 2);
    }

    #[test]
    fn counts_note_ons_across_tracks() {
        let smf = smf_from_tracks(vec![
            vec![note_on(60), note_on(72), note_on(48), end_of_track()],
            vec![note_on(69), note_on(70), end_of_track()],
        ]);
        let analysis = analyze_smf(&smf).unwrap();
        assert_eq!(analysis.notecount, 5);
        // Octaves collapse; names sort as strings
        assert_eq!(analysis.noteset, vec!["A", "A#", "C"]);
    }

    #[test]
    fn zero_velocity_note_on_is_counted() {
        let smf = smf_from_tracks(vec![vec![
            note_on(62),
            super::fixtures::note_on_with_velocity(62, 0),
            end_of_track(),
        ]]);
        let analysis = analyze_smf(&smf).unwrap();
        assert_eq!(analysis.notecount, 2);
        assert_eq!(analysis.noteset, vec!["D"]);
    }

    #[test]
    fn key_signatures_are_deduplicated_and_sorted() {
        let smf = smf_from_tracks(vec![
            vec![key_signature(1, false), note_on(67), end_of_track()],
            vec![
                key_signature(0, true),
                key_signature(1, false),
                key_signature(-1, false),
                end_of_track(),
            ],
        ]);
        let analysis = analyze_smf(&smf).unwrap();
        assert_eq!(analysis.keys, "Am_F_G");
    }

    #[test]
    fn out_of_range_key_signature_is_an_error() {
        let smf = smf_from_tracks(vec![vec![key_signature(9, false), end_of_track()]]);
        let err = analyze_smf(&smf).unwrap_err();
        assert!(matches!(err, AnalyzeError::InvalidKeySignature { sharps: 9, minor: false }));
    }

    #[test]
    fn analyze_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmaj.mid");
        write_smf(
            &path,
            vec![vec![key_signature(0, false), note_on(60), note_on(64), note_on(67), end_of_track()]],
        );
        let analysis = analyze_file(&path).unwrap();
        assert_eq!(analysis.keys, "C");
        assert_eq!(analysis.noteset, vec!["C", "E", "G"]);
        assert_eq!(analysis.notecount, 3);
    }

    #[test]
    fn corrupt_file_reports_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mid");
        std::fs::write(&path, b"this is not a midi file").unwrap();
        let err = analyze_file(&path).unwrap_err();
        assert!(matches!(err, AnalyzeError::Decode(decode::DecodeError::Midi(_))));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn truncated_track_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cut.mid");
        let keys = [60, 64, 67];
        write_truncated_notes(&path, &keys, notes_len(&keys) - 6);
        let err = analyze_file(&path).unwrap_err();
        assert!(matches!(err, AnalyzeError::Decode(decode::DecodeError::Midi(_))));
    }

    #[test]
    fn header_without_declared_track_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("header_only.mid");
        write_truncated_notes(&path, &[60, 64, 67], HEADER_LEN);
        let err = analyze_file(&path).unwrap_err();
        assert!(matches!(err, AnalyzeError::Decode(decode::DecodeError::Midi(_))));
    }

    #[test]
    fn missing_file_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = analyze_file(&dir.path().join("nope.mid")).unwrap_err();
        assert!(matches!(err, AnalyzeError::Decode(decode::DecodeError::Io(_))));
    }
}
