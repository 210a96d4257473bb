//! Synthesized MIDI files for tests.

use midly::num::{u4, u7, u15, u28};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};
use std::path::Path;

pub fn note_on(key: u8) -> TrackEvent<'static> {
    note_on_with_velocity(key, 100)
}

pub fn note_on_with_velocity(key: u8, vel: u8) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOn {
                key: u7::new(key),
                vel: u7::new(vel),
            },
        },
    }
}

pub fn note_off(key: u8) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(96),
        kind: TrackEventKind::Midi {
            channel: u4::new(0),
            message: MidiMessage::NoteOff {
                key: u7::new(key),
                vel: u7::new(0),
            },
        },
    }
}

pub fn key_signature(sharps: i8, minor: bool) -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::KeySignature(sharps, minor)),
    }
}

pub fn end_of_track() -> TrackEvent<'static> {
    TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}

pub fn smf_from_tracks(tracks: Vec<Vec<TrackEvent<'static>>>) -> Smf<'static> {
    let format = if tracks.len() == 1 {
        Format::SingleTrack
    } else {
        Format::Parallel
    };
    Smf {
        header: Header::new(format, Timing::Metrical(u15::new(96))),
        tracks,
    }
}

pub fn smf_bytes(tracks: Vec<Vec<TrackEvent<'static>>>) -> Vec<u8> {
    let smf = smf_from_tracks(tracks);
    let mut bytes = Vec::new();
    smf.write_std(&mut bytes).expect("midi should serialize");
    bytes
}

pub fn write_smf(path: &Path, tracks: Vec<Vec<TrackEvent<'static>>>) {
    std::fs::write(path, smf_bytes(tracks)).expect("midi fixture should write");
}

fn notes_track(keys: &[u8]) -> Vec<TrackEvent<'static>> {
    let mut track = Vec::new();
    for &key in keys {
        track.push(note_on(key));
        track.push(note_off(key));
    }
    track.push(end_of_track());
    track
}

/// One track of back-to-back notes, no key signature.
pub fn write_notes(path: &Path, keys: &[u8]) {
    write_smf(path, vec![notes_track(keys)]);
}

/// Length of the `MThd` chunk: id, length and the 6-byte body.
pub const HEADER_LEN: usize = 14;

/// Same file as `write_notes`, keeping only the first `keep` bytes.
pub fn write_truncated_notes(path: &Path, keys: &[u8], keep: usize) {
    let bytes = smf_bytes(vec![notes_track(keys)]);
    std::fs::write(path, &bytes[..keep.min(bytes.len())]).expect("midi fixture should write");
}

/// Byte length of the file `write_notes` produces for `keys`.
pub fn notes_len(keys: &[u8]) -> usize {
    smf_bytes(vec![notes_track(keys)]).len()
}
