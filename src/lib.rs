pub mod analyzer;
pub mod config;
pub mod db;
pub mod report;
pub mod scanner;

/// File name suffix that marks a MIDI file (matched case-sensitively)
pub const MIDI_EXTENSION: &str = ".mid";

/// Grouping label for files without any key signature event
pub const NO_KEY_LABEL: &str = "NONE";

/// Application name for XDG paths
pub const APP_NAME: &str = "midindex";
