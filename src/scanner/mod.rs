use crate::analyzer;
use crate::db::models::MidiRecord;
use crate::db::Database;
use crate::MIDI_EXTENSION;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Database error: {0}")]
    Db(#[from] crate::db::DbError),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub scanned: u64,
    pub analyzed: u64,
    pub errors: u64,
}

/// True for file names ending in `.mid`. Case-sensitive: `.MID` and
/// `.midi` are not indexed.
pub fn is_midi_file_name(name: &str) -> bool {
    name.ends_with(MIDI_EXTENSION)
}

/// Collect every MIDI file under `root`, in file-name order per directory.
///
/// Paths that are not valid UTF-8 are skipped: the index is keyed by the
/// path string, and a lossy conversion could map two files to one row.
pub fn find_midi_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root).follow_links(true).sort_by_file_name();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if !is_midi_file_name(&entry.file_name().to_string_lossy()) {
            continue;
        }
        if entry.path().to_str().is_none() {
            log::warn!("Skipping non-UTF-8 path: {}", entry.path().display());
            continue;
        }
        files.push(entry.into_path());
    }
    files
}

/// Walk `root`, analyze every MIDI file and upsert one row per path.
///
/// A file that fails to decode becomes an error row; only store failures
/// abort the scan. All writes are committed once, after the last file.
pub fn scan(db: &Database, root: &Path) -> Result<ScanResult, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_path_buf()));
    }

    let midi_files = find_midi_files(root);
    log::info!("Found {} MIDI files under {}", midi_files.len(), root.display());

    let pb = ProgressBar::new(midi_files.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}) ({eta}) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );

    let mut result = ScanResult::default();

    let tx = db.conn.unchecked_transaction().map_err(crate::db::DbError::from)?;

    for path in &midi_files {
        result.scanned += 1;
        pb.set_message(
            path.file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_default(),
        );

        let record = process_file(path);
        if record.is_error() {
            log::warn!(
                "Error scanning {}: {}",
                path.display(),
                record.errors.as_deref().unwrap_or_default()
            );
            result.errors += 1;
        } else {
            result.analyzed += 1;
        }
        db.upsert_record(&record)?;

        pb.inc(1);
    }

    tx.commit().map_err(crate::db::DbError::from)?;

    pb.finish_with_message(format!(
        "Done: {} analyzed, {} errors",
        result.analyzed, result.errors
    ));

    Ok(result)
}

fn process_file(path: &Path) -> MidiRecord {
    let name = path.to_string_lossy().to_string();
    MidiRecord::from_result(name, analyzer::analyze_file(path))
}
