use crate::analyzer::{AnalyzeError, MidiAnalysis};

/// Data for inserting or replacing one file's row (scan phase).
///
/// Either the analysis triple (`keys`, `noteset`, `notecount`) is set or
/// `errors` is, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiRecord {
    pub name: String,
    pub keys: Option<String>,
    pub noteset: Option<Vec<String>>,
    pub notecount: Option<i64>,
    pub errors: Option<String>,
}

impl MidiRecord {
    pub fn analyzed(name: impl Into<String>, analysis: MidiAnalysis) -> Self {
        Self {
            name: name.into(),
            keys: Some(analysis.keys),
            noteset: Some(analysis.noteset),
            notecount: Some(analysis.notecount),
            errors: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: &AnalyzeError) -> Self {
        Self {
            name: name.into(),
            keys: None,
            noteset: None,
            notecount: None,
            errors: Some(error.to_string()),
        }
    }

    pub fn from_result(name: impl Into<String>, result: Result<MidiAnalysis, AnalyzeError>) -> Self {
        match result {
            Ok(analysis) => Self::analyzed(name, analysis),
            Err(e) => Self::failed(name, &e),
        }
    }

    pub fn is_error(&self) -> bool {
        self.errors.is_some()
    }
}

/// A row read back for the report. `noteset` is the stored JSON text,
/// rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub name: String,
    pub errors: Option<String>,
    pub keys: Option<String>,
    pub noteset: Option<String>,
    pub notecount: Option<i64>,
}

/// Summary counts over the whole index.
#[derive(Debug, Default)]
pub struct IndexStats {
    pub total_files: i64,
    pub analyzed_files: i64,
    pub error_files: i64,
    /// (grouping label, row count), ordered by label.
    pub groupings: Vec<(String, i64)>,
}
