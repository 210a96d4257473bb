use midly::Smf;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("MIDI parse error: {0}")]
    Midi(#[from] midly::Error),
}

/// Read a file into memory so the parsed `Smf` can borrow from it.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, DecodeError> {
    Ok(std::fs::read(path)?)
}

/// Parse a Standard MIDI File. No format checks happen before this call;
/// anything midly rejects surfaces as `DecodeError::Midi`. midly is built
/// with `strict`, so truncated chunks and missing tracks are rejected
/// instead of yielding a partial file.
pub fn parse_smf(bytes: &[u8]) -> Result<Smf<'_>, DecodeError> {
    Ok(Smf::parse(bytes)?)
}
