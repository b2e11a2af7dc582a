use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to supply the log line stream
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("log file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read log file")]
    Io(#[from] io::Error),
}

/// Open a log file as an ordered stream of lines.
///
/// A missing file is reported as [`SourceError::NotFound`] so the caller can
/// surface it distinctly. Lines are yielded lazily; the sifter never needs
/// the whole file in memory.
pub fn open_lines(path: &Path) -> Result<impl Iterator<Item = io::Result<String>>, SourceError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound(path.to_path_buf()),
        _ => SourceError::Io(e),
    })?;
    Ok(BufReader::new(file).lines())
}
