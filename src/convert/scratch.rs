//! Scoped temporary files for libraries and tools that only accept a path.
//!
//! A [`ScratchFile`] owns a `tempfile::NamedTempFile`; the file is removed
//! when the value is dropped, on success and error paths alike.

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

const PREFIX: &str = "convert-";

#[derive(Debug, Clone)]
pub struct Scratch {
    dir: PathBuf,
}

pub struct ScratchFile {
    file: NamedTempFile,
}

impl Scratch {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates an empty scratch file. `suffix` keeps the extension that
    /// downstream readers sniff the format from (e.g. `.docx`).
    pub fn create(&self, suffix: &str) -> std::io::Result<ScratchFile> {
        let file = tempfile::Builder::new()
            .prefix(PREFIX)
            .suffix(suffix)
            .tempfile_in(&self.dir)?;
        debug!("Created scratch file {}", file.path().display());
        Ok(ScratchFile { file })
    }

    pub fn write(&self, suffix: &str, contents: &[u8]) -> std::io::Result<ScratchFile> {
        let mut scratch = self.create(suffix)?;
        scratch.file.write_all(contents)?;
        scratch.file.flush()?;
        Ok(scratch)
    }
}

impl ScratchFile {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}
