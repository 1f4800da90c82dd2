//! Disk snapshot of an acquisition pass.
//!
//! When the file exists, acquisition is skipped entirely and its contents are
//! used instead. There is no expiry: delete the file to force a fresh run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::PipelineError;
use crate::pool::ResultSet;
use crate::record::ItemRecord;

pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the saved result set, or `None` when no checkpoint exists.
    pub fn load(&self) -> Result<Option<ResultSet>, PipelineError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let records: ResultSet = serde_json::from_str(&text)?;
        tracing::info!(
            "Loaded {} games from checkpoint {}",
            records.len(),
            self.path.display()
        );
        Ok(Some(records))
    }

    /// Writes the result set in one step: the document goes to a temporary
    /// sibling file which is then renamed over the checkpoint.
    pub fn save(&self, records: &[ItemRecord]) -> Result<(), PipelineError> {
        let bytes = to_tab_indented_json(&records)?;
        write_atomic(&self.path, &bytes).map_err(|e| self.io_error(e))?;
        tracing::info!(
            "Saved {} games to checkpoint {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> PipelineError {
        PipelineError::Checkpoint {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Pretty JSON indented with tabs.
pub fn to_tab_indented_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
    value.serialize(&mut ser)?;
    Ok(out)
}

/// Writes `bytes` to a temporary sibling of `path` and renames it into place,
/// creating parent directories as needed.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}
