//! Append-only JSON-lines response store.
//!
//! One response per line. Appends hold the file lock for the duration of the
//! write, serializing concurrent submitters. Reading is best effort: a line
//! that fails to decode is skipped with a warning rather than poisoning the
//! whole file.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use uuid::Uuid;

use coursepulse_core::error::StorageError;
use coursepulse_core::response::Response;
use coursepulse_core::traits::ResponseStore;

/// A file-backed response store with one JSON document per line.
pub struct JsonlStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlStore {
    /// Open (or create) a store at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<Response>, StorageError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Io(e.to_string())),
        };

        let mut responses = Vec::new();
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| StorageError::Io(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Response>(&line) {
                Ok(response) => responses.push(response),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = number + 1,
                        error = %e,
                        "skipping undecodable response line"
                    );
                }
            }
        }
        Ok(responses)
    }
}

impl ResponseStore for JsonlStore {
    fn append(&self, response: Response) -> Result<Response, StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let line =
            serde_json::to_string(&response).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StorageError::Io(e.to_string()))?;
        writeln!(file, "{line}").map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(response)
    }

    fn list_by_survey(&self, survey_id: Uuid) -> Result<Vec<Response>, StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(self
            .read_all()?
            .into_iter()
            .filter(|r| r.survey_id == survey_id)
            .collect())
    }

    fn purge_survey(&self, survey_id: Uuid) -> Result<u64, StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let all = self.read_all()?;
        let (purged, kept): (Vec<_>, Vec<_>) =
            all.into_iter().partition(|r| r.survey_id == survey_id);

        let mut lines = String::new();
        for response in &kept {
            let line = serde_json::to_string(response)
                .map_err(|e| StorageError::Corrupt(e.to_string()))?;
            lines.push_str(&line);
            lines.push('\n');
        }
        std::fs::write(&self.path, lines).map_err(|e| StorageError::Io(e.to_string()))?;

        Ok(purged.len() as u64)
    }
}
