//! In-memory response store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use uuid::Uuid;

use coursepulse_core::error::StorageError;
use coursepulse_core::response::Response;
use coursepulse_core::traits::ResponseStore;

/// An in-memory response store for tests and single-process deployments.
///
/// The interior mutex serializes appends, giving the engine the
/// single-writer-per-survey ordering it relies on for the acceptance gate.
#[derive(Default)]
pub struct MemoryStore {
    responses: Mutex<HashMap<Uuid, Vec<Response>>>,
    /// Number of appends performed.
    append_count: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of appends made to this store.
    pub fn append_count(&self) -> u64 {
        self.append_count.load(Ordering::Relaxed)
    }

    /// Total responses across all surveys.
    pub fn len(&self) -> usize {
        self.responses
            .lock()
            .map(|map| map.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResponseStore for MemoryStore {
    fn append(&self, response: Response) -> Result<Response, StorageError> {
        let mut map = self
            .responses
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        map.entry(response.survey_id)
            .or_default()
            .push(response.clone());
        self.append_count.fetch_add(1, Ordering::Relaxed);
        Ok(response)
    }

    fn list_by_survey(&self, survey_id: Uuid) -> Result<Vec<Response>, StorageError> {
        let map = self
            .responses
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(map.get(&survey_id).cloned().unwrap_or_default())
    }

    fn purge_survey(&self, survey_id: Uuid) -> Result<u64, StorageError> {
        let mut map = self
            .responses
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(map.remove(&survey_id).map_or(0, |v| v.len() as u64))
    }
}
