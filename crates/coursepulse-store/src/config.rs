//! Store configuration and factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use coursepulse_core::traits::ResponseStore;

use crate::jsonl::JsonlStore;
use crate::memory::MemoryStore;

/// Configuration for the response store backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// In-memory store; responses do not survive the process.
    Memory,
    /// Append-only JSON-lines file store.
    Jsonl { path: PathBuf },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Memory
    }
}

impl StoreConfig {
    /// Load a store configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read store config: {}", path.display()))?;
        let config: StoreConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse store config: {}", path.display()))?;
        Ok(config)
    }
}

/// Build a response store from its configuration.
pub fn build_store(config: &StoreConfig) -> Arc<dyn ResponseStore> {
    match config {
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
        StoreConfig::Jsonl { path } => Arc::new(JsonlStore::new(path.clone())),
    }
}
