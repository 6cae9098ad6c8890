use crate::error::StoreError;
use crate::models::{Employee, StoredRecord};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Whole-collection persistence for employees.
///
/// `read` never fails: a missing, unreadable or non-array file is an empty
/// collection. Elements that are not valid employees come back as
/// [`StoredRecord::Unreadable`] so a later `write` keeps them.
/// `write` replaces the stored collection and reports failure to the caller.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn read(&self) -> Vec<StoredRecord>;

    async fn write(&self, records: &[StoredRecord]) -> Result<(), StoreError>;
}

/// Keeps the collection as a pretty-printed JSON array in one file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EmployeeStore for JsonFileStore {
    async fn read(&self) -> Vec<StoredRecord> {
        let data = match fs::read_to_string(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Storage file not found, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Error reading employees file: {}", e);
                return Vec::new();
            }
        };

        let elements: Vec<Value> = match serde_json::from_str(&data) {
            Ok(elements) => elements,
            Err(e) => {
                warn!(path = %self.path.display(), "Error parsing employees file: {}", e);
                return Vec::new();
            }
        };

        elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| match Employee::deserialize(&element) {
                Ok(employee) => StoredRecord::Employee(employee),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        index,
                        "Keeping unreadable employee record: {}",
                        e
                    );
                    StoredRecord::Unreadable(element)
                }
            })
            .collect()
    }

    async fn write(&self, records: &[StoredRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), count = records.len(), "Wrote employees");
        Ok(())
    }
}

/// Keeps the collection in process memory. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn new(records: Vec<StoredRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn read(&self) -> Vec<StoredRecord> {
        self.records.read().await.clone()
    }

    async fn write(&self, records: &[StoredRecord]) -> Result<(), StoreError> {
        *self.records.write().await = records.to_vec();
        Ok(())
    }
}
