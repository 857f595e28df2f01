//! In-process object store

use super::{ObjectAck, ObjectStore};
use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Object store kept in memory
///
/// Useful for local runs and tests. Every write is counted so callers can
/// tell an overwrite from a second object.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    writes: Mutex<u64>,
}

impl MemoryObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of the object at `path`, if any
    pub async fn get(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.lock().await.get(path).cloned()
    }

    /// Number of distinct objects held
    pub async fn object_count(&self) -> usize {
        self.objects.lock().await.len()
    }

    /// Number of writes accepted, overwrites included
    pub async fn write_count(&self) -> u64 {
        *self.writes.lock().await
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn store(&self, path: &str, data: &[u8]) -> Result<ObjectAck, StoreError> {
        self.objects
            .lock()
            .await
            .insert(path.to_string(), data.to_vec());

        let mut writes = self.writes.lock().await;
        *writes += 1;

        Ok(ObjectAck {
            path: path.to_string(),
            size: data.len() as u64,
            generation: Some(writes.to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
