//! Object storage for relayed archives
//!
//! The relay only ever writes: one object per successful download, addressed
//! by the submission's `{assignment}/{user}/{submission}` key. Writing the same
//! key again replaces the previous object.

mod gcs;
mod memory;

pub use gcs::GcsObjectStore;
pub use memory::MemoryObjectStore;

use crate::error::StoreError;
use async_trait::async_trait;

/// Acknowledgement returned by the store once an object is committed
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectAck {
    /// Key the object was written under
    pub path: String,
    /// Number of bytes committed
    pub size: u64,
    /// Store-assigned version of the object, when the store reports one
    pub generation: Option<String>,
}

/// Path-addressed blob store
///
/// Implementations open whatever session they need inside [`store`](Self::store)
/// and report failures by phase: [`StoreError::Connect`],
/// [`StoreError::Write`] or [`StoreError::Close`].
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create or overwrite the object at `path` with `data`
    async fn store(&self, path: &str, data: &[u8]) -> Result<ObjectAck, StoreError>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
