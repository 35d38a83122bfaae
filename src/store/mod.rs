//! Label store contract.
//!
//! The real store is owned by the application. The crate only needs two
//! operations from it:
//!
//! 1. **append** one label to one message, atomically, durable on return.
//!    Re-appending an identical label must be harmless.
//! 2. **read** a message's current label set, reflecting every append that
//!    has returned successfully.
//!
//! No multi-label transaction is assumed. `MemoryLabelStore` is a reference
//! implementation with set semantics per message.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Label store unavailable: {0}")]
    Unavailable(String),
    #[error("Label store backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Contract (app implements)
// ---------------------------------------------------------------------------

pub trait LabelStore {
    /// Append a single label. Must be atomic and durable once it returns `Ok`.
    fn append_label(&self, message_id: &str, label: &str) -> Result<()>;

    /// Current label set for a message. Unknown messages have no labels.
    fn get_labels(&self, message_id: &str) -> Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// MemoryLabelStore
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryLabelStore {
    labels: Mutex<HashMap<String, Vec<String>>>,
}

impl MemoryLabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages with at least one label.
    pub fn message_count(&self) -> Result<usize> {
        let labels = self.lock()?;
        Ok(labels.len())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<String>>>> {
        self.labels
            .lock()
            .map_err(|_| StoreError::Backend("label map lock poisoned".to_string()))
    }
}

impl LabelStore for MemoryLabelStore {
    fn append_label(&self, message_id: &str, label: &str) -> Result<()> {
        let mut labels = self.lock()?;
        let set = labels.entry(message_id.to_string()).or_default();
        if !set.iter().any(|existing| existing == label) {
            set.push(label.to_string());
        }
        Ok(())
    }

    fn get_labels(&self, message_id: &str) -> Result<Vec<String>> {
        let labels = self.lock()?;
        Ok(labels.get(message_id).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
