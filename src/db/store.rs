// SPDX-License-Identifier: MIT

//! JSON blob store keyed by user id.
//!
//! Each user gets a directory holding one document per collection: the
//! engine-state snapshot plus the durable record lists. Documents are whole
//! JSON files, rewritten on every save; there is no migration scheme, so
//! readers substitute defaults for anything missing.
//!
//! An in-memory mode backs the integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::engine::EngineState;
use crate::error::AppError;

#[derive(Clone)]
enum Backend {
    File { root: PathBuf },
    /// Key "user_id/collection" -> serialized document
    Memory(Arc<DashMap<String, String>>),
}

/// Blob store handle. Cheap to clone.
#[derive(Clone)]
pub struct BlobStore {
    backend: Backend,
}

impl BlobStore {
    /// Open a file-backed store rooted at `root`, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| AppError::Storage(format!("Failed to create data dir: {}", e)))?;
        tracing::info!(path = %root.display(), "Blob store opened");
        Ok(Self {
            backend: Backend::File { root },
        })
    }

    /// Create an in-memory store for testing.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(DashMap::new())),
        }
    }

    /// Load the engine-state snapshot for a user, if one was ever saved.
    pub async fn load_state(&self, user_id: &str) -> Result<Option<EngineState>, AppError> {
        self.read_doc(user_id, super::collections::STATE).await
    }

    /// Write the full engine-state snapshot for a user.
    pub async fn save_state(&self, user_id: &str, state: &EngineState) -> Result<(), AppError> {
        self.write_doc(user_id, super::collections::STATE, state)
            .await
    }

    /// Append a record to a user's collection.
    pub async fn append_record<T>(
        &self,
        user_id: &str,
        collection: &str,
        record: &T,
    ) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        let mut records: Vec<T> = self
            .read_doc(user_id, collection)
            .await?
            .unwrap_or_default();
        records.push(record.clone());
        self.write_doc(user_id, collection, &records).await
    }

    /// List all records in a user's collection, in insertion order.
    pub async fn list_records<T>(&self, user_id: &str, collection: &str) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned,
    {
        Ok(self.read_doc(user_id, collection).await?.unwrap_or_default())
    }

    // ─── Document Primitives ─────────────────────────────────────

    async fn read_doc<T: DeserializeOwned>(
        &self,
        user_id: &str,
        collection: &str,
    ) -> Result<Option<T>, AppError> {
        validate_key(user_id)?;
        let raw = match &self.backend {
            Backend::File { root } => {
                let path = root.join(user_id).join(format!("{}.json", collection));
                match tokio::fs::read_to_string(&path).await {
                    Ok(contents) => Some(contents),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                    Err(e) => {
                        return Err(AppError::Storage(format!(
                            "Failed to read {}: {}",
                            path.display(),
                            e
                        )))
                    }
                }
            }
            Backend::Memory(docs) => docs
                .get(&format!("{}/{}", user_id, collection))
                .map(|entry| entry.value().clone()),
        };

        raw.map(|contents| {
            serde_json::from_str(&contents)
                .map_err(|e| AppError::Storage(format!("Corrupt document {}: {}", collection, e)))
        })
        .transpose()
    }

    async fn write_doc<T: Serialize>(
        &self,
        user_id: &str,
        collection: &str,
        doc: &T,
    ) -> Result<(), AppError> {
        validate_key(user_id)?;
        let contents = serde_json::to_string(doc)
            .map_err(|e| AppError::Storage(format!("Failed to serialize {}: {}", collection, e)))?;

        match &self.backend {
            Backend::File { root } => {
                let dir = root.join(user_id);
                tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                    AppError::Storage(format!("Failed to create {}: {}", dir.display(), e))
                })?;
                let path = dir.join(format!("{}.json", collection));
                tokio::fs::write(&path, contents).await.map_err(|e| {
                    AppError::Storage(format!("Failed to write {}: {}", path.display(), e))
                })?;
            }
            Backend::Memory(docs) => {
                docs.insert(format!("{}/{}", user_id, collection), contents);
            }
        }
        Ok(())
    }
}

/// Reject ids that could escape the user's storage directory. The auth layer
/// already constrains identities; this is the storage-level invariant.
fn validate_key(user_id: &str) -> Result<(), AppError> {
    let ok = !user_id.is_empty()
        && user_id.len() <= 64
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(AppError::Storage(format!("Invalid storage key: {:?}", user_id)))
    }
}
