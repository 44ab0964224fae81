//! Best-effort JSON file persistence shared by the interaction log and the
//! seen-followers store.
//!
//! Files are read fully into memory, mutated, and rewritten wholesale. Callers
//! serialize access themselves; there is no transactional guarantee.

use std::io::ErrorKind;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and decodes `path`. A missing file yields `None`; anything else that
/// goes wrong is an error.
pub async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} does not exist yet", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(StoreError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.display().to_string(),
            source,
        })
}

/// Encodes `value` as pretty JSON and overwrites `path`.
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let body = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        path: path.display().to_string(),
        source,
    })?;

    tokio::fs::write(path, body)
        .await
        .map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })
}
