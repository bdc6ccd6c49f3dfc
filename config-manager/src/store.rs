use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use config::ConfigSnapshot;

use crate::error::Result;

/// Where and when the current snapshot came from. Serializable so status
/// surfaces can report it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotMetadata {
    pub loaded_at: DateTime<Utc>,
    /// SHA-256 of the raw file content, used to skip no-op reloads.
    pub content_hash: String,
}

struct StoreState {
    snapshot: Arc<ConfigSnapshot>,
    metadata: SnapshotMetadata,
}

/// Holds the current configuration snapshot for one configuration file.
///
/// Readers get an `Arc` to an immutable snapshot; a reload swaps the whole
/// snapshot atomically, so a computation that grabbed the snapshot before a
/// reload keeps seeing a consistent view.
pub struct SnapshotStore {
    path: PathBuf,
    state: RwLock<StoreState>,
}

impl SnapshotStore {
    /// Load the configuration file and initialize the store with it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)?;
        let snapshot = config::load_from_str(&content)?;
        info!(
            "opened configuration store at {:?}: {} groups",
            path,
            snapshot.groups.len()
        );
        Ok(Self {
            path,
            state: RwLock::new(StoreState {
                snapshot: Arc::new(snapshot),
                metadata: SnapshotMetadata {
                    loaded_at: Utc::now(),
                    content_hash: hash_content(&content),
                },
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current snapshot. Cheap; clones an `Arc`.
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.state.read().unwrap().snapshot.clone()
    }

    pub fn metadata(&self) -> SnapshotMetadata {
        self.state.read().unwrap().metadata.clone()
    }

    /// Re-read the configuration file. Returns `Ok(true)` when a new
    /// snapshot was installed, `Ok(false)` when the content was unchanged.
    /// On a parse error the previous snapshot stays live.
    pub fn reload(&self) -> Result<bool> {
        let content = std::fs::read_to_string(&self.path)?;
        let content_hash = hash_content(&content);
        {
            let state = self.state.read().unwrap();
            if state.metadata.content_hash == content_hash {
                debug!("configuration content unchanged, keeping current snapshot");
                return Ok(false);
            }
        }

        let snapshot = config::load_from_str(&content)?;
        let mut state = self.state.write().unwrap();
        state.snapshot = Arc::new(snapshot);
        state.metadata = SnapshotMetadata {
            loaded_at: Utc::now(),
            content_hash,
        };
        info!("installed new configuration snapshot from {:?}", self.path);
        Ok(true)
    }
}

fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
