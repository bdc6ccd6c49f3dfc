use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use authz::{GroupDefaultPermission, Permissions, PipelinePermissionsAuthority};
use config::CaseInsensitiveName;

use crate::error::Result;
use crate::store::SnapshotStore;

pub type PermissionMap = HashMap<CaseInsensitiveName, Permissions>;

/// Lazily computed, explicitly invalidated cache of the full pipeline
/// permission map.
///
/// The permission computation is pure, so the cache stays valid until the
/// underlying snapshot changes; [`PermissionsCache::refresh`] ties the two
/// together.
pub struct PermissionsCache {
    store: Arc<SnapshotStore>,
    group_default: GroupDefaultPermission,
    cached: RwLock<Option<Arc<PermissionMap>>>,
}

impl PermissionsCache {
    pub fn new(store: Arc<SnapshotStore>) -> Self {
        Self {
            store,
            group_default: GroupDefaultPermission::default(),
            cached: RwLock::new(None),
        }
    }

    pub fn with_group_default(mut self, group_default: GroupDefaultPermission) -> Self {
        self.group_default = group_default;
        self
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// The permission map for the current snapshot, computing it on a
    /// cache miss.
    pub fn get(&self) -> Arc<PermissionMap> {
        if let Some(cached) = self.cached.read().unwrap().clone() {
            return cached;
        }

        let snapshot = self.store.snapshot();
        let map = Arc::new(
            PipelinePermissionsAuthority::new(&snapshot)
                .with_group_default(self.group_default)
                .pipelines_and_their_permissions(),
        );
        debug!(pipelines = map.len(), "recomputed permission map");
        *self.cached.write().unwrap() = Some(map.clone());
        map
    }

    pub fn permissions_for(&self, pipeline: &CaseInsensitiveName) -> Option<Permissions> {
        self.get().get(pipeline).cloned()
    }

    /// Drop the cached map; the next [`PermissionsCache::get`] recomputes.
    pub fn invalidate(&self) {
        *self.cached.write().unwrap() = None;
    }

    /// Reload the underlying store and invalidate the cache if the
    /// configuration actually changed. Returns whether it did.
    pub fn refresh(&self) -> Result<bool> {
        let changed = self.store.reload()?;
        if changed {
            self.invalidate();
        }
        Ok(changed)
    }
}
