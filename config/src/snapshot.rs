use serde::{Deserialize, Serialize};

use crate::name::CaseInsensitiveName;
use crate::pipeline::{Pipeline, PipelineGroup};
use crate::security::SecurityConfig;

/// One consistent, immutable view of the whole server configuration.
///
/// Group and pipeline order is declaration order and is preserved; the
/// authorization engines walk it deterministically. Reloading the
/// configuration produces a new snapshot rather than mutating this one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub groups: Vec<PipelineGroup>,
}

impl ConfigSnapshot {
    /// The group containing the named pipeline, if any. A pipeline belongs
    /// to exactly one group; the first match wins.
    pub fn find_group_of(&self, pipeline: &CaseInsensitiveName) -> Option<&PipelineGroup> {
        self.groups
            .iter()
            .find(|group| group.find_pipeline(pipeline).is_some())
    }

    pub fn find_group(&self, name: &CaseInsensitiveName) -> Option<&PipelineGroup> {
        self.groups.iter().find(|group| &group.name == name)
    }

    /// All pipelines across all groups, in declaration order.
    pub fn pipelines(&self) -> impl Iterator<Item = &Pipeline> {
        self.groups.iter().flat_map(|group| group.pipelines.iter())
    }
}
