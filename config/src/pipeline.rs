use serde::{Deserialize, Serialize};

use crate::name::CaseInsensitiveName;
use crate::security::AuthConfig;

/// A named collection of pipelines sharing one authorization scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineGroup {
    pub name: CaseInsensitiveName,
    #[serde(default)]
    pub authorization: Authorization,
    #[serde(default)]
    pub pipelines: Vec<Pipeline>,
}

impl PipelineGroup {
    pub fn new(name: impl Into<CaseInsensitiveName>) -> Self {
        Self {
            name: name.into(),
            authorization: Authorization::default(),
            pipelines: Vec::new(),
        }
    }

    pub fn find_pipeline(&self, name: &CaseInsensitiveName) -> Option<&Pipeline> {
        self.pipelines.iter().find(|p| &p.name == name)
    }
}

/// A pipeline group's authorization block.
///
/// Each capability block is optional: absence of all three means the group
/// has opted out of authorization entirely, which is semantically distinct
/// from a block that is present but lists nobody (see
/// [`Authorization::is_defined`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Authorization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<AuthConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operate: Option<AuthConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admins: Option<AuthConfig>,
}

impl Authorization {
    /// Whether the group defines any authorization at all. This checks
    /// presence of the blocks, not whether they list anyone: an
    /// explicitly-present-but-empty block still counts as defined.
    pub fn is_defined(&self) -> bool {
        self.view.is_some() || self.operate.is_some() || self.admins.is_some()
    }

    pub fn view(&self) -> Option<&AuthConfig> {
        self.view.as_ref()
    }

    pub fn operate(&self) -> Option<&AuthConfig> {
        self.operate.as_ref()
    }

    pub fn admins(&self) -> Option<&AuthConfig> {
        self.admins.as_ref()
    }
}

/// An ordered sequence of stages; the first stage is the trigger stage and
/// its approval block governs who may trigger the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: CaseInsensitiveName,
    #[serde(default)]
    pub stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(name: impl Into<CaseInsensitiveName>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    pub fn first_stage(&self) -> Option<&Stage> {
        self.stages.first()
    }

    pub fn find_stage(&self, name: &CaseInsensitiveName) -> Option<&Stage> {
        self.stages.iter().find(|s| &s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: CaseInsensitiveName,
    #[serde(default)]
    pub approval: Approval,
}

impl Stage {
    pub fn new(name: impl Into<CaseInsensitiveName>) -> Self {
        Self {
            name: name.into(),
            approval: Approval::default(),
        }
    }

    /// The stage's own approval authorization, when it defines a non-empty
    /// one. A stage without this falls back to the group operate
    /// permission.
    pub fn approval_auth(&self) -> Option<&AuthConfig> {
        self.approval
            .authorization
            .as_ref()
            .filter(|auth| !auth.is_empty())
    }
}

/// How a stage starts: automatically on success of the previous stage, or
/// manually. Either way an approval block may restrict who can trigger it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalKind {
    #[default]
    Success,
    Manual,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Approval {
    #[serde(default)]
    pub kind: ApprovalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<AuthConfig>,
}
