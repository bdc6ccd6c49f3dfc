use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use config::CaseInsensitiveName;

use crate::users::Users;

/// Everything a pipeline's authorization boils down to: who may see it,
/// who may operate within its group, who administers it, and who may
/// trigger it (overall and per stage).
///
/// Derived from explicit group authorization, the sets nest:
/// admins ⊆ operators ⊆ viewers, and admins ⊆ pipeline operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    viewers: Users,
    operators: Users,
    admins: Users,
    pipeline_operators: Users,
    /// Operator sets recorded per stage when the group authorization was
    /// explicit; consulted by [`Permissions::stage_operators`].
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    stage_operators: HashMap<CaseInsensitiveName, Users>,
}

impl Permissions {
    pub fn new(
        viewers: Users,
        operators: Users,
        admins: Users,
        pipeline_operators: Users,
    ) -> Self {
        Self {
            viewers,
            operators,
            admins,
            pipeline_operators,
            stage_operators: HashMap::new(),
        }
    }

    pub fn with_stage_operators(
        mut self,
        stage_operators: HashMap<CaseInsensitiveName, Users>,
    ) -> Self {
        self.stage_operators = stage_operators;
        self
    }

    /// The fully-open permission set: every authenticated user may do
    /// everything. Used when no security is configured at all.
    pub fn everyone() -> Self {
        Self::new(
            Users::Everyone,
            Users::Everyone,
            Users::Everyone,
            Users::Everyone,
        )
    }

    pub fn viewers(&self) -> &Users {
        &self.viewers
    }

    pub fn operators(&self) -> &Users {
        &self.operators
    }

    pub fn admins(&self) -> &Users {
        &self.admins
    }

    /// Who may trigger the pipeline: the group operators unless the first
    /// stage's approval block restricts it (admins always remain).
    pub fn pipeline_operators(&self) -> &Users {
        &self.pipeline_operators
    }

    /// Who may operate (approve/rerun) the named stage. Unknown stage
    /// names fall back to the pipeline-level operator set.
    pub fn stage_operators(&self, stage: &CaseInsensitiveName) -> &Users {
        self.stage_operators
            .get(stage)
            .unwrap_or(&self.pipeline_operators)
    }
}
