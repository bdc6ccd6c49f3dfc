use std::collections::HashMap;

use tracing::debug;

use config::{AuthConfig, CaseInsensitiveName, ConfigSnapshot, PipelineGroup};

use crate::error::{AuthzError, Result};
use crate::permissions::Permissions;
use crate::resolver::RoleResolver;
use crate::users::{AllowedUsers, Users};

/// What a pipeline group that defines no authorization block grants to
/// non-admin users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupDefaultPermission {
    /// Everyone may view and operate pipelines in such groups; only
    /// super-admins administer them. The historical default: it keeps an
    /// instance usable while still letting admins lock things down
    /// globally.
    #[default]
    Allow,
    /// Such groups are closed: all permissions collapse to the root
    /// super-admin set.
    Deny,
}

/// Computes, for each pipeline in a snapshot, who may view, operate,
/// administer and trigger it.
///
/// The authority is constructed over one immutable snapshot and performs a
/// pure, synchronous walk over its groups; it holds no caches and no
/// state beyond the precomputed role membership table.
pub struct PipelinePermissionsAuthority<'a> {
    snapshot: &'a ConfigSnapshot,
    resolver: RoleResolver<'a>,
    group_default: GroupDefaultPermission,
}

/// The root super-admin block, resolved once per computation.
struct RootAdmins {
    members: AllowedUsers,
    /// Presence of user/role references, regardless of whether they
    /// expand to anyone. An undefined block means the instance never
    /// configured security and stays fully open.
    defined: bool,
}

impl<'a> PipelinePermissionsAuthority<'a> {
    pub fn new(snapshot: &'a ConfigSnapshot) -> Self {
        Self {
            snapshot,
            resolver: RoleResolver::new(&snapshot.security),
            group_default: GroupDefaultPermission::default(),
        }
    }

    pub fn with_group_default(mut self, group_default: GroupDefaultPermission) -> Self {
        self.group_default = group_default;
        self
    }

    /// Permissions for every pipeline in the snapshot, in one map. Groups
    /// and pipelines are visited in declaration order; each group's result
    /// is folded into the accumulator.
    pub fn pipelines_and_their_permissions(&self) -> HashMap<CaseInsensitiveName, Permissions> {
        let root = self.root_admins();
        let mut permissions = HashMap::new();
        for group in &self.snapshot.groups {
            permissions.extend(self.group_permissions(group, &root));
        }
        debug!(
            pipelines = permissions.len(),
            "computed pipeline permission map"
        );
        permissions
    }

    /// Permissions for one pipeline, computed from the single group that
    /// contains it.
    pub fn permissions_for_pipeline(&self, pipeline: &CaseInsensitiveName) -> Result<Permissions> {
        let group = self
            .snapshot
            .find_group_of(pipeline)
            .ok_or_else(|| AuthzError::PipelineNotFound(pipeline.to_string()))?;
        let root = self.root_admins();
        self.group_permissions(group, &root)
            .remove(pipeline)
            .ok_or_else(|| AuthzError::PipelineNotFound(pipeline.to_string()))
    }

    fn root_admins(&self) -> RootAdmins {
        let admins = &self.snapshot.security.admins;
        RootAdmins {
            members: self.members_of(admins),
            defined: !admins.is_empty(),
        }
    }

    fn members_of(&self, block: &AuthConfig) -> AllowedUsers {
        AllowedUsers::new(
            self.resolver.names_of(block),
            self.resolver.plugin_roles_of(block),
        )
    }

    /// Permissions for every pipeline of one group, keyed by pipeline name.
    fn group_permissions(
        &self,
        group: &PipelineGroup,
        root: &RootAdmins,
    ) -> HashMap<CaseInsensitiveName, Permissions> {
        // Group admins always include the super-admins, and are always
        // also operators and viewers.
        let admins = match group.authorization.admins() {
            Some(block) => root.members.union(&self.members_of(block)),
            None => root.members.clone(),
        };
        let viewers = match group.authorization.view() {
            Some(block) => admins.union(&self.members_of(block)),
            None => admins.clone(),
        };
        let operators = match group.authorization.operate() {
            Some(block) => admins.union(&self.members_of(block)),
            None => admins.clone(),
        };

        group
            .pipelines
            .iter()
            .map(|pipeline| {
                let permissions = if !root.defined {
                    // No security configured anywhere; the instance stays
                    // fully usable.
                    Permissions::everyone()
                } else if !group.authorization.is_defined() {
                    self.no_group_auth_permissions(&admins)
                } else {
                    let stage_operators: HashMap<CaseInsensitiveName, Users> = pipeline
                        .stages
                        .iter()
                        .map(|stage| {
                            let users = match stage.approval_auth() {
                                // Stage approval narrows who may trigger;
                                // admins always retain the ability.
                                Some(auth) => admins.union(&self.members_of(auth)),
                                None => operators.clone(),
                            };
                            (stage.name.clone(), Users::Allowed(users))
                        })
                        .collect();

                    let pipeline_operators = pipeline
                        .first_stage()
                        .and_then(|stage| stage_operators.get(&stage.name).cloned())
                        .unwrap_or_else(|| Users::Allowed(operators.clone()));

                    Permissions::new(
                        Users::Allowed(viewers.clone()),
                        Users::Allowed(operators.clone()),
                        Users::Allowed(admins.clone()),
                        pipeline_operators,
                    )
                    .with_stage_operators(stage_operators)
                };
                (pipeline.name.clone(), permissions)
            })
            .collect()
    }

    fn no_group_auth_permissions(&self, admins: &AllowedUsers) -> Permissions {
        let admins = Users::Allowed(admins.clone());
        match self.group_default {
            GroupDefaultPermission::Allow => Permissions::new(
                Users::Everyone,
                Users::Everyone,
                admins,
                Users::Everyone,
            ),
            GroupDefaultPermission::Deny => {
                Permissions::new(admins.clone(), admins.clone(), admins.clone(), admins)
            }
        }
    }
}
