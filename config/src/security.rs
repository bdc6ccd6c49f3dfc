use serde::{Deserialize, Serialize};

use policy::Policy;

use crate::name::CaseInsensitiveName;

/// Root security configuration: the super-admin block plus the role
/// registry (both server-native and plugin-backed roles).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub admins: AdminsConfig,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl SecurityConfig {
    /// Whether any super-admin users or role references are configured at
    /// the root level. Checks presence of references, not whether the
    /// referenced roles expand to any members.
    pub fn admins_defined(&self) -> bool {
        !self.admins.is_empty()
    }

    /// Look up a role by name, case-insensitively.
    pub fn find_role(&self, name: &CaseInsensitiveName) -> Option<&Role> {
        self.roles.iter().find(|role| role.name() == name)
    }

    /// The plugin-role identity for `name`, if the name resolves to a
    /// plugin-backed role.
    pub fn plugin_role_identity(&self, name: &CaseInsensitiveName) -> Option<PluginRoleIdentity> {
        match self.find_role(name) {
            Some(Role::Plugin {
                name,
                auth_config_id,
                ..
            }) => Some(PluginRoleIdentity {
                name: name.clone(),
                auth_config_id: auth_config_id.clone(),
            }),
            _ => None,
        }
    }
}

/// A users + role-references pair granting one capability. The same shape
/// serves the root super-admin block, the per-group view/operate/admins
/// blocks and stage approval blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub roles: Vec<CaseInsensitiveName>,
}

impl AuthConfig {
    pub fn with_users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
            roles: Vec::new(),
        }
    }

    /// True iff both the user and the role lists are empty. Emptiness has
    /// meaning of its own: an empty root admin block makes the whole
    /// system open.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.roles.is_empty()
    }
}

/// The root super-admin block is the same users + role-references shape.
pub type AdminsConfig = AuthConfig;

/// A named group of principals.
///
/// Native roles enumerate their member user names directly. Plugin roles
/// cannot be expanded locally; membership is resolved by an external
/// authorization plugin at request time, so the engines treat them as
/// opaque identities carried through permission sets.
///
/// Either kind may carry a directive [`Policy`] governing what its members
/// may do with cluster-scoped resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Role {
    Plugin {
        name: CaseInsensitiveName,
        auth_config_id: String,
        #[serde(default, skip_serializing_if = "Policy::is_empty")]
        policy: Policy,
    },
    Core {
        name: CaseInsensitiveName,
        #[serde(default)]
        users: Vec<String>,
        #[serde(default, skip_serializing_if = "Policy::is_empty")]
        policy: Policy,
    },
}

impl Role {
    pub fn core(name: impl Into<CaseInsensitiveName>, users: Vec<String>) -> Self {
        Role::Core {
            name: name.into(),
            users,
            policy: Policy::default(),
        }
    }

    pub fn plugin(
        name: impl Into<CaseInsensitiveName>,
        auth_config_id: impl Into<String>,
    ) -> Self {
        Role::Plugin {
            name: name.into(),
            auth_config_id: auth_config_id.into(),
            policy: Policy::default(),
        }
    }

    pub fn with_policy(mut self, new_policy: Policy) -> Self {
        match &mut self {
            Role::Plugin { policy, .. } | Role::Core { policy, .. } => *policy = new_policy,
        }
        self
    }

    pub fn name(&self) -> &CaseInsensitiveName {
        match self {
            Role::Plugin { name, .. } | Role::Core { name, .. } => name,
        }
    }

    pub fn policy(&self) -> &Policy {
        match self {
            Role::Plugin { policy, .. } | Role::Core { policy, .. } => policy,
        }
    }

    pub fn is_plugin(&self) -> bool {
        matches!(self, Role::Plugin { .. })
    }
}

/// The opaque identity of a plugin-backed role as it appears inside
/// permission sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PluginRoleIdentity {
    pub name: CaseInsensitiveName,
    pub auth_config_id: String,
}

impl PluginRoleIdentity {
    pub fn new(
        name: impl Into<CaseInsensitiveName>,
        auth_config_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            auth_config_id: auth_config_id.into(),
        }
    }
}
