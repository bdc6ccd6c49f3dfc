use std::collections::{HashMap, HashSet};

use config::{AuthConfig, PluginRoleIdentity, Role, SecurityConfig};

/// Expands role references into the user names and plugin-role identities
/// that flow into permission sets.
///
/// Construction precomputes the membership of every server-native role;
/// plugin roles are excluded since they cannot be expanded locally. All
/// lookups are case-insensitive and total: a reference to a role that does
/// not exist (for instance because it was deleted after the block was
/// written) contributes nothing rather than failing the computation.
pub struct RoleResolver<'a> {
    security: &'a SecurityConfig,
    roles_to_users: HashMap<String, HashSet<String>>,
}

impl<'a> RoleResolver<'a> {
    pub fn new(security: &'a SecurityConfig) -> Self {
        let mut roles_to_users = HashMap::new();
        for role in &security.roles {
            if let Role::Core { name, users, .. } = role {
                roles_to_users.insert(
                    name.folded(),
                    users.iter().map(|user| user.to_lowercase()).collect(),
                );
            }
        }
        Self {
            security,
            roles_to_users,
        }
    }

    /// All user names granted by a block: its explicit users plus the
    /// expanded membership of every referenced native role, lowercased.
    pub fn names_of(&self, block: &AuthConfig) -> HashSet<String> {
        let mut names: HashSet<String> =
            block.users.iter().map(|user| user.to_lowercase()).collect();
        for role in &block.roles {
            if let Some(members) = self.roles_to_users.get(&role.folded()) {
                names.extend(members.iter().cloned());
            }
        }
        names
    }

    /// The plugin-role identities among a block's role references;
    /// references that are native roles or unknown are silently dropped.
    pub fn plugin_roles_of(&self, block: &AuthConfig) -> HashSet<PluginRoleIdentity> {
        block
            .roles
            .iter()
            .filter_map(|role| self.security.plugin_role_identity(role))
            .collect()
    }
}
