use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use config::PluginRoleIdentity;

/// A concrete, enumerable set of permitted principals: user names plus
/// plugin-role identities.
///
/// User names are stored lowercased; membership checks lowercase the probe,
/// so the set is case-insensitive. Plugin roles are kept as identities
/// because their user membership is only known to the external
/// authorization plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedUsers {
    users: HashSet<String>,
    plugin_roles: HashSet<PluginRoleIdentity>,
}

impl AllowedUsers {
    pub fn new(
        users: impl IntoIterator<Item = impl Into<String>>,
        plugin_roles: impl IntoIterator<Item = PluginRoleIdentity>,
    ) -> Self {
        Self {
            users: users.into_iter().map(|u| u.into().to_lowercase()).collect(),
            plugin_roles: plugin_roles.into_iter().collect(),
        }
    }

    pub fn contains(&self, user: &str) -> bool {
        self.users.contains(&user.to_lowercase())
    }

    pub fn has_plugin_role(&self, role: &PluginRoleIdentity) -> bool {
        self.plugin_roles.contains(role)
    }

    pub fn users(&self) -> &HashSet<String> {
        &self.users
    }

    pub fn plugin_roles(&self) -> &HashSet<PluginRoleIdentity> {
        &self.plugin_roles
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.plugin_roles.is_empty()
    }

    /// A new set containing everyone from both sets.
    pub fn union(&self, other: &AllowedUsers) -> AllowedUsers {
        AllowedUsers {
            users: self.users.union(&other.users).cloned().collect(),
            plugin_roles: self
                .plugin_roles
                .union(&other.plugin_roles)
                .cloned()
                .collect(),
        }
    }
}

/// Either a concrete allow-set or the sentinel meaning "every authenticated
/// user is permitted". The sentinel appears when no restrictive
/// authorization is configured for a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Users {
    Everyone,
    Allowed(AllowedUsers),
}

impl Users {
    pub fn allowed(
        users: impl IntoIterator<Item = impl Into<String>>,
        plugin_roles: impl IntoIterator<Item = PluginRoleIdentity>,
    ) -> Self {
        Users::Allowed(AllowedUsers::new(users, plugin_roles))
    }

    pub fn is_everyone(&self) -> bool {
        matches!(self, Users::Everyone)
    }

    pub fn contains(&self, user: &str) -> bool {
        match self {
            Users::Everyone => true,
            Users::Allowed(allowed) => allowed.contains(user),
        }
    }

    pub fn has_plugin_role(&self, role: &PluginRoleIdentity) -> bool {
        match self {
            Users::Everyone => true,
            Users::Allowed(allowed) => allowed.has_plugin_role(role),
        }
    }

    /// Union of two permission sets; `Everyone` absorbs anything.
    pub fn union(&self, other: &Users) -> Users {
        match (self, other) {
            (Users::Everyone, _) | (_, Users::Everyone) => Users::Everyone,
            (Users::Allowed(a), Users::Allowed(b)) => Users::Allowed(a.union(b)),
        }
    }
}

impl Default for Users {
    fn default() -> Self {
        Users::Allowed(AllowedUsers::default())
    }
}

impl From<AllowedUsers> for Users {
    fn from(allowed: AllowedUsers) -> Self {
        Users::Allowed(allowed)
    }
}
