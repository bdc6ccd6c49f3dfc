//! Pipeline permission resolution for the Helmsman server.
//!
//! This crate answers, for every pipeline in a configuration snapshot, the
//! question "who may view, operate and administer this pipeline, and who may
//! trigger it?". The answer reconciles four layers of configuration with a
//! fixed precedence:
//!
//! 1. **Root super-admins**: users and roles in the root security config.
//!    If *nothing* is configured there, the whole system is open: every
//!    authenticated user holds every permission on every pipeline (backward
//!    compatibility with installations that never enabled security).
//! 2. **Pipeline-group authorization**: per-group view/operate/admins
//!    blocks. A group that defines no authorization at all stays viewable
//!    and operable by everyone (configurable, see
//!    [`GroupDefaultPermission`]) while administration is reserved for the
//!    super-admins.
//! 3. **Stage approval authorization**: a pipeline's first stage may
//!    restrict who triggers the pipeline; admins always retain the ability.
//! 4. **Plugin roles**: roles whose membership only an external
//!    authorization plugin can resolve are carried through the permission
//!    sets as opaque identities rather than expanded user names.
//!
//! The computation is a pure, synchronous function of one immutable
//! [`config::ConfigSnapshot`]; it performs no I/O, holds no state and never
//! fails on well-formed input. Callers that need the map frequently should
//! cache it and invalidate on configuration change (see the config-manager
//! crate).

pub mod authority;
pub mod error;
pub mod permissions;
pub mod resolver;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use authority::{GroupDefaultPermission, PipelinePermissionsAuthority};
pub use error::{AuthzError, Result};
pub use permissions::Permissions;
pub use resolver::RoleResolver;
pub use users::{AllowedUsers, Users};
