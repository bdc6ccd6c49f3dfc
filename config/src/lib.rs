//! The server configuration snapshot consumed by the authorization engines.
//!
//! A [`ConfigSnapshot`] is an immutable, in-memory projection of the server
//! configuration file: an ordered list of pipeline groups (each with its own
//! authorization block and ordered pipelines) plus the root security
//! configuration (super-admins and the role registry). Engines read one
//! consistent snapshot for the duration of a computation and never mutate it;
//! reloading produces a fresh snapshot.

pub mod error;
pub mod loader;
pub mod name;
pub mod pipeline;
pub mod security;
pub mod snapshot;

pub use error::{ConfigError, Result};
pub use loader::{load_from_file, load_from_str, validate, ValidationIssue};
pub use name::CaseInsensitiveName;
pub use pipeline::{Approval, ApprovalKind, Authorization, Pipeline, PipelineGroup, Stage};
pub use security::{AdminsConfig, AuthConfig, PluginRoleIdentity, Role, SecurityConfig};
pub use snapshot::ConfigSnapshot;
