//! Configuration lifecycle management for the Helmsman authorization core.
//!
//! The configuration file is the single source of truth; everything else is
//! a derived projection. This crate keeps those projections fresh:
//!
//! - [`SnapshotStore`] loads the file into an immutable
//!   [`config::ConfigSnapshot`] and swaps in a new one on reload, skipping
//!   the work entirely when the content hash is unchanged. Readers always
//!   see one consistent snapshot.
//! - [`PermissionsCache`] memoizes the full pipeline permission map and
//!   recomputes it lazily after an invalidation.
//! - [`start_watching`] wires a file watcher to the two, so an edited
//!   configuration file becomes a fresh permission map without a restart.
//!   A save that fails to parse keeps the last good snapshot live.

pub mod cache;
pub mod error;
pub mod store;
pub mod watcher;

pub use cache::{PermissionMap, PermissionsCache};
pub use error::{ManagerError, Result};
pub use store::{SnapshotMetadata, SnapshotStore};
pub use watcher::start_watching;
