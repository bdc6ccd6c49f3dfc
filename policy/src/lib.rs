//! Ordered allow/deny directive chains for server resources.
//!
//! A [`Policy`] is an ordered list of [`Directive`]s attached to a role. Each
//! directive names an effect (allow or deny), an action, a resource kind and a
//! wildcard resource pattern. Evaluating a policy against a [`Request`] walks
//! the directives in declared order and returns the effect of the first
//! directive that applies; directives that do not apply are skipped. When no
//! directive applies the policy returns [`Decision::Skip`] and the caller
//! falls back to its own default (conventionally deny).
//!
//! Directive order is controlled by whoever writes the configuration and is
//! semantically significant: an early broad allow shadows a later narrow deny.
//!
//! Elastic agent profiles are addressed within their owning cluster using a
//! two-part `cluster:profile` resource string; a bare `profile` means "in any
//! cluster". See [`Directive`] for the matching rules.
//!
//! Evaluation is total: malformed patterns never match and never error.

pub mod directive;
pub mod error;
pub mod pattern;

pub use directive::{
    actions, Decision, Directive, DirectiveSpec, Policy, Request, ResourceKind,
};
pub use error::{PolicyError, Result};
pub use pattern::ResourcePattern;
