use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::pattern::ResourcePattern;

/// Well-known action names used in directives and requests.
pub mod actions {
    pub const VIEW: &str = "view";
    pub const ADMINISTER: &str = "administer";
}

/// Outcome of applying a directive or a whole policy to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    /// The directive (or every directive of the policy) does not apply to
    /// the request. Callers fall back to their own default.
    Skip,
}

impl Decision {
    pub fn is_allow(self) -> bool {
        self == Decision::Allow
    }

    pub fn is_deny(self) -> bool {
        self == Decision::Deny
    }

    pub fn is_skip(self) -> bool {
        self == Decision::Skip
    }
}

/// The kind of server resource a directive or request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Matches any resource kind.
    #[serde(rename = "*")]
    All,
    ElasticAgentProfile,
    ClusterProfile,
    Environment,
    ConfigRepo,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::All => "*",
            ResourceKind::ElasticAgentProfile => "elastic_agent_profile",
            ResourceKind::ClusterProfile => "cluster_profile",
            ResourceKind::Environment => "environment",
            ResourceKind::ConfigRepo => "config_repo",
        }
    }
}

/// One authorization question: may `action` be performed on the resource
/// identified by `resource` of the given kind?
///
/// For elastic agent profiles, `operate_within` carries the id of the
/// cluster the profile belongs to; it is empty for other kinds.
#[derive(Debug, Clone, Copy)]
pub struct Request<'a> {
    pub action: &'a str,
    pub resource_kind: ResourceKind,
    pub resource: &'a str,
    pub operate_within: &'a str,
}

impl<'a> Request<'a> {
    pub fn new(action: &'a str, resource_kind: ResourceKind, resource: &'a str) -> Self {
        Self {
            action,
            resource_kind,
            resource,
            operate_within: "",
        }
    }

    /// Scope the request to the cluster owning the resource.
    pub fn within(mut self, cluster: &'a str) -> Self {
        self.operate_within = cluster;
        self
    }
}

/// The matching half shared by allow and deny directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveSpec {
    action: String,
    resource_kind: ResourceKind,
    resource: ResourcePattern,
    operate_within: ResourcePattern,
}

impl DirectiveSpec {
    fn new(action: String, resource_kind: ResourceKind, resource: String) -> Self {
        let (resource, operate_within) = match resource_kind {
            ResourceKind::ElasticAgentProfile => parse_elastic_resource(resource),
            _ => (ResourcePattern::new(resource), ResourcePattern::any()),
        };
        Self {
            action,
            resource_kind,
            resource,
            operate_within,
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn resource_kind(&self) -> ResourceKind {
        self.resource_kind
    }

    pub fn resource(&self) -> &ResourcePattern {
        &self.resource
    }

    pub fn operate_within(&self) -> &ResourcePattern {
        &self.operate_within
    }

    fn action_matches(&self, action: &str) -> bool {
        self.action.eq_ignore_ascii_case(action)
    }

    fn matches(&self, request: &Request<'_>) -> bool {
        match self.resource_kind {
            ResourceKind::ElasticAgentProfile => self.matches_elastic(request),
            ResourceKind::All => {
                self.action_matches(request.action) && self.resource.matches(request.resource)
            }
            kind => {
                self.action_matches(request.action)
                    && kind == request.resource_kind
                    && self.resource.matches(request.resource)
            }
        }
    }

    fn matches_elastic(&self, request: &Request<'_>) -> bool {
        match request.resource_kind {
            // Both the profile pattern and the owning-cluster pattern must
            // match.
            ResourceKind::ElasticAgentProfile => {
                self.action_matches(request.action)
                    && self.resource.matches(request.resource)
                    && self.operate_within.matches(request.operate_within)
            }
            // Managing profiles within a cluster implies seeing the cluster
            // itself, so this directive also decides view requests for
            // clusters matching its operate-within pattern, independent of
            // the profile pattern.
            ResourceKind::ClusterProfile => {
                request.action.eq_ignore_ascii_case(actions::VIEW)
                    && (self.action_matches(actions::VIEW)
                        || self.action_matches(actions::ADMINISTER))
                    && self.operate_within.matches(request.resource)
            }
            _ => false,
        }
    }

    fn validate(&self) -> Result<(), PolicyError> {
        self.resource.validate()?;
        self.operate_within.validate()
    }
}

/// Split an elastic-agent-profile resource string into profile and cluster
/// patterns. `"cluster:profile"` addresses profiles within matching
/// clusters; a bare `"profile"` means any cluster. More than one `:` is
/// ambiguous; the directive is kept but fails closed.
fn parse_elastic_resource(raw: String) -> (ResourcePattern, ResourcePattern) {
    let parts: Vec<&str> = raw.split(':').collect();
    match parts.as_slice() {
        [profile] => (ResourcePattern::new(*profile), ResourcePattern::any()),
        [cluster, profile] => (
            ResourcePattern::new(*profile),
            ResourcePattern::new(*cluster),
        ),
        _ => {
            let reason = "more than one `:` separator; cannot split into cluster and profile";
            (
                ResourcePattern::malformed(raw.clone(), reason),
                ResourcePattern::malformed(raw, reason),
            )
        }
    }
}

/// One allow/deny rule in a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDirective", into = "RawDirective")]
pub enum Directive {
    Allow(DirectiveSpec),
    Deny(DirectiveSpec),
    /// Denies an action on cluster profiles whose id matches, and on
    /// elastic-agent-profile requests whose owning cluster matches:
    /// one rule cuts off a whole cluster's profile operations.
    ClusterProfilesDeny {
        action: String,
        clusters: ResourcePattern,
    },
}

impl Directive {
    pub fn allow(
        action: impl Into<String>,
        resource_kind: ResourceKind,
        resource: impl Into<String>,
    ) -> Self {
        Directive::Allow(DirectiveSpec::new(action.into(), resource_kind, resource.into()))
    }

    pub fn deny(
        action: impl Into<String>,
        resource_kind: ResourceKind,
        resource: impl Into<String>,
    ) -> Self {
        let action = action.into();
        let resource = resource.into();
        match resource_kind {
            ResourceKind::ClusterProfile => Directive::ClusterProfilesDeny {
                action,
                clusters: ResourcePattern::new(resource),
            },
            _ => Directive::Deny(DirectiveSpec::new(action, resource_kind, resource)),
        }
    }

    pub fn action(&self) -> &str {
        match self {
            Directive::Allow(spec) | Directive::Deny(spec) => spec.action(),
            Directive::ClusterProfilesDeny { action, .. } => action,
        }
    }

    /// Apply this directive to a request. Returns the directive's effect
    /// when it applies, [`Decision::Skip`] otherwise. Never errors.
    pub fn apply(&self, request: &Request<'_>) -> Decision {
        match self {
            Directive::Allow(spec) => {
                if spec.matches(request) {
                    Decision::Allow
                } else {
                    Decision::Skip
                }
            }
            Directive::Deny(spec) => {
                if spec.matches(request) {
                    Decision::Deny
                } else {
                    Decision::Skip
                }
            }
            Directive::ClusterProfilesDeny { action, clusters } => {
                if !action.eq_ignore_ascii_case(request.action) {
                    return Decision::Skip;
                }
                let denied = match request.resource_kind {
                    ResourceKind::ClusterProfile => clusters.matches(request.resource),
                    ResourceKind::ElasticAgentProfile => clusters.matches(request.operate_within),
                    _ => false,
                };
                if denied {
                    Decision::Deny
                } else {
                    Decision::Skip
                }
            }
        }
    }

    /// Check the directive's patterns; used by configuration validation.
    /// Evaluation itself never errors.
    pub fn validate(&self) -> Result<(), PolicyError> {
        match self {
            Directive::Allow(spec) | Directive::Deny(spec) => spec.validate(),
            Directive::ClusterProfilesDeny { clusters, .. } => clusters.validate(),
        }
    }
}

/// Serialized shape of a directive as it appears in role configuration:
/// exactly one of `allow`/`deny` naming the action, plus a resource type
/// and pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDirective {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    allow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deny: Option<String>,
    #[serde(rename = "type")]
    resource_kind: ResourceKind,
    resource: String,
}

impl TryFrom<RawDirective> for Directive {
    type Error = PolicyError;

    fn try_from(raw: RawDirective) -> Result<Self, Self::Error> {
        match (raw.allow, raw.deny) {
            (Some(action), None) => Ok(Directive::allow(action, raw.resource_kind, raw.resource)),
            (None, Some(action)) => Ok(Directive::deny(action, raw.resource_kind, raw.resource)),
            _ => Err(PolicyError::InvalidDirective(
                "exactly one of `allow` or `deny` must be set".to_string(),
            )),
        }
    }
}

impl From<Directive> for RawDirective {
    fn from(directive: Directive) -> Self {
        match directive {
            Directive::Allow(spec) => RawDirective {
                allow: Some(spec.action.clone()),
                deny: None,
                resource_kind: spec.resource_kind,
                resource: elastic_resource_string(&spec),
            },
            Directive::Deny(spec) => RawDirective {
                allow: None,
                deny: Some(spec.action.clone()),
                resource_kind: spec.resource_kind,
                resource: elastic_resource_string(&spec),
            },
            Directive::ClusterProfilesDeny { action, clusters } => RawDirective {
                allow: None,
                deny: Some(action),
                resource_kind: ResourceKind::ClusterProfile,
                resource: clusters.as_str().to_string(),
            },
        }
    }
}

fn elastic_resource_string(spec: &DirectiveSpec) -> String {
    if spec.resource_kind == ResourceKind::ElasticAgentProfile && !spec.operate_within.is_any() {
        format!("{}:{}", spec.operate_within.as_str(), spec.resource.as_str())
    } else {
        spec.resource.as_str().to_string()
    }
}

/// An ordered directive chain for one subject (role or user).
///
/// Evaluation is a first-match-wins linear scan: the first directive that
/// does not skip decides. Order is configuration-controlled and
/// semantically significant; there is no most-specific-match resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Policy {
    directives: Vec<Directive>,
}

impl Policy {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self { directives }
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Directive> {
        self.directives.iter()
    }

    pub fn push(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    /// Apply the chain to a request: the first non-skip directive decides.
    /// Returns [`Decision::Skip`] when no directive applies; the caller's
    /// default (conventionally deny) takes over.
    pub fn apply(&self, request: &Request<'_>) -> Decision {
        for directive in &self.directives {
            let decision = directive.apply(request);
            if !decision.is_skip() {
                tracing::trace!(
                    action = request.action,
                    resource = request.resource,
                    ?decision,
                    "directive decided request"
                );
                return decision;
            }
        }
        Decision::Skip
    }

    /// Convenience wrapper with the conventional deny default.
    pub fn allows(&self, request: &Request<'_>) -> bool {
        self.apply(request).is_allow()
    }

    /// Pattern problems in any directive, for configuration validation.
    pub fn validate(&self) -> Vec<PolicyError> {
        self.directives
            .iter()
            .filter_map(|d| d.validate().err())
            .collect()
    }
}

impl FromIterator<Directive> for Policy {
    fn from_iter<T: IntoIterator<Item = Directive>>(iter: T) -> Self {
        Self {
            directives: iter.into_iter().collect(),
        }
    }
}
