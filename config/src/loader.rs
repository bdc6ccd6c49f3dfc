use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::name::CaseInsensitiveName;
use crate::security::AuthConfig;
use crate::snapshot::ConfigSnapshot;

/// Parse a configuration snapshot from YAML.
pub fn load_from_str(content: &str) -> Result<ConfigSnapshot> {
    let snapshot: ConfigSnapshot = serde_yaml::from_str(content)?;
    debug!(
        groups = snapshot.groups.len(),
        roles = snapshot.security.roles.len(),
        "parsed configuration snapshot"
    );
    Ok(snapshot)
}

/// Load a configuration snapshot from a YAML file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<ConfigSnapshot> {
    let path = path.as_ref();
    debug!("loading configuration from {:?}", path);
    let content = std::fs::read_to_string(path)?;
    let snapshot = load_from_str(&content)?;
    info!(
        "loaded configuration from {:?}: {} groups, {} roles",
        path,
        snapshot.groups.len(),
        snapshot.security.roles.len()
    );
    Ok(snapshot)
}

/// A non-fatal problem found in a snapshot.
///
/// The engines degrade gracefully around all of these (unknown roles
/// expand to nothing, malformed patterns never match), so they are
/// reported as warnings at load/save time rather than errors at
/// evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Where in the configuration the problem sits, e.g.
    /// `group 'g1' > pipeline 'p1'`.
    pub location: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Check a snapshot for problems worth surfacing to whoever is editing the
/// configuration. Always returns; an empty list means a clean snapshot.
pub fn validate(snapshot: &ConfigSnapshot) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let known_roles: HashSet<&CaseInsensitiveName> = snapshot
        .security
        .roles
        .iter()
        .map(|role| role.name())
        .collect();

    let mut seen_roles = HashSet::new();
    for role in &snapshot.security.roles {
        if !seen_roles.insert(role.name()) {
            issues.push(ValidationIssue::new(
                "security > roles",
                format!("duplicate role name '{}'", role.name()),
            ));
        }
        for problem in role.policy().validate() {
            issues.push(ValidationIssue::new(
                format!("security > roles > '{}' > policy", role.name()),
                problem.to_string(),
            ));
        }
    }

    check_role_refs(
        &mut issues,
        "security > admins",
        &snapshot.security.admins,
        &known_roles,
    );

    let mut seen_groups = HashSet::new();
    let mut seen_pipelines = HashSet::new();
    for group in &snapshot.groups {
        let group_location = format!("group '{}'", group.name);
        if !seen_groups.insert(&group.name) {
            issues.push(ValidationIssue::new(
                group_location.clone(),
                "duplicate group name",
            ));
        }

        for (block_name, block) in [
            ("view", group.authorization.view()),
            ("operate", group.authorization.operate()),
            ("admins", group.authorization.admins()),
        ] {
            if let Some(block) = block {
                check_role_refs(
                    &mut issues,
                    format!("{} > authorization > {}", group_location, block_name),
                    block,
                    &known_roles,
                );
            }
        }

        for pipeline in &group.pipelines {
            let pipeline_location = format!("{} > pipeline '{}'", group_location, pipeline.name);
            if !seen_pipelines.insert(&pipeline.name) {
                issues.push(ValidationIssue::new(
                    pipeline_location.clone(),
                    "duplicate pipeline name",
                ));
            }
            if pipeline.stages.is_empty() {
                issues.push(ValidationIssue::new(
                    pipeline_location.clone(),
                    "pipeline has no stages",
                ));
            }
            for stage in &pipeline.stages {
                if let Some(auth) = stage.approval.authorization.as_ref() {
                    check_role_refs(
                        &mut issues,
                        format!("{} > stage '{}' > approval", pipeline_location, stage.name),
                        auth,
                        &known_roles,
                    );
                }
            }
        }
    }

    if !issues.is_empty() {
        warn!("configuration snapshot has {} validation issues", issues.len());
    }

    issues
}

fn check_role_refs(
    issues: &mut Vec<ValidationIssue>,
    location: impl Into<String>,
    block: &AuthConfig,
    known_roles: &HashSet<&CaseInsensitiveName>,
) {
    let location = location.into();
    for role in &block.roles {
        if !known_roles.contains(role) {
            issues.push(ValidationIssue::new(
                location.clone(),
                format!("reference to unknown role '{}'", role),
            ));
        }
    }
}
