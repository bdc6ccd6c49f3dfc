//! Builders for configuration snapshots used across the authority tests.

use config::{
    AuthConfig, CaseInsensitiveName, ConfigSnapshot, Pipeline, PipelineGroup, Role, Stage,
};

pub(crate) fn add_pipeline_with_group(
    snapshot: &mut ConfigSnapshot,
    group: &str,
    pipeline: &str,
    stage: &str,
) {
    let group = group_mut(snapshot, group);
    let mut pipeline = Pipeline::new(pipeline);
    pipeline.stages.push(Stage::new(stage));
    group.pipelines.push(pipeline);
}

pub(crate) fn add_stage(snapshot: &mut ConfigSnapshot, pipeline: &str, stage: &str) {
    pipeline_mut(snapshot, pipeline)
        .stages
        .push(Stage::new(stage));
}

pub(crate) fn add_user_as_super_admin(snapshot: &mut ConfigSnapshot, user: &str) {
    snapshot.security.admins.users.push(user.to_string());
}

pub(crate) fn add_role_as_super_admin(snapshot: &mut ConfigSnapshot, role: &str) {
    snapshot
        .security
        .admins
        .roles
        .push(CaseInsensitiveName::new(role));
}

pub(crate) fn add_role(snapshot: &mut ConfigSnapshot, role: Role) {
    snapshot.security.roles.push(role);
}

pub(crate) fn core_role(name: &str, users: &[&str]) -> Role {
    Role::core(name, users.iter().map(|u| u.to_string()).collect())
}

pub(crate) fn add_user_as_viewer_of_group(snapshot: &mut ConfigSnapshot, user: &str, group: &str) {
    view_block(snapshot, group).users.push(user.to_string());
}

pub(crate) fn add_role_as_viewer_of_group(snapshot: &mut ConfigSnapshot, role: &str, group: &str) {
    view_block(snapshot, group)
        .roles
        .push(CaseInsensitiveName::new(role));
}

pub(crate) fn add_user_as_operator_of_group(
    snapshot: &mut ConfigSnapshot,
    user: &str,
    group: &str,
) {
    operate_block(snapshot, group).users.push(user.to_string());
}

pub(crate) fn add_role_as_operator_of_group(
    snapshot: &mut ConfigSnapshot,
    role: &str,
    group: &str,
) {
    operate_block(snapshot, group)
        .roles
        .push(CaseInsensitiveName::new(role));
}

pub(crate) fn add_admin_user_for_group(snapshot: &mut ConfigSnapshot, user: &str, group: &str) {
    admins_block(snapshot, group).users.push(user.to_string());
}

pub(crate) fn add_admin_role_for_group(snapshot: &mut ConfigSnapshot, role: &str, group: &str) {
    admins_block(snapshot, group)
        .roles
        .push(CaseInsensitiveName::new(role));
}

pub(crate) fn add_approval_user(
    snapshot: &mut ConfigSnapshot,
    pipeline: &str,
    stage: &str,
    user: &str,
) {
    approval_block(snapshot, pipeline, stage)
        .users
        .push(user.to_string());
}

pub(crate) fn add_approval_role(
    snapshot: &mut ConfigSnapshot,
    pipeline: &str,
    stage: &str,
    role: &str,
) {
    approval_block(snapshot, pipeline, stage)
        .roles
        .push(CaseInsensitiveName::new(role));
}

fn group_mut<'a>(snapshot: &'a mut ConfigSnapshot, name: &str) -> &'a mut PipelineGroup {
    let key = CaseInsensitiveName::new(name);
    if let Some(index) = snapshot.groups.iter().position(|g| g.name == key) {
        &mut snapshot.groups[index]
    } else {
        snapshot.groups.push(PipelineGroup::new(name));
        snapshot.groups.last_mut().expect("just pushed")
    }
}

fn pipeline_mut<'a>(snapshot: &'a mut ConfigSnapshot, name: &str) -> &'a mut Pipeline {
    let key = CaseInsensitiveName::new(name);
    snapshot
        .groups
        .iter_mut()
        .flat_map(|group| group.pipelines.iter_mut())
        .find(|pipeline| pipeline.name == key)
        .expect("pipeline exists in some group")
}

fn view_block<'a>(snapshot: &'a mut ConfigSnapshot, group: &str) -> &'a mut AuthConfig {
    group_mut(snapshot, group)
        .authorization
        .view
        .get_or_insert_with(AuthConfig::default)
}

fn operate_block<'a>(snapshot: &'a mut ConfigSnapshot, group: &str) -> &'a mut AuthConfig {
    group_mut(snapshot, group)
        .authorization
        .operate
        .get_or_insert_with(AuthConfig::default)
}

fn admins_block<'a>(snapshot: &'a mut ConfigSnapshot, group: &str) -> &'a mut AuthConfig {
    group_mut(snapshot, group)
        .authorization
        .admins
        .get_or_insert_with(AuthConfig::default)
}

fn approval_block<'a>(
    snapshot: &'a mut ConfigSnapshot,
    pipeline: &str,
    stage: &str,
) -> &'a mut AuthConfig {
    let key = CaseInsensitiveName::new(stage);
    pipeline_mut(snapshot, pipeline)
        .stages
        .iter_mut()
        .find(|s| s.name == key)
        .expect("stage exists on pipeline")
        .approval
        .authorization
        .get_or_insert_with(AuthConfig::default)
}
