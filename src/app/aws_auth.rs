use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const MAP_USERS: &str = "mapUsers";

/// One IAM user to Kubernetes identity binding from the aws-auth ConfigMap.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MapUser {
    /// ARN of the IAM user
    pub userarn: String,
    /// Username inside kube
    pub username: String,
    /// Groups in kube
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Replace `mapUsers` with the single binding.
    #[default]
    Overwrite,
    /// Keep existing bindings for other users and replace only ours.
    Merge,
}

#[derive(Error, Debug)]
pub enum AwsAuthError {
    #[error("ConfigMap has no `data` key")]
    MissingData,

    #[error("ConfigMap `data` is not a mapping")]
    DataNotAnObject,

    #[error("Existing `data.mapUsers` is not a string")]
    MapUsersNotAString,

    #[error("Failed to parse existing `data.mapUsers` as YAML: {source}")]
    InvalidMapUsers { source: serde_yaml::Error },

    #[error("Failed to render `data.mapUsers` as YAML: {source}")]
    FailedToRenderMapUsers { source: serde_yaml::Error },
}

/// Renders bindings in the block layout the aws-auth ConfigMap uses:
///
/// ```text
/// - userarn: arn:aws:iam::123456789012:user/ci
///   username: ci
///   groups:
///   - system:masters
/// ```
pub fn render_map_users(users: &[MapUser]) -> Result<String, AwsAuthError> {
    serde_yaml::to_string(users)
        .map_err(|source| AwsAuthError::FailedToRenderMapUsers { source })
}

pub fn parse_map_users(map_users: &str) -> Result<Vec<MapUser>, AwsAuthError> {
    if map_users.trim().is_empty() {
        return Ok(Vec::new());
    }
    let users: Option<Vec<MapUser>> = serde_yaml::from_str(map_users)
        .map_err(|source| AwsAuthError::InvalidMapUsers { source })?;
    Ok(users.unwrap_or_default())
}

/// Sets `data.mapUsers` on a fetched ConfigMap. Every other key of the
/// document is left as it was.
pub fn set_map_users(
    configmap: &mut Value,
    user: &MapUser,
    mode: MergeMode,
) -> Result<(), AwsAuthError> {
    let data = configmap
        .get_mut("data")
        .ok_or(AwsAuthError::MissingData)?
        .as_object_mut()
        .ok_or(AwsAuthError::DataNotAnObject)?;

    let users = match mode {
        MergeMode::Overwrite => vec![user.clone()],
        MergeMode::Merge => {
            let existing = match data.get(MAP_USERS) {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::String(map_users)) => parse_map_users(map_users)?,
                Some(_) => return Err(AwsAuthError::MapUsersNotAString),
            };
            existing
                .into_iter()
                .filter(|existing| existing.userarn != user.userarn)
                .chain(std::iter::once(user.clone()))
                .collect()
        }
    };

    data.insert(
        MAP_USERS.to_string(),
        Value::String(render_map_users(&users)?),
    );
    Ok(())
}
