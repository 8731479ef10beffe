use crate::app::aws::{CredentialScope, UpdateKubeconfigInput};
use crate::app::aws_auth::{MapUser, MergeMode};
use crate::app::kubectl::ConfigMapRef;
use crate::app::patcher::PatchSettings;
use clap::Parser;
use std::path::PathBuf;

/// Grant an IAM user access to an EKS cluster by patching the aws-auth ConfigMap
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct CliArgs {
    /// AWS profile every aws and kubectl call runs under
    #[clap(short, long, env = "EKS_AUTH_PATCH_PROFILE", default_value = "devopsproject")]
    pub profile: String,

    /// Name of the EKS Kubernetes cluster to patch
    #[clap(
        short,
        long,
        env = "EKS_AUTH_PATCH_CLUSTER",
        default_value = "eks-devopsproject-cluster"
    )]
    pub cluster_name: String,

    /// Name of the AWS region that the cluster is in
    #[clap(short, long, env = "EKS_AUTH_PATCH_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Namespace holding the ConfigMap
    #[clap(short, long, default_value = "kube-system")]
    pub namespace: String,

    /// Name of the ConfigMap to patch
    #[clap(long, default_value = "aws-auth")]
    pub configmap: String,

    /// ARN of the IAM user to grant access to
    #[clap(
        long,
        env = "EKS_AUTH_PATCH_USER_ARN",
        default_value = "arn:aws:iam::794038226274:user/github-actions-eks"
    )]
    pub user_arn: String,

    /// Kubernetes username the IAM user is mapped to
    #[clap(short, long, default_value = "github-actions-eks")]
    pub username: String,

    /// Kubernetes group to bind the user to. Can specify multiple times
    #[clap(short, long = "group", default_value = "system:masters")]
    pub groups: Vec<String>,

    /// Where the updated ConfigMap is written before it is applied
    #[clap(long, default_value = "/tmp/aws-auth-updated.json")]
    pub manifest_path: PathBuf,

    /// Leave the manifest on disk after the run
    #[clap(long, default_value_t = false)]
    pub keep_manifest: bool,

    /// Keep existing mapUsers entries for other IAM users instead of overwriting the field
    #[clap(long, default_value_t = false)]
    pub merge: bool,

    /// AWS CLI binary
    #[clap(long, default_value = "aws")]
    pub aws_bin: String,

    /// kubectl binary
    #[clap(long, default_value = "kubectl")]
    pub kubectl_bin: String,

    /// CI workflow to point the operator at once access is granted
    #[clap(long, env = "EKS_AUTH_PATCH_WORKFLOW_URL")]
    pub workflow_url: Option<String>,
}

impl From<CliArgs> for PatchSettings {
    fn from(args: CliArgs) -> Self {
        PatchSettings {
            scope: CredentialScope::new(&args.profile),
            cluster: UpdateKubeconfigInput {
                aws_bin: args.aws_bin,
                cluster_name: args.cluster_name,
                region: args.region,
            },
            configmap: ConfigMapRef {
                kubectl_bin: args.kubectl_bin,
                name: args.configmap,
                namespace: args.namespace,
            },
            user: MapUser {
                userarn: args.user_arn,
                username: args.username,
                groups: args.groups,
            },
            mode: if args.merge {
                MergeMode::Merge
            } else {
                MergeMode::Overwrite
            },
            manifest_path: args.manifest_path,
            keep_manifest: args.keep_manifest,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_defaults_reproduce_original_target() {
        let settings: PatchSettings = CliArgs::try_parse_from(["eks-auth-patch"])
            .unwrap()
            .into();

        assert_eq!(settings.scope, CredentialScope::new("devopsproject"));
        assert_eq!(settings.cluster.cluster_name, "eks-devopsproject-cluster");
        assert_eq!(settings.cluster.region, "us-east-1");
        assert_eq!(settings.configmap.name, "aws-auth");
        assert_eq!(settings.configmap.namespace, "kube-system");
        assert_eq!(
            settings.user,
            MapUser {
                userarn: "arn:aws:iam::794038226274:user/github-actions-eks".to_string(),
                username: "github-actions-eks".to_string(),
                groups: vec!["system:masters".to_string()],
            }
        );
        assert_eq!(settings.mode, MergeMode::Overwrite);
        assert_eq!(
            settings.manifest_path,
            PathBuf::from("/tmp/aws-auth-updated.json")
        );
        assert!(!settings.keep_manifest);
    }

    #[test]
    fn test_overrides() {
        let args = CliArgs::try_parse_from([
            "eks-auth-patch",
            "--cluster-name",
            "prod",
            "--region",
            "eu-west-2",
            "--user-arn",
            "arn:aws:iam::1:user/ci",
            "--group",
            "system:masters",
            "--group",
            "ops",
            "--merge",
            "--workflow-url",
            "https://example.com/actions",
        ])
        .unwrap();
        assert_eq!(args.workflow_url.as_deref(), Some("https://example.com/actions"));

        let settings: PatchSettings = args.into();
        assert_eq!(settings.cluster.cluster_name, "prod");
        assert_eq!(settings.cluster.region, "eu-west-2");
        assert_eq!(settings.user.userarn, "arn:aws:iam::1:user/ci");
        assert_eq!(settings.user.groups, vec!["system:masters", "ops"]);
        assert_eq!(settings.mode, MergeMode::Merge);
    }
}
