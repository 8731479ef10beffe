use crate::app::aws::{update_kubeconfig, CredentialScope, UpdateKubeconfigInput};
use crate::app::aws_auth::{set_map_users, MapUser, MergeMode};
use crate::app::kubectl::ConfigMapRef;
use crate::app::manifest::Manifest;
use crate::app::runner::CommandRunner;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PatchSettings {
    pub scope: CredentialScope,
    pub cluster: UpdateKubeconfigInput,
    pub configmap: ConfigMapRef,
    pub user: MapUser,
    pub mode: MergeMode,
    pub manifest_path: PathBuf,
    pub keep_manifest: bool,
}

/// How the run ended once the change was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Shown,
    Failed,
}

/// Walks the fixed chain: kubeconfig, fetch, mutate, write, apply, verify.
/// Everything up to and including apply is fatal; verification only warns.
pub async fn patch<R: CommandRunner + ?Sized>(
    runner: &R,
    settings: &PatchSettings,
) -> Result<Verification> {
    let scope = &settings.scope;

    println!("\n📡 Updating kubeconfig...");
    update_kubeconfig(runner, &settings.cluster, scope)
        .await
        .context("updating kubeconfig")?;

    println!(
        "\n📋 Getting current {} ConfigMap...",
        settings.configmap.name
    );
    let mut document = settings
        .configmap
        .fetch(runner, scope)
        .await
        .context("fetching ConfigMap")?;

    set_map_users(&mut document, &settings.user, settings.mode)
        .context("updating mapUsers")?;

    let manifest = Manifest::write(&document, &settings.manifest_path, settings.keep_manifest)
        .context("writing manifest")?;

    println!("\n✨ Applying updated ConfigMap...");
    settings
        .configmap
        .apply(runner, manifest.path(), scope)
        .await
        .context("applying ConfigMap")?;

    if manifest.is_kept() {
        log::info!("manifest kept at {}", manifest.path().display());
    }
    drop(manifest);

    println!("\n✅ {} ConfigMap updated successfully!", settings.configmap.name);
    println!("\n📋 Verification:");
    match settings.configmap.show(runner, scope).await {
        Ok(()) => Ok(Verification::Shown),
        Err(err) => {
            log::warn!("verification fetch failed: {}", err);
            Ok(Verification::Failed)
        }
    }
}
