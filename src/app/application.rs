use super::patcher::{patch, PatchSettings, Verification};
use crate::app::cli::CliArgs;
use crate::app::logging;
use crate::app::runner::SystemRunner;
use anyhow::Result;
use clap::Parser;

pub async fn run() -> Result<()> {
    let args = CliArgs::parse();
    logging::init();

    let workflow_url = args.workflow_url.clone();
    let settings: PatchSettings = args.into();

    println!("🔧 Updating aws-auth ConfigMap for EKS cluster access...");
    match patch(&SystemRunner, &settings).await? {
        Verification::Shown => println!(
            "\n✅ Done! {} can now access the EKS cluster.",
            settings.user.username
        ),
        Verification::Failed => println!(
            "\n⚠️  ConfigMap applied but verification failed; check it with `kubectl get configmap {} -n {} -o yaml`.",
            settings.configmap.name, settings.configmap.namespace
        ),
    }

    if let Some(workflow_url) = workflow_url {
        println!("🔄 Re-run your CD workflow: {}", workflow_url);
    }
    Ok(())
}
