mod plan;
mod push;

use std::path::PathBuf;

use bluegreen_operations::request::DeploymentRequest;
use clap::{Args, Subcommand};

use crate::config::Config;
use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Push a new version, keeping the two previous versions as stopped backups
    #[command(alias = "blue-green-push")]
    Push(PushArgs),
    /// Show the steps a push would run without changing anything
    Plan(TargetArgs),
}

#[derive(Args)]
pub(crate) struct TargetArgs {
    /// Name of the application to deploy
    pub app: String,

    /// Path to the application manifest
    #[arg(short = 'f', long = "manifest")]
    pub manifest: Option<PathBuf>,

    /// Path to the application bits (directory, zip or jar)
    #[arg(short = 'p', long = "path")]
    pub path: Option<PathBuf>,
}

impl TargetArgs {
    fn request(&self) -> DeploymentRequest {
        DeploymentRequest {
            app_name: self.app.clone(),
            manifest_path: self.manifest.clone(),
            app_path: self.path.clone(),
        }
    }
}

#[derive(Args)]
pub(crate) struct PushArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Probe and print the plan, then stop
    #[arg(long)]
    pub dry_run: bool,
}

/// Settings shared by every subcommand.
pub(crate) struct Context {
    pub config: Config,
    pub cf_binary: Option<PathBuf>,
}

impl Commands {
    pub(crate) fn execute(self, context: &Context) -> Result<()> {
        match self {
            Self::Push(args) => push::run(args, context),
            Self::Plan(args) => plan::run(args, context),
        }
    }
}
