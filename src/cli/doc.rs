//! The `doc` command: generate project documentation.

use crate::config::load_project;
use crate::docs;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct DocArgs {
    /// Target whose macro folders are included in the docs
    #[arg(short, long)]
    pub target: Option<String>,

    /// Output directory (defaults to <buildOutputFolder>/docs)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,
}

pub async fn execute(args: DocArgs) -> Result<()> {
    let (project_dir, config) = load_project(&std::env::current_dir()?)?;
    let target = match &args.target {
        Some(name) => Some(config.find_target(Some(name))?),
        None => config.targets.first(),
    };
    docs::generate(&config, &project_dir, target, args.out_dir).await?;
    Ok(())
}
