//! The `web` command: build the streaming web app.

use crate::config::load_project;
use crate::web::build_web_app;
use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct WebArgs {
    /// Target the web app is built for
    #[arg(short, long)]
    pub target: Option<String>,
}

pub async fn execute(args: WebArgs) -> Result<()> {
    let (project_dir, config) = load_project(&std::env::current_dir()?)?;
    let target = config.find_target(args.target.as_deref())?;
    build_web_app(&config, &project_dir, target)?;
    Ok(())
}
