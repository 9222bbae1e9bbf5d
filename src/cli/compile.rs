//! The `compile` command: inline a program's macro dependencies.

use crate::compile::compile_single_file;
use crate::config::load_project;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args)]
pub struct CompileArgs {
    /// Service or job file to compile, relative to the project directory
    pub source: PathBuf,

    /// Target whose macro folders take priority during resolution
    #[arg(short, long)]
    pub target: Option<String>,

    /// Write the compiled program here instead of the build output folder
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn execute(args: CompileArgs) -> Result<()> {
    let (project_dir, config) = load_project(&std::env::current_dir()?)?;

    // An explicit target must exist; without one, fall back to the first
    // configured target (or none at all for a target-less project).
    let target = match &args.target {
        Some(name) => Some(config.find_target(Some(name))?),
        None => config.targets.first(),
    };

    let destination =
        compile_single_file(&config, &project_dir, target, &args.source, args.output).await?;
    println!("Compiled to {}", destination.display().to_string().green());
    Ok(())
}
