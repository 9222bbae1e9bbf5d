//! The `job` command group: run deployed jobs on the server.

use crate::adapter::rest::RestAdapter;
use crate::config::load_project;
use crate::job::{ExecuteOptions, OutputTarget, execute as run_job};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct JobArgs {
    #[command(subcommand)]
    command: JobCommands,
}

#[derive(Subcommand)]
enum JobCommands {
    /// Trigger a job by its server path
    Execute(ExecuteArgs),
}

#[derive(Args)]
struct ExecuteArgs {
    /// Server path of the job, e.g. /Public/app/jobs/extract
    job_path: String,

    /// Target server to run against
    #[arg(short, long)]
    target: Option<String>,

    /// Wait for the job to reach a terminal state
    #[arg(short, long)]
    wait: bool,

    /// Print the job JSON, or save it when a path is given
    #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
    output: Option<PathBuf>,

    /// Fetch the job log (implies --wait); defaults to <job-name>.log
    #[arg(short, long, num_args = 0..=1, default_missing_value = "")]
    log: Option<PathBuf>,

    /// Write the job status to this file
    #[arg(short, long)]
    status: Option<PathBuf>,
}

pub async fn execute(args: JobArgs) -> Result<()> {
    match args.command {
        JobCommands::Execute(args) => execute_job(args).await,
    }
}

async fn execute_job(args: ExecuteArgs) -> Result<()> {
    let (_, config) = load_project(&std::env::current_dir()?)?;
    let target = config.find_target(args.target.as_deref())?;
    let adapter = RestAdapter::new(&target.server_url);

    let options = ExecuteOptions {
        wait: args.wait,
        output: args.output.map(|path| {
            if path.as_os_str().is_empty() {
                OutputTarget::Stdout
            } else {
                OutputTarget::File(path)
            }
        }),
        log_file: args
            .log
            .map(|path| if path.as_os_str().is_empty() { None } else { Some(path) }),
        status_file: args.status,
        work_dir: std::env::current_dir()?,
    };

    run_job(&adapter, &args.job_path, target, &options).await?;
    Ok(())
}
