//! Job execution: trigger a deployed job and collect its artifacts.
//!
//! Wraps [`SasAdapter::submit_job`] with the CLI conveniences: a spinner
//! while the server holds the request, optional status/output/log files,
//! and an elapsed-time summary. Fetching the log forces a wait, since the
//! log link only exists once the job has finished.

use crate::adapter::{Job, SasAdapter, parse_log_lines};
use crate::config::Target;
use crate::constants::DEFAULT_COMPUTE_CONTEXT;
use crate::core::SasbError;
use crate::utils::fs::safe_write;
use crate::utils::progress::Spinner;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;

/// Where the job JSON should go.
#[derive(Debug, Clone)]
pub enum OutputTarget {
    /// Print to stdout.
    Stdout,
    /// Write to a file.
    File(PathBuf),
}

/// Optional artifacts of a job run.
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Block until the job reaches a terminal state.
    pub wait: bool,
    /// Emit the job JSON.
    pub output: Option<OutputTarget>,
    /// Fetch and store the job log; `None` inside means
    /// `<job-name>.log` in `work_dir`.
    pub log_file: Option<Option<PathBuf>>,
    /// Write a short status file at initiation and completion.
    pub status_file: Option<PathBuf>,
    /// Base directory for default file locations.
    pub work_dir: PathBuf,
}

/// The compute context a job runs in, falling back to the platform default
/// when the target does not configure one.
pub fn get_context_name(target: &Target) -> String {
    match &target.context_name {
        Some(name) => name.clone(),
        None => {
            warn!("contextName was not provided. Using {DEFAULT_COMPUTE_CONTEXT} by default.");
            DEFAULT_COMPUTE_CONTEXT.to_string()
        }
    }
}

/// Triggers the job at `job_path` on the target server.
pub async fn execute<A: SasAdapter>(
    adapter: &A,
    job_path: &str,
    target: &Target,
    options: &ExecuteOptions,
) -> Result<Job> {
    let started = Instant::now();

    if let Some(status_file) = &options.status_file {
        write_status(status_file, "Initiating", None)?;
    }

    let spinner = Spinner::start(format!(
        "Job located at {} has been submitted for execution...",
        job_path.green()
    ));

    let context_name = get_context_name(target);
    // The log link only appears on a finished job.
    let wait = options.wait || options.log_file.is_some();
    let submitted = adapter.submit_job(job_path, &context_name, wait).await;

    spinner.stop();

    let job = match submitted {
        Ok(job) => job,
        Err(err) => {
            if let Some(status_file) = &options.status_file {
                let state = match &err {
                    SasbError::JobFailed { state } => state.clone(),
                    _ => "Not Available".to_string(),
                };
                write_status(status_file, &state, Some(&err.to_string()))?;
            }
            return Err(err.into());
        }
    };

    if let Some(status_file) = &options.status_file {
        write_status(status_file, &job.state, None)?;
        println!("Status saved to: {}", status_file.display());
    }

    if let Some(session) = job.link("self", "GET") {
        let detail = if wait { "has been executed. Job details" } else { "session" };
        println!(
            "Job located at '{job_path}' {detail} can be found at {}{}",
            target.server_url, session.href
        );
    }

    if let Some(output) = &options.output {
        let job_json = serde_json::to_string_pretty(&job)?;
        match output {
            OutputTarget::Stdout => println!("{job_json}"),
            OutputTarget::File(path) => {
                let path = resolve_output_path(path, &options.work_dir);
                safe_write(&path, &job_json)?;
                println!("Output saved to: {}", path.display());
            }
        }
    }

    if let Some(log_file) = &options.log_file {
        save_log(adapter, &job, job_path, target, log_file.as_deref(), &options.work_dir).await?;
    }

    println!("This operation took {} seconds", started.elapsed().as_secs_f64().round());
    Ok(job)
}

async fn save_log<A: SasAdapter>(
    adapter: &A,
    job: &Job,
    job_path: &str,
    target: &Target,
    log_file: Option<&Path>,
    work_dir: &Path,
) -> Result<()> {
    let Some(log_link) = job.link("log", "GET") else {
        warn!("job has no log link; skipping log download");
        return Ok(());
    };

    let log_url = format!("{}{}", target.server_url, log_link.href);
    let raw = adapter.fetch_log_content(&log_url).await?;
    let lines = parse_log_lines(&raw).context("Failed to parse the job log payload")?;

    let log_path = match log_file {
        Some(path) => resolve_output_path(path, work_dir),
        None => {
            let job_name = job_path.rsplit('/').next().unwrap_or(job_path);
            work_dir.join(format!("{job_name}.log"))
        }
    };
    safe_write(&log_path, &lines)?;
    println!("Log saved to: {}", log_path.display());
    Ok(())
}

fn resolve_output_path(path: &Path, work_dir: &Path) -> PathBuf {
    if path.is_absolute() { path.to_path_buf() } else { work_dir.join(path) }
}

fn write_status(status_file: &Path, state: &str, error: Option<&str>) -> Result<()> {
    let content = match error {
        Some(details) => format!("Job Status: {state}\nDetails: {details}\n"),
        None => format!("Job Status: {state}\n"),
    };
    safe_write(status_file, &content)
}
