//! Command-line interface definitions and dispatch.
//!
//! Each subcommand lives in its own module with an `Args` struct and an
//! `execute` function; this module owns the top-level [`Cli`] parser,
//! global flags and logging setup.

pub mod compile;
pub mod context;
pub mod doc;
pub mod init;
pub mod job;
pub mod web;

use crate::constants::ENV_NO_PROGRESS;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// SAS application build and deployment toolchain.
#[derive(Parser)]
#[command(name = "sasb", version, about = "Build and deploy SAS apps from the command line")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Disable progress indicators
    #[arg(long, global = true, env = ENV_NO_PROGRESS)]
    no_progress: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new project in the current directory
    Init(init::InitArgs),
    /// Compile a service or job, inlining its macro dependencies
    Compile(compile::CompileArgs),
    /// Execute jobs on the target server
    Job(job::JobArgs),
    /// Manage compute contexts on the target server
    Context(context::ContextArgs),
    /// Build the streaming web app for a target
    Web(web::WebArgs),
    /// Generate project documentation with Doxygen
    Doc(doc::DocArgs),
}

impl Cli {
    /// Parses arguments, sets up logging and runs the selected command.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();
        if self.no_progress {
            // SAFETY: happens before any command spawns work that reads the
            // environment.
            unsafe { std::env::set_var(ENV_NO_PROGRESS, "1") };
        }

        match self.command {
            Commands::Init(args) => init::execute(args).await,
            Commands::Compile(args) => compile::execute(args).await,
            Commands::Job(args) => job::execute(args).await,
            Commands::Context(args) => context::execute(args).await,
            Commands::Web(args) => web::execute(args).await,
            Commands::Doc(args) => doc::execute(args).await,
        }
    }

    fn init_logging(&self) {
        let level = if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("sasb={level}")));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }
}
