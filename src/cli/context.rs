//! The `context` command group: compute context management.

use crate::adapter::rest::RestAdapter;
use crate::config::load_project;
use crate::context;
use anyhow::Result;
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ContextArgs {
    #[command(subcommand)]
    command: ContextCommands,

    /// Target server to run against
    #[arg(short, long, global = true)]
    target: Option<String>,
}

#[derive(Subcommand)]
enum ContextCommands {
    /// List compute contexts on the server
    List,
    /// Export a context to a JSON file
    Export {
        /// Display name of the context
        name: String,
        /// Directory to write the JSON file into
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },
    /// Create a context from a JSON descriptor
    Create {
        /// Path to the context JSON file
        source: PathBuf,
    },
    /// Update a context from a JSON descriptor
    Edit {
        /// Display name of the context to update
        name: String,
        /// Path to the context JSON file
        source: PathBuf,
    },
    /// Delete a context
    Delete {
        /// Display name of the context to delete
        name: String,
    },
}

pub async fn execute(args: ContextArgs) -> Result<()> {
    let (_, config) = load_project(&std::env::current_dir()?)?;
    let target = config.find_target(args.target.as_deref())?;
    let adapter = RestAdapter::new(&target.server_url);

    match args.command {
        ContextCommands::List => context::list(&adapter).await,
        ContextCommands::Export { name, out_dir } => {
            let out_dir = match out_dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            context::export(&adapter, &name, &out_dir).await?;
            Ok(())
        }
        ContextCommands::Create { source } => {
            context::create(&adapter, &source).await?;
            Ok(())
        }
        ContextCommands::Edit { name, source } => {
            context::edit(&adapter, &name, &source).await?;
            Ok(())
        }
        ContextCommands::Delete { name } => context::delete(&adapter, &name).await,
    }
}
