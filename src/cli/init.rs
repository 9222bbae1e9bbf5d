//! The `init` command: scaffold a new project.

use crate::constants::CONFIG_FILE_NAME;
use crate::utils::fs::{ensure_dir, safe_write};
use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::path::PathBuf;

/// Folders every scaffolded project starts with.
const PROJECT_FOLDERS: &[&str] =
    &["sasb/macros", "sasb/services", "sasb/jobs", "sasb/doxy", "sasbcore"];

#[derive(Args)]
pub struct InitArgs {
    /// Directory to scaffold into (defaults to the current directory)
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

pub async fn execute(args: InitArgs) -> Result<()> {
    let dir = match args.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        bail!("A {CONFIG_FILE_NAME} already exists in {}", dir.display());
    }

    for folder in PROJECT_FOLDERS {
        ensure_dir(&dir.join(folder))?;
    }

    let config = json!({
        "macroFolders": ["sasb/macros"],
        "programFolders": ["sasb/services", "sasb/jobs"],
        "buildConfig": {
            "buildOutputFolder": "sasbbuild"
        },
        "targets": [
            {
                "name": "viya",
                "serverUrl": "https://your-server.example.com",
                "serverType": "SASVIYA",
                "appLoc": "/Public/app"
            }
        ]
    });
    safe_write(&config_path, &format!("{}\n", serde_json::to_string_pretty(&config)?))?;

    println!("Project scaffolded in {}", dir.display().to_string().green());
    println!("Edit {CONFIG_FILE_NAME} to point the target at your server.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn init_creates_config_and_folders() {
        let tmp = TempDir::new().unwrap();
        execute(InitArgs { dir: Some(tmp.path().to_path_buf()) }).await.unwrap();

        assert!(tmp.path().join(CONFIG_FILE_NAME).is_file());
        for folder in PROJECT_FOLDERS {
            assert!(tmp.path().join(folder).is_dir(), "{folder} missing");
        }
        let config: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(tmp.path().join(CONFIG_FILE_NAME)).unwrap(),
        )
        .unwrap();
        assert_eq!(config["targets"][0]["serverType"], "SASVIYA");
    }

    #[tokio::test]
    async fn init_refuses_an_existing_project() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "{}").unwrap();

        let err =
            execute(InitArgs { dir: Some(tmp.path().to_path_buf()) }).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
