//! Documentation generation via Doxygen.
//!
//! The project ships its own Doxyfile under `sasb/doxy/`; this module just
//! assembles the input folder list from the configuration, locates the
//! doxygen executable on the PATH and runs it with the project-specific
//! settings passed through environment variables referenced from the
//! Doxyfile (`$(DOXY_INPUT)`, `$(DOXY_HTML_OUTPUT)`).

use crate::config::{ProjectConfig, Target};
use crate::core::SasbError;
use crate::utils::fs::ensure_dir;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Space-separated Doxygen INPUT value covering every folder that holds
/// SAS source: macro folders, program folders and the target's macro
/// folders when a target is given.
fn input_folders(config: &ProjectConfig, project_dir: &Path, target: Option<&Target>) -> String {
    config
        .search_roots(project_dir, target)
        .iter()
        .filter(|root| root.is_dir())
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generates HTML documentation for the project.
///
/// Fails up front when the Doxyfile is missing or doxygen is not installed,
/// before any output folder is created. Returns the output folder.
pub async fn generate(
    config: &ProjectConfig,
    project_dir: &Path,
    target: Option<&Target>,
    out_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    let doxyfile = project_dir.join("sasb").join("doxy").join("Doxyfile");
    if !doxyfile.is_file() {
        return Err(SasbError::DoxyfileNotFound { path: doxyfile.display().to_string() }.into());
    }

    let doxygen = which::which("doxygen").map_err(|_| SasbError::DoxygenNotFound)?;
    debug!(doxygen = %doxygen.display(), "found doxygen");

    let out_dir = out_dir.unwrap_or_else(|| config.build_output_folder(project_dir).join("docs"));
    ensure_dir(&out_dir)?;

    let input = input_folders(config, project_dir, target);
    let status = tokio::process::Command::new(doxygen)
        .arg(&doxyfile)
        .current_dir(doxyfile.parent().unwrap_or(project_dir))
        .env("DOXY_INPUT", &input)
        .env("DOXY_HTML_OUTPUT", &out_dir)
        .status()
        .await
        .map_err(SasbError::Io)?;

    if !status.success() {
        return Err(SasbError::DoxygenFailed { code: status.code().unwrap_or(-1) }.into());
    }

    info!(out_dir = %out_dir.display(), "documentation generated");
    println!("Documentation generated at: {}", out_dir.display());
    Ok(out_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn input_folders_keeps_only_existing_dirs_in_order() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("sasb/macros")).unwrap();
        fs::create_dir_all(tmp.path().join("sasbcore")).unwrap();

        let config: ProjectConfig = serde_json::from_str(
            r#"{"macroFolders": ["sasb/macros", "sasb/missing"]}"#,
        )
        .unwrap();

        let input = input_folders(&config, tmp.path(), None);
        let macros = tmp.path().join("sasb/macros").display().to_string();
        let core = tmp.path().join("sasbcore").display().to_string();
        assert_eq!(input, format!("{macros} {core}"));
    }

    #[tokio::test]
    async fn missing_doxyfile_fails_before_creating_output() {
        let tmp = TempDir::new().unwrap();
        let config = ProjectConfig::default();

        let err = generate(&config, tmp.path(), None, None).await.unwrap_err();
        assert!(err.to_string().starts_with("No Doxyfile found at"));
        assert!(!tmp.path().join("sasbbuild").exists());
    }
}
