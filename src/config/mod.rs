//! Project configuration (`sasbconfig.json`).
//!
//! A sasb project is any directory holding a `sasbconfig.json` file. The
//! configuration defines where macros and programs live, how compiled
//! artifacts are written, and one or more deployment targets (a SAS9 or
//! Viya server plus its app location).
//!
//! The project directory is discovered by walking upward from the starting
//! directory until a config file is found - commands can therefore run from
//! any sub-directory of a project. Nothing here reads ambient process state
//! beyond that starting directory; everything downstream (notably the
//! dependency resolver) receives explicit folder lists.
//!
//! # Example
//!
//! ```json
//! {
//!   "macroFolders": ["sasb/macros"],
//!   "programFolders": ["sasb/programs"],
//!   "buildConfig": { "buildOutputFolder": "sasbbuild" },
//!   "targets": [
//!     {
//!       "name": "viya",
//!       "serverUrl": "https://viya.example.com",
//!       "serverType": "SASVIYA",
//!       "appLoc": "/Public/app",
//!       "contextName": "SAS Job Execution compute context",
//!       "macroFolders": ["sasb/targets/viya/macros"]
//!     }
//!   ]
//! }
//! ```

use crate::constants::{CONFIG_FILE_NAME, CORE_LIB_FOLDER, DEFAULT_BUILD_OUTPUT_FOLDER};
use crate::core::SasbError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server flavor a target deploys to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServerType {
    /// SAS 9 with the Stored Process server.
    #[serde(rename = "SAS9")]
    Sas9,
    /// SAS Viya with the Job Execution service.
    #[serde(rename = "SASVIYA")]
    SasViya,
}

/// Compiled-artifact output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    /// Folder for compiled output, absolute or relative to the project dir.
    pub build_output_folder: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self { build_output_folder: DEFAULT_BUILD_OUTPUT_FOLDER.to_string() }
    }
}

/// Streaming web-app settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamConfig {
    /// Whether a web front-end is deployed for this target.
    pub stream_web: bool,
    /// Folder under the services area that receives the web content.
    pub stream_web_folder: Option<String>,
    /// Source folder of the web app, relative to the project dir.
    pub web_source_path: Option<String>,
    /// Additional asset folders to publish, relative to the web source path.
    pub asset_paths: Vec<String>,
    /// Name of the generated entry-point service.
    pub stream_service_name: Option<String>,
}

impl StreamConfig {
    /// Overlays `other` on top of `self`, field by field. Target-level
    /// settings win over project-level ones.
    #[must_use]
    pub fn merged_with(&self, other: &Self) -> Self {
        Self {
            stream_web: self.stream_web || other.stream_web,
            stream_web_folder: other.stream_web_folder.clone().or_else(|| self.stream_web_folder.clone()),
            web_source_path: other.web_source_path.clone().or_else(|| self.web_source_path.clone()),
            asset_paths: if other.asset_paths.is_empty() {
                self.asset_paths.clone()
            } else {
                other.asset_paths.clone()
            },
            stream_service_name: other
                .stream_service_name
                .clone()
                .or_else(|| self.stream_service_name.clone()),
        }
    }
}

/// One deployment target: a server plus its application location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub name: String,
    pub server_url: String,
    pub server_type: ServerType,
    /// Root folder of the app on the server (SAS Drive / metadata path).
    pub app_loc: String,
    /// Compute context jobs run in. Falls back to the platform default.
    #[serde(default)]
    pub context_name: Option<String>,
    /// Target-specific macro folders, highest priority during resolution.
    #[serde(default)]
    pub macro_folders: Vec<String>,
    /// Folder-name tokens that win ties when the same macro exists in
    /// several folders (e.g. `["sas9macros"]`).
    #[serde(default)]
    pub preferred_macro_folders: Vec<String>,
    #[serde(default)]
    pub stream_config: Option<StreamConfig>,
}

/// The parsed `sasbconfig.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    pub macro_folders: Vec<String>,
    pub program_folders: Vec<String>,
    pub build_config: Option<BuildConfig>,
    pub stream_config: Option<StreamConfig>,
    pub targets: Vec<Target>,
}

impl ProjectConfig {
    /// Loads and parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Looks up a target by name. With `None`, the first configured target
    /// is used.
    pub fn find_target(&self, name: Option<&str>) -> Result<&Target> {
        match name {
            Some(name) => self.targets.iter().find(|t| t.name == name).ok_or_else(|| {
                anyhow::Error::from(SasbError::TargetNotFound { name: name.to_string() })
            }),
            None => self.targets.first().ok_or_else(|| {
                anyhow::Error::from(SasbError::TargetNotFound { name: "default".to_string() })
            }),
        }
    }

    /// Resolved build output folder for this project.
    pub fn build_output_folder(&self, project_dir: &Path) -> PathBuf {
        let folder = self
            .build_config
            .as_ref()
            .map_or(DEFAULT_BUILD_OUTPUT_FOLDER, |b| b.build_output_folder.as_str());
        absolute_under(project_dir, folder)
    }

    /// Assembles the ordered dependency search roots for a compile run:
    /// target macro folders first, then project macro folders, then program
    /// folders, with the bundled core library always last.
    pub fn search_roots(&self, project_dir: &Path, target: Option<&Target>) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(target) = target {
            for folder in &target.macro_folders {
                roots.push(absolute_under(project_dir, folder));
            }
        }
        for folder in &self.macro_folders {
            roots.push(absolute_under(project_dir, folder));
        }
        for folder in &self.program_folders {
            roots.push(absolute_under(project_dir, folder));
        }
        roots.push(project_dir.join(CORE_LIB_FOLDER));
        roots
    }
}

fn absolute_under(base: &Path, folder: &str) -> PathBuf {
    let path = Path::new(folder);
    if path.is_absolute() { path.to_path_buf() } else { base.join(path) }
}

/// Walks upward from `start_dir` looking for [`CONFIG_FILE_NAME`].
///
/// Returns the directory containing the config file (the project dir).
pub fn find_project_dir(start_dir: &Path) -> Result<PathBuf> {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        if dir.join(CONFIG_FILE_NAME).is_file() {
            return Ok(dir.to_path_buf());
        }
        current = dir.parent();
    }
    Err(anyhow::Error::from(SasbError::ProjectNotFound {
        start_dir: start_dir.display().to_string(),
    }))
}

/// Convenience: discover the project dir from `start_dir` and load its config.
pub fn load_project(start_dir: &Path) -> Result<(PathBuf, ProjectConfig)> {
    let project_dir = find_project_dir(start_dir)?;
    let config = ProjectConfig::load(&project_dir.join(CONFIG_FILE_NAME))?;
    Ok((project_dir, config))
}
