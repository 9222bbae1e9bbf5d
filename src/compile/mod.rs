//! Compilation of SAS services and jobs.
//!
//! Compiling a file means inlining everything it needs to run standalone on
//! the server: the transitive closure of its macro dependencies, each
//! exactly once and each before its first referencer, followed by the
//! original program text. The heavy lifting happens in three layers, leaf
//! first:
//!
//! - [`scanner`] - finds macro references in source text
//! - [`resolver`] - picks one physical file per reference, honoring
//!   override folders
//! - [`collector`] - drives scan/resolve/read to a fixed point
//!
//! This module is the thin orchestrator on top: read, collect, concatenate,
//! persist. A failed collection aborts the compile before anything is
//! written - there is deliberately no partial output.

pub mod collector;
pub mod resolver;
pub mod scanner;

use crate::config::{ProjectConfig, Target};
use crate::utils::fs::safe_write;
use anyhow::{Context, Result};
use collector::DependencyCollector;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Compiles one source file to `destination`.
///
/// Dependencies are resolved against `roots` (in priority order, bundled
/// core library last) and concatenated ahead of the original content.
pub async fn compile_file(
    source_path: &Path,
    roots: &[PathBuf],
    preferred_folders: &[String],
    destination: &Path,
) -> Result<()> {
    let source = tokio::fs::read_to_string(source_path)
        .await
        .with_context(|| format!("Failed to read source file: {}", source_path.display()))?;

    let collector = DependencyCollector::new(roots.to_vec(), preferred_folders.to_vec());
    let dependencies = collector.collect(&source).await?;
    debug!(
        count = dependencies.len(),
        source = %source_path.display(),
        "resolved dependencies"
    );

    let mut compiled = String::new();
    for dependency in &dependencies {
        let content = tokio::fs::read_to_string(dependency)
            .await
            .with_context(|| format!("Failed to read dependency: {}", dependency.display()))?;
        compiled.push_str(&content);
        if !content.ends_with('\n') {
            compiled.push('\n');
        }
    }
    compiled.push_str(&source);

    safe_write(destination, &compiled)?;
    info!(destination = %destination.display(), "compiled");
    Ok(())
}

/// Compiles a single service or job file into the build output folder.
///
/// The source may be absolute or relative to the project directory. The
/// destination is `<buildOutputFolder>/services/<parent-folder>/<file>`
/// unless an explicit output path is given. Returns the destination path.
pub async fn compile_single_file(
    config: &ProjectConfig,
    project_dir: &Path,
    target: Option<&Target>,
    source: &Path,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let source_path =
        if source.is_absolute() { source.to_path_buf() } else { project_dir.join(source) };

    let destination = match output {
        Some(path) => path,
        None => {
            let parent = source_path
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_os_string())
                .unwrap_or_default();
            let file_name = source_path
                .file_name()
                .with_context(|| format!("Invalid source path: {}", source_path.display()))?;
            config.build_output_folder(project_dir).join("services").join(parent).join(file_name)
        }
    };

    let roots = config.search_roots(project_dir, target);
    let preferred = target.map(|t| t.preferred_macro_folders.clone()).unwrap_or_default();

    compile_file(&source_path, &roots, &preferred, &destination).await?;
    Ok(destination)
}
