//! Streaming web app builds.
//!
//! Turns the project's web source folder into server-hosted content under
//! `<buildOutputFolder>/services/<streamWebFolder>`. The two server types
//! differ fundamentally in what they can host:
//!
//! - **SASVIYA** serves files directly, so assets are copied verbatim and
//!   the entry point becomes `<streamServiceName>.html`.
//! - **SAS9** can only execute stored processes, so every asset is wrapped
//!   in a generated SAS service that replays the content to `_webout`.
//!   Text is escaped into `put` statements; scripts and stylesheets are
//!   base64-encoded first so arbitrary bytes survive the trip.
//!
//! Asset references inside the entry-point HTML are rewritten to the URLs
//! the server will actually answer on.

use crate::config::{ProjectConfig, ServerType, StreamConfig, Target};
use crate::constants::{MAX_PUT_LINE_LENGTH, SASB_OUT_MACRO};
use crate::core::SasbError;
use crate::utils::fs::{ensure_dir, safe_write, sanitize_file_name};
use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Payload kinds a generated streaming service can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadKind {
    Js64,
    Css64,
    Html,
}

impl PayloadKind {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" => Some(Self::Js64),
            "css" => Some(Self::Css64),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    fn macro_argument(self) -> &'static str {
        match self {
            Self::Js64 => "JS64",
            Self::Css64 => "CSS64",
            Self::Html => "HTML",
        }
    }
}

/// Builds the streaming web app for `target` into the build output folder.
///
/// Returns the destination folder. The folder is recreated from scratch on
/// every build so stale assets from a previous run cannot leak into the
/// deployment.
pub fn build_web_app(
    config: &ProjectConfig,
    project_dir: &Path,
    target: &Target,
) -> Result<PathBuf> {
    let stream = merged_stream_config(config, target);
    let web_source_path = stream
        .web_source_path
        .as_deref()
        .ok_or(SasbError::InvalidStreamConfig { field: "webSourcePath".to_string() })?;
    let stream_web_folder = stream
        .stream_web_folder
        .as_deref()
        .ok_or(SasbError::InvalidStreamConfig { field: "streamWebFolder".to_string() })?;
    let service_name = stream.stream_service_name.as_deref().unwrap_or("clickme");

    let source_dir = project_dir.join(web_source_path);
    let index_path = source_dir.join("index.html");
    let index_html = std::fs::read_to_string(&index_path)
        .with_context(|| format!("Failed to read web entry point: {}", index_path.display()))?;

    let destination =
        config.build_output_folder(project_dir).join("services").join(stream_web_folder);
    if destination.exists() {
        std::fs::remove_dir_all(&destination)
            .with_context(|| format!("Failed to clear {}", destination.display()))?;
    }
    ensure_dir(&destination)?;

    let assets = collect_assets(&source_dir, &stream.asset_paths)?;
    debug!(count = assets.len(), "web assets discovered");

    match target.server_type {
        ServerType::SasViya => {
            build_viya(&destination, &assets, &index_html, service_name, target, stream_web_folder)?
        }
        ServerType::Sas9 => {
            build_sas9(&destination, &assets, &index_html, service_name, target, stream_web_folder)?
        }
    }

    println!("Web app built at: {}", destination.display());
    Ok(destination)
}

/// Project-level stream config overlaid with the target's, target wins.
fn merged_stream_config(config: &ProjectConfig, target: &Target) -> StreamConfig {
    match (&config.stream_config, &target.stream_config) {
        (Some(base), Some(over)) => base.merged_with(over),
        (Some(base), None) => base.clone(),
        (None, Some(over)) => over.clone(),
        (None, None) => StreamConfig::default(),
    }
}

/// One publishable asset: its source file and its path relative to the web
/// source folder.
struct Asset {
    source: PathBuf,
    relative: PathBuf,
}

/// Gathers every file under the web source folder and any extra asset
/// folders. The entry point is excluded; it is handled separately.
fn collect_assets(source_dir: &Path, asset_paths: &[String]) -> Result<Vec<Asset>> {
    let mut roots = vec![source_dir.to_path_buf()];
    roots.extend(asset_paths.iter().map(|p| source_dir.join(p)));
    roots.dedup();

    let mut assets = Vec::new();
    for root in &roots {
        if !root.is_dir() {
            warn!(path = %root.display(), "asset folder does not exist, skipping");
            continue;
        }
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(source_dir)
                .unwrap_or_else(|_| Path::new(entry.file_name()))
                .to_path_buf();
            if relative == Path::new("index.html") {
                continue;
            }
            if assets.iter().any(|a: &Asset| a.relative == relative) {
                continue;
            }
            assets.push(Asset { source: entry.path().to_path_buf(), relative });
        }
    }
    Ok(assets)
}

fn build_viya(
    destination: &Path,
    assets: &[Asset],
    index_html: &str,
    service_name: &str,
    target: &Target,
    stream_web_folder: &str,
) -> Result<()> {
    let mut html = index_html.to_string();
    for asset in assets {
        let relative = asset.relative.to_string_lossy().replace('\\', "/");
        let dest_file = destination.join(&asset.relative);
        if let Some(parent) = dest_file.parent() {
            ensure_dir(parent)?;
        }
        std::fs::copy(&asset.source, &dest_file)
            .with_context(|| format!("Failed to copy asset: {}", asset.source.display()))?;
        let url =
            asset_service_url(ServerType::SasViya, &target.app_loc, stream_web_folder, &relative);
        html = html.replace(&relative, &url);
    }
    safe_write(&destination.join(format!("{service_name}.html")), &html)?;
    Ok(())
}

fn build_sas9(
    destination: &Path,
    assets: &[Asset],
    index_html: &str,
    service_name: &str,
    target: &Target,
    stream_web_folder: &str,
) -> Result<()> {
    let mut html = index_html.to_string();
    for asset in assets {
        let relative = asset.relative.to_string_lossy().replace('\\', "/");
        let extension = asset.relative.extension().and_then(|e| e.to_str()).unwrap_or("");
        let Some(kind) = PayloadKind::from_extension(extension) else {
            warn!(asset = %relative, "unsupported asset type for SAS9 streaming, skipping");
            continue;
        };

        let asset_service = sanitize_file_name(&relative);
        let service = match kind {
            PayloadKind::Html => {
                let content = std::fs::read_to_string(&asset.source).with_context(|| {
                    format!("Failed to read asset: {}", asset.source.display())
                })?;
                generate_streaming_service(&content, kind)
            }
            PayloadKind::Js64 | PayloadKind::Css64 => {
                let bytes = std::fs::read(&asset.source).with_context(|| {
                    format!("Failed to read asset: {}", asset.source.display())
                })?;
                generate_streaming_service(&BASE64.encode(bytes), kind)
            }
        };
        safe_write(&destination.join(format!("{asset_service}.sas")), &service)?;

        let url =
            asset_service_url(ServerType::Sas9, &target.app_loc, stream_web_folder, &asset_service);
        html = html.replace(&relative, &url);
    }

    let entry = generate_streaming_service(&html, PayloadKind::Html);
    safe_write(&destination.join(format!("{service_name}.sas")), &entry)?;
    Ok(())
}

/// The URL an asset will be served on once deployed.
fn asset_service_url(
    server_type: ServerType,
    app_loc: &str,
    stream_web_folder: &str,
    asset: &str,
) -> String {
    match server_type {
        ServerType::SasViya => {
            format!("/SASJobExecution?_FILE={app_loc}/services/{stream_web_folder}/{asset}")
        }
        ServerType::Sas9 => {
            format!(
                "/SASStoredProcess/?_PROGRAM={app_loc}/services/{stream_web_folder}/{asset}"
            )
        }
    }
}

/// Wraps `content` in a SAS service that streams it back to the browser.
///
/// The payload goes through a temporary fileref one `put` statement at a
/// time. SAS caps source lines well below typical asset sizes, so content
/// is cut into chunks of at most [`MAX_PUT_LINE_LENGTH`] characters joined
/// with the `@;` column-hold so no line breaks are injected mid-chunk.
/// Single quotes are doubled to survive the SAS string literal.
fn generate_streaming_service(content: &str, kind: PayloadKind) -> String {
    let mut service = String::new();
    service.push_str(SASB_OUT_MACRO);
    service.push_str("\nfilename sasb temp lrecl=99999999;\ndata _null_;\nfile sasb;\n");

    match kind {
        // Base64 payloads are a single logical line.
        PayloadKind::Js64 | PayloadKind::Css64 => {
            for chunk in chunk_literal(content) {
                service.push_str("put '");
                service.push_str(&chunk);
                service.push_str("'@;\n");
            }
        }
        // Text payloads keep their line structure.
        PayloadKind::Html => {
            for line in content.lines() {
                let escaped = line.replace('\'', "''");
                let chunks = chunk_literal(&escaped);
                let last = chunks.len().saturating_sub(1);
                for (i, chunk) in chunks.iter().enumerate() {
                    service.push_str("put '");
                    service.push_str(chunk);
                    service.push_str(if i == last { "';\n" } else { "'@;\n" });
                }
                if chunks.is_empty() {
                    service.push_str("put ;\n");
                }
            }
        }
    }

    service.push_str("run;\n%sasbout(");
    service.push_str(kind.macro_argument());
    service.push_str(")\n");
    service
}

/// Splits a string into chunks of at most [`MAX_PUT_LINE_LENGTH`]
/// characters, never cutting a doubled quote pair in half.
///
/// Escaped content only ever carries quotes in doubled pairs, so a chunk
/// holding an odd number of quotes has necessarily split a pair - an
/// unterminated SAS literal. The boundary backs up until the chunk's quote
/// count is even again, which also handles runs of consecutive pairs
/// straddling the limit.
fn chunk_literal(content: &str) -> Vec<String> {
    let chars: Vec<char> = content.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let mut end = (start + MAX_PUT_LINE_LENGTH).min(chars.len());
        let mut quotes = chars[start..end].iter().filter(|c| **c == '\'').count();
        while end > start + 1 && quotes % 2 == 1 {
            end -= 1;
            if chars[end] == '\'' {
                quotes -= 1;
            }
        }
        chunks.push(chars[start..end].iter().collect());
        start = end;
    }
    chunks
}
