//! Compute context management.
//!
//! Thin wrappers over the adapter's context operations with the CLI
//! behaviors layered on: export writes sanitized JSON files, edit refuses
//! to touch the platform's built-in contexts, and list degrades gracefully
//! when individual contexts cannot be fetched.

use crate::adapter::{ComputeContext, SasAdapter};
use crate::core::SasbError;
use crate::utils::fs::{safe_write, sanitize_file_name};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Prints all compute contexts visible to the current user.
pub async fn list<A: SasAdapter>(adapter: &A) -> Result<()> {
    let contexts = adapter.list_contexts().await?;
    if contexts.is_empty() {
        println!("No compute contexts found.");
        return Ok(());
    }
    println!("{}", "Compute contexts:".bold());
    for context in contexts {
        println!("  {} ({})", context.name, context.id.dimmed());
    }
    Ok(())
}

/// Exports a context to `<out_dir>/<sanitized-name>.json`.
///
/// The summary listing does not carry attributes, so the context is
/// re-fetched by id for the full descriptor. Hypermedia links are dropped
/// from the export; they describe server state, not configuration.
pub async fn export<A: SasAdapter>(adapter: &A, name: &str, out_dir: &Path) -> Result<PathBuf> {
    let summary = adapter.get_context_by_name(name).await?;
    let mut context = match summary.id.clone() {
        Some(id) => adapter.get_context_by_id(&id).await?,
        None => summary,
    };
    context.links = None;

    let file_name = format!("{}.json", sanitize_file_name(&context.name));
    let path = out_dir.join(file_name);
    safe_write(&path, &serde_json::to_string_pretty(&context)?)?;
    println!("Context successfully exported to: {}", path.display());
    Ok(path)
}

/// Creates a context from a JSON descriptor file.
pub async fn create<A: SasAdapter>(adapter: &A, source: &Path) -> Result<ComputeContext> {
    let context = read_context_file(source)?;
    let created = adapter.create_context(&context).await?;
    println!("Context '{}' successfully created.", created.name.green());
    Ok(created)
}

/// Updates the context called `name` from a JSON descriptor file.
///
/// Built-in platform contexts are refused up front; editing one breaks the
/// deployment for every user on the server.
pub async fn edit<A: SasAdapter>(
    adapter: &A,
    name: &str,
    source: &Path,
) -> Result<ComputeContext> {
    let defaults = adapter.default_compute_contexts();
    if defaults.iter().any(|d| d == name) {
        return Err(SasbError::DefaultContextEdit { contexts: defaults }.into());
    }
    let context = read_context_file(source)?;
    let edited = adapter.edit_context(name, &context).await?;
    println!("Context '{}' successfully updated.", edited.name.green());
    Ok(edited)
}

/// Deletes the context called `name`.
pub async fn delete<A: SasAdapter>(adapter: &A, name: &str) -> Result<()> {
    let defaults = adapter.default_compute_contexts();
    if defaults.iter().any(|d| d == name) {
        return Err(SasbError::DefaultContextEdit { contexts: defaults }.into());
    }
    adapter.delete_context(name).await?;
    println!("Context '{}' has been deleted.", name);
    Ok(())
}

fn read_context_file(source: &Path) -> Result<ComputeContext> {
    let raw = std::fs::read_to_string(source)
        .with_context(|| format!("Failed to read context file: {}", source.display()))?;
    let context: ComputeContext = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid context JSON: {}", source.display()))?;
    if context.links.is_some() {
        warn!("context file carries hypermedia links; the server will ignore them");
    }
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ContextSummary;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MockAdapter {
        contexts: Vec<ComputeContext>,
        deleted: Mutex<Vec<String>>,
    }

    impl MockAdapter {
        fn with_context(context: ComputeContext) -> Self {
            Self { contexts: vec![context], ..Default::default() }
        }
    }

    fn sample_context() -> ComputeContext {
        serde_json::from_str(
            r#"{
                "id": "ctx-1",
                "name": "My Context: dev/test",
                "description": "dev context",
                "attributes": {"reuseServerProcesses": true},
                "links": [{"method": "GET", "rel": "self", "href": "/compute/contexts/ctx-1"}]
            }"#,
        )
        .unwrap()
    }

    impl SasAdapter for MockAdapter {
        async fn submit_job(
            &self,
            _job_path: &str,
            _context_name: &str,
            _wait: bool,
        ) -> Result<crate::adapter::Job, SasbError> {
            unimplemented!("not used in context tests")
        }

        async fn fetch_log_content(&self, _log_url: &str) -> Result<String, SasbError> {
            unimplemented!("not used in context tests")
        }

        async fn list_contexts(&self) -> Result<Vec<ContextSummary>, SasbError> {
            Ok(self
                .contexts
                .iter()
                .map(|c| ContextSummary {
                    id: c.id.clone().unwrap_or_default(),
                    name: c.name.clone(),
                })
                .collect())
        }

        async fn get_context_by_name(&self, name: &str) -> Result<ComputeContext, SasbError> {
            self.contexts
                .iter()
                .find(|c| c.name == name)
                .cloned()
                .ok_or(SasbError::ServerError { status: 404, url: name.to_string() })
        }

        async fn get_context_by_id(&self, id: &str) -> Result<ComputeContext, SasbError> {
            self.contexts
                .iter()
                .find(|c| c.id.as_deref() == Some(id))
                .cloned()
                .ok_or(SasbError::ServerError { status: 404, url: id.to_string() })
        }

        async fn create_context(
            &self,
            context: &ComputeContext,
        ) -> Result<ComputeContext, SasbError> {
            Ok(context.clone())
        }

        async fn edit_context(
            &self,
            _name: &str,
            context: &ComputeContext,
        ) -> Result<ComputeContext, SasbError> {
            Ok(context.clone())
        }

        async fn delete_context(&self, name: &str) -> Result<(), SasbError> {
            self.deleted.lock().unwrap().push(name.to_string());
            Ok(())
        }

        fn default_compute_contexts(&self) -> Vec<String> {
            vec!["SAS Job Execution compute context".to_string()]
        }
    }

    #[tokio::test]
    async fn export_sanitizes_file_name_and_strips_links() {
        let tmp = TempDir::new().unwrap();
        let adapter = MockAdapter::with_context(sample_context());

        let path = export(&adapter, "My Context: dev/test", tmp.path()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "My_Context__dev_test.json");

        let exported: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(exported.get("links").is_none());
        assert_eq!(exported["attributes"]["reuseServerProcesses"], true);
    }

    #[tokio::test]
    async fn export_of_unknown_context_fails() {
        let tmp = TempDir::new().unwrap();
        let adapter = MockAdapter::default();
        assert!(export(&adapter, "nope", tmp.path()).await.is_err());
    }

    #[tokio::test]
    async fn edit_refuses_default_contexts() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("ctx.json");
        fs::write(&source, r#"{"name": "SAS Job Execution compute context"}"#).unwrap();

        let adapter = MockAdapter::default();
        let err = edit(&adapter, "SAS Job Execution compute context", &source)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not allowed"));
    }

    #[tokio::test]
    async fn delete_refuses_default_contexts() {
        let adapter = MockAdapter::default();
        let err = delete(&adapter, "SAS Job Execution compute context").await.unwrap_err();
        assert!(err.to_string().contains("not allowed"));
        assert!(adapter.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_passes_through_for_user_contexts() {
        let adapter = MockAdapter::with_context(sample_context());
        delete(&adapter, "My Context: dev/test").await.unwrap();
        assert_eq!(*adapter.deleted.lock().unwrap(), vec!["My Context: dev/test".to_string()]);
    }

    #[tokio::test]
    async fn create_reads_descriptor_from_file() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("ctx.json");
        fs::write(&source, r#"{"name": "new context", "description": "d"}"#).unwrap();

        let adapter = MockAdapter::default();
        let created = create(&adapter, &source).await.unwrap();
        assert_eq!(created.name, "new context");
    }
}
