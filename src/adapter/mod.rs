//! SAS server adapter boundary.
//!
//! The toolchain talks to SAS9/Viya through a narrow trait, [`SasAdapter`],
//! and consumes only the documented result shapes: the job JSON (state plus
//! hypermedia links), the SAS log JSON (`items[].line`), and the compute
//! context descriptor. Commands are generic over the trait; tests exercise
//! them against an in-memory mock, and the binary wires in the
//! [`rest::RestAdapter`].

pub mod rest;

use crate::core::SasbError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A hypermedia link attached to a server resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub method: String,
    pub rel: String,
    pub href: String,
}

/// A submitted job as reported by the job-execution service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    #[serde(default)]
    pub id: Option<String>,
    pub state: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Job {
    /// Finds the first link with the given `rel` and `method`.
    pub fn link(&self, rel: &str, method: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.rel == rel && l.method == method)
    }
}

#[derive(Debug, Deserialize)]
struct SasLog {
    #[serde(default)]
    items: Vec<SasLogLine>,
}

#[derive(Debug, Deserialize)]
struct SasLogLine {
    #[serde(default)]
    line: String,
}

/// Converts raw SAS log JSON into plain text, one log line per row.
pub fn parse_log_lines(raw: &str) -> Result<String, SasbError> {
    let log: SasLog = serde_json::from_str(raw)?;
    let mut text = String::new();
    for item in log.items {
        text.push_str(&item.line);
        text.push('\n');
    }
    Ok(text)
}

/// Short listing entry for a compute context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSummary {
    pub id: String,
    pub name: String,
}

/// Full compute context descriptor.
///
/// Attribute blocks vary between deployments, so everything beyond identity
/// is kept loosely typed. `links` is dropped on export (it is server-local
/// state, not configuration).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launch_context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
}

/// Operations the toolchain needs from a SAS server.
///
/// `submit_job` with `wait = true` resolves only once the job reaches a
/// terminal state and reports a non-successful terminal state as
/// [`SasbError::JobFailed`] - one consistent error shape for the whole
/// execution flow.
#[allow(async_fn_in_trait)]
pub trait SasAdapter {
    /// Submits the job stored at `job_path` on the server.
    async fn submit_job(
        &self,
        job_path: &str,
        context_name: &str,
        wait: bool,
    ) -> Result<Job, SasbError>;

    /// Fetches raw log JSON from a job's log link.
    async fn fetch_log_content(&self, log_url: &str) -> Result<String, SasbError>;

    /// Lists compute contexts visible to the current user.
    async fn list_contexts(&self) -> Result<Vec<ContextSummary>, SasbError>;

    /// Fetches a context by display name.
    async fn get_context_by_name(&self, name: &str) -> Result<ComputeContext, SasbError>;

    /// Fetches a context with all attributes by id.
    async fn get_context_by_id(&self, id: &str) -> Result<ComputeContext, SasbError>;

    /// Creates a new compute context.
    async fn create_context(&self, context: &ComputeContext) -> Result<ComputeContext, SasbError>;

    /// Updates an existing compute context.
    async fn edit_context(
        &self,
        name: &str,
        context: &ComputeContext,
    ) -> Result<ComputeContext, SasbError>;

    /// Deletes a compute context by name.
    async fn delete_context(&self, name: &str) -> Result<(), SasbError>;

    /// Names of the platform's built-in contexts, which must not be edited.
    fn default_compute_contexts(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_log_lines_joins_items() {
        let raw = r#"{"items":[{"line":"1   %put hi;"},{"line":"hi"}]}"#;
        assert_eq!(parse_log_lines(raw).unwrap(), "1   %put hi;\nhi\n");
    }

    #[test]
    fn parse_log_lines_tolerates_missing_items() {
        assert_eq!(parse_log_lines("{}").unwrap(), "");
    }

    #[test]
    fn job_link_lookup_matches_rel_and_method() {
        let job: Job = serde_json::from_str(
            r#"{
                "id": "j1",
                "state": "completed",
                "links": [
                    {"method": "GET", "rel": "self", "href": "/jobs/j1"},
                    {"method": "GET", "rel": "log", "href": "/jobs/j1/log"},
                    {"method": "DELETE", "rel": "self", "href": "/jobs/j1"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(job.link("self", "GET").unwrap().href, "/jobs/j1");
        assert_eq!(job.link("log", "GET").unwrap().href, "/jobs/j1/log");
        assert!(job.link("state", "GET").is_none());
    }

    #[test]
    fn context_export_omits_links_when_cleared() {
        let mut context: ComputeContext = serde_json::from_str(
            r#"{
                "id": "c1",
                "name": "My Context",
                "links": [{"method": "GET", "rel": "self", "href": "/contexts/c1"}]
            }"#,
        )
        .unwrap();
        context.links = None;
        let exported = serde_json::to_string(&context).unwrap();
        assert!(!exported.contains("links"));
    }
}
