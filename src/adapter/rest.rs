//! Reqwest-backed implementation of [`SasAdapter`] for Viya REST APIs.
//!
//! This is transport plumbing, nothing more: it maps the trait operations
//! onto the compute and job-execution endpoints and deserializes their
//! result shapes. Authentication is a bearer token taken from the
//! `SASB_ACCESS_TOKEN` environment variable.

use super::{ComputeContext, ContextSummary, Job, SasAdapter};
use crate::constants::ENV_ACCESS_TOKEN;
use crate::core::SasbError;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

/// Job states considered terminal by the job-execution service.
const TERMINAL_STATES: &[&str] = &["completed", "failed", "canceled", "error"];

/// Built-in Viya compute contexts that ship with the platform.
const DEFAULT_CONTEXTS: &[&str] = &[
    "CAS Formats service compute context",
    "Data Mining compute context",
    "Import 9 service compute context",
    "SAS Job Execution compute context",
    "SAS Model Manager compute context",
    "SAS Studio compute context",
    "SAS Visual Forecasting compute context",
];

/// How long to sleep between job-state polls while waiting.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Deserialize)]
struct ItemsPage<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Stored credentials, read from `~/.sasbrc`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RcFile {
    access_token: Option<String>,
}

/// The access token persisted by a previous `auth` flow, if any.
fn stored_access_token() -> Option<String> {
    let path = dirs::home_dir()?.join(".sasbrc");
    let raw = std::fs::read_to_string(path).ok()?;
    serde_json::from_str::<RcFile>(&raw).ok()?.access_token
}

/// A thin HTTP client for one server.
pub struct RestAdapter {
    client: Client,
    server_url: String,
    access_token: Option<String>,
}

impl RestAdapter {
    /// Creates an adapter for `server_url`. The access token comes from the
    /// `SASB_ACCESS_TOKEN` environment variable, falling back to `~/.sasbrc`.
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            server_url: server_url.into().trim_end_matches('/').to_string(),
            access_token: std::env::var(ENV_ACCESS_TOKEN).ok().or_else(stored_access_token),
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SasbError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(SasbError::ServerError {
                status: response.status().as_u16(),
                url: response.url().to_string(),
            })
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, SasbError> {
        let response = Self::check(self.request(Method::GET, url).send().await?).await?;
        Ok(response.json().await?)
    }

    async fn refresh_job(&self, job: &Job) -> Result<Job, SasbError> {
        let link = job
            .link("self", "GET")
            .ok_or_else(|| SasbError::ServerError { status: 0, url: "<missing self link>".into() })?;
        self.get_json(&self.url(&link.href)).await
    }
}

impl SasAdapter for RestAdapter {
    async fn submit_job(
        &self,
        job_path: &str,
        context_name: &str,
        wait: bool,
    ) -> Result<Job, SasbError> {
        let body = json!({
            "name": job_path.rsplit('/').next().unwrap_or(job_path),
            "jobDefinition": { "type": "Compute", "parameters": { "_program": job_path } },
            "arguments": { "contextName": context_name }
        });
        let response = Self::check(
            self.request(Method::POST, &self.url("/jobExecution/jobs")).json(&body).send().await?,
        )
        .await?;
        let mut job: Job = response.json().await?;
        debug!(state = %job.state, "job submitted");

        if wait {
            while !TERMINAL_STATES.contains(&job.state.as_str()) {
                tokio::time::sleep(POLL_INTERVAL).await;
                job = self.refresh_job(&job).await?;
            }
            if job.state != "completed" {
                return Err(SasbError::JobFailed { state: job.state });
            }
        }
        Ok(job)
    }

    async fn fetch_log_content(&self, log_url: &str) -> Result<String, SasbError> {
        let response = Self::check(self.request(Method::GET, log_url).send().await?).await?;
        Ok(response.text().await?)
    }

    async fn list_contexts(&self) -> Result<Vec<ContextSummary>, SasbError> {
        let page: ItemsPage<ContextSummary> =
            self.get_json(&self.url("/compute/contexts?limit=100")).await?;
        Ok(page.items)
    }

    async fn get_context_by_name(&self, name: &str) -> Result<ComputeContext, SasbError> {
        let url = self.url(&format!("/compute/contexts?filter=eq(name,'{name}')"));
        let page: ItemsPage<ComputeContext> = self.get_json(&url).await?;
        page.items.into_iter().next().ok_or(SasbError::ServerError { status: 404, url })
    }

    async fn get_context_by_id(&self, id: &str) -> Result<ComputeContext, SasbError> {
        self.get_json(&self.url(&format!("/compute/contexts/{id}"))).await
    }

    async fn create_context(&self, context: &ComputeContext) -> Result<ComputeContext, SasbError> {
        if self.get_context_by_name(&context.name).await.is_ok() {
            return Err(SasbError::ContextAlreadyExists { name: context.name.clone() });
        }
        let response = Self::check(
            self.request(Method::POST, &self.url("/compute/contexts")).json(context).send().await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    async fn edit_context(
        &self,
        name: &str,
        context: &ComputeContext,
    ) -> Result<ComputeContext, SasbError> {
        let existing = self.get_context_by_name(name).await?;
        let id = existing
            .id
            .ok_or_else(|| SasbError::ServerError { status: 0, url: "<context without id>".into() })?;
        let response = Self::check(
            self.request(Method::PUT, &self.url(&format!("/compute/contexts/{id}")))
                .json(context)
                .send()
                .await?,
        )
        .await?;
        Ok(response.json().await?)
    }

    async fn delete_context(&self, name: &str) -> Result<(), SasbError> {
        let existing = self.get_context_by_name(name).await?;
        let id = existing
            .id
            .ok_or_else(|| SasbError::ServerError { status: 0, url: "<context without id>".into() })?;
        Self::check(
            self.request(Method::DELETE, &self.url(&format!("/compute/contexts/{id}")))
                .send()
                .await?,
        )
        .await?;
        Ok(())
    }

    fn default_compute_contexts(&self) -> Vec<String> {
        DEFAULT_CONTEXTS.iter().map(ToString::to_string).collect()
    }
}
