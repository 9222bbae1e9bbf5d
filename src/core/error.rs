//! Error handling for sasb.
//!
//! Two pieces cooperate here:
//! - [`SasbError`] - the strongly-typed error enum for every failure mode the
//!   toolchain can report on its own behalf
//! - [`ErrorContext`] / [`user_friendly_error`] - a display wrapper that turns
//!   any error bubbling out of a command into a colored message with an
//!   actionable suggestion for the CLI user
//!
//! Most functions return `anyhow::Result` and attach context with
//! `.with_context(..)`; typed variants exist where callers (or tests) need to
//! match on the failure, most importantly
//! [`SasbError::UnresolvedDependencies`], whose `Display` output is a stable
//! part of the compile contract.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for sasb operations.
#[derive(Error, Debug)]
pub enum SasbError {
    /// One or more macro dependencies had zero candidates across all search
    /// roots after full transitive expansion. Aggregates every missing name
    /// discovered during the run, in first-discovery order.
    ///
    /// The message format is load-bearing: callers and tests match on it.
    #[error("Unable to locate dependencies: {}", .names.join(", "))]
    UnresolvedDependencies {
        /// Missing dependency names, e.g. `mf_abort.sas`.
        names: Vec<String>,
    },

    /// No `sasbconfig.json` was found in the start directory or any parent.
    #[error(
        "Not a sasb project directory or sub-directory: no sasbconfig.json found in '{start_dir}' or any parent folder"
    )]
    ProjectNotFound {
        /// Directory the upward search started from.
        start_dir: String,
    },

    /// The requested target name is not present in the project configuration.
    #[error("Target '{name}' was not found in the configuration")]
    TargetNotFound { name: String },

    /// The `streamConfig` section is missing or incomplete for a web build.
    #[error("Invalid stream config: please specify `{field}` in the streamConfig of your target")]
    InvalidStreamConfig {
        /// Name of the missing field, e.g. `webSourcePath`.
        field: String,
    },

    /// A server-side job finished in a non-successful state.
    ///
    /// This is the single error shape for the whole job-execution flow; the
    /// full job payload (links, timestamps) stays available on the adapter
    /// result where the submission succeeded but the run did not.
    #[error("Job finished with state '{state}'")]
    JobFailed { state: String },

    /// A compute context with the given name already exists on the server.
    #[error("Compute context '{name}' already exists")]
    ContextAlreadyExists { name: String },

    /// Attempted to edit one of the server's built-in compute contexts.
    #[error(
        "Editing default SAS compute contexts is not allowed.\nDefault contexts:{}",
        .contexts.iter().enumerate().map(|(i, c)| format!("\n{}. {}", i + 1, c)).collect::<String>()
    )]
    DefaultContextEdit { contexts: Vec<String> },

    /// The Doxygen executable could not be located on the PATH.
    #[error("Doxygen executable not found. Install doxygen and make sure it is on your PATH")]
    DoxygenNotFound,

    /// Doxygen was invoked but exited unsuccessfully.
    #[error("Doxygen exited with status {code}")]
    DoxygenFailed { code: i32 },

    /// No Doxyfile configuration present in the project.
    #[error("No Doxyfile found at '{path}'")]
    DoxyfileNotFound { path: String },

    /// Wrapper around raw I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure for configs, job payloads or contexts.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport failure talking to the SAS server.
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an unexpected status code.
    #[error("Server responded with {status} for {url}")]
    ServerError { status: u16, url: String },
}

/// A wrapper that pairs an error with a user-facing suggestion.
///
/// Produced by [`user_friendly_error`] just before the CLI exits; commands
/// themselves propagate plain `anyhow::Error`.
pub struct ErrorContext {
    /// The underlying error.
    pub error: anyhow::Error,
    /// A short, actionable hint shown below the error message.
    pub suggestion: Option<String>,
}

impl ErrorContext {
    /// Wrap an error without a suggestion.
    pub fn new(error: anyhow::Error) -> Self {
        Self { error, suggestion: None }
    }

    /// Attach a suggestion line.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Print the error (and suggestion, if any) to stderr with colors.
    pub fn display(&self) {
        eprintln!("{} {}", "error:".red().bold(), self.error);
        for cause in self.error.chain().skip(1) {
            eprintln!("  {} {}", "caused by:".yellow(), cause);
        }
        if let Some(suggestion) = &self.suggestion {
            eprintln!("\n{} {}", "hint:".cyan().bold(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nhint: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with a suggestion appropriate
/// for the failure, where one is known.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = match error.downcast_ref::<SasbError>() {
        Some(SasbError::UnresolvedDependencies { .. }) => Some(
            "Check that every referenced macro exists in one of the folders listed under \
             `macroFolders` in your sasbconfig.json"
                .to_string(),
        ),
        Some(SasbError::ProjectNotFound { .. }) => {
            Some("Run `sasb init` to scaffold a new project here".to_string())
        }
        Some(SasbError::TargetNotFound { .. }) => Some(
            "List the targets defined in sasbconfig.json and pass one with --target".to_string(),
        ),
        Some(SasbError::InvalidStreamConfig { .. }) => Some(
            "A minimal streamConfig needs webSourcePath, streamWebFolder and streamServiceName"
                .to_string(),
        ),
        Some(SasbError::DoxygenNotFound) => {
            Some("See https://www.doxygen.nl/download.html".to_string())
        }
        _ => None,
    };

    ErrorContext { error, suggestion }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolved_dependencies_message_is_comma_joined() {
        let err = SasbError::UnresolvedDependencies {
            names: vec!["foobar.sas".to_string(), "foobar2.sas".to_string()],
        };
        assert_eq!(err.to_string(), "Unable to locate dependencies: foobar.sas, foobar2.sas");
    }

    #[test]
    fn default_context_edit_enumerates_contexts() {
        let err = SasbError::DefaultContextEdit {
            contexts: vec!["CAS Formats service".to_string(), "Data Mining".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("\n1. CAS Formats service"));
        assert!(msg.contains("\n2. Data Mining"));
    }

    #[test]
    fn user_friendly_error_attaches_suggestion_for_missing_deps() {
        let err = anyhow::Error::from(SasbError::UnresolvedDependencies {
            names: vec!["mf_abort.sas".to_string()],
        });
        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.is_some());
    }
}
