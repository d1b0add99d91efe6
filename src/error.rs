//! # Error Handling
//!
//! This module defines the centralized error type for `modspace`. It uses the
//! `thiserror` library to describe every failure mode of a workspace run with
//! enough context (module, directory, command line) to be logged on its own.
//!
//! ## Taxonomy
//!
//! Errors fall into two classes:
//!
//! - **Configuration errors** (`ConfigNotFound`, `ConfigRead`, `ConfigParse`,
//!   `Yaml`, `Json`, `Glob`): the manifest or the module selection could not be loaded. These
//!   are fatal and are raised before any module is touched.
//! - **Operation errors** (`CommandSpawn`, `CommandFailed`, `MissingModuleDir`,
//!   `MissingOrganization`, `Io`): a single operation on a single module
//!   failed. The processor records them and moves on, unless fail-fast mode
//!   escalates them into `Aborted`.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for modspace operations
#[derive(Error, Debug)]
pub enum Error {
    /// The workspace manifest does not exist.
    #[error("Workspace manifest not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// The workspace manifest exists but could not be read.
    #[error("Failed to read workspace manifest {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workspace manifest was read but its content is invalid.
    #[error("Manifest parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// An external command could not be started at all.
    #[error("Failed to run `{command}` in {}: {message}", dir.display())]
    CommandSpawn {
        command: String,
        dir: PathBuf,
        message: String,
    },

    /// An external command ran and exited unsuccessfully.
    #[error("Command `{command}` failed in {} ({}){}", dir.display(), describe_exit(code), stderr_suffix(stderr))]
    CommandFailed {
        command: String,
        dir: PathBuf,
        code: Option<i32>,
        stderr: String,
    },

    /// A module directory required by an operation is absent.
    #[error("Directory of module {module} does not exist: {}", dir.display())]
    MissingModuleDir { module: String, dir: PathBuf },

    /// No organization could be resolved to build a remote URL.
    #[error("No organization configured for module {module}")]
    MissingOrganization { module: String },

    /// A recoverable error escalated because fail-on-error mode is enabled.
    #[error("Aborting on first failure ({context}): {source}")]
    Aborted {
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Invalid module pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

impl Error {
    /// Whether this error comes from loading the manifest or options rather
    /// than from an operation on a module.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound { .. }
                | Error::ConfigRead { .. }
                | Error::ConfigParse { .. }
                | Error::Yaml(_)
                | Error::Json(_)
                | Error::Glob(_)
        )
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {}", trimmed)
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
