//! Default values for modspace runs.
//!
//! This module provides centralized default values used by the CLI and the
//! library, ensuring consistency and avoiding duplication.

use std::path::Path;

/// Base URL of the git host used when neither the module nor the CLI names one.
///
/// This can be overridden by the `--url` CLI flag or the `MODSPACE_URL`
/// environment variable, and per module with the `url` manifest key.
pub const DEFAULT_GIT_URL: &str = "https://github.com";

/// Delay observed after every external command, in milliseconds.
///
/// Package managers and git may keep file handles open for a short while
/// after exiting on some platforms; the next step waits for them.
pub const SETTLE_DELAY_MS: u64 = 2000;

/// Manifest formats understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// Picks the format from the file extension.
    ///
    /// `.json` selects JSON; anything else is read as YAML, which also
    /// accepts plain JSON documents.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ManifestFormat::Json,
            _ => ManifestFormat::Yaml,
        }
    }
}
