//! # Console Output
//!
//! Decides whether the summary lines printed by the CLI use emoji and color.
//!
//! The decision honours, in order:
//! - `--color=always|never` on the command line
//! - `NO_COLOR` (any value, per https://no-color.org/)
//! - `CLICOLOR=0` and `CLICOLOR_FORCE=1`
//! - `TERM=dumb`
//! - whether stdout is a color-capable terminal

use std::env;

use console::style;

/// Color and emoji settings for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Build the configuration from the `--color` flag and the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_ascii_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => terminal_wants_color(),
        };
        Self { use_color }
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }

    pub fn colored() -> Self {
        Self { use_color: true }
    }

    /// Prefix for a line of the given kind.
    pub fn marker(&self, kind: Marker) -> String {
        if !self.use_color {
            return kind.plain().to_string();
        }
        let emoji = kind.emoji();
        match kind {
            Marker::Failure => style(emoji).red().to_string(),
            Marker::Warning => style(emoji).yellow().to_string(),
            _ => emoji.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Kinds of lines printed by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Workspace,
    DryRun,
    Success,
    Warning,
    Failure,
}

impl Marker {
    fn emoji(self) -> &'static str {
        match self {
            Marker::Workspace => "📦",
            Marker::DryRun => "🔎",
            Marker::Success => "✅",
            Marker::Warning => "⚠️",
            Marker::Failure => "❌",
        }
    }

    fn plain(self) -> &'static str {
        match self {
            Marker::Workspace => "[WORKSPACE]",
            Marker::DryRun => "[DRY-RUN]",
            Marker::Success => "[OK]",
            Marker::Warning => "[WARN]",
            Marker::Failure => "[ERR]",
        }
    }
}

fn terminal_wants_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
        return false;
    }
    if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
        return true;
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    console::Term::stdout().features().colors_supported()
}
