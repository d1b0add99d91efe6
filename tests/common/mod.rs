//! Shared test utilities for integration and E2E tests.
//!
//! This module provides workspace fixtures, a recording command runner, and
//! manifest snippets to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest(manifests::LIBRARIES);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use modspace::command::{CommandRunner, CommandSpec};
use modspace::error::{Error, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::manifests;
    #[allow(unused_imports)]
    pub use super::RecordingRunner;
    pub use super::TestFixture;
}

/// Manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// Two libraries, the second depending on the first.
    pub const LIBRARIES: &str = r#"
feathers-s3:
  dependencies: []
kdk:
  dependencies: ['@kalisio/feathers-s3']
"#;

    /// A library, a mono-repo from another organization, and an application.
    pub const FULL: &str = r#"
feathers-s3:
  branch: master
weacast:
  organization: weacast
  packages:
    core:
      dependencies: []
    leaflet:
      dependencies: ['@weacast/core']
kdk:
  dependencies: ['@weacast/core', '@kalisio/feathers-s3']
kapp:
  application: true
  dependencies: ['@kalisio/kdk', '@kalisio/feathers-s3']
"#;

    /// A module stored outside the workspace root under another name.
    pub const RELOCATED: &str = r#"
weacast-core:
  organization: weacast
  path: ../other-org
  output: renamed
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "kdk: [unclosed";
}

/// A temporary workspace root with an optional manifest.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `workspace.yaml` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.with_file("workspace.yaml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Create directories, as a previous clone would have.
    pub fn with_dirs(self, dirs: &[&str]) -> Self {
        for dir in dirs {
            self.temp_dir
                .child(dir)
                .create_dir_all()
                .expect("Failed to create directory");
        }
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.temp_dir.path().join("workspace.yaml")
    }

    /// Create a command running the binary in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("modspace");
        cmd.current_dir(self.path())
            .env_remove("MODSPACE_ORGANIZATION")
            .env_remove("MODSPACE_URL")
            .env_remove("RUST_LOG")
            .env("MODSPACE_SETTLE_DELAY_MS", "0")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A command runner that records commands instead of spawning processes.
///
/// `git clone` creates the target directory so that later steps find it, and
/// commands whose text contains one of the `failing` patterns fail.
#[derive(Default)]
pub struct RecordingRunner {
    commands: RefCell<Vec<CommandSpec>>,
    failing: Vec<String>,
}

#[allow(dead_code)]
impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every command whose text contains `pattern`.
    pub fn failing_on(mut self, pattern: &str) -> Self {
        self.failing.push(pattern.to_string());
        self
    }

    /// Recorded commands as `<command> @ <dir relative to root>`.
    pub fn lines(&self, root: &Path) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .map(|command| {
                let dir = command.dir().strip_prefix(root).unwrap_or(command.dir());
                let dir = if dir.as_os_str().is_empty() {
                    ".".to_string()
                } else {
                    dir.display().to_string()
                };
                format!("{} @ {}", command, dir)
            })
            .collect()
    }

    pub fn commands(&self) -> Vec<CommandSpec> {
        self.commands.borrow().clone()
    }

    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &CommandSpec) -> Result<()> {
        self.commands.borrow_mut().push(command.clone());
        let text = command.to_string();
        if self.failing.iter().any(|pattern| text.contains(pattern.as_str())) {
            return Err(Error::CommandFailed {
                command: text,
                dir: command.dir().to_path_buf(),
                code: Some(1),
                stderr: "simulated failure".to_string(),
            });
        }
        let args = command.arguments();
        if command.program() == "git" && args.first().map(String::as_str) == Some("clone") {
            if let Some(target) = args.last() {
                fs::create_dir_all(command.dir().join(target))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::LIBRARIES);
        assert!(fixture.manifest_path().exists());
    }

    #[test]
    fn test_manifests_are_valid_yaml() {
        for manifest in [manifests::LIBRARIES, manifests::FULL, manifests::RELOCATED] {
            serde_yaml::from_str::<serde_yaml::Value>(manifest).expect("Manifest should be valid YAML");
        }
    }
}
