//! Package manager command construction (yarn).
//!
//! Local overrides use `yarn link`: running it bare in a package directory
//! registers that package globally, and `yarn link <name>` in a consumer
//! replaces its installed copy of `<name>` with the registered one. `unlink`
//! undoes either form. An alternate registry location can be given with
//! `--link-folder`, which is then passed to every link and unlink.

use std::path::{Path, PathBuf};

use crate::command::CommandSpec;

const YARN: &str = "yarn";

/// Builds yarn invocations for a run.
#[derive(Debug, Clone, Default)]
pub struct Yarn {
    link_folder: Option<PathBuf>,
}

impl Yarn {
    pub fn new(link_folder: Option<PathBuf>) -> Self {
        Self { link_folder }
    }

    /// Install dependencies, skipping optional ones.
    ///
    /// `check_files` also verifies that installed files were not removed,
    /// which module roots need after a branch switch.
    pub fn install(&self, dir: &Path, check_files: bool) -> CommandSpec {
        let command = CommandSpec::new(YARN, dir).args(["install", "--ignore-optional"]);
        if check_files {
            command.arg("--check-files")
        } else {
            command
        }
    }

    /// Register the package in `dir` as a global link.
    pub fn link(&self, dir: &Path) -> CommandSpec {
        self.with_link_folder(CommandSpec::new(YARN, dir).arg("link"))
    }

    /// Remove the global link of the package in `dir`.
    pub fn unlink(&self, dir: &Path) -> CommandSpec {
        self.with_link_folder(CommandSpec::new(YARN, dir).arg("unlink"))
    }

    /// Use the globally linked `dependency` in the package in `dir`.
    pub fn link_dependency(&self, dir: &Path, dependency: &str) -> CommandSpec {
        self.with_link_folder(CommandSpec::new(YARN, dir).args(["link", dependency]))
    }

    /// Stop using the globally linked `dependency` in the package in `dir`.
    pub fn unlink_dependency(&self, dir: &Path, dependency: &str) -> CommandSpec {
        self.with_link_folder(CommandSpec::new(YARN, dir).args(["unlink", dependency]))
    }

    fn with_link_folder(&self, command: CommandSpec) -> CommandSpec {
        match &self.link_folder {
            Some(folder) => command
                .arg("--link-folder")
                .arg(folder.to_string_lossy().into_owned()),
            None => command,
        }
    }
}
