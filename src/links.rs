//! Local dependency overrides.
//!
//! The link resolver issues one yarn command per dependency or package and
//! hands each result to the run [`Report`], so a failing link is reported and
//! the next one is still attempted (unless the run fails fast).

use std::path::Path;

use log::info;

use crate::command::{CommandRunner, CommandSpec};
use crate::error::Result;
use crate::manifest::PackageSpec;
use crate::package::Yarn;
use crate::report::{Report, Stage};
use crate::workdir::ModulePaths;

/// Whether overrides are being established or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    Link,
    Unlink,
}

impl LinkAction {
    pub fn dependency_stage(self) -> Stage {
        match self {
            LinkAction::Link => Stage::Link,
            LinkAction::Unlink => Stage::Unlink,
        }
    }

    pub fn publish_stage(self) -> Stage {
        match self {
            LinkAction::Link => Stage::Publish,
            LinkAction::Unlink => Stage::Unpublish,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            LinkAction::Link => "Linking",
            LinkAction::Unlink => "Unlinking",
        }
    }
}

/// Registers and deregisters local overrides.
pub struct LinkResolver<'a> {
    runner: &'a dyn CommandRunner,
    yarn: &'a Yarn,
}

impl<'a> LinkResolver<'a> {
    pub fn new(runner: &'a dyn CommandRunner, yarn: &'a Yarn) -> Self {
        Self { runner, yarn }
    }

    /// (Un)link every dependency in `dir`, one command each, in order.
    pub fn dependencies(
        &self,
        action: LinkAction,
        report: &mut Report,
        module: &str,
        package: Option<&str>,
        dir: &Path,
        dependencies: &[String],
    ) -> Result<()> {
        for dependency in dependencies {
            let command = match action {
                LinkAction::Link => self.yarn.link_dependency(dir, dependency),
                LinkAction::Unlink => self.yarn.unlink_dependency(dir, dependency),
            };
            let result = self.runner.run(&command);
            report.settle(module, package, action.dependency_stage(), result)?;
        }
        Ok(())
    }

    /// (Un)register the global link of a module, or of each of its packages.
    pub fn publish(
        &self,
        action: LinkAction,
        report: &mut Report,
        module: &str,
        paths: &ModulePaths,
        packages: Option<&[PackageSpec]>,
    ) -> Result<()> {
        let Some(packages) = packages else {
            info!("{} global module {}", action.verb(), module);
            let result = self.runner.run(&self.global(action, &paths.dir));
            return report.settle(module, None, action.publish_stage(), result);
        };
        for package in packages {
            info!("{} global package {} of module {}", action.verb(), package.name, module);
            let result = self.runner.run(&self.global(action, &paths.package_dir(&package.name)));
            report.settle(module, Some(&package.name), action.publish_stage(), result)?;
        }
        Ok(())
    }

    fn global(&self, action: LinkAction, dir: &Path) -> CommandSpec {
        match action {
            LinkAction::Link => self.yarn.link(dir),
            LinkAction::Unlink => self.yarn.unlink(dir),
        }
    }
}
