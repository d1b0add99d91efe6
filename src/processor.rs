//! # Module Processor
//!
//! Runs the requested operations over every selected module of a manifest, in
//! manifest order, as up to three passes:
//!
//! 1.  **Prepare**: clone or pull, switch branch, install dependencies, and
//!     register the global link of each library module (or of each of its
//!     packages).
//! 2.  **Bind** (link or unlink requested): link or unlink every declared
//!     dependency of every module, per package for mono-repos and again in
//!     the `api` directory of applications.
//! 3.  **Finalize** (unlink requested): remove the global links created in
//!     the first pass.
//!
//! All global links exist before any module binds to them, and they are only
//! removed once every consumer has unbound, so a module may depend on a
//! sibling declared after it.
//!
//! Every command runs in an explicit directory; the process working directory
//! is never changed. Failures are routed through [`Report::settle`].

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, info, warn};

use crate::command::CommandRunner;
use crate::error::{Error, Result};
use crate::git;
use crate::links::{LinkAction, LinkResolver};
use crate::manifest::{Manifest, ModuleSpec};
use crate::options::RunOptions;
use crate::package::Yarn;
use crate::report::{Report, Stage};
use crate::workdir::{self, ModulePaths};

/// Drives a workspace run.
pub struct Processor<'a> {
    manifest: &'a Manifest,
    options: &'a RunOptions,
    runner: &'a dyn CommandRunner,
    cwd: PathBuf,
    yarn: Yarn,
}

impl<'a> Processor<'a> {
    /// Create a processor resolving module paths against `cwd`.
    ///
    /// A relative link folder is resolved against `cwd` as well, so that every
    /// module shares one registry.
    pub fn new(
        manifest: &'a Manifest,
        options: &'a RunOptions,
        runner: &'a dyn CommandRunner,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        let cwd = cwd.into();
        let link_folder = options
            .link_folder
            .as_deref()
            .map(|folder| workdir::resolve_from(&cwd, folder));
        Self {
            manifest,
            options,
            runner,
            cwd,
            yarn: Yarn::new(link_folder),
        }
    }

    /// Execute all requested passes.
    ///
    /// Returns the report of recorded failures, or the first failure when
    /// the options ask to fail on error. Invalid options or module patterns
    /// are returned before anything runs.
    pub fn run(&self) -> Result<Report> {
        self.check_options()?;
        let selected = self.select()?;
        let mut report = Report::new(self.options.fail_on_error);

        for module in &selected {
            self.prepare(module, &mut report)?;
        }
        if self.options.binds() {
            for module in &selected {
                self.bind(module, &mut report)?;
            }
        }
        if self.options.unlink {
            for module in &selected {
                self.finalize(module, &mut report)?;
            }
        }
        Ok(report)
    }

    /// Modules taking part in the run, in manifest order.
    pub fn select(&self) -> Result<Vec<&'a ModuleSpec>> {
        let patterns = self
            .options
            .modules
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut matched = vec![false; patterns.len()];
        let branch = self.options.current_branch();
        let mut selected = Vec::new();

        for module in self.manifest.modules() {
            let mut wanted = patterns.is_empty();
            for (pattern, hit) in patterns.iter().zip(matched.iter_mut()) {
                if pattern.matches(&module.name) {
                    *hit = true;
                    wanted = true;
                }
            }
            if !wanted {
                debug!("Skipping module {}: not selected", module.name);
                continue;
            }
            if !module.participates_in(branch) {
                info!(
                    "Skipping module {}: not part of branch {}",
                    module.name,
                    branch.unwrap_or_default()
                );
                continue;
            }
            selected.push(module);
        }

        for (pattern, hit) in patterns.iter().zip(&matched) {
            if !hit {
                warn!("No module of the workspace matches '{}'", pattern);
            }
        }
        Ok(selected)
    }

    fn check_options(&self) -> Result<()> {
        let branches = [&self.options.branch, &self.options.clone_branch];
        for branch in branches.into_iter().flatten() {
            git::check_ref_name(branch).map_err(|reason| Error::ConfigParse {
                message: format!("Invalid branch '{}': {}", branch, reason),
                hint: None,
            })?;
        }
        Ok(())
    }

    fn prepare(&self, module: &ModuleSpec, report: &mut Report) -> Result<()> {
        info!("Preparing module {}", module.name);
        report.mark_processed(&module.name);
        let paths = ModulePaths::resolve(&self.cwd, module);

        let result = self.acquire(module, &paths);
        report.settle(&module.name, None, Stage::Acquire, result)?;

        let result = self.configure(module, &paths);
        report.settle(&module.name, None, Stage::Configure, result)?;

        if self.options.link && !module.application {
            match self.require_dir(module, &paths.dir) {
                Ok(()) => LinkResolver::new(self.runner, &self.yarn).publish(
                    LinkAction::Link,
                    report,
                    &module.name,
                    &paths,
                    module.packages.as_deref(),
                )?,
                Err(error) => report.settle(&module.name, None, Stage::Publish, Err(error))?,
            }
        }

        if self.options.install && module.application {
            let result = self.install_api(module, &paths);
            report.settle(&module.name, None, Stage::ApiInstall, result)?;
        }
        Ok(())
    }

    fn acquire(&self, module: &ModuleSpec, paths: &ModulePaths) -> Result<()> {
        if self.options.clone {
            if paths.dir.exists() {
                info!(
                    "Module {} already present in {}, skipping clone",
                    module.name,
                    paths.dir.display()
                );
                return Ok(());
            }
            if !self.options.dry_run {
                fs::create_dir_all(&paths.root)?;
            }
            let remote = self.remote_url(module)?;
            let branch = module
                .branch
                .as_deref()
                .or(self.options.clone_branch.as_deref());
            let shallow = module.shallow_clone.unwrap_or(self.options.shallow_clone);
            match branch {
                Some(branch) => info!("Cloning branch {} of module {}", branch, module.name),
                None => info!("Cloning module {}", module.name),
            }
            let command = git::clone(&paths.root, &remote, branch, shallow, module.output_name());
            self.runner.run(&command).inspect_err(|error| {
                if let Error::CommandFailed { stderr, .. } = error {
                    if let Some(hint) = git::auth_hint(stderr) {
                        warn!("{}", hint);
                    }
                }
            })
        } else if self.options.pull {
            self.require_dir(module, &paths.dir)?;
            let remote = self.remote_url(module)?;
            info!("Pulling module {}", module.name);
            self.runner.run(&git::set_remote_url(&paths.dir, &remote))?;
            self.runner.run(&git::pull(&paths.dir))
        } else {
            Ok(())
        }
    }

    fn configure(&self, module: &ModuleSpec, paths: &ModulePaths) -> Result<()> {
        let branch = if self.options.switch_requested() {
            module.branch.as_deref().or(self.options.branch.as_deref())
        } else {
            None
        };
        if branch.is_none() && !self.options.install {
            return Ok(());
        }
        self.require_dir(module, &paths.dir)?;

        if let Some(branch) = branch {
            info!("Switching module {} to branch {}", module.name, branch);
            self.runner.run(&git::fetch(&paths.dir, branch))?;
            self.runner.run(&git::checkout(&paths.dir, branch))?;
        }
        if self.options.install {
            info!("Installing dependencies of module {}", module.name);
            self.runner.run(&self.yarn.install(&paths.dir, true))?;
        }
        Ok(())
    }

    fn install_api(&self, module: &ModuleSpec, paths: &ModulePaths) -> Result<()> {
        let api = paths.api_dir();
        self.require_dir(module, &api)?;
        info!("Installing dependencies of the api of module {}", module.name);
        self.runner.run(&self.yarn.install(&api, false))
    }

    fn bind(&self, module: &ModuleSpec, report: &mut Report) -> Result<()> {
        let action = if self.options.link {
            LinkAction::Link
        } else {
            LinkAction::Unlink
        };
        info!("{} module {}", action.verb(), module.name);
        let paths = ModulePaths::resolve(&self.cwd, module);
        if let Err(error) = self.require_dir(module, &paths.dir) {
            return report.settle(&module.name, None, action.dependency_stage(), Err(error));
        }

        let resolver = LinkResolver::new(self.runner, &self.yarn);
        if module.is_mono_repo() {
            for package in module.packages() {
                resolver.dependencies(
                    action,
                    report,
                    &module.name,
                    Some(&package.name),
                    &paths.package_dir(&package.name),
                    &package.dependencies,
                )?;
            }
        } else {
            resolver.dependencies(action, report, &module.name, None, &paths.dir, &module.dependencies)?;
        }
        if module.application {
            resolver.dependencies(
                action,
                report,
                &module.name,
                None,
                &paths.api_dir(),
                &module.dependencies,
            )?;
        }
        Ok(())
    }

    fn finalize(&self, module: &ModuleSpec, report: &mut Report) -> Result<()> {
        info!("Finalizing module {}", module.name);
        if module.application {
            return Ok(());
        }
        let paths = ModulePaths::resolve(&self.cwd, module);
        if let Err(error) = self.require_dir(module, &paths.dir) {
            return report.settle(&module.name, None, Stage::Unpublish, Err(error));
        }
        LinkResolver::new(self.runner, &self.yarn).publish(
            LinkAction::Unlink,
            report,
            &module.name,
            &paths,
            module.packages.as_deref(),
        )
    }

    fn remote_url(&self, module: &ModuleSpec) -> Result<String> {
        let organization = module
            .organization
            .as_deref()
            .or(self.options.organization.as_deref())
            .ok_or_else(|| Error::MissingOrganization {
                module: module.name.clone(),
            })?;
        let base = module.url.as_deref().unwrap_or(&self.options.url);
        Ok(git::remote_url(base, organization, &module.name))
    }

    /// Dry runs cannot know what earlier steps would have created.
    fn require_dir(&self, module: &ModuleSpec, dir: &Path) -> Result<()> {
        if self.options.dry_run || dir.is_dir() {
            Ok(())
        } else {
            Err(Error::MissingModuleDir {
                module: module.name.clone(),
                dir: dir.to_path_buf(),
            })
        }
    }
}
