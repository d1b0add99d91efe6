//! CLI argument parsing and run dispatch

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::LevelFilter;

use modspace::command::{CommandRunner, DryRunRunner, SystemRunner};
use modspace::defaults::{DEFAULT_GIT_URL, SETTLE_DELAY_MS};
use modspace::logging;
use modspace::manifest::Manifest;
use modspace::options::RunOptions;
use modspace::output::{Marker, OutputConfig};
use modspace::processor::Processor;
use modspace::workdir;

/// modspace - Clone, install and cross-link a workspace of git modules
#[derive(Parser, Debug)]
#[command(name = "modspace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Workspace manifest (YAML or JSON), relative to the current directory
    #[arg(value_name = "WORKSPACE")]
    workspace: PathBuf,

    /// Organization (or group) owning the repositories
    ///
    /// There is no default: cloning or pulling a module that names no
    /// organization in the workspace fails for that module.
    #[arg(short, long, value_name = "ORG", env = "MODSPACE_ORGANIZATION")]
    organization: Option<String>,

    /// Git server base URL
    #[arg(short, long, value_name = "URL", env = "MODSPACE_URL", default_value = DEFAULT_GIT_URL)]
    url: String,

    /// Clone missing modules, optionally on a default branch (--clone=<BRANCH>)
    #[arg(short, long, value_name = "BRANCH", require_equals = true, conflicts_with = "pull")]
    clone: Option<Option<String>>,

    /// Clone with a depth of one, submodules included
    #[arg(long)]
    shallow_clone: bool,

    /// Pull all modules, rebasing local commits
    #[arg(short, long)]
    pull: bool,

    /// Install dependencies of all modules
    #[arg(short, long)]
    install: bool,

    /// Link modules to each other
    #[arg(short, long, conflicts_with = "unlink")]
    link: bool,

    /// Remove links between modules
    #[arg(long)]
    unlink: bool,

    /// Folder holding the link registry, relative to the current directory
    #[arg(long, value_name = "DIR")]
    link_folder: Option<PathBuf>,

    /// Switch all modules to this branch, unless they pin one
    #[arg(short, long, value_name = "BRANCH")]
    branch: Option<String>,

    /// Switch modules to the branch pinned in the workspace
    #[arg(short, long)]
    switch: bool,

    /// Comma-separated modules (or glob patterns) to restrict the run to
    #[arg(short, long, value_name = "LIST", value_delimiter = ',')]
    modules: Vec<String>,

    /// Stop with a non-zero exit code on the first failure
    #[arg(long)]
    fail_on_error: bool,

    /// Trace every command that is run
    #[arg(short, long)]
    debug: bool,

    /// Print the commands without running them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Delay after each command, in milliseconds
    #[arg(long, value_name = "MS", env = "MODSPACE_SETTLE_DELAY_MS", default_value_t = SETTLE_DELAY_MS)]
    settle_delay_ms: u64,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Execute the run described by the arguments
    pub fn execute(self) -> Result<()> {
        let level = if self.debug {
            LevelFilter::Debug
        } else {
            logging::parse_level(&self.log_level)
                .ok_or_else(|| anyhow!("Invalid log level: {}", self.log_level))?
        };
        logging::init(level);
        let out = OutputConfig::from_env_and_flag(&self.color);

        let cwd = env::current_dir().context("Failed to get current directory")?;
        let manifest_path = workdir::resolve_from(&cwd, &self.workspace);
        println!(
            "{} Preparing workspace {}",
            out.marker(Marker::Workspace),
            manifest_path.display()
        );
        if self.dry_run {
            println!("{} Dry run, commands are printed, not run", out.marker(Marker::DryRun));
        }

        let manifest = Manifest::from_file(&manifest_path)?;
        let options = self.run_options();
        let runner: Box<dyn CommandRunner> = if self.dry_run {
            Box::new(DryRunRunner)
        } else {
            Box::new(SystemRunner::new(Duration::from_millis(self.settle_delay_ms)))
        };

        let report = Processor::new(&manifest, &options, runner.as_ref(), cwd).run()?;

        if report.is_success() {
            println!(
                "{} Workspace ready ({} modules)",
                out.marker(Marker::Success),
                report.processed().len()
            );
        } else {
            println!(
                "{} Workspace processed with {} failure(s):",
                out.marker(Marker::Warning),
                report.failures().len()
            );
            for failure in report.failures() {
                println!("   {} {}", out.marker(Marker::Failure), failure);
            }
        }
        Ok(())
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            organization: self.organization.clone(),
            url: self.url.clone(),
            clone: self.clone.is_some(),
            clone_branch: self.clone.clone().flatten(),
            shallow_clone: self.shallow_clone,
            pull: self.pull,
            install: self.install,
            link: self.link,
            unlink: self.unlink,
            link_folder: self.link_folder.clone(),
            branch: self.branch.clone(),
            switch: self.switch,
            modules: self.modules.clone(),
            fail_on_error: self.fail_on_error,
            dry_run: self.dry_run,
        }
    }
}
