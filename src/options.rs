//! Run options: which operations to perform and with which defaults.

use std::path::PathBuf;

use crate::defaults::DEFAULT_GIT_URL;

/// Library-side configuration of a workspace run.
///
/// The CLI builds one of these from its flags; tests build them directly.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Default organization for remote URLs.
    pub organization: Option<String>,
    /// Default git host base URL.
    pub url: String,
    /// Clone missing modules.
    pub clone: bool,
    /// Branch to clone when a module does not pin one.
    pub clone_branch: Option<String>,
    /// Clone with a limited depth.
    pub shallow_clone: bool,
    /// Pull existing modules.
    pub pull: bool,
    /// Install dependencies.
    pub install: bool,
    /// Establish local links.
    pub link: bool,
    /// Remove local links.
    pub unlink: bool,
    /// Alternate link registry location.
    pub link_folder: Option<PathBuf>,
    /// Branch to switch every module to.
    pub branch: Option<String>,
    /// Switch modules to the branch pinned in the manifest.
    pub switch: bool,
    /// Module name patterns to restrict the run to. Empty means all.
    pub modules: Vec<String>,
    /// Stop at the first failure.
    pub fail_on_error: bool,
    /// Do not touch the filesystem beyond reading it.
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            organization: None,
            url: DEFAULT_GIT_URL.to_string(),
            clone: false,
            clone_branch: None,
            shallow_clone: false,
            pull: false,
            install: false,
            link: false,
            unlink: false,
            link_folder: None,
            branch: None,
            switch: false,
            modules: Vec::new(),
            fail_on_error: false,
            dry_run: false,
        }
    }
}

impl RunOptions {
    /// The branch the run is for, used against `branches` allow-lists.
    pub fn current_branch(&self) -> Option<&str> {
        self.branch.as_deref().or(self.clone_branch.as_deref())
    }

    /// Whether modules should be switched to a branch.
    pub fn switch_requested(&self) -> bool {
        self.switch || self.branch.is_some()
    }

    /// Whether the link/unlink pass runs.
    pub fn binds(&self) -> bool {
        self.link || self.unlink
    }
}
