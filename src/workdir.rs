//! Working-directory resolution for workspace modules.
//!
//! Nothing in modspace changes the process working directory. Instead every
//! module resolves to an explicit directory up front and every command carries
//! the directory it must run in. This keeps directory context from leaking
//! between modules, including when an operation fails halfway.
//!
//! A module lives in `root/output`, where `root` is the invocation directory or
//! the module's `path` resolved against it (an absolute `path` is used as is).

use std::path::{Path, PathBuf};

use crate::manifest::ModuleSpec;

/// Directory holding the sub-packages of a mono-repo module.
pub const PACKAGES_DIR: &str = "packages";

/// Directory holding the API of an application module.
pub const API_DIR: &str = "api";

/// Resolved locations of a single module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePaths {
    /// Directory the module is cloned into (created if missing).
    pub root: PathBuf,
    /// The module checkout itself.
    pub dir: PathBuf,
}

impl ModulePaths {
    /// Resolve the locations of `module` relative to `cwd`.
    pub fn resolve(cwd: &Path, module: &ModuleSpec) -> Self {
        let root = match &module.path {
            Some(path) => resolve_from(cwd, Path::new(path)),
            None => cwd.to_path_buf(),
        };
        let dir = root.join(module.output_name());
        Self { root, dir }
    }

    /// Directory of a sub-package of this module.
    pub fn package_dir(&self, package: &str) -> PathBuf {
        self.dir.join(PACKAGES_DIR).join(package)
    }

    /// Directory of the nested API of an application module.
    pub fn api_dir(&self) -> PathBuf {
        self.dir.join(API_DIR)
    }
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_from(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
