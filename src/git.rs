//! Git command construction.
//!
//! Everything here builds [`CommandSpec`]s for the system `git` binary, which
//! brings along whatever authentication the user has configured:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Personal access tokens
//! - Any authentication configured in ~/.gitconfig

use std::path::Path;

use crate::command::CommandSpec;

const GIT: &str = "git";

/// Remote URL of a module repository: `<base>/<organization>/<name>.git`.
pub fn remote_url(base: &str, organization: &str, name: &str) -> String {
    format!(
        "{}/{}/{}.git",
        base.trim_end_matches('/'),
        organization.trim_matches('/'),
        name
    )
}

/// Clone `remote` into `root/output`, optionally on `branch` and shallow.
pub fn clone(root: &Path, remote: &str, branch: Option<&str>, shallow: bool, output: &str) -> CommandSpec {
    let mut command = CommandSpec::new(GIT, root).arg("clone");
    if shallow {
        command = command.args(["--depth", "1", "--shallow-submodules"]);
    }
    if let Some(branch) = branch {
        command = command.args(["-b", branch]);
    }
    command.args([remote, output])
}

/// Point `origin` at `remote`, so that a rotated URL or token is picked up.
pub fn set_remote_url(dir: &Path, remote: &str) -> CommandSpec {
    CommandSpec::new(GIT, dir).args(["remote", "set-url", "origin", remote])
}

/// Pull the current branch, rebasing local commits.
pub fn pull(dir: &Path) -> CommandSpec {
    CommandSpec::new(GIT, dir).args(["pull", "--rebase"])
}

/// Fetch `branch` from `origin`.
pub fn fetch(dir: &Path, branch: &str) -> CommandSpec {
    CommandSpec::new(GIT, dir).args(["fetch", "origin", branch])
}

/// Check out `branch`.
pub fn checkout(dir: &Path, branch: &str) -> CommandSpec {
    CommandSpec::new(GIT, dir).args(["checkout", branch])
}

/// Reject branch names git would misread.
///
/// This is deliberately looser than `git check-ref-format`: it only refuses
/// values that would be taken as an option or split by a shell.
pub fn check_ref_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        Err("branch name is empty")
    } else if name.starts_with('-') {
        Err("branch name starts with '-'")
    } else if name.contains(char::is_whitespace) {
        Err("branch name contains whitespace")
    } else {
        Ok(())
    }
}

/// Suggest a fix when a git failure looks like an authentication problem.
pub fn auth_hint(stderr: &str) -> Option<&'static str> {
    if stderr.contains("Authentication failed")
        || stderr.contains("Permission denied")
        || stderr.contains("Could not read from remote repository")
    {
        Some(
            "Make sure you have access to the repository. For private repos, ensure you have \
             an SSH key added to ssh-agent, git credentials configured, or a personal access \
             token set up.",
        )
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_remote_url() {
        assert_eq!(
            remote_url("https://github.com", "kalisio", "kdk"),
            "https://github.com/kalisio/kdk.git"
        );
        assert_eq!(
            remote_url("https://gitlab.com/", "group/sub", "kano"),
            "https://gitlab.com/group/sub/kano.git"
        );
    }

    #[test]
    fn test_clone_with_branch() {
        let command = clone(
            Path::new("/work"),
            "https://github.com/kalisio/kdk.git",
            Some("master"),
            false,
            "kdk",
        );
        assert_eq!(
            command.to_string(),
            "git clone -b master https://github.com/kalisio/kdk.git kdk"
        );
        assert_eq!(command.dir(), Path::new("/work"));
    }

    #[test]
    fn test_clone_shallow_without_branch() {
        let command = clone(Path::new("/work"), "https://h/o/m.git", None, true, "renamed");
        assert_eq!(
            command.arguments(),
            &["clone", "--depth", "1", "--shallow-submodules", "https://h/o/m.git", "renamed"]
        );
    }

    #[test]
    fn test_pull_commands() {
        let dir = PathBuf::from("/work/kdk");
        assert_eq!(
            set_remote_url(&dir, "https://github.com/kalisio/kdk.git").to_string(),
            "git remote set-url origin https://github.com/kalisio/kdk.git"
        );
        assert_eq!(pull(&dir).to_string(), "git pull --rebase");
    }

    #[test]
    fn test_branch_commands() {
        let dir = PathBuf::from("/work/kdk");
        assert_eq!(fetch(&dir, "develop").to_string(), "git fetch origin develop");
        assert_eq!(checkout(&dir, "develop").to_string(), "git checkout develop");
    }

    #[test]
    fn test_check_ref_name() {
        assert!(check_ref_name("master").is_ok());
        assert!(check_ref_name("feature/new-map").is_ok());
        assert!(check_ref_name("").is_err());
        assert!(check_ref_name("--force").is_err());
        assert!(check_ref_name("two words").is_err());
    }

    #[test]
    fn test_auth_hint() {
        assert!(auth_hint("fatal: Authentication failed for 'https://...'").is_some());
        assert!(auth_hint("git@github.com: Permission denied (publickey).").is_some());
        assert!(auth_hint("fatal: destination path 'kdk' already exists").is_none());
    }
}
