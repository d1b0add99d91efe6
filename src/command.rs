//! Typed external commands and the runners that execute them.
//!
//! Commands are built as an explicit program plus argument vector plus working
//! directory. They are never passed through a shell, so organization, branch
//! and URL values coming from the manifest cannot be split or interpreted.
//!
//! Execution goes through the [`CommandRunner`] trait:
//!
//! - [`SystemRunner`] spawns the program, forwards its output, and waits a
//!   settle delay afterwards.
//! - [`DryRunRunner`] only prints what would run.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;

use log::debug;

use crate::error::{Error, Result};

/// A program invocation with its arguments and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    dir: PathBuf,
}

impl CommandSpec {
    /// Start building an invocation of `program` in `dir`.
    pub fn new(program: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: dir.into(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Executes commands on behalf of the processor.
pub trait CommandRunner {
    /// Run `command` to completion.
    ///
    /// Returns `CommandSpawn` if the program could not be started and
    /// `CommandFailed` if it exited unsuccessfully.
    fn run(&self, command: &CommandSpec) -> Result<()>;
}

/// Runs commands as child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    settle_delay: Duration,
}

impl SystemRunner {
    pub fn new(settle_delay: Duration) -> Self {
        Self { settle_delay }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> Result<()> {
        debug!("Running command {} in {}", command, command.dir().display());

        let output = Command::new(command.program())
            .args(command.arguments())
            .current_dir(command.dir())
            .output()
            .map_err(|e| Error::CommandSpawn {
                command: command.to_string(),
                dir: command.dir().to_path_buf(),
                message: e.to_string(),
            })?;

        // Forwarding is best effort; a closed stdout must not fail the step.
        let _ = std::io::stdout().write_all(&output.stdout);
        let _ = std::io::stderr().write_all(&output.stderr);

        if !self.settle_delay.is_zero() {
            thread::sleep(self.settle_delay);
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                command: command.to_string(),
                dir: command.dir().to_path_buf(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

/// Prints commands instead of running them.
#[derive(Debug, Clone, Default)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, command: &CommandSpec) -> Result<()> {
        println!("[{}] {}", command.dir().display(), command);
        Ok(())
    }
}
