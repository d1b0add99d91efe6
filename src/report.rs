//! Run outcome and the continue-or-abort policy.
//!
//! Every operation on a module returns a plain `Result`. The processor hands
//! each result to [`Report::settle`], which is the only place deciding what a
//! failure means: in the default mode it is logged and recorded and the run
//! goes on; with fail-on-error it becomes an [`Error::Aborted`] that the
//! processor propagates with `?`.

use std::fmt;

use log::error;

use crate::error::{Error, Result};

/// The step of module processing a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Clone or pull.
    Acquire,
    /// Branch switch and dependency install.
    Configure,
    /// Dependency install in an application's `api` directory.
    ApiInstall,
    /// Global link of a module or package.
    Publish,
    /// Link of a dependency.
    Link,
    /// Unlink of a dependency.
    Unlink,
    /// Removal of a global link.
    Unpublish,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Acquire => "acquire",
            Stage::Configure => "configure",
            Stage::ApiInstall => "api install",
            Stage::Publish => "publish",
            Stage::Link => "link",
            Stage::Unlink => "unlink",
            Stage::Unpublish => "unpublish",
        };
        f.write_str(name)
    }
}

/// A recorded failure with the place it happened.
#[derive(Debug)]
pub struct Failure {
    pub module: String,
    pub package: Option<String>,
    pub stage: Stage,
    pub error: Error,
}

impl Failure {
    fn location(&self) -> String {
        location(&self.module, self.package.as_deref(), self.stage)
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self.error)
    }
}

fn location(module: &str, package: Option<&str>, stage: Stage) -> String {
    match package {
        Some(package) => format!("{} of module {} (package {})", stage, module, package),
        None => format!("{} of module {}", stage, module),
    }
}

/// What happened during a run.
#[derive(Debug, Default)]
pub struct Report {
    fail_fast: bool,
    processed: Vec<String>,
    failures: Vec<Failure>,
}

impl Report {
    pub fn new(fail_fast: bool) -> Self {
        Self {
            fail_fast,
            ..Default::default()
        }
    }

    /// Apply the failure policy to the result of one operation.
    pub fn settle(
        &mut self,
        module: &str,
        package: Option<&str>,
        stage: Stage,
        result: Result<()>,
    ) -> Result<()> {
        let Err(error) = result else {
            return Ok(());
        };
        if self.fail_fast {
            return Err(Error::Aborted {
                context: location(module, package, stage),
                source: Box::new(error),
            });
        }
        let failure = Failure {
            module: module.to_string(),
            package: package.map(str::to_string),
            stage,
            error,
        };
        error!("{}", failure);
        self.failures.push(failure);
        Ok(())
    }

    /// Note that a module took part in the run.
    pub fn mark_processed(&mut self, module: &str) {
        if !self.processed.iter().any(|m| m == module) {
            self.processed.push(module.to_string());
        }
    }

    /// Modules that took part, in processing order.
    pub fn processed(&self) -> &[String] {
        &self.processed
    }

    /// Failures recorded along the way, in order.
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
