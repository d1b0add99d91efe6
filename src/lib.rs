//! # modspace
//!
//! This library clones, installs and cross-links a workspace of related git
//! modules described by a manifest, so that several in-development packages
//! can be used together without being published. It is used by the
//! `modspace` command-line tool.
//!
//! ## Quick Example
//!
//! ```
//! use modspace::command::DryRunRunner;
//! use modspace::manifest::Manifest;
//! use modspace::options::RunOptions;
//! use modspace::processor::Processor;
//!
//! let manifest = Manifest::parse_yaml(r#"
//! feathers-s3:
//!   branch: master
//! kdk:
//!   dependencies: ['@kalisio/feathers-s3']
//! "#).unwrap();
//!
//! let options = RunOptions {
//!     organization: Some("kalisio".to_string()),
//!     link: true,
//!     dry_run: true,
//!     ..Default::default()
//! };
//!
//! let report = Processor::new(&manifest, &options, &DryRunRunner, "/work")
//!     .run()
//!     .unwrap();
//! assert_eq!(report.processed(), &["feathers-s3".to_string(), "kdk".to_string()]);
//! assert!(report.is_success());
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: the ordered set of modules and their settings.
//! - **Processor (`processor`)**: runs clone/pull, branch switch, install and
//!   link operations over the manifest in three passes.
//! - **Link resolver (`links`)**: (un)registers local overrides one by one.
//! - **Commands (`command`, `git`, `package`)**: typed invocations of `git` and
//!   `yarn`, executed through a [`command::CommandRunner`].
//! - **Report (`report`)**: recorded failures and the fail-fast policy.

pub mod command;
pub mod defaults;
pub mod error;
pub mod git;
pub mod links;
pub mod logging;
pub mod manifest;
pub mod options;
pub mod output;
pub mod package;
pub mod processor;
pub mod report;
pub mod workdir;

#[cfg(test)]
mod workdir_proptest;
