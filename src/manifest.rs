//! # Workspace Manifest
//!
//! This module defines the data structures that describe a workspace, as well
//! as the logic for loading and validating them.
//!
//! A manifest is a mapping from module name to module settings. The order of
//! the entries matters: it is the order in which modules are cloned,
//! configured, linked and finalized, so it is preserved exactly as written.
//!
//! ```yaml
//! feathers-distributed:
//!   branch: master
//! weacast:
//!   organization: weacast
//!   packages:
//!     core:
//!       dependencies: []
//!     leaflet:
//!       dependencies: ['@weacast/core']
//! kdk:
//!   dependencies: ['@weacast/core', '@weacast/leaflet']
//! kano:
//!   application: true
//!   dependencies: ['@kalisio/kdk']
//! ```
//!
//! ## Parsing
//!
//! [`Manifest::from_file`] reads YAML or JSON depending on the file extension.
//! Both go through the same serde model; the top-level mapping and the
//! `packages` mappings are read by an order-preserving visitor that also
//! rejects duplicate names. After deserialization the manifest is validated
//! (see [`Manifest::validate`]).

use std::collections::HashSet;
use std::fmt;
use std::marker::PhantomData;
use std::path::{Component, Path};

use log::warn;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::defaults::ManifestFormat;
use crate::error::{Error, Result};
use crate::git;

/// A sub-package of a mono-repo module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Directory name under `packages/`.
    pub name: String,
    /// Dependencies linked into this package.
    pub dependencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackageBody {
    #[serde(default, deserialize_with = "nullable_list")]
    dependencies: Vec<String>,
}

/// Settings of a single workspace module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModuleSpec {
    /// Module name, taken from the manifest key. Also the repository name.
    #[serde(skip)]
    pub name: String,
    /// Organization (or group) owning the repository.
    #[serde(default)]
    pub organization: Option<String>,
    /// Base URL of the git host.
    #[serde(default)]
    pub url: Option<String>,
    /// Branch the module is pinned to.
    #[serde(default)]
    pub branch: Option<String>,
    /// Directory the module is cloned under, relative to the workspace root.
    #[serde(default)]
    pub path: Option<String>,
    /// Local directory name, defaults to the module name.
    #[serde(default)]
    pub output: Option<String>,
    /// Whether this is an application with a nested `api` directory.
    #[serde(default)]
    pub application: bool,
    /// Dependencies linked into this module.
    #[serde(default, deserialize_with = "nullable_list")]
    pub dependencies: Vec<String>,
    /// Sub-packages of a mono-repo module, in declaration order.
    #[serde(default, deserialize_with = "ordered_packages")]
    pub packages: Option<Vec<PackageSpec>>,
    /// Branches this module takes part in.
    #[serde(default)]
    pub branches: Option<Vec<String>>,
    /// Whether to clone with a limited depth.
    #[serde(default)]
    pub shallow_clone: Option<bool>,
}

impl ModuleSpec {
    /// Local directory name of the module checkout.
    pub fn output_name(&self) -> &str {
        self.output.as_deref().unwrap_or(&self.name)
    }

    /// Whether the module is split into sub-packages.
    pub fn is_mono_repo(&self) -> bool {
        self.packages.is_some()
    }

    /// Sub-packages in declaration order (empty for plain modules).
    pub fn packages(&self) -> &[PackageSpec] {
        self.packages.as_deref().unwrap_or(&[])
    }

    /// Whether the module takes part in a run on `branch`.
    ///
    /// Modules without a `branches` list take part in every run, and every
    /// module takes part when no branch is given.
    pub fn participates_in(&self, branch: Option<&str>) -> bool {
        match (&self.branches, branch) {
            (Some(allowed), Some(branch)) => allowed.iter().any(|b| b == branch),
            _ => true,
        }
    }
}

/// An ordered set of workspace modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    modules: Vec<ModuleSpec>,
}

impl<'de> Deserialize<'de> for Manifest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let OrderedEntries(entries) = OrderedEntries::<ModuleSpec>::deserialize(deserializer)?;
        let modules = entries
            .into_iter()
            .map(|(name, mut module)| {
                module.name = name;
                module
            })
            .collect();
        Ok(Manifest { modules })
    }
}

impl Manifest {
    /// Load and validate a manifest file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, ManifestFormat::from_path(path))
    }

    /// Parse and validate manifest text in the given format.
    pub fn parse(content: &str, format: ManifestFormat) -> Result<Self> {
        if content.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "Manifest is empty".to_string(),
                hint: Some("Declare at least one module, e.g. `my-module: {}`".to_string()),
            });
        }
        let manifest: Manifest = match format {
            ManifestFormat::Yaml => serde_yaml::from_str(content)?,
            ManifestFormat::Json => serde_json::from_str(content)?,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse and validate a YAML manifest.
    pub fn parse_yaml(content: &str) -> Result<Self> {
        Self::parse(content, ManifestFormat::Yaml)
    }

    /// Parse and validate a JSON manifest.
    pub fn parse_json(content: &str) -> Result<Self> {
        Self::parse(content, ManifestFormat::Json)
    }

    /// Modules in declaration order.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleSpec> {
        self.modules.iter()
    }

    /// Module names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name.as_str())
    }

    /// Look up a module by name.
    pub fn get(&self, name: &str) -> Option<&ModuleSpec> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Check the invariants serde cannot express.
    ///
    /// Rejects empty names, `application` modules declaring `packages`,
    /// `output`/package names that are not a single path component, and
    /// branch names or dependency identifiers git or yarn would read as
    /// options.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for module in &self.modules {
            if module.name.trim().is_empty() {
                return Err(invalid("Module names must not be empty", None));
            }
            if !seen.insert(module.name.as_str()) {
                return Err(invalid(
                    &format!("Duplicate module {}", module.name),
                    Some("Module names must be unique within a workspace"),
                ));
            }
            if module.application && module.packages.is_some() {
                return Err(invalid(
                    &format!("Module {} is an application and declares packages", module.name),
                    Some("Applications are linked through their api directory; drop `packages` or `application`"),
                ));
            }
            if let Some(output) = &module.output {
                if !is_single_component(output) {
                    return Err(invalid(
                        &format!("Invalid output '{}' for module {}", output, module.name),
                        Some("Use `path` to place a module in another directory"),
                    ));
                }
            }
            for branch in module.branch.iter().chain(module.branches.iter().flatten()) {
                git::check_ref_name(branch).map_err(|reason| {
                    invalid(
                        &format!("Invalid branch '{}' for module {}: {}", branch, module.name, reason),
                        None,
                    )
                })?;
            }
            check_dependencies(&module.name, None, &module.dependencies)?;

            let mut packages = HashSet::new();
            for package in module.packages() {
                if !is_single_component(&package.name) || !packages.insert(package.name.as_str()) {
                    return Err(invalid(
                        &format!("Invalid package '{}' in module {}", package.name, module.name),
                        Some("Package names are directory names under `packages/` and must be unique"),
                    ));
                }
                check_dependencies(&module.name, Some(&package.name), &package.dependencies)?;
            }
            if module.is_mono_repo() && !module.dependencies.is_empty() {
                warn!(
                    "Module {} declares packages; its module-level dependencies will not be linked",
                    module.name
                );
            }
        }
        Ok(())
    }
}

fn invalid(message: &str, hint: Option<&str>) -> Error {
    Error::ConfigParse {
        message: message.to_string(),
        hint: hint.map(str::to_string),
    }
}

fn check_dependencies(module: &str, package: Option<&str>, dependencies: &[String]) -> Result<()> {
    for dependency in dependencies {
        if dependency.trim().is_empty() || dependency.starts_with('-') {
            let owner = match package {
                Some(package) => format!("{}/{}", module, package),
                None => module.to_string(),
            };
            return Err(invalid(
                &format!("Invalid dependency '{}' in {}", dependency, owner),
                Some("Dependencies are package names as declared in package.json"),
            ));
        }
    }
    Ok(())
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Mapping entries in document order, with duplicate keys rejected.
struct OrderedEntries<T>(Vec<(String, T)>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedEntries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = OrderedEntries<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of names to settings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, T)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
                let mut seen = HashSet::new();
                while let Some(key) = map.next_key::<String>()? {
                    if !seen.insert(key.clone()) {
                        return Err(de::Error::custom(format!("duplicate entry `{}`", key)));
                    }
                    let value = map.next_value::<T>()?;
                    entries.push((key, value));
                }
                Ok(OrderedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

fn nullable_list<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn ordered_packages<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Vec<PackageSpec>>, D::Error> {
    let entries = Option::<OrderedEntries<PackageBody>>::deserialize(deserializer)?;
    Ok(entries.map(|OrderedEntries(entries)| {
        entries
            .into_iter()
            .map(|(name, body)| PackageSpec {
                name,
                dependencies: body.dependencies,
            })
            .collect()
    }))
}
