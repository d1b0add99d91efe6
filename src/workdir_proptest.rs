//! Property-based tests for module directory resolution and remote URLs.
//!
//! These tests use proptest to generate random module settings and verify
//! that the addressing rules hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::git::remote_url;
    use crate::manifest::ModuleSpec;
    use crate::workdir::ModulePaths;
    use proptest::prelude::*;
    use std::path::{Path, PathBuf};

    fn module(name: &str, path: Option<String>, output: Option<String>) -> ModuleSpec {
        ModuleSpec {
            name: name.to_string(),
            path,
            output,
            ..Default::default()
        }
    }

    proptest! {
        /// Property: a module always lives in a direct child of its root
        #[test]
        fn module_dir_is_child_of_root(
            name in "[a-z][a-z0-9-]{0,15}",
            path in proptest::option::of("(\\.\\./)?[a-z]{1,8}(/[a-z]{1,8})?"),
            output in proptest::option::of("[a-z][a-z0-9_-]{0,15}"),
        ) {
            let paths = ModulePaths::resolve(Path::new("/work"), &module(&name, path, output));
            prop_assert_eq!(paths.dir.parent(), Some(paths.root.as_path()));
        }

        /// Property: the directory name is the output, else the module name
        #[test]
        fn module_dir_name_defaults_to_name(
            name in "[a-z][a-z0-9-]{0,15}",
            output in proptest::option::of("[a-z][a-z0-9_-]{0,15}"),
        ) {
            let spec = module(&name, None, output.clone());
            let paths = ModulePaths::resolve(Path::new("/work"), &spec);
            let expected = output.unwrap_or(name);
            prop_assert_eq!(paths.dir, PathBuf::from("/work").join(expected));
        }

        /// Property: relative paths stay under the invocation directory
        #[test]
        fn relative_path_is_joined_to_cwd(
            name in "[a-z][a-z0-9-]{0,15}",
            path in "[a-z]{1,8}(/[a-z]{1,8})?",
        ) {
            let paths = ModulePaths::resolve(Path::new("/work"), &module(&name, Some(path.clone()), None));
            prop_assert_eq!(paths.root, PathBuf::from("/work").join(path));
        }

        /// Property: remote URLs are independent of trailing slashes on the base
        #[test]
        fn remote_url_ignores_trailing_slashes(
            host in "[a-z]{1,10}\\.(com|org)",
            slashes in "/{0,3}",
            organization in "[a-z][a-z0-9-]{0,10}",
            name in "[a-z][a-z0-9-]{0,15}",
        ) {
            let base = format!("https://{}", host);
            let with_slashes = format!("{}{}", base, slashes);
            prop_assert_eq!(
                remote_url(&with_slashes, &organization, &name),
                format!("{}/{}/{}.git", base, organization, name)
            );
        }
    }
}
