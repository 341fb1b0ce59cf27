use crate::wasm_build::{ToolChain, WasmBuild};
use crate::CatalogError;
use gramc_task::task::TaskEntry;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Per-grammar build options - the configuration record that replaces
/// per-package branching in the build driver.
///
/// `subpaths` points at nested grammar directories inside the package (some
/// packages ship several grammars, e.g. `typescript` + `tsx`); empty means
/// the package root is the grammar directory. `generate` requests a parser
/// generation step before the wasm build.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarOpts {
    #[serde(default)]
    pub subpaths: Vec<String>,
    #[serde(default)]
    pub generate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarEntry {
    pub name: String,
    pub opts: GrammarOpts,
}

/// Ordered collection of grammar packages to build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<GrammarEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<GrammarEntry>) -> Self {
        Self { entries }
    }
    pub fn entries(&self) -> &[GrammarEntry] {
        &self.entries
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Options for published grammar packages that do not build from their
    /// package root: parser generation required, grammar nested in a
    /// subdirectory, or several grammars per package.
    ///
    /// Used when discovering without a manifest; a manifest's `overrides`
    /// section replaces this table entirely.
    pub fn default_overrides() -> BTreeMap<String, GrammarOpts> {
        BTreeMap::from([
            (
                "tree-sitter-rescript".to_string(),
                GrammarOpts {
                    subpaths: vec![],
                    generate: true,
                },
            ),
            (
                "tree-sitter-ocaml".to_string(),
                GrammarOpts {
                    subpaths: vec!["ocaml".to_string()],
                    generate: false,
                },
            ),
            (
                "tree-sitter-php".to_string(),
                GrammarOpts {
                    subpaths: vec!["php".to_string()],
                    generate: false,
                },
            ),
            (
                "tree-sitter-typescript".to_string(),
                GrammarOpts {
                    subpaths: vec!["typescript".to_string(), "tsx".to_string()],
                    generate: false,
                },
            ),
        ])
    }

    /// Discover grammar packages from a `package.json`: every devDependency
    /// whose name contains `tree-sitter-`, except the CLI tool itself.
    /// Options for a discovered name come from the `overrides` lookup.
    pub fn discover(
        package_json: &Path,
        overrides: &BTreeMap<String, GrammarOpts>,
    ) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(package_json).map_err(|err| CatalogError::Read {
            path: package_json.to_path_buf(),
            err,
        })?;
        let pkg: serde_json::Value = serde_json::from_str(&raw)?;
        let deps = pkg
            .get("devDependencies")
            .and_then(serde_json::Value::as_object);
        let entries = deps
            .map(|deps| {
                deps.keys()
                    .filter(|name| name.contains("tree-sitter-") && *name != "tree-sitter-cli")
                    .map(|name| GrammarEntry {
                        name: name.to_owned(),
                        opts: overrides.get(name).cloned().unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self { entries })
    }

    /// Expand every catalog entry into build tasks - one per subpath, or one
    /// for the package root. The task id doubles as the output prefix.
    pub fn into_tasks(self, root: &Path, out_dir: &Path, opts: &BuildOpts) -> Vec<TaskEntry> {
        let mut tasks = Vec::new();
        for entry in self.entries {
            let package_dir = root.join("node_modules").join(&entry.name);
            let dirs: Vec<(String, std::path::PathBuf)> = if entry.opts.subpaths.is_empty() {
                vec![(entry.name.clone(), package_dir)]
            } else {
                entry
                    .opts
                    .subpaths
                    .iter()
                    .map(|sub| (format!("{}/{sub}", entry.name), package_dir.join(sub)))
                    .collect()
            };
            for (label, cwd) in dirs {
                let build = WasmBuild::new(label.as_str(), cwd, out_dir.to_path_buf())
                    .generate(entry.opts.generate)
                    .toolchain(opts.toolchain.clone())
                    .timeout(opts.timeout);
                tasks.push(TaskEntry::new(label, Box::new(build)));
            }
        }
        tasks
    }
}

#[derive(Debug, Clone)]
pub struct BuildOpts {
    pub toolchain: ToolChain,
    pub timeout: Duration,
}

impl Default for BuildOpts {
    fn default() -> Self {
        Self {
            toolchain: ToolChain::default(),
            timeout: Duration::from_secs(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn package_json(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("package.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{
  "devDependencies": {{
    "tree-sitter-cli": "^0.22.0",
    "tree-sitter-css": "^0.21.0",
    "tree-sitter-ocaml": "^0.20.4",
    "prettier": "^3.0.0"
  }}
}}"#
        )
        .unwrap();
        path
    }

    #[test]
    fn discovery_filters_and_applies_overrides() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let pkg = package_json(&dir);
        let overrides = BTreeMap::from([(
            "tree-sitter-ocaml".to_string(),
            GrammarOpts {
                subpaths: vec!["ocaml".to_string()],
                generate: false,
            },
        )]);

        let catalog = Catalog::discover(&pkg, &overrides)?;
        let names = catalog
            .entries()
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["tree-sitter-css", "tree-sitter-ocaml"]);
        assert_eq!(
            catalog.entries()[1].opts.subpaths,
            vec!["ocaml".to_string()]
        );
        assert_eq!(catalog.entries()[0].opts, GrammarOpts::default());
        Ok(())
    }

    #[test]
    fn bare_discovery_applies_default_overrides() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        let pkg = dir.path().join("package.json");
        std::fs::write(
            &pkg,
            r#"{
  "devDependencies": {
    "tree-sitter-cli": "1",
    "tree-sitter-css": "1",
    "tree-sitter-rescript": "1",
    "tree-sitter-typescript": "1"
  }
}"#,
        )?;

        let catalog = Catalog::discover(&pkg, &Catalog::default_overrides())?;
        let by_name = |name: &str| {
            catalog
                .entries()
                .iter()
                .find(|e| e.name == name)
                .unwrap()
                .opts
                .clone()
        };
        assert_eq!(by_name("tree-sitter-css"), GrammarOpts::default());
        assert!(by_name("tree-sitter-rescript").generate);
        assert_eq!(
            by_name("tree-sitter-typescript").subpaths,
            vec!["typescript".to_string(), "tsx".to_string()]
        );
        Ok(())
    }

    #[test]
    fn subpaths_expand_to_one_task_each() {
        let catalog = Catalog::new(vec![
            GrammarEntry {
                name: "tree-sitter-typescript".to_string(),
                opts: GrammarOpts {
                    subpaths: vec!["typescript".to_string(), "tsx".to_string()],
                    generate: false,
                },
            },
            GrammarEntry {
                name: "tree-sitter-css".to_string(),
                opts: GrammarOpts::default(),
            },
        ]);
        let tasks = catalog.into_tasks(
            Path::new("/repo"),
            Path::new("/repo/out"),
            &BuildOpts::default(),
        );
        let ids = tasks.iter().map(|t| t.id().to_owned()).collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![
                "tree-sitter-typescript/typescript",
                "tree-sitter-typescript/tsx",
                "tree-sitter-css"
            ]
        );
    }
}
