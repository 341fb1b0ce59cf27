use crate::catalog::{Catalog, GrammarEntry, GrammarOpts};
use crate::CatalogError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk configuration (`gramc.yml`).
///
/// A manifest can list grammars explicitly, point at a `package.json` to
/// discover them, or both. Explicit entries win over discovered ones with the
/// same name; `overrides` adjusts options for discovered names only.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub grammars: Vec<GrammarItem>,
    /// package.json path to discover grammars from, relative to the manifest.
    #[serde(default)]
    pub discover: Option<PathBuf>,
    #[serde(default)]
    pub overrides: BTreeMap<String, GrammarOpts>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarItem {
    pub name: String,
    #[serde(default)]
    pub subpaths: Vec<String>,
    #[serde(default)]
    pub generate: bool,
}

impl Manifest {
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|err| CatalogError::Read {
            path: path.to_path_buf(),
            err,
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, CatalogError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Resolve this manifest into a flat catalog. `base_dir` anchors the
    /// relative `discover` path.
    pub fn into_catalog(self, base_dir: &Path) -> Result<Catalog, CatalogError> {
        let mut entries = self
            .grammars
            .into_iter()
            .map(|item| GrammarEntry {
                name: item.name,
                opts: GrammarOpts {
                    subpaths: item.subpaths,
                    generate: item.generate,
                },
            })
            .collect::<Vec<_>>();

        if let Some(package_json) = self.discover {
            let path = base_dir.join(package_json);
            let discovered = Catalog::discover(&path, &self.overrides)?;
            for entry in discovered.entries() {
                if entries.iter().any(|e| e.name == entry.name) {
                    tracing::debug!(name = %entry.name, "explicit entry wins over discovered");
                    continue;
                }
                entries.push(entry.clone());
            }
        }

        Ok(Catalog::new(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_grammars_parse() -> Result<(), anyhow::Error> {
        let yaml = r#"
grammars:
  - name: tree-sitter-css
  - name: tree-sitter-rescript
    generate: true
  - name: tree-sitter-typescript
    subpaths:
      - typescript
      - tsx
"#;
        let manifest = Manifest::from_yaml(yaml)?;
        let catalog = manifest.into_catalog(Path::new("."))?;
        assert_eq!(catalog.len(), 3);
        assert!(catalog.entries()[1].opts.generate);
        assert_eq!(catalog.entries()[2].opts.subpaths.len(), 2);
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let yaml = "grammars: []\nunknown_key: 1\n";
        assert!(Manifest::from_yaml(yaml).is_err());
    }

    #[test]
    fn discovery_merges_behind_explicit_entries() -> Result<(), anyhow::Error> {
        let dir = tempfile::tempdir()?;
        std::fs::write(
            dir.path().join("package.json"),
            r#"{
  "devDependencies": {
    "tree-sitter-css": "1",
    "tree-sitter-html": "1",
    "tree-sitter-cli": "1"
  }
}"#,
        )?;
        let yaml = r#"
grammars:
  - name: tree-sitter-css
    generate: true
discover: package.json
overrides:
  tree-sitter-html:
    generate: true
"#;
        let catalog = Manifest::from_yaml(yaml)?.into_catalog(dir.path())?;
        let names = catalog
            .entries()
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>();
        // explicit css entry kept (with generate), discovered html appended
        assert_eq!(names, vec!["tree-sitter-css", "tree-sitter-html"]);
        assert!(catalog.entries()[0].opts.generate);
        assert!(catalog.entries()[1].opts.generate);
        Ok(())
    }
}
