pub mod catalog;
pub mod manifest;
pub mod wasm_build;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read {}: {err}", .path.display())]
    Read {
        path: std::path::PathBuf,
        err: std::io::Error,
    },
    #[error("invalid manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid package.json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not prepare {}: {err}", .path.display())]
    OutDir {
        path: std::path::PathBuf,
        err: std::io::Error,
    },
    #[error("no grammars declared - provide a manifest or a package.json")]
    Empty,
}
