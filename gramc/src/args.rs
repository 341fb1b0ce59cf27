use gramc_tracing::{LogLevel, OutputFormat};
use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(version, name = "gramc", about = "Compile grammar packages to wasm")]
pub struct Args {
    #[arg(short, long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// output internal logs to gramc.log in the current directory
    #[arg(long, name = "write-log")]
    pub write_log: bool,

    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Manifest listing grammars and per-grammar overrides (default: gramc.yml
    /// in the root, when present)
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Discover grammars from a package.json instead of a manifest
    #[arg(long, conflicts_with = "manifest")]
    pub package_json: Option<PathBuf>,

    /// Directory containing node_modules (default: current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Directory the wasm artifacts are collected into, relative to the root
    #[arg(long, default_value = "out")]
    pub out_dir: PathBuf,

    /// Max concurrent builds (default: available CPU parallelism)
    #[arg(short = 'c', long)]
    pub limit: Option<usize>,

    /// Per-command timeout in seconds
    #[arg(long, default_value_t = 300)]
    pub timeout: u64,
}
