use crate::CatalogError;
use actix::{Recipient, ResponseFuture};
use gramc_task::comms::{RunEvent, TaskComms};
use gramc_task::invocation::Invocation;
use gramc_task::outcome::{Outcome, TaskError};
use gramc_task::task::AsTask;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// The external compiler invocations, overridable so tests (or forks of the
/// tool) can substitute their own commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolChain {
    pub generate: String,
    pub build: String,
}

impl Default for ToolChain {
    fn default() -> Self {
        Self {
            generate: "npx tree-sitter generate".to_string(),
            build: "npx tree-sitter build --wasm".to_string(),
        }
    }
}

/// One grammar compilation unit: run the toolchain in `cwd` (unless wasm
/// artifacts already exist there) and collect every produced `*.wasm` file
/// into `out_dir`.
#[derive(Debug)]
pub struct WasmBuild {
    label: String,
    cwd: PathBuf,
    out_dir: PathBuf,
    generate: bool,
    toolchain: ToolChain,
    timeout: Duration,
}

impl WasmBuild {
    pub fn new(label: impl Into<String>, cwd: PathBuf, out_dir: PathBuf) -> Self {
        Self {
            label: label.into(),
            cwd,
            out_dir,
            generate: false,
            toolchain: ToolChain::default(),
            timeout: Duration::from_secs(300),
        }
    }
    pub fn generate(mut self, generate: bool) -> Self {
        self.generate = generate;
        self
    }
    pub fn toolchain(mut self, toolchain: ToolChain) -> Self {
        self.toolchain = toolchain;
        self
    }
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to spawn build command: {0}")]
    Spawn(std::io::Error),
    #[error("exited with code {0}")]
    ExitStatus(i32),
    #[error("terminated by signal")]
    Terminated,
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    #[error("no wasm artifacts produced in {}", .0.display())]
    NoArtifacts(PathBuf),
    #[error("could not move {} to {}: {err}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        err: std::io::Error,
    },
    #[error("invalid artifact pattern: {0}")]
    Pattern(#[from] globset::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<BuildError> for TaskError {
    fn from(value: BuildError) -> Self {
        match value {
            BuildError::ExitStatus(code) => TaskError::ExitStatus { code },
            BuildError::TimedOut(_) => TaskError::TimedOut,
            other => TaskError::Message {
                message: other.to_string(),
            },
        }
    }
}

impl actix::Actor for WasmBuild {
    type Context = actix::Context<Self>;
}

impl actix::Handler<Invocation> for WasmBuild {
    type Result = ResponseFuture<Outcome>;

    fn handle(&mut self, msg: Invocation, _ctx: &mut Self::Context) -> Self::Result {
        let label = self.label.clone();
        let cwd = self.cwd.clone();
        let out_dir = self.out_dir.clone();
        let generate = self.generate;
        let toolchain = self.toolchain.clone();
        let timeout = self.timeout;
        let comms = msg.comms;
        let fut = async move {
            match run_build(&label, &cwd, &out_dir, generate, &toolchain, timeout, &comms).await {
                Ok(moved) => {
                    tracing::debug!(%label, moved = moved.len(), "build complete");
                    Outcome::success()
                }
                Err(e) => {
                    tracing::debug!(%label, "build failed: {e}");
                    Outcome::failed(e.into())
                }
            }
        };
        Box::pin(fut)
    }
}

impl AsTask for WasmBuild {
    fn into_recipient(self: Box<Self>) -> Recipient<Invocation> {
        use actix::Actor;
        (*self).start().recipient()
    }
}

async fn run_build(
    label: &str,
    cwd: &Path,
    out_dir: &Path,
    generate: bool,
    toolchain: &ToolChain,
    timeout: Duration,
    comms: &TaskComms,
) -> Result<Vec<PathBuf>, BuildError> {
    if wasm_artifacts(cwd)?.is_empty() {
        if generate {
            run_sh(&toolchain.generate, cwd, timeout, comms, label).await?;
        }
        run_sh(&toolchain.build, cwd, timeout, comms, label).await?;
    } else {
        tracing::debug!(%label, "existing wasm artifacts, skipping compile");
    }

    let artifacts = wasm_artifacts(cwd)?;
    if artifacts.is_empty() {
        return Err(BuildError::NoArtifacts(cwd.to_path_buf()));
    }

    let mut moved = Vec::with_capacity(artifacts.len());
    for file in artifacts {
        let from = cwd.join(&file);
        let to = out_dir.join(&file);
        move_file(&from, &to).map_err(|err| BuildError::Move {
            from: from.clone(),
            to: to.clone(),
            err,
        })?;
        moved.push(to);
    }
    Ok(moved)
}

fn wasm_artifacts(cwd: &Path) -> Result<Vec<OsString>, BuildError> {
    let matcher = globset::Glob::new("*.wasm")?.compile_matcher();
    let mut found = Vec::new();
    for entry in std::fs::read_dir(cwd)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && matcher.is_match(entry.file_name()) {
            found.push(entry.file_name());
        }
    }
    found.sort();
    Ok(found)
}

fn move_file(from: &Path, to: &Path) -> Result<(), std::io::Error> {
    // rename is not possible across filesystems, fall back to copy + remove
    match std::fs::rename(from, to) {
        Ok(_) => Ok(()),
        Err(_) => {
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)
        }
    }
}

async fn run_sh(
    cmd: &str,
    cwd: &Path,
    max_duration: Duration,
    comms: &TaskComms,
    prefix: &str,
) -> Result<(), BuildError> {
    tracing::debug!(?cmd, cwd = %cwd.display(), "will run");
    let mut child = Command::new("sh")
        .kill_on_drop(true)
        .arg("-c")
        .arg(cmd)
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(BuildError::Spawn)?;
    let pid = child.id();

    let stdout = child
        .stdout
        .take()
        .expect("child did not have a handle to stdout");
    let stderr = child
        .stderr
        .take()
        .expect("child did not have a handle to stderr");

    let mut stdout_reader = BufReader::new(stdout).lines();
    let mut stderr_reader = BufReader::new(stderr).lines();

    let comms_out = comms.clone();
    let comms_err = comms.clone();
    let prefix_out = prefix.to_owned();
    let prefix_err = prefix.to_owned();

    let h = tokio::spawn(async move {
        while let Ok(Some(line)) = stdout_reader.next_line().await {
            comms_out
                .send(RunEvent::stdout_line(line, Some(prefix_out.clone())))
                .await;
        }
    });
    let h2 = tokio::spawn(async move {
        while let Ok(Some(line)) = stderr_reader.next_line().await {
            comms_err
                .send(RunEvent::stderr_line(line, Some(prefix_err.clone())))
                .await;
        }
    });

    let sleep = tokio::time::sleep(max_duration);
    tokio::pin!(sleep);

    let result = tokio::select! {
        _ = &mut sleep => {
            tracing::info!("⌛️ command timed out");
            Err(BuildError::TimedOut(max_duration))
        }
        out = child.wait() => {
            match out {
                Ok(exit) => match exit.code() {
                    Some(0) => Ok(()),
                    Some(code) => {
                        tracing::debug!("did exit with code {}", code);
                        Err(BuildError::ExitStatus(code))
                    }
                    None => Err(BuildError::Terminated),
                },
                Err(err) => Err(BuildError::Io(err)),
            }
        }
    };

    if let Some(pid) = pid {
        let _ = kill_tree::tokio::kill_tree(pid).await;
        tracing::trace!("child tree killed");
    }

    match h.await {
        Ok(_) => tracing::trace!("did wait for stdout"),
        Err(e) => tracing::trace!("failed waiting for stdout {e}"),
    };
    match h2.await {
        Ok(_) => tracing::trace!("did wait for stderr"),
        Err(e) => tracing::trace!("failed waiting for stderr {e}"),
    };

    result
}

/// Convenience used by the binary: wipe + recreate the artifact directory so
/// a run never mixes stale artifacts with fresh ones.
pub fn reset_out_dir(out_dir: &Path) -> Result<(), CatalogError> {
    if out_dir.exists() {
        std::fs::remove_dir_all(out_dir).map_err(|err| CatalogError::OutDir {
            path: out_dir.to_path_buf(),
            err,
        })?;
    }
    std::fs::create_dir_all(out_dir).map_err(|err| CatalogError::OutDir {
        path: out_dir.to_path_buf(),
        err,
    })
}
