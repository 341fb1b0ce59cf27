use crate::args::Args;
use clap::Parser;
use gramc_grammar::catalog::{BuildOpts, Catalog};
use gramc_grammar::manifest::Manifest;
use gramc_grammar::wasm_build::{reset_out_dir, ToolChain};
use gramc_grammar::CatalogError;
use gramc_output::{OutputWriter, Writers};
use gramc_task::comms::{RunEvent, TaskComms};
use gramc_task::runner::BoundedRunner;
use gramc_task::RunnerOpts;
use gramc_tracing::{init_tracing, OutputFormat, WriteOption};
use std::env::current_dir;
use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::Sender;

mod args;

#[actix_rt::main]
async fn main() -> Result<(), anyhow::Error> {
    std::env::set_var("RUST_LIB_BACKTRACE", "0");
    let args = Args::parse();

    let write_log_opt = if args.write_log {
        WriteOption::File
    } else {
        WriteOption::None
    };
    init_tracing(args.log_level, args.format, write_log_opt);
    tracing::debug!("{:#?}", args);

    let root = match &args.root {
        Some(root) => root.clone(),
        None => current_dir()?,
    };
    let catalog = load_catalog(&args, &root)?;
    if catalog.is_empty() {
        tracing::info!("nothing to build");
        return Ok(());
    }

    let out_dir = root.join(&args.out_dir);
    reset_out_dir(&out_dir)?;

    let writer = match args.format {
        OutputFormat::Normal => Writers::Pretty,
        OutputFormat::Json => Writers::Json,
    };
    let (events_sender, channel_future) = stdout_channel(writer);
    let printer = tokio::spawn(channel_future);
    let comms = TaskComms::new(events_sender);

    let build_opts = BuildOpts {
        toolchain: ToolChain::default(),
        timeout: Duration::from_secs(args.timeout),
    };
    let tasks = catalog.into_tasks(&root, &out_dir, &build_opts);
    let opts = match args.limit {
        Some(limit) => RunnerOpts::new(limit),
        None => RunnerOpts::default(),
    };

    let report = BoundedRunner::new(opts).run(tasks, &comms).await?;

    // closes the channel so the printer drains and stops
    drop(comms);
    match printer.await {
        Ok(_) => {}
        Err(e) => tracing::error!("printer task failed: {e}"),
    }

    let stdout = &mut std::io::stdout();
    writer.handle_report(stdout, &report)?;

    if report.has_failures() {
        return Err(anyhow::anyhow!(
            "{} of {} builds failed",
            report.failed().count(),
            report.len()
        ));
    }
    Ok(())
}

fn load_catalog(args: &Args, root: &Path) -> Result<Catalog, CatalogError> {
    if let Some(manifest) = &args.manifest {
        let path = root.join(manifest);
        return Manifest::from_file(&path)?.into_catalog(&parent_of(&path));
    }
    if let Some(package_json) = &args.package_json {
        return Catalog::discover(&root.join(package_json), &Catalog::default_overrides());
    }
    let default_manifest = root.join("gramc.yml");
    if default_manifest.exists() {
        return Manifest::from_file(&default_manifest)?.into_catalog(root);
    }
    let default_package_json = root.join("package.json");
    if default_package_json.exists() {
        return Catalog::discover(&default_package_json, &Catalog::default_overrides());
    }
    Err(CatalogError::Empty)
}

fn parent_of(path: &Path) -> std::path::PathBuf {
    path.parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::path::PathBuf::from("."))
}

fn stdout_channel(writer: Writers) -> (Sender<RunEvent>, impl Future<Output = ()>) {
    let (events_sender, mut events_receiver) = mpsc::channel::<RunEvent>(100);
    let channel_future = async move {
        let stdout = &mut std::io::stdout();
        while let Some(evt) = events_receiver.recv().await {
            tracing::debug!(run_event = ?evt);
            match writer.handle_run_event(stdout, &evt) {
                Ok(_) => {}
                Err(e) => tracing::error!("could not write to stdout {e}"),
            }
            match stdout.flush() {
                Ok(_) => {}
                Err(e) => tracing::error!("could not flush {e}"),
            };
        }
    };
    (events_sender, channel_future)
}
