use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use named_exports::config::{
    NamedExportsConfig, find_project_root, load_config, load_config_from_path,
};
use named_exports::output::plan_output_paths;
use named_exports::{CompilationContext, TransformOutcome, TransformResult};
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "named-exports")]
#[command(
    about = "Rewrite named imports of CommonJS modules into statically sound imports",
    long_about = None,
    version
)]
struct Cli {
    /// Files to transform.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Project root (default: nearest directory with a package.json).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Explicit config file instead of discovery in the project root.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write transformed files (and .map files) here, mirroring their path under
    /// the project root, instead of printing them.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Do not generate source maps.
    #[arg(long)]
    no_source_map: bool,

    /// Map every character instead of segment and line starts.
    #[arg(long)]
    hires: bool,

    /// Log resolution and rewrite decisions.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let root = cli.root.clone().unwrap_or_else(|| find_project_root(&cwd));
    let config = load_cli_config(&cli, &root)?;
    let context = Arc::new(
        CompilationContext::builder(&root)
            .config(config)
            .build()
            .context("failed to set up compilation context")?,
    );

    let mut failures = 0usize;
    let mut inputs = Vec::with_capacity(cli.files.len());
    for file in &cli.files {
        match dunce::canonicalize(file) {
            Ok(abs) => inputs.push(abs),
            Err(err) => {
                eprintln!("named-exports: cannot open {}: {err}", file.display());
                failures += 1;
            }
        }
    }
    let outputs = match &cli.out_dir {
        Some(out_dir) => Some(plan_output_paths(context.root(), &inputs, out_dir)?),
        None => None,
    };

    let mut tasks = JoinSet::new();
    for (index, file) in inputs.iter().cloned().enumerate() {
        let context = Arc::clone(&context);
        tasks.spawn(async move {
            let outcome = transform_file(&context, &file).await;
            (index, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (index, outcome) = joined?;
        let file = &inputs[index];
        match outcome {
            Ok(TransformOutcome::Changed(result)) => {
                let out_path = outputs.as_ref().map(|paths| paths[index].as_path());
                if let Err(err) = emit(file, &result, out_path) {
                    eprintln!("named-exports: {err:#}");
                    failures += 1;
                }
            }
            Ok(TransformOutcome::Unchanged) => {
                tracing::info!(file = %file.display(), "unchanged");
            }
            Err(err) => {
                eprintln!("named-exports: {}: {err:#}", file.display());
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("NAMED_EXPORTS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_cli_config(cli: &Cli, root: &Path) -> anyhow::Result<NamedExportsConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path)?,
        None => load_config(root)?,
    };
    if cli.no_source_map {
        config.source_map = false;
    }
    if cli.hires {
        config.hires = true;
    }
    Ok(config)
}

async fn transform_file(
    context: &CompilationContext,
    file: &Path,
) -> anyhow::Result<TransformOutcome> {
    let code = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("cannot read {}", file.display()))?;
    let id = file.to_string_lossy().to_string();
    Ok(context.transform(&code, &id).await?)
}

fn emit(file: &Path, result: &TransformResult, out_path: Option<&Path>) -> anyhow::Result<()> {
    let Some(out_path) = out_path else {
        println!("// {}\n{}", file.display(), result.code);
        return Ok(());
    };
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    let mut code = result.code.clone();
    if let Some(map) = &result.map {
        let map_path = PathBuf::from(format!("{}.map", out_path.display()));
        let map_name = map_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        std::fs::write(&map_path, map.to_json_string())
            .with_context(|| format!("cannot write {}", map_path.display()))?;
        code.push_str(&format!("\n//# sourceMappingURL={map_name}\n"));
    }
    std::fs::write(out_path, code)
        .with_context(|| format!("cannot write {}", out_path.display()))?;
    Ok(())
}
