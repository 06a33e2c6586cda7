use anyhow::Context;
use clap::Parser;
use incre_upgrade::{read_config, FailurePolicy, UpgradeConfig, UpgradeEngine, UpgradeRequest};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Incremental upgrade - run versioned SQL/shell scripts between two releases
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Release branch whose scripts are applied
    #[arg(short, long, env = "INCRE_UPGRADE_BRANCH", default_value = "standard")]
    branch: String,

    /// Source version (inclusive)
    #[arg(long)]
    from: String,

    /// Destination version (inclusive)
    #[arg(long)]
    to: String,

    /// Target resource, usually the database file
    #[arg(short, long, env = "INCRE_UPGRADE_TARGET")]
    target: PathBuf,

    /// Upgrade folder holding version.json and script/
    #[arg(long, env = "INCRE_UPGRADE_DIR")]
    upgrade_dir: Option<PathBuf>,

    /// JSON config file; command-line flags take precedence
    #[arg(short, long, env = "INCRE_UPGRADE_CONFIG")]
    config: Option<PathBuf>,

    /// Manifest path, overrides the upgrade folder layout
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Script folder, overrides the upgrade folder layout
    #[arg(long)]
    script_root: Option<PathBuf>,

    /// sqlite command-line client used for sql scripts
    #[arg(long, env = "INCRE_UPGRADE_SQLITE")]
    sqlite_bin: Option<String>,

    /// Stop at the first failed script and exit non-zero
    #[arg(long)]
    strict: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

async fn build_config(args: &Args) -> anyhow::Result<UpgradeConfig> {
    let mut config = match &args.config {
        Some(path) => read_config(path)
            .await
            .with_context(|| format!("reading config {}", path.display()))?
            .with_context(|| format!("config {} not found", path.display()))?,
        None => UpgradeConfig::default(),
    };

    if let Some(dir) = &args.upgrade_dir {
        let layout = UpgradeConfig::from_upgrade_dir(dir);
        config.manifest_path = layout.manifest_path;
        config.script_root = layout.script_root;
    }
    if let Some(manifest) = &args.manifest {
        config.manifest_path = manifest.clone();
    }
    if let Some(script_root) = &args.script_root {
        config.script_root = script_root.clone();
    }
    if let Some(sqlite_bin) = &args.sqlite_bin {
        config.sqlite_bin = sqlite_bin.clone();
    }
    if args.strict {
        config.failure_policy = FailurePolicy::Strict;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize logging; logs go to stderr so --json output stays clean
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = build_config(&args).await?;

    info!(
        manifest = %config.manifest_path.display(),
        scripts = %config.script_root.display(),
        policy = ?config.failure_policy,
        "Starting incremental upgrade"
    );

    let engine = UpgradeEngine::new(config);
    let request = UpgradeRequest::new(&args.branch, &args.from, &args.to, &args.target);

    match engine.run(&request).await {
        Ok(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            for failed in report.failed() {
                error!(
                    version = %failed.version,
                    script = %failed.outcome.script_path.display(),
                    "Script did not apply cleanly"
                );
            }
            Ok(if report.success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(e) => {
            error!(error = %e, "Upgrade failed");
            Ok(ExitCode::FAILURE)
        }
    }
}
