use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use bootkube_core::domain::load_config;
use bootkube_core::observability::OutcomeSummary;
use bootkube_core::{Bootstrap, BootstrapConfig};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_ETCD_SERVER: &str = "http://127.0.0.1:2379";

#[derive(Parser)]
#[command(name = "bootkube")]
#[command(about = "Bootstrap a self-hosted control plane", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the temporary control plane until the self-hosted one takes over
    Start(StartArgs),
}

#[derive(Args, Debug, Default)]
struct StartArgs {
    /// TOML file with the bootstrap configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the rendered TLS assets and manifests
    #[arg(long)]
    asset_dir: Option<PathBuf>,

    /// Etcd server the control plane stores its state in
    #[arg(long)]
    etcd_server: Option<String>,

    /// Deadline for asset creation and pod readiness, in seconds
    #[arg(long)]
    asset_timeout_secs: Option<u64>,

    /// kubectl binary used to create assets and watch pods
    #[arg(long)]
    kubectl: Option<PathBuf>,

    /// Directory with kube-apiserver, kube-controller-manager and kube-scheduler
    #[arg(long)]
    binary_dir: Option<PathBuf>,

    /// Print the terminal outcome as JSON on stdout
    #[arg(long)]
    json: bool,
}

/// Config file first, then flags on top.
fn resolve_config(args: &StartArgs) -> Result<BootstrapConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            let asset_dir = args
                .asset_dir
                .clone()
                .ok_or("--asset-dir is required when --config is not given")?;
            BootstrapConfig::new(asset_dir, DEFAULT_ETCD_SERVER)
        }
    };

    if let Some(asset_dir) = &args.asset_dir {
        config.asset_dir = asset_dir.clone();
    }
    if let Some(etcd_server) = &args.etcd_server {
        config.etcd_server = etcd_server.clone();
    }
    if let Some(secs) = args.asset_timeout_secs {
        config.asset_timeout = Duration::from_secs(secs);
    }
    if let Some(kubectl) = &args.kubectl {
        config.kubectl = kubectl.clone();
    }
    if let Some(binary_dir) = &args.binary_dir {
        config.binary_dir = Some(binary_dir.clone());
    }
    Ok(config)
}

async fn start(args: StartArgs) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(&args)?;
    tracing::info!(
        asset_dir = %config.asset_dir.display(),
        etcd_server = %config.etcd_server,
        asset_timeout_secs = config.asset_timeout.as_secs(),
        "configuration loaded"
    );

    let bootstrap = Bootstrap::new(config)?;
    tracing::info!(id = %bootstrap.id(), units = bootstrap.units().len(), "bootstrap constructed");

    // Only returns when something failed.
    let outcome = bootstrap.run().await;

    if args.json {
        println!("{}", serde_json::to_string(&OutcomeSummary::from(&outcome))?);
    }
    if let Some(error) = outcome.error() {
        tracing::error!(error = %error, "bootkube exiting");
    }
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bootkube=info,bootkube_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Start(args) => start(args).await,
    }
}
