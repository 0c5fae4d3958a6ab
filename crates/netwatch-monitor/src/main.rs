//! CLI entry point for the netwatch inventory monitor.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use netwatch_monitor::api::ApiProcess;
use netwatch_monitor::config::MonitorConfig;
use netwatch_monitor::cycle;
use netwatch_monitor::scanner::NmapScanner;
use netwatch_monitor::setup;

#[derive(Parser)]
#[command(name = "netwatch")]
#[command(about = "Periodic network inventory monitor")]
struct Cli {
    /// Config file prefix (default: netwatch, i.e. netwatch.toml).
    #[arg(short, long, default_value = "netwatch")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively configure settings and write the config file.
    Setup,

    /// Run the scan loop, or a single cycle with --once.
    Run {
        /// Network to scan (CIDR or single address; overrides config).
        #[arg(short, long)]
        network: Option<String>,

        /// Ports to scan in nmap syntax (overrides config).
        #[arg(short, long)]
        ports: Option<String>,

        /// Seconds to sleep between cycles (overrides config).
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Run one cycle and exit.
        #[arg(long)]
        once: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Setup => {
            let path = PathBuf::from(format!("{}.toml", cli.config));
            let current = load_config(&cli.config)?;
            setup::run_setup(&path, current)
        }
        Commands::Run {
            network,
            ports,
            interval_secs,
            once,
        } => {
            let mut config = load_config(&cli.config)?;
            if let Some(network) = network {
                config.scan.network = network;
            }
            if let Some(ports) = ports {
                config.scan.ports = ports;
            }
            if let Some(secs) = interval_secs {
                config.scan.interval_secs = secs;
            }
            run_monitor(config, once).await
        }
    }
}

async fn run_monitor(config: MonitorConfig, once: bool) -> anyhow::Result<()> {
    let scanner = NmapScanner::new(&config.nmap_path);
    let version = scanner.verify_installation().await?;
    tracing::info!(
        nmap = %version.lines().next().unwrap_or_default(),
        "Nmap verified"
    );

    // The helper process handle is owned here and stopped on every exit
    // path; its failure to start never blocks scanning.
    let mut api = ApiProcess::new(config.api.clone(), &config.database.url);
    if let Err(e) = api.start() {
        tracing::warn!(error = %e, "Failed to start API process, continuing without it");
    }

    let result = if once {
        cycle::run_cycle(&scanner, &config)
            .await
            .map(|_| ())
            .map_err(Into::into)
    } else {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                Ok(())
            }
            res = cycle::run_loop(&scanner, &config) => res.map_err(Into::into),
        }
    };

    if let Err(e) = api.stop().await {
        tracing::warn!(error = %e, "Failed to terminate API process");
    }

    result
}

fn load_config(file_prefix: &str) -> anyhow::Result<MonitorConfig> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("NETWATCH")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.try_deserialize::<MonitorConfig>() {
        Ok(c) => Ok(c),
        Err(_) => Ok(MonitorConfig::default()),
    }
}
