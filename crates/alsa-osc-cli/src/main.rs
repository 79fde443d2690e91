//! alsa-osc - control ALSA mixer parameters over OSC
//!
//! Discovers every sound card and mixer control, publishes volume, mute and
//! record-arm endpoints under an OSC address root, and applies incoming
//! messages to the mixer.

use alsa_osc_core::{discover, Actuator, Root, RouteTable, Snapshot, DEFAULT_OSC_PORT};
use alsa_osc_mixer::DryRunActuator;
use alsa_osc_server::{osc::parse_value, OscSender, OscServer, OscServerConfig};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod listing;

use config::Config;

/// alsa-osc - ALSA mixer control over Open Sound Control
#[derive(Parser)]
#[command(name = "alsa-osc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "ALSA_OSC_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover mixer controls and serve them over OSC (default)
    Serve(ServeArgs),

    /// Print the routes that would be served, then exit
    Routes {
        /// OSC address root
        #[arg(short, long)]
        root: Option<String>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send one OSC message to a running server
    Send {
        /// OSC address, e.g. "/alsa/interface/USB Audio CODEC/PCM"
        address: String,

        /// Value: true/false, an integer or a float
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Server host
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Server port
        #[arg(short, long, default_value_t = DEFAULT_OSC_PORT)]
        port: u16,
    },

    /// Show version and defaults
    Info,
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// UDP port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// OSC address root
    #[arg(short, long)]
    root: Option<String>,

    /// Log mixer changes instead of applying them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    setup_logging(level, cli.json_logs || config.logging.json)?;

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => serve(&config, args).await?,

        Commands::Routes { root, json } => {
            let root = resolve_root(root.as_deref(), &config)?;
            let snapshot = take_snapshot()?;

            let table = RouteTable::build(&root, &snapshot);

            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                print!("{}", listing::render(&table, &snapshot));
            }
        }

        Commands::Send {
            address,
            value,
            host,
            port,
        } => {
            let value = parse_value(&value);
            let sender = OscSender::connect(&format!("{}:{}", host, port)).await?;
            sender.send(&address, &value).await?;

            println!(
                "{} {} <- {} ({})",
                "Sent".green().bold(),
                address.yellow(),
                value,
                sender.remote()
            );
        }

        Commands::Info => print_info(&config),
    }

    Ok(())
}

fn setup_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Failed to parse log level")?;

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).compact())
            .init();
    }

    Ok(())
}

fn resolve_root(flag: Option<&str>, config: &Config) -> Result<Root> {
    match flag {
        Some(root) => Root::parse(root).context("Invalid --root"),
        None => Ok(config.server.root.clone()),
    }
}

#[cfg(feature = "alsa")]
fn take_snapshot() -> Result<Snapshot> {
    discover(&alsa_osc_mixer::AlsaMixer::new()).context("Failed to enumerate sound cards")
}

#[cfg(not(feature = "alsa"))]
fn take_snapshot() -> Result<Snapshot> {
    warn!("Built without ALSA support; no sound cards available");
    discover(&NoCards).context("Failed to enumerate sound cards")
}

#[cfg(not(feature = "alsa"))]
struct NoCards;

#[cfg(not(feature = "alsa"))]
impl alsa_osc_core::Enumerator for NoCards {
    fn cards(&self) -> alsa_osc_core::Result<Vec<alsa_osc_core::CardInfo>> {
        Ok(Vec::new())
    }

    fn controls(
        &self,
        _card: &alsa_osc_core::CardInfo,
    ) -> alsa_osc_core::Result<Vec<alsa_osc_core::ControlDescriptor>> {
        Ok(Vec::new())
    }
}

fn make_actuator(dry_run: bool) -> Result<Arc<dyn Actuator>> {
    if dry_run {
        return Ok(Arc::new(DryRunActuator));
    }

    #[cfg(feature = "alsa")]
    {
        Ok(Arc::new(alsa_osc_mixer::AlsaMixer::new()))
    }

    #[cfg(not(feature = "alsa"))]
    {
        anyhow::bail!("Built without ALSA support; rerun with --dry-run or rebuild with --features alsa")
    }
}

async fn serve(config: &Config, args: ServeArgs) -> Result<()> {
    let root = resolve_root(args.root.as_deref(), config)?;
    let bind = args.bind.unwrap_or_else(|| config.server.bind.clone());
    let port = args.port.unwrap_or(config.server.port);
    let actuator = make_actuator(args.dry_run)?;

    let snapshot = take_snapshot()?;
    let routes = Arc::new(RouteTable::build(&root, &snapshot));

    println!("{}", "Creating OSC routes for ALSA controls:".cyan().bold());
    print!("{}", listing::render(&routes, &snapshot));
    if routes.is_empty() {
        warn!("No mixer controls found; serving an empty route table");
    }
    info!(
        "{} routes for {} controls on {} cards",
        routes.len(),
        snapshot.control_count(),
        snapshot.cards.len()
    );

    let server = OscServer::bind(&OscServerConfig::new(&bind, port), routes, actuator)
        .await
        .context("Failed to start OSC server")?;

    println!(
        "{} Serving OSC on {}{}",
        "OK".green().bold(),
        server.local_addr()?,
        if args.dry_run { " (dry run)" } else { "" }
    );
    println!("  Press Ctrl+C to stop");

    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal"),
            Err(e) => warn!("Failed to listen for ctrl+c: {}", e),
        }
        let _ = shutdown_tx.send(()).await;
    });

    server.serve(&mut shutdown_rx).await?;

    let stats = server.stats();
    info!(
        "Served {} datagrams: {} routed, {} unmapped, {} rejected, {} failed, {} undecodable",
        stats.datagrams, stats.routed, stats.unmapped, stats.rejected, stats.failed, stats.decode_errors
    );
    println!("{}", "Server stopped".yellow());

    Ok(())
}

fn print_info(config: &Config) {
    println!(
        "{}",
        "alsa-osc - ALSA mixer control over Open Sound Control"
            .cyan()
            .bold()
    );
    println!();
    println!("Version:    {}", env!("CARGO_PKG_VERSION"));
    println!("Platform:   {}", std::env::consts::OS);
    println!("ALSA:       {}", if cfg!(feature = "alsa") { "enabled" } else { "disabled" });
    println!();
    println!("{}", "Effective settings:".green());
    println!("  Bind:     {}:{}", config.server.bind, config.server.port);
    println!("  Root:     {}", config.server.root);
    match Config::default_path() {
        Some(path) => println!("  Config:   {}", path.display()),
        None => println!("  Config:   (no config directory)"),
    }
    println!();
    println!("{}", "Routes:".green());
    println!("  <root>/<card>/<control>            volume 0.0-1.0");
    println!("  <root>/<card>/<control>/CH<n>      volume of channel n");
    println!("  <root>/<card>/<control>/dB         volume in dB");
    println!("  <root>/<card>/<control>/dB/CH<n>   channel n in dB");
    println!("  <root>/<card>/<control>/mute       true to mute, false to unmute");
    println!("  <root>/<card>/<control>/rec        true to arm, false to disarm");
    println!();
    println!("{}", "Examples:".green());
    println!("  alsa-osc serve --port 8000");
    println!("  alsa-osc routes --json");
    println!("  alsa-osc send \"/alsa/interface/USB Audio CODEC/PCM\" 0.86");
    println!("  alsa-osc send \"/alsa/interface/USB Audio CODEC/PCM/mute\" true");
}
