mod config;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use server::config::MapPoolConfig;
use server::state::{AppState, MapPoolStore};
use server::{create_router, sweeper};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veto_core::VetoFormat;

use crate::config::{VetoConfig, CONFIG_FILE, DEFAULT_MAPS};

#[derive(Parser)]
#[command(name = "map-veto")]
#[command(about = "Turn-based map veto service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Service config file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and map pool to the current directory
    Init,
    /// Run the HTTP API
    Serve {
        #[arg(short, long)]
        port: Option<u16>,

        /// Cancel vetoes idle for this many seconds
        #[arg(long)]
        idle_timeout: Option<u64>,
    },
    /// Inspect or edit the map pool
    Maps {
        #[command(subcommand)]
        command: MapsCommand,
    },
    /// List the supported veto formats
    Formats,
}

#[derive(Subcommand)]
enum MapsCommand {
    List,
    Replace { old_map: String, new_map: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = VetoConfig::load(&cli.config).await?;

    match cli.command {
        Some(Commands::Init) => init(&cli.config).await,
        Some(Commands::Serve { port, idle_timeout }) => serve(config, port, idle_timeout).await,
        Some(Commands::Maps { command }) => maps(config, command).await,
        Some(Commands::Formats) => {
            formats();
            Ok(())
        }
        None => serve(config, None, None).await,
    }
}

async fn init(config_path: &Path) -> Result<()> {
    let config = if config_path.exists() {
        println!("Config already present at {}", config_path.display());
        VetoConfig::load(config_path).await?
    } else {
        let config = VetoConfig::default();
        config.write(config_path).await?;
        println!("Created {}", config_path.display());
        config
    };

    let pool_path = &config.pool.path;
    if pool_path.exists() {
        println!("Map pool already present at {}", pool_path.display());
    } else {
        MapPoolConfig::new(DEFAULT_MAPS.iter().map(|m| m.to_string()).collect())
            .write(pool_path)
            .await
            .context("Failed to write default map pool")?;
        println!("Created {}", pool_path.display());
    }

    println!();
    println!("Next steps:");
    println!("  1. Edit {} to set the map pool", pool_path.display());
    println!("  2. Run 'map-veto serve' to start the API");

    Ok(())
}

async fn serve(config: VetoConfig, port: Option<u16>, idle_timeout: Option<u64>) -> Result<()> {
    init_tracing();

    let port = port.unwrap_or(config.server.port);
    let idle_timeout = idle_timeout.or(config.veto.idle_timeout_secs);

    let state = AppState::load(&config.pool.path)
        .await
        .with_context(|| {
            format!(
                "Failed to load map pool from {} (run 'map-veto init' first?)",
                config.pool.path.display()
            )
        })?
        .with_organizers(config.veto.organizers.iter().copied());

    tracing::info!(path = %config.pool.path.display(), "Map pool loaded");

    if config.veto.organizers.is_empty() {
        tracing::warn!("No organizers configured, anyone can start or cancel vetoes");
    } else {
        tracing::info!(organizers = config.veto.organizers.len(), "Organizer list loaded");
    }

    if let Some(secs) = idle_timeout.filter(|secs| *secs > 0) {
        sweeper::spawn_idle_sweeper(state.registry.clone(), Duration::from_secs(secs));
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    println!();
    println!("{}", "Map Veto".bold());
    println!("════════════════════════════════════════");
    println!();
    println!("  API Server:  http://localhost:{}", port);
    println!("  Swagger UI:  http://localhost:{}/swagger-ui", port);
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn maps(config: VetoConfig, command: MapsCommand) -> Result<()> {
    let store = MapPoolStore::load(&config.pool.path)
        .await
        .with_context(|| format!("Failed to load map pool from {}", config.pool.path.display()))?;

    match command {
        MapsCommand::List => {
            let pool = store.current().await;
            println!("Maps ({}):", pool.len());
            for map in pool.maps() {
                println!("  {}", map);
            }
        }
        MapsCommand::Replace { old_map, new_map } => {
            let (old, new, _) = store
                .replace(&old_map, &new_map)
                .await
                .context("Failed to replace map")?;
            println!("{} Replaced {} with {}", "✓".green(), old, new.bold());
        }
    }

    Ok(())
}

fn formats() {
    for format in VetoFormat::ALL {
        println!("  {}  {}", format.size().to_string().bold(), format.description());
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "map_veto=info,server=info,registry=info,tower_http=info".into()
            }),
        )
        .init();
}
