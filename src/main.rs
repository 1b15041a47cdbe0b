//! Social Graph - Main Server
//!
//! Serves the social graph HTTP API over Neo4j.

use anyhow::Result;
use clap::{Parser, Subcommand};
use social_graph::{AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "social-graph")]
#[command(about = "Social graph query and ranking server")]
struct Cli {
    /// Path to the YAML config file (default: ./config.yaml)
    #[arg(short, long, global = true, env = "SOCIAL_GRAPH_CONFIG")]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the connection degree between two users
    Degree {
        /// Viewing user id
        viewer: Uuid,
        /// Target user id
        target: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,social_graph=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_yaml_and_env(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server_port = port;
            }
            social_graph::start_server(config).await
        }
        Commands::Degree { viewer, target } => run_degree(config, viewer, target).await,
    }
}

async fn run_degree(config: Config, viewer: Uuid, target: Uuid) -> Result<()> {
    let state = AppState::new(config).await?;
    let degree = state.engine.degree().degree(viewer, target).await?;
    tracing::info!(%viewer, %target, degree, "Connection degree");
    println!("{}", degree);
    Ok(())
}
