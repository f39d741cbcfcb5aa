use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

use qdrant_collection_manager::config::{Config, Overrides};
use qdrant_collection_manager::{Administrator, QdrantClient, StdTerminal};

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive administration of Qdrant collections", long_about = None)]
struct Args {
    /// Qdrant host, with or without scheme (overrides QDRANT_HOST)
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Qdrant HTTP port (overrides QDRANT_PORT)
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Basic auth user (overrides QDRANT_USER)
    #[arg(short = 'u', long)]
    user: Option<String>,

    /// Env file to load instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Only check connectivity and report the number of collections
    #[arg(long)]
    check: bool,
}

fn init_tracing(level: &str) {
    let level = Level::from_str(level).unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    match &args.env_file {
        Some(path) => {
            dotenv::from_path(path)
                .with_context(|| format!("failed to load env file {}", path.display()))?;
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    let overrides = Overrides {
        host: args.host.clone(),
        port: args.port,
        username: args.user.clone(),
    };
    let config = Config::from_env_with(&overrides)?;
    init_tracing(&config.log_level);

    let client = QdrantClient::new(&config.qdrant, &config.admin)?;
    let base_url = client.base_url().clone();
    let terminal = StdTerminal::new().context("failed to attach to the terminal")?;
    let mut admin = Administrator::new(client, terminal, config.admin.clone());

    admin.print_banner(&config.qdrant);
    if !admin.test_connection().await {
        bail!("cannot continue without a connection to Qdrant at {base_url}");
    }

    if args.check {
        admin.report_collection_count().await?;
        return Ok(());
    }

    admin.run().await
}
