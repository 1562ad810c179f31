//! Dossier server binary.
//!
//! Reads `dossier.toml` (or the path given with `--config`) plus `DOSSIER_*`
//! environment variables, builds an in-memory investigation store and serves
//! the JSON API over HTTP.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use dossier_server::ServerConfig;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Dossier investigation graph server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "dossier.toml")]
  config: PathBuf,

  /// Project file to load at start-up; overrides `autoload_project`.
  #[arg(long)]
  project: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("DOSSIER"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  if cli.project.is_some() {
    server_cfg.autoload_project = cli.project;
  }

  let store = dossier_server::open_store(&server_cfg)
    .await
    .context("failed to open store")?;

  let app = dossier_server::router(store);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
