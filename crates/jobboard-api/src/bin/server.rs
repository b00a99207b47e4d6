//! jobboard server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) overlaid with
//! `JOBBOARD_*` environment variables, opens the SQLite store, and serves the
//! JSON API over HTTP.
//!
//! # Access tokens
//!
//! To mint a bearer token signed with the configured `jwt_secret`:
//!
//! ```sh
//! cargo run -p jobboard-api --bin server -- --issue-token user-1
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use jobboard_api::{AppState, ServerConfig, auth::JwtVerifier};
use jobboard_core::manager::PostingManager;
use jobboard_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Job board API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print a signed access token for SUBJECT and exit.
  #[arg(long, value_name = "SUBJECT")]
  issue_token: Option<String>,

  /// Display name embedded in the issued token.
  #[arg(long, requires = "issue_token")]
  token_username: Option<String>,

  /// Lifetime of the issued token, in hours.
  #[arg(long, default_value_t = 24)]
  token_ttl_hours: i64,
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
    .add_source(config::Environment::with_prefix("JOBBOARD"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Helper mode: mint a token and exit.
  if let Some(subject) = cli.issue_token {
    let ttl = chrono::TimeDelta::try_hours(cli.token_ttl_hours)
      .context("--token-ttl-hours is out of range")?;
    let token = server_cfg
      .jwt()
      .issue(&subject, cli.token_username, ttl)
      .context("failed to issue token")?;
    println!("{token}");
    return Ok(());
  }

  let store_path = expand_tilde(&server_cfg.store_path);

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let manager = PostingManager::new(store, JwtVerifier::new(&server_cfg.jwt()))
    .with_missing_id_policy(server_cfg.upsert_missing_id);
  tracing::info!(policy = ?server_cfg.upsert_missing_id, "upsert without id");

  let app = jobboard_api::router(AppState::new(manager));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
