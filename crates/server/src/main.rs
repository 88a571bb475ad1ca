use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use namefind_common::config::{default_config_path, parse_server_config, ServerAppConfig};
use namefind_server::{db, import_csv, router, AppState, DB_FILE};

#[derive(Parser)]
#[command(name = "namefind-server", about = "Fuzzy person-name search service")]
struct Args {
    /// Path to server config file
    #[arg(long, env = "NAMEFIND_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Import records from a CSV file into the database and exit
    Import {
        /// CSV file (case-register or flat `name,...` layout)
        csv: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    namefind_common::logging::init("namefind_server=info,namefind_common=info,tower_http=info");

    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(default_config_path);
    let config_str = std::fs::read_to_string(&config_path)
        .with_context(|| format!("reading config: {config_path}"))?;
    let config = parse_server_config(&config_str)?;

    if let Err(e) = namefind_common::logging::set_ignore_patterns(&config.log.ignore) {
        tracing::warn!("invalid log ignore pattern: {e}");
    }

    match args.command {
        Some(Command::Import { csv }) => run_import(&config, &csv),
        None => serve(config).await,
    }
}

fn run_import(config: &ServerAppConfig, csv: &std::path::Path) -> Result<()> {
    let data_dir = PathBuf::from(&config.server.data_dir);
    std::fs::create_dir_all(&data_dir).context("creating data directory")?;
    let conn = db::open(&data_dir.join(DB_FILE))?;
    let inserted = import_csv(&conn, csv)?;
    tracing::info!("imported {inserted} records from {}", csv.display());
    Ok(())
}

async fn serve(config: ServerAppConfig) -> Result<()> {
    let bind = config.server.bind.clone();
    let state = Arc::new(AppState::open(config)?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding to {bind}"))?;

    tracing::info!("listening on {bind}");
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
