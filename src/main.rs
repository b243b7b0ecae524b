use clap::{Parser, Subcommand};
use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

mod init;
mod output;
mod scrape;
mod show;
mod telemetry;
mod util;

use output::config::{OutputConfig, OutputFormat};
use scrape::fetch::{FetchConfig, Fetcher};
use show::db::SqliteShowStore;

#[derive(Parser)]
#[command(name = "show", about = "Track the shows you are watching")]
struct Cli {
    /// Database URL (defaults to DATABASE_URL, then sqlite://shows.db)
    #[arg(global = true, long)]
    db: Option<String>,
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,
    /// Give up on a title page after this many seconds
    #[arg(global = true, long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape a title page and add the show
    Add(scrape::AddCmd),
    /// List tracked shows
    Ls,
    /// Show one tracked show
    Get(show::GetCmd),
    /// Update season/episode progress
    Edit(show::EditCmd),
    /// Stop tracking a show
    Rm(show::RmCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json || OutputConfig::from_env().format == OutputFormat::Json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and SHOW_LOG_FORMAT
    telemetry::config::init_tracing();
    let dsn = cli
        .db
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| init::DEFAULT_DSN.to_string());

    let pool = init::open_pool(&dsn).await?;
    let store = SqliteShowStore::new(pool);

    match cli.command {
        Commands::Add(args) => {
            let mut cfg = FetchConfig::from_env();
            if let Some(secs) = cli.timeout_secs { cfg.timeout = Duration::from_secs(secs); }
            let fetcher = Fetcher::new(&cfg).context("build http client")?;
            scrape::run(&store, &fetcher, args).await?
        }
        Commands::Ls => show::ls(&store).await?,
        Commands::Get(args) => show::get(&store, args).await?,
        Commands::Edit(args) => show::edit(&store, args).await?,
        Commands::Rm(args) => show::rm(&store, args).await?,
    }

    Ok(())
}
