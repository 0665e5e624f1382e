use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use slot_machine_core::{ErrorPolicy, GameSession, Prompter, SpinRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod admin;
mod store;

use store::{SqliteStore, DEFAULT_DATABASE_URL};

#[derive(Parser)]
#[command(name = "slot-machine", about = "Terminal slot machine with a SQLite player ledger")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Database URL, default sqlite://slot_machine.db
    #[arg(long, global = true, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
    /// End the session on the first store failure instead of logging it
    #[arg(long)]
    strict: bool,
    /// Fixed reel seed, for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively (default)
    Play,
    /// View the last N spin records
    History {
        #[arg(long)]
        player: Option<i64>,
        #[arg(short = 'n', default_value_t = 20, value_parser = clap::value_parser!(u32).range(1..))]
        n: u32,
        /// One JSON object per line
        #[arg(long)]
        json: bool,
    },
    /// Export spin records to a CSV file
    ExportCsv {
        path: PathBuf,
        #[arg(long)]
        player: Option<i64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let store = open_store(&cli.database_url).await?;

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => {
            let policy = if cli.strict {
                ErrorPolicy::Abort
            } else {
                ErrorPolicy::Continue
            };
            let mut session = GameSession::new(store, SpinRng::new(cli.seed)).with_policy(policy);
            let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
            let result = session.run(&mut prompter).await;
            session.into_store().close().await;
            let summary = result.context("game session failed")?;
            info!(
                player_id = ?summary.player_id,
                spins = summary.spins,
                balance = summary.balance,
                "goodbye"
            );
        }
        Commands::History { player, n, json } => {
            let outcome = admin::view_history(&store, player, n, json, &mut io::stdout()).await;
            store.close().await;
            outcome?;
        }
        Commands::ExportCsv { path, player } => {
            let outcome = admin::export_csv(&store, player, &path).await;
            store.close().await;
            let total = outcome?;
            println!("Exported {} rows to {}", total, path.display());
        }
    }

    Ok(())
}

// Reported once, by anyhow, when main returns the error.
async fn open_store(url: &str) -> anyhow::Result<SqliteStore> {
    SqliteStore::connect(url)
        .await
        .with_context(|| format!("opening database {url}"))
}

/// Logs go to stderr so they never interleave with the game's prompts.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}
