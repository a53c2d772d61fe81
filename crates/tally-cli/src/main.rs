use clap::Parser;

mod cli;
mod commands;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("tally error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let config = tally_config::TallyConfig::load_with_dotenv()?;

    // Resolve is pure; it never needs the database.
    if let cli::Commands::Resolve(args) = &cli.command {
        return commands::resolve::handle(args, &config);
    }

    let db_path = cli.db.clone().unwrap_or_else(|| config.database.path.clone());
    ensure_parent_dir(&db_path)?;
    tracing::debug!(path = %db_path, "opening ledger database");
    let service = tally_db::service::LedgerService::new_local(&db_path).await?;

    match cli.command {
        cli::Commands::Attendance { action } => {
            commands::attendance::handle(&action, &service, &config).await
        }
        cli::Commands::Grade { action } => {
            commands::grade::handle(&action, &service, &config).await
        }
        cli::Commands::Resolve(_) => unreachable!("resolve is pre-dispatched above"),
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_env("TALLY_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Create the database's parent directory if the default `.tally/` path is used.
fn ensure_parent_dir(db_path: &str) -> anyhow::Result<()> {
    if db_path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = std::path::Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
