use clap::Parser;

use shoreline::Settings;
use shoreline::cli::commands;
use shoreline::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Commands::Init { force } = cli.command {
        commands::init::run_init(force);
        return;
    }

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let config = loaded.unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    });

    shoreline::logging::init_with_config(&config.logging);

    let result = match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Config => {
            commands::init::run_config(&config);
            Ok(())
        }
        Commands::Sync { dry_run } => commands::sync::run(&config, dry_run).await,
        Commands::Query { key, json } => commands::query::run(&config, &key, json),
        Commands::Serve { interval } => commands::serve::run(&config, interval).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
