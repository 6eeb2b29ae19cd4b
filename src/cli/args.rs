//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Keep a harvested dataset searchable
#[derive(Parser, Debug)]
#[command(
    name = "shoreline",
    version = env!("CARGO_PKG_VERSION"),
    about = "Harvest regions and their sub-entities into a fuzzy index",
    long_about = "Harvest a region/sub-entity dataset, rewrite the `regions` and \
                  `entities` collections when it changes, and answer fuzzy lookups.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true, env = "SHORELINE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set up .shoreline/settings.toml
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Display active settings
    Config,

    /// Run the pipeline once
    Sync {
        /// Harvest and build documents without writing the index
        #[arg(long)]
        dry_run: bool,
    },

    /// Look a key up in regions, falling back to entities
    Query {
        /// Region name, entity name or "region entity"
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the pipeline on a fixed interval until interrupted
    Serve {
        /// Seconds between runs (overrides config)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_with_global_config() {
        let cli = Cli::try_parse_from([
            "shoreline",
            "query",
            "Ilha Porchat",
            "--json",
            "-c",
            "/tmp/settings.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/settings.toml")));
        match cli.command {
            Commands::Query { key, json } => {
                assert_eq!(key, "Ilha Porchat");
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_sync_dry_run() {
        let cli = Cli::try_parse_from(["shoreline", "sync", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Commands::Sync { dry_run: true }));
    }
}
