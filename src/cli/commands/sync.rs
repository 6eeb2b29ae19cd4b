//! Sync command: one pipeline pass.

use crate::config::Settings;
use crate::store::RunOutcome;

pub async fn run(config: &Settings, dry_run: bool) -> anyhow::Result<()> {
    let store = super::open_store(config)?;

    if dry_run {
        let documents = store.scrape_and_transform().await?;
        println!(
            "Dry run: {} regions, {} entities (index not touched)",
            documents.regions.len(),
            documents.entities.len()
        );
        return Ok(());
    }

    match store.run_once().await? {
        RunOutcome::Synced { regions, entities } => {
            println!("Synced {regions} regions and {entities} entities");
        }
        RunOutcome::Unchanged => println!("Dataset unchanged, nothing written"),
        RunOutcome::Skipped => println!("Another run is in progress"),
    }

    Ok(())
}
