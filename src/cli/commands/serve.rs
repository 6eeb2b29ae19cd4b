//! Serve command: scheduled runs until Ctrl+C.

use anyhow::Context;

use crate::config::Settings;
use crate::scheduler::{Scheduler, SchedulerHandle};

/// Open the store and start the scheduler.
///
/// With `run_on_start`, the first run happens before this returns and its
/// failure is the command's failure.
pub async fn start(config: &Settings, interval: Option<u64>) -> anyhow::Result<SchedulerHandle> {
    let store = super::open_store(config)?;

    let mut schedule = config.schedule.clone();
    if let Some(secs) = interval {
        schedule.interval_secs = secs;
    }

    eprintln!(
        "Syncing every {}s into {}",
        schedule.interval_secs,
        config.index_path.display()
    );

    if !schedule.run_on_start {
        return Ok(Scheduler::start(store, &schedule));
    }

    let (outcome, handle) = Scheduler::start_with_initial_run(store, &schedule)
        .await
        .context("initial sync failed")?;
    eprintln!("Initial sync: {outcome:?}");
    Ok(handle)
}

pub async fn run(config: &Settings, interval: Option<u64>) -> anyhow::Result<()> {
    let handle = start(config, interval).await?;
    eprintln!("Running (Ctrl+C to stop)");

    tokio::signal::ctrl_c().await?;
    eprintln!("Received shutdown signal");

    let status = handle.stop().await;
    eprintln!(
        "Stopped after {} run(s), {} failed, {} tick(s) dropped",
        status.runs, status.failures, status.dropped_ticks
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(temp_dir: &TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.index_path = temp_dir.path().join("index");
        settings.harvester.path = Some(temp_dir.path().join("beaches.json"));
        settings
    }

    #[tokio::test]
    async fn test_start_fails_when_initial_sync_fails() {
        let temp_dir = TempDir::new().unwrap();
        // No dataset file: the first harvest fails.
        let settings = settings(&temp_dir);

        let err = start(&settings, None).await.unwrap_err();
        assert!(format!("{err:#}").contains("initial sync failed"), "{err:#}");
    }

    #[tokio::test]
    async fn test_start_syncs_before_returning() {
        let temp_dir = TempDir::new().unwrap();
        let settings = settings(&temp_dir);
        std::fs::write(
            temp_dir.path().join("beaches.json"),
            r#"{"Santos": [{"name": "Gonzaga"}]}"#,
        )
        .unwrap();

        let handle = start(&settings, Some(3600)).await.unwrap();
        assert!(temp_dir.path().join("index/regions/collection.json").exists());
        assert!(temp_dir.path().join("index/entities/collection.json").exists());

        let status = handle.stop().await;
        assert_eq!(status.runs, 0, "no scheduled tick within the first interval");
    }
}
