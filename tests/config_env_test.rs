use shoreline::Settings;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_env_override() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("settings.toml");
    fs::write(
        &config_path,
        "[schedule]\ninterval_secs = 600\n\n[harvester]\npath = \"beaches.json\"\n",
    )
    .unwrap();

    unsafe {
        // Double underscore separates nesting levels; single underscores
        // stay in the field name.
        env::set_var("SHORELINE_SCHEDULE__INTERVAL_SECS", "120");
        env::set_var("SHORELINE_HARVESTER__URL", "https://example.org/beaches.json");
        env::set_var("SHORELINE_INDEX__MAX_RESULTS", "3");
    }

    let settings = Settings::load_from(&config_path).unwrap();

    unsafe {
        env::remove_var("SHORELINE_SCHEDULE__INTERVAL_SECS");
        env::remove_var("SHORELINE_HARVESTER__URL");
        env::remove_var("SHORELINE_INDEX__MAX_RESULTS");
    }

    assert_eq!(settings.schedule.interval_secs, 120, "env beats file");
    assert_eq!(
        settings.harvester.url.as_deref(),
        Some("https://example.org/beaches.json")
    );
    assert_eq!(settings.index.max_results, 3);

    // Untouched values come from the file or defaults.
    assert_eq!(
        settings.harvester.path.as_deref(),
        Some(std::path::Path::new("beaches.json"))
    );
    assert!(settings.schedule.run_on_start);
}
