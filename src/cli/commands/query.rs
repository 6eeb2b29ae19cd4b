//! Query command.

use crate::config::Settings;
use crate::store::{QueryResult, QueryRouter};

pub fn run(config: &Settings, key: &str, json: bool) -> anyhow::Result<()> {
    // Lookups need only the index, not a dataset source.
    let router = QueryRouter::new(super::open_engine(config)?);
    let result = router.query(key);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(key, &result)?;
    }

    Ok(())
}

fn print_result(key: &str, result: &QueryResult) -> anyhow::Result<()> {
    if result.is_empty() {
        println!("No matches for '{key}'");
        return Ok(());
    }

    println!(
        "{} match(es) for '{key}' in {}:",
        result.matches.len(),
        result.collection
    );
    for (i, m) in result.matches.iter().enumerate() {
        let marker = if m.exact { "exact" } else { "fuzzy" };
        println!("\n{}. [{marker}] score {:.3}", i + 1, m.score);
        println!("{}", serde_json::to_string_pretty(&m.content)?);
    }

    Ok(())
}
