//! CLI handler for `prism runs`.

use crate::cli::{output, progress, Connection};
use anyhow::Result;

pub async fn run(conn: &Connection) -> Result<()> {
    let provider = conn.provider();
    let mut events = provider.bus().subscribe();
    let spinner = progress::attach(provider.bus());

    let mut runs: Option<Vec<String>> = None;
    provider.retrieve_runs(|r| runs = Some(r)).await;
    spinner.clear();

    let Some(runs) = runs else {
        return Err(super::failure_from(&mut events));
    };

    if output::is_json() {
        output::print_json(&serde_json::json!({ "runs": runs }));
    } else if runs.is_empty() {
        println!("  No runs.");
    } else {
        for run in &runs {
            println!("  {run}");
        }
    }
    Ok(())
}
