//! CLI handler for `prism tensor <run> <name>`.

use crate::cli::{output, progress, Connection};
use crate::types::DataSet;
use anyhow::Result;

pub async fn run(conn: &Connection, run_name: &str, tensor_name: &str) -> Result<()> {
    let provider = conn.provider();
    let mut events = provider.bus().subscribe();
    let spinner = progress::attach(provider.bus());

    let mut dataset: Option<DataSet> = None;
    provider
        .retrieve_tensor(run_name, tensor_name, |ds| dataset = Some(ds))
        .await;
    spinner.clear();

    let Some(dataset) = dataset else {
        return Err(super::failure_from(&mut events));
    };

    if output::is_json() {
        let sample: Vec<f32> = dataset
            .points
            .first()
            .map(|p| p.vector.iter().take(8).copied().collect())
            .unwrap_or_default();
        output::print_json(&serde_json::json!({
            "run": run_name,
            "name": tensor_name,
            "points": dataset.dim[0],
            "dim": dataset.dim[1],
            "sample": sample,
        }));
        return Ok(());
    }

    println!(
        "  {} points x {} dims for {tensor_name} ({run_name})",
        dataset.dim[0], dataset.dim[1]
    );
    if let Some(first) = dataset.points.first() {
        let preview = first
            .vector
            .iter()
            .take(8)
            .map(|v| format!("{v:.4}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  first vector: [{preview}, ...]");
    }
    Ok(())
}
