//! CLI handler for `prism info <run>`.

use crate::cli::{output, progress, Connection};
use crate::types::ProjectorConfig;
use anyhow::Result;

pub async fn run(conn: &Connection, run_name: &str) -> Result<()> {
    let provider = conn.provider();
    let mut events = provider.bus().subscribe();
    let spinner = progress::attach(provider.bus());

    let mut config: Option<ProjectorConfig> = None;
    provider
        .retrieve_projector_config(run_name, |c| config = Some(c))
        .await;
    spinner.clear();

    let Some(config) = config else {
        return Err(super::failure_from(&mut events));
    };

    if output::is_json() {
        output::print_json(&serde_json::to_value(&config)?);
        return Ok(());
    }

    if let Some(path) = &config.model_checkpoint_path {
        println!("  checkpoint: {path}");
    }
    if config.embeddings.is_empty() {
        println!("  No embeddings.");
        return Ok(());
    }
    println!("  {} embeddings:\n", config.embeddings.len());
    println!("  {:<32}  {:<16}  {:<8}  {}", "tensor", "shape", "sprite", "metadata");
    for emb in &config.embeddings {
        let shape = emb
            .tensor_shape
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("x");
        let sprite = if emb.sprite.is_some() { "yes" } else { "-" };
        let metadata = emb.metadata_path.as_deref().unwrap_or("-");
        println!("  {:<32}  {:<16}  {:<8}  {}", emb.tensor_name, shape, sprite, metadata);
    }
    Ok(())
}
