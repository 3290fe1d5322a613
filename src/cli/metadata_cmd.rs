//! CLI handler for `prism metadata <run> <name>`.

use crate::cli::{output, progress, Connection};
use crate::types::SpriteAndMetadataInfo;
use anyhow::{Context, Result};
use base64::Engine;
use std::path::Path;

pub async fn run(
    conn: &Connection,
    run_name: &str,
    tensor_name: &str,
    out: Option<&Path>,
) -> Result<()> {
    let provider = conn.provider();
    let mut events = provider.bus().subscribe();
    let spinner = progress::attach(provider.bus());

    let mut info: Option<SpriteAndMetadataInfo> = None;
    provider
        .retrieve_sprite_and_metadata(run_name, tensor_name, |i| info = Some(i))
        .await;
    spinner.clear();

    let Some(info) = info else {
        return Err(super::failure_from(&mut events));
    };

    if let (Some(path), Some(image)) = (out, &info.sprite_image) {
        std::fs::write(path, image)
            .with_context(|| format!("writing sprite image to {}", path.display()))?;
        if !output::is_quiet() {
            eprintln!("  sprite image written to {}", path.display());
        }
    }

    if output::is_json() {
        let sprite_b64 = info
            .sprite_image
            .as_ref()
            .map(|image| base64::engine::general_purpose::STANDARD.encode(image));
        output::print_json(&serde_json::json!({
            "run": run_name,
            "name": tensor_name,
            "points": info.points_info.len(),
            "stats": info.stats,
            "spriteMetadata": info.sprite_metadata,
            "spriteImage": sprite_b64,
        }));
        return Ok(());
    }

    if info.stats.is_empty() {
        println!("  No metadata for {tensor_name}.");
    } else {
        println!("  {} points, {} columns:\n", info.points_info.len(), info.stats.len());
        println!("  {:<24}  {:<8}  {:<12}  {}", "column", "numeric", "range", "unique");
        for stat in &info.stats {
            let range = match (stat.min, stat.max) {
                (Some(min), Some(max)) => format!("{min}..{max}"),
                _ => "-".to_string(),
            };
            println!(
                "  {:<24}  {:<8}  {:<12}  {}",
                stat.name,
                if stat.is_numeric { "yes" } else { "no" },
                range,
                stat.num_unique
            );
        }
    }
    if let Some(image) = &info.sprite_image {
        println!("  sprite image: {} bytes", image.len());
    }
    Ok(())
}
