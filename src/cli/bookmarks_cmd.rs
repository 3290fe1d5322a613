//! CLI handler for `prism bookmarks <run> <name>`.

use crate::cli::{output, progress, Connection};
use crate::types::Bookmark;
use anyhow::Result;

pub async fn run(conn: &Connection, run_name: &str, tensor_name: &str) -> Result<()> {
    let provider = conn.provider();
    let mut events = provider.bus().subscribe();
    let spinner = progress::attach(provider.bus());

    let mut bookmarks: Option<Vec<Bookmark>> = None;
    provider
        .retrieve_bookmarks(run_name, tensor_name, |b| bookmarks = Some(b))
        .await;
    spinner.clear();

    let Some(bookmarks) = bookmarks else {
        return Err(super::failure_from(&mut events));
    };

    if output::is_json() {
        output::print_json(&serde_json::to_value(&bookmarks)?);
    } else if bookmarks.is_empty() {
        println!("  No bookmarks.");
    } else {
        println!("  {} bookmarks:\n", bookmarks.len());
        for (i, bookmark) in bookmarks.iter().enumerate() {
            let label = if bookmark.label.is_empty() {
                "(unlabeled)"
            } else {
                &bookmark.label
            };
            println!("  {i:>3}  {label}");
        }
    }
    Ok(())
}
