//! Bridge the provider's message bus to a terminal spinner.
//!
//! The spinner shows the in-flight fetch message (the analog of the
//! viewer's modal message) and clears itself when the bus reports the
//! fetch finished or failed.

use crate::cli::output;
use crate::events::{MessageBus, ProviderEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

pub struct Spinner {
    bar: ProgressBar,
    task: Option<JoinHandle<()>>,
}

/// Subscribe to the bus and drive a spinner from its events. Hidden in
/// `--quiet` and `--json` modes.
pub fn attach(bus: &MessageBus) -> Spinner {
    let bar = if output::is_quiet() || output::is_json() {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("  {spinner} {msg}")
                .expect("spinner template is valid"),
        );
        bar
    };

    let mut rx = bus.subscribe();
    let b = bar.clone();
    let task = tokio::spawn(async move {
        let mut active: HashMap<u64, String> = HashMap::new();
        loop {
            match rx.recv().await {
                Ok(ProviderEvent::FetchStarted { id, what }) => {
                    b.enable_steady_tick(Duration::from_millis(80));
                    b.set_message(what.clone());
                    active.insert(id, what);
                }
                Ok(ProviderEvent::FetchFinished { id }) => {
                    active.remove(&id);
                    match active.values().next() {
                        Some(message) => b.set_message(message.clone()),
                        None => {
                            b.disable_steady_tick();
                            b.set_message("");
                        }
                    }
                }
                Ok(ProviderEvent::FetchFailed { .. }) => {
                    active.clear();
                    b.disable_steady_tick();
                    b.set_message("");
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    Spinner {
        bar,
        task: Some(task),
    }
}

impl Spinner {
    /// Stop listening and wipe the spinner line.
    pub fn clear(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.bar.finish_and_clear();
    }
}
