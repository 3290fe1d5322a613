//! CLI subcommand implementations for the prism binary.

pub mod bookmarks_cmd;
pub mod info_cmd;
pub mod metadata_cmd;
pub mod output;
pub mod progress;
pub mod runs_cmd;
pub mod tensor_cmd;

use crate::events::ProviderEvent;
use crate::provider::ServerDataProvider;
use anyhow::anyhow;
use tokio::sync::broadcast;

/// Where the commands connect: endpoint plus resolved auth token.
pub struct Connection {
    pub endpoint: String,
    pub token: Option<String>,
}

impl Connection {
    pub fn provider(&self) -> ServerDataProvider {
        ServerDataProvider::new(&self.endpoint).with_token(self.token.clone())
    }
}

/// Lift the `token` query parameter off a page URL, the way the embedded
/// viewer reads it from its own location.
pub fn token_from_page_url(page_url: &str) -> Option<String> {
    let parsed = url::Url::parse(page_url).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
}

/// Turn the last `FetchFailed` on the bus into an error for the command to
/// return. The provider reports failures on the bus only, so this is how a
/// command learns why its callback never ran.
pub fn failure_from(events: &mut broadcast::Receiver<ProviderEvent>) -> anyhow::Error {
    let mut last = None;
    while let Ok(event) = events.try_recv() {
        if let ProviderEvent::FetchFailed { what, error } = event {
            last = Some((what, error));
        }
    }
    match last {
        Some((what, error)) => anyhow!("{what}: {error}"),
        None => anyhow!("fetch did not complete"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_page_url() {
        assert_eq!(
            token_from_page_url("http://host:6006/projector?token=abc#panel"),
            Some("abc".to_string())
        );
        assert_eq!(token_from_page_url("http://host:6006/projector"), None);
        assert_eq!(token_from_page_url("not a url"), None);
    }

    #[test]
    fn test_failure_from_picks_last_failure() {
        let bus = crate::events::MessageBus::default();
        let mut rx = bus.subscribe();
        bus.begin("Fetching runs...");
        bus.error("fetching runs", "boom");
        let err = failure_from(&mut rx);
        assert_eq!(err.to_string(), "fetching runs: boom");
    }

    #[test]
    fn test_failure_from_empty_bus() {
        let bus = crate::events::MessageBus::default();
        let mut rx = bus.subscribe();
        assert_eq!(failure_from(&mut rx).to_string(), "fetch did not complete");
    }
}
