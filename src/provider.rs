//! Server data provider — HTTP access to a projector backend.
//!
//! One request per operation, results handed to caller-supplied callbacks.
//! Failures go to the [`MessageBus`]; the callback is simply never invoked.
//! The per-run projector config is cached after the first successful fetch
//! and never invalidated for the life of the provider.

use crate::events::MessageBus;
use crate::metadata::{analyze_metadata, parse_metadata};
use crate::params;
use crate::tensor::decode_tensor;
use crate::types::{
    Bookmark, DataSet, EmbeddingInfo, ProjectorConfig, SpriteAndMetadataInfo,
};
use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;
use tracing::debug;

/// Limit for the number of data points requested from the server.
pub const LIMIT_NUM_POINTS: usize = 100_000;

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// How much of an error body to carry into an error message.
const ERROR_BODY_LIMIT: usize = 200;

/// Data provider backed by a projector server (usually serving from a
/// checkpoint file).
pub struct ServerDataProvider {
    /// Route prefix all endpoints hang off, without a trailing slash.
    route_prefix: String,
    /// Auth token injected as `token=` on every request URL.
    token: Option<String>,
    http: reqwest::Client,
    bus: MessageBus,
    config_cache: RwLock<HashMap<String, ProjectorConfig>>,
}

impl ServerDataProvider {
    /// Create a provider for the given route prefix
    /// (e.g. `http://localhost:6006/data/plugin/projector`).
    pub fn new(route_prefix: &str) -> Self {
        Self {
            route_prefix: route_prefix.trim_end_matches('/').to_string(),
            token: None,
            http: build_client(DEFAULT_TIMEOUT),
            bus: MessageBus::default(),
            config_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Set the auth token forwarded on every request. Empty tokens are
    /// treated as absent.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = build_client(timeout);
        self
    }

    /// The message bus this provider reports progress and failures on.
    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    /// List the runs the backend knows about.
    pub async fn retrieve_runs<F>(&self, callback: F)
    where
        F: FnOnce(Vec<String>) + Send,
    {
        let msg = self.bus.begin("Fetching runs...");
        let url = format!("{}/runs", self.route_prefix);
        match self.get_json::<Vec<String>>(&url).await {
            Ok(runs) => {
                self.bus.finish(msg);
                callback(runs);
            }
            Err(err) => self.bus.error("fetching runs", err),
        }
    }

    /// Fetch the projector config for a run. Served from cache after the
    /// first success.
    pub async fn retrieve_projector_config<F>(&self, run: &str, callback: F)
    where
        F: FnOnce(ProjectorConfig) + Send,
    {
        if let Some(config) = self.cached_config(run) {
            callback(config);
            return;
        }
        if let Some(config) = self.fetch_and_cache_config(run).await {
            callback(config);
        }
    }

    /// Look up one embedding of a run by tensor name. The callback receives
    /// `None` when the config has no such embedding.
    pub async fn retrieve_embedding_info<F>(&self, run: &str, tensor_name: &str, callback: F)
    where
        F: FnOnce(Option<EmbeddingInfo>) + Send,
    {
        let Some(config) = self.config(run).await else {
            return;
        };
        callback(config.embedding(tensor_name).cloned());
    }

    /// Fetch and decode the embedding tensor, bounded by
    /// [`LIMIT_NUM_POINTS`] rows.
    pub async fn retrieve_tensor<F>(&self, run: &str, tensor_name: &str, callback: F)
    where
        F: FnOnce(DataSet) + Send,
    {
        let Some(config) = self.config(run).await else {
            return;
        };
        let Some(embedding) = config.embedding(tensor_name).cloned() else {
            self.bus.error(
                "fetching tensor",
                format!("run {run:?} has no embedding named {tensor_name:?}"),
            );
            return;
        };
        let Some(dim) = embedding.dim() else {
            self.bus.error(
                "fetching tensor",
                format!("embedding {tensor_name:?} does not have a 2-D tensor shape"),
            );
            return;
        };

        let msg = self.bus.begin("Fetching tensor values...");
        let url = format!(
            "{}/tensor?run={run}&name={tensor_name}&num_rows={LIMIT_NUM_POINTS}",
            self.route_prefix
        );
        let result = match self.get_bytes(&url).await {
            Ok(bytes) => decode_tensor(&bytes, dim),
            Err(err) => Err(err),
        };
        match result {
            Ok(dataset) => {
                debug!(
                    "tensor {tensor_name} for run {run}: {} x {} values",
                    dataset.dim[0], dataset.dim[1]
                );
                self.bus.finish(msg);
                callback(dataset);
            }
            Err(err) => self.bus.error("fetching tensor", err),
        }
    }

    /// Fetch the metadata TSV and sprite image for an embedding, when the
    /// config declares them. The two requests run concurrently.
    pub async fn retrieve_sprite_and_metadata<F>(&self, run: &str, tensor_name: &str, callback: F)
    where
        F: FnOnce(SpriteAndMetadataInfo) + Send,
    {
        let Some(config) = self.config(run).await else {
            return;
        };
        let Some(embedding) = config.embedding(tensor_name).cloned() else {
            self.bus.error(
                "fetching sprite and metadata",
                format!("run {run:?} has no embedding named {tensor_name:?}"),
            );
            return;
        };

        let metadata_url = embedding.metadata_path.as_ref().map(|_| {
            format!(
                "{}/metadata?run={run}&name={tensor_name}&num_rows={LIMIT_NUM_POINTS}",
                self.route_prefix
            )
        });
        let sprite_url = embedding
            .sprite
            .as_ref()
            .and_then(|s| s.image_path.as_ref())
            .map(|_| format!("{}/sprite_image?run={run}&name={tensor_name}", self.route_prefix));

        let msg = self.bus.begin("Fetching sprite and metadata...");

        let metadata_fut = async {
            match &metadata_url {
                Some(url) => self.get_text(url).await.map(Some),
                None => Ok(None),
            }
        };
        let sprite_fut = async {
            match &sprite_url {
                Some(url) => self.get_bytes(url).await.map(Some),
                None => Ok(None),
            }
        };

        let result: Result<SpriteAndMetadataInfo> = async {
            let (metadata_body, sprite_image) =
                futures::future::try_join(metadata_fut, sprite_fut).await?;
            let mut info = SpriteAndMetadataInfo {
                sprite_image,
                sprite_metadata: embedding.sprite.clone(),
                ..Default::default()
            };
            if let Some(body) = metadata_body {
                let parsed = parse_metadata(&body).context("parsing metadata")?;
                info.stats = analyze_metadata(&parsed);
                info.points_info = parsed.rows;
            }
            Ok(info)
        }
        .await;

        match result {
            Ok(info) => {
                self.bus.finish(msg);
                callback(info);
            }
            Err(err) => self.bus.error("fetching sprite and metadata", err),
        }
    }

    /// Fetch the saved bookmark states for an embedding.
    pub async fn retrieve_bookmarks<F>(&self, run: &str, tensor_name: &str, callback: F)
    where
        F: FnOnce(Vec<Bookmark>) + Send,
    {
        let msg = self.bus.begin("Fetching bookmarks...");
        let url = format!("{}/bookmarks?run={run}&name={tensor_name}", self.route_prefix);
        match self.get_json::<Vec<Bookmark>>(&url).await {
            Ok(bookmarks) => {
                self.bus.finish(msg);
                callback(bookmarks);
            }
            Err(err) => self.bus.error("fetching bookmarks", err),
        }
    }

    // ── Config cache ──────────────────────

    fn cached_config(&self, run: &str) -> Option<ProjectorConfig> {
        self.config_cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(run)
            .cloned()
    }

    /// Cached config lookup, fetching on a miss. Failures are reported to
    /// the bus; `None` means "already reported".
    async fn config(&self, run: &str) -> Option<ProjectorConfig> {
        if let Some(config) = self.cached_config(run) {
            return Some(config);
        }
        self.fetch_and_cache_config(run).await
    }

    async fn fetch_and_cache_config(&self, run: &str) -> Option<ProjectorConfig> {
        let msg = self.bus.begin("Fetching projector config...");
        let url = format!("{}/info?run={run}", self.route_prefix);
        match self.get_json::<ProjectorConfig>(&url).await {
            Ok(config) => {
                self.bus.finish(msg);
                self.config_cache
                    .write()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .insert(run.to_string(), config.clone());
                Some(config)
            }
            Err(err) => {
                self.bus.error("fetching projector config", err);
                None
            }
        }
    }

    // ── HTTP plumbing ─────────────────────

    /// Inject the auth token into a request URL, when one is configured.
    fn authorized(&self, url: &str) -> String {
        match &self.token {
            Some(token) => params::add_parameter(url, "token", token),
            None => url.to_string(),
        }
    }

    async fn get_checked(&self, url: &str) -> Result<reqwest::Response> {
        let url = self.authorized(url);
        debug!("GET {url}");
        let resp = self.http.get(&url).send().await.context("request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body: String = body.chars().take(ERROR_BODY_LIMIT).collect();
            let body = body.trim();
            if body.is_empty() {
                bail!("server returned {status}");
            }
            bail!("server returned {status}: {body}");
        }
        Ok(resp)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get_checked(url)
            .await?
            .json::<T>()
            .await
            .context("parsing response")
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        self.get_checked(url)
            .await?
            .text()
            .await
            .context("reading response body")
    }

    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        Ok(self
            .get_checked(url)
            .await?
            .bytes()
            .await
            .context("reading response body")?
            .to_vec())
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_prefix_trailing_slash_trimmed() {
        let provider = ServerDataProvider::new("http://localhost:6006/data/");
        assert_eq!(provider.route_prefix, "http://localhost:6006/data");
    }

    #[test]
    fn test_token_injected_into_urls() {
        let provider =
            ServerDataProvider::new("/data").with_token(Some("secret".to_string()));
        assert_eq!(provider.authorized("/data/runs"), "/data/runs?token=secret");
        assert_eq!(
            provider.authorized("/data/info?run=train"),
            "/data/info?run=train&token=secret"
        );
    }

    #[test]
    fn test_no_token_leaves_url_unchanged() {
        let provider = ServerDataProvider::new("/data");
        assert_eq!(provider.authorized("/data/runs"), "/data/runs");
    }

    #[test]
    fn test_empty_token_treated_as_absent() {
        let provider = ServerDataProvider::new("/data").with_token(Some(String::new()));
        assert_eq!(provider.authorized("/data/runs"), "/data/runs");
    }
}
