//! Data model for projector backend responses.
//!
//! The backend serializes its configuration with camelCase keys
//! (`tensorName`, `metadataPath`, ...), so every config type carries a
//! `rename_all` attribute.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-run configuration describing the embeddings a backend can serve.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectorConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_checkpoint_path: Option<String>,
    #[serde(default)]
    pub embeddings: Vec<EmbeddingInfo>,
}

impl ProjectorConfig {
    /// Find the embedding with the given tensor name, if any.
    pub fn embedding(&self, tensor_name: &str) -> Option<&EmbeddingInfo> {
        self.embeddings.iter().find(|e| e.tensor_name == tensor_name)
    }
}

/// One embedding a backend serves: the tensor plus optional metadata and
/// sprite descriptors.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingInfo {
    pub tensor_name: String,
    /// `[num_points, dim]` for 2-D embedding tensors.
    #[serde(default)]
    pub tensor_shape: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tensor_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmarks_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<SpriteMetadata>,
}

impl EmbeddingInfo {
    /// Width of one embedding vector, when the shape carries one.
    pub fn dim(&self) -> Option<usize> {
        self.tensor_shape.get(1).copied()
    }
}

/// Sprite sheet descriptor attached to an embedding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpriteMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
    /// `[width, height]` of a single sprite cell.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_image_dim: Option<[u32; 2]>,
}

/// One embedding vector with its position in the tensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPoint {
    pub vector: Vec<f32>,
    pub index: usize,
    /// Per-point metadata columns, filled in by callers that merge metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A decoded tensor: points plus the `[rows, dim]` it was decoded as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSet {
    pub points: Vec<DataPoint>,
    pub dim: [usize; 2],
}

impl DataSet {
    pub fn new(points: Vec<DataPoint>, dim: usize) -> Self {
        let rows = points.len();
        Self {
            points,
            dim: [rows, dim],
        }
    }
}

/// Summary statistics for one metadata column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    /// True when every non-empty value in the column parses as a number.
    pub is_numeric: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub num_unique: usize,
}

/// Everything the sprite-and-metadata fetch produces: parsed metadata rows,
/// their column stats, and the raw sprite image when the embedding has one.
#[derive(Debug, Clone, Default)]
pub struct SpriteAndMetadataInfo {
    pub stats: Vec<ColumnStats>,
    pub points_info: Vec<HashMap<String, String>>,
    pub sprite_image: Option<Vec<u8>>,
    pub sprite_metadata: Option<SpriteMetadata>,
}

/// A saved projector state. Only the label is interpreted here; the rest of
/// the state rides along untouched for the UI layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bookmark {
    #[serde(default)]
    pub label: String,
    #[serde(flatten)]
    pub state: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses_camel_case() {
        let json = r#"{
            "modelCheckpointPath": "/ckpt/model",
            "embeddings": [{
                "tensorName": "word_embedding",
                "tensorShape": [10000, 128],
                "metadataPath": "meta.tsv",
                "sprite": {"imagePath": "sprite.png", "singleImageDim": [28, 28]}
            }]
        }"#;
        let config: ProjectorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.model_checkpoint_path.as_deref(),
            Some("/ckpt/model")
        );
        let emb = config.embedding("word_embedding").unwrap();
        assert_eq!(emb.dim(), Some(128));
        assert_eq!(emb.metadata_path.as_deref(), Some("meta.tsv"));
        let sprite = emb.sprite.as_ref().unwrap();
        assert_eq!(sprite.single_image_dim, Some([28, 28]));
    }

    #[test]
    fn test_embedding_lookup_misses() {
        let config = ProjectorConfig::default();
        assert!(config.embedding("nope").is_none());
    }

    #[test]
    fn test_minimal_embedding() {
        // Backends may omit everything but the tensor name.
        let emb: EmbeddingInfo =
            serde_json::from_str(r#"{"tensorName": "bias"}"#).unwrap();
        assert_eq!(emb.tensor_name, "bias");
        assert!(emb.tensor_shape.is_empty());
        assert_eq!(emb.dim(), None);
        assert!(emb.sprite.is_none());
    }

    #[test]
    fn test_bookmark_keeps_unknown_state() {
        let json = r#"{"label": "cluster-7", "cameraDef": {"zoom": 2.5}, "selectedPoints": [1, 2]}"#;
        let bookmark: Bookmark = serde_json::from_str(json).unwrap();
        assert_eq!(bookmark.label, "cluster-7");
        assert!(bookmark.state.contains_key("cameraDef"));
        assert!(bookmark.state.contains_key("selectedPoints"));

        // Round-trips with the extra state intact.
        let back = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(back["cameraDef"]["zoom"], 2.5);
    }
}
