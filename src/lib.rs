// Copyright 2026 Prism Contributors
// SPDX-License-Identifier: Apache-2.0

//! Prism client library — data access for an embedding-projector backend.
//!
//! The library fetches visualization data (runs, embedding configuration,
//! tensors, metadata, sprite images, bookmarks) over HTTP and hands results
//! to caller-supplied callbacks. Progress and failures flow through a
//! broadcast [`events::MessageBus`] rather than typed error returns.

pub mod cli;
pub mod events;
pub mod metadata;
pub mod params;
pub mod provider;
pub mod tensor;
pub mod types;

pub use events::{MessageBus, ProviderEvent};
pub use provider::{ServerDataProvider, LIMIT_NUM_POINTS};
pub use types::{
    Bookmark, ColumnStats, DataPoint, DataSet, EmbeddingInfo, ProjectorConfig,
    SpriteAndMetadataInfo, SpriteMetadata,
};
