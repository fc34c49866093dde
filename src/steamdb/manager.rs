//! Semantic search over the Steam catalog

use crate::config::ServerConfig;
use crate::errors::{AgentError, Result};
use crate::steamdb::cache;
use crate::steamdb::document::query_text;
use crate::steamdb::embedder::{l2_normalize, Embedder};
use crate::steamdb::index::SimilarityIndex;
use crate::steamdb::record::{filter_catalog, load_catalog, GameRecord};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Catalog records plus their aligned similarity index.
///
/// Read-only after construction; share it behind an `Arc`.
pub struct SteamDbManager {
    records: Vec<GameRecord>,
    index: SimilarityIndex,
    embedder: Arc<dyn Embedder>,
}

impl SteamDbManager {
    /// Load catalog and embeddings from the configured paths
    pub async fn from_config(config: &ServerConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        Self::load(
            &config.steamdb_path,
            &config.embeddings_path,
            embedder,
            config.embed_concurrency,
        )
        .await
    }

    /// Load, filter, embed (or read the cache) and index the catalog
    pub async fn load(
        catalog_path: &Path,
        cache_path: &Path,
        embedder: Arc<dyn Embedder>,
        concurrency: usize,
    ) -> Result<Self> {
        let all = load_catalog(catalog_path)?;
        let total = all.len();
        let records = filter_catalog(all);
        info!(total, retained = records.len(), "Catalog loaded");

        let vectors = cache::load_or_build(cache_path, &records, embedder.as_ref(), concurrency).await?;
        Self::from_parts(records, &vectors, embedder)
    }

    /// Assemble from already-aligned records and vectors
    pub fn from_parts(
        records: Vec<GameRecord>,
        vectors: &[Vec<f32>],
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        if records.len() != vectors.len() {
            return Err(AgentError::DataLoadError(format!(
                "{} records but {} embeddings",
                records.len(),
                vectors.len()
            )));
        }
        let index = SimilarityIndex::build(vectors)?;
        info!(
            vectors = index.len(),
            dimension = index.dimension(),
            "Similarity index ready"
        );

        Ok(Self {
            records,
            index,
            embedder,
        })
    }

    /// Embed text and scale it to unit length
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = self.embedder.embed(text).await?;
        l2_normalize(&mut vector);
        Ok(vector)
    }

    /// Top-k records with their cosine similarity, best first
    pub async fn query_scored(&self, text: &str, k: usize) -> Result<Vec<(&GameRecord, f32)>> {
        let query = self.embed(&query_text(text)).await?;
        let hits = self.index.search(&query, k)?;
        debug!(k, hits = hits.len(), "Catalog query");

        Ok(hits
            .into_iter()
            .filter_map(|hit| self.records.get(hit.position).map(|r| (r, hit.score)))
            .collect())
    }

    /// Top-k records, best first
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<&GameRecord>> {
        Ok(self
            .query_scored(text, k)
            .await?
            .into_iter()
            .map(|(record, _)| record)
            .collect())
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
