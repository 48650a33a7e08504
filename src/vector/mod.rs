//! Vector embedding store.
//!
//! Embeds arbitrary text into fixed-length vectors via an injected
//! [`Embedder`], stores documents with metadata, and serves nearest-neighbor
//! and similarity-by-id queries ranked by cosine similarity.
//!
//! # Scoring
//!
//! Cosine similarity in `[-1, 1]`, computed with f64 accumulators over the
//! stored f32 vectors and reported rounded to three decimals. Same inputs,
//! same score; ties keep insertion order.

mod embed;
#[cfg(test)]
mod tests;

use std::sync::{Arc, RwLock};

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use embed::{Embedder, HashingEmbedder, DEFAULT_EMBEDDING_DIMENSION};

use crate::common::round_score;
use crate::error::{IndexError, Result};
use crate::graph::Properties;

/// Default number of results returned by [`VectorStore::search`].
pub const DEFAULT_TOP_K: usize = 10;

/// A stored document with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorDocument {
    /// Store-assigned id
    pub id: String,
    /// Original text
    pub content: String,
    /// Caller-supplied metadata
    pub metadata: Properties,
    /// Embedding of `content`
    pub embedding: Vec<f32>,
}

/// One ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Document id
    pub id: String,
    /// Document text
    pub content: String,
    /// Document metadata
    pub metadata: Properties,
    /// Cosine similarity, rounded to three decimals
    pub score: f64,
}

/// Options for [`VectorStore::search`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum results (default 10)
    pub top_k: usize,
    /// Minimum raw similarity; results below it are discarded (default 0)
    pub threshold: f64,
    /// Exact-match metadata filter applied before ranking
    pub filter: Option<Properties>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            threshold: 0.0,
            filter: None,
        }
    }
}

impl SearchOptions {
    /// Limit the result count (builder style).
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the similarity floor (builder style).
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Require a metadata field to equal a value (builder style).
    pub fn with_filter(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.filter
            .get_or_insert_with(Properties::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Document count and dimensionality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VectorStats {
    /// Stored document count
    pub documents: usize,
    /// Embedding dimensionality of this store
    pub dimension: usize,
    /// Name of the injected embedding provider
    pub provider: String,
}

#[derive(Default)]
struct VectorInner {
    /// Documents in insertion order (the tie-break contract)
    documents: Vec<VectorDocument>,
    by_id: AHashMap<String, usize>,
}

/// In-memory vector store with cosine-similarity search.
///
/// Construct one per workspace session with an injected embedding provider
/// and share it behind `Arc`; all operations take `&self`.
pub struct VectorStore {
    embedder: Arc<dyn Embedder>,
    inner: RwLock<VectorInner>,
}

impl VectorStore {
    /// Create an empty store using the given embedding provider.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            inner: RwLock::new(VectorInner::default()),
        }
    }

    /// Create a store backed by the deterministic hashing embedder.
    pub fn with_hashing_embedder() -> Self {
        Self::new(Arc::new(HashingEmbedder::default()))
    }

    /// Embed `content` and store it with `metadata`. Returns the generated
    /// document id. Embedding failures propagate — without a vector there is
    /// nothing to store.
    pub fn add_document(&self, content: &str, metadata: Properties) -> Result<String> {
        let embedding = self.embedder.embed(content)?;
        if embedding.len() != self.embedder.dimension() {
            return Err(IndexError::Embedding(format!(
                "provider {} returned {} components, expected {}",
                self.embedder.provider_name(),
                embedding.len(),
                self.embedder.dimension()
            )));
        }
        let id = uuid::Uuid::new_v4().to_string();
        let mut inner = self.inner.write().expect("vector lock poisoned");
        let next_index = inner.documents.len();
        inner.by_id.insert(id.clone(), next_index);
        inner.documents.push(VectorDocument {
            id: id.clone(),
            content: content.to_string(),
            metadata,
            embedding,
        });
        debug!(id = %id, "document added");
        Ok(id)
    }

    /// Fetch one document by id. Missing ids are an explicit error — this is
    /// a single-entity fetch, not a query.
    pub fn get_document(&self, id: &str) -> Result<VectorDocument> {
        let inner = self.inner.read().expect("vector lock poisoned");
        inner
            .by_id
            .get(id)
            .map(|&slot| inner.documents[slot].clone())
            .ok_or_else(|| IndexError::not_found(format!("document {id}")))
    }

    /// Rank stored documents against `query` by cosine similarity.
    ///
    /// The metadata filter is applied before ranking; results below
    /// `threshold` are discarded; at most `top_k` results return, sorted
    /// descending with ties in insertion order. An empty store yields an
    /// empty result, never an error.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        {
            let inner = self.inner.read().expect("vector lock poisoned");
            if inner.documents.is_empty() {
                return Ok(Vec::new());
            }
        }
        let query_embedding = self.embedder.embed(query)?;
        let inner = self.inner.read().expect("vector lock poisoned");
        Ok(rank(
            &inner.documents,
            &query_embedding,
            options,
            None,
        ))
    }

    /// Rank stored documents against an existing document's embedding.
    ///
    /// The seed document is excluded from its own results. Unknown ids are a
    /// not-found error.
    pub fn get_similar(&self, id: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        let inner = self.inner.read().expect("vector lock poisoned");
        let &slot = inner
            .by_id
            .get(id)
            .ok_or_else(|| IndexError::not_found(format!("document {id}")))?;
        let seed = inner.documents[slot].embedding.clone();
        let options = SearchOptions {
            top_k,
            threshold: f64::MIN,
            filter: None,
        };
        Ok(rank(&inner.documents, &seed, &options, Some(id)))
    }

    /// Document count, dimensionality, and provider name.
    pub fn get_stats(&self) -> VectorStats {
        let inner = self.inner.read().expect("vector lock poisoned");
        VectorStats {
            documents: inner.documents.len(),
            dimension: self.embedder.dimension(),
            provider: self.embedder.provider_name().to_string(),
        }
    }

    /// Drop all documents. The embedder and dimensionality stay.
    pub fn clear(&self) {
        let mut inner = self.inner.write().expect("vector lock poisoned");
        let count = inner.documents.len();
        *inner = VectorInner::default();
        debug!(count, "vector store cleared");
    }
}

/// Filter, score, and rank documents against a query embedding.
fn rank(
    documents: &[VectorDocument],
    query: &[f32],
    options: &SearchOptions,
    exclude_id: Option<&str>,
) -> Vec<SearchResult> {
    let mut scored: Vec<(f64, &VectorDocument)> = documents
        .iter()
        .filter(|doc| exclude_id != Some(doc.id.as_str()))
        .filter(|doc| matches_filter(doc, options.filter.as_ref()))
        .map(|doc| (cosine_similarity(query, &doc.embedding), doc))
        .filter(|(score, _)| *score >= options.threshold)
        .collect();

    // stable sort: equal scores keep insertion order
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(options.top_k);

    scored
        .into_iter()
        .map(|(score, doc)| SearchResult {
            id: doc.id.clone(),
            content: doc.content.clone(),
            metadata: doc.metadata.clone(),
            score: round_score(score),
        })
        .collect()
}

fn matches_filter(doc: &VectorDocument, filter: Option<&Properties>) -> bool {
    let Some(filter) = filter else {
        return true;
    };
    filter
        .iter()
        .all(|(key, expected)| doc.metadata.get(key) == Some(expected))
}

/// Cosine similarity in `[-1, 1]`, 0.0 when either vector has zero norm.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
