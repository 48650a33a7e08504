//! Embedding providers.
//!
//! The store takes an embedder by injection; model-backed providers live
//! outside this crate. The contract is: given text, return `f32` vectors of
//! a fixed dimensionality, deterministically enough for caching.

use std::sync::Arc;

use crate::error::{IndexError, Result};

/// Turns text into a fixed-length vector.
pub trait Embedder: Send + Sync {
    /// Embed one text. The returned vector's length must equal
    /// [`dimension`](Self::dimension) for every input.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimensionality of vectors produced by this provider.
    fn dimension(&self) -> usize;

    /// Name/identifier of this provider, for logs and stats.
    fn provider_name(&self) -> &str;
}

impl<T: Embedder + ?Sized> Embedder for Arc<T> {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }
}

/// Deterministic feature-hashing embedder.
///
/// Tokenizes on non-alphanumeric boundaries, hashes each lowercased token and
/// its character trigrams into buckets with a hash-derived sign, and
/// L2-normalizes the result. Identical texts embed to identical unit vectors
/// (cosine 1.0); unrelated texts land far apart. No model, no I/O — usable
/// offline and in tests.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

/// Default dimensionality for [`HashingEmbedder`].
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 256;

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_EMBEDDING_DIMENSION)
    }
}

impl HashingEmbedder {
    /// Create an embedder producing vectors of `dimension` components.
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn bucket(&self, feature: &str) -> (usize, f32) {
        let digest = blake3::hash(feature.as_bytes());
        let bytes = digest.as_bytes();
        let index = u64::from_le_bytes(bytes[..8].try_into().expect("8 bytes")) as usize
            % self.dimension;
        let sign = if bytes[8] & 1 == 0 { 1.0 } else { -1.0 };
        (index, sign)
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str) {
        let (index, sign) = self.bucket(feature);
        vector[index] += sign;
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.dimension == 0 {
            return Err(IndexError::Embedding(
                "embedding dimension must be non-zero".to_string(),
            ));
        }
        let mut vector = vec![0.0f32; self.dimension];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let token = token.to_lowercase();
            self.add_feature(&mut vector, &token);
            let chars: Vec<char> = token.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                self.add_feature(&mut vector, &trigram);
            }
        }
        let norm: f64 = vector.iter().map(|v| (*v as f64) * (*v as f64)).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v = (*v as f64 / norm) as f32;
            }
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn provider_name(&self) -> &str {
        "hashing"
    }
}
