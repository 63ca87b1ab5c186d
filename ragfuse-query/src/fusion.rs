// Rank Fusion Implementation

//! Strategies that combine several ranked document lists into one.
//!
//! Two strategies are provided:
//!
//! - [`RrfStrategy`]: Reciprocal Rank Fusion. Each document at 0-based rank
//!   `r` contributes `1 / (k + r + 1)`; raw scores are ignored.
//! - [`WeightedStrategy`]: weighted sum of raw scores, with weights
//!   normalized to sum to one.
//!
//! Both return one entry per document ID, sorted by fused score descending,
//! with ties kept in the order the IDs were first seen.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, info};

use ragfuse_core::{Document, RagfuseError, Result};

/// Default RRF smoothing constant.
pub const DEFAULT_RRF_K: i64 = 60;

/// Combines several ranked result sets into one.
#[async_trait]
pub trait FusionStrategy: Send + Sync + std::fmt::Debug {
    /// Fuse `result_sets` into a single list sorted by fused score.
    async fn fuse(&self, result_sets: Vec<Vec<Document>>) -> Result<Vec<Document>>;

    /// Get a human-readable name for this strategy.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Reciprocal Rank Fusion.
///
/// Paper: "Reciprocal rank fusion outperforms Condorcet and individual rank
/// learning methods". Documents found by more sources, or ranked higher,
/// score higher.
///
/// # Examples
///
/// ```rust
/// use ragfuse_query::fusion::RrfStrategy;
///
/// assert_eq!(RrfStrategy::new(0).k(), 60);
/// assert_eq!(RrfStrategy::new(10).k(), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RrfStrategy {
    k: i64,
}

impl RrfStrategy {
    /// Create an RRF strategy. `k <= 0` selects the default of 60.
    #[must_use]
    pub fn new(k: i64) -> Self {
        Self {
            k: if k <= 0 { DEFAULT_RRF_K } else { k },
        }
    }

    /// The effective smoothing constant.
    #[must_use]
    pub fn k(&self) -> i64 {
        self.k
    }

    /// Contribution of a document at 0-based `rank`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rank_score(&self, rank: usize) -> f64 {
        1.0 / (self.k as f64 + rank as f64 + 1.0)
    }

    /// Synchronous form of [`FusionStrategy::fuse`].
    #[must_use]
    pub fn fuse_results(&self, result_sets: Vec<Vec<Document>>) -> Vec<Document> {
        debug!(
            "Fusing {} result lists using RRF with k={}",
            result_sets.len(),
            self.k
        );

        let mut fused = FusedTable::default();
        for result_set in result_sets {
            for (rank, doc) in result_set.into_iter().enumerate() {
                let contribution = self.rank_score(rank);
                fused.add(doc, contribution);
            }
        }

        let results = fused.into_sorted();
        info!("RRF fusion completed: {} unique results", results.len());
        results
    }
}

impl Default for RrfStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_RRF_K)
    }
}

#[async_trait]
impl FusionStrategy for RrfStrategy {
    async fn fuse(&self, result_sets: Vec<Vec<Document>>) -> Result<Vec<Document>> {
        Ok(self.fuse_results(result_sets))
    }

    fn name(&self) -> &'static str {
        "rrf"
    }
}

/// Weighted fusion of raw scores.
///
/// The fused score of a document is `Σ wᵢ · scoreᵢ` over the lists containing
/// it, where `wᵢ` are the weights normalized to sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedStrategy {
    weights: Vec<f64>,
}

impl WeightedStrategy {
    /// Create a weighted strategy. Weights are validated at fusion time.
    #[must_use]
    pub fn new(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    /// The raw, unnormalized weights.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weights scaled to sum to one.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the weights sum to zero.
    pub fn normalized_weights(&self) -> Result<Vec<f64>> {
        let sum: f64 = self.weights.iter().sum();
        if sum == 0.0 {
            return Err(RagfuseError::configuration(
                "weighted fusion: weights sum to zero",
            ));
        }
        Ok(self.weights.iter().map(|w| w / sum).collect())
    }

    /// Synchronous form of [`FusionStrategy::fuse`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the number of weights differs from
    /// the number of result sets, or when the weights sum to zero.
    pub fn fuse_results(&self, result_sets: Vec<Vec<Document>>) -> Result<Vec<Document>> {
        if self.weights.len() != result_sets.len() {
            return Err(RagfuseError::configuration(format!(
                "weighted fusion: {} weights for {} result sets",
                self.weights.len(),
                result_sets.len()
            )));
        }
        let weights = self.normalized_weights()?;
        debug!("Fusing {} result lists with weights {:?}", result_sets.len(), weights);

        let mut fused = FusedTable::default();
        for (result_set, weight) in result_sets.into_iter().zip(weights) {
            for doc in result_set {
                let contribution = weight * doc.score;
                fused.add(doc, contribution);
            }
        }

        let results = fused.into_sorted();
        info!("Weighted fusion completed: {} unique results", results.len());
        Ok(results)
    }
}

#[async_trait]
impl FusionStrategy for WeightedStrategy {
    async fn fuse(&self, result_sets: Vec<Vec<Document>>) -> Result<Vec<Document>> {
        self.fuse_results(result_sets)
    }

    fn name(&self) -> &'static str {
        "weighted"
    }
}

/// Accumulates fused scores per ID, remembering first-seen order.
#[derive(Default)]
struct FusedTable {
    docs: Vec<Document>,
    index: HashMap<String, usize>,
}

impl FusedTable {
    fn add(&mut self, doc: Document, contribution: f64) {
        if let Some(&i) = self.index.get(&doc.id) {
            self.docs[i].score += contribution;
        } else {
            self.index.insert(doc.id.clone(), self.docs.len());
            self.docs.push(Document {
                score: contribution,
                ..doc
            });
        }
    }

    fn into_sorted(self) -> Vec<Document> {
        let mut docs = self.docs;
        sort_by_score(&mut docs);
        docs
    }
}

/// Sort documents by score, highest first. Equal scores keep their order.
pub fn sort_by_score(docs: &mut [Document]) {
    docs.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Keep one document per ID, the one with the highest score.
///
/// The survivor takes the position where its ID first appeared.
///
/// # Examples
///
/// ```rust
/// use ragfuse_core::Document;
/// use ragfuse_query::fusion::dedup;
///
/// let docs = vec![
///     Document::new("a", "").with_score(0.5),
///     Document::new("b", "").with_score(0.8),
///     Document::new("a", "").with_score(0.9),
/// ];
/// let unique = dedup(docs);
/// assert_eq!(unique.len(), 2);
/// assert_eq!(unique[0].score, 0.9);
/// ```
#[must_use]
pub fn dedup(docs: Vec<Document>) -> Vec<Document> {
    let mut unique: Vec<Document> = Vec::with_capacity(docs.len());
    let mut index: HashMap<String, usize> = HashMap::new();
    for doc in docs {
        match index.get(&doc.id) {
            Some(&i) => {
                if doc.score > unique[i].score {
                    unique[i] = doc;
                }
            }
            None => {
                index.insert(doc.id.clone(), unique.len());
                unique.push(doc);
            }
        }
    }
    unique
}

/// Truncate to `top_k` documents. `0` leaves the list untouched.
pub fn truncate_top_k(docs: &mut Vec<Document>, top_k: usize) {
    if top_k > 0 {
        docs.truncate(top_k);
    }
}
