//! Configuration for the retrieval engine.
//!
//! Fusion weights and stage thresholds are deployment-tuning concerns, so
//! every numeric lives here as named configuration rather than as literals
//! scattered across call sites.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wikiqa_core::{RetrievalError, Result};

/// Which field identifies a duplicate during aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DedupKey {
    /// De-duplicate by page: one candidate per source page (default).
    #[default]
    Page,
    /// De-duplicate by record id: per-chunk granularity.
    Chunk,
}

/// Per-stage weights for the composite score.
///
/// Defaults encode the intended priority order
/// `title-exact > title-partial > vector ≈ lexical > label`; the exact
/// numerics are a deployment-tuning concern.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FusionWeights {
    /// Weight applied to the title-exact similarity signal.
    pub title_exact: f32,
    /// Weight applied to the title-partial match ratio.
    pub title_partial: f32,
    /// Weight applied to the normalized vector distance.
    pub vector: f32,
    /// Weight applied to the normalized lexical rank.
    pub lexical: f32,
    /// Weight applied to the label score.
    pub label: f32,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self { title_exact: 1.0, title_partial: 0.7, vector: 0.5, lexical: 0.5, label: 0.3 }
    }
}

impl FusionWeights {
    fn validate(&self) -> Result<()> {
        let named = [
            ("title_exact", self.title_exact),
            ("title_partial", self.title_partial),
            ("vector", self.vector),
            ("lexical", self.lexical),
            ("label", self.label),
        ];
        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(RetrievalError::Config(format!(
                    "fusion weight '{name}' must be finite and non-negative, got {weight}"
                )));
            }
        }
        Ok(())
    }
}

/// Configuration parameters for the retrieval engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalConfig {
    /// Number of fused candidates returned to the caller.
    pub top_k: usize,
    /// Title similarity at or above which the early exit fires.
    pub exact_title_threshold: f32,
    /// Minimum keyword match ratio for the title-partial stage.
    pub partial_min_match_ratio: f32,
    /// Minimum accumulated score for the label-match stage.
    pub label_min_score: f32,
    /// The lexical stage fetches `top_k * lexical_fetch_multiplier` hits.
    pub lexical_fetch_multiplier: usize,
    /// The vector stage fetches `top_k * vector_fetch_multiplier` neighbors.
    pub vector_fetch_multiplier: usize,
    /// Individual timeout for each adapter call.
    pub stage_timeout: Duration,
    /// Outer budget for the whole request; stage timeouts are capped by it.
    pub overall_timeout: Duration,
    /// De-duplication granularity used by the aggregator.
    pub dedup_key: DedupKey,
    /// Per-stage fusion weights.
    pub weights: FusionWeights,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            exact_title_threshold: 0.85,
            partial_min_match_ratio: 0.33,
            label_min_score: 0.3,
            lexical_fetch_multiplier: 3,
            vector_fetch_multiplier: 5,
            stage_timeout: Duration::from_secs(2),
            overall_timeout: Duration::from_secs(10),
            dedup_key: DedupKey::Page,
            weights: FusionWeights::default(),
        }
    }
}

impl RetrievalConfig {
    /// Create a new builder for constructing a [`RetrievalConfig`].
    pub fn builder() -> RetrievalConfigBuilder {
        RetrievalConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RetrievalConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrievalConfigBuilder {
    config: RetrievalConfig,
}

impl RetrievalConfigBuilder {
    /// Set the number of fused candidates returned to the caller.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.config.top_k = top_k;
        self
    }

    /// Set the early-exit title similarity threshold.
    pub fn exact_title_threshold(mut self, threshold: f32) -> Self {
        self.config.exact_title_threshold = threshold;
        self
    }

    /// Set the minimum keyword match ratio for the title-partial stage.
    pub fn partial_min_match_ratio(mut self, ratio: f32) -> Self {
        self.config.partial_min_match_ratio = ratio;
        self
    }

    /// Set the minimum score for the label-match stage.
    pub fn label_min_score(mut self, score: f32) -> Self {
        self.config.label_min_score = score;
        self
    }

    /// Set the lexical fetch multiplier.
    pub fn lexical_fetch_multiplier(mut self, multiplier: usize) -> Self {
        self.config.lexical_fetch_multiplier = multiplier;
        self
    }

    /// Set the vector fetch multiplier.
    pub fn vector_fetch_multiplier(mut self, multiplier: usize) -> Self {
        self.config.vector_fetch_multiplier = multiplier;
        self
    }

    /// Set the individual timeout for each adapter call.
    pub fn stage_timeout(mut self, timeout: Duration) -> Self {
        self.config.stage_timeout = timeout;
        self
    }

    /// Set the outer budget for the whole request.
    pub fn overall_timeout(mut self, timeout: Duration) -> Self {
        self.config.overall_timeout = timeout;
        self
    }

    /// Set the de-duplication granularity.
    pub fn dedup_key(mut self, key: DedupKey) -> Self {
        self.config.dedup_key = key;
        self
    }

    /// Set the per-stage fusion weights.
    pub fn weights(mut self, weights: FusionWeights) -> Self {
        self.config.weights = weights;
        self
    }

    /// Build the [`RetrievalConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if:
    /// - `top_k == 0`
    /// - a threshold/ratio/score is outside `[0, 1]`
    /// - a fetch multiplier is `0`
    /// - a timeout is zero, or `stage_timeout > overall_timeout`
    /// - a fusion weight is negative or non-finite
    pub fn build(self) -> Result<RetrievalConfig> {
        let config = self.config;
        if config.top_k == 0 {
            return Err(RetrievalError::Config("top_k must be greater than zero".to_string()));
        }
        let unit_bounded = [
            ("exact_title_threshold", config.exact_title_threshold),
            ("partial_min_match_ratio", config.partial_min_match_ratio),
            ("label_min_score", config.label_min_score),
        ];
        for (name, value) in unit_bounded {
            if !(0.0..=1.0).contains(&value) {
                return Err(RetrievalError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if config.lexical_fetch_multiplier == 0 || config.vector_fetch_multiplier == 0 {
            return Err(RetrievalError::Config(
                "fetch multipliers must be at least 1".to_string(),
            ));
        }
        if config.stage_timeout.is_zero() || config.overall_timeout.is_zero() {
            return Err(RetrievalError::Config("timeouts must be non-zero".to_string()));
        }
        if config.stage_timeout > config.overall_timeout {
            return Err(RetrievalError::Config(format!(
                "stage_timeout ({:?}) must not exceed overall_timeout ({:?})",
                config.stage_timeout, config.overall_timeout
            )));
        }
        config.weights.validate()?;
        Ok(config)
    }
}
