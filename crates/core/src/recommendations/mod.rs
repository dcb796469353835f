//! Treatment package recommendations
//!
//! Scores every catalog package against the wizard answers, then picks a
//! short, tier-diverse list for display.

mod engine;
mod scoring;
mod selection;
mod service;
mod sink;
mod types;

pub use engine::{calculate_recommendations, RecommendationEngine};
pub use scoring::{ScoreCalculator, ScoringWeights};
pub use selection::SelectionPolicy;
pub use service::RecommendationService;
pub use sink::{InMemoryRecommendationSink, RecommendationSink, StoredRecommendation};
pub use types::*;

/// Default scoring weights, summing to a 100-point scale
pub const DEFAULT_WEIGHTS: ScoringWeights =
    ScoringWeights { category: 30.0, concern_coverage: 50.0, budget: 20.0 };

/// Minimum score for the tier-unique primary pass
pub const PRIMARY_MIN_SCORE: u8 = 40;

/// Minimum score for the first backfill pass
pub const BACKFILL_MIN_SCORE: u8 = 30;

/// Number of recommendations the primary pass aims for
pub const TARGET_RECOMMENDATIONS: usize = 3;

/// Size the backfill passes try to reach
pub const MIN_RECOMMENDATIONS: usize = 2;
