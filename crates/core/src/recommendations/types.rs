//! Types for the recommendation engine

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::package::{PackageCandidate, PackageId, PriceTier};

/// Why a package earned points. Rendered into the `reasoning` list in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchReason {
    CategoryMatch,
    ResolvedConcerns(usize),
    BudgetRangeMatch,
    /// Used alone when no signal contributed
    DefaultRecommendation,
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CategoryMatch => f.write_str("category match"),
            Self::ResolvedConcerns(1) => f.write_str("resolved 1 concern"),
            Self::ResolvedConcerns(count) => write!(f, "resolved {count} concerns"),
            Self::BudgetRangeMatch => f.write_str("budget range match"),
            Self::DefaultRecommendation => f.write_str("default recommendation"),
        }
    }
}

/// Unrounded per-signal points for one package
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentScores {
    /// Category points (0 or the full category weight)
    pub category: f64,
    /// Concern coverage points, proportional to matched concerns
    pub concern_coverage: f64,
    /// Budget points (0 or the full budget weight)
    pub budget: f64,
    /// Count of selected concerns the package addresses
    pub matched_concerns: usize,
}

impl ComponentScores {
    pub fn total(&self) -> f64 {
        self.category + self.concern_coverage + self.budget
    }
}

/// Outcome of scoring a single package
#[derive(Debug, Clone, PartialEq)]
pub struct PackageScore {
    pub match_score: u8,
    pub components: ComponentScores,
    pub reasons: Vec<MatchReason>,
}

/// A scored package, as returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub package_id: PackageId,
    pub package_code: String,
    pub package_name: String,
    pub price_tier: PriceTier,
    pub final_price: u64,
    /// Rounded total score (0 - 100)
    pub match_score: u8,
    /// Human-readable reasoning
    pub reasoning: Vec<String>,
}

impl RecommendationResult {
    pub fn from_score(candidate: &PackageCandidate, score: &PackageScore) -> Self {
        Self {
            package_id: candidate.id.clone(),
            package_code: candidate.code.clone(),
            package_name: candidate.display_name.clone(),
            price_tier: candidate.price_tier,
            final_price: candidate.final_price,
            match_score: score.match_score,
            reasoning: score.reasons.iter().map(ToString::to_string).collect(),
        }
    }
}
