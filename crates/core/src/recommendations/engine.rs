//! Recommendation engine implementation

use tracing::debug;

use super::scoring::{ScoreCalculator, ScoringWeights};
use super::selection::SelectionPolicy;
use super::types::*;
use crate::domain::package::PackageCandidate;
use crate::domain::wizard::{WizardInputs, WizardSteps};

/// Scores a catalog against wizard answers and picks the shortlist.
///
/// Holds no mutable state; one instance can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    calculator: ScoreCalculator,
    policy: SelectionPolicy,
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { calculator: ScoreCalculator::with_weights(weights), ..Self::default() }
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn calculator(&self) -> &ScoreCalculator {
        &self.calculator
    }

    /// Extracts step 1/2/3 answers (empty when absent) and recommends.
    pub fn recommend(
        &self,
        packages: &[PackageCandidate],
        steps: &WizardSteps,
    ) -> Vec<RecommendationResult> {
        self.recommend_for_inputs(packages, &steps.inputs())
    }

    pub fn recommend_for_inputs(
        &self,
        packages: &[PackageCandidate],
        inputs: &WizardInputs,
    ) -> Vec<RecommendationResult> {
        let scored = self.score_all(packages, inputs);
        let selected = self.policy.select(scored);

        debug!(
            event_name = "recommendation.calculated",
            candidate_count = packages.len(),
            selected_count = selected.len(),
            selected_categories = inputs.selected_categories.len(),
            selected_concerns = inputs.selected_concerns.len(),
            budget_range = ?inputs.preferences.budget_range,
            "recommendations calculated"
        );

        selected
    }

    /// Scores every package exactly once, preserving catalog order.
    pub fn score_all(
        &self,
        packages: &[PackageCandidate],
        inputs: &WizardInputs,
    ) -> Vec<RecommendationResult> {
        packages
            .iter()
            .map(|candidate| {
                let score = self.calculator.score(candidate, inputs);
                RecommendationResult::from_score(candidate, &score)
            })
            .collect()
    }
}

/// Recommends with the default weights and selection policy.
pub fn calculate_recommendations(
    packages: &[PackageCandidate],
    steps: &WizardSteps,
) -> Vec<RecommendationResult> {
    RecommendationEngine::new().recommend(packages, steps)
}
