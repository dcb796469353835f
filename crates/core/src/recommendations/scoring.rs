//! Scoring for treatment package recommendations

use super::types::*;
use crate::domain::package::PackageCandidate;
use crate::domain::wizard::WizardInputs;

/// Maximum points for each scoring signal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Awarded in full when the package category was selected (default: 30)
    pub category: f64,
    /// Scaled by the share of selected concerns covered (default: 50)
    pub concern_coverage: f64,
    /// Awarded in full when the tier fits the budget range (default: 20)
    pub budget: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Score calculator for treatment packages
#[derive(Debug, Clone)]
pub struct ScoreCalculator {
    weights: ScoringWeights,
}

impl ScoreCalculator {
    /// Create a new score calculator with default weights
    pub fn new() -> Self {
        Self { weights: ScoringWeights::default() }
    }

    /// Create with custom weights
    pub fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> ScoringWeights {
        self.weights
    }

    /// Score one package against the wizard answers
    pub fn score(&self, candidate: &PackageCandidate, inputs: &WizardInputs) -> PackageScore {
        let components = self.component_scores(candidate, inputs);

        PackageScore {
            match_score: self.calculate_total_score(&components),
            reasons: self.generate_reasoning(&components),
            components,
        }
    }

    pub fn component_scores(
        &self,
        candidate: &PackageCandidate,
        inputs: &WizardInputs,
    ) -> ComponentScores {
        let matched_concerns = matched_concern_count(candidate, inputs);

        ComponentScores {
            category: self.category_score(candidate, inputs),
            concern_coverage: self.concern_coverage_score(matched_concerns, inputs),
            budget: self.budget_score(candidate, inputs),
            matched_concerns,
        }
    }

    /// Rounds the summed components once and bounds the result to 0..=100
    pub fn calculate_total_score(&self, components: &ComponentScores) -> u8 {
        components.total().round().clamp(0.0, 100.0) as u8
    }

    pub fn category_score(&self, candidate: &PackageCandidate, inputs: &WizardInputs) -> f64 {
        if inputs.selected_categories.contains(&candidate.category_id) {
            self.weights.category
        } else {
            0.0
        }
    }

    /// Left unrounded; only the total is rounded
    pub fn concern_coverage_score(&self, matched_concerns: usize, inputs: &WizardInputs) -> f64 {
        let selected = inputs.selected_concerns.len();
        if selected == 0 {
            return 0.0;
        }

        self.weights.concern_coverage * (matched_concerns as f64 / selected as f64)
    }

    pub fn budget_score(&self, candidate: &PackageCandidate, inputs: &WizardInputs) -> f64 {
        match inputs.preferences.budget_range {
            Some(range) if range.allows(candidate.price_tier) => self.weights.budget,
            _ => 0.0,
        }
    }

    /// Generate reasons in fixed signal order
    pub fn generate_reasoning(&self, components: &ComponentScores) -> Vec<MatchReason> {
        let mut reasons = Vec::new();

        if components.category > 0.0 {
            reasons.push(MatchReason::CategoryMatch);
        }

        if components.matched_concerns > 0 {
            reasons.push(MatchReason::ResolvedConcerns(components.matched_concerns));
        }

        if components.budget > 0.0 {
            reasons.push(MatchReason::BudgetRangeMatch);
        }

        if reasons.is_empty() {
            reasons.push(MatchReason::DefaultRecommendation);
        }

        reasons
    }
}

impl Default for ScoreCalculator {
    fn default() -> Self {
        Self::new()
    }
}

fn matched_concern_count(candidate: &PackageCandidate, inputs: &WizardInputs) -> usize {
    inputs
        .selected_concerns
        .iter()
        .filter(|concern| candidate.concern_tags.contains(*concern))
        .count()
}
