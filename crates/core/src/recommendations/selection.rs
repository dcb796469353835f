//! Tier-diverse shortlist selection

use std::collections::HashSet;

use super::types::RecommendationResult;
use super::{BACKFILL_MIN_SCORE, MIN_RECOMMENDATIONS, PRIMARY_MIN_SCORE, TARGET_RECOMMENDATIONS};
use crate::domain::package::{PackageId, PriceTier};

/// Thresholds and sizes for shortlist selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Primary pass stops once this many packages are picked (default: 3)
    pub target_size: usize,
    /// Backfill passes run only below this size (default: 2)
    pub minimum_size: usize,
    /// Score required in the tier-unique primary pass (default: 40)
    pub primary_min_score: u8,
    /// Score required in the first backfill pass (default: 30)
    pub backfill_min_score: u8,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            target_size: TARGET_RECOMMENDATIONS,
            minimum_size: MIN_RECOMMENDATIONS,
            primary_min_score: PRIMARY_MIN_SCORE,
            backfill_min_score: BACKFILL_MIN_SCORE,
        }
    }
}

impl SelectionPolicy {
    /// Picks the shortlist and returns it in display (tier) order.
    pub fn select(&self, mut scored: Vec<RecommendationResult>) -> Vec<RecommendationResult> {
        // Stable: equal scores keep catalog order.
        scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        let mut picked: Vec<usize> = Vec::with_capacity(self.target_size);
        let mut picked_ids: HashSet<&PackageId> = HashSet::new();
        let mut used_tiers: HashSet<PriceTier> = HashSet::new();

        for (index, candidate) in scored.iter().enumerate() {
            if picked.len() >= self.target_size {
                break;
            }
            if candidate.match_score < self.primary_min_score
                || used_tiers.contains(&candidate.price_tier)
                || picked_ids.contains(&candidate.package_id)
            {
                continue;
            }
            used_tiers.insert(candidate.price_tier);
            picked_ids.insert(&candidate.package_id);
            picked.push(index);
        }

        for min_score in [self.backfill_min_score, 0] {
            for (index, candidate) in scored.iter().enumerate() {
                if picked.len() >= self.minimum_size {
                    break;
                }
                if candidate.match_score >= min_score && picked_ids.insert(&candidate.package_id) {
                    picked.push(index);
                }
            }
        }

        let mut slots: Vec<Option<RecommendationResult>> = scored.into_iter().map(Some).collect();
        let mut selected: Vec<RecommendationResult> =
            picked.into_iter().filter_map(|index| slots[index].take()).collect();

        sort_for_display(&mut selected);
        selected
    }
}

/// Stable presentation order: basic, premium, luxury, ultra.
pub fn sort_for_display(results: &mut [RecommendationResult]) {
    results.sort_by_key(|result| result.price_tier.display_rank());
}
