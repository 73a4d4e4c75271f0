use super::scoring::CardScore;
use crate::catalog::CardTier;
use serde::Serialize;

/// Number of substitute cards offered per tier.
pub const FALLBACK_PER_TIER: usize = 3;

/// A scored catalog entry, addressed by its catalog position.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCard {
    pub index: usize,
    pub tier: CardTier,
    pub score: CardScore,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FallbackGroup {
    pub tier: CardTier,
    pub cards: Vec<ScoredCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackGroupSummary {
    pub tier: CardTier,
    pub tier_label: &'static str,
    pub count: usize,
}

impl FallbackGroup {
    pub fn summary(&self) -> FallbackGroupSummary {
        FallbackGroupSummary {
            tier: self.tier,
            tier_label: self.tier.label(),
            count: self.cards.len(),
        }
    }
}

/// Sorts by total score, highest first. The sort is stable, so equal totals keep
/// their incoming (catalog) order.
pub(crate) fn sort_by_total(cards: &mut [ScoredCard]) {
    cards.sort_by(|a, b| b.score.total.total_cmp(&a.score.total));
}

/// Top `per_tier` cards of each tier, grouped Platinum, Gold, then General.
///
/// Expects `scored` in catalog order; ties at the cut-off go to the card that
/// appears first in the catalog.
pub fn select_fallback(scored: &[ScoredCard], per_tier: usize) -> Vec<FallbackGroup> {
    CardTier::ordered()
        .into_iter()
        .map(|tier| {
            let mut cards: Vec<ScoredCard> = scored
                .iter()
                .filter(|card| card.tier == tier)
                .cloned()
                .collect();
            sort_by_total(&mut cards);
            cards.truncate(per_tier);
            FallbackGroup { tier, cards }
        })
        .collect()
}
