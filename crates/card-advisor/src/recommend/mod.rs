//! Filtering, scoring and ranking of catalog cards against one user query.

pub mod chart;
pub mod criteria;
pub mod fallback;
pub mod filter;
pub mod options;
pub mod router;
pub mod scoring;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use chart::{chart_points, ChartPoint};
pub use criteria::{
    FeatureRequirement, FilterCriteria, InsuranceRequirement, LifestyleProfile, MonthlySpend,
    TransportMode, SIGNUP_BONUS_CAMPAIGN,
};
pub use fallback::{select_fallback, FallbackGroup, FallbackGroupSummary, ScoredCard};
pub use filter::{filter_cards, FilterPipeline, Predicate};
pub use options::{FilterOption, FilterOptionCatalog, FilterOptionGroup};
pub use router::recommendation_router;
pub use scoring::{CardScore, ScoreComponent, ScoreFactor, ScoringConfig, ScoringEngine};
pub use service::RecommendationService;
pub use views::{ImageResolver, Recommendation, RecommendationEntry};

use crate::catalog::CardRecord;
use fallback::{sort_by_total, FALLBACK_PER_TIER};
use serde::{Deserialize, Serialize};

/// Filter criteria plus optional personalisation for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationRequest {
    pub criteria: FilterCriteria,
    pub lifestyle: Option<LifestyleProfile>,
}

/// Ordered scoring result before presentation details are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub cards: Vec<ScoredCard>,
    pub fallback: bool,
    pub matched: usize,
    pub groups: Vec<FallbackGroupSummary>,
}

/// Runs the filter pipeline and scores the survivors, switching to per-tier
/// substitutes when nothing matches a non-empty catalog.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    scoring: ScoringEngine,
    fallback_per_tier: usize,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl RecommendationEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            scoring: ScoringEngine::new(config),
            fallback_per_tier: FALLBACK_PER_TIER,
        }
    }

    pub fn with_fallback_per_tier(mut self, per_tier: usize) -> Self {
        self.fallback_per_tier = per_tier;
        self
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    fn score_at(
        &self,
        catalog: &[CardRecord],
        index: usize,
        lifestyle: Option<&LifestyleProfile>,
    ) -> ScoredCard {
        let card = &catalog[index];
        ScoredCard {
            index,
            tier: card.tier,
            score: self.scoring.score(card, lifestyle),
        }
    }

    pub fn rank(&self, catalog: &[CardRecord], request: &RecommendationRequest) -> Ranking {
        let lifestyle = request.lifestyle.as_ref();
        let matches = FilterPipeline::from_criteria(&request.criteria).apply(catalog);
        let matched = matches.len();

        if matched == 0 && !catalog.is_empty() {
            let scored: Vec<ScoredCard> = (0..catalog.len())
                .map(|index| self.score_at(catalog, index, lifestyle))
                .collect();
            let groups = select_fallback(&scored, self.fallback_per_tier);
            let summaries = groups.iter().map(FallbackGroup::summary).collect();
            let cards = groups.into_iter().flat_map(|group| group.cards).collect();

            return Ranking {
                cards,
                fallback: true,
                matched,
                groups: summaries,
            };
        }

        let mut cards: Vec<ScoredCard> = matches
            .into_iter()
            .map(|index| self.score_at(catalog, index, lifestyle))
            .collect();
        sort_by_total(&mut cards);

        Ranking {
            cards,
            fallback: false,
            matched,
            groups: Vec::new(),
        }
    }
}
