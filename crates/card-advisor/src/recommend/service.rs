use std::sync::Arc;

use tracing::info;

use super::fallback::ScoredCard;
use super::options::FilterOptionCatalog;
use super::views::{ImageResolver, Recommendation, RecommendationEntry};
use super::{RecommendationEngine, RecommendationRequest};
use crate::catalog::{CardRecord, CatalogSource};

/// Service composing the catalog source, ranking engine and image lookup.
pub struct RecommendationService<S> {
    source: Arc<S>,
    engine: RecommendationEngine,
    images: ImageResolver,
    options: FilterOptionCatalog,
}

impl<S> RecommendationService<S>
where
    S: CatalogSource + 'static,
{
    pub fn new(source: Arc<S>, engine: RecommendationEngine, images: ImageResolver) -> Self {
        Self {
            source,
            engine,
            images,
            options: FilterOptionCatalog::standard(),
        }
    }

    pub fn options(&self) -> &FilterOptionCatalog {
        &self.options
    }

    /// Loads the current catalog snapshot and ranks it for the request.
    pub fn recommend(&self, request: &RecommendationRequest) -> Recommendation {
        let load = self.source.load();
        let ranking = self.engine.rank(&load.cards, request);

        info!(
            catalog = load.cards.len(),
            matched = ranking.matched,
            returned = ranking.cards.len(),
            fallback = ranking.fallback,
            "recommendation ranked"
        );

        let fallback = ranking.fallback;
        let entries = ranking
            .cards
            .into_iter()
            .enumerate()
            .map(|(position, scored)| self.entry(&load.cards, position, scored, fallback))
            .collect();

        Recommendation {
            catalog_status: load.status.clone(),
            fallback,
            matched: ranking.matched,
            catalog_size: load.cards.len(),
            entries,
            fallback_groups: ranking.groups,
        }
    }

    fn entry(
        &self,
        catalog: &[CardRecord],
        position: usize,
        scored: ScoredCard,
        fallback: bool,
    ) -> RecommendationEntry {
        let card = &catalog[scored.index];
        RecommendationEntry {
            rank: position + 1,
            image: self.images.resolve(card),
            tier_group: fallback.then_some(scored.tier),
            score: scored.score,
            card: card.clone(),
        }
    }
}
