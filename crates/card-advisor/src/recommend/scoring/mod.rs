mod config;
mod lifestyle;
mod rules;

pub use config::ScoringConfig;

use super::criteria::LifestyleProfile;
use crate::catalog::CardRecord;
use serde::{Deserialize, Serialize};

/// Sub-scores that make up a card's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    Cashback,
    AnnualFee,
    Insurance,
    Convenience,
    BrandCoverage,
    AirportLounge,
    Concierge,
    AdvancedFeatures,
    LifestyleKeywords,
    Transport,
}

impl ScoreFactor {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cashback => "Cashback",
            Self::AnnualFee => "Annual fee",
            Self::Insurance => "Insurance",
            Self::Convenience => "Payment convenience",
            Self::BrandCoverage => "Brand coverage",
            Self::AirportLounge => "Airport lounge",
            Self::Concierge => "Concierge",
            Self::AdvancedFeatures => "Advanced features",
            Self::LifestyleKeywords => "Lifestyle keywords",
            Self::Transport => "Transport perks",
        }
    }

    pub const fn max(self) -> f64 {
        match self {
            Self::Cashback | Self::AnnualFee => 20.0,
            Self::Insurance | Self::Convenience => 15.0,
            Self::BrandCoverage | Self::AirportLounge => 10.0,
            Self::Concierge | Self::AdvancedFeatures => 5.0,
            Self::LifestyleKeywords | Self::Transport => 15.0,
        }
    }

    pub const fn is_bonus(self) -> bool {
        matches!(self, Self::LifestyleKeywords | Self::Transport)
    }
}

/// Discrete contribution to a card's score, kept for transparent breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub score: f64,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardScore {
    /// 0..=100 from fixed card attributes.
    pub base: f64,
    /// 0..=30 from lifestyle inputs; 0 without a profile.
    pub bonus: f64,
    pub total: f64,
    pub components: Vec<ScoreComponent>,
}

/// Stateless scorer applying the rubric to one card at a time.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, card: &CardRecord, lifestyle: Option<&LifestyleProfile>) -> CardScore {
        let (mut components, base) = rules::score_card(card, &self.config);

        let bonus = match lifestyle.filter(|profile| !profile.is_empty()) {
            Some(profile) => {
                let (bonus_components, bonus) = lifestyle::score_lifestyle(card, profile);
                components.extend(bonus_components);
                bonus
            }
            None => 0.0,
        };

        CardScore {
            base,
            bonus,
            total: base + bonus,
            components,
        }
    }
}
