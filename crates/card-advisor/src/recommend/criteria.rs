use crate::catalog::CardTier;
use serde::{Deserialize, Serialize};

/// Monthly spend entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlySpend {
    #[default]
    Unspecified,
    Amount(u64),
}

impl MonthlySpend {
    /// Parses form input: only plain digit strings count as an amount.
    pub fn from_input(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            trimmed
                .parse::<u64>()
                .map(Self::Amount)
                .unwrap_or(Self::Unspecified)
        } else {
            Self::Unspecified
        }
    }

    /// Catalog spend bucket the amount falls into.
    pub fn bucket(self) -> Option<&'static str> {
        match self {
            Self::Unspecified => None,
            Self::Amount(amount) if amount <= 10_000 => Some("～1万円"),
            Self::Amount(amount) if amount <= 30_000 => Some("1万円～3万円"),
            Self::Amount(amount) if amount <= 50_000 => Some("3万円～5万円"),
            Self::Amount(_) => Some("5万円～"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceRequirement {
    OverseasTravel,
    DomesticTravel,
    Shopping,
}

impl InsuranceRequirement {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OverseasTravel => "海外旅行保険あり",
            Self::DomesticTravel => "国内旅行保険あり",
            Self::Shopping => "ショッピング保険あり",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "海外旅行保険あり" | "overseas_travel" => Some(Self::OverseasTravel),
            "国内旅行保険あり" | "domestic_travel" => Some(Self::DomesticTravel),
            "ショッピング保険あり" | "shopping" => Some(Self::Shopping),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureRequirement {
    FreeAnnualFee,
    AirportLounge,
    Concierge,
    Contactless,
    FreeEtc,
    FamilyCard,
    InstantIssuance,
    VirtualCard,
    Numberless,
}

impl FeatureRequirement {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::FreeAnnualFee,
            Self::AirportLounge,
            Self::Concierge,
            Self::Contactless,
            Self::FreeEtc,
            Self::FamilyCard,
            Self::InstantIssuance,
            Self::VirtualCard,
            Self::Numberless,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FreeAnnualFee => "年会費無料",
            Self::AirportLounge => "空港ラウンジ",
            Self::Concierge => "コンシェルジュ",
            Self::Contactless => "タッチ決済",
            Self::FreeEtc => "ETC無料",
            Self::FamilyCard => "家族カード",
            Self::InstantIssuance => "即時発行",
            Self::VirtualCard => "バーチャルカード",
            Self::Numberless => "番号レス",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered()
            .into_iter()
            .find(|feature| feature.label() == value)
    }
}

/// Campaign option that turns on the signup bonus gate.
pub const SIGNUP_BONUS_CAMPAIGN: &str = "入会特典あり";

/// One user query. Empty collections and blank text disable their filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub monthly_spend: MonthlySpend,
    pub min_cashback_rate: f64,
    /// Tier labels; unknown labels never match a card.
    pub tiers: Vec<String>,
    pub brands: Vec<String>,
    pub e_money: Vec<String>,
    pub wallets: Vec<String>,
    pub points: Vec<String>,
    pub applicant_types: Vec<String>,
    pub insurance: Vec<InsuranceRequirement>,
    pub features: Vec<FeatureRequirement>,
    pub keyword: String,
    pub require_signup_bonus: bool,
}

impl FilterCriteria {
    /// Tier labels in catalog form; English names map onto catalog labels.
    pub(crate) fn tier_labels(&self) -> Vec<String> {
        self.tiers
            .iter()
            .map(|raw| match CardTier::from_label(raw) {
                Some(tier) => tier.label().to_string(),
                None => raw.trim().to_string(),
            })
            .filter(|label| !label.is_empty())
            .collect()
    }
}

/// Single-select transport mode used by the lifestyle bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Train,
    Flight,
    Car,
}

impl TransportMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Train => "電車",
            Self::Flight => "飛行機",
            Self::Car => "自動車",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "電車" => Some(Self::Train),
            "飛行機" => Some(Self::Flight),
            "自動車" => Some(Self::Car),
            other => match other.to_ascii_lowercase().as_str() {
                "train" => Some(Self::Train),
                "flight" | "plane" => Some(Self::Flight),
                "car" => Some(Self::Car),
                _ => None,
            },
        }
    }
}

/// Personalisation inputs for the bonus score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifestyleProfile {
    pub keywords: String,
    pub transport: Option<TransportMode>,
}

impl LifestyleProfile {
    pub fn is_empty(&self) -> bool {
        self.keywords.trim().is_empty() && self.transport.is_none()
    }
}
