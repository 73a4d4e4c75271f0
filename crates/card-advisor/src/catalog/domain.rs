use serde::{Deserialize, Serialize};
use std::fmt;

/// Image reference used when a card has none, or its file is missing.
pub const DEFAULT_IMAGE: &str = "default.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardTier {
    General,
    Gold,
    Platinum,
}

impl CardTier {
    /// Presentation order for tier-grouped output, most prestigious first.
    pub const fn ordered() -> [Self; 3] {
        [Self::Platinum, Self::Gold, Self::General]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::General => "一般",
            Self::Gold => "ゴールド",
            Self::Platinum => "プラチナ",
        }
    }

    pub const fn score(self) -> u8 {
        match self {
            Self::General => 1,
            Self::Gold => 2,
            Self::Platinum => 3,
        }
    }

    /// Accepts the catalog labels as well as their English names.
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "一般" => Some(Self::General),
            "ゴールド" => Some(Self::Gold),
            "プラチナ" => Some(Self::Platinum),
            other => match other.to_ascii_lowercase().as_str() {
                "general" => Some(Self::General),
                "gold" => Some(Self::Gold),
                "platinum" => Some(Self::Platinum),
                _ => None,
            },
        }
    }
}

impl fmt::Display for CardTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the annual fee is charged, derived once from the fee text and its condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FeeKind {
    PermanentlyFree,
    ConditionallyFree,
    Paid { amount: Option<u64> },
}

/// Airport lounge coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoungeAccess {
    None,
    DomesticMajor,
    DomesticAndInternational,
    /// Lounge text present but not one of the recognised coverage levels.
    Other,
}

impl LoungeAccess {
    pub const fn is_available(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Typed facts derived from the free-text columns at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTraits {
    pub fee_kind: FeeKind,
    /// Fee text mentions "無料" anywhere, first-year waivers included.
    pub fee_mentions_free: bool,
    /// Amount inferred from the fee text for tiering.
    pub fee_yen: u64,
    pub travel_insurance: bool,
    /// Advantages or disadvantages text mentions domestic coverage.
    pub mentions_domestic: bool,
    pub lounge: LoungeAccess,
    pub concierge: bool,
    pub contactless: bool,
    pub etc_free: bool,
    pub family_card: bool,
    pub instant_issuance: bool,
    pub virtual_card: bool,
    pub numberless: bool,
    pub signup_bonus: bool,
}

/// One catalog row. Textual fields are never absent: missing values are empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: String,
    pub issuer: String,
    pub image: String,
    pub tier: CardTier,
    /// Tier label as supplied by the catalog, or the inferred tier's label.
    pub tier_label: String,
    pub tier_score: u8,
    pub brands: String,
    pub annual_fee: String,
    pub fee_condition: String,
    pub monthly_spend: String,
    pub cashback_rate_text: String,
    pub cashback_rate: f64,
    pub bonus_cashback_rate: String,
    pub reward_categories: String,
    pub monthly_reward_cap: String,
    pub point_program: String,
    pub point_conversion: String,
    pub travel_insurance: String,
    pub overseas_insurance_type: String,
    pub overseas_insurance_text: String,
    /// Maximum overseas travel coverage in units of 10,000 yen.
    pub overseas_insurance: f64,
    pub shopping_insurance_text: String,
    /// Annual shopping coverage in units of 10,000 yen.
    pub shopping_insurance: f64,
    pub e_money: String,
    pub contactless: String,
    pub wallets: String,
    pub lounge: String,
    pub concierge: String,
    pub etc_availability: String,
    pub etc_fee: String,
    pub family_card: String,
    pub instant_issuance: String,
    pub virtual_card: String,
    pub numberless: String,
    pub applicant_eligibility: String,
    pub signup_bonus_points: String,
    pub signup_bonus_expiry: String,
    pub campaign: String,
    pub advantages: String,
    pub disadvantages: String,
    pub traits: CardTraits,
}

impl CardRecord {
    /// Brand names split on `/`, blanks dropped.
    pub fn brand_list(&self) -> Vec<&str> {
        self.brands
            .split('/')
            .map(str::trim)
            .filter(|brand| !brand.is_empty())
            .collect()
    }

    pub fn image_or_default(&self) -> &str {
        if self.image.is_empty() {
            DEFAULT_IMAGE
        } else {
            &self.image
        }
    }
}
