use super::criteria::{FeatureRequirement, FilterCriteria, InsuranceRequirement};
use crate::catalog::CardRecord;

const MILES: &str = "マイル";
const POINT_SUFFIX: &str = "ポイント";

/// One filter category. Each variant owns its own OR/AND/threshold rule;
/// the pipeline combines variants with AND.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Card's recommended spend bucket equals the bucket of the entered amount.
    SpendBucket(&'static str),
    MinCashback(f64),
    /// Tier label is one of the requested labels.
    Tier(Vec<String>),
    /// Brand text contains any requested brand.
    AnyBrand(Vec<String>),
    /// E-money text contains every requested scheme.
    AllEMoney(Vec<String>),
    /// Wallet text contains every requested wallet.
    AllWallets(Vec<String>),
    /// Point program or advantages mention any requested point keyword.
    AnyPoints(Vec<String>),
    AnyApplicantType(Vec<String>),
    Insurance(InsuranceRequirement),
    /// Lowercased keyword found in name or issuer.
    Keyword(String),
    Feature(FeatureRequirement),
    SignupBonus,
}

impl Predicate {
    pub fn matches(&self, card: &CardRecord) -> bool {
        match self {
            Self::SpendBucket(bucket) => card.monthly_spend.trim() == *bucket,
            Self::MinCashback(minimum) => card.cashback_rate >= *minimum,
            Self::Tier(labels) => labels.iter().any(|label| card.tier_label == *label),
            Self::AnyBrand(brands) => brands.iter().any(|brand| card.brands.contains(brand.as_str())),
            Self::AllEMoney(schemes) => schemes
                .iter()
                .all(|scheme| card.e_money.contains(scheme.as_str())),
            Self::AllWallets(wallets) => wallets
                .iter()
                .all(|wallet| card.wallets.contains(wallet.as_str())),
            Self::AnyPoints(keywords) => {
                let program = card.point_program.to_lowercase();
                let advantages = card.advantages.to_lowercase();
                keywords.iter().any(|keyword| {
                    program.contains(keyword.as_str()) || advantages.contains(keyword.as_str())
                })
            }
            Self::AnyApplicantType(types) => types
                .iter()
                .any(|kind| card.applicant_eligibility.contains(kind.as_str())),
            Self::Insurance(requirement) => insurance_matches(*requirement, card),
            Self::Keyword(keyword) => {
                card.name.to_lowercase().contains(keyword.as_str())
                    || card.issuer.to_lowercase().contains(keyword.as_str())
            }
            Self::Feature(feature) => feature_matches(*feature, card),
            Self::SignupBonus => card.traits.signup_bonus,
        }
    }

    /// Whether the predicate should run against this catalog at all. The spend
    /// bucket filter is skipped when no card records a spend bucket.
    fn applies_to(&self, catalog: &[CardRecord]) -> bool {
        match self {
            Self::SpendBucket(_) => catalog
                .iter()
                .any(|card| !card.monthly_spend.trim().is_empty()),
            _ => true,
        }
    }
}

fn insurance_matches(requirement: InsuranceRequirement, card: &CardRecord) -> bool {
    match requirement {
        InsuranceRequirement::OverseasTravel => card.overseas_insurance > 0.0,
        // Heuristic: there is no dedicated domestic coverage column.
        InsuranceRequirement::DomesticTravel => {
            card.traits.travel_insurance && card.traits.mentions_domestic
        }
        InsuranceRequirement::Shopping => card.shopping_insurance > 0.0,
    }
}

fn feature_matches(feature: FeatureRequirement, card: &CardRecord) -> bool {
    let traits = &card.traits;
    match feature {
        FeatureRequirement::FreeAnnualFee => traits.fee_mentions_free,
        FeatureRequirement::AirportLounge => traits.lounge.is_available(),
        FeatureRequirement::Concierge => traits.concierge,
        FeatureRequirement::Contactless => traits.contactless,
        FeatureRequirement::FreeEtc => traits.etc_free,
        FeatureRequirement::FamilyCard => traits.family_card,
        FeatureRequirement::InstantIssuance => traits.instant_issuance,
        FeatureRequirement::VirtualCard => traits.virtual_card,
        FeatureRequirement::Numberless => traits.numberless,
    }
}

/// Search keyword for a requested point program: miles match on "マイル",
/// everything else drops the generic "ポイント" suffix.
pub(crate) fn point_keyword(requested: &str) -> String {
    if requested.contains(MILES) {
        MILES.to_lowercase()
    } else {
        requested.replace(POINT_SUFFIX, "").to_lowercase()
    }
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ordered AND-composition of predicates built from a criteria bundle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPipeline {
    predicates: Vec<Predicate>,
}

impl FilterPipeline {
    pub fn new(predicates: Vec<Predicate>) -> Self {
        Self { predicates }
    }

    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let mut predicates = Vec::new();

        if let Some(bucket) = criteria.monthly_spend.bucket() {
            predicates.push(Predicate::SpendBucket(bucket));
        }
        if criteria.min_cashback_rate > 0.0 {
            predicates.push(Predicate::MinCashback(criteria.min_cashback_rate));
        }

        let tiers = criteria.tier_labels();
        if !tiers.is_empty() {
            predicates.push(Predicate::Tier(tiers));
        }

        let brands = non_blank(&criteria.brands);
        if !brands.is_empty() {
            predicates.push(Predicate::AnyBrand(brands));
        }
        let e_money = non_blank(&criteria.e_money);
        if !e_money.is_empty() {
            predicates.push(Predicate::AllEMoney(e_money));
        }
        let wallets = non_blank(&criteria.wallets);
        if !wallets.is_empty() {
            predicates.push(Predicate::AllWallets(wallets));
        }

        let points: Vec<String> = non_blank(&criteria.points)
            .iter()
            .map(|requested| point_keyword(requested))
            .collect();
        if !points.is_empty() {
            predicates.push(Predicate::AnyPoints(points));
        }

        let applicant_types = non_blank(&criteria.applicant_types);
        if !applicant_types.is_empty() {
            predicates.push(Predicate::AnyApplicantType(applicant_types));
        }

        for requirement in dedup(&criteria.insurance) {
            predicates.push(Predicate::Insurance(requirement));
        }

        let keyword = criteria.keyword.trim();
        if !keyword.is_empty() {
            predicates.push(Predicate::Keyword(keyword.to_lowercase()));
        }

        for feature in dedup(&criteria.features) {
            predicates.push(Predicate::Feature(feature));
        }

        if criteria.require_signup_bonus {
            predicates.push(Predicate::SignupBonus);
        }

        Self { predicates }
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Catalog positions of the cards that pass every predicate, in catalog order.
    pub fn apply(&self, catalog: &[CardRecord]) -> Vec<usize> {
        let active: Vec<&Predicate> = self
            .predicates
            .iter()
            .filter(|predicate| predicate.applies_to(catalog))
            .collect();

        catalog
            .iter()
            .enumerate()
            .filter(|(_, card)| active.iter().all(|predicate| predicate.matches(card)))
            .map(|(index, _)| index)
            .collect()
    }
}

fn dedup<T: Copy + PartialEq>(values: &[T]) -> Vec<T> {
    let mut unique = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(value) {
            unique.push(*value);
        }
    }
    unique
}

/// Convenience wrapper returning the matching records themselves.
pub fn filter_cards<'a>(catalog: &'a [CardRecord], criteria: &FilterCriteria) -> Vec<&'a CardRecord> {
    FilterPipeline::from_criteria(criteria)
        .apply(catalog)
        .into_iter()
        .map(|index| &catalog[index])
        .collect()
}
