use super::domain::{CardRecord, CardTier};
use super::normalizer::parse_yen_to_int;
use tracing::{debug, info};

const PLATINUM_MARKER: &str = "プラチナ";
const GOLD_MARKER: &str = "ゴールド";
const PLATINUM_FEE_FLOOR: u64 = 30_000;
const GOLD_FEE_FLOOR: u64 = 10_000;

/// Infers a tier from the card name, falling back to the annual fee.
pub fn infer_tier(name: &str, annual_fee: &str) -> CardTier {
    let name = name.trim();
    if name.contains(PLATINUM_MARKER) {
        return CardTier::Platinum;
    }
    if name.contains(GOLD_MARKER) {
        return CardTier::Gold;
    }

    match parse_yen_to_int(annual_fee) {
        fee if fee >= PLATINUM_FEE_FLOOR => CardTier::Platinum,
        fee if fee >= GOLD_FEE_FLOOR => CardTier::Gold,
        _ => CardTier::General,
    }
}

/// Returns the tier and its rank score for a single record.
pub fn classify(record: &CardRecord) -> (CardTier, u8) {
    let tier = infer_tier(&record.name, &record.annual_fee);
    (tier, tier.score())
}

/// Attaches tiers to a freshly loaded catalog.
///
/// When no row carries a tier label every row is inferred. Otherwise supplied
/// labels are trusted; blank rows are inferred individually and unknown labels
/// are kept for display but rank as general cards.
pub fn assign_tiers(cards: &mut [CardRecord]) {
    let column_populated = cards.iter().any(|card| !card.tier_label.trim().is_empty());

    if column_populated {
        info!(cards = cards.len(), "using supplied card tiers");
    } else {
        info!(cards = cards.len(), "inferring card tiers from name and fee");
    }

    for card in cards.iter_mut() {
        let label = card.tier_label.trim().to_string();
        if label.is_empty() {
            let (tier, score) = classify(card);
            card.tier = tier;
            card.tier_score = score;
            card.tier_label = tier.label().to_string();
            continue;
        }

        match CardTier::from_label(&label) {
            Some(tier) => {
                card.tier = tier;
                card.tier_score = tier.score();
                card.tier_label = tier.label().to_string();
            }
            None => {
                debug!(card = %card.name, label = %label, "unrecognised tier label");
                card.tier = CardTier::General;
                card.tier_score = CardTier::General.score();
                card.tier_label = label;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_keywords_override_fee() {
        assert_eq!(infer_tier("エポスプラチナカード", "無料"), CardTier::Platinum);
        assert_eq!(infer_tier("○○ゴールドカード", "500円"), CardTier::Gold);
        assert_eq!(infer_tier("プラチナ・ゴールド", "0円"), CardTier::Platinum);
    }

    #[test]
    fn fee_thresholds_decide_unmarked_cards() {
        assert_eq!(infer_tier("Aカード", "35,000円"), CardTier::Platinum);
        assert_eq!(infer_tier("Aカード", "3万"), CardTier::Platinum);
        assert_eq!(infer_tier("Bカード", "15,000円"), CardTier::Gold);
        assert_eq!(infer_tier("Bカード", "10000"), CardTier::Gold);
        assert_eq!(infer_tier("Cカード", "5,000円"), CardTier::General);
        assert_eq!(infer_tier("Cカード", "永年無料"), CardTier::General);
    }
}
