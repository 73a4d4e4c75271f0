use super::config::ScoringConfig;
use super::{ScoreComponent, ScoreFactor};
use crate::catalog::{CardRecord, FeeKind, LoungeAccess};

pub(crate) const BASE_MAX: f64 = 100.0;

pub(crate) fn score_card(card: &CardRecord, config: &ScoringConfig) -> (Vec<ScoreComponent>, f64) {
    let components = vec![
        cashback(card, config),
        annual_fee(card, config),
        insurance(card, config),
        convenience(card),
        brand_coverage(card),
        airport_lounge(card),
        concierge(card),
        advanced_features(card),
    ];

    let total = components
        .iter()
        .map(|component| component.score)
        .sum::<f64>()
        .clamp(0.0, BASE_MAX);

    (components, total)
}

fn capped(factor: ScoreFactor, raw: f64, notes: String) -> ScoreComponent {
    let score = if raw.is_finite() {
        raw.clamp(0.0, factor.max())
    } else {
        0.0
    };
    ScoreComponent {
        factor,
        score,
        notes,
    }
}

fn cashback(card: &CardRecord, config: &ScoringConfig) -> ScoreComponent {
    let max = ScoreFactor::Cashback.max();
    let raw = if config.cashback_saturation_rate > 0.0 {
        card.cashback_rate / config.cashback_saturation_rate * max
    } else {
        0.0
    };
    capped(
        ScoreFactor::Cashback,
        raw,
        format!("base cashback {:.2}%", card.cashback_rate),
    )
}

fn annual_fee(card: &CardRecord, config: &ScoringConfig) -> ScoreComponent {
    let (raw, notes) = match card.traits.fee_kind {
        FeeKind::PermanentlyFree => (20.0, "permanently free".to_string()),
        FeeKind::ConditionallyFree => (10.0, "free under conditions".to_string()),
        FeeKind::Paid {
            amount: Some(amount),
        } if amount <= config.low_fee_ceiling_yen => {
            (5.0, format!("low fee of {amount} yen"))
        }
        FeeKind::Paid {
            amount: Some(amount),
        } => (1.0, format!("fee of {amount} yen")),
        FeeKind::Paid { amount: None } => (1.0, "paid fee, amount unknown".to_string()),
    };
    capped(ScoreFactor::AnnualFee, raw, notes)
}

fn insurance(card: &CardRecord, config: &ScoringConfig) -> ScoreComponent {
    let mut raw = 0.0;
    let mut covered = Vec::new();
    if card.traits.travel_insurance {
        raw += 5.0;
        covered.push("travel");
    }
    if card.overseas_insurance >= config.overseas_coverage_floor {
        raw += 5.0;
        covered.push("high overseas coverage");
    }
    if card.shopping_insurance > 0.0 {
        raw += 5.0;
        covered.push("shopping");
    }
    let notes = if covered.is_empty() {
        "no insurance".to_string()
    } else {
        covered.join(", ")
    };
    capped(ScoreFactor::Insurance, raw, notes)
}

fn convenience(card: &CardRecord) -> ScoreComponent {
    let occurrences = |text: &str, needle: &str| text.matches(needle).count() as f64;
    let raw = occurrences(&card.e_money, "iD") * 2.0
        + occurrences(&card.e_money, "QUICPay") * 2.0
        + occurrences(&card.e_money, "交通系")
        + occurrences(&card.wallets, "Apple Pay") * 3.0
        + occurrences(&card.wallets, "Google Pay") * 3.0;
    capped(
        ScoreFactor::Convenience,
        raw,
        format!("{raw:.0} payment convenience points before cap"),
    )
}

fn brand_coverage(card: &CardRecord) -> ScoreComponent {
    let brands = card.brand_list().len();
    capped(
        ScoreFactor::BrandCoverage,
        brands as f64 * 2.5,
        format!("{brands} international brand(s)"),
    )
}

fn airport_lounge(card: &CardRecord) -> ScoreComponent {
    let (raw, notes) = match card.traits.lounge {
        LoungeAccess::DomesticAndInternational => (10.0, "domestic and international lounges"),
        LoungeAccess::DomesticMajor => (5.0, "major domestic airport lounges"),
        LoungeAccess::Other => (0.0, "limited lounge access"),
        LoungeAccess::None => (0.0, "no lounge access"),
    };
    capped(ScoreFactor::AirportLounge, raw, notes.to_string())
}

fn concierge(card: &CardRecord) -> ScoreComponent {
    let (raw, notes) = if card.traits.concierge {
        (5.0, "concierge desk")
    } else {
        (0.0, "no concierge")
    };
    capped(ScoreFactor::Concierge, raw, notes.to_string())
}

fn advanced_features(card: &CardRecord) -> ScoreComponent {
    let mut raw = 0.0;
    let mut present = Vec::new();
    if card.traits.instant_issuance {
        raw += 2.0;
        present.push("instant issuance");
    }
    if card.traits.numberless {
        raw += 3.0;
        present.push("numberless design");
    }
    let notes = if present.is_empty() {
        "none".to_string()
    } else {
        present.join(", ")
    };
    capped(ScoreFactor::AdvancedFeatures, raw, notes)
}
