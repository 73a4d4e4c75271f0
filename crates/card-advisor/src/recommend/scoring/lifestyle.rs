use super::{ScoreComponent, ScoreFactor};
use crate::catalog::CardRecord;
use crate::recommend::criteria::{LifestyleProfile, TransportMode};

pub(crate) const BONUS_MAX: f64 = 30.0;
const POINTS_PER_KEYWORD: f64 = 5.0;

const TRAIN_TERMS: [&str; 4] = ["suica", "pasmo", "交通系", "オートチャージ"];
const FLIGHT_TERMS: [&str; 3] = ["マイル", "jal", "ana"];
const CAR_TERMS: [&str; 4] = ["etc", "ガソリン", "出光", "eneos"];

fn transport_terms(mode: TransportMode) -> &'static [&'static str] {
    match mode {
        TransportMode::Train => &TRAIN_TERMS,
        TransportMode::Flight => &FLIGHT_TERMS,
        TransportMode::Car => &CAR_TERMS,
    }
}

/// Lowercased text the personalisation bonus searches.
fn search_corpus(card: &CardRecord) -> String {
    format!(
        "{} {} {}",
        card.name, card.advantages, card.reward_categories
    )
    .to_lowercase()
}

pub(crate) fn score_lifestyle(
    card: &CardRecord,
    profile: &LifestyleProfile,
) -> (Vec<ScoreComponent>, f64) {
    let corpus = search_corpus(card);
    let mut components = Vec::new();

    let keywords: Vec<String> = profile
        .keywords
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    if !keywords.is_empty() {
        let hits: Vec<&str> = keywords
            .iter()
            .filter(|keyword| corpus.contains(keyword.as_str()))
            .map(String::as_str)
            .collect();
        let raw = hits.len() as f64 * POINTS_PER_KEYWORD;
        let notes = if hits.is_empty() {
            "no lifestyle keyword matched".to_string()
        } else {
            format!("matched {}", hits.join(", "))
        };
        components.push(ScoreComponent {
            factor: ScoreFactor::LifestyleKeywords,
            score: raw.min(ScoreFactor::LifestyleKeywords.max()),
            notes,
        });
    }

    if let Some(mode) = profile.transport {
        let matched = transport_terms(mode)
            .iter()
            .copied()
            .find(|term| corpus.contains(*term));
        let (score, notes) = match matched {
            Some(term) => (
                ScoreFactor::Transport.max(),
                format!("{} perk via {term}", mode.label()),
            ),
            None => (0.0, format!("no {} perk", mode.label())),
        };
        components.push(ScoreComponent {
            factor: ScoreFactor::Transport,
            score,
            notes,
        });
    }

    let total = components
        .iter()
        .map(|component| component.score)
        .sum::<f64>()
        .clamp(0.0, BONUS_MAX);

    (components, total)
}
