use super::views::Recommendation;
use serde::Serialize;

const UNKNOWN_CARD: &str = "不明なカード";

/// One bar of the score comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub score: f64,
}

/// Card name and total score per entry, highest score first.
pub fn chart_points(recommendation: &Recommendation) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = recommendation
        .entries
        .iter()
        .map(|entry| ChartPoint {
            label: if entry.card.name.is_empty() {
                UNKNOWN_CARD.to_string()
            } else {
                entry.card.name.clone()
            },
            score: entry.score.total,
        })
        .collect();
    points.sort_by(|a, b| b.score.total_cmp(&a.score));
    points
}
