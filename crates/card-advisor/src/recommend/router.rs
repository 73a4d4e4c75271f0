use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use super::chart::{chart_points, ChartPoint};
use super::criteria::{
    FeatureRequirement, FilterCriteria, InsuranceRequirement, LifestyleProfile, MonthlySpend,
    TransportMode, SIGNUP_BONUS_CAMPAIGN,
};
use super::service::RecommendationService;
use super::views::Recommendation;
use super::RecommendationRequest;
use crate::catalog::CatalogSource;

/// Monthly amount as submitted: a number, or form text that may be blank.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(i64),
    Text(String),
}

impl AmountInput {
    fn monthly_spend(&self) -> MonthlySpend {
        match self {
            Self::Number(amount) if *amount >= 0 => MonthlySpend::Amount(*amount as u64),
            Self::Number(_) => MonthlySpend::Unspecified,
            Self::Text(raw) => MonthlySpend::from_input(raw),
        }
    }
}

/// Recommendation request in the shape the search form submits it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecommendationPayload {
    pub amount: Option<AmountInput>,
    pub min_rate: Option<f64>,
    pub tiers: Vec<String>,
    pub brands: Vec<String>,
    pub e_money: Vec<String>,
    pub wallets: Vec<String>,
    pub points: Vec<String>,
    pub applicant_type: Vec<String>,
    pub insurance: Vec<String>,
    pub features: Vec<String>,
    pub campaigns: Vec<String>,
    pub keyword: Option<String>,
    pub lifestyle_keywords: Option<String>,
    pub transport: Option<String>,
}

impl RecommendationPayload {
    /// Converts form values into a request. Unknown option labels are dropped.
    pub fn into_request(self) -> RecommendationRequest {
        let criteria = FilterCriteria {
            monthly_spend: self
                .amount
                .as_ref()
                .map(AmountInput::monthly_spend)
                .unwrap_or_default(),
            min_cashback_rate: self.min_rate.filter(|rate| rate.is_finite()).unwrap_or(0.0),
            tiers: self.tiers,
            brands: self.brands,
            e_money: self.e_money,
            wallets: self.wallets,
            points: self.points,
            applicant_types: self.applicant_type,
            insurance: self
                .insurance
                .iter()
                .filter_map(|label| InsuranceRequirement::from_label(label))
                .collect(),
            features: self
                .features
                .iter()
                .filter_map(|label| FeatureRequirement::from_label(label))
                .collect(),
            keyword: self.keyword.unwrap_or_default().trim().to_string(),
            require_signup_bonus: self
                .campaigns
                .iter()
                .any(|campaign| campaign.trim() == SIGNUP_BONUS_CAMPAIGN),
        };

        let lifestyle = LifestyleProfile {
            keywords: self.lifestyle_keywords.unwrap_or_default(),
            transport: self
                .transport
                .as_deref()
                .and_then(TransportMode::from_label),
        };

        RecommendationRequest {
            criteria,
            lifestyle: (!lifestyle.is_empty()).then_some(lifestyle),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub chart: Vec<ChartPoint>,
}

/// Router builder exposing the recommendation and option endpoints.
pub fn recommendation_router<S>(service: Arc<RecommendationService<S>>) -> Router
where
    S: CatalogSource + 'static,
{
    Router::new()
        .route("/api/v1/cards/recommendations", post(recommend_handler::<S>))
        .route("/api/v1/cards/options", get(options_handler::<S>))
        .with_state(service)
}

pub(crate) async fn recommend_handler<S>(
    State(service): State<Arc<RecommendationService<S>>>,
    axum::Json(payload): axum::Json<RecommendationPayload>,
) -> Response
where
    S: CatalogSource + 'static,
{
    let request = payload.into_request();
    let recommendation = service.recommend(&request);
    let chart = chart_points(&recommendation);

    (
        StatusCode::OK,
        axum::Json(RecommendationResponse {
            recommendation,
            chart,
        }),
    )
        .into_response()
}

pub(crate) async fn options_handler<S>(
    State(service): State<Arc<RecommendationService<S>>>,
) -> Response
where
    S: CatalogSource + 'static,
{
    (StatusCode::OK, axum::Json(service.options().clone())).into_response()
}
