use crate::infra::{parse_feature, parse_insurance, parse_transport};
use card_advisor::catalog::{CatalogStatus, CsvCatalogSource};
use card_advisor::config::AppConfig;
use card_advisor::error::AppError;
use card_advisor::recommend::{
    FeatureRequirement, FilterCriteria, FilterOptionCatalog, ImageResolver,
    InsuranceRequirement, LifestyleProfile, MonthlySpend, Recommendation, RecommendationEngine,
    RecommendationRequest, RecommendationService, TransportMode,
};
use card_advisor::telemetry;
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct RecommendArgs {
    /// Card catalog CSV (defaults to the configured catalog)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Expected monthly spend in yen
    #[arg(long)]
    pub(crate) amount: Option<u64>,
    /// Minimum base cashback rate in percent
    #[arg(long)]
    pub(crate) min_rate: Option<f64>,
    /// Card tier (一般, ゴールド, プラチナ); repeat to accept several
    #[arg(long = "tier")]
    pub(crate) tiers: Vec<String>,
    /// International brand; cards with any of them match
    #[arg(long = "brand")]
    pub(crate) brands: Vec<String>,
    /// E-money scheme; cards must support all of them
    #[arg(long = "e-money")]
    pub(crate) e_money: Vec<String>,
    /// Smartphone wallet; cards must support all of them
    #[arg(long = "wallet")]
    pub(crate) wallets: Vec<String>,
    /// Point programme; cards with any of them match
    #[arg(long = "point")]
    pub(crate) points: Vec<String>,
    /// Applicant eligibility; cards accepting any of them match
    #[arg(long = "applicant")]
    pub(crate) applicant_types: Vec<String>,
    /// Required insurance
    #[arg(long = "insurance", value_parser = parse_insurance)]
    pub(crate) insurance: Vec<InsuranceRequirement>,
    /// Required feature
    #[arg(long = "feature", value_parser = parse_feature)]
    pub(crate) features: Vec<FeatureRequirement>,
    /// Only cards with a signup bonus
    #[arg(long)]
    pub(crate) campaign_bonus: bool,
    /// Substring of the card or issuer name
    #[arg(long)]
    pub(crate) keyword: Option<String>,
    /// Whitespace separated lifestyle keywords for the bonus score
    #[arg(long)]
    pub(crate) lifestyle: Option<String>,
    /// Main transport mode for the bonus score
    #[arg(long, value_parser = parse_transport)]
    pub(crate) transport: Option<TransportMode>,
    /// Print at most this many cards
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

impl RecommendArgs {
    pub(crate) fn to_request(&self) -> RecommendationRequest {
        let criteria = FilterCriteria {
            monthly_spend: self
                .amount
                .map(MonthlySpend::Amount)
                .unwrap_or_default(),
            min_cashback_rate: self.min_rate.unwrap_or(0.0),
            tiers: self.tiers.clone(),
            brands: self.brands.clone(),
            e_money: self.e_money.clone(),
            wallets: self.wallets.clone(),
            points: self.points.clone(),
            applicant_types: self.applicant_types.clone(),
            insurance: self.insurance.clone(),
            features: self.features.clone(),
            keyword: self.keyword.clone().unwrap_or_default(),
            require_signup_bonus: self.campaign_bonus,
        };

        let lifestyle = LifestyleProfile {
            keywords: self.lifestyle.clone().unwrap_or_default(),
            transport: self.transport,
        };

        RecommendationRequest {
            criteria,
            lifestyle: (!lifestyle.is_empty()).then_some(lifestyle),
        }
    }
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;

    let catalog = args
        .catalog
        .clone()
        .unwrap_or_else(|| config.catalog.path.clone());
    let service = RecommendationService::new(
        Arc::new(CsvCatalogSource::new(catalog)),
        RecommendationEngine::default(),
        ImageResolver::new(config.catalog.image_dir.clone()),
    );

    let recommendation = service.recommend(&args.to_request());
    print!("{}", render_recommendation(&recommendation, args.limit));
    Ok(())
}

pub(crate) fn run_options() {
    print!("{}", render_options(&FilterOptionCatalog::standard()));
}

pub(crate) fn render_recommendation(recommendation: &Recommendation, limit: Option<usize>) -> String {
    let mut out = String::new();

    if let CatalogStatus::Unavailable { reason } = &recommendation.catalog_status {
        let _ = writeln!(out, "Card catalog unavailable: {reason}");
        return out;
    }

    let _ = writeln!(
        out,
        "Matched {} of {} cards",
        recommendation.matched, recommendation.catalog_size
    );
    if recommendation.fallback {
        let _ = writeln!(out, "No card matched every filter; top picks per tier instead");
    }
    if recommendation.entries.is_empty() {
        let _ = writeln!(out, "No cards to show");
        return out;
    }

    let shown = limit.unwrap_or(recommendation.entries.len());
    let mut current_group = None;
    for entry in recommendation.entries.iter().take(shown) {
        if entry.tier_group.is_some() && entry.tier_group != current_group {
            current_group = entry.tier_group;
            if let Some(tier) = current_group {
                let _ = writeln!(out, "\n[{}]", tier.label());
            }
        }

        let card = &entry.card;
        let _ = writeln!(
            out,
            "\n{}. {} ({}) total {:.1} = base {:.1} + bonus {:.1}",
            entry.rank,
            card.name,
            card.tier_label,
            entry.score.total,
            entry.score.base,
            entry.score.bonus
        );
        let _ = writeln!(
            out,
            "   {} | 年会費 {} | 還元率 {}% | {}",
            card.issuer, card.annual_fee, card.cashback_rate_text, card.brands
        );
        for component in &entry.score.components {
            let marker = if component.factor.is_bonus() { "+" } else { "-" };
            let _ = writeln!(
                out,
                "   {marker} {}: {:.1}/{:.0} ({})",
                component.factor.label(),
                component.score,
                component.factor.max(),
                component.notes
            );
        }
    }

    out
}

pub(crate) fn render_options(catalog: &FilterOptionCatalog) -> String {
    let mut out = String::new();
    for group in &catalog.groups {
        let _ = writeln!(out, "{} ({})", group.title, group.key);
        for item in &group.items {
            match item.description {
                Some(description) => {
                    let _ = writeln!(out, "- {}: {}", item.name, description);
                }
                None => {
                    let _ = writeln!(out, "- {}", item.name);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use card_advisor::catalog::{CatalogLoad, CatalogLoader, StaticCatalogSource};
    use std::io::Cursor;

    const CATALOG: &str = "カード名,発行会社,年会費（税込）,還元率_基本（%）,国際ブランド\n\
ベーシックカード,A社,永年無料,1.0,VISA\n\
ゴールドカード,B社,\"11,000円\",0.5,JCB\n";

    fn recommend(args: &RecommendArgs, load: CatalogLoad) -> Recommendation {
        RecommendationService::new(
            Arc::new(StaticCatalogSource::new(load)),
            RecommendationEngine::default(),
            ImageResolver::unchecked(),
        )
        .recommend(&args.to_request())
    }

    fn catalog() -> CatalogLoad {
        CatalogLoader::from_reader(Cursor::new(CATALOG))
    }

    #[test]
    fn args_build_request_with_optional_lifestyle() {
        let args = RecommendArgs {
            amount: Some(12_000),
            brands: vec!["VISA".to_string()],
            campaign_bonus: true,
            ..RecommendArgs::default()
        };
        let request = args.to_request();
        assert_eq!(request.criteria.monthly_spend, MonthlySpend::Amount(12_000));
        assert!(request.criteria.require_signup_bonus);
        assert!(request.lifestyle.is_none());

        let personalised = RecommendArgs {
            transport: Some(TransportMode::Car),
            ..RecommendArgs::default()
        };
        assert!(personalised.to_request().lifestyle.is_some());
    }

    #[test]
    fn rendering_lists_ranked_cards_with_breakdown() {
        let recommendation = recommend(&RecommendArgs::default(), catalog());
        let text = render_recommendation(&recommendation, None);

        assert!(text.starts_with("Matched 2 of 2 cards"));
        assert!(text.contains("1. ベーシックカード (一般) total 32.5"));
        assert!(text.contains("2. ゴールドカード (ゴールド)"));
        assert!(text.contains("- Annual fee: 20.0/20 (permanently free)"));
        assert!(!text.contains("top picks per tier"));
    }

    #[test]
    fn rendering_groups_fallback_by_tier_and_honours_limit() {
        let args = RecommendArgs {
            keyword: Some("存在しない".to_string()),
            ..RecommendArgs::default()
        };
        let text = render_recommendation(&recommend(&args, catalog()), Some(1));

        assert!(text.contains("top picks per tier"));
        assert!(text.contains("[ゴールド]"));
        assert!(!text.contains("ベーシックカード"));
    }

    #[test]
    fn rendering_reports_unavailable_catalog() {
        let load = CatalogLoader::from_path("./missing-catalog.csv");
        let text = render_recommendation(&recommend(&RecommendArgs::default(), load), None);
        assert!(text.starts_with("Card catalog unavailable: failed to read card catalog"));
    }

    #[test]
    fn options_render_descriptions() {
        let text = render_options(&FilterOptionCatalog::standard());
        assert!(text.contains("カード区分 (tiers)"));
        assert!(text.contains("- VISA: 世界シェアNo.1"));
        assert!(text.contains("- 入会特典あり"));
    }
}
