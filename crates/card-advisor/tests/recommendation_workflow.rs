//! End-to-end scenarios driven through the public catalog loader and
//! recommendation service.

use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::Arc;

use card_advisor::catalog::{
    CachedCatalogSource, CardTier, CatalogLoad, CatalogLoader, CatalogSource, CsvCatalogSource,
    StaticCatalogSource,
};
use card_advisor::recommend::{
    FilterCriteria, ImageResolver, RecommendationEngine, RecommendationRequest,
    RecommendationService,
};

const CATALOG: &str = "\u{feff}カード名,発行会社,カード区分,国際ブランド,年会費（税込）,還元率_基本（%）,電子マネー対応,スマホ決済対応,空港ラウンジ,入会特典ポイント\n\
エブリデイカード,A社,,VISA/JCB,永年無料,1.2,iD/QUICPay,Apple Pay,なし,\"3,000pt\"\n\
シルバーカード,B社,,Mastercard,\"1,375円\",0.5,iD,,なし,\n\
壊れた行,C社,,VISA,永年無料,1.0,,,なし,,余分\n\
ビジネスゴールドカード,C社,,VISA,\"11,000円\",1.0,,,国内主要空港,\n\
ステータスカード,D社,,American Express,\"35,000円\",1.0,QUICPay,Apple Pay/Google Pay,国内+海外,nan\n";

fn loaded() -> CatalogLoad {
    CatalogLoader::try_from_reader(Cursor::new(CATALOG)).expect("catalog parses")
}

fn service(load: CatalogLoad) -> RecommendationService<StaticCatalogSource> {
    RecommendationService::new(
        Arc::new(StaticCatalogSource::new(load)),
        RecommendationEngine::default(),
        ImageResolver::unchecked(),
    )
}

fn request(criteria: FilterCriteria) -> RecommendationRequest {
    RecommendationRequest {
        criteria,
        lifestyle: None,
    }
}

#[test]
fn catalog_skips_overlong_rows_and_infers_tiers() {
    let load = loaded();
    assert_eq!(load.skipped_rows, 1);

    let tiers: Vec<(&str, CardTier)> = load
        .cards
        .iter()
        .map(|card| (card.name.as_str(), card.tier))
        .collect();
    assert_eq!(
        tiers,
        vec![
            ("エブリデイカード", CardTier::General),
            ("シルバーカード", CardTier::General),
            ("ビジネスゴールドカード", CardTier::Gold),
            ("ステータスカード", CardTier::Platinum),
        ]
    );
    assert!(load.cards[3].signup_bonus_points.is_empty());
}

#[test]
fn short_rows_load_as_cards_with_blank_trailing_columns() {
    let csv = "カード名,発行会社,国際ブランド,年会費（税込）\n\
ショートカード,E社\n\
フルカード,F社,JCB,永年無料\n";
    let load = CatalogLoader::try_from_reader(Cursor::new(csv)).expect("catalog parses");

    assert_eq!(load.skipped_rows, 0);
    let short = &load.cards[0];
    assert_eq!(short.name, "ショートカード");
    assert_eq!(short.issuer, "E社");
    assert!(short.brands.is_empty());
    assert!(short.annual_fee.is_empty());
    assert_eq!(short.tier, CardTier::General);
}

#[test]
fn empty_criteria_return_every_card_ranked() {
    let recommendation = service(loaded()).recommend(&request(FilterCriteria::default()));

    assert!(!recommendation.fallback);
    assert_eq!(recommendation.entries.len(), 4);
    let totals: Vec<f64> = recommendation
        .entries
        .iter()
        .map(|entry| entry.score.total)
        .collect();
    assert!(totals.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[test]
fn brand_and_wallet_filters_narrow_results() {
    let recommendation = service(loaded()).recommend(&request(FilterCriteria {
        brands: vec!["VISA".to_string(), "American Express".to_string()],
        wallets: vec!["Apple Pay".to_string()],
        ..FilterCriteria::default()
    }));

    let names: Vec<&str> = recommendation
        .entries
        .iter()
        .map(|entry| entry.card.name.as_str())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"エブリデイカード"));
    assert!(names.contains(&"ステータスカード"));
}

#[test]
fn unmatched_criteria_fall_back_per_tier() {
    let recommendation = service(loaded()).recommend(&request(FilterCriteria {
        min_cashback_rate: 5.0,
        ..FilterCriteria::default()
    }));

    assert!(recommendation.fallback);
    assert_eq!(recommendation.matched, 0);
    let groups: Vec<Option<CardTier>> = recommendation
        .entries
        .iter()
        .map(|entry| entry.tier_group)
        .collect();
    assert_eq!(
        groups,
        vec![
            Some(CardTier::Platinum),
            Some(CardTier::Gold),
            Some(CardTier::General),
            Some(CardTier::General),
        ]
    );
}

#[test]
fn missing_catalog_signals_unavailable() {
    let source = CsvCatalogSource::new("./missing-catalog.csv");
    let load = source.load();
    assert!(!load.status.is_loaded());
    assert!(load.cards.is_empty());
}

#[test]
fn cached_source_reloads_after_catalog_changes() {
    let path = temp_catalog_path("cached_source_reloads");
    std::fs::write(&path, "カード名,年会費（税込）\nAカード,無料\n").expect("write catalog");

    let source = CachedCatalogSource::new(CsvCatalogSource::new(&path));
    let first = source.load();
    assert_eq!(first.cards.len(), 1);
    assert!(Arc::ptr_eq(&first, &source.load()));

    {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .expect("open catalog");
        writeln!(file, "Bプラチナカード,\"33,000円\"").expect("append row");
    }
    bump_modified(&path);

    let second = source.load();
    assert_eq!(second.cards.len(), 2);
    assert_eq!(second.cards[1].tier, CardTier::Platinum);
    assert_eq!(first.cards.len(), 1);

    let _ = std::fs::remove_file(&path);
}

fn temp_catalog_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("card-advisor-{name}-{}.csv", std::process::id()))
}

fn bump_modified(path: &PathBuf) {
    let file = std::fs::OpenOptions::new()
        .write(true)
        .open(path)
        .expect("open catalog");
    let later = std::time::SystemTime::now() + std::time::Duration::from_secs(60);
    file.set_modified(later).expect("set modified time");
}
