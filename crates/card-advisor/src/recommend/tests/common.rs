use std::io::Cursor;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::{CardRecord, CatalogError, CatalogLoad, CatalogLoader, StaticCatalogSource};
use crate::recommend::{
    recommendation_router, CardScore, ImageResolver, RecommendationEngine,
    RecommendationService, ScoreFactor,
};

pub(super) type Row<'a> = &'a [(&'a str, &'a str)];

/// Renders rows as catalog CSV. Columns appear in first-seen order and
/// cells a row does not mention are left blank.
pub(super) fn catalog_csv(rows: &[Row<'_>]) -> String {
    let mut headers: Vec<&str> = Vec::new();
    for row in rows {
        for (column, _) in row.iter() {
            if !headers.contains(column) {
                headers.push(*column);
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers).expect("write header");
    for row in rows {
        let record: Vec<&str> = headers
            .iter()
            .map(|header| {
                row.iter()
                    .find(|(column, _)| column == header)
                    .map(|(_, value)| *value)
                    .unwrap_or("")
            })
            .collect();
        writer.write_record(&record).expect("write row");
    }

    match writer.into_inner() {
        Ok(bytes) => String::from_utf8(bytes).expect("utf-8 csv"),
        Err(_) => panic!("failed to flush fixture csv"),
    }
}

pub(super) fn load(rows: &[Row<'_>]) -> Vec<CardRecord> {
    CatalogLoader::try_from_reader(Cursor::new(catalog_csv(rows)))
        .expect("fixture catalog parses")
        .cards
}

/// Four cards covering every filter category.
///
/// Base scores: ベーシックカード 50, ラグジュアリープラチナ 46.5,
/// トラベルゴールドカード 33.5, 交通系スマートカード 23.5.
pub(super) fn sample_catalog() -> Vec<CardRecord> {
    load(&[
        &[
            ("カード名", "ベーシックカード"),
            ("発行会社", "Sample Card Co."),
            ("国際ブランド", "VISA/Mastercard"),
            ("年会費（税込）", "永年無料"),
            ("月々の推奨利用額", "～1万円"),
            ("還元率_基本（%）", "1.0"),
            ("ポイントプログラム名", "Vポイント"),
            ("電子マネー対応", "iD/QUICPay"),
            ("タッチ決済対応", "VISAのタッチ決済"),
            ("スマホ決済対応", "Apple Pay/Google Pay"),
            ("家族カード可否", "あり"),
            ("即時発行", "あり"),
            ("番号レスカード", "あり"),
            ("申込対象", "学生可/18歳以上"),
            ("入会特典ポイント", "5,000pt"),
            ("メリット", "コンビニで高還元"),
        ],
        &[
            ("カード名", "トラベルゴールドカード"),
            ("発行会社", "トラベル信販"),
            ("国際ブランド", "JCB"),
            ("年会費（税込）", "11,000円"),
            ("月々の推奨利用額", "3万円～5万円"),
            ("還元率_基本（%）", "0.5"),
            ("ポイントプログラム名", "Oki Dokiポイント"),
            ("旅行保険_有無", "あり"),
            ("海外旅行保険_最高補償額（万円）", "5000"),
            ("ショッピング保険_年間補償額（万円）", "300"),
            ("電子マネー対応", "QUICPay"),
            ("タッチ決済対応", "なし"),
            ("スマホ決済対応", "Apple Pay"),
            ("空港ラウンジ", "国内主要空港"),
            ("申込対象", "20歳以上"),
            ("メリット", "国内旅行保険が付帯 / JALマイルが貯まる"),
        ],
        &[
            ("カード名", "ラグジュアリープラチナ"),
            ("発行会社", "Luxe Express"),
            ("国際ブランド", "American Express"),
            ("年会費（税込）", "33,000円"),
            ("月々の推奨利用額", "5万円～"),
            ("還元率_基本（%）", "1.0"),
            ("ポイントプログラム名", "メンバーシップ・リワード"),
            ("旅行保険_有無", "あり"),
            ("海外旅行保険_最高補償額（万円）", "10000"),
            ("ショッピング保険_年間補償額（万円）", "500"),
            ("タッチ決済対応", "Amexタッチ決済"),
            ("スマホ決済対応", "Apple Pay"),
            ("空港ラウンジ", "国内+海外"),
            ("コンシェルジュ", "あり"),
            ("ETC_年会費", "無料"),
            ("家族カード可否", "あり"),
            ("申込対象", "20歳以上"),
            ("入会特典ポイント", "0pt"),
            ("メリット", "海外旅行に強い"),
            ("デメリット", "年会費が高い"),
        ],
        &[
            ("カード名", "交通系スマートカード"),
            ("発行会社", "交通カード株式会社"),
            ("国際ブランド", "VISA"),
            ("年会費（税込）", "初年度無料（2年目以降1,375円）"),
            ("月々の推奨利用額", "1万円～3万円"),
            ("還元率_基本（%）", "0.5"),
            ("還元対象カテゴリ", "Suicaチャージ"),
            ("ポイントプログラム名", "楽天ポイント"),
            ("電子マネー対応", "交通系/iD"),
            ("スマホ決済対応", "Google Pay"),
            ("バーチャルカード対応", "あり"),
            ("申込対象", "学生可"),
            ("入会特典ポイント", "最大1万円相当"),
            ("メリット", "オートチャージでポイント"),
        ],
    ])
}

/// Nine cards: four Platinum, three Gold and two General, all permanently free.
pub(super) fn tiered_catalog() -> Vec<CardRecord> {
    load(&[
        &[("カード名", "プラチナA"), ("年会費（税込）", "無料"), ("還元率_基本（%）", "0.5")],
        &[("カード名", "ゴールドA"), ("年会費（税込）", "無料"), ("還元率_基本（%）", "1.0")],
        &[("カード名", "プラチナB"), ("年会費（税込）", "無料"), ("還元率_基本（%）", "2.0")],
        &[("カード名", "一般A"), ("年会費（税込）", "無料"), ("還元率_基本（%）", "0.3")],
        &[("カード名", "プラチナC"), ("年会費（税込）", "無料"), ("還元率_基本（%）", "1.0")],
        &[("カード名", "ゴールドB"), ("年会費（税込）", "無料"), ("還元率_基本（%）", "0.2")],
        &[("カード名", "プラチナD"), ("年会費（税込）", "無料"), ("還元率_基本（%）", "1.5")],
        &[("カード名", "一般B"), ("年会費（税込）", "無料"), ("還元率_基本（%）", "1.2")],
        &[("カード名", "ゴールドC"), ("年会費（税込）", "無料"), ("還元率_基本（%）", "1.8")],
    ])
}

pub(super) fn names(cards: &[&CardRecord]) -> Vec<String> {
    cards.iter().map(|card| card.name.clone()).collect()
}

pub(super) fn component(score: &CardScore, factor: ScoreFactor) -> f64 {
    score
        .components
        .iter()
        .find(|component| component.factor == factor)
        .map(|component| component.score)
        .unwrap_or_else(|| panic!("missing {factor:?} component"))
}

pub(super) fn service_with(
    cards: Vec<CardRecord>,
) -> RecommendationService<StaticCatalogSource> {
    RecommendationService::new(
        Arc::new(StaticCatalogSource::new(CatalogLoad::from_cards(cards))),
        RecommendationEngine::default(),
        ImageResolver::unchecked(),
    )
}

pub(super) fn unavailable_service() -> RecommendationService<StaticCatalogSource> {
    RecommendationService::new(
        Arc::new(StaticCatalogSource::new(CatalogLoad::unavailable(
            &CatalogError::MissingHeader,
        ))),
        RecommendationEngine::default(),
        ImageResolver::unchecked(),
    )
}

pub(super) fn router_with_service(
    service: RecommendationService<StaticCatalogSource>,
) -> axum::Router {
    recommendation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
