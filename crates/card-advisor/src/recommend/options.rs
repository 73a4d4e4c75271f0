use super::criteria::{FeatureRequirement, InsuranceRequirement, SIGNUP_BONUS_CAMPAIGN};
use crate::catalog::CardTier;
use serde::Serialize;

/// A selectable value, optionally with a short explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl FilterOption {
    const fn plain(name: &'static str) -> Self {
        Self {
            name,
            description: None,
        }
    }

    const fn described(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description: Some(description),
        }
    }
}

fn plain(names: &[&'static str]) -> Vec<FilterOption> {
    names.iter().copied().map(FilterOption::plain).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptionGroup {
    /// Request field the selections are submitted under.
    pub key: &'static str,
    pub title: &'static str,
    pub items: Vec<FilterOption>,
}

/// Every option the presentation layer offers. Built once and passed around
/// by value; the filtering engine never consults it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptionCatalog {
    pub groups: Vec<FilterOptionGroup>,
}

impl FilterOptionCatalog {
    pub fn standard() -> Self {
        let tiers = [CardTier::General, CardTier::Gold, CardTier::Platinum]
            .into_iter()
            .map(|tier| FilterOption::plain(tier.label()))
            .collect();

        let brands = vec![
            FilterOption::described(
                "VISA",
                "世界シェアNo.1の決済網。国内外の実店舗・オンラインを問わず使える場所が最も多いブランドです。",
            ),
            FilterOption::described(
                "MasterCard",
                "VISAに次ぐ世界No.2のシェア。ヨーロッパ圏に強く、国内ではコストコで使える国際ブランドです。",
            ),
            FilterOption::described(
                "JCB",
                "日本発祥の国際ブランド。国内加盟店が多く、ハワイ・グアム・韓国など日本人観光客の多い地域の優待が手厚いです。",
            ),
            FilterOption::described(
                "American Express",
                "ステータス性が高く、空港ラウンジや旅行保険、コンシェルジュなど旅行・エンタメ系の特典が充実しています。",
            ),
            FilterOption::described(
                "Diners",
                "最上位クラスのステータスを持つブランド。高級レストランのコース1名分無料などグルメ系の優待に強みがあります。",
            ),
        ];

        let insurance = [
            InsuranceRequirement::OverseasTravel,
            InsuranceRequirement::DomesticTravel,
            InsuranceRequirement::Shopping,
        ]
        .into_iter()
        .map(|requirement| FilterOption::plain(requirement.label()))
        .collect();

        let features = FeatureRequirement::ordered()
            .into_iter()
            .map(|feature| FilterOption::plain(feature.label()))
            .collect();

        Self {
            groups: vec![
                FilterOptionGroup {
                    key: "tiers",
                    title: "カード区分",
                    items: tiers,
                },
                FilterOptionGroup {
                    key: "brands",
                    title: "国際ブランド（いずれか含む）",
                    items: brands,
                },
                FilterOptionGroup {
                    key: "points",
                    title: "貯まるポイントで選ぶ（いずれか含む）",
                    items: plain(&["Vポイント", "楽天ポイント", "Pontaポイント", "dポイント", "マイル"]),
                },
                FilterOptionGroup {
                    key: "applicant_type",
                    title: "申込対象で選ぶ（いずれか含む）",
                    items: plain(&["学生可", "20歳以上", "高校生を除く18歳以上"]),
                },
                FilterOptionGroup {
                    key: "insurance",
                    title: "保険で選ぶ（すべて満たす）",
                    items: insurance,
                },
                FilterOptionGroup {
                    key: "e_money",
                    title: "電子マネー（すべて対応）",
                    items: plain(&["iD", "QUICPay", "交通系", "WAON", "楽天Edy"]),
                },
                FilterOptionGroup {
                    key: "wallets",
                    title: "スマホウォレット（すべて対応）",
                    items: plain(&["Apple Pay", "Google Pay", "おサイフケータイ"]),
                },
                FilterOptionGroup {
                    key: "features",
                    title: "欲しい機能（すべて満たす）",
                    items: features,
                },
                FilterOptionGroup {
                    key: "campaigns",
                    title: "キャンペーン条件",
                    items: plain(&[SIGNUP_BONUS_CAMPAIGN]),
                },
            ],
        }
    }

    pub fn group(&self, key: &str) -> Option<&FilterOptionGroup> {
        self.groups.iter().find(|group| group.key == key)
    }
}
