use super::domain::{CardRecord, CardTier};
use super::normalizer::{clean_text, derive_traits, parse_numeric, TraitSource};
use super::CatalogError;
use csv::StringRecord;
use serde::Deserialize;
use std::io::Read;
use tracing::debug;

#[derive(Debug)]
pub(crate) struct ParsedCatalog {
    pub(crate) cards: Vec<CardRecord>,
    pub(crate) skipped_rows: usize,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<ParsedCatalog, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: StringRecord = csv_reader
        .headers()?
        .iter()
        .map(clean_text)
        .collect();
    if headers.iter().all(str::is_empty) {
        return Err(CatalogError::MissingHeader);
    }

    let mut cards = Vec::new();
    let mut skipped_rows = 0;

    for (index, record) in csv_reader.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                skipped_rows += 1;
                debug!(line, error = %err, "skipping unreadable catalog row");
                continue;
            }
        };
        if record.len() > headers.len() {
            skipped_rows += 1;
            debug!(
                line,
                fields = record.len(),
                expected = headers.len(),
                "skipping catalog row with extra fields"
            );
            continue;
        }
        match read_row(record, &headers) {
            Ok(row) => cards.push(row.into_record()),
            Err(err) => {
                skipped_rows += 1;
                debug!(line, error = %err, "skipping malformed catalog row");
            }
        }
    }

    Ok(ParsedCatalog {
        cards,
        skipped_rows,
    })
}

/// Pads short rows so absent trailing cells read as empty text.
fn read_row(mut record: StringRecord, headers: &StringRecord) -> Result<CardRow, csv::Error> {
    while record.len() < headers.len() {
        record.push_field("");
    }
    record.deserialize(Some(headers))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CardRow {
    #[serde(rename = "カード名")]
    name: String,
    #[serde(rename = "発行会社")]
    issuer: String,
    #[serde(rename = "画像ファイル名")]
    image: String,
    #[serde(rename = "カード区分")]
    tier: String,
    #[serde(rename = "国際ブランド")]
    brands: String,
    #[serde(rename = "年会費（税込）")]
    annual_fee: String,
    #[serde(rename = "年会費条件")]
    fee_condition: String,
    #[serde(rename = "月々の推奨利用額")]
    monthly_spend: String,
    #[serde(rename = "還元率_基本（%）")]
    cashback_rate: String,
    #[serde(rename = "ボーナス還元率（%）")]
    bonus_cashback_rate: String,
    #[serde(rename = "還元対象カテゴリ")]
    reward_categories: String,
    #[serde(rename = "還元上限（月額）")]
    monthly_reward_cap: String,
    #[serde(rename = "ポイントプログラム名")]
    point_program: String,
    #[serde(rename = "ポイント換算（円→P）")]
    point_conversion: String,
    #[serde(rename = "旅行保険_有無")]
    travel_insurance: String,
    #[serde(rename = "海外旅行保険_付帯種別")]
    overseas_insurance_type: String,
    #[serde(rename = "海外旅行保険_最高補償額（万円）")]
    overseas_insurance: String,
    #[serde(rename = "ショッピング保険_年間補償額（万円）")]
    shopping_insurance: String,
    #[serde(rename = "電子マネー対応")]
    e_money: String,
    #[serde(rename = "タッチ決済対応")]
    contactless: String,
    #[serde(rename = "スマホ決済対応")]
    wallets: String,
    #[serde(rename = "空港ラウンジ")]
    lounge: String,
    #[serde(rename = "コンシェルジュ")]
    concierge: String,
    #[serde(rename = "ETC_可否")]
    etc_availability: String,
    #[serde(rename = "ETC_年会費")]
    etc_fee: String,
    #[serde(rename = "家族カード可否")]
    family_card: String,
    #[serde(rename = "即時発行")]
    instant_issuance: String,
    #[serde(rename = "バーチャルカード対応")]
    virtual_card: String,
    #[serde(rename = "番号レスカード")]
    numberless: String,
    #[serde(rename = "申込対象")]
    applicant_eligibility: String,
    #[serde(rename = "入会特典ポイント")]
    signup_bonus_points: String,
    #[serde(rename = "入会特典有効期限")]
    signup_bonus_expiry: String,
    #[serde(rename = "公式キャンペーン")]
    campaign: String,
    #[serde(rename = "メリット")]
    advantages: String,
    #[serde(rename = "デメリット")]
    disadvantages: String,
}

impl CardRow {
    fn into_record(self) -> CardRecord {
        let annual_fee = clean_text(&self.annual_fee);
        let fee_condition = clean_text(&self.fee_condition);
        let travel_insurance = clean_text(&self.travel_insurance);
        let advantages = clean_text(&self.advantages);
        let disadvantages = clean_text(&self.disadvantages);
        let lounge = clean_text(&self.lounge);
        let concierge = clean_text(&self.concierge);
        let contactless = clean_text(&self.contactless);
        let etc_fee = clean_text(&self.etc_fee);
        let family_card = clean_text(&self.family_card);
        let instant_issuance = clean_text(&self.instant_issuance);
        let virtual_card = clean_text(&self.virtual_card);
        let numberless = clean_text(&self.numberless);
        let signup_bonus_points = clean_text(&self.signup_bonus_points);

        let traits = derive_traits(&TraitSource {
            annual_fee: &annual_fee,
            fee_condition: &fee_condition,
            travel_insurance: &travel_insurance,
            advantages: &advantages,
            disadvantages: &disadvantages,
            lounge: &lounge,
            concierge: &concierge,
            contactless: &contactless,
            etc_fee: &etc_fee,
            family_card: &family_card,
            instant_issuance: &instant_issuance,
            virtual_card: &virtual_card,
            numberless: &numberless,
            signup_bonus_points: &signup_bonus_points,
        });

        let cashback_rate_text = clean_text(&self.cashback_rate);
        let overseas_insurance_text = clean_text(&self.overseas_insurance);
        let shopping_insurance_text = clean_text(&self.shopping_insurance);

        CardRecord {
            name: clean_text(&self.name),
            issuer: clean_text(&self.issuer),
            image: clean_text(&self.image),
            // placeholder until tiers are assigned for the whole catalog
            tier: CardTier::General,
            tier_label: clean_text(&self.tier),
            tier_score: CardTier::General.score(),
            brands: clean_text(&self.brands),
            annual_fee,
            fee_condition,
            monthly_spend: clean_text(&self.monthly_spend),
            cashback_rate: parse_numeric(&cashback_rate_text),
            cashback_rate_text,
            bonus_cashback_rate: clean_text(&self.bonus_cashback_rate),
            reward_categories: clean_text(&self.reward_categories),
            monthly_reward_cap: clean_text(&self.monthly_reward_cap),
            point_program: clean_text(&self.point_program),
            point_conversion: clean_text(&self.point_conversion),
            travel_insurance,
            overseas_insurance_type: clean_text(&self.overseas_insurance_type),
            overseas_insurance: parse_numeric(&overseas_insurance_text),
            overseas_insurance_text,
            shopping_insurance: parse_numeric(&shopping_insurance_text),
            shopping_insurance_text,
            e_money: clean_text(&self.e_money),
            contactless,
            wallets: clean_text(&self.wallets),
            lounge,
            concierge,
            etc_availability: clean_text(&self.etc_availability),
            etc_fee,
            family_card,
            instant_issuance,
            virtual_card,
            numberless,
            applicant_eligibility: clean_text(&self.applicant_eligibility),
            signup_bonus_points,
            signup_bonus_expiry: clean_text(&self.signup_bonus_expiry),
            campaign: clean_text(&self.campaign),
            advantages,
            disadvantages,
            traits,
        }
    }
}
