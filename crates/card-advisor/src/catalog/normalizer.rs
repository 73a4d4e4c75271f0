use super::domain::{CardTraits, FeeKind, LoungeAccess};
use regex::Regex;
use std::sync::OnceLock;

const AVAILABLE: &str = "あり";
const UNAVAILABLE: &str = "なし";
const FREE: &str = "無料";

fn yen_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([0-9,]+)\s*円").expect("valid yen pattern"))
}

fn man_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([0-9.]+)\s*万").expect("valid man pattern"))
}

fn bare_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([0-9,]+)$").expect("valid number pattern"))
}

fn digit_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[0-9,]+").expect("valid digit run pattern"))
}

/// Trims a raw cell and drops spreadsheet "nan" artefacts.
pub(crate) fn clean_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let trimmed = cleaned.trim();
    if trimmed.eq_ignore_ascii_case("nan") {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Permissive numeric parse: anything that is not a finite number becomes 0.
pub(crate) fn parse_numeric(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .unwrap_or(0.0)
}

fn parse_grouped_digits(value: &str) -> Option<u64> {
    value.replace(',', "").parse::<u64>().ok()
}

/// Reads a yen amount out of fee text such as "11,000円", "3.3万" or "無料".
///
/// Patterns are tried in order: `<digits>円`, `<decimal>万`, a bare number,
/// then the first digit run anywhere. Free or unparseable text yields 0.
pub fn parse_yen_to_int(fee_text: &str) -> u64 {
    let text = fee_text.trim();
    if text.is_empty() || text.contains(FREE) {
        return 0;
    }

    if let Some(amount) = yen_pattern()
        .captures(text)
        .and_then(|caps| parse_grouped_digits(&caps[1]))
    {
        return amount;
    }

    if let Some(amount) = man_pattern()
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value >= 0.0)
    {
        return (amount * 10_000.0).round() as u64;
    }

    if let Some(amount) = bare_number_pattern()
        .captures(text)
        .and_then(|caps| parse_grouped_digits(&caps[1]))
    {
        return amount;
    }

    digit_run_pattern()
        .find(text)
        .and_then(|run| parse_grouped_digits(run.as_str()))
        .unwrap_or(0)
}

/// Whether the signup bonus text promises anything.
///
/// Text with digits counts only when its first digit run is positive; text
/// without digits counts as long as it is non-empty.
pub fn has_bonus(text: &str) -> bool {
    let cleaned = clean_text(text);
    if cleaned.is_empty() {
        return false;
    }

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }

    match digit_run_pattern()
        .find(&cleaned)
        .map(|run| parse_grouped_digits(run.as_str()))
    {
        Some(Some(value)) => value > 0,
        _ => true,
    }
}

/// Classifies the fee text into permanent, conditional or paid terms.
pub(crate) fn fee_kind(fee_text: &str, fee_condition: &str) -> FeeKind {
    if fee_text.contains("永年無料") || (fee_text.contains(FREE) && !fee_text.contains("初年度"))
    {
        return FeeKind::PermanentlyFree;
    }

    if fee_condition.contains("条件") || fee_text.contains("初年度無料") || fee_text.contains("条件付")
    {
        return FeeKind::ConditionallyFree;
    }

    let amount = digit_run_pattern()
        .find(fee_text)
        .and_then(|run| parse_grouped_digits(run.as_str()));
    FeeKind::Paid { amount }
}

pub(crate) fn lounge_access(text: &str) -> LoungeAccess {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == UNAVAILABLE {
        LoungeAccess::None
    } else if trimmed.contains("国内+海外") {
        LoungeAccess::DomesticAndInternational
    } else if trimmed.contains("国内主要空港") {
        LoungeAccess::DomesticMajor
    } else {
        LoungeAccess::Other
    }
}

fn marked_available(text: &str) -> bool {
    text.contains(AVAILABLE)
}

fn contactless_supported(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan") && trimmed != UNAVAILABLE
}

/// Borrowed view of the raw columns the typed traits are derived from.
pub(crate) struct TraitSource<'a> {
    pub annual_fee: &'a str,
    pub fee_condition: &'a str,
    pub travel_insurance: &'a str,
    pub advantages: &'a str,
    pub disadvantages: &'a str,
    pub lounge: &'a str,
    pub concierge: &'a str,
    pub contactless: &'a str,
    pub etc_fee: &'a str,
    pub family_card: &'a str,
    pub instant_issuance: &'a str,
    pub virtual_card: &'a str,
    pub numberless: &'a str,
    pub signup_bonus_points: &'a str,
}

pub(crate) fn derive_traits(source: &TraitSource<'_>) -> CardTraits {
    CardTraits {
        fee_kind: fee_kind(source.annual_fee, source.fee_condition),
        fee_mentions_free: source.annual_fee.contains(FREE),
        fee_yen: parse_yen_to_int(source.annual_fee),
        travel_insurance: marked_available(source.travel_insurance),
        mentions_domestic: source.advantages.contains("国内")
            || source.disadvantages.contains("国内"),
        lounge: lounge_access(source.lounge),
        concierge: marked_available(source.concierge),
        contactless: contactless_supported(source.contactless),
        etc_free: source.etc_fee.contains(FREE),
        family_card: marked_available(source.family_card),
        instant_issuance: marked_available(source.instant_issuance),
        virtual_card: marked_available(source.virtual_card),
        numberless: marked_available(source.numberless),
        signup_bonus: has_bonus(source.signup_bonus_points),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yen_amounts_drop_grouping_commas() {
        assert_eq!(parse_yen_to_int("11,000円"), 11_000);
        assert_eq!(parse_yen_to_int("年会費 1,375 円（税込）"), 1_375);
        assert_eq!(parse_yen_to_int("0円"), 0);
    }

    #[test]
    fn man_amounts_are_rounded_to_whole_yen() {
        assert_eq!(parse_yen_to_int("3.3万"), 33_000);
        assert_eq!(parse_yen_to_int("1.1万円相当"), 11_000);
        assert_eq!(parse_yen_to_int("14.3万"), 143_000);
    }

    #[test]
    fn bare_and_embedded_numbers_are_accepted() {
        assert_eq!(parse_yen_to_int("22000"), 22_000);
        assert_eq!(parse_yen_to_int("22,000"), 22_000);
        assert_eq!(parse_yen_to_int("年間5500程度"), 5_500);
    }

    #[test]
    fn free_or_unreadable_fees_parse_to_zero() {
        assert_eq!(parse_yen_to_int("無料"), 0);
        assert_eq!(parse_yen_to_int("永年無料"), 0);
        assert_eq!(parse_yen_to_int(""), 0);
        assert_eq!(parse_yen_to_int("要問い合わせ"), 0);
    }

    #[test]
    fn bonus_detection_reads_first_number() {
        assert!(has_bonus("5,000ポイント"));
        assert!(!has_bonus("0ポイント"));
        assert!(has_bonus("最大 10000 pt"));
        assert!(has_bonus("豪華特典あり"));
        assert!(!has_bonus(""));
        assert!(!has_bonus("nan"));
        assert!(!has_bonus("  NaN "));
    }

    #[test]
    fn bonus_detection_defaults_to_true_for_unreadable_digit_runs() {
        assert!(has_bonus("特典,最大0pt"));
        assert!(has_bonus("99999999999999999999999ポイント"));
    }

    #[test]
    fn fee_kind_distinguishes_free_conditional_and_paid() {
        assert_eq!(fee_kind("永年無料", ""), FeeKind::PermanentlyFree);
        assert_eq!(fee_kind("無料", ""), FeeKind::PermanentlyFree);
        assert_eq!(
            fee_kind("初年度無料（2年目以降1,375円）", ""),
            FeeKind::ConditionallyFree
        );
        assert_eq!(
            fee_kind("1,375円", "年1回利用で翌年無料の条件あり"),
            FeeKind::ConditionallyFree
        );
        assert_eq!(
            fee_kind("11,000円", ""),
            FeeKind::Paid {
                amount: Some(11_000)
            }
        );
        assert_eq!(fee_kind("要確認", ""), FeeKind::Paid { amount: None });
    }

    #[test]
    fn lounge_levels_are_recognised() {
        assert_eq!(lounge_access(""), LoungeAccess::None);
        assert_eq!(lounge_access("なし"), LoungeAccess::None);
        assert_eq!(
            lounge_access("国内+海外（プライオリティ・パス）"),
            LoungeAccess::DomesticAndInternational
        );
        assert_eq!(lounge_access("国内主要空港"), LoungeAccess::DomesticMajor);
        assert_eq!(lounge_access("一部空港"), LoungeAccess::Other);
    }

    #[test]
    fn clean_text_strips_nan_and_byte_order_marks() {
        assert_eq!(clean_text(" nan "), "");
        assert_eq!(clean_text("\u{feff}カード名"), "カード名");
        assert_eq!(parse_numeric("1.25"), 1.25);
        assert_eq!(parse_numeric("1.0%"), 0.0);
        assert_eq!(parse_numeric("NaN"), 0.0);
    }
}
