// ==========================================
// 库存管理核心 - 金额与日期格式化
// ==========================================
// fr: 1 234,50 MAD（千分位为窄不换行空格 U+202F，币种前为 U+00A0）
// en: MAD 1,234.50
// 固定两位小数，四舍五入
// ==========================================

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

const FR_GROUP_SEPARATOR: char = '\u{202F}';
const NBSP: char = '\u{A0}';

/// 按语言格式化金额
pub fn format_currency(amount: f64, currency: &str, locale: &str) -> String {
    // 非有限值按 0 输出
    let rounded = Decimal::from_f64(amount)
        .unwrap_or_default()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = rounded.abs();
    let integer = abs.trunc().to_u128().unwrap_or_default().to_string();
    let fraction = (abs.fract() * Decimal::ONE_HUNDRED).to_u32().unwrap_or_default();

    match locale {
        "en" => format!(
            "{sign}{currency}{NBSP}{}.{fraction:02}",
            group_digits(&integer, ','),
        ),
        _ => format!(
            "{sign}{},{fraction:02}{NBSP}{currency}",
            group_digits(&integer, FR_GROUP_SEPARATOR),
        ),
    }
}

/// 按语言格式化日期（fr: dd/mm/yyyy, en: mm/dd/yyyy）
pub fn format_date(date: NaiveDate, locale: &str) -> String {
    match locale {
        "en" => date.format("%m/%d/%Y").to_string(),
        _ => date.format("%d/%m/%Y").to_string(),
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(digits.len() + len / 3 * separator.len_utf8());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fr_currency() {
        assert_eq!(format_currency(90.0, "MAD", "fr"), "90,00\u{A0}MAD");
        assert_eq!(format_currency(1234.5, "MAD", "fr"), "1\u{202F}234,50\u{A0}MAD");
        assert_eq!(
            format_currency(1_234_567.891, "MAD", "fr"),
            "1\u{202F}234\u{202F}567,89\u{A0}MAD"
        );
        assert_eq!(format_currency(0.0, "MAD", "fr"), "0,00\u{A0}MAD");
        assert_eq!(format_currency(0.005, "EUR", "fr"), "0,01\u{A0}EUR");
    }

    #[test]
    fn test_en_currency() {
        assert_eq!(format_currency(1234.5, "MAD", "en"), "MAD\u{A0}1,234.50");
        assert_eq!(format_currency(12.0, "MAD", "en"), "MAD\u{A0}12.00");
        assert_eq!(format_currency(-3.2, "MAD", "en"), "-MAD\u{A0}3.20");
        assert_eq!(format_currency(-0.001, "MAD", "en"), "MAD\u{A0}0.00");
        assert_eq!(format_currency(f64::NAN, "MAD", "en"), "MAD\u{A0}0.00");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(format_date(date, "fr"), "07/03/2026");
        assert_eq!(format_date(date, "en"), "03/07/2026");
    }
}
