//! Display helpers shared by every screen

use rust_decimal::{Decimal, RoundingStrategy};

const BEER_TYPES: [&str; 7] = ["IPA", "Lager", "Stout", "Ale", "Wheat", "Porter", "Pilsner"];
const BEER_ICONS: [&str; 3] = ["🍺", "🍻", "🥂"];

/// Format a price as US dollars, e.g. `$1,234.50`
pub fn format_price(price: Decimal) -> String {
    let rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Beer style derived from the length of its name
///
/// Length is counted in UTF-16 code units, so an emoji counts as two.
pub fn beverage_type(name: &str) -> &'static str {
    BEER_TYPES[utf16_len(name) % BEER_TYPES.len()]
}

/// Icon derived from the length of a name
pub fn name_icon(name: &str) -> &'static str {
    BEER_ICONS[utf16_len(name) % BEER_ICONS.len()]
}

fn utf16_len(name: &str) -> usize {
    name.encode_utf16().count()
}

/// Medal for the top three ranks (0-based)
pub fn rank_badge(index: usize) -> Option<&'static str> {
    match index {
        0 => Some("🥇"),
        1 => Some("🥈"),
        2 => Some("🥉"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(dec!(0)), "$0.00");
        assert_eq!(format_price(dec!(5)), "$5.00");
        assert_eq!(format_price(dec!(12.3)), "$12.30");
        assert_eq!(format_price(dec!(999.999)), "$1,000.00");
        assert_eq!(format_price(dec!(1234567.891)), "$1,234,567.89");
    }

    #[test]
    fn test_format_price_rounds_half_away_from_zero() {
        assert_eq!(format_price(dec!(2.345)), "$2.35");
        assert_eq!(format_price(dec!(2.335)), "$2.34");
    }

    #[test]
    fn test_format_negative_price() {
        assert_eq!(format_price(dec!(-1500.5)), "-$1,500.50");
        assert_eq!(format_price(dec!(-0.001)), "$0.00");
    }

    #[test]
    fn test_beverage_type_is_deterministic() {
        assert_eq!(beverage_type("Hazy"), "Ale");
        assert_eq!(beverage_type("Hazy"), beverage_type("Lazy"));
        assert_eq!(beverage_type(""), "IPA");
        assert_eq!(beverage_type("Midnight Porter"), "Lager");
    }

    #[test]
    fn test_name_length_counts_utf16_units() {
        assert_eq!(beverage_type("🍺 Ale"), "Porter");
        assert_eq!(name_icon("🍺 Ale"), "🍺");
        assert_eq!(beverage_type("Café"), "Wheat");
    }

    #[test]
    fn test_name_icon() {
        assert_eq!(name_icon("abc"), "🍺");
        assert_eq!(name_icon("abcd"), "🍻");
    }

    #[test]
    fn test_rank_badge() {
        assert_eq!(rank_badge(0), Some("🥇"));
        assert_eq!(rank_badge(2), Some("🥉"));
        assert_eq!(rank_badge(3), None);
    }
}
