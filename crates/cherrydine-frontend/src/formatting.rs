/// Currency sign rendered after amounts.
pub const CURRENCY_SIGN: char = '₽';

/// Formats an amount with two decimal places, dropping the fraction when it
/// rounds to zero: `10.0` renders as `"10"`, `10.5` as `"10.50"`.
///
/// The output is accepted by [`parse_price`], which recovers the amount
/// rounded to cents.
pub fn format_price(value: f64) -> String {
    let rounded = format!("{value:.2}");
    match rounded.strip_suffix(".00") {
        Some("-0") => "0".to_string(),
        Some(integer) => integer.to_string(),
        None => rounded,
    }
}

/// Formats an amount followed by the currency sign, e.g. `"30 ₽"`.
pub fn format_price_with_currency(value: f64) -> String {
    format!("{} {CURRENCY_SIGN}", format_price(value))
}

/// Parses an amount rendered by [`format_price`] or
/// [`format_price_with_currency`]. Whitespace and the currency sign are
/// ignored.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != CURRENCY_SIGN)
        .collect();
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}
