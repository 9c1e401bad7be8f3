use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Year-over-year target applied when the scenario leaves it blank or unreadable.
pub const DEFAULT_TARGET_PERCENT: Decimal = Decimal::from_parts(95, 0, 0, false, 0);

const CENTS: u32 = 2;

/// Reads the leading number out of free text, falling back to `default`.
///
/// Mirrors how the editor treats numeric inputs: surrounding noise after the
/// number is ignored (`"12.5%"` reads as 12.5), while blank or non-numeric
/// text and values too large for a `Decimal` degrade to the default.
pub fn parse_decimal(raw: &str, default: Decimal) -> Decimal {
    leading_number(raw).unwrap_or(default)
}

/// Derived `total` for a transaction line: `quantity * price` rounded to cents.
pub fn line_total(quantity: &str, price: &str) -> String {
    let quantity = parse_decimal(quantity, Decimal::ZERO);
    let price = parse_decimal(price, Decimal::ZERO);
    format_amount(quantity.saturating_mul(price))
}

/// Renders an amount with exactly two fractional digits.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(CENTS, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    rounded.rescale(CENTS);
    rounded.to_string()
}

/// `amount * percent / 100`, saturating rather than overflowing.
pub(crate) fn apply_percent(amount: Decimal, percent: Decimal) -> Decimal {
    amount
        .saturating_mul(percent)
        .checked_div(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

fn leading_number(raw: &str) -> Option<Decimal> {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let mut cursor = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            cursor += 1;
            true
        }
        Some(b'+') => {
            cursor += 1;
            false
        }
        _ => false,
    };

    let integer_start = cursor;
    cursor = skip_digits(bytes, cursor);
    let integer = &text[integer_start..cursor];

    let mut fraction = "";
    if bytes.get(cursor) == Some(&b'.') {
        let fraction_start = cursor + 1;
        let fraction_end = skip_digits(bytes, fraction_start);
        fraction = &text[fraction_start..fraction_end];
        cursor = fraction_end;
    }

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let exponent = read_exponent(text, cursor)?;

    let mantissa = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if integer.is_empty() { "0" } else { integer },
        if fraction.is_empty() { "0" } else { fraction },
    );
    let parsed = if exponent == 0 {
        Decimal::from_str(&mantissa)
    } else {
        Decimal::from_scientific(&format!("{mantissa}e{exponent}"))
    };
    parsed.ok()
}

fn skip_digits(bytes: &[u8], mut cursor: usize) -> usize {
    while bytes.get(cursor).is_some_and(u8::is_ascii_digit) {
        cursor += 1;
    }
    cursor
}

/// Exponent suffix starting at `cursor`; a dangling `e` is treated as absent.
/// Returns `None` only when the exponent digits cannot be represented.
fn read_exponent(text: &str, cursor: usize) -> Option<i64> {
    let bytes = text.as_bytes();
    if !matches!(bytes.get(cursor), Some(b'e' | b'E')) {
        return Some(0);
    }

    let mut digits_start = cursor + 1;
    let negative = match bytes.get(digits_start) {
        Some(b'-') => {
            digits_start += 1;
            true
        }
        Some(b'+') => {
            digits_start += 1;
            false
        }
        _ => false,
    };

    let digits_end = skip_digits(bytes, digits_start);
    if digits_end == digits_start {
        return Some(0);
    }

    let magnitude = text[digits_start..digits_end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}
