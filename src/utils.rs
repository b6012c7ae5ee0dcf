use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::Money;

/// Smallest multiple of 1000 that is >= `raw`. `None` when it does not fit
/// in `Money`.
pub fn ceil_to_thousand(raw: Decimal) -> Option<Money> {
    (raw / dec!(1000)).ceil().checked_mul(dec!(1000))?.to_i64()
}

/// Whole VND, rounding any sub-đồng remainder up.
pub fn to_money(raw: Decimal) -> Option<Money> {
    raw.ceil().to_i64()
}

fn round_up_thousand(amount: Money) -> Money {
    let rem = amount % 1000;
    if rem > 0 { amount - rem + 1000 } else { amount - rem }
}

/// `1234500` -> `1.235.000đ` (rounded up to the next 1000, vi-VN grouping).
pub fn format_money(amount: Money) -> String {
    let rounded = round_up_thousand(amount);
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if rounded < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped.push('đ');
    grouped
}

/// Compact form for chat replies: `1.5tr`, `432K`, `0đ`.
pub fn format_money_short(amount: Money) -> String {
    let rounded = round_up_thousand(amount);
    if rounded >= 1_000_000 {
        format!("{:.1}tr", rounded as f64 / 1_000_000.0)
    } else if rounded >= 1000 {
        format!("{}K", rounded / 1000)
    } else {
        format!("{}đ", rounded)
    }
}
