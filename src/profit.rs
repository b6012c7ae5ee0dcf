//! Lời / lỗ over a set of lines settled together.

use rust_decimal::Decimal;
use std::fmt;

use crate::types::{Money, Outcome, ProfitSummary};
use crate::utils::format_money;

/// A tie counts as profit.
pub fn compute_profit(total_revenue: Money, total_payout: Money) -> ProfitSummary {
    let net = total_revenue.saturating_sub(total_payout);
    let outcome = if net >= 0 {
        Outcome::Profit
    } else {
        Outcome::Loss
    };
    let margin_percent = (total_revenue != 0).then(|| {
        (Decimal::from(net) * Decimal::ONE_HUNDRED / Decimal::from(total_revenue)).round_dp(2)
    });

    ProfitSummary {
        total_revenue,
        total_payout,
        net,
        outcome,
        margin_percent,
    }
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Profit => "LỜI",
            Outcome::Loss => "LỖ",
        }
    }
}

impl fmt::Display for ProfitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.net > 0 { "+" } else { "" };
        write!(f, "{} {}{}", self.outcome.label(), sign, format_money(self.net))
    }
}
