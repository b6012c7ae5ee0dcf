//! Bill- and day-level settlement built on the line calculators.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::draw::DrawResult;
use crate::error::CalcError;
use crate::payout::compute_payout_with;
use crate::profit::compute_profit;
use crate::revenue::compute_revenue_with;
use crate::tables::PriceTable;
use crate::types::{Bill, Money, PayoutReport, ProfitSummary, RevenueReport, WagerLine};

/// One bill: revenue always, payout and profit once the draw is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillReport {
    pub lines: Vec<WagerLine>,
    pub revenue: RevenueReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payout: Option<PayoutReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<ProfitSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillSettlement {
    pub customer: String,
    pub date: NaiveDate,
    pub line_count: usize,
    pub revenue: Money,
    pub payout: Money,
    /// 1-based positions of the winning lines.
    pub winning_lines: Vec<usize>,
    pub profit: ProfitSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySettlement {
    pub bills: Vec<BillSettlement>,
    pub total: ProfitSummary,
}

pub fn calculate_bill(
    lines: &[WagerLine],
    draw: Option<&DrawResult>,
) -> Result<BillReport, CalcError> {
    calculate_bill_with(PriceTable::standard(), lines, draw)
}

pub fn calculate_bill_with(
    table: &PriceTable,
    lines: &[WagerLine],
    draw: Option<&DrawResult>,
) -> Result<BillReport, CalcError> {
    let revenue = compute_revenue_with(table, lines)?;
    let payout = draw
        .map(|draw| compute_payout_with(table, lines, draw))
        .transpose()?;
    let profit = payout
        .as_ref()
        .map(|payout| compute_profit(revenue.total, payout.total));

    Ok(BillReport {
        lines: lines.to_vec(),
        revenue,
        payout,
        profit,
    })
}

/// Settles every bill of one day against the same draw. An overflow in the
/// day totals reports the last line of the offending bill, counted across the
/// whole day.
pub fn settle_day(bills: &[Bill], draw: &DrawResult) -> Result<DaySettlement, CalcError> {
    settle_day_with(PriceTable::standard(), bills, draw)
}

pub fn settle_day_with(
    table: &PriceTable,
    bills: &[Bill],
    draw: &DrawResult,
) -> Result<DaySettlement, CalcError> {
    let mut settled = Vec::with_capacity(bills.len());
    let mut day_revenue: Money = 0;
    let mut day_payout: Money = 0;
    let mut day_lines = 0;

    for bill in bills {
        let revenue = compute_revenue_with(table, &bill.lines)?;
        let payout = compute_payout_with(table, &bill.lines, draw)?;
        debug!(
            customer = %bill.customer,
            revenue = revenue.total,
            payout = payout.total,
            "bill settled"
        );

        day_lines += bill.lines.len();
        day_revenue = day_revenue
            .checked_add(revenue.total)
            .ok_or(CalcError::Overflow { line: day_lines })?;
        day_payout = day_payout
            .checked_add(payout.total)
            .ok_or(CalcError::Overflow { line: day_lines })?;

        settled.push(BillSettlement {
            customer: bill.customer.clone(),
            date: bill.date,
            line_count: bill.lines.len(),
            revenue: revenue.total,
            payout: payout.total,
            winning_lines: payout.winning_lines().map(|(n, _)| n).collect(),
            profit: compute_profit(revenue.total, payout.total),
        });
    }

    Ok(DaySettlement {
        bills: settled,
        total: compute_profit(day_revenue, day_payout),
    })
}
