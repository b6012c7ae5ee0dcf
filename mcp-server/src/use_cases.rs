use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use lode_lib::stations::{Region, stations_for_date};
use lode_lib::{
    Bill, DrawResult, PriceTable, WagerLine, calculate_bill_with, compute_payout_with,
    compute_profit, compute_revenue_with, format_money, format_money_short, parse_wager_text,
    settle_day_with,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Bill parsing and settlement tools. Holds nothing but the price table;
/// every call works on its own arguments.
pub struct BillUseCase {
    table: Arc<PriceTable>,
}

impl BillUseCase {
    pub fn new(table: Arc<PriceTable>) -> Self {
        Self { table }
    }

    pub async fn parse_bill(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let text = arguments
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing text parameter"))?;

        let lines = parse_wager_text(text);

        Ok(json!({
            "success": true,
            "count": lines.len(),
            "lines": lines
        })
        .to_string())
    }

    pub async fn calculate_revenue(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let lines = wager_lines(arguments)?;
        let revenue = compute_revenue_with(&self.table, &lines)?;

        Ok(json!({
            "success": true,
            "lines": lines,
            "total": revenue.total,
            "total_text": format_money(revenue.total),
            "total_short": format_money_short(revenue.total),
            "per_line": revenue.per_line
        })
        .to_string())
    }

    pub async fn calculate_payout(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let lines = wager_lines(arguments)?;
        let draw = draw_argument(arguments)?
            .ok_or_else(|| anyhow::anyhow!("Missing draw parameter"))?;
        let payout = compute_payout_with(&self.table, &lines, &draw)?;
        let winning: Vec<usize> = payout.winning_lines().map(|(n, _)| n).collect();

        Ok(json!({
            "success": true,
            "total": payout.total,
            "total_text": format_money(payout.total),
            "total_short": format_money_short(payout.total),
            "winning_lines": winning,
            "per_line": payout.per_line
        })
        .to_string())
    }

    pub async fn calculate_profit(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let total_revenue = arguments
            .get("total_revenue")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| anyhow::anyhow!("Missing total_revenue parameter"))?;

        let total_payout = arguments
            .get("total_payout")
            .and_then(|v| v.as_i64())
            .ok_or_else(|| anyhow::anyhow!("Missing total_payout parameter"))?;

        let summary = compute_profit(total_revenue, total_payout);

        Ok(json!({
            "success": true,
            "summary": summary,
            "text": summary.to_string()
        })
        .to_string())
    }

    pub async fn calculate_bill(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let lines = wager_lines(arguments)?;
        let draw = draw_argument(arguments)?;
        let report = calculate_bill_with(&self.table, &lines, draw.as_ref())?;
        let text = report.profit.as_ref().map(|p| p.to_string());

        Ok(json!({
            "success": true,
            "report": report,
            "text": text
        })
        .to_string())
    }

    pub async fn settle_day(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let raw_bills = arguments
            .get("bills")
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow::anyhow!("Missing bills parameter"))?;
        let draw = draw_argument(arguments)?
            .ok_or_else(|| anyhow::anyhow!("Missing draw parameter"))?;

        let bills = raw_bills
            .iter()
            .enumerate()
            .map(|(i, raw)| bill_from_json(raw).with_context(|| format!("bill #{}", i + 1)))
            .collect::<Result<Vec<_>>>()?;

        let day = settle_day_with(&self.table, &bills, &draw)?;

        Ok(json!({
            "success": true,
            "settlement": day,
            "text": day.total.to_string()
        })
        .to_string())
    }
}

/// Draw result parsing and the weekly draw calendar.
pub struct DrawUseCase;

impl DrawUseCase {
    pub fn new() -> Self {
        Self
    }

    pub async fn parse_draw(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let text = arguments
            .get("text")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing text parameter"))?;

        let draw = DrawResult::parse_text(text)
            .ok_or_else(|| anyhow::anyhow!("No prize numbers found in draw text"))?;

        Ok(json!({
            "success": true,
            "draw": draw
        })
        .to_string())
    }

    pub async fn draw_schedule(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let date = arguments
            .get("date")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing date parameter"))?;
        let date = parse_date(date)?;

        Ok(json!({
            "success": true,
            "date": date,
            "weekday": date.weekday().to_string(),
            "south": stations_for_date(Region::South, date),
            "central": stations_for_date(Region::Central, date),
            "north": stations_for_date(Region::North, date)
        })
        .to_string())
    }
}

impl Default for DrawUseCase {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD"))
}

/// `lines` (structured) wins over `text` (parsed) when both are given.
fn wager_lines(arguments: &HashMap<String, Value>) -> Result<Vec<WagerLine>> {
    if let Some(lines) = arguments.get("lines") {
        return serde_json::from_value(lines.clone()).context("Invalid lines parameter");
    }
    let text = arguments
        .get("text")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing text or lines parameter"))?;
    Ok(parse_wager_text(text))
}

/// `draw` is either result text or a structured DrawResult.
fn draw_argument(arguments: &HashMap<String, Value>) -> Result<Option<DrawResult>> {
    match arguments.get("draw") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => DrawResult::parse_text(text)
            .map(Some)
            .ok_or_else(|| anyhow::anyhow!("No prize numbers found in draw text")),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .context("Invalid draw parameter"),
    }
}

fn bill_from_json(raw: &Value) -> Result<Bill> {
    let fields: HashMap<String, Value> =
        serde_json::from_value(raw.clone()).context("Bill must be an object")?;

    let customer = fields
        .get("customer")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing customer"))?
        .to_string();
    let date = fields
        .get("date")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("Missing date"))?;

    Ok(Bill {
        customer,
        date: parse_date(date)?,
        lines: wager_lines(&fields)?,
    })
}
