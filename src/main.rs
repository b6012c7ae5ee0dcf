mod config;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use lode_lib::{
    Bill, DrawResult, PriceTable, calculate_bill_with, format_money, parse_wager_text,
    settle_day_with,
};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = config::load()?;
    let table = PriceTable::load(config.price_table_path.as_deref())?;

    let bills = read_bills(&config.bills_dir, &config.draw_path)?;
    if bills.is_empty() {
        println!("📭 No bills found in {:?}", config.bills_dir);
        return Ok(());
    }

    match read_draw(&config.draw_path)? {
        Some(draw) => print_settlement(&table, &bills, &draw)?,
        None => {
            println!("⏳ No draw result at {:?}, revenue only.\n", config.draw_path);
            print_revenue(&table, &bills)?;
        }
    }

    Ok(())
}

/// Every `*.txt` in `dir` except the draw file. The file stem is
/// `<customer>` or `<customer>_<YYYY-MM-DD>`.
fn read_bills(dir: &Path, draw_path: &Path) -> Result<Vec<Bill>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") && path != draw_path {
            paths.push(path);
        }
    }
    paths.sort();

    let mut bills = Vec::with_capacity(paths.len());
    for path in paths {
        println!("📄 Reading bill: {:?}", path);
        let text = fs::read_to_string(&path)?;
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let (customer, date) = customer_and_date(stem);
        bills.push(Bill {
            customer,
            date,
            lines: parse_wager_text(&text),
        });
    }
    Ok(bills)
}

fn customer_and_date(stem: &str) -> (String, NaiveDate) {
    if let Some((customer, date)) = stem.rsplit_once('_') {
        if let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return (customer.to_string(), date);
        }
    }
    (stem.to_string(), Local::now().date_naive())
}

fn read_draw(path: &Path) -> Result<Option<DrawResult>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)?;
    Ok(DrawResult::parse_text(&text))
}

fn print_revenue(table: &PriceTable, bills: &[Bill]) -> Result<()> {
    let mut total = 0;
    for bill in bills {
        let report = calculate_bill_with(table, &bill.lines, None)?;
        println!(
            "🎟️ {} ({}): {} lines, thu {}",
            bill.customer,
            bill.date,
            bill.lines.len(),
            format_money(report.revenue.total)
        );
        for (line, revenue) in bill.lines.iter().zip(&report.revenue.per_line) {
            println!(
                "   {} [{}] {} = {}",
                line.play_type,
                line.numbers.join(" "),
                revenue.formula,
                format_money(revenue.amount)
            );
        }
        total += report.revenue.total;
    }
    println!("\n💰 Total thu: {}", format_money(total));
    Ok(())
}

fn print_settlement(table: &PriceTable, bills: &[Bill], draw: &DrawResult) -> Result<()> {
    let day = settle_day_with(table, bills, draw)?;

    for bill in &day.bills {
        println!(
            "🎟️ {} ({}): thu {}, trả {} -> {}",
            bill.customer,
            bill.date,
            format_money(bill.revenue),
            format_money(bill.payout),
            bill.profit
        );
        if !bill.winning_lines.is_empty() {
            println!("   🏆 winning lines: {:?}", bill.winning_lines);
        }
    }

    println!("\n📋 Day total");
    println!("   Thu: {}", format_money(day.total.total_revenue));
    println!("   Trả: {}", format_money(day.total.total_payout));
    match day.total.margin_percent {
        Some(margin) => println!("   ✅ {} ({}%)", day.total, margin),
        None => println!("   ✅ {}", day.total),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_and_date_from_stem() {
        let (customer, date) = customer_and_date("anh_tu_2024-06-13");
        assert_eq!(customer, "anh_tu");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 13).unwrap());

        let (customer, _) = customer_and_date("chi_ba");
        assert_eq!(customer, "chi_ba");
    }
}
