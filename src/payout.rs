//! Dò kết quả: matches wager lines against a draw and prices the hits.
//!
//! Cover types count occurrences (a number that came out twice pays twice).
//! Pair and parlay types only check membership: a pair pays once no matter
//! how often its numbers came out.

use rust_decimal::Decimal;

use crate::combinatorics::{pairs, permutations};
use crate::draw::DrawResult;
use crate::error::CalcError;
use crate::tables::PriceTable;
use crate::types::{Hit, LinePayout, Money, PayoutReport, PlayType, Points, WagerLine};
use crate::utils::to_money;

/// Payout at the standard price table.
pub fn compute_payout(lines: &[WagerLine], draw: &DrawResult) -> Result<PayoutReport, CalcError> {
    compute_payout_with(PriceTable::standard(), lines, draw)
}

pub fn compute_payout_with(
    table: &PriceTable,
    lines: &[WagerLine],
    draw: &DrawResult,
) -> Result<PayoutReport, CalcError> {
    let mut per_line = Vec::with_capacity(lines.len());
    let mut total: Money = 0;

    for (idx, line) in lines.iter().enumerate() {
        let payout = line_payout(table, line, draw, idx + 1)?;
        total = total
            .checked_add(payout.amount)
            .ok_or(CalcError::Overflow { line: idx + 1 })?;
        per_line.push(payout);
    }

    Ok(PayoutReport { total, per_line })
}

pub fn line_payout(
    table: &PriceTable,
    line: &WagerLine,
    draw: &DrawResult,
    line_no: usize,
) -> Result<LinePayout, CalcError> {
    line.validate(line_no)?;

    let matches = match_line(line, draw);
    let per_hit = table.payout_per_hit(line.play_type, line.station_scope);

    let mut payout = LinePayout::default();
    for (target, occurrences) in matches {
        let amount = hit_amount(line.points, per_hit, occurrences)
            .ok_or(CalcError::Overflow { line: line_no })?;
        payout.amount = payout
            .amount
            .checked_add(amount)
            .ok_or(CalcError::Overflow { line: line_no })?;
        payout.hits.push(Hit {
            target,
            occurrences,
            amount,
        });
    }
    Ok(payout)
}

fn hit_amount(points: Points, per_hit: Money, occurrences: u32) -> Option<Money> {
    points
        .checked_mul(Decimal::from(per_hit))?
        .checked_mul(Decimal::from(occurrences))
        .and_then(to_money)
}

/// Winning targets of a line with their occurrence counts. Zero-count
/// targets are left out.
fn match_line(line: &WagerLine, draw: &DrawResult) -> Vec<(Vec<String>, u32)> {
    let numbers = &line.numbers;

    let counted: Vec<(Vec<String>, u32)> = match line.play_type {
        PlayType::Cover2
        | PlayType::Cover3
        | PlayType::Cover4
        | PlayType::SevenLine
        | PlayType::EightLine => numbers
            .iter()
            .map(|n| (vec![n.clone()], draw.occurrences(n)))
            .collect(),
        PlayType::Reversed2 | PlayType::Reversed3 => numbers
            .iter()
            .map(|n| {
                let occurrences: u32 = permutations(n).iter().map(|p| draw.occurrences(p)).sum();
                (vec![n.clone()], occurrences)
            })
            .collect(),
        PlayType::Head => numbers
            .iter()
            .map(|n| (vec![n.clone()], head_matches(n, draw) as u32))
            .collect(),
        PlayType::Tail => numbers
            .iter()
            .map(|n| (vec![n.clone()], tail_matches(n, draw) as u32))
            .collect(),
        PlayType::HeadTail => numbers
            .iter()
            .map(|n| {
                let occurrences = head_matches(n, draw) as u32 + tail_matches(n, draw) as u32;
                (vec![n.clone()], occurrences)
            })
            .collect(),
        PlayType::Pair => match numbers.as_slice() {
            [a, b, ..] => vec![(vec![a.clone(), b.clone()], pair_hit(a, b, draw))],
            _ => Vec::new(),
        },
        PlayType::RoundRobin | PlayType::CrossPair => pairs(numbers)
            .into_iter()
            .map(|(a, b)| {
                let hit = pair_hit(&a, &b, draw);
                (vec![a, b], hit)
            })
            .collect(),
        PlayType::Parlay2 | PlayType::Parlay3 | PlayType::Parlay4 => {
            let all_out = numbers.iter().all(|n| draw.has_two_digit(n));
            vec![(numbers.clone(), all_out as u32)]
        }
    };

    counted.into_iter().filter(|(_, occ)| *occ > 0).collect()
}

fn pair_hit(a: &str, b: &str, draw: &DrawResult) -> u32 {
    (draw.has_two_digit(a) && draw.has_two_digit(b)) as u32
}

fn head_matches(number: &str, draw: &DrawResult) -> bool {
    let tens = number.chars().rev().nth(1);
    tens.is_some() && tens == draw.head
}

fn tail_matches(number: &str, draw: &DrawResult) -> bool {
    let units = number.chars().last();
    units.is_some() && units == draw.tail
}
