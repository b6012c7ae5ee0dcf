//! Tiền thu: what the operator collects per line.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::combinatorics::{pair_count, permutation_count};
use crate::error::CalcError;
use crate::tables::PriceTable;
use crate::types::{LineRevenue, Money, PlayType, RevenueReport, WagerLine};
use crate::utils::ceil_to_thousand;

/// Revenue at the standard price table.
pub fn compute_revenue(lines: &[WagerLine]) -> Result<RevenueReport, CalcError> {
    compute_revenue_with(PriceTable::standard(), lines)
}

pub fn compute_revenue_with(
    table: &PriceTable,
    lines: &[WagerLine],
) -> Result<RevenueReport, CalcError> {
    let mut per_line = Vec::with_capacity(lines.len());
    let mut total: Money = 0;

    for (idx, line) in lines.iter().enumerate() {
        let revenue = line_revenue(table, line, idx + 1)?;
        total = total
            .checked_add(revenue.amount)
            .ok_or(CalcError::Overflow { line: idx + 1 })?;
        per_line.push(revenue);
    }

    Ok(RevenueReport { total, per_line })
}

/// Revenue of a single line. `line_no` is the 1-based position reported in
/// errors.
pub fn line_revenue(
    table: &PriceTable,
    line: &WagerLine,
    line_no: usize,
) -> Result<LineRevenue, CalcError> {
    line.validate(line_no)?;

    let rate = table.revenue_rate(line.play_type, line.station_scope);
    let points = line.points.normalize();
    let shown_rate = rate.normalize();
    let count = line.numbers.len();

    let (units, formula) = match line.play_type {
        PlayType::Reversed2 | PlayType::Reversed3 => {
            let counts: Vec<u32> = line.numbers.iter().map(|n| permutation_count(n)).collect();
            let listed = counts
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(" + ");
            (
                counts.iter().sum(),
                format!("{points} điểm × ({listed}) đảo × {shown_rate}"),
            )
        }
        PlayType::Pair => (1, format!("{points} điểm × 1 cặp × {shown_rate}")),
        PlayType::RoundRobin | PlayType::CrossPair => {
            let pairs = pair_count(count) as u32;
            (pairs, format!("{points} điểm × {pairs} cặp × {shown_rate}"))
        }
        _ => (
            count as u32,
            format!("{count} số × {points} điểm × {shown_rate}"),
        ),
    };

    let amount = line
        .points
        .checked_mul(Decimal::from(units))
        .and_then(|v| v.checked_mul(rate))
        .and_then(|v| v.checked_mul(dec!(1000)))
        .and_then(ceil_to_thousand)
        .ok_or(CalcError::Overflow { line: line_no })?;

    Ok(LineRevenue {
        amount,
        rate,
        units,
        formula,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StationScope;

    fn line(numbers: &[&str], points: Decimal, play: PlayType, scope: StationScope) -> WagerLine {
        WagerLine::new(numbers.iter().copied(), points, play, scope)
    }

    #[test]
    fn test_flat_cover() {
        let report = compute_revenue(&[line(
            &["23", "45", "67"],
            dec!(10),
            PlayType::Cover2,
            StationScope::Single,
        )])
        .unwrap();
        assert_eq!(report.total, 432_000);
        assert_eq!(report.per_line[0].units, 3);
        assert_eq!(report.per_line[0].formula, "3 số × 10 điểm × 14.4");
    }

    #[test]
    fn test_reversed_capital() {
        let report = compute_revenue(&[line(
            &["23"],
            dec!(5),
            PlayType::Reversed2,
            StationScope::Capital,
        )])
        .unwrap();
        assert_eq!(report.total, 216_000);
    }

    #[test]
    fn test_reversed_sums_permutations() {
        // 123 -> 6, 112 -> 3, 111 -> 1
        let rev = line_revenue(
            PriceTable::standard(),
            &line(&["123", "112", "111"], dec!(1), PlayType::Reversed3, StationScope::Single),
            1,
        )
        .unwrap();
        assert_eq!(rev.units, 10);
        // 10 × 13.6 × 1000
        assert_eq!(rev.amount, 136_000);
        assert_eq!(rev.formula, "1 điểm × (6 + 3 + 1) đảo × 13.6");
    }

    #[test]
    fn test_pair_and_round_robin() {
        let table = PriceTable::standard();
        let pair = line_revenue(
            table,
            &line(&["12", "34"], dec!(2), PlayType::Pair, StationScope::Single),
            1,
        )
        .unwrap();
        assert_eq!(pair.amount, 58_000); // 2 × 28.8 × 1000 = 57_600

        let vong = line_revenue(
            table,
            &line(&["12", "34", "56", "78"], dec!(1), PlayType::RoundRobin, StationScope::Dual),
            1,
        )
        .unwrap();
        assert_eq!(vong.units, 6);
        assert_eq!(vong.amount, 346_000); // 6 × 57.6 × 1000 = 345_600
    }

    #[test]
    fn test_rounds_up_to_thousand() {
        // 1 × 0.8 × 1000 = 800
        let rev = line_revenue(
            PriceTable::standard(),
            &line(&["23"], dec!(1), PlayType::Head, StationScope::Single),
            1,
        )
        .unwrap();
        assert_eq!(rev.amount, 1_000);

        let rev = line_revenue(
            PriceTable::standard(),
            &line(&["23"], dec!(0.5), PlayType::Cover2, StationScope::Single),
            1,
        )
        .unwrap();
        assert_eq!(rev.amount, 8_000); // 7_200
    }

    #[test]
    fn test_empty_input_is_zero() {
        let report = compute_revenue(&[]).unwrap();
        assert_eq!(report.total, 0);
        assert!(report.per_line.is_empty());
    }

    #[test]
    fn test_structural_errors_name_the_line() {
        let good = line(&["23"], dec!(1), PlayType::Cover2, StationScope::Single);
        let empty = line(&[], dec!(1), PlayType::Cover2, StationScope::Single);
        assert_eq!(
            compute_revenue(&[good.clone(), empty]).unwrap_err(),
            CalcError::EmptyNumbers { line: 2 }
        );

        let negative = line(&["23"], dec!(-1), PlayType::Cover2, StationScope::Single);
        assert_eq!(
            compute_revenue(&[negative]).unwrap_err(),
            CalcError::NonPositivePoints { line: 1, points: dec!(-1) }
        );

        let junk = line(&["2x"], dec!(1), PlayType::Cover2, StationScope::Single);
        assert!(matches!(
            compute_revenue(&[good, junk]).unwrap_err(),
            CalcError::InvalidNumber { line: 2, .. }
        ));
    }

    #[test]
    fn test_numbers_must_fit_play_type() {
        let reversed_four = line(&["1234"], dec!(1), PlayType::Reversed2, StationScope::Single);
        assert_eq!(
            compute_revenue(&[reversed_four]).unwrap_err(),
            CalcError::NumberWidth {
                line: 1,
                number: "1234".into(),
                play: PlayType::Reversed2,
                expected: 2,
            }
        );

        let cover_three = line(&["23", "123"], dec!(1), PlayType::Cover2, StationScope::Single);
        assert!(matches!(
            compute_revenue(&[cover_three]).unwrap_err(),
            CalcError::NumberWidth { line: 1, expected: 2, .. }
        ));
    }

    #[test]
    fn test_pair_and_parlay_counts() {
        let table = PriceTable::standard();
        let cases = [
            (PlayType::Pair, &["12"][..]),
            (PlayType::Pair, &["12", "34", "56"][..]),
            (PlayType::RoundRobin, &["12"][..]),
            (PlayType::CrossPair, &["12"][..]),
            (PlayType::Parlay2, &["12", "34", "56"][..]),
            (PlayType::Parlay3, &["12", "34"][..]),
            (PlayType::Parlay4, &["12", "34", "56"][..]),
        ];
        for (play, numbers) in cases {
            let err = line_revenue(table, &line(numbers, dec!(1), play, StationScope::Single), 3)
                .unwrap_err();
            assert_eq!(
                err,
                CalcError::NumberCount {
                    line: 3,
                    play,
                    count: numbers.len()
                }
            );
        }

        let parlay = line(&["12", "34", "56"], dec!(1), PlayType::Parlay3, StationScope::Single);
        assert_eq!(line_revenue(table, &parlay, 1).unwrap().amount, 5_000); // 3 × 1.6 × 1000
    }

    #[test]
    fn test_custom_table() {
        let table = PriceTable::from_json(r#"{"revenue": {"BAO_LO_2": {"single": 15}}}"#).unwrap();
        let report = compute_revenue_with(
            &table,
            &[line(&["23", "45"], dec!(1), PlayType::Cover2, StationScope::Single)],
        )
        .unwrap();
        assert_eq!(report.total, 30_000);
    }
}
