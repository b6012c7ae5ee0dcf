// Property-based tests for the settlement arithmetic and the parser.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use lode_lib::combinatorics::{pair_count, pairs, permutation_count, permutations};
use lode_lib::*;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Points with up to two decimals, 0.01 ..= 500.00.
fn arb_points() -> impl Strategy<Value = Decimal> {
    (1i64..=50_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_numbers(width: usize) -> impl Strategy<Value = Vec<String>> {
    let number = prop::string::string_regex(&format!("[0-9]{{{width}}}")).unwrap();
    prop::collection::vec(number, 1..8)
}

fn arb_scope() -> impl Strategy<Value = StationScope> {
    prop::sample::select(StationScope::ALL.to_vec())
}

/// Bill-like text: numbers, keywords, station names and noise.
fn arb_bill_text() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        4 => r"[0-9]{1,5}",
        2 => r"[0-9]{1,3}(d|đ|\.5d| điểm)",
        2 => prop::sample::select(vec![
            "bl", "bl3", "bl4", "bao lô", "bd", "bđ", "đảo", "đá", "da", "đá vòng", "dv",
            "dx", "xiên", "xien2", "đầu", "đuôi", "dd", "7lo", "8lo", "bao", "2 đài",
            "1dai", "bc", "hn", "tn", "ag", "tp.hcm", "đà nẵng",
        ])
        .prop_map(String::from),
        1 => r"[a-zà-ỹ,.;:/\-]{1,6}",
        1 => prop::sample::select(vec!["\n", ",,", ", "]).prop_map(String::from),
    ];
    prop::collection::vec(token, 0..24).prop_map(|tokens| tokens.join(" "))
}

// ---------------------------------------------------------------------------
// Revenue rounding
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn revenue_is_ceiling_to_thousand(
        numbers in arb_numbers(2),
        points in arb_points(),
        scope in arb_scope(),
    ) {
        let table = PriceTable::standard();
        let rate = table.revenue_rate(PlayType::Cover2, scope);
        let line = WagerLine::new(numbers.clone(), points, PlayType::Cover2, scope);

        let amount = compute_revenue(&[line]).unwrap().total;
        let raw = Decimal::from(numbers.len() as u32) * points * rate * dec!(1000);

        prop_assert_eq!(amount % 1000, 0);
        prop_assert!(Decimal::from(amount) >= raw, "{} < {}", amount, raw);
        prop_assert!(Decimal::from(amount) - raw < dec!(1000), "{} too far above {}", amount, raw);
    }

    #[test]
    fn report_total_is_sum_of_lines(
        first in arb_numbers(2),
        second in arb_numbers(3),
        points in arb_points(),
    ) {
        let lines = vec![
            WagerLine::new(first, points, PlayType::Reversed2, StationScope::Single),
            WagerLine::new(second, points, PlayType::Cover3, StationScope::Dual),
        ];
        let report = compute_revenue(&lines).unwrap();
        let summed: Money = report.per_line.iter().map(|l| l.amount).sum();
        prop_assert_eq!(report.total, summed);
    }
}

// ---------------------------------------------------------------------------
// Combinatorics
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn permutation_count_bounds(number in r"[0-9]{2,4}") {
        let charged = permutation_count(&number);
        let distinct = permutations(&number).len() as u32;
        let factorial: u32 = (1..=number.len() as u32).product();

        prop_assert!(charged <= factorial);
        prop_assert!(charged >= distinct);
        if number.len() < 4 {
            prop_assert_eq!(charged, distinct);
        }
    }

    #[test]
    fn pair_count_matches_enumeration(n in 0usize..16) {
        let items: Vec<usize> = (0..n).collect();
        prop_assert_eq!(pairs(&items).len(), pair_count(n));
        prop_assert_eq!(pair_count(n), n * n.saturating_sub(1) / 2);
    }
}

// ---------------------------------------------------------------------------
// Payout and profit
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn cover_counts_but_pair_does_not(
        hits in prop::collection::vec(r"[0-9]{2}", 1..30),
        pick in any::<prop::sample::Index>(),
    ) {
        let number = pick.get(&hits).clone();
        let occurrences = hits.iter().filter(|h| **h == number).count() as Money;
        let draw = DrawResult { two_digit_hits: hits.clone(), ..Default::default() };

        let cover = WagerLine::new([number.clone()], Decimal::ONE, PlayType::Cover2, StationScope::Single);
        let pair = WagerLine::new([number.clone(), number], Decimal::ONE, PlayType::Pair, StationScope::Single);
        let report = compute_payout(&[cover, pair], &draw).unwrap();

        prop_assert_eq!(report.per_line[0].amount, occurrences * 74_000);
        prop_assert_eq!(report.per_line[1].amount, 730_000);
    }

    #[test]
    fn profit_outcome_follows_net(revenue in 0i64..1_000_000_000, payout in 0i64..1_000_000_000) {
        let summary = compute_profit(revenue, payout);
        prop_assert_eq!(summary.net, revenue - payout);
        let expected = if revenue >= payout { Outcome::Profit } else { Outcome::Loss };
        prop_assert_eq!(summary.outcome, expected);
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn parsed_lines_are_always_calculable(text in arb_bill_text()) {
        let lines = parse_wager_text(&text);
        for line in &lines {
            prop_assert!(!line.numbers.is_empty());
            prop_assert!(line.points > Decimal::ZERO);
            for number in &line.numbers {
                prop_assert_eq!(number.len(), line.play_type.digits(), "{:?} in {:?}", number, text);
            }
        }
        prop_assert!(compute_revenue(&lines).is_ok());
    }
}
