//! Bảng giá: revenue rates (thu) and payout per hit (trả).
//!
//! Revenue rates are thousands of VND per point; payouts are whole VND per
//! point per winning occurrence. Lookups never fail: a missing entry falls
//! back to the play type's home scope, then to bao lô 2 số, 1 đài.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::CalcError;
use crate::types::{Money, PlayType, StationScope};

const LAST_RESORT_RATE: Decimal = dec!(14.4);

static STANDARD: LazyLock<PriceTable> = LazyLock::new(PriceTable::default);

/// Rate per station scope. `None` means the column is not offered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeRates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dual: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pooled: Option<Decimal>,
}

impl ScopeRates {
    fn new(
        single: Option<Decimal>,
        dual: Option<Decimal>,
        capital: Option<Decimal>,
        pooled: Option<Decimal>,
    ) -> Self {
        Self {
            single,
            dual,
            capital,
            pooled,
        }
    }

    pub fn get(&self, scope: StationScope) -> Option<Decimal> {
        match scope {
            StationScope::Single => self.single,
            StationScope::Dual => self.dual,
            StationScope::Capital => self.capital,
            StationScope::Pooled => self.pooled,
        }
    }
}

/// Tiền thưởng, VND per point per hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutTable {
    pub cover_2: Money,
    pub cover_3: Money,
    pub cover_4: Money,
    pub head_tail: Money,
    pub seven_line: Money,
    pub eight_line: Money,
    pub pair_single: Money,
    pub pair_single_cross: Money,
    pub pair_dual: Money,
    pub pair_capital: Money,
    pub pair_capital_cross: Money,
    pub parlay_2: Money,
    pub parlay_3: Money,
    pub parlay_4: Money,
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self {
            cover_2: 74_000,
            cover_3: 640_000,
            cover_4: 5_300_000,
            head_tail: 74_000,
            seven_line: 74_000,
            eight_line: 74_000,
            pair_single: 730_000,
            pair_single_cross: 750_000,
            pair_dual: 540_000,
            pair_capital: 640_000,
            pair_capital_cross: 700_000,
            parlay_2: 640_000,
            parlay_3: 5_300_000,
            parlay_4: 40_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    pub revenue: BTreeMap<PlayType, ScopeRates>,
    #[serde(default)]
    pub payout: PayoutTable,
}

impl Default for PriceTable {
    /// Bảng giá 2024.
    fn default() -> Self {
        let cover_2 = ScopeRates::new(
            Some(dec!(14.4)),
            Some(dec!(28.8)),
            Some(dec!(21.6)),
            Some(dec!(74)),
        );
        let cover_3 = ScopeRates::new(Some(dec!(13.6)), Some(dec!(27.2)), Some(dec!(18.4)), None);
        let pair = ScopeRates::new(Some(dec!(28.8)), Some(dec!(57.6)), Some(dec!(43.2)), None);
        let parlay = ScopeRates::new(Some(dec!(1.6)), Some(dec!(3.2)), Some(dec!(3.2)), None);

        let revenue = BTreeMap::from([
            (PlayType::Cover2, cover_2.clone()),
            (PlayType::Reversed2, cover_2),
            (PlayType::Cover3, cover_3.clone()),
            (PlayType::Reversed3, cover_3),
            (
                PlayType::Cover4,
                ScopeRates::new(Some(dec!(12.8)), Some(dec!(25.6)), Some(dec!(16)), None),
            ),
            (
                PlayType::Head,
                ScopeRates::new(Some(dec!(0.8)), Some(dec!(1.6)), Some(dec!(3.2)), None),
            ),
            (
                PlayType::Tail,
                ScopeRates::new(Some(dec!(0.8)), Some(dec!(1.6)), Some(dec!(0.8)), None),
            ),
            (
                PlayType::HeadTail,
                ScopeRates::new(Some(dec!(1.6)), Some(dec!(3.2)), Some(dec!(4.0)), None),
            ),
            (PlayType::Pair, pair.clone()),
            (PlayType::RoundRobin, pair),
            (
                PlayType::CrossPair,
                ScopeRates::new(Some(dec!(36)), None, None, None),
            ),
            (PlayType::Parlay2, parlay.clone()),
            (PlayType::Parlay3, parlay.clone()),
            (PlayType::Parlay4, parlay),
            (
                PlayType::SevenLine,
                ScopeRates::new(Some(dec!(5.6)), Some(dec!(11.2)), None, None),
            ),
            (
                PlayType::EightLine,
                ScopeRates::new(None, None, Some(dec!(6.4)), None),
            ),
        ]);

        Self {
            revenue,
            payout: PayoutTable::default(),
        }
    }
}

impl PriceTable {
    pub fn standard() -> &'static PriceTable {
        &STANDARD
    }

    pub fn from_json(raw: &str) -> Result<Self, CalcError> {
        serde_json::from_str(raw).map_err(|e| CalcError::PriceTable(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self, CalcError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| CalcError::PriceTable(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| CalcError::PriceTable(format!("{}: {e}", path.display())))
    }

    /// The JSON table at `path`, or the standard table when none is configured.
    pub fn load(path: Option<&Path>) -> Result<Self, CalcError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::standard().clone()),
        }
    }

    /// Rate explicitly present in the table, without fallback.
    pub fn defined_rate(&self, play: PlayType, scope: StationScope) -> Option<Decimal> {
        self.revenue.get(&play).and_then(|rates| rates.get(scope))
    }

    pub fn revenue_rate(&self, play: PlayType, scope: StationScope) -> Decimal {
        self.defined_rate(play, scope)
            .or_else(|| self.defined_rate(play, play.home_scope()))
            .or_else(|| self.defined_rate(PlayType::Cover2, StationScope::Single))
            .unwrap_or(LAST_RESORT_RATE)
    }

    /// Every (play type, scope, rate) present in the table.
    pub fn defined_rates(&self) -> impl Iterator<Item = (PlayType, StationScope, Decimal)> + '_ {
        self.revenue.iter().flat_map(|(play, rates)| {
            StationScope::ALL
                .into_iter()
                .filter_map(move |scope| rates.get(scope).map(|rate| (*play, scope, rate)))
        })
    }

    pub fn payout_per_hit(&self, play: PlayType, scope: StationScope) -> Money {
        let p = &self.payout;
        match play {
            PlayType::Cover2 | PlayType::Reversed2 => p.cover_2,
            PlayType::Cover3 | PlayType::Reversed3 => p.cover_3,
            PlayType::Cover4 => p.cover_4,
            PlayType::Head | PlayType::Tail | PlayType::HeadTail => p.head_tail,
            PlayType::SevenLine => p.seven_line,
            PlayType::EightLine => p.eight_line,
            PlayType::Pair | PlayType::RoundRobin => match scope {
                StationScope::Capital => p.pair_capital,
                StationScope::Dual => p.pair_dual,
                _ => p.pair_single,
            },
            PlayType::CrossPair => match scope {
                StationScope::Capital => p.pair_capital_cross,
                _ => p.pair_single_cross,
            },
            PlayType::Parlay2 => p.parlay_2,
            PlayType::Parlay3 => p.parlay_3,
            PlayType::Parlay4 => p.parlay_4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rates() {
        let table = PriceTable::standard();
        assert_eq!(table.revenue_rate(PlayType::Cover2, StationScope::Single), dec!(14.4));
        assert_eq!(table.revenue_rate(PlayType::Reversed2, StationScope::Capital), dec!(21.6));
        assert_eq!(table.revenue_rate(PlayType::Cover2, StationScope::Pooled), dec!(74));
        assert_eq!(table.revenue_rate(PlayType::Tail, StationScope::Capital), dec!(0.8));
    }

    #[test]
    fn test_missing_scope_falls_back_to_home_scope() {
        let table = PriceTable::standard();
        // No bao chung column for bao lô 3 số
        assert_eq!(table.revenue_rate(PlayType::Cover3, StationScope::Pooled), dec!(13.6));
        assert_eq!(table.revenue_rate(PlayType::CrossPair, StationScope::Dual), dec!(36));
        // Đá xiên has one rate whatever the station
        assert_eq!(table.revenue_rate(PlayType::CrossPair, StationScope::Capital), dec!(36));
        assert_eq!(table.defined_rate(PlayType::CrossPair, StationScope::Capital), None);
        // 8 lô only exists for Hà Nội
        assert_eq!(table.revenue_rate(PlayType::EightLine, StationScope::Single), dec!(6.4));
    }

    #[test]
    fn test_missing_play_type_falls_back_to_cover_2() {
        let table = PriceTable::from_json(r#"{"revenue": {"BAO_LO_2": {"single": 15}}}"#).unwrap();
        assert_eq!(table.revenue_rate(PlayType::Head, StationScope::Dual), dec!(15));
        assert_eq!(table.payout, PayoutTable::default());

        let empty = PriceTable::from_json(r#"{"revenue": {}}"#).unwrap();
        assert_eq!(empty.revenue_rate(PlayType::Pair, StationScope::Single), LAST_RESORT_RATE);
    }

    #[test]
    fn test_unknown_code_in_table_is_cover_2() {
        let table = PriceTable::from_json(r#"{"revenue": {"LO_LA": {"single": 20}}}"#).unwrap();
        assert_eq!(table.defined_rate(PlayType::Cover2, StationScope::Single), Some(dec!(20)));
    }

    #[test]
    fn test_pair_payout_by_scope() {
        let table = PriceTable::standard();
        assert_eq!(table.payout_per_hit(PlayType::Pair, StationScope::Single), 730_000);
        assert_eq!(table.payout_per_hit(PlayType::RoundRobin, StationScope::Dual), 540_000);
        assert_eq!(table.payout_per_hit(PlayType::Pair, StationScope::Capital), 640_000);
        assert_eq!(table.payout_per_hit(PlayType::CrossPair, StationScope::Single), 750_000);
        assert_eq!(table.payout_per_hit(PlayType::CrossPair, StationScope::Capital), 700_000);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = PriceTable::from_json("not json").unwrap_err();
        assert!(matches!(err, CalcError::PriceTable(_)));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("lode-bang-gia-{}.json", std::process::id()));
        fs::write(&path, r#"{"revenue": {"BAO_LO_2": {"single": 15}}}"#).unwrap();
        let table = PriceTable::load(Some(path.as_path()));
        fs::remove_file(&path).unwrap();

        let table = table.unwrap();
        assert_eq!(table.revenue_rate(PlayType::Cover2, StationScope::Single), dec!(15));
        assert_eq!(PriceTable::load(None).unwrap(), PriceTable::default());
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let path = std::env::temp_dir().join("lode-no-such-table.json");
        match PriceTable::from_path(&path).unwrap_err() {
            CalcError::PriceTable(message) => {
                assert!(message.contains("lode-no-such-table.json"), "{message}")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_round_trip_through_json() {
        let table = PriceTable::default();
        let raw = serde_json::to_string(&table).unwrap();
        assert_eq!(PriceTable::from_json(&raw).unwrap(), table);
    }
}
