use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CalcError;

/// Whole VND. Never floating point.
pub type Money = i64;

/// Stake unit. Not currency: multiplied by the price table to get VND.
pub type Points = Decimal;

/// Kiểu chơi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum PlayType {
    /// Bao lô 2 số
    Cover2,
    /// Bao lô 3 số
    Cover3,
    /// Bao lô 4 số
    Cover4,
    /// Bao đảo 2 số
    Reversed2,
    /// Bao đảo 3 số
    Reversed3,
    /// Đầu
    Head,
    /// Đuôi
    Tail,
    /// Đầu đuôi
    HeadTail,
    /// Đá
    Pair,
    /// Đá xiên
    CrossPair,
    /// Đá vòng
    RoundRobin,
    /// Xiên 2
    Parlay2,
    /// Xiên 3
    Parlay3,
    /// Xiên 4
    Parlay4,
    /// 7 lô miền nam
    SevenLine,
    /// 8 lô Hà Nội
    EightLine,
}

impl PlayType {
    pub const ALL: [PlayType; 16] = [
        PlayType::Cover2,
        PlayType::Cover3,
        PlayType::Cover4,
        PlayType::Reversed2,
        PlayType::Reversed3,
        PlayType::Head,
        PlayType::Tail,
        PlayType::HeadTail,
        PlayType::Pair,
        PlayType::CrossPair,
        PlayType::RoundRobin,
        PlayType::Parlay2,
        PlayType::Parlay3,
        PlayType::Parlay4,
        PlayType::SevenLine,
        PlayType::EightLine,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            PlayType::Cover2 => "BAO_LO_2",
            PlayType::Cover3 => "BAO_LO_3",
            PlayType::Cover4 => "BAO_LO_4",
            PlayType::Reversed2 => "BAO_DAO_2",
            PlayType::Reversed3 => "BAO_DAO_3",
            PlayType::Head => "DAU",
            PlayType::Tail => "DUOI",
            PlayType::HeadTail => "DAU_DUOI",
            PlayType::Pair => "DA",
            PlayType::CrossPair => "DA_XIEN",
            PlayType::RoundRobin => "DA_VONG",
            PlayType::Parlay2 => "XIEN_2",
            PlayType::Parlay3 => "XIEN_3",
            PlayType::Parlay4 => "XIEN_4",
            PlayType::SevenLine => "BAY_LO",
            PlayType::EightLine => "TAM_LO",
        }
    }

    /// Unknown codes fall back to bao lô 2 số.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        PlayType::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .unwrap_or(PlayType::Cover2)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlayType::Cover2 => "Bao Lô 2 số",
            PlayType::Cover3 => "Bao Lô 3 số",
            PlayType::Cover4 => "Bao Lô 4 số",
            PlayType::Reversed2 => "Bao Đảo 2 số",
            PlayType::Reversed3 => "Bao Đảo 3 số",
            PlayType::Head => "Đầu",
            PlayType::Tail => "Đuôi",
            PlayType::HeadTail => "Đầu Đuôi",
            PlayType::Pair => "Đá",
            PlayType::CrossPair => "Đá Xiên",
            PlayType::RoundRobin => "Đá Vòng",
            PlayType::Parlay2 => "Xiên 2",
            PlayType::Parlay3 => "Xiên 3",
            PlayType::Parlay4 => "Xiên 4",
            PlayType::SevenLine => "7 Lô MN",
            PlayType::EightLine => "8 Lô HN",
        }
    }

    /// Digit width every played number must have.
    pub fn digits(&self) -> usize {
        match self {
            PlayType::Cover3 | PlayType::Reversed3 => 3,
            PlayType::Cover4 => 4,
            _ => 2,
        }
    }

    /// Scope whose rate is used when the requested scope has none.
    pub fn home_scope(&self) -> StationScope {
        match self {
            PlayType::EightLine => StationScope::Capital,
            _ => StationScope::Single,
        }
    }

    pub fn is_pair_family(&self) -> bool {
        matches!(
            self,
            PlayType::Pair | PlayType::CrossPair | PlayType::RoundRobin
        )
    }

    /// How many numbers a line of this type must hold.
    pub fn accepts_count(&self, count: usize) -> bool {
        match self {
            PlayType::Pair => count == 2,
            PlayType::RoundRobin | PlayType::CrossPair => count >= 2,
            PlayType::Parlay2 => count == 2,
            PlayType::Parlay3 => count == 3,
            PlayType::Parlay4 => count == 4,
            _ => count >= 1,
        }
    }

    pub fn parlay_of(size: usize) -> Option<Self> {
        match size {
            2 => Some(PlayType::Parlay2),
            3 => Some(PlayType::Parlay3),
            4 => Some(PlayType::Parlay4),
            _ => None,
        }
    }
}

impl From<String> for PlayType {
    fn from(code: String) -> Self {
        PlayType::from_code(&code)
    }
}

impl From<PlayType> for &'static str {
    fn from(play: PlayType) -> Self {
        play.code()
    }
}

impl fmt::Display for PlayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Loại đài: which rate column applies.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "String", into = "&'static str")]
pub enum StationScope {
    #[default]
    Single,
    Dual,
    Capital,
    Pooled,
}

impl StationScope {
    pub const ALL: [StationScope; 4] = [
        StationScope::Single,
        StationScope::Dual,
        StationScope::Capital,
        StationScope::Pooled,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            StationScope::Single => "MOT_DAI",
            StationScope::Dual => "HAI_DAI",
            StationScope::Capital => "HA_NOI",
            StationScope::Pooled => "BAO_CHUNG",
        }
    }

    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        StationScope::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            StationScope::Single => "1 Đài",
            StationScope::Dual => "2 Đài",
            StationScope::Capital => "Hà Nội",
            StationScope::Pooled => "Bao Chung",
        }
    }
}

impl From<String> for StationScope {
    fn from(code: String) -> Self {
        StationScope::from_code(&code)
    }
}

impl From<StationScope> for &'static str {
    fn from(scope: StationScope) -> Self {
        scope.code()
    }
}

impl fmt::Display for StationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One parsed betting instruction. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WagerLine {
    pub numbers: Vec<String>,
    pub points: Points,
    pub play_type: PlayType,
    #[serde(default)]
    pub station_scope: StationScope,
    /// Canonical station names seen on (or inherited by) the source line.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl WagerLine {
    pub fn new<I, S>(numbers: I, points: Points, play_type: PlayType, station_scope: StationScope) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            numbers: numbers.into_iter().map(Into::into).collect(),
            points,
            play_type,
            station_scope,
            stations: Vec::new(),
            raw: None,
        }
    }

    pub fn with_stations(mut self, stations: Vec<String>) -> Self {
        self.stations = stations;
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    /// Structural check run by the calculators: numbers are digits of the
    /// play type's width, and pair and parlay types get a count they can use.
    /// `line` is the 1-based position used in error messages.
    pub fn validate(&self, line: usize) -> Result<(), CalcError> {
        if self.numbers.is_empty() {
            return Err(CalcError::EmptyNumbers { line });
        }
        if let Some(bad) = self.numbers.iter().find(|n| !is_playable_number(n)) {
            return Err(CalcError::InvalidNumber {
                line,
                number: bad.clone(),
            });
        }
        let expected = self.play_type.digits();
        if let Some(bad) = self.numbers.iter().find(|n| n.len() != expected) {
            return Err(CalcError::NumberWidth {
                line,
                number: bad.clone(),
                play: self.play_type,
                expected,
            });
        }
        if !self.play_type.accepts_count(self.numbers.len()) {
            return Err(CalcError::NumberCount {
                line,
                play: self.play_type,
                count: self.numbers.len(),
            });
        }
        if self.points <= Decimal::ZERO {
            return Err(CalcError::NonPositivePoints {
                line,
                points: self.points,
            });
        }
        Ok(())
    }
}

fn is_playable_number(number: &str) -> bool {
    (2..=4).contains(&number.len()) && number.bytes().all(|b| b.is_ascii_digit())
}

/// Tiền thu for one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRevenue {
    pub amount: Money,
    pub rate: Decimal,
    /// Numbers, permutations or pairs the stake is multiplied by.
    pub units: u32,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueReport {
    pub total: Money,
    pub per_line: Vec<LineRevenue>,
}

/// One winning match inside a line: a number, a pair or a parlay set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub target: Vec<String>,
    pub occurrences: u32,
    pub amount: Money,
}

/// Tiền trả for one line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePayout {
    pub amount: Money,
    pub hits: Vec<Hit>,
}

impl LinePayout {
    pub fn is_winning(&self) -> bool {
        !self.hits.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutReport {
    pub total: Money,
    pub per_line: Vec<LinePayout>,
}

impl PayoutReport {
    /// Winning lines with their 1-based line number.
    pub fn winning_lines(&self) -> impl Iterator<Item = (usize, &LinePayout)> {
        self.per_line
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_winning())
            .map(|(i, p)| (i + 1, p))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Profit,
    Loss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub total_revenue: Money,
    pub total_payout: Money,
    pub net: Money,
    pub outcome: Outcome,
    /// net / revenue × 100, absent when nothing was collected.
    pub margin_percent: Option<Decimal>,
}

/// A customer's bill for one draw day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub customer: String,
    pub date: NaiveDate,
    pub lines: Vec<WagerLine>,
}
