//! Kết quả xổ số reduced to what settlement needs.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("static pattern"));

static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,4})[/.\-]([0-9]{1,2})[/.\-]([0-9]{1,4})$").expect("static pattern")
});

/// Prize numbers in free text: whole digit runs of 2 to 6 digits. Longer or
/// shorter runs are not cut into pieces, and calendar dates are skipped.
fn prize_numbers(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|token| !is_date(token))
        .flat_map(|token| DIGIT_RUN.find_iter(token).map(|m| m.as_str()))
        .filter(|number| (2..=6).contains(&number.len()))
}

/// `18/10/2024`, `18-10-24`, `2024-10-18`. The parts must form a real date.
fn is_date(token: &str) -> bool {
    let token = token.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    let Some(caps) = DATE_TOKEN.captures(token) else {
        return false;
    };
    let part = |i: usize| caps[i].parse::<u32>().ok();
    let (Some(a), Some(b), Some(c)) = (part(1), part(2), part(3)) else {
        return false;
    };
    let (first_len, last_len) = (caps[1].len(), caps[3].len());
    let ymd = match (first_len, last_len) {
        (4, 1..=2) => Some((a as i32, b, c)),
        (1..=2, 4) => Some((c as i32, b, a)),
        (1..=2, 2) => Some((2000 + c as i32, b, a)),
        _ => None,
    };
    ymd.is_some_and(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).is_some())
}

/// The outcome of one draw. Read-only once built; every line of a settlement
/// batch is evaluated against the same value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    /// Last two digits of every prize number (duplicates kept).
    pub two_digit_hits: Vec<String>,
    /// Last three digits of every prize number with at least three digits.
    pub three_digit_hits: Vec<String>,
    /// Last four digits of every prize number with at least four digits.
    #[serde(default)]
    pub four_digit_hits: Vec<String>,
    /// Tens digit of the top prize.
    pub head: Option<char>,
    /// Units digit of the top prize.
    pub tail: Option<char>,
}

impl DrawResult {
    /// Builds the hit lists from raw prize strings. The first entry is the top
    /// prize (giải đặc biệt). An entry may hold several numbers separated by
    /// commas, spaces or dashes.
    pub fn from_prizes<I, S>(prizes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = DrawResult::default();
        let mut top_seen = false;

        for prize in prizes {
            for number in prize_numbers(prize.as_ref()) {
                if !top_seen {
                    result.set_top_prize(number);
                    top_seen = true;
                }
                result.push_number(number);
            }
            // An empty top prize field still counts as "the top prize".
            top_seen = true;
        }
        result
    }

    /// Parses operator-entered result text: every 2-6 digit run is a prize
    /// number; the top prize is the first with five or more digits, else the
    /// first number. `None` when the text holds no numbers.
    pub fn parse_text(text: &str) -> Option<Self> {
        let numbers: Vec<&str> = prize_numbers(text).collect();
        let top = numbers
            .iter()
            .find(|n| n.len() >= 5)
            .or_else(|| numbers.first())?;

        let mut result = DrawResult::default();
        result.set_top_prize(top);
        for number in &numbers {
            result.push_number(number);
        }
        Some(result)
    }

    fn set_top_prize(&mut self, number: &str) {
        let digits: Vec<char> = number.chars().collect();
        self.tail = digits.last().copied();
        self.head = digits.len().checked_sub(2).map(|i| digits[i]);
    }

    fn push_number(&mut self, number: &str) {
        let len = number.len();
        if len >= 2 {
            self.two_digit_hits.push(number[len - 2..].to_string());
        }
        if len >= 3 {
            self.three_digit_hits.push(number[len - 3..].to_string());
        }
        if len >= 4 {
            self.four_digit_hits.push(number[len - 4..].to_string());
        }
    }

    /// Hit list matching a number's width.
    fn hits_for_width(&self, width: usize) -> &[String] {
        match width {
            3 => &self.three_digit_hits,
            4 => &self.four_digit_hits,
            _ => &self.two_digit_hits,
        }
    }

    /// Occurrences of `number` among the hits of its own width.
    pub fn occurrences(&self, number: &str) -> u32 {
        self.hits_for_width(number.len())
            .iter()
            .filter(|hit| hit.as_str() == number)
            .count() as u32
    }

    /// Whether `number` came out at least once as a last-two-digit hit.
    pub fn has_two_digit(&self, number: &str) -> bool {
        self.two_digit_hits.iter().any(|hit| hit == number)
    }
}
