//! Bill text parser.
//!
//! Turns free-form bill text (chat messages, OCR output, form input) into
//! [`WagerLine`]s. Parsing is best effort: anything that cannot be read as a
//! wager is dropped, never reported as an error.
//!
//! Per logical line:
//! 1. lowercase and collapse whitespace
//! 2. strip station names, remembering them for following lines of the same block
//! 3. classify the station scope
//! 4. `<numbers> dd <A> bao <B>` expands to a đầu đuôi line and a bao lô line per number
//! 5. detect the play type from the ordered keyword list
//! 6. read the points and the played numbers

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::stations::{self, HA_NOI};
use crate::types::{PlayType, Points, StationScope, WagerLine};

/// Play keyword groups, tested in declaration order (first match wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Reversed,
    RoundRobin,
    CrossPair,
    Pair,
    Parlay,
    HeadTail,
    Head,
    Tail,
    SevenLine,
    EightLine,
    Cover3,
    Cover4,
    Cover2,
}

impl Keyword {
    fn is_pair_family(self) -> bool {
        matches!(self, Keyword::RoundRobin | Keyword::CrossPair | Keyword::Pair)
    }
}

// Order matters: "đá vòng" / "đá xiên" before "đá", "đầu đuôi" before "đầu",
// "bl3" / "bl4" before the generic "bl" / "bao lô".
static PLAY_KEYWORDS: LazyLock<Vec<(Keyword, Regex)>> = LazyLock::new(|| {
    [
        (Keyword::Reversed, r"\b(?:bao\s*đảo|bao\s*dao|đảo|dao|bđ|bd)[23]?\b"),
        (Keyword::RoundRobin, r"\b(?:đá\s*vòng|da\s*vong|đv|dv)\b"),
        (Keyword::CrossPair, r"\b(?:đá\s*xiên|da\s*xien|đx|dx)\b"),
        (Keyword::Pair, r"\b(?:đá|da)\b"),
        (Keyword::Parlay, r"\b(?:xiên|xien)\s*[234]?\b"),
        (Keyword::HeadTail, r"\b(?:đầu\s*đuôi|dau\s*duoi|dd|đđ)\b"),
        (Keyword::Head, r"\b(?:đầu|dau)\b"),
        (Keyword::Tail, r"\b(?:đuôi|duoi)\b"),
        (Keyword::SevenLine, r"\b(?:7|bảy|bay)\s*(?:lô|lo)\b"),
        (Keyword::EightLine, r"\b(?:8|tám|tam)\s*(?:lô|lo)\b"),
        (Keyword::Cover3, r"\b(?:bl3|bao\s*lô\s*3|bao\s*lo\s*3)\b"),
        (Keyword::Cover4, r"\b(?:bl4|bao\s*lô\s*4|bao\s*lo\s*4)\b"),
        (Keyword::Cover2, r"\b(?:bl2|bl|bao\s*lô|bao\s*lo|bao)\b"),
    ]
    .into_iter()
    .map(|(keyword, pattern)| (keyword, Regex::new(pattern).expect("keyword pattern")))
    .collect()
});

static STATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b(?:{})\b", station_alternation())).expect("station pattern")
});

static STATION_AFTER_COMMA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r",\s*(\b(?:{})\b)", station_alternation())).expect("station pattern")
});

static DOUBLE_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",{2,}").expect("static pattern"));

static DUAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:2|hai)\s*(?:đài|dai)\b").expect("static pattern"));

static SINGLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:1|một|mot)\s*(?:đài|dai)\b").expect("static pattern"));

static POOLED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:bao\s*chung|chung|bc)\b").expect("static pattern"));

static COMPOSITE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"((?:\b[0-9]{2}\s+)+)(?:dd|đđ|đầu\s*đuôi|dau\s*duoi)\s+([0-9]+(?:\.[0-9]+)?)\s*(?:d|đ|điểm|diem)?\s+bao\s+([0-9]+(?:\.[0-9]+)?)",
    )
    .expect("static pattern")
});

static POINTS_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]+)?)(?:d|đ|điểm|diem)$").expect("static pattern")
});

static BARE_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").expect("static pattern"));

static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2,4}$").expect("static pattern"));

static DOTTED_NUMBERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2,4}(?:\.[0-9]{2,4})+$").expect("static pattern"));

const POINT_MARKERS: [&str; 4] = ["d", "đ", "điểm", "diem"];

/// Words after which a bare amount is a stake, never a number list.
const STAKE_WORDS: [&str; 6] = ["dd", "đđ", "đuôi", "duoi", "bao", "xiên"];

const PAIR_WORDS: [&str; 8] = ["đá", "da", "vòng", "vong", "dv", "đv", "dx", "đx"];

fn station_alternation() -> String {
    stations::all_aliases()
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

/// Parses one text block. Station inheritance starts empty on every call.
pub fn parse_wager_text(text: &str) -> Vec<WagerLine> {
    let mut block = BlockContext::default();
    split_logical_lines(text)
        .iter()
        .flat_map(|line| block.parse_line(line))
        .collect()
}

/// Splits a block on newlines, `,,` and on a comma that introduces a new
/// station name. Lines come back lowercased and trimmed.
pub fn split_logical_lines(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let marked = DOUBLE_COMMA.replace_all(&lowered, "\n");
    let marked = STATION_AFTER_COMMA.replace_all(&marked, "\n$1");
    marked
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

/// State scoped to one parse call.
#[derive(Debug, Default)]
struct BlockContext {
    stations: Vec<&'static str>,
}

impl BlockContext {
    fn parse_line(&mut self, raw: &str) -> Vec<WagerLine> {
        let mut text = normalize(raw);

        let mut found: Vec<&'static str> = Vec::new();
        for m in STATION_RE.find_iter(&text) {
            if let Some(station) = stations::lookup(m.as_str()) {
                if !found.contains(&station.name) {
                    found.push(station.name);
                }
            }
        }
        if !found.is_empty() {
            self.stations = found;
            text = collapse(&STATION_RE.replace_all(&text, " "));
        }

        let scope = classify_scope(&self.stations, &text);
        for scope_re in [&*DUAL_RE, &*SINGLE_RE, &*POOLED_RE] {
            text = collapse(&scope_re.replace_all(&text, " "));
        }

        let stations: Vec<String> = self.stations.iter().map(|s| s.to_string()).collect();

        if let Some(lines) = parse_composite(&text, scope, &stations, raw) {
            return lines;
        }

        let keyword = detect_keyword(&text);
        let tokens = tokenize(&text);

        let (points, consumed) = extract_points(&tokens)
            .or_else(|| {
                keyword
                    .is_pair_family()
                    .then(|| points_after_pair_word(&tokens))
                    .flatten()
            })
            .unwrap_or((Decimal::ONE, Vec::new()));

        let numbers: Vec<&str> = tokens
            .iter()
            .enumerate()
            .filter(|(i, token)| !consumed.contains(i) && NUMBER_TOKEN.is_match(token))
            .map(|(_, token)| *token)
            .collect();

        let Some(first) = numbers.first() else {
            debug!(line = raw, "no numbers, line dropped");
            return Vec::new();
        };

        let width = number_width(keyword, first);
        let (kept, skipped): (Vec<&str>, Vec<&str>) =
            numbers.iter().partition(|n| n.len() == width);
        if !skipped.is_empty() {
            debug!(line = raw, ?skipped, width, "numbers of the wrong width ignored");
        }

        let Some(play_type) = infer_play_type(keyword, width, kept.len()) else {
            warn!(line = raw, ?keyword, count = kept.len(), "cannot form a wager, line dropped");
            return Vec::new();
        };

        vec![
            WagerLine::new(kept, points, play_type, scope)
                .with_stations(stations)
                .with_raw(raw),
        ]
    }
}

fn normalize(line: &str) -> String {
    let replaced: String = line
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ',' | ';' | ':' | '/' | '-' | '+' | '*' | '(' | ')' | '[' | ']' | '=' | '_' | '|' => ' ',
            other => other,
        })
        .collect();
    split_dotted_numbers(&collapse(&replaced))
}

/// `12.34.56` is three numbers. A dotted amount that reads as a stake
/// (`12.5 d`, `đá 12.50`, `bao 10.25`) is left whole.
fn split_dotted_numbers(text: &str) -> String {
    let tokens: Vec<&str> = text.split(' ').collect();
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        let bare = token.trim_end_matches('.');
        let marker_follows = tokens
            .get(i + 1)
            .is_some_and(|next| POINT_MARKERS.contains(next));
        let after_stake_word = i > 0
            && (PAIR_WORDS.contains(&tokens[i - 1]) || STAKE_WORDS.contains(&tokens[i - 1]));
        let is_stake = marker_follows || after_stake_word;
        if DOTTED_NUMBERS.is_match(bare) && !is_stake {
            out.extend(bare.split('.').map(String::from));
        } else {
            out.push((*token).to_string());
        }
    }
    out.join(" ")
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
        .collect()
}

fn classify_scope(stations: &[&str], text: &str) -> StationScope {
    if stations.len() >= 2 {
        StationScope::Dual
    } else if stations.contains(&HA_NOI) {
        StationScope::Capital
    } else if DUAL_RE.is_match(text) {
        StationScope::Dual
    } else if POOLED_RE.is_match(text) {
        StationScope::Pooled
    } else {
        StationScope::Single
    }
}

fn detect_keyword(text: &str) -> Keyword {
    PLAY_KEYWORDS
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(keyword, _)| *keyword)
        .unwrap_or(Keyword::Cover2)
}

fn parse_points(raw: &str) -> Option<Points> {
    Decimal::from_str(raw).ok().filter(|p| *p > Decimal::ZERO)
}

/// First `<n>d` / `<n> điểm` marker. Returns the points and the token
/// positions it used.
fn extract_points(tokens: &[&str]) -> Option<(Points, Vec<usize>)> {
    for (i, token) in tokens.iter().enumerate() {
        if let Some(caps) = POINTS_TOKEN.captures(token) {
            if let Some(points) = parse_points(&caps[1]) {
                return Some((points, vec![i]));
            }
        }
        let marker_follows = tokens
            .get(i + 1)
            .is_some_and(|next| POINT_MARKERS.contains(next));
        if marker_follows && BARE_AMOUNT.is_match(token) {
            if let Some(points) = parse_points(token) {
                return Some((points, vec![i, i + 1]));
            }
        }
    }
    None
}

/// `12 34 đá 10`: a bare amount right after the pair keyword is the stake.
fn points_after_pair_word(tokens: &[&str]) -> Option<(Points, Vec<usize>)> {
    for i in 0..tokens.len().saturating_sub(1) {
        let word = tokens[i];
        let is_pair_word = PAIR_WORDS.contains(&word)
            || (matches!(word, "xiên" | "xien")
                && i > 0
                && matches!(tokens[i - 1], "đá" | "da"));
        if is_pair_word && BARE_AMOUNT.is_match(tokens[i + 1]) {
            if let Some(points) = parse_points(tokens[i + 1]) {
                return Some((points, vec![i + 1]));
            }
        }
    }
    None
}

fn number_width(keyword: Keyword, first: &str) -> usize {
    match keyword {
        Keyword::Reversed if first.len() == 3 => 3,
        Keyword::Cover3 => 3,
        Keyword::Cover4 => 4,
        _ => 2,
    }
}

fn infer_play_type(keyword: Keyword, width: usize, count: usize) -> Option<PlayType> {
    if count == 0 {
        return None;
    }
    let play = match keyword {
        Keyword::Reversed if width == 3 => PlayType::Reversed3,
        Keyword::Reversed => PlayType::Reversed2,
        Keyword::RoundRobin if count >= 2 => PlayType::RoundRobin,
        Keyword::Pair if count == 2 => PlayType::Pair,
        Keyword::Pair if count > 2 => PlayType::RoundRobin,
        Keyword::CrossPair if count >= 2 => PlayType::CrossPair,
        Keyword::RoundRobin | Keyword::Pair | Keyword::CrossPair => return None,
        Keyword::Parlay => return PlayType::parlay_of(count),
        Keyword::HeadTail => PlayType::HeadTail,
        Keyword::Head => PlayType::Head,
        Keyword::Tail => PlayType::Tail,
        Keyword::SevenLine => PlayType::SevenLine,
        Keyword::EightLine => PlayType::EightLine,
        Keyword::Cover3 => PlayType::Cover3,
        Keyword::Cover4 => PlayType::Cover4,
        Keyword::Cover2 => PlayType::Cover2,
    };
    Some(play)
}

fn parse_composite(
    text: &str,
    scope: StationScope,
    stations: &[String],
    raw: &str,
) -> Option<Vec<WagerLine>> {
    let caps = COMPOSITE_RE.captures(text)?;
    let head_tail_points = parse_points(&caps[2]);
    let cover_points = parse_points(&caps[3]);

    let mut lines = Vec::new();
    for number in caps[1].split_whitespace() {
        if let Some(points) = head_tail_points {
            lines.push(
                WagerLine::new([number], points, PlayType::HeadTail, scope)
                    .with_stations(stations.to_vec())
                    .with_raw(format!("{raw} [dd]")),
            );
        }
        if let Some(points) = cover_points {
            lines.push(
                WagerLine::new([number], points, PlayType::Cover2, scope)
                    .with_stations(stations.to_vec())
                    .with_raw(format!("{raw} [bao]")),
            );
        }
    }
    Some(lines)
}
