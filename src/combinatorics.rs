//! Số đảo and cặp đá counting.

use std::collections::{BTreeMap, BTreeSet};

/// How many reversals (số đảo) a played number is charged for.
///
/// Follows the operator's price sheet, which is not plain multinomial
/// counting for four digits: any 4-digit number with two distinct digits
/// that is not a double pair (e.g. `1112`) is charged 12.
pub fn permutation_count(number: &str) -> u32 {
    let mut counts: BTreeMap<char, u32> = BTreeMap::new();
    for digit in number.chars() {
        *counts.entry(digit).or_insert(0) += 1;
    }
    let distinct = counts.len();

    match number.chars().count() {
        2 => {
            if distinct == 2 {
                2
            } else {
                1
            }
        }
        3 => match distinct {
            3 => 6,
            2 => 3,
            _ => 1,
        },
        4 => match distinct {
            4 => 24,
            3 => 12,
            2 if counts.values().all(|&c| c == 2) => 6,
            2 => 12,
            _ => 1,
        },
        _ => 1,
    }
}

/// All distinct digit arrangements of `number`, sorted.
pub fn permutations(number: &str) -> Vec<String> {
    let mut digits: Vec<char> = number.chars().collect();
    let mut found = BTreeSet::new();
    permute(&mut digits, 0, &mut found);
    found.into_iter().collect()
}

fn permute(digits: &mut [char], start: usize, found: &mut BTreeSet<String>) {
    if start + 1 >= digits.len() {
        found.insert(digits.iter().collect());
        return;
    }
    for i in start..digits.len() {
        digits.swap(start, i);
        permute(digits, start + 1, found);
        digits.swap(start, i);
    }
}

/// Cặp đá vòng for `n` numbers: n(n-1)/2.
pub fn pair_count(n: usize) -> usize {
    if n < 2 { 0 } else { n * (n - 1) / 2 }
}

/// Every unordered pair, in input order.
pub fn pairs<T: Clone>(items: &[T]) -> Vec<(T, T)> {
    let mut out = Vec::with_capacity(pair_count(items.len()));
    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            out.push((a.clone(), b.clone()));
        }
    }
    out
}
