// src/ranker.rs
//! Candidate ranking for unknown words.
//!
//! Two short lists are merged:
//! - the `per_metric` closest keys by edit distance, over the whole key set;
//! - the `per_metric` closest keys by padded Hamming distance, over keys whose
//!   length is within `length_window` chars of the query (cheap pre-filter).
//!
//! Ties are broken by lexical key order. The merged list keeps the edit-distance
//! picks first, then any Hamming-only picks, each in sorted order.

use crate::distance::{levenshtein, padded_hamming};
use serde::Serialize;
use std::collections::HashSet;

pub const DEFAULT_PER_METRIC: usize = 3;
pub const DEFAULT_LENGTH_WINDOW: usize = 1;

/// Ranker knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankerParams {
    /// How many picks each metric contributes before the union.
    pub per_metric: usize,
    /// Max length difference for a key to be scored by Hamming distance.
    pub length_window: usize,
}

impl Default for RankerParams {
    fn default() -> Self {
        Self {
            per_metric: DEFAULT_PER_METRIC,
            length_window: DEFAULT_LENGTH_WINDOW,
        }
    }
}

/// Ordered, de-duplicated lexicon keys offered to the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuggestionList {
    keys: Vec<String>,
}

impl SuggestionList {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// 1-based access, matching the numbers shown to the operator.
    pub fn get(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.keys.get(i))
            .map(String::as_str)
    }

    /// Interpret an operator answer. Anything that is not a plain in-range number
    /// (blank, text, signs, 0, too large) selects nothing.
    pub fn select(&self, answer: &str) -> Option<&str> {
        let answer = answer.trim();
        if answer.is_empty() || !answer.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        answer.parse::<usize>().ok().and_then(|n| self.get(n))
    }
}

/// Rank `keys` against `query`. Callers pass lower-cased text.
pub fn rank<'a, I>(query: &str, keys: I, params: &RankerParams) -> SuggestionList
where
    I: IntoIterator<Item = &'a str>,
{
    let keys: Vec<&str> = keys.into_iter().collect();
    if keys.is_empty() {
        return SuggestionList::default();
    }
    let query_len = query.chars().count();

    let mut by_edit: Vec<(usize, &str)> = keys
        .iter()
        .map(|k| (levenshtein(query, k), *k))
        .collect();
    by_edit.sort_unstable();

    let mut by_hamming: Vec<(usize, &str)> = keys
        .iter()
        .filter(|k| k.chars().count().abs_diff(query_len) <= params.length_window)
        .map(|k| (padded_hamming(query, k), *k))
        .collect();
    by_hamming.sort_unstable();

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (_, k) in by_edit
        .iter()
        .take(params.per_metric)
        .chain(by_hamming.iter().take(params.per_metric))
    {
        if seen.insert(*k) {
            out.push((*k).to_string());
        }
    }

    SuggestionList { keys: out }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(query: &str, keys: &[&str]) -> Vec<String> {
        rank(query, keys.iter().copied(), &RankerParams::default())
            .iter()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn edit_picks_first_then_hamming_only_additions() {
        let got = ranked("abcd", &["abc", "bcd", "abd", "xbcd"]);
        assert_eq!(got, vec!["abc", "abd", "bcd", "xbcd"]);
    }

    #[test]
    fn hamming_prefilter_does_not_restrict_edit_distance() {
        // "abcd" is two chars longer: edit distance only
        let got = ranked("ab", &["abcd"]);
        assert_eq!(got, vec!["abcd"]);
    }

    #[test]
    fn empty_key_set_yields_empty_list() {
        assert!(ranked("hola", &[]).is_empty());
    }

    #[test]
    fn ties_fall_back_to_lexical_order() {
        let got = ranked("xx", &["zz", "yy", "ww", "vv"]);
        assert_eq!(got, vec!["vv", "ww", "yy"]);
    }

    #[test]
    fn at_most_six_distinct_keys() {
        let keys = [
            "a", "b", "c", "abcdefgh", "abcdefgz", "abcdefzz", "bbcdefgh", "zzzzzzzz",
        ];
        let got = ranked("abcdefgh", &keys);
        assert!(got.len() <= 6);
        let uniq: HashSet<_> = got.iter().collect();
        assert_eq!(uniq.len(), got.len());
        assert!(got.iter().all(|k| keys.contains(&k.as_str())));
    }

    #[test]
    fn selection_is_one_based_and_lenient() {
        let list = rank("hola", ["hola", "bola"], &RankerParams::default());
        assert_eq!(list.select("1"), Some("hola"));
        assert_eq!(list.select(" 2 "), Some("bola"));
        assert_eq!(list.select("0"), None);
        assert_eq!(list.select("3"), None);
        assert_eq!(list.select(""), None);
        assert_eq!(list.select("-1"), None);
        assert_eq!(list.select("uno"), None);
    }
}
