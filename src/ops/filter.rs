//! Filters (spec.md §4.4, "Filters"). Every filter here returns `[e]` on
//! accept or `[ ]` on reject - filters never produce `N/A`.

use fnv::FnvHashSet;

use crate::charclass::{self, CountKind};
use crate::collections::OrderedSet;
use crate::entry::Outcome;
use crate::keyboard::KeyboardLayout;
use crate::oracle::LexicalOracle;

pub fn filter_result(e: &str, accept: bool) -> Outcome {
    if accept {
        Outcome::single(e.to_string())
    } else {
        Outcome::empty()
    }
}

pub fn count_cmp_min(e: &str, kind: CountKind, n: usize) -> bool {
    kind.count(e) >= n
}

pub fn count_cmp_max(e: &str, kind: CountKind, n: usize) -> bool {
    kind.count(e) <= n
}

pub fn count_cmp_has(e: &str, kind: CountKind, n: usize) -> bool {
    kind.count(e) == n
}

pub fn min_length(e: &str, n: usize) -> bool {
    e.chars().count() >= n
}

pub fn max_length(e: &str, n: usize) -> bool {
    e.chars().count() <= n
}

pub fn is_regular_word(e: &str, oracle: &dyn LexicalOracle, lang: &str) -> bool {
    oracle.contains(e, lang)
}

pub fn is_popular_word(e: &str, oracle: &dyn LexicalOracle, model: &str) -> bool {
    oracle.vocab_contains(e, model)
}

pub fn is_pattern(e: &str) -> bool {
    let chars: Vec<char> = e.chars().collect();
    let n = chars.len();
    if n >= 3 && chars.iter().all(|&c| c == chars[0]) {
        return true;
    }
    if n >= 4 && n % 2 == 0 {
        let (a, b) = (chars[0], chars[1]);
        if a != b && chars.chunks(2).all(|pair| pair[0] == a && pair[1] == b) {
            return true;
        }
    }
    false
}

pub fn is_sc(e: &str) -> bool {
    charclass::all_special(e)
}

pub fn is_walk(e: &str, layout: &KeyboardLayout, min_walk: f64, min_sub_walk: f64) -> bool {
    let chars: Vec<char> = e.chars().collect();
    if (chars.len() as f64) < min_walk {
        return false;
    }
    crate::keyboard::is_walk(&chars, layout, min_sub_walk.round().max(1.0) as usize)
}

/// `sequence` is treated as a ring when `wrap` is set: the entry must be a
/// contiguous run of `sequence` (case-insensitively), with the run allowed
/// to cross the end-to-start boundary.
pub fn is_part_of(e: &str, sequence: &str, entry_min_length: usize, min_sequence_length: usize, wrap: bool) -> bool {
    let entry_len = e.chars().count();
    if entry_len < entry_min_length || sequence.chars().count() < min_sequence_length {
        return false;
    }
    let needle = e.to_lowercase();
    let seq = sequence.to_lowercase();
    if seq.contains(&needle) {
        return true;
    }
    if wrap {
        let seq_chars: Vec<char> = seq.chars().collect();
        let wrap_len = seq_chars.len() + entry_len.saturating_sub(1);
        let wrapped: String = seq_chars
            .iter()
            .cycle()
            .take(wrap_len)
            .collect();
        return wrapped.contains(&needle);
    }
    false
}

pub fn sieve(e: &str, allowed: &FnvHashSet<char>) -> bool {
    e.chars().all(|c| allowed.contains(&c))
}

pub fn glist_in(e: &str, set: &OrderedSet) -> bool {
    set.contains(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_pattern_matches_spec_law() {
        assert!(is_pattern("aaaa"));
        assert!(is_pattern("abab"));
        assert!(!is_pattern("abcabc"));
    }
}
