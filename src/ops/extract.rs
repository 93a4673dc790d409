//! Structural extractors (spec.md §4.4, "Extractors / structural").

use fnv::FnvHashSet;
use lazy_static::lazy_static;
use regex::Regex;

use crate::entry::Outcome;

pub fn regex_matches(e: &str, re: &Regex) -> Outcome {
    let matches: Vec<String> = re.find_iter(e).map(|m| m.as_str().to_string()).collect();
    if matches.is_empty() {
        Outcome::NotApplicable
    } else {
        Outcome::Entries(matches)
    }
}

fn extract_runs(e: &str, pred: impl Fn(char) -> bool) -> Outcome {
    let mut runs = Vec::new();
    let mut current = String::new();
    for c in e.chars() {
        if pred(c) {
            current.push(c);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    if runs.is_empty() {
        Outcome::NotApplicable
    } else {
        Outcome::Entries(runs)
    }
}

pub fn get_no(e: &str) -> Outcome {
    extract_runs(e, |c| c.is_ascii_digit())
}

pub fn get_sc(e: &str) -> Outcome {
    extract_runs(e, crate::charclass::is_special)
}

pub fn segments(e: &str, n: usize, min_length: usize) -> Outcome {
    let chars: Vec<char> = e.chars().collect();
    let len = chars.len();
    if len < min_length {
        return Outcome::NotApplicable;
    }
    let top = n.min(len);
    if top < min_length {
        return Outcome::NotApplicable;
    }
    let mut out = Vec::new();
    for l in (min_length..=top).rev() {
        for start in 0..=(len - l) {
            out.push(chars[start..start + l].iter().collect());
        }
    }
    if out.is_empty() {
        Outcome::NotApplicable
    } else {
        Outcome::Entries(out)
    }
}

fn split_pieces(e: &str, sep: char) -> Option<Vec<String>> {
    if !e.contains(sep) {
        return None;
    }
    Some(e.split(sep).filter(|p| !p.is_empty()).map(|s| s.to_string()).collect())
}

pub fn split(e: &str, sep: char) -> Outcome {
    match split_pieces(e, sep) {
        None => Outcome::NotApplicable,
        Some(pieces) => Outcome::Entries(pieces),
    }
}

pub fn sub_splits(e: &str, sep: char) -> Outcome {
    let Some(pieces) = split_pieces(e, sep) else {
        return Outcome::NotApplicable;
    };
    let mut out = pieces.clone();
    for prefix_len in 2..pieces.len() {
        out.push(pieces[..prefix_len].join(&sep.to_string()));
    }
    for suffix_len in 1..pieces.len().saturating_sub(1) {
        out.push(pieces[pieces.len() - suffix_len..].join(&sep.to_string()));
    }
    Outcome::Entries(out)
}

pub fn deduplicate(e: &str) -> Outcome {
    let chars: Vec<char> = e.chars().collect();
    let n = chars.len();
    if n == 0 || n % 2 != 0 {
        return Outcome::NotApplicable;
    }
    let half = n / 2;
    if chars[..half] == chars[half..] {
        Outcome::single(chars[..half].iter().collect())
    } else {
        Outcome::NotApplicable
    }
}

pub fn deduplicate_reversed(e: &str) -> Outcome {
    let chars: Vec<char> = e.chars().collect();
    let n = chars.len();
    if n == 0 || n % 2 != 0 {
        return Outcome::NotApplicable;
    }
    let half = n / 2;
    let second_rev: Vec<char> = chars[half..].iter().rev().copied().collect();
    if second_rev == chars[..half] {
        Outcome::single(chars[..half].iter().collect())
    } else {
        Outcome::NotApplicable
    }
}

pub fn detriplicate(e: &str) -> Outcome {
    let chars: Vec<char> = e.chars().collect();
    let n = chars.len();
    if n == 0 || n % 3 != 0 {
        return Outcome::NotApplicable;
    }
    let third = n / 3;
    if chars[..third] == chars[third..2 * third] && chars[third..2 * third] == chars[2 * third..] {
        Outcome::single(chars[..third].iter().collect())
    } else {
        Outcome::NotApplicable
    }
}

pub fn cut(e: &str, left: bool, min: usize, max: usize) -> Outcome {
    let chars: Vec<char> = e.chars().collect();
    let len = chars.len();
    let mut out = Vec::new();
    for k in min..=max {
        if k > len {
            break;
        }
        let piece: String = if left {
            chars[k..].iter().collect()
        } else {
            chars[..len - k].iter().collect()
        };
        out.push(piece);
    }
    if out.is_empty() {
        Outcome::NotApplicable
    } else {
        Outcome::Entries(out)
    }
}

pub fn omit(e: &str, pos: usize) -> Outcome {
    let chars: Vec<char> = e.chars().collect();
    if pos >= chars.len() {
        return Outcome::NotApplicable;
    }
    let result: String = chars.iter().enumerate().filter(|(i, _)| *i != pos).map(|(_, c)| *c).collect();
    if result.is_empty() {
        Outcome::empty()
    } else {
        Outcome::single(result)
    }
}

lazy_static! {
    static ref DEHEX_RE: Regex = Regex::new(r"^\$HEX\[([a-fA-F0-9]+)\]$").unwrap();
}

pub fn dehex(e: &str) -> Outcome {
    let Some(caps) = DEHEX_RE.captures(e) else {
        return Outcome::NotApplicable;
    };
    let hex = &caps[1];
    if hex.len() % 2 != 0 {
        return Outcome::NotApplicable;
    }
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    for chunk in hex.as_bytes().chunks(2) {
        let byte_str = std::str::from_utf8(chunk).unwrap();
        match u8::from_str_radix(byte_str, 16) {
            Ok(b) => bytes.push(b),
            Err(_) => return Outcome::NotApplicable,
        }
    }
    match String::from_utf8(bytes) {
        Ok(s) => Outcome::single(s),
        Err(_) => Outcome::NotApplicable,
    }
}

pub fn glist_drop(e: &str, members: &[String], min_length: usize) -> Outcome {
    let mut out = Vec::new();
    let mut seen = FnvHashSet::default();
    let entry_len = e.chars().count();
    for member in members {
        if member.is_empty() || !e.ends_with(member.as_str()) {
            continue;
        }
        let member_len = member.chars().count();
        if member_len > entry_len {
            continue;
        }
        let prefix_len = entry_len - member_len;
        if prefix_len < min_length {
            continue;
        }
        let prefix: String = e.chars().take(prefix_len).collect();
        if seen.insert(prefix.clone()) {
            out.push(prefix);
        }
    }
    if out.is_empty() {
        Outcome::NotApplicable
    } else {
        Outcome::Entries(out)
    }
}

/// `break_up(<filter>)` (spec.md §4.4, §9 open question #2): recursively
/// partitions `e` into maximal substrings each accepted by `accept`,
/// preferring the partition with fewest parts. The recursion only branches
/// on the longest and second-longest accepted prefix at each position
/// (bounding the search), then every complete partition reached this way is
/// sorted by part count ascending; the first is returned.
pub fn break_up(e: &str, accept: &dyn Fn(&str) -> bool) -> Outcome {
    let chars: Vec<char> = e.chars().collect();
    let partitions = break_up_rec(&chars, accept);
    match partitions.into_iter().min_by_key(|p| p.len()) {
        Some(parts) if !parts.is_empty() => Outcome::Entries(parts),
        _ => Outcome::NotApplicable,
    }
}

fn break_up_rec(chars: &[char], accept: &dyn Fn(&str) -> bool) -> Vec<Vec<String>> {
    if chars.is_empty() {
        return vec![vec![]];
    }
    let mut candidate_lengths: Vec<usize> = Vec::new();
    for len in (1..=chars.len()).rev() {
        let candidate: String = chars[..len].iter().collect();
        if accept(&candidate) {
            candidate_lengths.push(len);
            if candidate_lengths.len() == 2 {
                break;
            }
        }
    }
    let mut results = Vec::new();
    for len in candidate_lengths {
        let prefix: String = chars[..len].iter().collect();
        for rest in break_up_rec(&chars[len..], accept) {
            let mut parts = vec![prefix.clone()];
            parts.extend(rest);
            results.push(parts);
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicate_matches_spec_law() {
        assert_eq!(deduplicate("xyxy"), Outcome::single("xy".to_string()));
        assert_eq!(deduplicate("xyz"), Outcome::NotApplicable);
    }

    #[test]
    fn cut_left_emits_suffixes() {
        let out = cut("abcdef", true, 1, 2);
        assert_eq!(out, Outcome::Entries(vec!["bcdef".to_string(), "cdef".to_string()]));
    }

    #[test]
    fn break_up_prefers_fewest_parts() {
        let accept = |s: &str| s == "ab" || s == "a" || s == "b";
        let out = break_up("ab", &accept);
        assert_eq!(out, Outcome::Entries(vec!["ab".to_string()]));
    }

    #[test]
    fn sub_splits_two_pieces_has_no_prefix_or_suffix_rejoin() {
        let out = sub_splits("ab-cd", '-');
        assert_eq!(out, Outcome::Entries(vec!["ab".to_string(), "cd".to_string()]));
    }

    #[test]
    fn sub_splits_three_pieces_adds_one_prefix_and_one_suffix() {
        let out = sub_splits("a-b-c", '-');
        assert_eq!(
            out,
            Outcome::Entries(vec![
                "a".to_string(),
                "b".to_string(),
                "c".to_string(),
                "a-b".to_string(),
                "c".to_string(),
            ])
        );
    }
}
