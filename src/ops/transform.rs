//! Case, whitespace, and other string-rewriting transformers
//! (spec.md §4.4, "Case / whitespace transformers" and "Pure string
//! transformers"), plus the bigger single-purpose transformers
//! (`mangle_dates`, `deleetify`, `correct_spelling`, `related`, `concat`).

use fnv::{FnvHashMap, FnvHashSet};
use lazy_static::lazy_static;
use regex::Regex;

use crate::entry::Outcome;
use crate::oracle::LexicalOracle;

fn changed_or_na(original: &str, result: String) -> Outcome {
    if result == original {
        Outcome::NotApplicable
    } else {
        Outcome::single(result)
    }
}

pub fn upper(e: &str) -> Outcome {
    changed_or_na(e, e.to_uppercase())
}

pub fn lower(e: &str, pos: Option<usize>) -> Outcome {
    match pos {
        None => changed_or_na(e, e.to_lowercase()),
        Some(n) => {
            let chars: Vec<char> = e.chars().collect();
            if n >= chars.len() {
                return Outcome::NotApplicable;
            }
            let mut out = chars.clone();
            out[n] = chars[n].to_ascii_lowercase();
            let result: String = out.into_iter().collect();
            changed_or_na(e, result)
        }
    }
}

pub fn capitalize(e: &str) -> Outcome {
    let mut chars = e.chars();
    let result = match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    };
    changed_or_na(e, result)
}

pub fn title(e: &str) -> Outcome {
    let mut out = String::with_capacity(e.len());
    let mut start_of_word = true;
    for c in e.chars() {
        if c.is_alphabetic() {
            if start_of_word {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(c);
            start_of_word = true;
        }
    }
    changed_or_na(e, out)
}

pub fn swapcase(e: &str) -> Outcome {
    let result: String = e
        .chars()
        .map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().next().unwrap_or(c)
            } else if c.is_lowercase() {
                c.to_uppercase().next().unwrap_or(c)
            } else {
                c
            }
        })
        .collect();
    changed_or_na(e, result)
}

pub fn fold_ws(e: &str) -> Outcome {
    let mut out = String::with_capacity(e.len());
    let mut last_was_ws = false;
    for c in e.chars() {
        if c == ' ' || c == '\t' {
            if !last_was_ws {
                out.push(' ');
            }
            last_was_ws = true;
        } else {
            out.push(c);
            last_was_ws = false;
        }
    }
    changed_or_na(e, out)
}

pub fn strip_chars(e: &str, pred: impl Fn(char) -> bool) -> Outcome {
    let trimmed = e.trim_matches(|c| pred(c));
    if trimmed == e {
        Outcome::NotApplicable
    } else if trimmed.is_empty() {
        Outcome::empty()
    } else {
        Outcome::single(trimmed.to_string())
    }
}

pub fn remove_chars(e: &str, pred: impl Fn(char) -> bool) -> Outcome {
    let removed: String = e.chars().filter(|c| !pred(*c)).collect();
    if removed.chars().count() == e.chars().count() {
        Outcome::NotApplicable
    } else if removed.is_empty() {
        Outcome::empty()
    } else {
        Outcome::single(removed)
    }
}

pub fn reverse(e: &str) -> Outcome {
    let rev: String = e.chars().rev().collect();
    changed_or_na(e, rev)
}

pub fn multiply(e: &str, n: usize) -> Outcome {
    if n <= 1 {
        return Outcome::NotApplicable;
    }
    Outcome::single(e.repeat(n))
}

fn interleave(e: &str, s: &str) -> String {
    let mut out = String::from(s);
    for c in e.chars() {
        out.push(c);
        out.push_str(s);
    }
    out
}

pub fn append(e: &str, each: bool, s: &str) -> Outcome {
    if s.is_empty() {
        return Outcome::NotApplicable;
    }
    let result = if each { interleave(e, s) } else { format!("{}{}", e, s) };
    changed_or_na(e, result)
}

pub fn prepend(e: &str, each: bool, s: &str) -> Outcome {
    if s.is_empty() {
        return Outcome::NotApplicable;
    }
    let result = if each { interleave(e, s) } else { format!("{}{}", s, e) };
    changed_or_na(e, result)
}

pub fn as_append_hc_rule(e: &str) -> Outcome {
    if e.is_empty() {
        return Outcome::NotApplicable;
    }
    let out: String = e.chars().map(|c| format!("${}", c)).collect();
    Outcome::single(out)
}

pub fn as_prepend_hc_rule(e: &str) -> Outcome {
    if e.is_empty() {
        return Outcome::NotApplicable;
    }
    let out: String = e.chars().rev().map(|c| format!("^{}", c)).collect();
    Outcome::single(out)
}

pub fn number(e: &str, charset: &FnvHashSet<char>) -> Outcome {
    let mut count = 0usize;
    let mut changed = false;
    let mut out = String::with_capacity(e.len());
    for c in e.chars() {
        if charset.contains(&c) {
            count += 1;
            changed = true;
            out.push_str(&count.to_string());
        } else {
            out.push(c);
        }
    }
    if changed {
        Outcome::single(out)
    } else {
        Outcome::NotApplicable
    }
}

pub fn map_char(e: &str, src: char, dsts: &[char]) -> Outcome {
    if !e.contains(src) {
        return Outcome::NotApplicable;
    }
    let out: Vec<String> = dsts.iter().map(|d| e.replace(src, &d.to_string())).collect();
    Outcome::Entries(out)
}

pub fn pos_map(e: &str, chars: &[char]) -> Outcome {
    let base: Vec<char> = e.chars().collect();
    if base.is_empty() {
        return Outcome::NotApplicable;
    }
    let mut out = Vec::with_capacity(base.len() * chars.len());
    for pos in 0..base.len() {
        for &c in chars {
            let mut variant = base.clone();
            variant[pos] = c;
            out.push(variant.into_iter().collect());
        }
    }
    Outcome::Entries(out)
}

pub fn replace_table(e: &str, table: &[(String, String)]) -> Outcome {
    let mut out = e.to_string();
    let mut changed = false;
    for (k, v) in table {
        if out.contains(k.as_str()) {
            out = out.replace(k.as_str(), v);
            changed = true;
        }
    }
    if changed {
        Outcome::single(out)
    } else {
        Outcome::NotApplicable
    }
}

struct Occurrence<'a> {
    start: usize,
    end: usize,
    values: &'a [String],
}

/// Leftmost, non-overlapping occurrences of any key from `table` in `e`.
fn find_occurrences<'a>(e: &str, table: &'a [(String, Vec<String>)]) -> Vec<Occurrence<'a>> {
    let mut occurrences = Vec::new();
    let bytes = e.as_bytes();
    let mut i = 0;
    'outer: while i < bytes.len() {
        for (key, values) in table {
            if key.is_empty() {
                continue;
            }
            if e[i..].starts_with(key.as_str()) {
                occurrences.push(Occurrence { start: i, end: i + key.len(), values });
                i += key.len();
                continue 'outer;
            }
        }
        i += 1;
    }
    occurrences
}

pub fn multi_replace(e: &str, table: &[(String, Vec<String>)], up_to_n: usize) -> Outcome {
    let occurrences = find_occurrences(e, table);
    if occurrences.is_empty() {
        return Outcome::NotApplicable;
    }
    let max_n = up_to_n.min(occurrences.len()).max(1);
    let mut outputs: Vec<String> = Vec::new();
    let mut seen: FnvHashSet<String> = FnvHashSet::default();

    for n in 1..=max_n {
        for combo in combinations(occurrences.len(), n) {
            let sites: Vec<&Occurrence> = combo.iter().map(|&i| &occurrences[i]).collect();
            for choice in cartesian_product(&sites) {
                let mut out = String::with_capacity(e.len());
                let mut cursor = 0;
                for (site, value) in sites.iter().zip(choice.iter()) {
                    out.push_str(&e[cursor..site.start]);
                    out.push_str(value);
                    cursor = site.end;
                }
                out.push_str(&e[cursor..]);
                if seen.insert(out.clone()) {
                    outputs.push(out);
                }
            }
        }
    }
    Outcome::Entries(outputs)
}

fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k == 0 || k > n {
        return vec![];
    }
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(k);
    fn rec(start: usize, n: usize, k: usize, current: &mut Vec<usize>, result: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            result.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            rec(i + 1, n, k, current, result);
            current.pop();
        }
    }
    rec(0, n, k, &mut current, &mut result);
    result
}

fn cartesian_product(sites: &[&Occurrence]) -> Vec<Vec<String>> {
    let mut result: Vec<Vec<String>> = vec![vec![]];
    for site in sites {
        let mut next = Vec::new();
        for prefix in &result {
            for value in site.values {
                let mut p = prefix.clone();
                p.push(value.clone());
                next.push(p);
            }
        }
        result = next;
    }
    result
}

pub fn discard_endings(e: &str, endings: &FnvHashSet<String>) -> Outcome {
    let mut terms: Vec<&str> = e.split(' ').collect();
    let mut dropped = false;
    while terms.len() > 1 {
        if endings.contains(*terms.last().unwrap()) {
            terms.pop();
            dropped = true;
        } else {
            break;
        }
    }
    if dropped {
        Outcome::single(terms.join(" "))
    } else {
        Outcome::NotApplicable
    }
}

lazy_static! {
    // Prefix-only match: a leading non-digit run is skipped (mirroring the
    // original's `.match()` semantics), and nothing anchors the end, so
    // trailing garbage after the year doesn't reject the entry.
    static ref GERMAN_DATE: Regex =
        Regex::new(r"^[^0-9]*(\d{1,2})[.]?(\d{1,2})[.]?((\d{2})?(\d{2}))").unwrap();
    static ref ENGLISH_DATE: Regex =
        Regex::new(r"^[^0-9]*(\d{1,2})[/-]?(\d{1,2})[/-]?((\d{2})?(\d{2}))").unwrap();
}

pub struct MangleDatesConfig {
    pub start_year_20th: i64,
    pub end_year_21st: i64,
}

fn infer_century(yy: u32, cfg: &MangleDatesConfig) -> Option<String> {
    if (yy as i64) <= cfg.end_year_21st {
        Some("20".to_string())
    } else if (yy as i64) >= cfg.start_year_20th {
        Some("19".to_string())
    } else {
        None
    }
}

fn mangle_one(d: u32, m: u32, cc: Option<&str>, yy: u32, cfg: &MangleDatesConfig) -> Option<Vec<String>> {
    if !(1..=31).contains(&d) || !(1..=12).contains(&m) {
        return None;
    }
    let century = match cc {
        Some(cc) => cc.to_string(),
        None => infer_century(yy, cfg)?,
    };
    let yy_str = format!("{:02}", yy);
    Some(vec![
        format!("{}{}{}", d, m, yy_str),
        yy_str.clone(),
        format!("{}{}", century, yy_str),
        format!("{:02}{:02}{}{}", d, m, century, yy_str),
        format!("{:02}{:02}{}", d, m, yy_str),
        format!("{:02}{:02}", m, d),
    ])
}

pub fn mangle_dates(e: &str, cfg: &MangleDatesConfig) -> Outcome {
    if let Some(caps) = GERMAN_DATE.captures(e) {
        let d: u32 = caps[1].parse().unwrap();
        let m: u32 = caps[2].parse().unwrap();
        let cc = caps.get(4).map(|m| m.as_str());
        let yy: u32 = caps[5].parse().unwrap();
        if let Some(out) = mangle_one(d, m, cc, yy, cfg) {
            return Outcome::Entries(out);
        }
        return Outcome::NotApplicable;
    }
    if let Some(caps) = ENGLISH_DATE.captures(e) {
        let m: u32 = caps[1].parse().unwrap();
        let d: u32 = caps[2].parse().unwrap();
        let cc = caps.get(4).map(|m| m.as_str());
        let yy: u32 = caps[5].parse().unwrap();
        if !(1..=31).contains(&d) || !(1..=12).contains(&m) {
            return Outcome::NotApplicable;
        }
        let century = match cc.map(|s| s.to_string()).or_else(|| infer_century(yy, cfg)) {
            Some(c) => c,
            None => return Outcome::NotApplicable,
        };
        let yy_str = format!("{:02}", yy);
        let out = vec![
            format!("{}{}{}", m, d, yy_str),
            yy_str.clone(),
            format!("{}{}", century, yy_str),
            format!("{:02}{:02}{}{}", m, d, century, yy_str),
            format!("{:02}{:02}{}", m, d, yy_str),
            format!("{:02}{:02}", d, m),
        ];
        return Outcome::Entries(out);
    }
    Outcome::NotApplicable
}

const LEET_PAIRS: [(char, char); 4] = [('0', 'o'), ('1', 'i'), ('3', 'e'), ('4', 'a')];

lazy_static! {
    static ref LEET_DIGITS: Regex = Regex::new(r"[0134]").unwrap();
}

/// Replaces combinations of up to 3 simultaneous leet digits with their
/// letter counterpart (never the reverse) and emits every distinct
/// transformation that actually changed the string. Fast-rejects entries
/// with no leet-digit, or no letter at all, to de-leet towards.
pub fn deleetify(e: &str) -> Outcome {
    if !LEET_DIGITS.is_match(e) || !e.chars().any(|c| c.is_alphabetic()) {
        return Outcome::NotApplicable;
    }
    let chars: Vec<char> = e.chars().collect();
    let positions: Vec<(usize, char)> = chars
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| LEET_PAIRS.iter().find(|(d, _)| *d == c).map(|(_, l)| (i, *l)))
        .collect();

    if positions.is_empty() {
        return Outcome::NotApplicable;
    }

    let mut outputs: Vec<String> = Vec::new();
    let mut seen: FnvHashSet<String> = FnvHashSet::default();
    let max_k = positions.len().min(3);
    for k in 1..=max_k {
        for combo in combinations(positions.len(), k) {
            let mut variant = chars.clone();
            for &idx in &combo {
                let (pos, replacement) = positions[idx];
                variant[pos] = replacement;
            }
            let s: String = variant.into_iter().collect();
            if s != e && seen.insert(s.clone()) {
                outputs.push(s);
            }
        }
    }
    if outputs.is_empty() {
        Outcome::NotApplicable
    } else {
        Outcome::Entries(outputs)
    }
}

pub fn correct_spelling(
    e: &str,
    oracle: &dyn LexicalOracle,
    lang: &str,
    filter_with_space: bool,
) -> Outcome {
    let suggestions = oracle.suggest(e, lang);
    let mut out: Vec<String> = Vec::new();
    let mut found_identity = false;
    for s in suggestions {
        if s == e {
            found_identity = true;
            continue;
        }
        if filter_with_space && s.contains(' ') {
            continue;
        }
        out.push(s);
    }
    if found_identity {
        return Outcome::empty();
    }
    if out.is_empty() {
        Outcome::NotApplicable
    } else {
        Outcome::Entries(out)
    }
}

pub struct RelatedConfig {
    pub min_relatedness: f64,
    pub max_related: usize,
    pub topn: usize,
}

/// Queries every embedding model in `models` for words similar to `e`,
/// merges results, keeps those above `MIN_RELATEDNESS` (or above
/// `KEEP_ALL_RELATEDNESS = min(MIN_RELATEDNESS + 0.15, 1.0)` regardless of
/// the cap), caps the result at `MAX_RELATED`.
pub fn related(e: &str, oracle: &dyn LexicalOracle, models: &[&str], cfg: &RelatedConfig) -> Outcome {
    let keep_all = (cfg.min_relatedness + 0.15).min(1.0);
    let mut merged: FnvHashMap<String, f64> = FnvHashMap::default();
    for model in models {
        for (word, score) in oracle.most_similar(e, model, cfg.topn) {
            let entry = merged.entry(word).or_insert(score);
            if score > *entry {
                *entry = score;
            }
        }
    }
    let mut scored: Vec<(String, f64)> = merged
        .into_iter()
        .filter(|(_, score)| *score >= cfg.min_relatedness)
        .collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());

    let mut out: Vec<String> = Vec::new();
    for (word, score) in scored {
        if out.len() >= cfg.max_related && score < keep_all {
            break;
        }
        out.push(word);
    }
    if out.is_empty() {
        Outcome::NotApplicable
    } else {
        Outcome::Entries(out)
    }
}

/// `concat`/`ilist_concat` (SPEC_FULL.md §C): joins the whole current
/// EntryList with `sep` into a single entry. Operates on the list as a
/// whole, not per-entry - the engine dispatches this directly rather than
/// through the per-entry lift.
pub fn concat_list(entries: &[String], sep: &str, ignored: &FnvHashSet<String>) -> Outcome {
    let remaining: Vec<&String> = entries.iter().filter(|e| !ignored.contains(e.as_str())).collect();
    if remaining.len() <= 1 {
        return Outcome::NotApplicable;
    }
    let joined = remaining.into_iter().cloned().collect::<Vec<_>>().join(sep);
    Outcome::single(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_is_na_when_already_capitalized() {
        assert_eq!(capitalize("Test"), Outcome::NotApplicable);
        assert_eq!(capitalize("test"), Outcome::single("Test".to_string()));
    }

    #[test]
    fn as_prepend_hc_rule_matches_spec_example() {
        assert_eq!(as_prepend_hc_rule("Test"), Outcome::single("^t^s^e^T".to_string()));
    }

    #[test]
    fn as_append_hc_rule_matches_spec_example() {
        assert_eq!(as_append_hc_rule("Test"), Outcome::single("$T$e$s$t".to_string()));
    }

    #[test]
    fn map_char_matches_spec_scenario() {
        let out = map_char("arm", 'a', &['1', '4']);
        assert_eq!(out, Outcome::Entries(vec!["1rm".to_string(), "4rm".to_string()]));
    }

    #[test]
    fn pos_map_is_position_major_char_minor() {
        let out = pos_map("ab", &['x', 'y']);
        assert_eq!(
            out,
            Outcome::Entries(vec![
                "xb".to_string(),
                "yb".to_string(),
                "ax".to_string(),
                "ay".to_string(),
            ])
        );
    }

    #[test]
    fn mangle_dates_matches_spec_scenario() {
        let cfg = MangleDatesConfig { start_year_20th: 75, end_year_21st: 25 };
        let out = mangle_dates("7.4.85", &cfg);
        assert_eq!(
            out,
            Outcome::Entries(vec![
                "7485".to_string(),
                "85".to_string(),
                "1985".to_string(),
                "07041985".to_string(),
                "070485".to_string(),
                "0407".to_string(),
            ])
        );
    }

    #[test]
    fn mangle_dates_tolerates_leading_and_trailing_garbage() {
        let cfg = MangleDatesConfig { start_year_20th: 75, end_year_21st: 25 };
        let with_prefix = mangle_dates("born 7.4.85", &cfg);
        let with_suffix = mangle_dates("7.4.85!", &cfg);
        assert_eq!(with_prefix, mangle_dates("7.4.85", &cfg));
        assert_eq!(with_suffix, mangle_dates("7.4.85", &cfg));
    }

    #[test]
    fn deleetify_matches_spec_scenario() {
        assert_eq!(deleetify("t3st"), Outcome::single("test".to_string()));
        assert_eq!(deleetify("0123"), Outcome::NotApplicable);
    }
}
