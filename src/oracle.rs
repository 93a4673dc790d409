//! The lexical oracle boundary (spec.md §6.4): spell-check and
//! word-embedding lookups are an external collaborator the core only
//! consumes through a narrow, synchronous, side-effect-free interface.
//! Loading real dictionaries/embedding models is explicitly out of scope
//! (spec.md §1); `WordListOracle` here is a minimal, file-backed
//! implementation sufficient to run programs without any network access.

use fnv::FnvHashSet;
use std::fs;
use std::path::Path;

/// Edit distance 1 generation + vocabulary/similarity lookups used by
/// `is_regular_word`, `is_popular_word`, `correct_spelling`, and `related`.
pub trait LexicalOracle {
    /// Is `word` a known word of `lang`?
    fn contains(&self, word: &str, lang: &str) -> bool;

    /// Ordered spelling suggestions for `word` in `lang`, closest first.
    fn suggest(&self, word: &str, lang: &str) -> Vec<String>;

    /// Ordered `(word, similarity)` pairs most similar to `word` in the
    /// named embedding model, highest similarity first, at most `topn`.
    fn most_similar(&self, word: &str, model: &str, topn: usize) -> Vec<(String, f64)>;

    /// Is `word` present in the named vocabulary (popularity list)?
    fn vocab_contains(&self, word: &str, model: &str) -> bool;
}

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzäöüß";

/// A simple oracle backed by plain word-list files: one word per line, no
/// external service, no embedding math — `most_similar` falls back to
/// Damerau-Levenshtein-1 neighbors ranked by list frequency rank, which is
/// a deterministic, dependency-free stand-in for a real embedding model.
#[derive(Debug, Default)]
pub struct WordListOracle {
    vocabularies: Vec<(String, Vec<String>, FnvHashSet<String>)>,
}

impl WordListOracle {
    pub fn new() -> Self {
        WordListOracle::default()
    }

    /// Loads a vocabulary (word list, one entry per line) under `name`,
    /// usable as both a `lang` for `contains`/`suggest` and a `model` for
    /// `most_similar`/`vocab_contains`.
    pub fn load_vocabulary(&mut self, name: &str, path: &Path) -> std::io::Result<()> {
        let text = fs::read_to_string(path)?;
        let words: Vec<String> = text.lines().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect();
        let set: FnvHashSet<String> = words.iter().cloned().collect();
        self.vocabularies.push((name.to_string(), words, set));
        Ok(())
    }

    fn vocab(&self, name: &str) -> Option<&(String, Vec<String>, FnvHashSet<String>)> {
        self.vocabularies.iter().find(|(n, _, _)| n == name)
    }
}

fn damerau_levenshtein_le(a: &str, b: &str, max: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > max {
        return None;
    }
    let (n, m) = (a.len(), b.len());
    let mut d = vec![vec![0usize; m + 1]; n + 1];
    for i in 0..=n {
        d[i][0] = i;
    }
    for j in 0..=m {
        d[0][j] = j;
    }
    for i in 1..=n {
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            let mut v = (d[i - 1][j] + 1).min(d[i][j - 1] + 1).min(d[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                v = v.min(d[i - 2][j - 2] + 1);
            }
            d[i][j] = v;
        }
    }
    if d[n][m] <= max {
        Some(d[n][m])
    } else {
        None
    }
}

impl LexicalOracle for WordListOracle {
    fn contains(&self, word: &str, lang: &str) -> bool {
        self.vocab(lang).map(|(_, _, set)| set.contains(word)).unwrap_or(false)
    }

    fn suggest(&self, word: &str, lang: &str) -> Vec<String> {
        let Some((_, words, _)) = self.vocab(lang) else {
            return Vec::new();
        };
        let mut candidates: Vec<(usize, &String)> = words
            .iter()
            .filter_map(|w| damerau_levenshtein_le(word, w, 1).map(|d| (d, w)))
            .collect();
        candidates.sort_by_key(|(d, _)| *d);
        candidates.into_iter().map(|(_, w)| w.clone()).collect()
    }

    fn most_similar(&self, word: &str, model: &str, topn: usize) -> Vec<(String, f64)> {
        let Some((_, words, _)) = self.vocab(model) else {
            return Vec::new();
        };
        // Deterministic, dependency-free substitute for an embedding model:
        // rank by inverse edit distance, then list order.
        let mut scored: Vec<(String, f64)> = words
            .iter()
            .filter(|w| w.as_str() != word)
            .filter_map(|w| {
                let dist = levenshtein(word, w);
                let max_len = word.chars().count().max(w.chars().count()).max(1);
                if dist > max_len {
                    return None;
                }
                Some((w.clone(), 1.0 - (dist as f64 / max_len as f64)))
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        scored.truncate(topn);
        scored
    }

    fn vocab_contains(&self, word: &str, model: &str) -> bool {
        self.vocab(model).map(|(_, _, set)| set.contains(word)).unwrap_or(false)
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());
    let mut prev: Vec<usize> = (0..=m).collect();
    let mut cur = vec![0usize; m + 1];
    for i in 1..=n {
        cur[0] = i;
        for j in 1..=m {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            cur[j] = (prev[j] + 1).min(cur[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[m]
}

/// Allows `ascii` alphabet constant to be referenced by operations that
/// need a default character universe (kept here since the oracle is the
/// natural owner of "what counts as a word character" for this engine).
pub fn default_alphabet() -> &'static str {
    ALPHABET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_orders_by_distance() {
        let mut oracle = WordListOracle::new();
        oracle.vocabularies.push((
            "en".to_string(),
            vec!["test".to_string(), "tests".to_string(), "best".to_string()],
            ["test".to_string(), "tests".to_string(), "best".to_string()].into_iter().collect(),
        ));
        let suggestions = oracle.suggest("tast", "en");
        assert_eq!(suggestions[0], "test");
    }
}
