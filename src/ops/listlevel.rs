//! List-level combinators that read the whole current `EntryList` at once
//! instead of going through the engine's per-entry lift (spec.md §4.1,
//! §4.4 "List-level combinators"). `or`/`non_empty`/`all` need access to a
//! nested pipeline, so they are dispatched directly in `engine.rs`; this
//! module covers the ones that are pure functions of the list itself.

use fnv::FnvHashSet;

use crate::entry::Outcome;

pub fn ilist_unique(entries: &[String]) -> Outcome {
    let mut seen = FnvHashSet::default();
    let mut out = Vec::with_capacity(entries.len());
    for e in entries {
        if seen.insert(e.clone()) {
            out.push(e.clone());
        }
    }
    Outcome::Entries(out)
}

pub fn ilist_select_longest(entries: &[String]) -> Outcome {
    match entries.iter().max_by_key(|e| e.chars().count()) {
        None => Outcome::NotApplicable,
        Some(longest) => Outcome::single(longest.clone()),
    }
}

/// Documented simplification (see DESIGN.md): `iset_unique` dedups the same
/// way `ilist_unique` does. The source distinguishes "list" and "set"
/// collections at the named-set layer, not in this operation's own
/// behaviour.
pub fn iset_unique(entries: &[String]) -> Outcome {
    ilist_unique(entries)
}

pub fn iset_max_length(entries: &[String], n: usize) -> Outcome {
    if entries.is_empty() {
        return Outcome::NotApplicable;
    }
    let mut indexed: Vec<(usize, &String)> = entries.iter().enumerate().collect();
    indexed.sort_by(|a, b| b.1.chars().count().cmp(&a.1.chars().count()).then(a.0.cmp(&b.0)));
    indexed.truncate(n);
    indexed.sort_by_key(|(i, _)| *i);
    Outcome::Entries(indexed.into_iter().map(|(_, e)| e.clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ilist_unique_preserves_first_seen_order() {
        let entries = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(ilist_unique(&entries), Outcome::Entries(vec!["b".to_string(), "a".to_string()]));
    }
}
