//! The basic data flowing between operations: a single [`Entry`] and the
//! three-valued [`Outcome`] an operation produces from a list of them.
//!
//! See the module docs on `engine` for how `Outcome` values are composed
//! along a pipeline; this module only defines the data, not the dataflow.

/// A single candidate string flowing through a pipeline.
///
/// Entries are never mutated in place; every operation that wants to change
/// an entry produces a new one.
pub type Entry = String;

/// An ordered list of entries flowing between operations.
///
/// Duplicates may occur; nothing here deduplicates implicitly (see
/// `ilist_unique`/`iset_unique` for the operations that do).
pub type EntryList = Vec<Entry>;

/// The result of applying one operation to one or more entries.
///
/// This is the central distinction of the whole engine (spec.md §4.1):
/// `NotApplicable` ("the operation's premise didn't hold, nothing to say")
/// is a different thing from `Entries(vec![])` ("the operation ran and
/// legitimately produced nothing"). Collapsing the two into a single empty
/// list would silently change the meaning of the `*` (keep-if-filtered)
/// modifier and of every filter built on top of a transformer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation does not apply to the given input at all.
    NotApplicable,
    /// The operation applied; these are the resulting entries (possibly
    /// empty).
    Entries(EntryList),
}

impl Outcome {
    pub fn single(entry: Entry) -> Outcome {
        Outcome::Entries(vec![entry])
    }

    pub fn empty() -> Outcome {
        Outcome::Entries(Vec::new())
    }

    pub fn is_not_applicable(&self) -> bool {
        matches!(self, Outcome::NotApplicable)
    }

    /// True for `Entries(v)` where `v` is empty. Never true for
    /// `NotApplicable` - the two are deliberately kept apart.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, Outcome::Entries(v) if v.is_empty())
    }

    /// Unwraps into a list, turning `NotApplicable` into an empty list.
    /// Only legitimate at edges where the N/A-vs-empty distinction has
    /// already been resolved by the caller (e.g. the engine's list-lifting
    /// default, or a modifier that explicitly re-materializes the input).
    pub fn into_list(self) -> EntryList {
        match self {
            Outcome::NotApplicable => Vec::new(),
            Outcome::Entries(v) => v,
        }
    }

    pub fn as_list(&self) -> &[Entry] {
        match self {
            Outcome::NotApplicable => &[],
            Outcome::Entries(v) => v,
        }
    }
}
