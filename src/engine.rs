//! The execution engine (spec.md §4.1–§4.3): the three-valued composition
//! rule, the elision rule, the per-entry list-lifting default, and the
//! tagged-variant `Op` that every atomic operation, modifier, and
//! combinator lowers into (§9 design note: "use a tagged variant enum for
//! operations with a single `process` entry point").

use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::path::PathBuf;

use fnv::{FnvHashMap, FnvHashSet};
use regex::Regex;

use crate::charclass::CountKind;
use crate::collections::OrderedSet;
use crate::entry::{Entry, Outcome};
use crate::error::IoError;
use crate::keyboard::KeyboardLayout;
use crate::ops::{extract, filter, listlevel, transform};
use crate::oracle::LexicalOracle;

/// A non-empty ordered sequence of operations (spec.md §3). Kept as a plain
/// `Vec` rather than a named struct since every combinator that owns a
/// child pipeline just needs to run it and read back an `Outcome`.
pub type Pipeline = Vec<Op>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Transformer,
    Extractor,
    Filter,
    Reporter,
    Meta,
}

pub enum SinkKind {
    Stdout,
    File(PathBuf),
}

/// One `report`/`write` destination. Multiple `write` ops to the same path
/// share a sink (resolved at lowering time, see `program.rs`); the file is
/// opened once, appended to, and released at `close()`.
pub struct ReportSink {
    pub kind: SinkKind,
    file: Option<File>,
    reported: FnvHashSet<Entry>,
}

impl ReportSink {
    pub fn stdout() -> Self {
        ReportSink { kind: SinkKind::Stdout, file: None, reported: FnvHashSet::default() }
    }

    pub fn file(path: PathBuf) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(ReportSink { kind: SinkKind::File(path), file: Some(file), reported: FnvHashSet::default() })
    }

    fn report(&mut self, e: &str) -> Result<(), IoError> {
        if !self.reported.insert(e.to_string()) {
            return Ok(());
        }
        match &mut self.file {
            None => println!("{}", e),
            Some(f) => writeln!(f, "{}", e).map_err(IoError)?,
        }
        Ok(())
    }

    fn reset_per_entry(&mut self, unique_mode: bool) {
        if !unique_mode {
            self.reported.clear();
        }
    }

    pub fn flush(&mut self) -> Result<(), IoError> {
        if let Some(f) = &mut self.file {
            f.flush().map_err(IoError)?;
        }
        Ok(())
    }
}

/// Everything an `Op` needs besides the entries it is handed: named sets,
/// reporter sinks, the ignored-entries set, the lexical oracle, and the
/// uniqueness flag. All fields are shared references; `sets`/`sinks` use
/// interior mutability so nested pipelines (inside `or`/`break_up`/etc.)
/// can be evaluated without threading `&mut` through recursive calls -
/// there is only ever one thread touching this (§5: no parallel entry
/// processing), so a `RefCell` is enough; no `Mutex` needed.
#[derive(Clone, Copy)]
pub struct ExecCtx<'a> {
    pub sets: &'a RefCell<FnvHashMap<String, OrderedSet>>,
    pub sinks: &'a RefCell<Vec<ReportSink>>,
    pub ignored: &'a FnvHashSet<String>,
    pub oracle: &'a dyn LexicalOracle,
    pub unique_mode: bool,
}

/// spec.md §4.1: "Between operations ... the engine elides any entry that
/// is (a) the empty string, or (b) contained in the ignored_entries set."
fn elide(entries: Vec<Entry>, ignored: &FnvHashSet<String>) -> Vec<Entry> {
    entries.into_iter().filter(|e| !e.is_empty() && !ignored.contains(e)).collect()
}

/// spec.md §4.1, "Per-entry list-level default": lifts a `process(entry)`
/// function to `process(EntryList)`, with `N/A` only when every call was
/// `N/A`.
fn lift(entries: &[Entry], f: impl Fn(&str) -> Outcome) -> Outcome {
    let mut any_applicable = false;
    let mut out = Vec::new();
    for e in entries {
        match f(e) {
            Outcome::NotApplicable => {}
            Outcome::Entries(v) => {
                any_applicable = true;
                out.extend(v);
            }
        }
    }
    if any_applicable {
        Outcome::Entries(out)
    } else {
        Outcome::NotApplicable
    }
}

/// Runs a pipeline against a starting `EntryList`, applying the composition
/// rule of spec.md §4.1: stop (without running later ops) as soon as an
/// operation returns `N/A` or `[ ]`, eliding between every step.
pub fn run_ops(ops: &[Op], entries: &[Entry], ctx: &ExecCtx) -> Outcome {
    let mut current: Vec<Entry> = entries.to_vec();
    for op in ops {
        match op.apply(&current, ctx) {
            Outcome::NotApplicable => return Outcome::NotApplicable,
            Outcome::Entries(v) if v.is_empty() => return Outcome::empty(),
            Outcome::Entries(v) => current = elide(v, ctx.ignored),
        }
    }
    Outcome::Entries(current)
}

/// Runs a whole top-level pipeline for one freshly-read input entry.
pub fn run_pipeline_for_entry(ops: &[Op], seed: Entry, ctx: &ExecCtx) {
    let _ = run_ops(ops, &[seed], ctx);
}

#[derive(Debug, Clone)]
pub enum Op {
    // Reporters
    Report { sink: usize },
    Write { sink: usize },

    // Case / whitespace transformers
    Upper,
    Lower(Option<usize>),
    Capitalize,
    Title,
    Swapcase,
    FoldWs,
    StripWs,
    StripNo,
    StripSc,
    StripNumbersAndSc,
    Strip(Vec<char>),
    RemoveWs,
    RemoveSc,
    RemoveNumbers,
    Remove(Vec<char>),

    // Pure string transformers
    Reverse,
    Rotate,
    Multiply(usize),
    Append { each: bool, s: String },
    Prepend { each: bool, s: String },
    AsAppendHcRule,
    AsPrependHcRule,
    Number(FnvHashSet<char>),
    Map { src: char, dsts: Vec<char> },
    PosMap(Vec<char>),
    Replace(Vec<(String, String)>),
    MultiReplace(Vec<(String, Vec<String>)>, usize),
    DiscardEndings(FnvHashSet<String>),
    MangleDates { start_year_20th: i64, end_year_21st: i64 },
    Deleetify,
    CorrectSpelling { lang: String, filter_with_space: bool },
    Related { models: Vec<String>, min_relatedness: f64, max_related: usize, topn: usize },
    Concat(String),

    // Extractors
    Regex(Regex),
    GetNo,
    GetSc,
    Segments { n: usize, min_length: usize },
    Split(char),
    SubSplits(char),
    Deduplicate,
    DeduplicateReversed,
    Detriplicate,
    Cut { left: bool, min: usize, max: usize },
    Omit(usize),
    Dehex,
    BreakUp(Pipeline),
    GlistDrop { set: String, min_length: usize },

    // Filters
    MinCount(CountKind, usize),
    MaxCount(CountKind, usize),
    HasCount(CountKind, usize),
    MinLength(usize),
    MaxLength(usize),
    IsRegularWord { lang: String },
    IsPopularWord { model: String },
    IsPattern,
    IsSc,
    IsWalk { layout: &'static KeyboardLayout, min_walk: f64, min_sub_walk: f64 },
    IsPartOf { sequence: String, entry_min_length: usize, min_sequence_length: usize, wrap: bool },
    Sieve(FnvHashSet<char>),
    GlistIn(String),

    // List-level combinators
    Or(Vec<Pipeline>),
    NonEmpty { on_none: bool, on_empty: bool, inner: Pipeline },
    All { on_none: bool, on_empty: bool, gen: Pipeline, test: Pipeline },
    IlistUnique,
    IlistSelectLongest,
    IlistConcat(String),
    IsetUnique,
    IsetMaxLength(usize),

    // Set I/O
    UseSet(String),
    StoreIn(String, Pipeline),
    StoreFilteredIn(String, Pipeline),
    StoreNotApplicableIn(String, Pipeline),

    // Modifiers
    KeepAlways(Box<Op>),
    KeepIfFiltered(Box<Op>),
    NegateFilter(Box<Op>),
}

impl Op {
    pub fn category(&self) -> Category {
        use Op::*;
        match self {
            Report { .. } | Write { .. } => Category::Reporter,

            Upper | Lower(_) | Capitalize | Title | Swapcase | FoldWs | StripWs | StripNo
            | StripSc | StripNumbersAndSc | Strip(_) | RemoveWs | RemoveSc | RemoveNumbers
            | Remove(_) | Reverse | Rotate | Multiply(_) | Append { .. } | Prepend { .. }
            | AsAppendHcRule | AsPrependHcRule | Number(_) | Map { .. } | PosMap(_)
            | Replace(_) | MultiReplace(..) | DiscardEndings(_) | MangleDates { .. }
            | Deleetify | CorrectSpelling { .. } | Related { .. } | Concat(_) => Category::Transformer,

            Regex(_) | GetNo | GetSc | Segments { .. } | Split(_) | SubSplits(_)
            | Deduplicate | DeduplicateReversed | Detriplicate | Cut { .. } | Omit(_)
            | Dehex | BreakUp(_) | GlistDrop { .. } => Category::Extractor,

            MinCount(..) | MaxCount(..) | HasCount(..) | MinLength(_) | MaxLength(_)
            | IsRegularWord { .. } | IsPopularWord { .. } | IsPattern | IsSc | IsWalk { .. }
            | IsPartOf { .. } | Sieve(_) | GlistIn(_) => Category::Filter,

            Or(_) | NonEmpty { .. } | All { .. } | IlistUnique | IlistSelectLongest
            | IlistConcat(_) | IsetUnique | IsetMaxLength(_) | UseSet(_) | StoreIn(..)
            | StoreFilteredIn(..) | StoreNotApplicableIn(..) => Category::Meta,

            KeepAlways(inner) | KeepIfFiltered(inner) | NegateFilter(inner) => inner.category(),
        }
    }

    /// The category a child pipeline effectively has, for combinator
    /// validation (`or` requires filter branches, etc.): inherited from its
    /// last operation, the same rule spec.md §4.4 states for macros
    /// ("category is inherited from its body").
    pub fn pipeline_category(ops: &[Pipeline]) -> Vec<Category> {
        ops.iter()
            .map(|p| p.last().map(Op::category).unwrap_or(Category::Meta))
            .collect()
    }

    pub fn apply(&self, entries: &[Entry], ctx: &ExecCtx) -> Outcome {
        use Op::*;
        match self {
            Or(branches) => {
                let mut keep: FnvHashSet<Entry> = FnvHashSet::default();
                for branch in branches {
                    if let Outcome::Entries(v) = run_ops(branch, entries, ctx) {
                        keep.extend(v);
                    }
                }
                Outcome::Entries(entries.iter().filter(|e| keep.contains(*e)).cloned().collect())
            }
            NonEmpty { on_none, on_empty, inner } => {
                let keep = match run_ops(inner, entries, ctx) {
                    Outcome::NotApplicable => *on_none,
                    Outcome::Entries(v) if v.is_empty() => *on_empty,
                    Outcome::Entries(_) => true,
                };
                Outcome::Entries(if keep { entries.to_vec() } else { Vec::new() })
            }
            All { on_none, on_empty, gen, test } => {
                let keep = match run_ops(gen, entries, ctx) {
                    Outcome::NotApplicable => *on_none,
                    Outcome::Entries(v) if v.is_empty() => *on_empty,
                    Outcome::Entries(v) => matches!(run_ops(test, &v, ctx), Outcome::Entries(tv) if tv.len() == v.len()),
                };
                Outcome::Entries(if keep { entries.to_vec() } else { Vec::new() })
            }
            IlistUnique => listlevel::ilist_unique(entries),
            IlistSelectLongest => listlevel::ilist_select_longest(entries),
            IlistConcat(sep) | Concat(sep) => transform::concat_list(entries, sep, ctx.ignored),
            IsetUnique => listlevel::iset_unique(entries),
            IsetMaxLength(n) => listlevel::iset_max_length(entries, *n),
            UseSet(name) => {
                let sets = ctx.sets.borrow();
                match sets.get(name) {
                    Some(s) => Outcome::Entries(s.as_slice().to_vec()),
                    None => Outcome::empty(),
                }
            }
            StoreIn(name, cop) => {
                let result = run_ops(cop, entries, ctx);
                if let Outcome::Entries(v) = &result {
                    let mut sets = ctx.sets.borrow_mut();
                    let set = sets.entry(name.clone()).or_default();
                    for e in v {
                        set.insert(e.clone());
                    }
                }
                result
            }
            StoreFilteredIn(name, cop) => {
                let result = run_ops(cop, entries, ctx);
                let kept: FnvHashSet<&Entry> = match &result {
                    Outcome::Entries(v) => v.iter().collect(),
                    Outcome::NotApplicable => FnvHashSet::default(),
                };
                let removed: Vec<Entry> = entries.iter().filter(|e| !kept.contains(e)).cloned().collect();
                let mut sets = ctx.sets.borrow_mut();
                let set = sets.entry(name.clone()).or_default();
                for e in removed {
                    set.insert(e);
                }
                drop(sets);
                result
            }
            StoreNotApplicableIn(name, cop) => {
                let mut not_applicable = Vec::new();
                let mut applicable = Vec::new();
                for e in entries {
                    match run_ops(cop, std::slice::from_ref(e), ctx) {
                        Outcome::NotApplicable => not_applicable.push(e.clone()),
                        Outcome::Entries(v) => applicable.extend(v),
                    }
                }
                let mut sets = ctx.sets.borrow_mut();
                let set = sets.entry(name.clone()).or_default();
                for e in not_applicable {
                    set.insert(e);
                }
                drop(sets);
                Outcome::Entries(applicable)
            }
            // `+concat`/`*concat` wrap a list-level op; route through the
            // list-level path instead of per-entry `apply_single`, which has
            // no way to run a whole-list operation.
            KeepAlways(inner) if matches!(**inner, Concat(_) | IlistConcat(_)) => {
                match inner.apply(entries, ctx) {
                    Outcome::NotApplicable => Outcome::Entries(entries.to_vec()),
                    Outcome::Entries(mut v) => {
                        v.extend(entries.iter().cloned());
                        Outcome::Entries(v)
                    }
                }
            }
            KeepIfFiltered(inner) if matches!(**inner, Concat(_) | IlistConcat(_)) => {
                match inner.apply(entries, ctx) {
                    Outcome::NotApplicable => Outcome::Entries(entries.to_vec()),
                    other => other,
                }
            }

            _ => lift(entries, |e| self.apply_single(e, ctx)),
        }
    }

    fn apply_single(&self, e: &str, ctx: &ExecCtx) -> Outcome {
        use Op::*;
        match self {
            Report { sink } => {
                let mut sinks = ctx.sinks.borrow_mut();
                let _ = sinks[*sink].report(e);
                Outcome::single(e.to_string())
            }
            Write { sink } => {
                let mut sinks = ctx.sinks.borrow_mut();
                let _ = sinks[*sink].report(e);
                Outcome::single(e.to_string())
            }

            Upper => transform::upper(e),
            Lower(pos) => transform::lower(e, *pos),
            Capitalize => transform::capitalize(e),
            Title => transform::title(e),
            Swapcase => transform::swapcase(e),
            FoldWs => transform::fold_ws(e),
            StripWs => transform::strip_chars(e, |c| c.is_whitespace()),
            StripNo => transform::strip_chars(e, |c| c.is_ascii_digit()),
            StripSc => transform::strip_chars(e, crate::charclass::is_special),
            StripNumbersAndSc => transform::strip_chars(e, |c| c.is_ascii_digit() || crate::charclass::is_special(c)),
            Strip(chars) => transform::strip_chars(e, |c| chars.contains(&c)),
            RemoveWs => transform::remove_chars(e, |c| c.is_whitespace()),
            RemoveSc => transform::remove_chars(e, crate::charclass::is_special),
            RemoveNumbers => transform::remove_chars(e, |c| c.is_ascii_digit()),
            Remove(chars) => transform::remove_chars(e, |c| chars.contains(&c)),

            Reverse | Rotate => transform::reverse(e),
            Multiply(n) => transform::multiply(e, *n),
            Append { each, s } => transform::append(e, *each, s),
            Prepend { each, s } => transform::prepend(e, *each, s),
            AsAppendHcRule => transform::as_append_hc_rule(e),
            AsPrependHcRule => transform::as_prepend_hc_rule(e),
            Number(charset) => transform::number(e, charset),
            Map { src, dsts } => transform::map_char(e, *src, dsts),
            PosMap(chars) => transform::pos_map(e, chars),
            Replace(table) => transform::replace_table(e, table),
            MultiReplace(table, n) => transform::multi_replace(e, table, *n),
            DiscardEndings(set) => transform::discard_endings(e, set),
            MangleDates { start_year_20th, end_year_21st } => transform::mangle_dates(
                e,
                &transform::MangleDatesConfig { start_year_20th: *start_year_20th, end_year_21st: *end_year_21st },
            ),
            Deleetify => transform::deleetify(e),
            CorrectSpelling { lang, filter_with_space } => {
                transform::correct_spelling(e, ctx.oracle, lang, *filter_with_space)
            }
            Related { models, min_relatedness, max_related, topn } => {
                let model_refs: Vec<&str> = models.iter().map(String::as_str).collect();
                transform::related(e, ctx.oracle, &model_refs, &transform::RelatedConfig {
                    min_relatedness: *min_relatedness,
                    max_related: *max_related,
                    topn: *topn,
                })
            }
            Concat(_) => unreachable!("Concat is list-level, handled in apply()"),

            Regex(re) => extract::regex_matches(e, re),
            GetNo => extract::get_no(e),
            GetSc => extract::get_sc(e),
            Segments { n, min_length } => extract::segments(e, *n, *min_length),
            Split(sep) => extract::split(e, *sep),
            SubSplits(sep) => extract::sub_splits(e, *sep),
            Deduplicate => extract::deduplicate(e),
            DeduplicateReversed => extract::deduplicate_reversed(e),
            Detriplicate => extract::detriplicate(e),
            Cut { left, min, max } => extract::cut(e, *left, *min, *max),
            Omit(pos) => extract::omit(e, *pos),
            Dehex => extract::dehex(e),
            BreakUp(pipeline) => {
                let accept = |s: &str| matches!(run_ops(pipeline, &[s.to_string()], ctx), Outcome::Entries(v) if !v.is_empty());
                extract::break_up(e, &accept)
            }
            GlistDrop { set, min_length } => {
                let sets = ctx.sets.borrow();
                match sets.get(set) {
                    Some(s) => extract::glist_drop(e, s.as_slice(), *min_length),
                    None => Outcome::NotApplicable,
                }
            }

            MinCount(kind, n) => filter::filter_result(e, filter::count_cmp_min(e, *kind, *n)),
            MaxCount(kind, n) => filter::filter_result(e, filter::count_cmp_max(e, *kind, *n)),
            HasCount(kind, n) => filter::filter_result(e, filter::count_cmp_has(e, *kind, *n)),
            MinLength(n) => filter::filter_result(e, filter::min_length(e, *n)),
            MaxLength(n) => filter::filter_result(e, filter::max_length(e, *n)),
            IsRegularWord { lang } => filter::filter_result(e, filter::is_regular_word(e, ctx.oracle, lang)),
            IsPopularWord { model } => filter::filter_result(e, filter::is_popular_word(e, ctx.oracle, model)),
            IsPattern => filter::filter_result(e, filter::is_pattern(e)),
            IsSc => filter::filter_result(e, filter::is_sc(e)),
            IsWalk { layout, min_walk, min_sub_walk } => {
                filter::filter_result(e, filter::is_walk(e, layout, *min_walk, *min_sub_walk))
            }
            IsPartOf { sequence, entry_min_length, min_sequence_length, wrap } => filter::filter_result(
                e,
                filter::is_part_of(e, sequence, *entry_min_length, *min_sequence_length, *wrap),
            ),
            Sieve(allowed) => filter::filter_result(e, filter::sieve(e, allowed)),
            GlistIn(set) => {
                let sets = ctx.sets.borrow();
                let accept = sets.get(set).map(|s| filter::glist_in(e, s)).unwrap_or(false);
                filter::filter_result(e, accept)
            }

            KeepAlways(inner) => match inner.apply_single(e, ctx) {
                Outcome::NotApplicable => Outcome::single(e.to_string()),
                Outcome::Entries(mut v) => {
                    v.push(e.to_string());
                    Outcome::Entries(v)
                }
            },
            KeepIfFiltered(inner) => match inner.apply_single(e, ctx) {
                Outcome::NotApplicable => Outcome::single(e.to_string()),
                other => other,
            },
            NegateFilter(inner) => match inner.apply_single(e, ctx) {
                Outcome::Entries(v) if v.is_empty() => Outcome::single(e.to_string()),
                Outcome::Entries(_) => Outcome::empty(),
                Outcome::NotApplicable => Outcome::single(e.to_string()),
            },

            // List-level variants are only ever reached through `apply()`.
            Or(_) | NonEmpty { .. } | All { .. } | IlistUnique | IlistSelectLongest
            | IlistConcat(_) | IsetUnique | IsetMaxLength(_) | UseSet(_) | StoreIn(..)
            | StoreFilteredIn(..) | StoreNotApplicableIn(..) => {
                unreachable!("list-level op dispatched through apply_single")
            }
        }
    }
}

pub fn reset_sinks_for_new_entry(sinks: &RefCell<Vec<ReportSink>>, unique_mode: bool) {
    for sink in sinks.borrow_mut().iter_mut() {
        sink.reset_per_entry(unique_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::WordListOracle;

    fn test_ctx<'a>(
        sets: &'a RefCell<FnvHashMap<String, OrderedSet>>,
        sinks: &'a RefCell<Vec<ReportSink>>,
        ignored: &'a FnvHashSet<String>,
        oracle: &'a WordListOracle,
    ) -> ExecCtx<'a> {
        ExecCtx { sets, sinks, ignored, oracle, unique_mode: false }
    }

    #[test]
    fn keep_always_appends_original_on_na() {
        let sets = RefCell::new(FnvHashMap::default());
        let sinks = RefCell::new(vec![ReportSink::stdout()]);
        let ignored = FnvHashSet::default();
        let oracle = WordListOracle::new();
        let ctx = test_ctx(&sets, &sinks, &ignored, &oracle);

        let op = Op::KeepAlways(Box::new(Op::Upper));
        let out = op.apply(&["ALREADY".to_string()], &ctx);
        assert_eq!(out, Outcome::Entries(vec!["ALREADY".to_string()]));
    }

    #[test]
    fn negate_filter_matches_spec_law() {
        let sets = RefCell::new(FnvHashMap::default());
        let sinks = RefCell::new(vec![ReportSink::stdout()]);
        let ignored = FnvHashSet::default();
        let oracle = WordListOracle::new();
        let ctx = test_ctx(&sets, &sinks, &ignored, &oracle);

        let op = Op::NegateFilter(Box::new(Op::MinLength(10)));
        let out = op.apply(&["short".to_string()], &ctx);
        assert_eq!(out, Outcome::Entries(vec!["short".to_string()]));
    }

    #[test]
    fn keep_always_concat_does_not_panic() {
        let sets = RefCell::new(FnvHashMap::default());
        let sinks = RefCell::new(vec![ReportSink::stdout()]);
        let ignored = FnvHashSet::default();
        let oracle = WordListOracle::new();
        let ctx = test_ctx(&sets, &sinks, &ignored, &oracle);

        let op = Op::KeepAlways(Box::new(Op::Concat("-".to_string())));
        let out = op.apply(&["a".to_string(), "b".to_string()], &ctx);
        assert_eq!(
            out,
            Outcome::Entries(vec!["a-b".to_string(), "a".to_string(), "b".to_string()])
        );

        let single = op.apply(&["a".to_string()], &ctx);
        assert_eq!(single, Outcome::Entries(vec!["a".to_string()]));
    }

    #[test]
    fn keep_if_filtered_concat_does_not_panic() {
        let sets = RefCell::new(FnvHashMap::default());
        let sinks = RefCell::new(vec![ReportSink::stdout()]);
        let ignored = FnvHashSet::default();
        let oracle = WordListOracle::new();
        let ctx = test_ctx(&sets, &sinks, &ignored, &oracle);

        let op = Op::KeepIfFiltered(Box::new(Op::Concat("-".to_string())));
        let out = op.apply(&["a".to_string(), "b".to_string()], &ctx);
        assert_eq!(out, Outcome::Entries(vec!["a-b".to_string()]));

        let single = op.apply(&["a".to_string()], &ctx);
        assert_eq!(single, Outcome::Entries(vec!["a".to_string()]));
    }

    #[test]
    fn pipeline_stops_on_not_applicable() {
        let sets = RefCell::new(FnvHashMap::default());
        let sinks = RefCell::new(vec![ReportSink::stdout()]);
        let ignored = FnvHashSet::default();
        let oracle = WordListOracle::new();
        let ctx = test_ctx(&sets, &sinks, &ignored, &oracle);

        let pipeline = vec![Op::RemoveNumbers, Op::Upper];
        let out = run_ops(&pipeline, &["abc".to_string()], &ctx);
        assert_eq!(out, Outcome::NotApplicable);
    }
}
