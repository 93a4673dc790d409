//! `Program`: the lowered, validated form of a transform program (spec.md
//! §4.1 component A + B). `parse`/`init` turn source text into something
//! `driver.rs` can run against a stream of input entries without any
//! further fallibility.

use std::cell::RefCell;
use std::path::PathBuf;

use fnv::{FnvHashMap, FnvHashSet};
use regex::Regex;

use crate::charclass::CountKind;
use crate::collections::OrderedSet;
use crate::config::ConfigRegistry;
use crate::engine::{Category, Op, Pipeline, ReportSink};
use crate::error::{InitError, ParseError};
use crate::keyboard;
use crate::oracle::{LexicalOracle, WordListOracle};
use crate::parser::ast::{HeaderStmt, RawArg, RawModifier, RawOp, RawOpCall, RawPipeline, RawProgram};
use crate::parser::parse_program;

pub struct Program {
    pub config: ConfigRegistry,
    pub ignored: FnvHashSet<String>,
    pub sets: RefCell<FnvHashMap<String, OrderedSet>>,
    pub sinks: RefCell<Vec<ReportSink>>,
    pub pipelines: Vec<Pipeline>,
    pub oracle: Box<dyn LexicalOracle>,
    pub unique_mode: bool,
}

impl Program {
    /// Parses source text into an AST, per spec.md §4.5.
    pub fn parse(source: &str) -> Result<RawProgram, ParseError> {
        parse_program(source)
    }

    /// Validates and lowers a parsed program, per spec.md §4.6 and the
    /// category constraints of §4.3/§4.4. `oracle` is injected rather than
    /// built here so callers (tests, `main.rs`) control what vocabularies
    /// get loaded.
    pub fn init(raw: RawProgram, unique_mode: bool, oracle: Box<dyn LexicalOracle>) -> Result<Program, InitError> {
        let mut config = ConfigRegistry::with_defaults();
        let mut macros: FnvHashMap<String, RawPipeline> = FnvHashMap::default();
        let mut declared_sets: FnvHashSet<String> = FnvHashSet::default();
        let mut ignored: FnvHashSet<String> = FnvHashSet::default();

        for stmt in &raw.header {
            match stmt {
                HeaderStmt::Config(module, field, value) => config.set(module, field, value)?,
                HeaderStmt::Def(name, body) => {
                    if macros.insert(name.clone(), body.clone()).is_some() {
                        return Err(InitError(format!("macro {:?} defined more than once", name)));
                    }
                }
                HeaderStmt::Set(name) => {
                    declared_sets.insert(name.clone());
                }
                HeaderStmt::Ignore(path) => {
                    let text = std::fs::read_to_string(path)
                        .map_err(|e| InitError(format!("cannot read ignore file {:?}: {}", path, e)))?;
                    ignored.extend(text.lines().map(|l| l.trim().to_string()).filter(|l| !l.is_empty()));
                }
            }
        }

        // Validate every macro definition for self-reference cycles, even
        // ones no body ever invokes via `do`.
        for name in macros.keys() {
            expand_pipeline(&macros[name], &macros, &mut vec![name.clone()])?;
        }

        let sets: RefCell<FnvHashMap<String, OrderedSet>> =
            RefCell::new(declared_sets.iter().map(|n| (n.clone(), OrderedSet::default())).collect());

        let mut lctx = LowerCtx {
            config: &config,
            declared_sets: &declared_sets,
            sinks: vec![ReportSink::stdout()],
            sink_paths: FnvHashMap::default(),
        };

        let mut pipelines = Vec::with_capacity(raw.body.len());
        for body in &raw.body {
            let expanded = expand_pipeline(body, &macros, &mut Vec::new())?;
            let mut lowered = lower_pipeline(&expanded, &mut lctx)?;
            if lowered.last().map(Op::category) != Some(Category::Reporter) {
                lowered.push(Op::Report { sink: 0 });
            }
            if lowered.iter().skip(1).any(|op| matches!(op, Op::UseSet(_))) {
                return Err(InitError("use is only valid as the first operation of a top-level pipeline".into()));
            }
            pipelines.push(lowered);
        }

        Ok(Program {
            config,
            ignored,
            sets,
            sinks: RefCell::new(lctx.sinks),
            pipelines,
            oracle,
            unique_mode,
        })
    }

    /// Flushes every output file sink. Called once after the input stream is
    /// exhausted; a failure here does not unwind already-written work.
    pub fn close(&self) -> Result<(), crate::error::IoError> {
        for sink in self.sinks.borrow_mut().iter_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}

struct LowerCtx<'a> {
    config: &'a ConfigRegistry,
    declared_sets: &'a FnvHashSet<String>,
    sinks: Vec<ReportSink>,
    sink_paths: FnvHashMap<PathBuf, usize>,
}

fn check_set(ctx: &LowerCtx, name: &str) -> Result<(), InitError> {
    if ctx.declared_sets.contains(name) {
        Ok(())
    } else {
        Err(InitError(format!("reference to undeclared set {:?} (missing a `set` statement)", name)))
    }
}

fn resolve_sink(ctx: &mut LowerCtx, path: &str) -> Result<usize, InitError> {
    let pb = PathBuf::from(path);
    if let Some(&idx) = ctx.sink_paths.get(&pb) {
        return Ok(idx);
    }
    let sink = ReportSink::file(pb.clone()).map_err(|e| InitError(format!("cannot open {:?}: {}", pb, e)))?;
    let idx = ctx.sinks.len();
    ctx.sinks.push(sink);
    ctx.sink_paths.insert(pb, idx);
    Ok(idx)
}

/// Inlines `do <macro>` calls, recursively, detecting self-reference cycles
/// via the call stack of macro names currently being expanded.
fn expand_pipeline(
    pipeline: &RawPipeline,
    macros: &FnvHashMap<String, RawPipeline>,
    stack: &mut Vec<String>,
) -> Result<RawPipeline, InitError> {
    let mut out = Vec::new();
    for op in pipeline {
        match op {
            RawOp::Do(name) => {
                if stack.contains(name) {
                    return Err(InitError(format!("macro cycle: {} -> {}", stack.join(" -> "), name)));
                }
                let body = macros.get(name).ok_or_else(|| InitError(format!("unknown macro {:?}", name)))?;
                stack.push(name.clone());
                let expanded = expand_pipeline(body, macros, stack)?;
                stack.pop();
                out.extend(expanded);
            }
            RawOp::StoreIn(set, cop) => out.push(RawOp::StoreIn(set.clone(), expand_pipeline(cop, macros, stack)?)),
            RawOp::StoreFilteredIn(set, cop) => {
                out.push(RawOp::StoreFilteredIn(set.clone(), expand_pipeline(cop, macros, stack)?))
            }
            RawOp::StoreNotApplicableIn(set, cop) => {
                out.push(RawOp::StoreNotApplicableIn(set.clone(), expand_pipeline(cop, macros, stack)?))
            }
            RawOp::Or(branches) => {
                let mut expanded = Vec::with_capacity(branches.len());
                for b in branches {
                    expanded.push(expand_pipeline(b, macros, stack)?);
                }
                out.push(RawOp::Or(expanded));
            }
            RawOp::NonEmpty { on_none, on_empty, inner } => out.push(RawOp::NonEmpty {
                on_none: *on_none,
                on_empty: *on_empty,
                inner: expand_pipeline(inner, macros, stack)?,
            }),
            RawOp::All { on_none, on_empty, gen, test } => out.push(RawOp::All {
                on_none: *on_none,
                on_empty: *on_empty,
                gen: expand_pipeline(gen, macros, stack)?,
                test: expand_pipeline(test, macros, stack)?,
            }),
            RawOp::BreakUp(inner) => out.push(RawOp::BreakUp(expand_pipeline(inner, macros, stack)?)),
            RawOp::Use(_) | RawOp::Call(_) => out.push(op.clone()),
        }
    }
    Ok(out)
}

fn lower_pipeline(pipeline: &RawPipeline, ctx: &mut LowerCtx) -> Result<Pipeline, InitError> {
    pipeline.iter().map(|op| lower_op(op, ctx)).collect()
}

fn lower_op(op: &RawOp, ctx: &mut LowerCtx) -> Result<Op, InitError> {
    match op {
        RawOp::Do(_) => unreachable!("macro calls are expanded before lowering"),
        RawOp::Use(name) => {
            check_set(ctx, name)?;
            Ok(Op::UseSet(name.clone()))
        }
        RawOp::StoreIn(name, cop) => {
            check_set(ctx, name)?;
            Ok(Op::StoreIn(name.clone(), lower_pipeline(cop, ctx)?))
        }
        RawOp::StoreFilteredIn(name, cop) => {
            check_set(ctx, name)?;
            Ok(Op::StoreFilteredIn(name.clone(), lower_pipeline(cop, ctx)?))
        }
        RawOp::StoreNotApplicableIn(name, cop) => {
            check_set(ctx, name)?;
            Ok(Op::StoreNotApplicableIn(name.clone(), lower_pipeline(cop, ctx)?))
        }
        RawOp::Or(branches) => {
            let lowered: Vec<Pipeline> =
                branches.iter().map(|b| lower_pipeline(b, ctx)).collect::<Result<_, _>>()?;
            for b in &lowered {
                if b.last().map(Op::category) != Some(Category::Filter) {
                    return Err(InitError("every or() branch must be a filter pipeline".into()));
                }
            }
            Ok(Op::Or(lowered))
        }
        RawOp::NonEmpty { on_none, on_empty, inner } => {
            Ok(Op::NonEmpty { on_none: *on_none, on_empty: *on_empty, inner: lower_pipeline(inner, ctx)? })
        }
        RawOp::All { on_none, on_empty, gen, test } => {
            let gen_l = lower_pipeline(gen, ctx)?;
            let test_l = lower_pipeline(test, ctx)?;
            if test_l.last().map(Op::category) != Some(Category::Filter) {
                return Err(InitError("the all() test pipeline must be a filter pipeline".into()));
            }
            Ok(Op::All { on_none: *on_none, on_empty: *on_empty, gen: gen_l, test: test_l })
        }
        RawOp::BreakUp(inner) => {
            let inner_l = lower_pipeline(inner, ctx)?;
            if inner_l.last().map(Op::category) != Some(Category::Filter) {
                return Err(InitError("break_up()'s body must be a filter pipeline".into()));
            }
            Ok(Op::BreakUp(inner_l))
        }
        RawOp::Call(call) => lower_call(call, ctx),
    }
}

fn require_category(op: &Op, allowed: &[Category]) -> Result<(), InitError> {
    if allowed.contains(&op.category()) {
        Ok(())
    } else {
        Err(InitError(format!("modifier is not valid on a {:?} operation", op.category())))
    }
}

fn lower_call(call: &RawOpCall, ctx: &mut LowerCtx) -> Result<Op, InitError> {
    let base = build_base_op(call, ctx)?;
    Ok(match call.modifier {
        None => base,
        Some(RawModifier::KeepAlways) => {
            require_category(&base, &[Category::Transformer, Category::Extractor, Category::Filter])?;
            Op::KeepAlways(Box::new(base))
        }
        Some(RawModifier::KeepIfFiltered) => {
            require_category(&base, &[Category::Transformer, Category::Extractor, Category::Filter])?;
            Op::KeepIfFiltered(Box::new(base))
        }
        Some(RawModifier::NegateFilter) => {
            require_category(&base, &[Category::Filter])?;
            Op::NegateFilter(Box::new(base))
        }
    })
}

fn arg_word(arg: &RawArg) -> Result<String, InitError> {
    match arg {
        RawArg::Word(w) => Ok(w.clone()),
        RawArg::Str(s) => Ok(s.clone()),
        RawArg::Int(n) => Ok(n.to_string()),
        _ => Err(InitError("expected a plain argument".into())),
    }
}

fn arg_int(arg: &RawArg) -> Result<i64, InitError> {
    match arg {
        RawArg::Int(n) => Ok(*n),
        RawArg::Word(w) => w.parse().map_err(|_| InitError(format!("expected an integer, got {:?}", w))),
        _ => Err(InitError("expected an integer argument".into())),
    }
}

fn arg_chars(arg: &RawArg) -> Result<Vec<char>, InitError> {
    match arg {
        RawArg::Chars(c) => Ok(c.clone()),
        _ => Err(InitError("expected a bracketed character list".into())),
    }
}

fn arg_group(arg: &RawArg) -> Result<&Vec<RawArg>, InitError> {
    match arg {
        RawArg::Group(g) => Ok(g),
        _ => Err(InitError("expected a parenthesized argument group".into())),
    }
}

fn one_char(s: &str, op: &str) -> Result<char, InitError> {
    s.chars().next().ok_or_else(|| InitError(format!("{} requires a one-character argument", op)))
}

fn build_base_op(call: &RawOpCall, ctx: &mut LowerCtx) -> Result<Op, InitError> {
    let args = &call.args;
    Ok(match call.name.as_str() {
        "report" => Op::Report { sink: 0 },
        "write" => {
            let path = arg_word(&args[0])?;
            Op::Write { sink: resolve_sink(ctx, &path)? }
        }

        "upper" => Op::Upper,
        "lower" => Op::Lower(match args.first() {
            Some(a) => Some(arg_int(a)? as usize),
            None => None,
        }),
        "capitalize" => Op::Capitalize,
        "title" => Op::Title,
        "swapcase" => Op::Swapcase,
        "fold_ws" => Op::FoldWs,
        "strip_ws" => Op::StripWs,
        "strip_no" => Op::StripNo,
        "strip_sc" => Op::StripSc,
        "strip_numbers_and_sc" => Op::StripNumbersAndSc,
        "strip" => Op::Strip(arg_chars(&args[0])?),
        "remove_ws" => Op::RemoveWs,
        "remove_sc" => Op::RemoveSc,
        "remove_numbers" => Op::RemoveNumbers,
        "remove" => Op::Remove(arg_chars(&args[0])?),

        "reverse" => Op::Reverse,
        "rotate" => Op::Rotate,
        "multiply" => Op::Multiply(arg_int(&args[0])? as usize),
        "append" => Op::Append { each: false, s: arg_word(&args[0])? },
        "append_each" => Op::Append { each: true, s: arg_word(&args[0])? },
        "prepend" => Op::Prepend { each: false, s: arg_word(&args[0])? },
        "prepend_each" => Op::Prepend { each: true, s: arg_word(&args[0])? },
        "as_append_hc_rule" => Op::AsAppendHcRule,
        "as_prepend_hc_rule" => Op::AsPrependHcRule,
        "number" => Op::Number(arg_chars(&args[0])?.into_iter().collect()),
        "map" => {
            let src = one_char(&arg_word(&args[0])?, "map")?;
            Op::Map { src, dsts: arg_chars(&args[1])? }
        }
        "pos_map" => Op::PosMap(arg_chars(&args[0])?),
        "replace" => {
            let group = arg_group(&args[0])?;
            let mut pairs = Vec::new();
            let mut it = group.iter();
            while let (Some(k), Some(v)) = (it.next(), it.next()) {
                pairs.push((arg_word(k)?, arg_word(v)?));
            }
            Op::Replace(pairs)
        }
        "multi_replace" => {
            let n = arg_int(&args[0])? as usize;
            let mut table = Vec::new();
            for g in &args[1..] {
                let items = arg_group(g)?;
                let mut it = items.iter();
                let key = arg_word(it.next().ok_or_else(|| InitError("multi_replace group needs a key".into()))?)?;
                let values: Vec<String> = it.map(arg_word).collect::<Result<_, _>>()?;
                table.push((key, values));
            }
            Op::MultiReplace(table, n)
        }
        "discard_endings" => {
            let group = arg_group(&args[0])?;
            Op::DiscardEndings(group.iter().map(arg_word).collect::<Result<_, _>>()?)
        }
        "mangle_dates" => Op::MangleDates {
            start_year_20th: ctx.config.int("MangleDates", "START_YEAR_20TH"),
            end_year_21st: ctx.config.int("MangleDates", "END_YEAR_21ST"),
        },
        "deleetify" => Op::Deleetify,
        "correct_spelling" => Op::CorrectSpelling {
            lang: arg_word(&args[0])?,
            filter_with_space: ctx.config.bool("CorrectSpelling", "FILTER_CORRECTIONS_WITH_SPACE"),
        },
        "related" => {
            let group = arg_group(&args[0])?;
            Op::Related {
                models: group.iter().map(arg_word).collect::<Result<_, _>>()?,
                min_relatedness: ctx.config.float("Related", "MIN_RELATEDNESS"),
                max_related: ctx.config.int("Related", "MAX_RELATED") as usize,
                topn: ctx.config.int("Related", "TOPN") as usize,
            }
        }
        "concat" => Op::Concat(arg_word(&args[0])?),
        "ilist_concat" => Op::IlistConcat(arg_word(&args[0])?),

        "regex" => {
            let pattern = arg_word(&args[0])?;
            Op::Regex(Regex::new(&pattern).map_err(|e| InitError(format!("invalid regex {:?}: {}", pattern, e)))?)
        }
        "get_no" => Op::GetNo,
        "get_sc" => Op::GetSc,
        "segments" => {
            Op::Segments { n: arg_int(&args[0])? as usize, min_length: ctx.config.int("Segments", "MIN_LENGTH") as usize }
        }
        "split" => Op::Split(one_char(&arg_word(&args[0])?, "split")?),
        "sub_splits" => Op::SubSplits(one_char(&arg_word(&args[0])?, "sub_splits")?),
        "deduplicate" => Op::Deduplicate,
        "deduplicate_reversed" => Op::DeduplicateReversed,
        "detriplicate" => Op::Detriplicate,
        "cut_left" => Op::Cut { left: true, min: arg_int(&args[0])? as usize, max: arg_int(&args[1])? as usize },
        "cut_right" => Op::Cut { left: false, min: arg_int(&args[0])? as usize, max: arg_int(&args[1])? as usize },
        "omit" => Op::Omit(arg_int(&args[0])? as usize),
        "dehex" => Op::Dehex,
        "glist_drop" => {
            let set = arg_word(&args[0])?;
            check_set(ctx, &set)?;
            Op::GlistDrop { set, min_length: ctx.config.int("GListDrop", "MIN_LENGTH") as usize }
        }

        "min" => {
            let kind = CountKind::parse(&arg_word(&args[0])?).ok_or_else(|| InitError("unknown min() category".into()))?;
            Op::MinCount(kind, arg_int(&args[1])? as usize)
        }
        "max" => {
            let kind = CountKind::parse(&arg_word(&args[0])?).ok_or_else(|| InitError("unknown max() category".into()))?;
            Op::MaxCount(kind, arg_int(&args[1])? as usize)
        }
        "has" => {
            let kind = CountKind::parse(&arg_word(&args[0])?).ok_or_else(|| InitError("unknown has() category".into()))?;
            Op::HasCount(kind, arg_int(&args[1])? as usize)
        }
        "min_length" => Op::MinLength(arg_int(&args[0])? as usize),
        "max_length" => Op::MaxLength(arg_int(&args[0])? as usize),
        "is_regular_word" => Op::IsRegularWord { lang: arg_word(&args[0])? },
        "is_popular_word" => Op::IsPopularWord { model: arg_word(&args[0])? },
        "is_pattern" => Op::IsPattern,
        "is_sc" => Op::IsSc,
        "is_walk" => {
            let layout_name = ctx.config.string("IsWalk", "LAYOUT").to_string();
            let layout = keyboard::layout_by_name(&layout_name)
                .ok_or_else(|| InitError(format!("unknown keyboard layout {:?}", layout_name)))?;
            Op::IsWalk {
                layout,
                min_walk: ctx.config.float("IsWalk", "MIN_WALK_LENGTH"),
                min_sub_walk: ctx.config.float("IsWalk", "MIN_SUB_WALK_LENGTH"),
            }
        }
        "is_part_of" => Op::IsPartOf {
            sequence: arg_word(&args[0])?,
            entry_min_length: ctx.config.int("IsPartOf", "ENTRY_MIN_LENGTH") as usize,
            min_sequence_length: ctx.config.int("IsPartOf", "MIN_SEQUENCE_LENGTH") as usize,
            wrap: ctx.config.bool("IsPartOf", "WRAP_AROUND"),
        },
        "sieve" => Op::Sieve(arg_chars(&args[0])?.into_iter().collect()),
        "glist_in" => {
            let set = arg_word(&args[0])?;
            check_set(ctx, &set)?;
            Op::GlistIn(set)
        }

        "ilist_unique" => Op::IlistUnique,
        "ilist_select_longest" => Op::IlistSelectLongest,
        "iset_unique" => Op::IsetUnique,
        "iset_max_length" => Op::IsetMaxLength(arg_int(&args[0])? as usize),

        other => return Err(InitError(format!("unknown operation {:?}", other))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init(src: &str) -> Result<Program, InitError> {
        let raw = Program::parse(src).expect("parse");
        Program::init(raw, false, Box::new(WordListOracle::new()))
    }

    #[test]
    fn lowers_a_plain_pipeline_with_implicit_report() {
        let program = init("upper\n").unwrap();
        assert_eq!(program.pipelines.len(), 1);
        assert!(matches!(program.pipelines[0].last(), Some(Op::Report { sink: 0 })));
    }

    #[test]
    fn rejects_undeclared_set_reference() {
        let err = init("use MYSET report\n").unwrap_err();
        assert!(err.0.contains("undeclared set"));
    }

    #[test]
    fn rejects_self_referencing_macro() {
        let err = init("def loop do loop\nupper report\n").unwrap_err();
        assert!(err.0.contains("macro cycle"));
    }

    #[test]
    fn inlines_macro_bodies() {
        let program = init("def shout upper report\ndo shout\n").unwrap();
        assert_eq!(program.pipelines.len(), 1);
        assert!(matches!(program.pipelines[0][0], Op::Upper));
    }

    #[test]
    fn rejects_non_filter_or_branch() {
        let err = init("or(upper, is_pattern) report\n").unwrap_err();
        assert!(err.0.contains("or()"));
    }

    #[test]
    fn applies_config_statement_to_mangle_dates() {
        let program = init("config MangleDates START_YEAR_20TH \"50\"\nmangle_dates report\n").unwrap();
        assert!(matches!(program.pipelines[0][0], Op::MangleDates { start_year_20th: 50, .. }));
    }
}
