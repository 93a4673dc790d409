//! Thin CLI shim (spec.md §6.1): the only place in the crate that calls
//! `std::process::exit`. Wires `cli` → `Program::parse` → `Program::init` →
//! `driver::run`, installing the logger and mapping failures to the exit
//! codes spec.md §6.1/§7 define.

use std::io::BufReader;

use annotate_snippets::display_list::DisplayList;
use annotate_snippets::snippet::{Annotation, AnnotationType, Slice, Snippet, SourceAnnotation};
use log::LevelFilter;

use dict_transform::cli;
use dict_transform::driver::{self, DriverOptions};
use dict_transform::error::ParseError;
use dict_transform::oracle::WordListOracle;
use dict_transform::program::Program;

const EXIT_OK: i32 = 0;
const EXIT_NO_PROGRAM: i32 = -1;
const EXIT_PARSE_FAILURE: i32 = -2;
const EXIT_INIT_FAILURE: i32 = 1;

fn main() {
    let args = cli::parse_args(std::env::args_os());

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let _ = simple_logger::SimpleLogger::new().with_level(level).init();

    let source = match assemble_source(&args) {
        Some(s) => s,
        None => {
            eprintln!("error: no program given (pass -o <file> or trailing ad-hoc OPS)");
            std::process::exit(EXIT_NO_PROGRAM);
        }
    };

    let raw = match Program::parse(&source) {
        Ok(raw) => raw,
        Err(err) => {
            report_parse_error(&source, &err);
            std::process::exit(EXIT_PARSE_FAILURE);
        }
    };

    let oracle = WordListOracle::new();
    let program = match Program::init(raw, args.unique, Box::new(oracle)) {
        Ok(p) => p,
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(EXIT_INIT_FAILURE);
        }
    };

    let opts = DriverOptions {
        trace: args.trace,
        progress: args.progress,
        pace: if args.pace { Some(std::time::Duration::from_millis(1)) } else { None },
    };

    let run_result = match &args.dictionary_file {
        Some(path) => std::fs::File::open(path).and_then(|f| driver::run(&program, BufReader::new(f), &opts)),
        None => {
            let stdin = std::io::stdin();
            driver::run(&program, stdin.lock(), &opts)
        }
    };

    if let Err(err) = run_result {
        log::error!("{}", err);
    }
    if let Err(err) = program.close() {
        log::warn!("{}", err);
    }

    std::process::exit(EXIT_OK);
}

/// Builds the full program source from `-o <file>` (if given) with any
/// trailing ad-hoc `OPS` appended as one more body line. Returns `None` when
/// neither was given — spec.md §6.1's "no program given".
fn assemble_source(args: &cli::CliArgs) -> Option<String> {
    let mut source = String::new();
    if let Some(path) = &args.program_file {
        match std::fs::read_to_string(path) {
            Ok(text) => source.push_str(&text),
            Err(e) => {
                eprintln!("error: cannot read program file {:?}: {}", path, e);
                std::process::exit(EXIT_NO_PROGRAM);
            }
        }
    } else if args.ad_hoc_ops.is_empty() {
        return None;
    }

    if !args.ad_hoc_ops.is_empty() {
        if !source.is_empty() && !source.ends_with('\n') {
            source.push('\n');
        }
        source.push_str(&args.ad_hoc_ops.join(" "));
        source.push('\n');
    }

    Some(source)
}

fn report_parse_error(source: &str, err: &ParseError) {
    let line_text = source.lines().nth(err.line.saturating_sub(1)).unwrap_or("");
    let snippet = Snippet {
        title: Some(Annotation { label: Some(&err.message), id: None, annotation_type: AnnotationType::Error }),
        footer: vec![],
        slices: vec![Slice {
            source: line_text,
            line_start: err.line,
            origin: Some("<program>"),
            fold: false,
            annotations: vec![SourceAnnotation {
                range: (0, line_text.len()),
                label: "here",
                annotation_type: AnnotationType::Error,
            }],
        }],
    };
    eprintln!("{}", DisplayList::from(snippet));
}
