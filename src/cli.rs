//! Command-line surface (spec.md §6.1). Kept separate from the engine
//! proper — argument handling is not part of the transform engine's core
//! subject matter — but still lives in the library crate so `main.rs`
//! stays a thin shim over a plain function call.

use clap::{App, Arg};

#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub program_file: Option<String>,
    pub dictionary_file: Option<String>,
    pub verbose: bool,
    pub trace: bool,
    pub progress: bool,
    pub pace: bool,
    pub unique: bool,
    pub ad_hoc_ops: Vec<String>,
}

pub fn parse_args<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = App::new("dj")
        .about("Transform-program-driven dictionary mutation engine")
        .arg(Arg::with_name("program").short("o").takes_value(true).value_name("FILE").help("transform program file"))
        .arg(
            Arg::with_name("dictionary")
                .short("d")
                .takes_value(true)
                .value_name("FILE")
                .help("input dictionary file (default: stdin)"),
        )
        .arg(Arg::with_name("verbose").short("v").help("verbose tracing"))
        .arg(Arg::with_name("trace").short("t").help("op-level tracing"))
        .arg(Arg::with_name("progress").short("p").help("per-entry progress"))
        .arg(Arg::with_name("pace").long("pace").help("rolling throughput pacing"))
        .arg(Arg::with_name("unique").short("u").help("cross-input uniqueness"))
        .arg(Arg::with_name("ops").multiple(true).help("ad-hoc operations appended to the program file's body"))
        .get_matches_from(args);

    CliArgs {
        program_file: matches.value_of("program").map(str::to_string),
        dictionary_file: matches.value_of("dictionary").map(str::to_string),
        verbose: matches.is_present("verbose"),
        trace: matches.is_present("trace"),
        progress: matches.is_present("progress"),
        pace: matches.is_present("pace"),
        unique: matches.is_present("unique"),
        ad_hoc_ops: matches.values_of("ops").map(|v| v.map(str::to_string).collect()).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_flags_and_trailing_ops() {
        let args = parse_args(["dj", "-o", "prog.txt", "-v", "-u", "upper", "report"]);
        assert_eq!(args.program_file.as_deref(), Some("prog.txt"));
        assert!(args.verbose);
        assert!(args.unique);
        assert_eq!(args.ad_hoc_ops, vec!["upper".to_string(), "report".to_string()]);
    }
}
