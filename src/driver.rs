//! The runtime driver (spec.md §4.1 component F): reads entries lazily from
//! a line source, elides ignored/empty entries before any pipeline sees
//! them, runs every top-level pipeline per entry, and resets reporter sinks
//! between entries (unless `-u`/unique mode asks them to persist for the
//! whole run).

use std::io::BufRead;
use std::time::Instant;

use log::{debug, info};

use crate::engine::{self, ExecCtx};
use crate::program::Program;

#[derive(Debug, Clone, Copy, Default)]
pub struct DriverOptions {
    pub trace: bool,
    pub progress: bool,
    /// Minimum spacing between entries (`--pace`), for rate-limited runs
    /// against an external collaborator (e.g. a networked spelling oracle).
    pub pace: Option<std::time::Duration>,
}

/// Runs `program` against every line of `input`, in order, to completion.
pub fn run(program: &Program, input: impl BufRead, opts: &DriverOptions) -> std::io::Result<u64> {
    let ctx = ExecCtx {
        sets: &program.sets,
        sinks: &program.sinks,
        ignored: &program.ignored,
        oracle: program.oracle.as_ref(),
        unique_mode: program.unique_mode,
    };

    let start = Instant::now();
    let mut processed: u64 = 0;

    for line in input.lines() {
        let raw = line?;
        let entry = raw.trim_end_matches(['\n', '\r']).to_string();

        if entry.is_empty() || program.ignored.contains(&entry) {
            continue;
        }

        if opts.trace {
            debug!("entry {:?}", entry);
        }

        engine::reset_sinks_for_new_entry(&program.sinks, program.unique_mode);
        for pipeline in &program.pipelines {
            engine::run_pipeline_for_entry(pipeline, entry.clone(), &ctx);
        }
        processed += 1;

        if opts.progress && processed % 10_000 == 0 {
            let rate = processed as f64 / start.elapsed().as_secs_f64().max(0.001);
            info!("processed {} entries ({:.0}/s)", processed, rate);
        }

        if let Some(pace) = opts.pace {
            std::thread::sleep(pace);
        }
    }

    if opts.progress {
        info!("done: {} entries in {:.2}s", processed, start.elapsed().as_secs_f64());
    }

    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::WordListOracle;
    use crate::program::Program;

    #[test]
    fn skips_empty_and_ignored_entries() {
        let raw = Program::parse("upper\n").unwrap();
        let mut program = Program::init(raw, false, Box::new(WordListOracle::new())).unwrap();
        program.ignored.insert("skip".to_string());

        let input = b"skip\n\nhello\n".as_slice();
        let processed = run(&program, input, &DriverOptions::default()).unwrap();
        assert_eq!(processed, 1);
    }
}
