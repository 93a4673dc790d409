//! The four error kinds of the engine, in order of severity, each mapped to
//! a `main.rs` exit code. Plain enums with manual `Display`/`Error` impls —
//! no `thiserror`, no `anyhow` in the dependency tree.

use std::fmt;

/// A malformed line in a transform program. Carries the 1-based source line
/// number so it can be rendered with `annotate-snippets`.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        ParseError {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// A semantic violation discovered during `Program::init`: unknown macro or
/// set, a filter-only combinator given a non-filter, an out-of-range config
/// value, an unknown config field, a regex that fails to compile. Aborts the
/// whole run before any input is read.
#[derive(Debug, Clone)]
pub struct InitError(pub String);

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for InitError {}

impl From<String> for InitError {
    fn from(s: String) -> Self {
        InitError(s)
    }
}

impl From<&str> for InitError {
    fn from(s: &str) -> Self {
        InitError(s.to_string())
    }
}

/// An unexpected failure while an operation is running against one entry
/// (e.g. the lexical oracle failed). Caught by the driver, logged, and only
/// the current entry's pipeline is abandoned.
#[derive(Debug, Clone)]
pub struct RuntimeOpError {
    pub entry: String,
    pub message: String,
}

impl fmt::Display for RuntimeOpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {:?}: {}", self.entry, self.message)
    }
}

impl std::error::Error for RuntimeOpError {}

/// A failure writing to an output file, surfaced at `close()`. Does not
/// unwind earlier successful work.
#[derive(Debug)]
pub struct IoError(pub std::io::Error);

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I/O error: {}", self.0)
    }
}

impl std::error::Error for IoError {}

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError(e)
    }
}
