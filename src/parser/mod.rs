//! Turns transform-program source text into a `RawProgram` (spec.md §4.5,
//! §6.2). Purely syntactic: set/macro existence, category constraints, and
//! config-driven constants are all resolved later in `program.rs`.

pub mod ast;
pub mod lexer;

use crate::error::ParseError;
use ast::{HeaderStmt, RawArg, RawModifier, RawOp, RawOpCall, RawPipeline, RawProgram};
use lexer::{tokenize, Token};

/// Strips a trailing `#` comment, respecting quoted strings.
fn strip_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            '#' if !in_quotes => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Joins continuation lines (a line whose first non-blank content starts
/// with `\ ` continues the previous logical line) and drops now-empty
/// lines, keeping the 1-based source line number of each logical line's
/// first physical line for diagnostics.
fn logical_lines(source: &str) -> Vec<(usize, String)> {
    let mut out: Vec<(usize, String)> = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let stripped = strip_comment(raw);
        let trimmed_start = stripped.trim_start();
        if trimmed_start.starts_with("\\ ") || trimmed_start == "\\" {
            let cont = trimmed_start.trim_start_matches('\\').trim_start();
            if let Some(last) = out.last_mut() {
                last.1.push(' ');
                last.1.push_str(cont);
                continue;
            }
        }
        let trimmed = stripped.trim();
        if trimmed.is_empty() {
            continue;
        }
        out.push((idx + 1, trimmed.to_string()));
    }
    out
}

struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    fn new(tokens: Vec<Token>) -> Self {
        Cursor { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn expect_word(&mut self) -> Result<String, String> {
        match self.next() {
            Some(Token::Word(w)) => Ok(w),
            other => Err(format!("expected a word, found {:?}", other)),
        }
    }

    fn expect_str(&mut self) -> Result<String, String> {
        match self.next() {
            Some(Token::Str(s)) => Ok(s),
            Some(Token::Word(w)) => Ok(w),
            other => Err(format!("expected a string, found {:?}", other)),
        }
    }

    fn expect_int(&mut self) -> Result<i64, String> {
        match self.next() {
            Some(Token::Word(w)) => w.parse::<i64>().map_err(|_| format!("expected an integer, found {:?}", w)),
            other => Err(format!("expected an integer, found {:?}", other)),
        }
    }

    fn expect_bool(&mut self) -> Result<bool, String> {
        match self.expect_word()?.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(format!("expected true/false, found {:?}", other)),
        }
    }

    fn expect_chars(&mut self) -> Result<Vec<char>, String> {
        match self.next() {
            Some(Token::Chars(c)) => Ok(c),
            other => Err(format!("expected a bracketed character list, found {:?}", other)),
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), String> {
        match self.next() {
            Some(t) if &t == expected => Ok(()),
            other => Err(format!("expected {:?}, found {:?}", expected, other)),
        }
    }

    fn expect_group(&mut self) -> Result<Vec<RawArg>, String> {
        self.expect(&Token::LParen)?;
        let mut items = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RParen) => {
                    self.next();
                    break;
                }
                Some(Token::Word(_)) | Some(Token::Str(_)) => match self.next().unwrap() {
                    Token::Word(w) => items.push(
                        w.parse::<i64>().map(RawArg::Int).unwrap_or(RawArg::Word(w)),
                    ),
                    Token::Str(s) => items.push(RawArg::Str(s)),
                    _ => unreachable!(),
                },
                other => return Err(format!("unexpected token inside group: {:?}", other)),
            }
        }
        Ok(items)
    }
}

fn peel_modifier(word: &str) -> (Option<RawModifier>, &str) {
    match word.chars().next() {
        Some('+') if word.len() > 1 => (Some(RawModifier::KeepAlways), &word[1..]),
        Some('*') if word.len() > 1 => (Some(RawModifier::KeepIfFiltered), &word[1..]),
        Some('!') if word.len() > 1 => (Some(RawModifier::NegateFilter), &word[1..]),
        _ => (None, word),
    }
}

/// Consumes this call's arguments according to a per-operation-name shape.
/// Kept as one explicit match rather than a generic arity table: the DSL's
/// argument shapes genuinely differ operation by operation and a table
/// would just move the same knowledge somewhere harder to read.
fn parse_call_args(name: &str, c: &mut Cursor) -> Result<Vec<RawArg>, String> {
    let args = match name {
        "upper" | "capitalize" | "title" | "swapcase" | "fold_ws" | "strip_ws" | "strip_no"
        | "strip_sc" | "strip_numbers_and_sc" | "remove_ws" | "remove_sc" | "remove_numbers"
        | "reverse" | "rotate" | "as_append_hc_rule" | "as_prepend_hc_rule" | "mangle_dates"
        | "deleetify" | "get_no" | "get_sc" | "deduplicate" | "deduplicate_reversed"
        | "detriplicate" | "dehex" | "is_pattern" | "is_sc" | "is_walk" | "ilist_unique"
        | "ilist_select_longest" | "iset_unique" | "report" => vec![],

        "lower" => match c.peek() {
            Some(Token::Word(w)) if w.parse::<i64>().is_ok() => vec![RawArg::Int(c.expect_int()?)],
            _ => vec![],
        },

        "multiply" | "segments" | "omit" | "iset_max_length" | "min_length" | "max_length" => {
            vec![RawArg::Int(c.expect_int()?)]
        }

        "cut_left" | "cut_right" => vec![RawArg::Int(c.expect_int()?), RawArg::Int(c.expect_int()?)],

        "strip" | "remove" | "number" | "pos_map" | "sieve" => vec![RawArg::Chars(c.expect_chars()?)],

        "map" => vec![RawArg::Word(c.expect_word()?), RawArg::Chars(c.expect_chars()?)],

        "append" | "append_each" | "prepend" | "prepend_each" | "concat" | "ilist_concat"
        | "regex" | "write" | "is_part_of" | "split" | "sub_splits" => vec![RawArg::Str(c.expect_str()?)],

        "correct_spelling" | "is_regular_word" | "is_popular_word" | "glist_drop" | "glist_in" => {
            vec![RawArg::Word(c.expect_word()?)]
        }

        "min" | "max" | "has" => vec![RawArg::Word(c.expect_word()?), RawArg::Int(c.expect_int()?)],

        "discard_endings" | "replace" | "related" => vec![RawArg::Group(c.expect_group()?)],

        "multi_replace" => {
            let mut args = vec![RawArg::Int(c.expect_int()?)];
            while matches!(c.peek(), Some(Token::LParen)) {
                args.push(RawArg::Group(c.expect_group()?));
            }
            args
        }

        other => return Err(format!("unknown operation {:?}", other)),
    };
    Ok(args)
}

fn parse_op(c: &mut Cursor) -> Result<RawOp, String> {
    match c.peek() {
        Some(Token::LBrace) => {
            c.next();
            let cop = parse_pipeline(c, &[Token::RBrace])?;
            c.expect(&Token::RBrace)?;
            match c.next() {
                Some(Token::Arrow) => Ok(RawOp::StoreIn(c.expect_word()?, cop)),
                Some(Token::BangArrow) => Ok(RawOp::StoreFilteredIn(c.expect_word()?, cop)),
                Some(Token::SlashArrow) => Ok(RawOp::StoreNotApplicableIn(c.expect_word()?, cop)),
                other => Err(format!("expected }}>, }}!> or }}/> after brace group, found {:?}", other)),
            }
        }
        Some(Token::Word(w)) => {
            let (modifier, bare) = peel_modifier(w);
            let bare = bare.to_string();
            match bare.as_str() {
                "do" => {
                    c.next();
                    Ok(RawOp::Do(c.expect_word()?))
                }
                "use" => {
                    c.next();
                    Ok(RawOp::Use(c.expect_word()?))
                }
                "or" if matches!(c.tokens.get(c.pos + 1), Some(Token::LParen)) => {
                    c.next();
                    c.next();
                    let mut branches = Vec::new();
                    loop {
                        branches.push(parse_pipeline(c, &[Token::Comma, Token::RParen])?);
                        match c.next() {
                            Some(Token::Comma) => continue,
                            Some(Token::RParen) => break,
                            other => return Err(format!("expected , or ) in or(), found {:?}", other)),
                        }
                    }
                    Ok(RawOp::Or(branches))
                }
                "non_empty" if matches!(c.tokens.get(c.pos + 1), Some(Token::LParen)) => {
                    c.next();
                    c.next();
                    let on_none = c.expect_bool()?;
                    c.expect(&Token::Comma)?;
                    let on_empty = c.expect_bool()?;
                    c.expect(&Token::Comma)?;
                    let inner = parse_pipeline(c, &[Token::RParen])?;
                    c.expect(&Token::RParen)?;
                    Ok(RawOp::NonEmpty { on_none, on_empty, inner })
                }
                "all" if matches!(c.tokens.get(c.pos + 1), Some(Token::LParen)) => {
                    c.next();
                    c.next();
                    let on_none = c.expect_bool()?;
                    c.expect(&Token::Comma)?;
                    let on_empty = c.expect_bool()?;
                    c.expect(&Token::Comma)?;
                    let gen = parse_pipeline(c, &[Token::Comma])?;
                    c.expect(&Token::Comma)?;
                    let test = parse_pipeline(c, &[Token::RParen])?;
                    c.expect(&Token::RParen)?;
                    Ok(RawOp::All { on_none, on_empty, gen, test })
                }
                "break_up" if matches!(c.tokens.get(c.pos + 1), Some(Token::LParen)) => {
                    c.next();
                    c.next();
                    let inner = parse_pipeline(c, &[Token::RParen])?;
                    c.expect(&Token::RParen)?;
                    Ok(RawOp::BreakUp(inner))
                }
                _ => {
                    c.next();
                    let args = parse_call_args(&bare, c)?;
                    Ok(RawOp::Call(RawOpCall { modifier, name: bare, args }))
                }
            }
        }
        other => Err(format!("expected an operation, found {:?}", other)),
    }
}

fn stops_here(tok: &Token, stop: &[Token]) -> bool {
    stop.iter().any(|s| s == tok)
}

fn parse_pipeline(c: &mut Cursor, stop: &[Token]) -> Result<RawPipeline, String> {
    let mut ops = Vec::new();
    loop {
        match c.peek() {
            None => break,
            Some(t) if stops_here(t, stop) => break,
            _ => ops.push(parse_op(c)?),
        }
    }
    if ops.is_empty() {
        return Err("expected at least one operation".to_string());
    }
    Ok(ops)
}

fn parse_header_line(line_no: usize, keyword: &str, c: &mut Cursor) -> Result<HeaderStmt, ParseError> {
    let to_err = |msg: String| ParseError::new(line_no, msg);
    match keyword {
        "def" => {
            let name = c.expect_word().map_err(to_err)?;
            let body = parse_pipeline(c, &[]).map_err(to_err)?;
            Ok(HeaderStmt::Def(name, body))
        }
        "ignore" => {
            let path = c.expect_str().map_err(to_err)?;
            Ok(HeaderStmt::Ignore(path))
        }
        "set" => {
            let name = c.expect_word().map_err(to_err)?;
            Ok(HeaderStmt::Set(name))
        }
        "config" => {
            let module = c.expect_word().map_err(to_err)?;
            let field = c.expect_word().map_err(to_err)?;
            let value = c.expect_str().map_err(to_err)?;
            Ok(HeaderStmt::Config(module, field, value))
        }
        _ => unreachable!(),
    }
}

pub fn parse_program(source: &str) -> Result<RawProgram, ParseError> {
    let mut program = RawProgram::default();

    for (line_no, line) in logical_lines(source) {
        let tokens = tokenize(&line).map_err(|msg| ParseError::new(line_no, msg))?;
        let mut cursor = Cursor::new(tokens);

        let first_word = match cursor.peek() {
            Some(Token::Word(w)) => w.clone(),
            _ => String::new(),
        };

        if matches!(first_word.as_str(), "def" | "ignore" | "set" | "config") {
            cursor.next();
            let stmt = parse_header_line(line_no, &first_word, &mut cursor)?;
            program.header.push(stmt);
        } else {
            let pipeline = parse_pipeline(&mut cursor, &[]).map_err(|msg| ParseError::new(line_no, msg))?;
            program.body.push(pipeline);
        }

        if !cursor.at_end() {
            return Err(ParseError::new(line_no, "trailing tokens after statement"));
        }
    }

    Ok(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_body_pipeline() {
        let prog = parse_program("lower capitalize report\n").unwrap();
        assert_eq!(prog.body.len(), 1);
        assert_eq!(prog.body[0].len(), 3);
    }

    #[test]
    fn parses_def_ignore_set_and_config_headers() {
        let src = "def greet upper report\nignore \"common.txt\"\nset SEEN\nconfig Segments MIN_LENGTH \"4\"\n";
        let prog = parse_program(src).unwrap();
        assert_eq!(prog.header.len(), 4);
        assert!(matches!(prog.header[0], HeaderStmt::Def(ref n, _) if n == "greet"));
        assert!(matches!(prog.header[1], HeaderStmt::Ignore(ref p) if p == "common.txt"));
        assert!(matches!(prog.header[2], HeaderStmt::Set(ref n) if n == "SEEN"));
        assert!(matches!(prog.header[3], HeaderStmt::Config(ref m, ref f, ref v) if m == "Segments" && f == "MIN_LENGTH" && v == "4"));
    }

    #[test]
    fn joins_backslash_continuations() {
        let src = "lower\n\\ capitalize\n\\ report\n";
        let prog = parse_program(src).unwrap();
        assert_eq!(prog.body.len(), 1);
        assert_eq!(prog.body[0].len(), 3);
    }

    #[test]
    fn parses_or_combinator_branches() {
        let prog = parse_program("or(min_length 4, is_pattern) report\n").unwrap();
        assert_eq!(prog.body[0].len(), 2);
        assert!(matches!(prog.body[0][0], RawOp::Or(ref branches) if branches.len() == 2));
    }

    #[test]
    fn parses_store_in_redirection() {
        let prog = parse_program("{ min_length 4 }> LONG report\n").unwrap();
        assert!(matches!(prog.body[0][0], RawOp::StoreIn(ref n, ref p) if n == "LONG" && p.len() == 1));
    }

    #[test]
    fn parses_modifier_prefixed_call() {
        let prog = parse_program("+upper report\n").unwrap();
        assert!(matches!(
            prog.body[0][0],
            RawOp::Call(RawOpCall { modifier: Some(RawModifier::KeepAlways), .. })
        ));
    }
}
