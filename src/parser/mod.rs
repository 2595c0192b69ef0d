/*
    This module parses batch files of grammars and test strings
*/

mod lexer;
mod verifier;

use std::fmt::Display;
use std::path::Path;

use itertools::Itertools;
use log::{debug, info, warn};

use crate::error_handling::*;
use crate::grammar::*;
use lexer::*;
use verifier::verify_rules;

#[derive(Debug)]
pub enum CompileErrorType {
    // A production line starts with something other than a nonterminal
    MissingNonterminal,
    // There is nothing between the two sides of a production
    MissingArrow,
    // Something started like an arrow but was neither `->` nor `-->`
    MalformedArrow,
    // A right hand side other than one terminal, two nonterminals or ε
    NotChomskyNormalForm(String),
    // A blank line got too deep into the parser
    // This is a problem with the batch reader, not the grammar
    UnexpectedBlankLine,
    // A line that should hold a count is missing
    MissingCount,
    // A line that should hold a count holds something else
    InvalidCount(String),
    // A count does not match what follows it
    CountMismatch { expected: usize, found: usize },
    // A nonterminal is used but has no productions
    UndefinedNonterminal(char),
    // The start symbol has no productions
    UndefinedStartSymbol(char),
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CompileErrorType::FileError(a), CompileErrorType::FileError(b)) => a.kind() == b.kind(),
            (CompileErrorType::NotChomskyNormalForm(a), CompileErrorType::NotChomskyNormalForm(b)) => a == b,
            (CompileErrorType::InvalidCount(a), CompileErrorType::InvalidCount(b)) => a == b,
            (
                CompileErrorType::CountMismatch { expected: a, found: b },
                CompileErrorType::CountMismatch { expected: c, found: d },
            ) => a == c && b == d,
            (CompileErrorType::UndefinedNonterminal(a), CompileErrorType::UndefinedNonterminal(b)) => a == b,
            (CompileErrorType::UndefinedStartSymbol(a), CompileErrorType::UndefinedStartSymbol(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingNonterminal => write!(f, "A production must start with a nonterminal"),
            CompileErrorType::MissingArrow => write!(f, "Expected `-->` after nonterminal"),
            CompileErrorType::MalformedArrow => write!(f, "Malformed arrow, expected `-->` or `->`"),
            CompileErrorType::NotChomskyNormalForm(rhs) => write!(
                f,
                "`{}` is not in Chomsky Normal Form (expected one terminal, two nonterminals or {})",
                rhs, EPSILON
            ),
            CompileErrorType::UnexpectedBlankLine => write!(f, "Blank line encountered in production parser (this is a problem with the batch reader, not the grammar)"),
            CompileErrorType::MissingCount => write!(f, "Expected a count"),
            CompileErrorType::InvalidCount(text) => write!(f, "`{}` is not a valid count", text),
            CompileErrorType::CountMismatch { expected, found } => write!(f, "Expected {} entries but found {}", expected, found),
            CompileErrorType::UndefinedNonterminal(nonterminal) => write!(f, "Could not find a production for `{}`", nonterminal),
            CompileErrorType::UndefinedStartSymbol(start) => write!(f, "Start symbol `{}` has no productions", start),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: &Path) -> CompileError {
    CompileError::new(Location::whole_file(file), CompileErrorType::FileError(error))
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

// One production line; alternatives separated by `|` share the left side
#[derive(PartialEq, Debug)]
struct Rule {
    lhs: char,
    alternatives: Vec<Rhs>,
    location: Location,
}

// A grammar together with the strings to test against it
#[derive(PartialEq, Debug)]
pub struct GrammarBlock {
    pub grammar: Grammar,
    // The production lines exactly as written, for echoing
    pub source: Vec<String>,
    // Test strings; the empty string is written as ε in the file
    pub strings: Vec<String>,
    pub location: Location,
}

pub type Batch = Vec<GrammarBlock>;

fn parse_alternative(tokens: &[Token]) -> Result<Rhs> {
    match tokens {
        [Token::Terminal(t)] => Ok(Rhs::Terminal(*t)),
        [Token::Nonterminal(left), Token::Nonterminal(right)] => Ok(Rhs::Pair(*left, *right)),
        [Token::Epsilon] => Ok(Rhs::Empty),
        _ => Err(CompileErrorType::NotChomskyNormalForm(tokens.iter().join(""))),
    }
}

fn parse_rewrite(tokens: &[Token]) -> Result<Vec<Rhs>> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    let lhs = match tokens.first() {
        Some(Token::Nonterminal(c)) => Ok(*c),
        Some(_) => Err(CompileErrorType::MissingNonterminal),
        None => Err(CompileErrorType::UnexpectedBlankLine),
    }?;

    if tokens.get(1) != Some(&Token::Arrow) {
        return Err(CompileErrorType::MissingArrow);
    }

    let alternatives = parse_rewrite(&tokens[2..])?;

    return Ok(Rule {
        lhs,
        alternatives,
        location,
    });
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError::new(location, error))
}

fn grammar_from_rules(rules: &[Rule]) -> Grammar {
    Grammar::new(
        rules
            .iter()
            .flat_map(|rule| rule.alternatives.iter().map(|&rhs| Production::new(rule.lhs, rhs)))
            .collect(),
    )
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

// Walks the lines of a batch file, keeping track of line numbers
struct BatchLines<'a> {
    lines: Vec<&'a str>,
    next: usize,
    path: &'a Path,
}

impl<'a> BatchLines<'a> {
    fn new(text: &'a str, path: &'a Path) -> Self {
        BatchLines {
            lines: text.lines().collect(),
            next: 0,
            path,
        }
    }

    fn location(&self) -> Location {
        Location::new(self.path, self.next + 1)
    }

    fn at_end(&self) -> bool {
        self.next >= self.lines.len()
    }

    fn skip_blank(&mut self) {
        while !self.at_end() && is_blank(self.lines[self.next]) {
            self.next += 1;
        }
    }

    // Takes lines up to the next blank line or the end of the file
    fn take_block(&mut self) -> Vec<(Location, &'a str)> {
        let mut block = Vec::new();
        while !self.at_end() && !is_blank(self.lines[self.next]) {
            block.push((self.location(), self.lines[self.next]));
            self.next += 1;
        }
        block
    }

    fn take_count(&mut self) -> LineResult<usize> {
        let location = self.location();
        let line = match self.lines.get(self.next).copied() {
            Some(line) if !is_blank(line) => line.trim(),
            _ => return Err(CompileError::new(location, CompileErrorType::MissingCount)),
        };
        self.next += 1;

        line.parse()
            .map_err(|_| CompileError::new(location, CompileErrorType::InvalidCount(line.to_string())))
    }
}

// Test strings are taken as written, except that a lone ε may carry
// trailing whitespace like any other marker line
fn test_string(line: &str) -> String {
    if line.trim_end() == EPSILON.to_string() {
        String::new()
    } else {
        line.to_string()
    }
}

fn parse_block(lines: &mut BatchLines, start: char) -> FileResult<GrammarBlock> {
    let location = lines.location();
    let production_lines = lines.take_block();

    let (rules, mut errors): (Vec<_>, Vec<_>) = production_lines
        .iter()
        .map(|(line_location, line)| parse_lex_line(line, line_location.clone()))
        .partition_result();

    lines.skip_blank();
    let count_location = lines.location();
    let strings = match lines.take_count() {
        Ok(expected) => {
            let strings = lines.take_block();
            if strings.len() != expected {
                errors.push(CompileError::new(
                    count_location,
                    CompileErrorType::CountMismatch {
                        expected,
                        found: strings.len(),
                    },
                ));
            }
            strings.into_iter().map(|(_, line)| test_string(line)).collect()
        }
        Err(e) => {
            // Skip the strings anyway so the next grammar starts on its own line
            lines.take_block();
            errors.push(e);
            Vec::new()
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    for warning in verify_rules(&rules, start, &location) {
        warn!("{}", warning);
    }

    let grammar = grammar_from_rules(&rules);
    debug!(
        "Grammar at {} has {} productions and {} test strings",
        location,
        grammar.productions.len(),
        strings.len()
    );

    return Ok(GrammarBlock {
        grammar,
        source: production_lines.iter().map(|(_, line)| line.to_string()).collect(),
        strings,
        location,
    });
}

pub fn parse_batch(text: &str, path: &Path, start: char) -> FileResult<Batch> {
    let mut lines = BatchLines::new(text, path);

    lines.skip_blank();
    let count_location = lines.location();
    let expected = lines.take_count().map_err(|e| vec![e])?;

    let mut blocks = Vec::new();
    let mut errors = Vec::new();
    let mut found = 0;
    loop {
        lines.skip_blank();
        if lines.at_end() {
            break;
        }
        found += 1;
        match parse_block(&mut lines, start) {
            Ok(block) => blocks.push(block),
            Err(block_errors) => errors.extend(block_errors),
        }
    }

    if found != expected {
        errors.push(CompileError::new(
            count_location,
            CompileErrorType::CountMismatch { expected, found },
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    return Ok(blocks);
}

pub fn parse_file(path: &Path, start: char) -> FileResult<Batch> {
    let text = std::fs::read_to_string(path).map_err(|e| vec![io_error(e, path)])?;
    let batch = parse_batch(&text, path, start)?;

    info!("Read {} grammars from {}", batch.len(), path.display());
    return Ok(batch);
}
