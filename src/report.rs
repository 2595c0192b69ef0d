/*
    This module writes the results for a batch of grammars
*/

use std::fmt::Display;
use std::io::Write;

use log::{debug, error};
use rand::Rng;

use crate::generator::{GenerateError, Generator};
use crate::grammar::EPSILON;
use crate::parser::{Batch, GrammarBlock};
use crate::recognizer::recognize;

#[derive(Debug)]
pub enum ReportError {
    Io(std::io::Error),
    Generate(GenerateError),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::Io(e) => write!(f, "Could not write report: {}", e),
            ReportError::Generate(e) => write!(f, "{}", e),
        }
    }
}

impl From<std::io::Error> for ReportError {
    fn from(error: std::io::Error) -> Self {
        ReportError::Io(error)
    }
}

pub type ReportResult = Result<(), ReportError>;

// The empty string would be invisible in the report
fn display_string(s: &str) -> String {
    if s.is_empty() {
        EPSILON.to_string()
    } else {
        s.to_string()
    }
}

pub fn verdict(s: &str, accepted: bool) -> String {
    if accepted {
        format!("{} is in the language defined by the above grammar", display_string(s))
    } else {
        format!("{} is NOT in the language defined by the above grammar", display_string(s))
    }
}

fn write_grammar(out: &mut impl Write, block: &GrammarBlock) -> ReportResult {
    for line in &block.source {
        writeln!(out, "{}", line)?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn write_verdicts(out: &mut impl Write, batch: &Batch, start: char) -> ReportResult {
    for block in batch {
        write_grammar(out, block)?;

        let index = block.grammar.index();
        debug!(
            "Indexed {} productions of the grammar at {} into {} terminal entries and {} pair entries",
            index.productions().count(),
            block.location,
            index.terminal_count(),
            index.pair_count()
        );

        for s in &block.strings {
            let accepted = recognize(s, &index, start);
            debug!("`{}` accepted: {}", display_string(s), accepted);
            writeln!(out, "{}", verdict(s, accepted))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

// A grammar without finite derivations is logged and skipped so the rest of
// the batch still gets written; the first such error is returned at the end
pub fn write_samples(out: &mut impl Write, batch: &Batch, start: char, amount: u32, rng: &mut impl Rng) -> ReportResult {
    let mut failure = None;

    for block in batch {
        write_grammar(out, block)?;

        let generator = Generator::new(&block.grammar);
        for _ in 0..amount {
            match generator.generate(start, &block.location, rng) {
                Ok(sentence) => writeln!(out, "{}", display_string(&sentence))?,
                Err(e) => {
                    error!("{}", e);
                    if failure.is_none() {
                        failure = Some(e);
                    }
                    break;
                }
            }
        }
        writeln!(out)?;
    }

    match failure {
        Some(e) => Err(ReportError::Generate(e)),
        None => Ok(()),
    }
}
