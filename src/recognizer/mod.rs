/*
    This module decides membership with the CYK algorithm
*/

use std::fmt::Display;

use itertools::Itertools;
use log::trace;

use crate::grammar::{GrammarIndex, SymbolSet};

/// The triangular CYK table for one input.
///
/// `rows[row][col]` holds every nonterminal deriving the substring that
/// starts at `col` and is `row + 1` characters long, so row `r` has
/// `n - r` cells.
#[derive(Debug)]
pub struct ParseTable {
    rows: Vec<Vec<SymbolSet>>,
}

impl ParseTable {
    pub fn fill(input: &[char], index: &GrammarIndex) -> Self {
        let n = input.len();
        let mut rows = Vec::with_capacity(n);

        if n == 0 {
            return ParseTable { rows };
        }

        rows.push(first_row(input, index));

        for row in 1..n {
            let cells = (0..n - row).map(|col| fill_cell(&rows, row, col, index)).collect();
            rows.push(cells);
        }

        ParseTable { rows }
    }

    // None outside the triangle
    pub fn cell(&self, row: usize, col: usize) -> Option<&SymbolSet> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    // The cell covering the whole input
    pub fn top(&self) -> Option<&SymbolSet> {
        self.rows.last().and_then(|cells| cells.first())
    }

    pub fn derives(&self, symbol: char) -> bool {
        self.top().is_some_and(|top| top.contains(symbol))
    }
}

impl Display for ParseTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let n = self.rows.len();
        for row in (0..n).rev() {
            let rendered = (0..n - row)
                .filter_map(|col| self.cell(row, col))
                .map(|cell| if cell.is_empty() { "-".to_string() } else { cell.to_string() })
                .join(" | ");
            writeln!(f, "{:>3}: {}", row + 1, rendered)?;
        }
        Ok(())
    }
}

fn first_row(input: &[char], index: &GrammarIndex) -> Vec<SymbolSet> {
    input
        .iter()
        .map(|&c| index.producers_of_terminal(c).cloned().unwrap_or_default())
        .collect()
}

// Tries every way of splitting the span at (row, col) into a left part of
// length split + 1 and a right part covering the rest
fn fill_cell(rows: &[Vec<SymbolSet>], row: usize, col: usize, index: &GrammarIndex) -> SymbolSet {
    let mut cell = SymbolSet::new();

    for split in 0..row {
        let left = &rows[split][col];
        let right = &rows[row - split - 1][col + split + 1];

        for (l, r) in left.iter().cartesian_product(right.iter()) {
            if let Some(producers) = index.producers_of_pair(l, r) {
                cell.union_with(producers);
            }
        }
    }

    cell
}

pub fn recognize(input: &str, index: &GrammarIndex, start: char) -> bool {
    let chars = input.chars().collect_vec();

    // An empty table has no top cell, so the empty string is decided by the
    // grammar alone
    if chars.is_empty() {
        return index.derives_empty(start);
    }

    let table = ParseTable::fill(&chars, index);
    trace!("CYK table for `{}`:\n{}", input, table);

    table.derives(start)
}
