use std::collections::HashSet;

use itertools::Itertools;

use super::CompileErrorType::{UndefinedNonterminal, UndefinedStartSymbol};
use super::{CompileError, CompileErrors, Location, Rule};
use crate::grammar::Rhs;

fn get_rule_undefined_symbols(rule: &Rule, defined: &HashSet<char>) -> CompileErrors {
    // Pull the nonterminals out of every pair alternative, then keep the
    // ones nobody defines
    rule.alternatives
        .iter()
        .flat_map(|rhs| match rhs {
            Rhs::Pair(left, right) => vec![*left, *right],
            _ => Vec::new(),
        })
        .unique()
        .filter(|symbol| !defined.contains(symbol))
        .map(|symbol| CompileError::new(rule.location.clone(), UndefinedNonterminal(symbol)))
        .collect()
}

// Undefined symbols never derive anything, so these findings are warnings
// rather than reasons to reject the grammar
pub fn verify_rules(rules: &[Rule], start: char, block: &Location) -> CompileErrors {
    let defined: HashSet<char> = rules.iter().map(|rule| rule.lhs).collect();

    let mut warnings = Vec::new();

    if !defined.contains(&start) {
        warnings.push(CompileError::new(block.clone(), UndefinedStartSymbol(start)));
    }

    warnings.extend(rules.iter().flat_map(|rule| get_rule_undefined_symbols(rule, &defined)));

    warnings
}
