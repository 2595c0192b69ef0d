/*
    This module is for storing grammars in Chomsky Normal Form
*/

mod index;

use std::fmt::Display;

use itertools::Itertools;

pub use index::GrammarIndex;

// Stands for the empty string, both in productions and in test strings
pub const EPSILON: char = 'ε';

pub fn is_nonterminal(c: char) -> bool {
    c.is_uppercase()
}

// The right hand side of a production
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Rhs {
    Terminal(char),
    Pair(char, char),
    Empty,
}

impl Display for Rhs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rhs::Terminal(t) => write!(f, "{}", t),
            Rhs::Pair(left, right) => write!(f, "{}{}", left, right),
            Rhs::Empty => write!(f, "{}", EPSILON),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Production {
    pub lhs: char,
    pub rhs: Rhs,
}

impl Production {
    pub fn new(lhs: char, rhs: Rhs) -> Self {
        Production { lhs, rhs }
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} --> {}", self.lhs, self.rhs)
    }
}

/// A small set of nonterminals which remembers insertion order.
///
/// Grammars in this crate rarely have more than a handful of nonterminals
/// producing the same right hand side, so a linear scan beats hashing.
#[derive(Debug, Clone, Default)]
pub struct SymbolSet(Vec<char>);

// Order is only kept for display; two sets are equal if they hold the same symbols
impl PartialEq for SymbolSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|symbol| other.contains(symbol))
    }
}

impl Eq for SymbolSet {}

impl SymbolSet {
    pub fn new() -> Self {
        SymbolSet(Vec::new())
    }

    // Returns false if the symbol was already present
    pub fn insert(&mut self, symbol: char) -> bool {
        if self.contains(symbol) {
            return false;
        }
        self.0.push(symbol);
        return true;
    }

    pub fn union_with(&mut self, other: &SymbolSet) {
        for symbol in other.iter() {
            self.insert(symbol);
        }
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.0.contains(&symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, char>> {
        self.0.iter().copied()
    }
}

impl FromIterator<char> for SymbolSet {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        let mut set = SymbolSet::new();
        for symbol in iter {
            set.insert(symbol);
        }
        set
    }
}

impl Display for SymbolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Grammar {
    pub productions: Vec<Production>,
}

impl Grammar {
    pub fn new(productions: Vec<Production>) -> Self {
        Grammar { productions }
    }

    pub fn rules_for(&self, lhs: char) -> impl Iterator<Item = &Production> + '_ {
        self.productions.iter().filter(move |p| p.lhs == lhs)
    }

    pub fn index(&self) -> GrammarIndex {
        GrammarIndex::build(&self.productions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_set_keeps_first_insertion() {
        let mut set = SymbolSet::new();
        assert!(set.insert('S'));
        assert!(set.insert('C'));
        assert!(!set.insert('S'));
        assert!(set.insert('A'));

        assert_eq!(set.iter().collect::<Vec<_>>(), vec!['S', 'C', 'A']);
        assert_eq!(set.to_string(), "S C A");
    }

    #[test]
    fn symbol_set_union() {
        let mut left: SymbolSet = "AS".chars().collect();
        let right: SymbolSet = "SCB".chars().collect();
        left.union_with(&right);

        let answer: SymbolSet = "ASCB".chars().collect();
        assert_eq!(left, answer);
        assert_eq!(left.len(), 4);
        assert_eq!(left.to_string(), "A S C B");
    }

    #[test]
    fn symbol_set_equality_ignores_order() {
        let left: SymbolSet = "SCA".chars().collect();
        let right: SymbolSet = "ASC".chars().collect();
        let smaller: SymbolSet = "SC".chars().collect();

        assert_eq!(left, right);
        assert_ne!(left, smaller);
    }

    #[test]
    fn display_productions() {
        let productions = vec![
            Production::new('S', Rhs::Pair('A', 'B')),
            Production::new('A', Rhs::Terminal('a')),
            Production::new('S', Rhs::Empty),
        ];
        let answers = vec!["S --> AB", "A --> a", "S --> ε"];

        for (production, answer) in std::iter::zip(productions, answers) {
            assert_eq!(production.to_string(), answer);
        }
    }

    #[test]
    fn rules_for_symbol() {
        let grammar = Grammar::new(vec![
            Production::new('S', Rhs::Pair('A', 'B')),
            Production::new('A', Rhs::Terminal('a')),
            Production::new('S', Rhs::Terminal('b')),
        ]);

        assert_eq!(grammar.rules_for('S').count(), 2);
        assert_eq!(grammar.rules_for('A').count(), 1);
        assert_eq!(grammar.rules_for('B').count(), 0);
    }
}
