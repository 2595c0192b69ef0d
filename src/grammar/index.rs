use std::collections::HashMap;

use super::{Production, Rhs, SymbolSet};

/// Productions keyed by their right hand side, so the recognizer can ask
/// "which nonterminals produce this?" in constant time.
///
/// Several nonterminals producing the same right hand side are merged into
/// one entry. The index never changes after it is built.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GrammarIndex {
    terminals: HashMap<char, SymbolSet>,
    nonterminals: HashMap<(char, char), SymbolSet>,
    nullable: SymbolSet,
}

impl GrammarIndex {
    pub fn build<'a>(productions: impl IntoIterator<Item = &'a Production>) -> Self {
        let mut index = GrammarIndex::default();
        for production in productions {
            index.insert(production);
        }
        index
    }

    // Adds the left hand side to the entry for the right hand side, creating
    // the entry if this is the first producer
    fn insert(&mut self, production: &Production) {
        let producers = match production.rhs {
            Rhs::Terminal(terminal) => self.terminals.entry(terminal).or_default(),
            Rhs::Pair(left, right) => self.nonterminals.entry((left, right)).or_default(),
            Rhs::Empty => &mut self.nullable,
        };
        producers.insert(production.lhs);
    }

    pub fn producers_of_terminal(&self, terminal: char) -> Option<&SymbolSet> {
        self.terminals.get(&terminal)
    }

    pub fn producers_of_pair(&self, left: char, right: char) -> Option<&SymbolSet> {
        self.nonterminals.get(&(left, right))
    }

    pub fn derives_empty(&self, symbol: char) -> bool {
        self.nullable.contains(symbol)
    }

    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    pub fn pair_count(&self) -> usize {
        self.nonterminals.len()
    }

    // Expands every merged entry back into one production per producer.
    // Order follows the hash maps, so callers should not rely on it.
    pub fn productions(&self) -> impl Iterator<Item = Production> + '_ {
        let terminals = self
            .terminals
            .iter()
            .flat_map(|(&t, lhs)| lhs.iter().map(move |l| Production::new(l, Rhs::Terminal(t))));
        let pairs = self
            .nonterminals
            .iter()
            .flat_map(|(&(a, b), lhs)| lhs.iter().map(move |l| Production::new(l, Rhs::Pair(a, b))));
        let empty = self.nullable.iter().map(|l| Production::new(l, Rhs::Empty));

        terminals.chain(pairs).chain(empty)
    }
}
