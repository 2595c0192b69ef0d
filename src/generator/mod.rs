/*
    This module generates sentences from a grammar
*/

use rand::prelude::*;
use std::{collections::HashMap, fmt::Display};

use crate::error_handling::*;
use crate::grammar::*;

// Past this depth only the shortest derivations are chosen
const DEPTH_BUDGET: usize = 12;

#[derive(Debug, PartialEq)]
pub enum GenerateErrorType {
    // The start symbol has no finite derivation
    UnproductiveNonterminal(char),
}

impl ErrorType for GenerateErrorType {}

impl Display for GenerateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateErrorType::UnproductiveNonterminal(nonterminal) => {
                write!(f, "`{}` does not derive any finite sentence", nonterminal)
            }
        }
    }
}

pub type GenerateError = Error<GenerateErrorType>;
pub type GenResult = Result<String, GenerateError>;

// Height of the shortest derivation tree for each productive nonterminal,
// found by iterating until nothing improves
fn derivation_heights(grammar: &Grammar) -> HashMap<char, usize> {
    let mut heights = HashMap::new();

    let mut changed = true;
    while changed {
        changed = false;
        for production in &grammar.productions {
            let Some(height) = production_height(production, &heights) else {
                continue;
            };
            let best = heights.entry(production.lhs).or_insert(usize::MAX);
            if height < *best {
                *best = height;
                changed = true;
            }
        }
    }

    heights
}

fn production_height(production: &Production, heights: &HashMap<char, usize>) -> Option<usize> {
    match production.rhs {
        Rhs::Terminal(_) | Rhs::Empty => Some(1),
        Rhs::Pair(left, right) => Some(1 + heights.get(&left)?.max(heights.get(&right)?)),
    }
}

pub struct Generator<'a> {
    grammar: &'a Grammar,
    heights: HashMap<char, usize>,
}

impl<'a> Generator<'a> {
    pub fn new(grammar: &'a Grammar) -> Self {
        Generator {
            grammar,
            heights: derivation_heights(grammar),
        }
    }

    // Generates a sentence in the grammar starting with the given symbol
    pub fn generate(&self, start: char, location: &Location, rng: &mut impl Rng) -> GenResult {
        if !self.heights.contains_key(&start) {
            return Err(GenerateError::new(
                location.clone(),
                GenerateErrorType::UnproductiveNonterminal(start),
            ));
        }

        let mut result = String::new();
        self.generate_nonterminal(start, 0, rng, &mut result);
        return Ok(result);
    }

    fn generate_nonterminal(&self, nonterminal: char, depth: usize, rng: &mut impl Rng, result: &mut String) {
        // Only productions which can finish are candidates; once the budget is
        // spent, only those with the shortest derivation, so every step down
        // gets strictly closer to a terminal
        let candidates: Vec<(&Production, usize)> = self
            .grammar
            .rules_for(nonterminal)
            .filter_map(|p| production_height(p, &self.heights).map(|h| (p, h)))
            .collect();

        let candidates = if depth >= DEPTH_BUDGET {
            let shortest = self.heights[&nonterminal];
            candidates.into_iter().filter(|&(_, h)| h == shortest).collect()
        } else {
            candidates
        };

        let production = match candidates.choose(rng) {
            Some((production, _)) => production,
            None => return,
        };

        match production.rhs {
            Rhs::Terminal(t) => result.push(t),
            Rhs::Pair(left, right) => {
                self.generate_nonterminal(left, depth + 1, rng, result);
                self.generate_nonterminal(right, depth + 1, rng, result);
            }
            Rhs::Empty => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rand::rngs::StdRng;

    use super::*;
    use crate::recognizer::recognize;

    fn textbook() -> Grammar {
        Grammar::new(vec![
            Production::new('S', Rhs::Pair('A', 'B')),
            Production::new('S', Rhs::Pair('B', 'C')),
            Production::new('A', Rhs::Pair('B', 'A')),
            Production::new('A', Rhs::Terminal('a')),
            Production::new('B', Rhs::Terminal('b')),
            Production::new('B', Rhs::Pair('C', 'C')),
            Production::new('C', Rhs::Pair('A', 'B')),
            Production::new('C', Rhs::Terminal('a')),
        ])
    }

    fn location() -> Location {
        Location::whole_file(Path::new("test.txt"))
    }

    #[test]
    fn heights_of_textbook_grammar() {
        let heights = derivation_heights(&textbook());

        assert_eq!(heights[&'A'], 1);
        assert_eq!(heights[&'B'], 1);
        assert_eq!(heights[&'C'], 1);
        assert_eq!(heights[&'S'], 2);
    }

    #[test]
    fn unproductive_symbols_have_no_height() {
        let grammar = Grammar::new(vec![
            Production::new('S', Rhs::Pair('S', 'A')),
            Production::new('A', Rhs::Terminal('a')),
        ]);
        let heights = derivation_heights(&grammar);

        assert!(!heights.contains_key(&'S'));
        assert_eq!(
            Generator::new(&grammar).generate('S', &location(), &mut StdRng::seed_from_u64(1)),
            Err(GenerateError::new(location(), GenerateErrorType::UnproductiveNonterminal('S')))
        );
    }

    #[test]
    fn generated_sentences_are_recognized() {
        let grammar = textbook();
        let index = grammar.index();
        let generator = Generator::new(&grammar);
        let mut rng = StdRng::seed_from_u64(420);

        for _ in 0..50 {
            let sentence = generator.generate('S', &location(), &mut rng).unwrap();
            assert!(recognize(&sentence, &index, 'S'), "`{}` was not recognized", sentence);
        }
    }

    #[test]
    fn recursive_grammar_terminates() {
        // S --> SS | a can grow without bound unless the depth budget kicks in
        let grammar = Grammar::new(vec![
            Production::new('S', Rhs::Pair('S', 'S')),
            Production::new('S', Rhs::Terminal('a')),
        ]);
        let generator = Generator::new(&grammar);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let sentence = generator.generate('S', &location(), &mut rng).unwrap();
            assert!(!sentence.is_empty());
            assert!(sentence.chars().all(|c| c == 'a'));
        }
    }

    #[test]
    fn empty_production() {
        let grammar = Grammar::new(vec![Production::new('S', Rhs::Empty)]);

        assert_eq!(
            Generator::new(&grammar).generate('S', &location(), &mut StdRng::seed_from_u64(3)),
            Ok(String::new())
        );
    }
}
