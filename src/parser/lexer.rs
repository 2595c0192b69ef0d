use std::fmt::Display;

use itertools::{Itertools, PeekingNext};

use super::{CompileErrorType, Result};
use crate::grammar::{is_nonterminal, EPSILON};

#[derive(PartialEq, Debug)]
pub enum Token {
    Arrow,
    Or,
    Epsilon,
    Nonterminal(char),
    Terminal(char),
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Arrow => write!(f, "-->"),
            Token::Or => write!(f, "|"),
            Token::Epsilon => write!(f, "{}", EPSILON),
            Token::Nonterminal(c) | Token::Terminal(c) => write!(f, "{}", c),
        }
    }
}

// Accepts both `->` and `-->`
pub fn lex_arrow(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    let dashes = line.peeking_take_while(|&c| c == '-').count();

    if dashes == 0 || dashes > 2 || line.next() != Some('>') {
        return Err(CompileErrorType::MalformedArrow);
    }

    Ok(Token::Arrow)
}

pub fn lex_symbol(c: char) -> Token {
    if c == EPSILON {
        Token::Epsilon
    } else if is_nonterminal(c) {
        Token::Nonterminal(c)
    } else {
        Token::Terminal(c)
    }
}

// Everything up to the first arrow is the left hand side. After the arrow
// only `|` is special, so `-` and `>` may be used as terminals.
pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut seen_arrow = false;

    let mut line_chars = line.chars().peekable();

    while let Some(&c) = line_chars.peek() {
        if c.is_whitespace() {
            line_chars.next();
        } else if c == '-' && !seen_arrow {
            tokens.push(lex_arrow(&mut line_chars)?);
            seen_arrow = true;
        } else if c == '|' && seen_arrow {
            line_chars.next();
            tokens.push(Token::Or);
        } else {
            line_chars.next();
            tokens.push(lex_symbol(c));
        }
    }

    return Ok(tokens);
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    #[test]
    fn lex_normal_arrow() {
        let lines = vec!["--> AB", "->a", "-->>"];
        // (result from the function, rest of the iterator)
        let answers = vec![" AB", "a", ">"];

        for (line, answer_rest) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_arrow(&mut chars).unwrap(), Token::Arrow);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_malformed_arrow() {
        let lines = vec!["- AB", "--- AB", "-", "--"];

        for line in lines {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_arrow(&mut chars).unwrap_err(), CompileErrorType::MalformedArrow);
        }
    }

    #[test]
    fn lex_symbols() {
        assert_eq!(lex_symbol('S'), Token::Nonterminal('S'));
        assert_eq!(lex_symbol('a'), Token::Terminal('a'));
        assert_eq!(lex_symbol('0'), Token::Terminal('0'));
        assert_eq!(lex_symbol('ε'), Token::Epsilon);
    }

    #[test]
    fn lex_normal_line() {
        let lines = vec!["S --> AB", "A->a", "S --> BC | a | ε", "M --> -"];
        let answers = vec![
            vec![
                Token::Nonterminal('S'),
                Token::Arrow,
                Token::Nonterminal('A'),
                Token::Nonterminal('B'),
            ],
            vec![Token::Nonterminal('A'), Token::Arrow, Token::Terminal('a')],
            vec![
                Token::Nonterminal('S'),
                Token::Arrow,
                Token::Nonterminal('B'),
                Token::Nonterminal('C'),
                Token::Or,
                Token::Terminal('a'),
                Token::Or,
                Token::Epsilon,
            ],
            vec![Token::Nonterminal('M'), Token::Arrow, Token::Terminal('-')],
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_line(line).unwrap(), answer)
        }
    }

    #[test]
    fn lex_without_arrow() {
        assert_eq!(
            lex_line("S AB").unwrap(),
            vec![Token::Nonterminal('S'), Token::Nonterminal('A'), Token::Nonterminal('B')]
        );
        assert_eq!(lex_line("S -- AB").unwrap_err(), CompileErrorType::MalformedArrow);
    }
}
