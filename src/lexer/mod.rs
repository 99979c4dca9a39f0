// Author: Dustin Pilgrim
// License: MIT

use std::str::Chars;
use crate::error::EvalError;

mod scanner;
mod tokenizer;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- literals ---
    Integer(i64),
    Real(f64),
    Ident(String),

    // --- operators ---
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,

    // --- structure ---
    LParen,
    RParen,
    Comma,

    Eof,
}

/// Tokenizer for the arithmetic subset allowed inside values.
pub struct Lexer<'a> {
    input: Chars<'a>,
    peek: Option<char>,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input: input.chars(),
            peek: None,
            column: 0,
        };
        lexer.peek = lexer.input.next();
        lexer
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub(crate) fn next_token(&mut self) -> Result<Token, EvalError> {
        tokenizer::next_token(self)
    }
}

#[cfg(test)]
mod tests;
