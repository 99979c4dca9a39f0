use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::EvalError;
use crate::lexer::{Lexer, Token};

mod expression;

/// Deepest expression the parser accepts. Parentheses, unary operators,
/// exponents and every extra term of a `+` or `*` chain each add a level.
pub const MAX_DEPTH: usize = 200;
pub mod records;

pub use records::{read_records, Header, RawEntry, RawSection};

/// Recursive-descent parser for the arithmetic subset of value syntax.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peek: Option<Token>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(input: &'a str) -> Result<Self, EvalError> {
        let mut lexer = Lexer::new(input);
        let peek = Some(lexer.next_token()?);
        Ok(Self { lexer, peek, depth: 0 })
    }

    pub(crate) fn bump(&mut self) -> Result<Token, EvalError> {
        let curr = self
            .peek
            .take()
            .ok_or_else(|| EvalError::Syntax("unexpected end of input".into()))?;
        if curr != Token::Eof {
            self.peek = Some(self.lexer.next_token()?);
        } else {
            self.peek = Some(Token::Eof);
        }
        Ok(curr)
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.peek.as_ref()
    }

    pub(crate) fn expect(&mut self, expected: Token) -> Result<Token, EvalError> {
        let token = self.bump()?;
        if token != expected {
            return Err(EvalError::Syntax(format!(
                "expected {:?}, got {:?} at column {}",
                expected,
                token,
                self.lexer.column()
            )));
        }
        Ok(token)
    }

    /// Go one level deeper, failing past [`MAX_DEPTH`].
    pub(crate) fn enter(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(EvalError::Syntax(format!(
                "expression nested deeper than {} levels",
                MAX_DEPTH
            )));
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self, levels: usize) {
        self.depth = self.depth.saturating_sub(levels);
    }

    /// Parse the whole input as a single expression.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, EvalError> {
        let expr = expression::parse_additive(self)?;
        self.expect(Token::Eof)?;
        Ok(expr)
    }
}

/// Convenience wrapper: tokenize and parse `input` in one go.
pub(crate) fn parse_expression(input: &str) -> Result<Expr, EvalError> {
    Parser::new(input)?.parse_expression()
}
