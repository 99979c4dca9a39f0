use super::*;

/// `+`, `-` (left-assoc)
pub(super) fn parse_additive(parser: &mut Parser) -> Result<Expr, EvalError> {
    let mut left = parse_multiplicative(parser)?;
    let mut chain = 0;

    loop {
        let op = match parser.peek() {
            Some(Token::Plus) => BinaryOp::Add,
            Some(Token::Minus) => BinaryOp::Sub,
            _ => break,
        };
        parser.bump()?;
        // a left-deep chain gets one level deeper per term
        parser.enter()?;
        chain += 1;
        let right = parse_multiplicative(parser)?;
        left = Expr::Binary(op, Box::new(left), Box::new(right));
    }

    parser.leave(chain);
    Ok(left)
}

/// `*`, `/`, `//`, `%` (left-assoc)
fn parse_multiplicative(parser: &mut Parser) -> Result<Expr, EvalError> {
    let mut left = parse_unary(parser)?;
    let mut chain = 0;

    loop {
        let op = match parser.peek() {
            Some(Token::Star) => BinaryOp::Mul,
            Some(Token::Slash) => BinaryOp::Div,
            Some(Token::DoubleSlash) => BinaryOp::FloorDiv,
            Some(Token::Percent) => BinaryOp::Mod,
            _ => break,
        };
        parser.bump()?;
        parser.enter()?;
        chain += 1;
        let right = parse_unary(parser)?;
        left = Expr::Binary(op, Box::new(left), Box::new(right));
    }

    parser.leave(chain);
    Ok(left)
}

/// Prefix `+` and `-`
fn parse_unary(parser: &mut Parser) -> Result<Expr, EvalError> {
    parser.enter()?;
    let expr = parse_prefixed(parser)?;
    parser.leave(1);
    Ok(expr)
}

fn parse_prefixed(parser: &mut Parser) -> Result<Expr, EvalError> {
    match parser.peek() {
        Some(Token::Minus) => {
            parser.bump()?;
            let inner = parse_unary(parser)?;
            Ok(Expr::Unary(UnaryOp::Minus, Box::new(inner)))
        }
        Some(Token::Plus) => {
            parser.bump()?;
            let inner = parse_unary(parser)?;
            Ok(Expr::Unary(UnaryOp::Plus, Box::new(inner)))
        }
        _ => parse_power(parser),
    }
}

/// `**` (right-assoc, tighter than a unary minus on its left)
fn parse_power(parser: &mut Parser) -> Result<Expr, EvalError> {
    let base = parse_atom(parser)?;

    if let Some(Token::DoubleStar) = parser.peek() {
        parser.bump()?;
        // exponent goes through unary so `2 ** -1` and `2 ** 3 ** 2` both work
        let exp = parse_unary(parser)?;
        Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exp)))
    } else {
        Ok(base)
    }
}

/// Literals, names, calls, parens
fn parse_atom(parser: &mut Parser) -> Result<Expr, EvalError> {
    match parser.bump()? {
        Token::Integer(i) => Ok(Expr::Integer(i)),
        Token::Real(r) => Ok(Expr::Real(r)),
        Token::Ident(name) => {
            if let Some(Token::LParen) = parser.peek() {
                parser.bump()?;
                let args = parse_arguments(parser)?;
                Ok(Expr::Call(name, args))
            } else {
                Ok(Expr::Ident(name))
            }
        }
        Token::LParen => {
            let inner = parse_additive(parser)?;
            parser.expect(Token::RParen)?;
            Ok(inner)
        }
        other => Err(EvalError::Syntax(format!("unexpected token {:?}", other))),
    }
}

/// Comma-separated arguments after an opening paren, closing paren consumed.
fn parse_arguments(parser: &mut Parser) -> Result<Vec<Expr>, EvalError> {
    let mut args = Vec::new();

    if let Some(Token::RParen) = parser.peek() {
        parser.bump()?;
        return Ok(args);
    }

    loop {
        args.push(parse_additive(parser)?);
        match parser.bump()? {
            Token::Comma => continue,
            Token::RParen => break,
            other => {
                return Err(EvalError::Syntax(format!(
                    "expected ',' or ')' in argument list, got {:?}",
                    other
                )));
            }
        }
    }

    Ok(args)
}
