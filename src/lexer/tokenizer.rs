use super::*;
use super::scanner::{bump, peek_second, skip_whitespace};

pub(super) fn next_token(lexer: &mut Lexer) -> Result<Token, EvalError> {
    skip_whitespace(lexer);

    match lexer.peek {
        Some('+') => tokenize_symbol(lexer, Token::Plus),
        Some('-') => tokenize_symbol(lexer, Token::Minus),
        Some('%') => tokenize_symbol(lexer, Token::Percent),
        Some('(') => tokenize_symbol(lexer, Token::LParen),
        Some(')') => tokenize_symbol(lexer, Token::RParen),
        Some(',') => tokenize_symbol(lexer, Token::Comma),
        Some('*') => tokenize_doubled(lexer, '*', Token::Star, Token::DoubleStar),
        Some('/') => tokenize_doubled(lexer, '/', Token::Slash, Token::DoubleSlash),
        Some('.') if peek_second(lexer).is_some_and(|c| c.is_ascii_digit()) => tokenize_number(lexer),
        Some(c) if c.is_ascii_digit() => tokenize_number(lexer),
        Some(c) if c.is_alphabetic() || c == '_' => Ok(tokenize_identifier(lexer)),
        Some(ch) => Err(EvalError::Syntax(format!(
            "unexpected character '{}' at column {}",
            ch,
            lexer.column + 1
        ))),
        None => Ok(Token::Eof),
    }
}

fn tokenize_symbol(lexer: &mut Lexer, token: Token) -> Result<Token, EvalError> {
    bump(lexer);
    Ok(token)
}

/// `*` vs `**`, `/` vs `//`
fn tokenize_doubled(lexer: &mut Lexer, ch: char, single: Token, double: Token) -> Result<Token, EvalError> {
    bump(lexer);
    if lexer.peek == Some(ch) {
        bump(lexer);
        Ok(double)
    } else {
        Ok(single)
    }
}

fn tokenize_number(lexer: &mut Lexer) -> Result<Token, EvalError> {
    let mut text = String::new();
    let mut is_real = false;

    take_digits(lexer, &mut text);

    if lexer.peek == Some('.') {
        is_real = true;
        text.push('.');
        bump(lexer);
        take_digits(lexer, &mut text);
    }

    if matches!(lexer.peek, Some('e') | Some('E')) {
        let next = peek_second(lexer);
        let signed = matches!(next, Some('+') | Some('-'));
        // `2e` alone is a number followed by an identifier, which the parser rejects
        if next.is_some_and(|c| c.is_ascii_digit()) || signed {
            is_real = true;
            text.push('e');
            bump(lexer);
            if signed {
                if let Some(sign) = bump(lexer) {
                    text.push(sign);
                }
            }
            if !lexer.peek.is_some_and(|c| c.is_ascii_digit()) {
                return Err(EvalError::Syntax(format!("malformed exponent in '{}'", text)));
            }
            take_digits(lexer, &mut text);
        }
    }

    if !is_real {
        // `01` is not an integer; all-zero runs like `00` are
        if text.len() > 1 && text.starts_with('0') && text.bytes().any(|b| b != b'0') {
            return Err(EvalError::Syntax(format!("leading zero in integer '{}'", text)));
        }
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Token::Integer(i));
        }
    }

    text.parse::<f64>()
        .map(Token::Real)
        .map_err(|_| EvalError::Syntax(format!("invalid number '{}'", text)))
}

fn take_digits(lexer: &mut Lexer, out: &mut String) {
    while let Some(c) = lexer.peek {
        if c.is_ascii_digit() {
            out.push(c);
            bump(lexer);
        } else if c == '_' && peek_second(lexer).is_some_and(|n| n.is_ascii_digit()) {
            bump(lexer);
        } else {
            break;
        }
    }
}

fn tokenize_identifier(lexer: &mut Lexer) -> Token {
    let mut ident = String::new();
    while let Some(c) = lexer.peek {
        if c.is_alphanumeric() || c == '_' {
            ident.push(c);
            bump(lexer);
        } else {
            break;
        }
    }
    Token::Ident(ident)
}
