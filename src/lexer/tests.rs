#[cfg(test)]
use super::*;

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut out = Vec::new();
    loop {
        let tok = lexer.next_token().expect("lexing failed");
        if tok == Token::Eof {
            break;
        }
        out.push(tok);
    }
    out
}

#[test]
fn test_constant_expression() {
    assert_eq!(
        tokens("3 * 10 ** 8"),
        vec![
            Token::Integer(3),
            Token::Star,
            Token::Integer(10),
            Token::DoubleStar,
            Token::Integer(8),
        ]
    );
}

#[test]
fn test_function_call() {
    assert_eq!(
        tokens("sin(pi / 4)"),
        vec![
            Token::Ident("sin".into()),
            Token::LParen,
            Token::Ident("pi".into()),
            Token::Slash,
            Token::Integer(4),
            Token::RParen,
        ]
    );
}

#[test]
fn test_real_literals() {
    assert_eq!(tokens("1.5"), vec![Token::Real(1.5)]);
    assert_eq!(tokens(".25"), vec![Token::Real(0.25)]);
    assert_eq!(tokens("3."), vec![Token::Real(3.0)]);
    assert_eq!(tokens("2e3"), vec![Token::Real(2000.0)]);
    assert_eq!(tokens("1.5E-2"), vec![Token::Real(0.015)]);
}

#[test]
fn test_integer_overflow_becomes_real() {
    assert_eq!(tokens("99999999999999999999"), vec![Token::Real(1e20)]);
}

#[test]
fn test_doubled_operators() {
    assert_eq!(
        tokens("7 // 2 % 3"),
        vec![
            Token::Integer(7),
            Token::DoubleSlash,
            Token::Integer(2),
            Token::Percent,
            Token::Integer(3),
        ]
    );
}

#[test]
fn test_bare_exponent_marker_is_identifier() {
    assert_eq!(tokens("2e"), vec![Token::Integer(2), Token::Ident("e".into())]);
}

#[test]
fn test_unexpected_character() {
    let mut lexer = Lexer::new("1 + $x");
    assert_eq!(lexer.next_token(), Ok(Token::Integer(1)));
    assert_eq!(lexer.next_token(), Ok(Token::Plus));
    assert!(matches!(lexer.next_token(), Err(EvalError::Syntax(_))));
}

#[test]
fn test_malformed_exponent() {
    let mut lexer = Lexer::new("1e+");
    assert!(matches!(lexer.next_token(), Err(EvalError::Syntax(_))));
}

#[test]
fn test_leading_zero_integer_is_rejected() {
    let mut lexer = Lexer::new("2024-01-15");
    assert_eq!(lexer.next_token(), Ok(Token::Integer(2024)));
    assert_eq!(lexer.next_token(), Ok(Token::Minus));
    assert!(matches!(lexer.next_token(), Err(EvalError::Syntax(_))));

    assert_eq!(tokens("00 + 0"), vec![Token::Integer(0), Token::Plus, Token::Integer(0)]);
    assert_eq!(tokens("01.5"), vec![Token::Real(1.5)]);
}
