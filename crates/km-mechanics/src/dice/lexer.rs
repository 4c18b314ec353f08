//! Tokens of the dice formula notation.

use std::fmt;
use std::ops::Range;

use logos::Logos;

/// A formula token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `,` between the options of a keep group.
    Comma,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `kh`
    KeepHighest,
    /// `kl`
    KeepLowest,
    /// An unsigned integer that fits a formula total.
    Number(i32),
    /// `NdM`, with the count defaulting to 1 when omitted.
    Dice {
        /// Number of dice.
        count: u32,
        /// Faces per die.
        sides: u32,
    },
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Comma => write!(f, ","),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::KeepHighest => write!(f, "kh"),
            Token::KeepLowest => write!(f, "kl"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Dice { count, sides } => write!(f, "{count}d{sides}"),
        }
    }
}

#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token(",")]
    Comma,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("kh")]
    KeepHighest,

    #[token("kl")]
    KeepLowest,

    #[regex(r"[0-9]*[dD][0-9]+")]
    Dice,

    #[regex(r"[0-9]+")]
    Number,
}

/// A lexer error with its byte range in the formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    /// Byte range of the offending text.
    pub span: Range<usize>,
    /// What was wrong.
    pub message: String,
}

fn dice(slice: &str) -> Option<Token> {
    let (count, sides) = slice.split_once(['d', 'D'])?;
    let count = if count.is_empty() { 1 } else { count.parse().ok()? };
    let sides = sides.parse().ok()?;
    Some(Token::Dice { count, sides })
}

/// Split a formula into tokens, stopping at the first error.
pub fn lex(source: &str) -> Result<Vec<(Token, Range<usize>)>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let slice = lexer.slice();
        let token = match result {
            Ok(RawToken::Plus) => Token::Plus,
            Ok(RawToken::Minus) => Token::Minus,
            Ok(RawToken::Comma) => Token::Comma,
            Ok(RawToken::LBrace) => Token::LBrace,
            Ok(RawToken::RBrace) => Token::RBrace,
            Ok(RawToken::KeepHighest) => Token::KeepHighest,
            Ok(RawToken::KeepLowest) => Token::KeepLowest,
            Ok(RawToken::Dice) => dice(slice).ok_or_else(|| LexError {
                span: span.clone(),
                message: format!("dice term too large: {slice}"),
            })?,
            Ok(RawToken::Number) => slice.parse().map(Token::Number).map_err(|_| LexError {
                span: span.clone(),
                message: format!("number too large: {slice}"),
            })?,
            Err(()) => {
                return Err(LexError {
                    span: span.clone(),
                    message: format!("unexpected {slice:?}"),
                });
            }
        };
        tokens.push((token, span));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        lex(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn lexes_a_keep_group() {
        assert_eq!(
            tokens("{1d20 + 7, 15}kh"),
            vec![
                Token::LBrace,
                Token::Dice { count: 1, sides: 20 },
                Token::Plus,
                Token::Number(7),
                Token::Comma,
                Token::Number(15),
                Token::RBrace,
                Token::KeepHighest,
            ]
        );
    }

    #[test]
    fn dice_count_defaults_to_one() {
        assert_eq!(tokens("d4"), vec![Token::Dice { count: 1, sides: 4 }]);
        assert_eq!(tokens("6D4"), vec![Token::Dice { count: 6, sides: 4 }]);
    }

    #[test]
    fn reports_position_of_bad_input() {
        let err = lex("1d20)").unwrap_err();
        assert_eq!(err.span, 4..5);

        let err = lex("1 + 99999999999").unwrap_err();
        assert_eq!(err.span, 4..15);
        assert!(err.message.contains("too large"));
    }
}
