//! Lexer: splits query text into tokens using a pest token grammar

use std::borrow::Cow;
use std::fmt;

use pest::Parser;
use pest_derive::Parser;

use super::error::{LexicalErrorKind, QueryError};
use crate::ast::CompareOp;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
struct TokenGrammar;

/// Byte range into the query text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Smallest span covering both `self` and `other`
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Span::new(span.start(), span.end())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Event,
    Where,
    Within,
    Seq,
    Any,
    And,
}

impl Keyword {
    /// Keywords are case-sensitive: `seq` is an ordinary identifier
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "EVENT" => Some(Keyword::Event),
            "WHERE" => Some(Keyword::Where),
            "WITHIN" => Some(Keyword::Within),
            "SEQ" => Some(Keyword::Seq),
            "ANY" => Some(Keyword::Any),
            "AND" => Some(Keyword::And),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Event => "EVENT",
            Keyword::Where => "WHERE",
            Keyword::Within => "WITHIN",
            Keyword::Seq => "SEQ",
            Keyword::Any => "ANY",
            Keyword::And => "AND",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind<'a> {
    Keyword(Keyword),
    /// Identifier candidate, or a duration literal like `1h10m`
    Word,
    Number,
    /// Quotes stripped, escapes decoded
    Str(Cow<'a, str>),
    Operator(CompareOp),
    LParen,
    RParen,
    Comma,
    Dot,
    Semicolon,
    Bang,
    Minus,
    /// Text the lexer rejected; the parser reports it when it reaches this token
    Error(LexicalErrorKind),
    Eoi,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Raw source text of the token, quotes included
    pub text: &'a str,
    pub span: Span,
}

impl Token<'_> {
    pub fn offset(&self) -> usize {
        self.span.start
    }

    /// Short description for "found ..." error messages
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Eoi => "end of input".to_string(),
            TokenKind::Str(_) => format!("string literal {}", self.text),
            TokenKind::Keyword(k) => format!("keyword '{k}'"),
            _ => format!("'{}'", self.text),
        }
    }
}

/// Split `input` into tokens. The result always ends with exactly one
/// [`TokenKind::Eoi`] token.
///
/// Rejected text becomes a [`TokenKind::Error`] token in place; the parser
/// raises it only when its cursor reaches that token. The span of an error
/// token covers the offending text. `Err` is reserved for internal failures.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, QueryError> {
    let mut pairs = TokenGrammar::parse(Rule::tokens, input).map_err(|e| {
        QueryError::internal(format!("token grammar rejected input: {e}"), input)
    })?;

    let tokens_pair = pairs
        .next()
        .ok_or_else(|| QueryError::internal("token grammar produced no output", input))?;

    let mut tokens = Vec::new();
    for pair in tokens_pair.into_inner() {
        let mut span = Span::from(pair.as_span());
        let text = pair.as_str();

        let kind = match pair.as_rule() {
            Rule::operator => match CompareOp::from_symbol(text) {
                Some(op) => TokenKind::Operator(op),
                None => {
                    return Err(QueryError::internal(
                        format!("unknown operator token '{text}'"),
                        input,
                    ))
                }
            },
            Rule::number => TokenKind::Number,
            Rule::punct => punct_kind(text)
                .ok_or_else(|| QueryError::internal(format!("unknown punctuation '{text}'"), input))?,
            Rule::string => {
                let (body, body_start) = match pair.into_inner().next() {
                    Some(inner) => (inner.as_str(), inner.as_span().start()),
                    None => ("", span.start + 1),
                };
                match unescape(body, body_start) {
                    Ok(value) => TokenKind::Str(value),
                    Err((escape, escape_span)) => {
                        span = escape_span;
                        TokenKind::Error(LexicalErrorKind::InvalidEscape(escape))
                    }
                }
            }
            Rule::unterminated_string => TokenKind::Error(LexicalErrorKind::UnterminatedString {
                literal: text.to_string(),
                quote: text.chars().next().unwrap_or('"'),
            }),
            Rule::word => Keyword::from_word(text).map_or(TokenKind::Word, TokenKind::Keyword),
            Rule::invalid => TokenKind::Error(LexicalErrorKind::InvalidCharacter(
                text.chars().next().unwrap_or('\u{fffd}'),
            )),
            Rule::EOI => continue,
            rule => {
                return Err(QueryError::internal(
                    format!("Unexpected token rule: {:?}", rule),
                    input,
                ))
            }
        };

        tokens.push(Token { kind, text, span });
    }

    tokens.push(Token {
        kind: TokenKind::Eoi,
        text: "",
        span: Span::new(input.len(), input.len()),
    });

    Ok(tokens)
}

fn punct_kind(text: &str) -> Option<TokenKind<'static>> {
    let kind = match text {
        "(" => TokenKind::LParen,
        ")" => TokenKind::RParen,
        "," => TokenKind::Comma,
        "." => TokenKind::Dot,
        ";" => TokenKind::Semicolon,
        "!" => TokenKind::Bang,
        "-" => TokenKind::Minus,
        _ => return None,
    };
    Some(kind)
}

/// Decode escape sequences in a string literal body; borrows when there are
/// none. An unknown escape yields the offending character and its span.
fn unescape(body: &str, body_start: usize) -> Result<Cow<'_, str>, (char, Span)> {
    if !body.contains('\\') {
        return Ok(Cow::Borrowed(body));
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '\\')) => out.push('\\'),
            Some((_, '"')) => out.push('"'),
            Some((_, '\'')) => out.push('\''),
            Some((_, 'n')) => out.push('\n'),
            Some((_, 't')) => out.push('\t'),
            Some((j, other)) => {
                return Err((
                    other,
                    Span::new(body_start + i, body_start + j + other.len_utf8()),
                ))
            }
            // the grammar pairs every backslash with a following character
            None => out.push('\\'),
        }
    }
    Ok(Cow::Owned(out))
}
