use super::{
    ast::{RawCapture, RawComparison, RawOperand, RawPattern, RawQuery, RawValue, RawWindow},
    duration::parse_duration,
    error::{QueryError, SyntaxErrorKind},
    lexer::{tokenize, Keyword, Span, Token, TokenKind},
};
use crate::ast::GroupKind;

/// Deepest allowed nesting of SEQ/ANY/! groups
pub const MAX_NESTING_DEPTH: usize = 128;

/// Recursive-descent parser over the token stream, one method per grammar
/// nonterminal
pub struct RawParser<'a> {
    src: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    depth: usize,
    eoi: Token<'a>,
}

impl<'a> RawParser<'a> {
    /// Parse a query from input string into a Raw AST
    pub fn parse_raw_query(input: &'a str) -> Result<RawQuery<'a>, QueryError> {
        let tokens = tokenize(input)?;
        let mut parser = RawParser::new(input, tokens);
        parser.parse_query()
    }

    fn new(src: &'a str, tokens: Vec<Token<'a>>) -> Self {
        let eoi = Token {
            kind: TokenKind::Eoi,
            text: "",
            span: Span::new(src.len(), src.len()),
        };
        RawParser {
            src,
            tokens,
            pos: 0,
            depth: 0,
            eoi,
        }
    }

    // ------------------------------------------------------------------
    // token cursor
    // ------------------------------------------------------------------

    fn peek(&self) -> &Token<'a> {
        self.tokens.get(self.pos).unwrap_or(&self.eoi)
    }

    fn peek_kind(&self) -> &TokenKind<'a> {
        &self.peek().kind
    }

    fn advance(&mut self) -> Token<'a> {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: &TokenKind<'_>) -> bool {
        self.peek_kind() == kind
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.peek_kind(), TokenKind::Keyword(k) if *k == keyword)
    }

    fn at_group_start(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Keyword(Keyword::Seq | Keyword::Any) | TokenKind::Bang
        )
    }

    fn expect(&mut self, kind: TokenKind<'static>, expected: &str) -> Result<Token<'a>, QueryError> {
        if self.at(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn error(&self, kind: SyntaxErrorKind, span: Span) -> QueryError {
        QueryError::syntax(kind, span, self.src)
    }

    /// Lexical error carried by a rejected token under the cursor
    fn rejected(&self) -> Option<QueryError> {
        let token = self.peek();
        match &token.kind {
            TokenKind::Error(kind) => Some(QueryError::lexical(kind.clone(), token.span, self.src)),
            _ => None,
        }
    }

    /// Error for whatever token is under the cursor
    fn unexpected(&self, expected: &str) -> QueryError {
        if let Some(err) = self.rejected() {
            return err;
        }
        let token = self.peek();
        let kind = match token.kind {
            TokenKind::Eoi => SyntaxErrorKind::UnexpectedEnd {
                expected: expected.to_string(),
            },
            _ => SyntaxErrorKind::Unexpected {
                expected: expected.to_string(),
                found: token.describe(),
            },
        };
        self.error(kind, token.span)
    }

    // ------------------------------------------------------------------
    // query := "EVENT" pattern [ "WHERE" predicate ] [ "WITHIN" duration ] [ ";" ]
    // ------------------------------------------------------------------

    fn parse_query(&mut self) -> Result<RawQuery<'a>, QueryError> {
        self.expect(TokenKind::Keyword(Keyword::Event), "EVENT")?;
        let pattern = self.parse_pattern()?;

        let predicate = if self.at_keyword(Keyword::Where) {
            self.advance();
            self.parse_predicate()?
        } else {
            Vec::new()
        };

        let window = if self.at_keyword(Keyword::Within) {
            Some(self.parse_window()?)
        } else {
            None
        };

        let terminated = self.at(&TokenKind::Semicolon);
        if terminated {
            self.advance();
        }

        if !self.at(&TokenKind::Eoi) {
            let expected = if terminated {
                "end of input"
            } else if window.is_some() {
                "';' or end of input"
            } else if !predicate.is_empty() {
                "AND, WITHIN, ';' or end of input"
            } else {
                "WHERE, WITHIN, ';' or end of input"
            };
            return Err(self.unexpected(expected));
        }

        Ok(RawQuery {
            pattern,
            predicate,
            window,
        })
    }

    // ------------------------------------------------------------------
    // pattern := capture { "," capture } | group
    // ------------------------------------------------------------------

    fn parse_pattern(&mut self) -> Result<RawPattern<'a>, QueryError> {
        if self.at_group_start() {
            let group = self.parse_group()?;
            if self.at(&TokenKind::Comma) {
                return Err(self.error(SyntaxErrorKind::MixedTopLevel, self.peek().span));
            }
            return Ok(group);
        }

        let first = self.parse_capture()?;
        let mut rest: Vec<RawCapture<'a>> = Vec::new();
        while self.at(&TokenKind::Comma) {
            let comma = self.advance();
            if self.at_group_start() {
                return Err(self.error(SyntaxErrorKind::MixedTopLevel, self.peek().span));
            }
            let ends_clause = matches!(
                self.peek_kind(),
                TokenKind::Eoi
                    | TokenKind::Semicolon
                    | TokenKind::Keyword(Keyword::Where | Keyword::Within)
            );
            if ends_clause {
                return Err(self.error(SyntaxErrorKind::TrailingComma, comma.span));
            }
            rest.push(self.parse_capture()?);
        }

        let Some(last) = rest.last() else {
            return Ok(RawPattern::Capture(first));
        };
        let span = first.span.to(last.span);
        let children = std::iter::once(first)
            .chain(rest)
            .map(RawPattern::Capture)
            .collect();
        Ok(RawPattern::Sequence {
            children,
            span,
            implicit: true,
        })
    }

    // group := ("SEQ"|"ANY"|"!") "(" item { "," item } ")"
    fn parse_group(&mut self) -> Result<RawPattern<'a>, QueryError> {
        let open = self.advance();
        let kind = match open.kind {
            TokenKind::Keyword(Keyword::Seq) => GroupKind::Seq,
            TokenKind::Keyword(Keyword::Any) => GroupKind::Any,
            TokenKind::Bang => GroupKind::Not,
            _ => {
                return Err(QueryError::internal(
                    format!("group parsed from non-group token {}", open.describe()),
                    self.src,
                ))
            }
        };

        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(
                SyntaxErrorKind::NestingTooDeep {
                    max: MAX_NESTING_DEPTH,
                },
                open.span,
            ));
        }
        self.depth += 1;
        let group = self.parse_group_body(kind, open.span);
        self.depth -= 1;
        group
    }

    fn parse_group_body(&mut self, kind: GroupKind, open: Span) -> Result<RawPattern<'a>, QueryError> {
        self.expect(TokenKind::LParen, &format!("'(' after {kind}"))?;

        if self.at(&TokenKind::RParen) {
            let close = self.advance();
            return Err(self.error(SyntaxErrorKind::EmptyGroup { group: kind }, open.to(close.span)));
        }

        let mut children = vec![self.parse_item()?];
        while !self.at(&TokenKind::RParen) {
            let comma = self.expect(TokenKind::Comma, "',' or ')'")?;
            if self.at(&TokenKind::RParen) {
                return Err(self.error(SyntaxErrorKind::TrailingComma, comma.span));
            }
            children.push(self.parse_item()?);
        }
        let close = self.advance();
        let span = open.to(close.span);

        match kind {
            GroupKind::Seq => Ok(RawPattern::Sequence {
                children,
                span,
                implicit: false,
            }),
            GroupKind::Any => Ok(RawPattern::Any { children, span }),
            GroupKind::Not => {
                let count = children.len();
                let [child] = <[RawPattern<'a>; 1]>::try_from(children)
                    .map_err(|_| self.error(SyntaxErrorKind::NegationArity { count }, span))?;
                Ok(RawPattern::Not {
                    child: Box::new(child),
                    span,
                })
            }
        }
    }

    // item := capture | group
    fn parse_item(&mut self) -> Result<RawPattern<'a>, QueryError> {
        if self.at_group_start() {
            self.parse_group()
        } else {
            self.parse_capture().map(RawPattern::Capture)
        }
    }

    // capture := identifier identifier
    fn parse_capture(&mut self) -> Result<RawCapture<'a>, QueryError> {
        let (event_type, event_type_span) = self.expect_identifier("event type")?;
        if !self.at(&TokenKind::Word) {
            return Err(self.rejected().unwrap_or_else(|| {
                self.error(
                    SyntaxErrorKind::MissingAlias {
                        event_type: event_type.to_string(),
                    },
                    event_type_span,
                )
            }));
        }
        let (alias, alias_span) = self.expect_identifier("capture alias")?;

        Ok(RawCapture {
            event_type,
            alias,
            span: event_type_span.to(alias_span),
            event_type_span,
            alias_span,
        })
    }

    // identifier := alpha { alnum | "_" }
    fn expect_identifier(&mut self, expected: &str) -> Result<(&'a str, Span), QueryError> {
        let (text, span) = {
            let token = self.peek();
            (token.text, token.span)
        };

        match self.peek_kind() {
            TokenKind::Word => {}
            TokenKind::Keyword(k) => {
                return Err(self.error(
                    SyntaxErrorKind::ReservedWord {
                        keyword: k.to_string(),
                    },
                    span,
                ))
            }
            _ => return Err(self.unexpected(expected)),
        }

        if !text.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return Err(self.error(
                SyntaxErrorKind::InvalidIdentifier {
                    identifier: text.to_string(),
                },
                span,
            ));
        }

        self.advance();
        Ok((text, span))
    }

    // ------------------------------------------------------------------
    // predicate := comparison { "AND" comparison }
    // ------------------------------------------------------------------

    fn parse_predicate(&mut self) -> Result<Vec<RawComparison<'a>>, QueryError> {
        let mut comparisons = vec![self.parse_comparison()?];
        while self.at_keyword(Keyword::And) {
            self.advance();
            comparisons.push(self.parse_comparison()?);
        }
        Ok(comparisons)
    }

    fn parse_comparison(&mut self) -> Result<RawComparison<'a>, QueryError> {
        let lhs = self.parse_operand()?;
        let op = match self.peek_kind() {
            TokenKind::Operator(op) => *op,
            _ => return Err(self.unexpected("comparison operator (==, !=, <, >, <=, >=)")),
        };
        self.advance();
        let rhs = self.parse_operand()?;
        let span = lhs.span.to(rhs.span);

        Ok(RawComparison { lhs, op, rhs, span })
    }

    // operand := identifier "." identifier | string | number
    fn parse_operand(&mut self) -> Result<RawOperand<'a>, QueryError> {
        match self.peek_kind().clone() {
            TokenKind::Word => {
                let (alias, alias_span) = self.expect_identifier("capture alias")?;
                self.expect(TokenKind::Dot, &format!("'.' and a field name after '{alias}'"))?;
                let (field, field_span) = self.expect_identifier("field name")?;
                Ok(RawOperand {
                    value: RawValue::Attribute {
                        alias,
                        field,
                        alias_span,
                    },
                    span: alias_span.to(field_span),
                })
            }
            TokenKind::Str(value) => {
                let token = self.advance();
                Ok(RawOperand {
                    value: RawValue::String(value),
                    span: token.span,
                })
            }
            TokenKind::Number => {
                let token = self.advance();
                let number = token
                    .text
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| {
                        self.error(
                            SyntaxErrorKind::InvalidNumber {
                                literal: token.text.to_string(),
                            },
                            token.span,
                        )
                    })?;
                Ok(RawOperand {
                    value: RawValue::Number(number),
                    span: token.span,
                })
            }
            _ => Err(self.unexpected("attribute reference (alias.field), string or number")),
        }
    }

    // ------------------------------------------------------------------
    // "WITHIN" duration
    // ------------------------------------------------------------------

    fn parse_window(&mut self) -> Result<RawWindow<'a>, QueryError> {
        self.advance();

        let sign = if self.at(&TokenKind::Minus) {
            Some(self.advance().span)
        } else {
            None
        };

        if !matches!(self.peek_kind(), TokenKind::Word | TokenKind::Number) {
            return Err(self.unexpected("duration after WITHIN (e.g. 1h30m)"));
        }
        if sign.is_some_and(|s| s.end != self.peek().span.start) {
            return Err(self.unexpected("duration directly after '-'"));
        }
        let magnitude = self.advance().span;
        let span = sign.map_or(magnitude, |s| s.to(magnitude));

        let literal = self.src.get(span.start..span.end).unwrap_or_default();
        let duration =
            parse_duration(literal).map_err(|e| self.error(SyntaxErrorKind::Duration(e), span))?;

        Ok(RawWindow {
            literal,
            duration,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::CompareOp;
    use crate::parser::duration::DurationError;
    use crate::parser::error::LexicalErrorKind;
    use miette::SourceSpan;
    use chrono::Duration;
    use std::borrow::Cow;

    fn syntax_kind(input: &str) -> SyntaxErrorKind {
        match RawParser::parse_raw_query(input) {
            Err(QueryError::Syntax { kind, .. }) => kind,
            other => panic!("expected syntax error for {input:?}, got {other:?}"),
        }
    }

    fn aliases(pattern: &RawPattern<'_>) -> Vec<String> {
        pattern.captures().iter().map(|c| c.alias.to_string()).collect()
    }

    #[test]
    fn test_single_capture() {
        let raw = RawParser::parse_raw_query("EVENT a b").unwrap();
        let RawPattern::Capture(capture) = raw.pattern else {
            panic!("expected a bare capture");
        };
        assert_eq!(capture.event_type, "a");
        assert_eq!(capture.alias, "b");
        assert_eq!(capture.span, Span::new(6, 9));
        assert_eq!(capture.alias_span, Span::new(8, 9));
        assert!(raw.predicate.is_empty());
        assert!(raw.window.is_none());
    }

    #[test]
    fn test_implicit_sequence() {
        let raw = RawParser::parse_raw_query("EVENT a b, c d, e f").unwrap();
        assert!(matches!(
            raw.pattern,
            RawPattern::Sequence { implicit: true, ref children, .. } if children.len() == 3
        ));
        assert_eq!(aliases(&raw.pattern), vec!["b", "d", "f"]);
    }

    #[test]
    fn test_nested_groups() {
        let raw = RawParser::parse_raw_query("EVENT SEQ(a e1, !(c e2), ANY(c e3, d e4))").unwrap();
        let RawPattern::Sequence {
            children, implicit, ..
        } = &raw.pattern
        else {
            panic!("expected SEQ");
        };
        assert!(!implicit);
        assert_eq!(children.len(), 3);
        assert_eq!(children[1].group_kind(), Some(GroupKind::Not));
        assert_eq!(children[2].group_kind(), Some(GroupKind::Any));
        assert_eq!(aliases(&raw.pattern), vec!["e1", "e2", "e3", "e4"]);
    }

    #[test]
    fn test_predicate() {
        let raw =
            RawParser::parse_raw_query("EVENT a b WHERE b.foo == 'bar' AND b.n >= -1.5").unwrap();
        assert_eq!(raw.predicate.len(), 2);

        let first = &raw.predicate[0];
        assert_eq!(first.op, CompareOp::Equals);
        assert!(matches!(
            first.lhs.value,
            RawValue::Attribute { alias: "b", field: "foo", .. }
        ));
        assert_eq!(first.rhs.value, RawValue::String(Cow::Borrowed("bar")));

        let second = &raw.predicate[1];
        assert_eq!(second.op, CompareOp::GreaterOrEqual);
        assert_eq!(second.rhs.value, RawValue::Number(-1.5));
    }

    #[test]
    fn test_window() {
        let raw = RawParser::parse_raw_query("EVENT a b WITHIN 2h30m20s;").unwrap();
        let window = raw.window.unwrap();
        assert_eq!(window.literal, "2h30m20s");
        assert_eq!(
            window.duration,
            Duration::hours(2) + Duration::minutes(30) + Duration::seconds(20)
        );
    }

    #[test]
    fn test_trailing_semicolon() {
        assert!(RawParser::parse_raw_query("EVENT a b;").is_ok());
        assert!(RawParser::parse_raw_query("EVENT a b     ;").is_ok());
        assert!(RawParser::parse_raw_query("EVENT a b ;  \n").is_ok());
        assert!(matches!(
            syntax_kind("EVENT a b;;"),
            SyntaxErrorKind::Unexpected { ref expected, .. } if expected == "end of input"
        ));
    }

    #[test]
    fn test_missing_captures() {
        assert!(matches!(
            syntax_kind(""),
            SyntaxErrorKind::UnexpectedEnd { ref expected } if expected == "EVENT"
        ));
        assert!(matches!(
            syntax_kind("EVENT"),
            SyntaxErrorKind::UnexpectedEnd { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT a"),
            SyntaxErrorKind::MissingAlias { ref event_type } if event_type == "a"
        ));
        assert!(matches!(
            syntax_kind("EVENT SEQ(a)"),
            SyntaxErrorKind::MissingAlias { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT a WHERE a.b == 1"),
            SyntaxErrorKind::MissingAlias { .. }
        ));
    }

    #[test]
    fn test_identifier_shape() {
        assert!(matches!(
            syntax_kind("EVENT 1a b"),
            SyntaxErrorKind::InvalidIdentifier { ref identifier } if identifier == "1a"
        ));
        assert!(matches!(
            syntax_kind("EVENT a 2b"),
            SyntaxErrorKind::InvalidIdentifier { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT a _b"),
            SyntaxErrorKind::InvalidIdentifier { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WHERE b.SEQ == 1"),
            SyntaxErrorKind::ReservedWord { ref keyword } if keyword == "SEQ"
        ));
        assert!(RawParser::parse_raw_query("EVENT user_login a_1").is_ok());
    }

    #[test]
    fn test_empty_groups() {
        assert!(matches!(
            syntax_kind("EVENT SEQ()"),
            SyntaxErrorKind::EmptyGroup {
                group: GroupKind::Seq
            }
        ));
        assert!(matches!(
            syntax_kind("EVENT ANY()"),
            SyntaxErrorKind::EmptyGroup {
                group: GroupKind::Any
            }
        ));
        assert!(matches!(
            syntax_kind("EVENT SEQ(a b, !())"),
            SyntaxErrorKind::EmptyGroup {
                group: GroupKind::Not
            }
        ));
    }

    #[test]
    fn test_negation_arity() {
        assert!(matches!(
            syntax_kind("EVENT SEQ(a b, !(c d, e f))"),
            SyntaxErrorKind::NegationArity { count: 2 }
        ));
        assert!(RawParser::parse_raw_query("EVENT !(SEQ(c d, e f))").is_ok());
    }

    #[test]
    fn test_malformed_lists() {
        assert!(matches!(syntax_kind("EVENT a b,"), SyntaxErrorKind::TrailingComma));
        assert!(matches!(syntax_kind("EVENT a b, ;"), SyntaxErrorKind::TrailingComma));
        assert!(matches!(
            syntax_kind("EVENT SEQ(a b,)"),
            SyntaxErrorKind::TrailingComma
        ));
        assert!(matches!(
            syntax_kind("EVENT SEQ(a b), c d"),
            SyntaxErrorKind::MixedTopLevel
        ));
        assert!(matches!(
            syntax_kind("EVENT a b, SEQ(c d)"),
            SyntaxErrorKind::MixedTopLevel
        ));
        assert!(matches!(
            syntax_kind("EVENT SEQ(a b c d)"),
            SyntaxErrorKind::Unexpected { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT SEQ(a b"),
            SyntaxErrorKind::UnexpectedEnd { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT SEQ a b"),
            SyntaxErrorKind::Unexpected { .. }
        ));
    }

    #[test]
    fn test_bad_predicates() {
        assert!(matches!(
            syntax_kind("EVENT a b WHERE"),
            SyntaxErrorKind::UnexpectedEnd { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WHERE b.foo"),
            SyntaxErrorKind::UnexpectedEnd { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WHERE b.foo == bar"),
            SyntaxErrorKind::UnexpectedEnd { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WHERE b.foo == 'x' AND"),
            SyntaxErrorKind::UnexpectedEnd { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WHERE b.foo == 'x' OR b.x == 1"),
            SyntaxErrorKind::Unexpected { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WHERE (b.foo == 'x')"),
            SyntaxErrorKind::Unexpected { .. }
        ));
    }

    #[test]
    fn test_huge_number_is_rejected() {
        let literal = format!("1{}", "0".repeat(400));
        assert!(matches!(
            syntax_kind(&format!("EVENT a b WHERE b.n == {literal}")),
            SyntaxErrorKind::InvalidNumber { .. }
        ));
    }

    #[test]
    fn test_window_errors() {
        assert!(matches!(
            syntax_kind("EVENT a b WITHIN 100000000000000h"),
            SyntaxErrorKind::Duration(DurationError::Overflow { .. })
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WITHIN -4h"),
            SyntaxErrorKind::Duration(DurationError::Negative { ref literal }) if literal == "-4h"
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WITHIN 4x"),
            SyntaxErrorKind::Duration(DurationError::Malformed { .. })
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WITHIN 10"),
            SyntaxErrorKind::Duration(DurationError::Malformed { .. })
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WITHIN"),
            SyntaxErrorKind::UnexpectedEnd { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WITHIN - 4h"),
            SyntaxErrorKind::Unexpected { ref found, .. } if found == "'4h'"
        ));
        assert!(matches!(
            syntax_kind("EVENT a b WITHIN 1h WHERE b.x == 1"),
            SyntaxErrorKind::Unexpected { .. }
        ));
    }

    #[test]
    fn test_lexical_errors_raised_where_reached() {
        let lexical = |input: &str| match RawParser::parse_raw_query(input) {
            Err(QueryError::Lexical { kind, span, .. }) => (kind, span),
            other => panic!("expected lexical error for {input:?}, got {other:?}"),
        };

        // an earlier syntax error wins over rejected text further on
        assert!(matches!(
            syntax_kind("EVENT SEQ() WHERE b.x == 'abc"),
            SyntaxErrorKind::EmptyGroup { .. }
        ));
        assert!(matches!(
            syntax_kind("EVENT a b OR | c"),
            SyntaxErrorKind::Unexpected { ref found, .. } if found == "'OR'"
        ));

        let (kind, span) = lexical("EVENT a @");
        assert_eq!(kind, LexicalErrorKind::InvalidCharacter('@'));
        assert_eq!(span, SourceSpan::from((8, 1)));

        let (kind, _) = lexical("EVENT a b WHERE b.x = 1");
        assert_eq!(kind, LexicalErrorKind::InvalidCharacter('='));

        let (kind, span) = lexical("EVENT a b WHERE b.x == 'x\\q'");
        assert_eq!(kind, LexicalErrorKind::InvalidEscape('q'));
        assert_eq!(span, SourceSpan::from((25, 2)));
    }

    #[test]
    fn test_nesting_limit() {
        let ok = format!("EVENT {}a b{}", "SEQ(".repeat(MAX_NESTING_DEPTH), ")".repeat(MAX_NESTING_DEPTH));
        assert!(RawParser::parse_raw_query(&ok).is_ok());

        let deep = MAX_NESTING_DEPTH + 1;
        let too_deep = format!("EVENT {}a b{}", "SEQ(".repeat(deep), ")".repeat(deep));
        assert!(matches!(
            syntax_kind(&too_deep),
            SyntaxErrorKind::NestingTooDeep { max: MAX_NESTING_DEPTH }
        ));

        // unbalanced and very deep: still an error, not a crash
        let garbage = format!("EVENT {}", "!(".repeat(100_000));
        assert!(RawParser::parse_raw_query(&garbage).is_err());
    }
}
