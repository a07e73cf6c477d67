use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use super::duration::DurationError;
use super::lexer::Span;
use crate::ast::GroupKind;

/// Error returned by [`crate::parse`], using miette for diagnostics
#[allow(dead_code)] // Fields are used by miette's derive macros
#[derive(Debug, Clone, Diagnostic, Error)]
pub enum QueryError {
    #[error("Lexical error: {kind}")]
    #[diagnostic(code(sase::lexical))]
    Lexical {
        kind: LexicalErrorKind,
        #[label("{kind}")]
        span: SourceSpan,
        #[source_code]
        src: String,
        #[help]
        help: Option<String>,
    },

    #[error("Syntax error: {kind}")]
    #[diagnostic(code(sase::syntax))]
    Syntax {
        kind: SyntaxErrorKind,
        #[label("{kind}")]
        span: SourceSpan,
        #[source_code]
        src: String,
        #[help]
        help: Option<String>,
    },

    #[error("Duplicate capture alias '{alias}'")]
    #[diagnostic(
        code(sase::duplicate_alias),
        help("Every capture in a pattern needs its own alias, even in different groups")
    )]
    DuplicateAlias {
        alias: String,
        #[label("declared again here")]
        span: SourceSpan,
        #[label("first declared here")]
        first: SourceSpan,
        #[source_code]
        src: String,
    },

    #[error("Undefined capture '{alias}'")]
    #[diagnostic(code(sase::undefined_capture))]
    UndefinedCapture {
        alias: String,
        #[label("not captured by the EVENT pattern")]
        span: SourceSpan,
        #[source_code]
        src: String,
        #[help]
        suggestions: Option<String>,
    },

    #[error("Internal parser error: {message}")]
    #[diagnostic(code(sase::internal))]
    Internal {
        message: String,
        #[source_code]
        src: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexicalErrorKind {
    #[error("unterminated string literal {literal}")]
    UnterminatedString { literal: String, quote: char },

    #[error("invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyntaxErrorKind {
    #[error("expected {expected}, found {found}")]
    Unexpected { expected: String, found: String },

    #[error("expected {expected}, found end of input")]
    UnexpectedEnd { expected: String },

    #[error("capture of '{event_type}' is missing an alias")]
    MissingAlias { event_type: String },

    #[error("{group} group must contain at least one pattern")]
    EmptyGroup { group: GroupKind },

    #[error("negation accepts exactly one pattern, found {count}")]
    NegationArity { count: usize },

    #[error("identifier '{identifier}' must start with a letter")]
    InvalidIdentifier { identifier: String },

    #[error("'{keyword}' is a reserved word")]
    ReservedWord { keyword: String },

    #[error("trailing comma in pattern list")]
    TrailingComma,

    #[error("a group cannot be mixed with bare captures at the top level")]
    MixedTopLevel,

    #[error("number '{literal}' is out of range")]
    InvalidNumber { literal: String },

    #[error("pattern groups nested deeper than {max} levels")]
    NestingTooDeep { max: usize },

    #[error("invalid WITHIN window: {0}")]
    Duration(#[from] DurationError),
}

/// Flat classification of [`QueryError`]; duration failures are syntax errors
/// at the WITHIN clause but get their own kinds here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    DuplicateAlias,
    UndefinedCapture,
    MalformedDuration,
    NegativeDuration,
    DurationOverflow,
    Internal,
}

// Extension trait for converting spans to miette spans
pub trait SpanExt {
    fn to_source_span(&self) -> SourceSpan;
}

impl SpanExt for Span {
    #[inline]
    fn to_source_span(&self) -> SourceSpan {
        (self.start, self.end.saturating_sub(self.start)).into()
    }
}

impl QueryError {
    pub(crate) fn lexical(kind: LexicalErrorKind, span: Span, src: &str) -> Self {
        let help = match &kind {
            LexicalErrorKind::UnterminatedString { quote, .. } => {
                Some(format!("Add a closing {quote} to end the string"))
            }
            LexicalErrorKind::InvalidEscape(_) => {
                Some("Valid escape sequences: \\\\, \\\", \\', \\n, \\t".to_string())
            }
            LexicalErrorKind::InvalidCharacter(_) => None,
        };
        QueryError::Lexical {
            kind,
            span: span.to_source_span(),
            src: src.to_string(),
            help,
        }
    }

    pub(crate) fn syntax(kind: SyntaxErrorKind, span: Span, src: &str) -> Self {
        let help = match &kind {
            SyntaxErrorKind::MissingAlias { event_type } => Some(format!(
                "Captures are written as `<event type> <alias>`, e.g. `{event_type} e1`"
            )),
            SyntaxErrorKind::EmptyGroup { group } => {
                Some(format!("Add a capture inside the group, e.g. `{group}(t e1)`"))
            }
            SyntaxErrorKind::NegationArity { .. } => {
                Some("Wrap several patterns in SEQ or ANY before negating them".to_string())
            }
            SyntaxErrorKind::ReservedWord { .. } => Some(
                "EVENT, WHERE, WITHIN, SEQ, ANY and AND cannot be used as names".to_string(),
            ),
            SyntaxErrorKind::MixedTopLevel => {
                Some("Wrap the whole pattern in SEQ(...) or ANY(...)".to_string())
            }
            SyntaxErrorKind::Duration(_) => {
                Some("Windows are written like 1h, 30m or 2h30m20s (units: h, m, s, ms, us, ns)".to_string())
            }
            _ => None,
        };
        QueryError::Syntax {
            kind,
            span: span.to_source_span(),
            src: src.to_string(),
            help,
        }
    }

    /// Create an internal error
    pub(crate) fn internal(msg: impl Into<String>, src: &str) -> Self {
        QueryError::Internal {
            message: msg.into(),
            src: src.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::Lexical { .. } => ErrorKind::Lexical,
            QueryError::Syntax {
                kind: SyntaxErrorKind::Duration(d),
                ..
            } => match d {
                DurationError::Malformed { .. } => ErrorKind::MalformedDuration,
                DurationError::Negative { .. } => ErrorKind::NegativeDuration,
                DurationError::Overflow { .. } => ErrorKind::DurationOverflow,
            },
            QueryError::Syntax { .. } => ErrorKind::Syntax,
            QueryError::DuplicateAlias { .. } => ErrorKind::DuplicateAlias,
            QueryError::UndefinedCapture { .. } => ErrorKind::UndefinedCapture,
            QueryError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Whether this error came out of the grammar (lexing or parsing) rather
    /// than semantic validation
    pub fn is_syntactic(&self) -> bool {
        matches!(
            self,
            QueryError::Lexical { .. } | QueryError::Syntax { .. }
        )
    }

    /// Byte offset and length of the offending input
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            QueryError::Lexical { span, .. }
            | QueryError::Syntax { span, .. }
            | QueryError::DuplicateAlias { span, .. }
            | QueryError::UndefinedCapture { span, .. } => Some(*span),
            QueryError::Internal { .. } => None,
        }
    }
}
