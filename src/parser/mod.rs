pub mod ast;
pub mod duration;
pub mod error;
pub mod lexer;
pub mod raw;
pub mod validator;

// Re-exports for clean API
pub use ast::{RawCapture, RawComparison, RawOperand, RawPattern, RawQuery, RawValue, RawWindow};
pub use duration::{format_duration, parse_duration, DurationError};
pub use error::{ErrorKind, LexicalErrorKind, QueryError, SyntaxErrorKind};
pub use lexer::{tokenize, Keyword, Span, Token, TokenKind};
pub use raw::{RawParser, MAX_NESTING_DEPTH};
pub use validator::{CaptureTable, Validator};
