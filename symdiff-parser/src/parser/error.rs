use ariadne::{Fmt, Report};
use symdiff_error::{simple_report, ErrorKind, EXPR};
use std::{fmt, ops::Range};

/// The kinds of errors that can occur while parsing an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The source ended where an operand was expected.
    UnfinishedExpression,

    /// A name that is not a function, a constant, or a single-letter variable.
    UnknownOperation {
        /// The name that was found.
        name: String,

        /// Known names that are spelled similarly.
        similar: Vec<&'static str>,
    },

    /// A closing parenthesis with no matching opening parenthesis.
    MissingOpeningBracket,

    /// An opening parenthesis that was never closed.
    MissingClosingBracket,

    /// An operator or closing parenthesis was found where an operand was expected.
    NoNumberFound,

    /// A character the grammar does not use, or leftover input after a complete expression.
    InvalidSymbol {
        /// The offending lexeme.
        symbol: String,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::UnfinishedExpression => write!(f, "unexpected end of expression"),
            ParseErrorKind::UnknownOperation { name, .. } => write!(f, "unknown operation `{}`", name),
            ParseErrorKind::MissingOpeningBracket => write!(f, "unmatched closing parenthesis"),
            ParseErrorKind::MissingClosingBracket => write!(f, "unclosed parenthesis"),
            ParseErrorKind::NoNumberFound => write!(f, "expected a number"),
            ParseErrorKind::InvalidSymbol { symbol } => write!(f, "invalid symbol `{}`", symbol),
        }
    }
}

impl ErrorKind for ParseErrorKind {
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        let (label, help) = match self {
            ParseErrorKind::UnfinishedExpression => (
                format!("I expected to see more {} here", "expression".fg(EXPR)),
                None,
            ),
            ParseErrorKind::UnknownOperation { similar, .. } => (
                "this is not a function, constant or variable".to_string(),
                Some(if similar.is_empty() {
                    format!(
                        "the known functions are {}; variables are a {}",
                        "log, exp, sin, cos, tan".fg(EXPR),
                        "single letter".fg(EXPR),
                    )
                } else {
                    format!("did you mean `{}`?", similar.join("`, `").fg(EXPR))
                }),
            ),
            ParseErrorKind::MissingOpeningBracket => (
                "this parenthesis is not opened".to_string(),
                Some("add an opening parenthesis `(` somewhere before this".to_string()),
            ),
            ParseErrorKind::MissingClosingBracket => (
                "I expected a closing parenthesis `)` here".to_string(),
                Some("add a closing parenthesis `)` after the parenthesized expression".to_string()),
            ),
            ParseErrorKind::NoNumberFound => (
                format!(
                    "I expected a number, constant, variable or function call here, not an {}",
                    "operator".fg(EXPR),
                ),
                None,
            ),
            ParseErrorKind::InvalidSymbol { .. } => (
                "I could not understand this".to_string(),
                None,
            ),
        };

        simple_report(src_id, spans, self, &[label], help)
    }
}

/// A parsing error, pointing at the region of the source where it was detected.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// The region of the source code that caused the error. For errors at the end of the source,
    /// this is an empty range at the end of the last token.
    pub span: Range<usize>,

    /// The kind of error that occurred.
    pub kind: ParseErrorKind,
}

impl Error {
    /// Creates a new error with the given span and kind.
    pub fn new(span: Range<usize>, kind: ParseErrorKind) -> Self {
        Self { span, kind }
    }

    /// Returns the byte offset into the source at which the error was detected.
    pub fn offset(&self) -> usize {
        self.span.start
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &[self.span.clone()])
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset())
    }
}

impl std::error::Error for Error {}

impl From<Error> for symdiff_error::Error {
    fn from(err: Error) -> Self {
        symdiff_error::Error::new(vec![err.span], err.kind)
    }
}
