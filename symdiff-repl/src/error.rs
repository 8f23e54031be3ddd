use crate::command::{CommandError, Expr};
use std::ops::Range;
use symdiff_compute::numerical::EvalError;
use symdiff_parser::parser::error::Error as ParseError;

/// Utility enum to package errors that can occur while handling a line of input.
///
/// Every span is relative to the whole line, so the reports point into what the user typed.
#[derive(Debug)]
pub enum Error {
    /// The line is not a well-formed command.
    CommandError(CommandError, Range<usize>),

    /// The expression failed to parse.
    ParseError(ParseError),

    /// The expression could not be evaluated.
    EvalError(EvalError, Range<usize>),
}

impl Error {
    /// Wraps a parse error in the expression, moving its span from the expression into the line.
    pub fn parse(mut err: ParseError, expr: Expr) -> Self {
        err.span = err.span.start + expr.offset..err.span.end + expr.offset;
        Self::ParseError(err)
    }

    /// Wraps an evaluation error, pointing at the whole expression.
    pub fn eval(err: EvalError, expr: Expr) -> Self {
        Self::EvalError(err, expr.span())
    }

    /// Report this error to stderr.
    pub fn report_to_stderr(self, input: &str) {
        symdiff_error::Error::from(self).report_to_stderr("input", input);
    }
}

impl From<(CommandError, Range<usize>)> for Error {
    fn from((err, span): (CommandError, Range<usize>)) -> Self {
        Self::CommandError(err, span)
    }
}

impl From<Error> for symdiff_error::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::CommandError(err, span) => Self::new(vec![span], err),
            Error::ParseError(err) => err.into(),
            Error::EvalError(err, span) => Self::new(vec![span], err),
        }
    }
}
