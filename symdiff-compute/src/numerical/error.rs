use ariadne::{Fmt, Report};
use symdiff_error::{simple_report, ErrorKind, EXPR};
use std::{fmt, ops::Range};

/// Errors that can occur while evaluating an expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The tree has no root.
    EmptyExpression,

    /// A variable has no value in the evaluation context.
    UnresolvedVariable(char),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::EmptyExpression => write!(f, "cannot evaluate an empty expression"),
            EvalError::UnresolvedVariable(var) => write!(f, "`{}` has no value", var),
        }
    }
}

impl std::error::Error for EvalError {}

impl ErrorKind for EvalError {
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        let (label, help) = match self {
            EvalError::EmptyExpression => (String::new(), None),
            EvalError::UnresolvedVariable(var) => (
                "this expression".to_string(),
                Some(format!(
                    "give `{}` a value first, for example with `{}`",
                    var,
                    format!(":eval {}=1 <expression>", var).fg(EXPR),
                )),
            ),
        };
        simple_report(src_id, spans, self, &[label], help)
    }
}
