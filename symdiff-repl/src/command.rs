use ariadne::{Fmt, Report};
use std::{fmt, ops::Range};
use symdiff_error::{simple_report, ErrorKind, EXPR};

/// Usage of each command understood by the REPL.
const USAGES: [&str; 4] = [
    ":eval x=1[,y=2] <expression>",
    ":taylor <order> <point> <expression>",
    ":latex <expression>",
    ":steps <expression>",
];

/// An expression embedded in a line of input, along with its byte offset into that line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expr<'a> {
    pub text: &'a str,
    pub offset: usize,
}

impl Expr<'_> {
    /// The span of the expression within the line.
    pub fn span(&self) -> Range<usize> {
        self.offset..self.offset + self.text.len()
    }
}

/// A line of input to the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    /// Print the expression along with its raw and simplified derivatives.
    Differentiate(Expr<'a>),

    /// Evaluate the expression with the given variable bindings.
    Eval {
        bindings: Vec<(char, f64)>,
        expr: Expr<'a>,
    },

    /// Print the Taylor polynomial of the expression.
    Taylor {
        order: u32,
        point: f64,
        expr: Expr<'a>,
    },

    /// Print the expression and its simplified derivative as LaTeX.
    Latex(Expr<'a>),

    /// Print each step taken while simplifying the derivative of the expression.
    Steps(Expr<'a>),
}

/// Errors in the structure of a command line, as opposed to in the expression it carries.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The name after `:` is not a command.
    UnknownCommand(String),

    /// The line ended before a required argument.
    MissingArgument(&'static str),

    /// A `:eval` binding that is not of the form `<letter>=<number>`.
    InvalidBinding(String),

    /// An argument that should be a number.
    InvalidNumber(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(name) => write!(f, "unknown command `:{}`", name),
            CommandError::MissingArgument(what) => write!(f, "missing {}", what),
            CommandError::InvalidBinding(binding) => write!(f, "invalid binding `{}`", binding),
            CommandError::InvalidNumber(text) => write!(f, "`{}` is not a valid number", text),
        }
    }
}

impl ErrorKind for CommandError {
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)> {
        let help = match self {
            CommandError::UnknownCommand(_) | CommandError::MissingArgument(_) => {
                let usages = USAGES
                    .iter()
                    .map(|usage| usage.fg(EXPR).to_string())
                    .collect::<Vec<_>>();
                Some(format!("the commands are: {}", usages.join(", ")))
            },
            CommandError::InvalidBinding(_) => Some(format!(
                "bind variables like {}",
                "x=1,y=-2.5".fg(EXPR),
            )),
            CommandError::InvalidNumber(_) => None,
        };
        simple_report(src_id, spans, self, &[], help)
    }
}

/// Returns the next whitespace-delimited word at or after `start`, with its span.
fn next_word(input: &str, start: usize) -> Option<(&str, Range<usize>)> {
    let rest = &input[start..];
    let begin = start + (rest.len() - rest.trim_start().len());
    let len = input[begin..]
        .find(char::is_whitespace)
        .unwrap_or(input.len() - begin);
    (len > 0).then(|| (&input[begin..begin + len], begin..begin + len))
}

/// Returns the rest of the line at or after `start` as an expression.
fn rest<'a>(
    input: &'a str,
    start: usize,
    what: &'static str,
) -> Result<Expr<'a>, (CommandError, Range<usize>)> {
    let text = &input[start..];
    let trimmed = text.trim_start();
    if trimmed.trim_end().is_empty() {
        return Err((CommandError::MissingArgument(what), input.len()..input.len()));
    }
    Ok(Expr {
        text: trimmed.trim_end(),
        offset: start + (text.len() - trimmed.len()),
    })
}

/// Reads a required word argument.
fn word<'a>(
    input: &'a str,
    start: usize,
    what: &'static str,
) -> Result<(&'a str, Range<usize>), (CommandError, Range<usize>)> {
    next_word(input, start)
        .ok_or((CommandError::MissingArgument(what), input.len()..input.len()))
}

fn number<T: std::str::FromStr>(text: &str, span: Range<usize>) -> Result<T, (CommandError, Range<usize>)> {
    text.parse().map_err(|_| (CommandError::InvalidNumber(text.to_string()), span))
}

/// Parses a comma-separated list of `<letter>=<number>` bindings.
fn bindings(text: &str, span: Range<usize>) -> Result<Vec<(char, f64)>, (CommandError, Range<usize>)> {
    text.split(',')
        .map(|binding| {
            let invalid = || (CommandError::InvalidBinding(binding.to_string()), span.clone());
            let (var, value) = binding.split_once('=').ok_or_else(invalid)?;
            let mut chars = var.chars();
            match (chars.next(), chars.next(), value.parse::<f64>()) {
                (Some(var), None, Ok(value)) if var.is_ascii_alphabetic() => Ok((var, value)),
                _ => Err(invalid()),
            }
        })
        .collect()
}

impl<'a> Command<'a> {
    /// Parses a line of input. Lines that do not start with `:` are expressions to differentiate.
    pub fn parse(input: &'a str) -> Result<Self, (CommandError, Range<usize>)> {
        let Some(after_colon) = input.trim_start().strip_prefix(':') else {
            return Ok(Command::Differentiate(rest(input, 0, "expression")?));
        };
        let colon = input.len() - after_colon.len();

        let (name, name_span) = word(input, colon, "command name")?;
        let start = name_span.end;
        match name {
            "eval" => {
                let (text, span) = word(input, start, "variable bindings")?;
                let bindings = bindings(text, span.clone())?;
                let expr = rest(input, span.end, "expression")?;
                Ok(Command::Eval { bindings, expr })
            },
            "taylor" => {
                let (text, span) = word(input, start, "order")?;
                let order = number(text, span.clone())?;
                let (text, span) = word(input, span.end, "expansion point")?;
                let point = number(text, span.clone())?;
                let expr = rest(input, span.end, "expression")?;
                Ok(Command::Taylor { order, point, expr })
            },
            "latex" => Ok(Command::Latex(rest(input, start, "expression")?)),
            "steps" => Ok(Command::Steps(rest(input, start, "expression")?)),
            _ => Err((CommandError::UnknownCommand(name.to_string()), name_span)),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn plain_expression() {
        assert_eq!(
            Command::parse("  sin(x) "),
            Ok(Command::Differentiate(Expr { text: "sin(x)", offset: 2 })),
        );
    }

    #[test]
    fn eval() {
        assert_eq!(
            Command::parse(":eval x=2,y=-0.5 x * y"),
            Ok(Command::Eval {
                bindings: vec![('x', 2.0), ('y', -0.5)],
                expr: Expr { text: "x * y", offset: 17 },
            }),
        );
    }

    #[test]
    fn taylor() {
        assert_eq!(
            Command::parse(":taylor 3 0.5 exp(x)"),
            Ok(Command::Taylor { order: 3, point: 0.5, expr: Expr { text: "exp(x)", offset: 14 } }),
        );
    }

    #[test]
    fn latex_and_steps() {
        assert_eq!(Command::parse(":latex x"), Ok(Command::Latex(Expr { text: "x", offset: 7 })));
        assert_eq!(Command::parse(":steps x^2"), Ok(Command::Steps(Expr { text: "x^2", offset: 7 })));
    }

    #[test]
    fn rest_borrows_from_the_line() {
        let line = String::from(":latex   x + 1  ");
        assert_eq!(rest(&line, 6, "expression"), Ok(Expr { text: "x + 1", offset: 9 }));
        assert_eq!(
            rest(&line, line.len(), "expression"),
            Err((CommandError::MissingArgument("expression"), 16..16)),
        );
    }

    #[test]
    fn errors() {
        assert_eq!(
            Command::parse(":integrate x"),
            Err((CommandError::UnknownCommand("integrate".to_string()), 1..10)),
        );
        assert_eq!(
            Command::parse(":eval x=1"),
            Err((CommandError::MissingArgument("expression"), 9..9)),
        );
        assert_eq!(
            Command::parse(":eval xy=1 x"),
            Err((CommandError::InvalidBinding("xy=1".to_string()), 6..10)),
        );
        assert_eq!(
            Command::parse(":taylor two 0 x"),
            Err((CommandError::InvalidNumber("two".to_string()), 8..11)),
        );
        assert_eq!(Command::parse("   "), Err((CommandError::MissingArgument("expression"), 3..3)));
    }
}
