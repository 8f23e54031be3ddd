mod command;
mod error;

use command::{Command, Expr};
use error::Error;
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fmt::Write, fs::File, io::{self, BufRead, BufReader, IsTerminal}};
use symdiff_compute::{
    numerical::{Ctxt, Eval},
    symbolic::{derivative, simplify, simplify_with_steps, taylor},
};
use symdiff_parser::{ast::{fmt::Latex, NodeKind, Tree}, parse};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Parses the expression embedded in the line.
fn parse_expr(expr: Expr) -> Result<Tree, Error> {
    parse(expr.text).map_err(|err| Error::parse(err, expr))
}

/// Returns the variable to differentiate with respect to: the first variable in the tree, or `x`
/// if there is none.
fn free_variable(tree: &Tree) -> char {
    tree.post_order_iter()
        .find_map(|id| match tree.kind(id) {
            NodeKind::Variable(var) => Some(var),
            _ => None,
        })
        .unwrap_or('x')
}

/// Handles a single line of input, returning the text to print.
fn run(input: &str) -> Result<String, Error> {
    let mut out = String::new();
    let command = Command::parse(input)?;
    debug!(?command, "running command");
    match command {
        Command::Differentiate(expr) => {
            let tree = parse_expr(expr)?;
            let var = free_variable(&tree);
            let mut deriv = derivative(&tree, var);
            writeln!(out, "f({}) = {}", var, tree).ok();
            writeln!(out, "f'({}) = {}", var, deriv).ok();
            simplify(&mut deriv);
            write!(out, "      = {}", deriv).ok();
        },
        Command::Eval { bindings, expr } => {
            let tree = parse_expr(expr)?;
            let mut ctxt = Ctxt::new();
            for (var, value) in bindings {
                ctxt.add_var(var, value);
            }
            let value = tree.eval(&ctxt).map_err(|err| Error::eval(err, expr))?;
            write!(out, "{}", value).ok();
        },
        Command::Taylor { order, point, expr } => {
            let tree = parse_expr(expr)?;
            let var = free_variable(&tree);
            let expansion = taylor(&tree, var, point, order).map_err(|err| Error::eval(err, expr))?;
            write!(out, "{}", expansion).ok();
        },
        Command::Latex(expr) => {
            let tree = parse_expr(expr)?;
            let var = free_variable(&tree);
            let mut deriv = derivative(&tree, var);
            simplify(&mut deriv);
            writeln!(out, "{}", tree.as_display()).ok();
            write!(out, "\\frac{{d}}{{d{}}} = {}", var, deriv.as_display()).ok();
        },
        Command::Steps(expr) => {
            let tree = parse_expr(expr)?;
            let var = free_variable(&tree);
            let mut deriv = derivative(&tree, var);
            writeln!(out, "f'({}) = {}", var, deriv).ok();
            for step in simplify_with_steps(&mut deriv) {
                writeln!(out, "  {:?}", step).ok();
            }
            write!(out, "      = {}", deriv).ok();
        },
    }
    Ok(out)
}

/// Runs the given line and prints the result, or reports the failure.
fn read_eval(input: &str) {
    match run(input) {
        Ok(out) => println!("{}", out),
        Err(err) => err.report_to_stderr(input),
    }
}

/// Reads the first line of the given reader, without its line ending.
fn first_line(reader: impl BufRead) -> io::Result<String> {
    Ok(reader.lines().next().transpose()?.unwrap_or_default())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // the expression is the first line of the file
        match File::open(&filename).and_then(|file| first_line(BufReader::new(file))) {
            Ok(input) => read_eval(&input),
            Err(err) => {
                eprintln!("could not read `{}`: {}", filename, err);
                std::process::exit(1);
            },
        }
    } else if !io::stdin().is_terminal() {
        match first_line(io::stdin().lock()) {
            Ok(input) => read_eval(&input),
            Err(err) => {
                eprintln!("could not read stdin: {}", err);
                std::process::exit(1);
            },
        }
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("{}", err);
                std::process::exit(1);
            },
        };

        fn process_line(rl: &mut DefaultEditor) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            read_eval(&input);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}
