//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.

use ariadne::{Color, Label, Report, ReportKind, Source};
use std::{fmt::Debug, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send {
    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// Builds a report with one message, one label per span, and an optional help note.
///
/// `labels[i]` is attached to `spans[i]`; an empty label string highlights the span without a
/// message. Extra spans without a matching label are highlighted the same way.
pub fn simple_report<'a, 'r>(
    src_id: &'a str,
    spans: &[Range<usize>],
    message: impl ToString,
    labels: &[String],
    help: Option<String>,
) -> Report<'r, (&'a str, Range<usize>)> {
    let offset = spans.first().map_or(0, |span| span.start);
    let mut builder = Report::build(ReportKind::Error, src_id, offset)
        .with_message(message)
        .with_labels(
            spans
                .iter()
                .enumerate()
                .map(|(i, span)| {
                    let label = Label::new((src_id, span.clone())).with_color(EXPR);
                    match labels.get(i) {
                        Some(msg) if !msg.is_empty() => label.with_message(msg),
                        _ => label,
                    }
                })
                .collect::<Vec<_>>(),
        );

    if let Some(help) = help {
        builder.set_help(help);
    }
    builder.finish()
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,
}

impl Error {
    /// Creates a new error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind) }
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }

    /// Renders the report for this error against the given source code, including any ANSI
    /// color codes.
    pub fn render(&self, src_id: &str, input: &str) -> String {
        let mut buf = Vec::new();
        // writing into a Vec<u8> cannot fail
        let _ = self.build_report(src_id).write((src_id, Source::from(input)), &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Prints the report for this error to stderr.
    pub fn report_to_stderr(&self, src_id: &str, input: &str) {
        let _ = self.build_report(src_id).eprint((src_id, Source::from(input)));
    }
}
