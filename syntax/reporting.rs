//! Rendering syntax errors as source diagnostics

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::{self, SimpleFile};
use codespan_reporting::term;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::error::{Error, ErrorKind};
use crate::stream::Stream;

fn primary_label_message(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Eof(_) => "unexpected end of file",
        ErrorKind::UnexpectedChar(_) => "unexpected character",
        ErrorKind::ExpectedSymbol(_) => "expected symbol",
        ErrorKind::IntegerOverflow => "integer literal too large",
    }
}

/// Returns the stream contents with every non-ASCII byte replaced by `?`
///
/// This keeps byte offsets stable and on character boundaries even for invalid UTF-8.
fn displayable_source(stream: &Stream) -> String {
    stream
        .source()
        .iter()
        .map(|&byte| if byte.is_ascii() { byte as char } else { '?' })
        .collect()
}

pub fn diagnostic_for_syntax_error(error: &Error) -> Diagnostic<()> {
    let kind = error.kind();

    let mut labels =
        vec![Label::primary((), error.span().byte_range()).with_message(primary_label_message(kind))];

    if let ErrorKind::Eof(ec) = kind {
        if let Some(open_char_span) = ec.open_char_span() {
            labels.push(
                Label::secondary((), open_char_span.byte_range())
                    .with_message(format!("{} starts here", ec.description())),
            );
        }
    }

    Diagnostic::error()
        .with_message(kind.message())
        .with_labels(labels)
}

/// Renders a syntax error against the source of the stream it came from
pub fn emit(
    writer: &mut dyn WriteColor,
    config: &term::Config,
    stream: &Stream,
    error: &Error,
) -> Result<(), files::Error> {
    let file = SimpleFile::new(stream.name(), displayable_source(stream));
    term::emit(writer, config, &file, &diagnostic_for_syntax_error(error))
}

pub fn report_to_stderr(stream: &Stream, error: &Error) {
    let stderr = StandardStream::stderr(ColorChoice::Auto);
    let mut stderr_lock = stderr.lock();

    if let Err(err) = emit(&mut stderr_lock, &term::Config::default(), stream, error) {
        log::warn!("unable to render diagnostic for {}: {}", stream.name(), err);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use codespan_reporting::diagnostic::{LabelStyle, Severity};
    use termcolor::NoColor;
    use twig_runtime::Store;

    use crate::reader::read_all;
    use crate::span::t2s;

    fn render(stream: &Stream, error: &Error) -> String {
        let mut output = NoColor::new(vec![]);
        emit(&mut output, &term::Config::default(), stream, error).unwrap();

        String::from_utf8(output.into_inner()).unwrap()
    }

    #[test]
    fn unterminated_list_diagnostic() {
        let j = "(a (b)";
        let t = "     >";
        let u = "^     ";

        let mut store = Store::new();
        let mut stream = Stream::from_str("unterminated.lisp", j);
        let err = read_all(&mut store, &mut stream).unwrap_err();

        let diagnostic = diagnostic_for_syntax_error(&err);
        assert_eq!(Severity::Error, diagnostic.severity);
        assert_eq!("unexpected end of file while parsing list", diagnostic.message);
        assert_eq!(2, diagnostic.labels.len());

        let primary = &diagnostic.labels[0];
        assert_eq!(LabelStyle::Primary, primary.style);
        assert_eq!(t2s(t).byte_range(), primary.range);

        let secondary = &diagnostic.labels[1];
        assert_eq!(LabelStyle::Secondary, secondary.style);
        assert_eq!(t2s(u).byte_range(), secondary.range);
        assert_eq!("list starts here", secondary.message);
    }

    #[test]
    fn unexpected_char_diagnostic() {
        let j = "(1 2)\n)";
        let t = "      ^";

        let mut store = Store::new();
        let mut stream = Stream::from_str("stray.lisp", j);
        let err = read_all(&mut store, &mut stream).unwrap_err();

        let diagnostic = diagnostic_for_syntax_error(&err);
        assert_eq!(1, diagnostic.labels.len());
        assert_eq!(t2s(t).byte_range(), diagnostic.labels[0].range);

        let rendered = render(&stream, &err);
        assert!(rendered.contains("unexpected `)`"));
        assert!(rendered.contains("stray.lisp:2:1"));
    }

    #[test]
    fn non_ascii_source() {
        let mut store = Store::new();
        let mut stream = Stream::from_bytes("binary.lisp", b"; \xff\xfe\nfoo \xc2\xa3");
        let err = read_all(&mut store, &mut stream).unwrap_err();

        assert_eq!(&ErrorKind::UnexpectedChar(0xc2), err.kind());

        let rendered = render(&stream, &err);
        assert!(rendered.contains("binary.lisp:2:5"));
        assert!(rendered.contains("unexpected byte 0xc2"));
    }
}
