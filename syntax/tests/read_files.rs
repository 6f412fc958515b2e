#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

use std::io::Write;

use codespan_reporting::term;
use tempfile::NamedTempFile;
use termcolor::NoColor;

use twig_runtime::{Store, Value};
use twig_syntax::error::{ErrorKind, ExpectedContent};
use twig_syntax::reporting;
use twig_syntax::span::t2s;
use twig_syntax::{read_all, read_one, Stream};

fn source_file(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents).unwrap();
    file.flush().unwrap();
    file
}

fn printed(store: &Store, forms: &[Value]) -> Vec<String> {
    forms
        .iter()
        .map(|form| store.print_to_string(*form).unwrap())
        .collect()
}

#[test]
fn read_whole_file() {
    let file = source_file(b"; push some numbers\n(define xs '(1 2 3))\n^xs\n$xs\n");

    let mut store = Store::new();
    let mut stream = Stream::open(file.path()).unwrap();
    assert_eq!(file.path().display().to_string(), stream.name());

    let forms = read_all(&mut store, &mut stream).unwrap();
    assert_eq!(
        vec![
            "(define xs quote (1 2 3))",
            "quote",
            "xs",
            "push",
            "quote",
            "xs",
            "pop"
        ],
        printed(&store, &forms)
    );

    // Every occurrence of a name is the same symbol
    let define_form = store.list_elements(forms[0]).unwrap();
    assert_eq!(define_form[1], forms[2]);
    assert_eq!(define_form[1], forms[5]);

    let summary = store.teardown();
    assert_eq!(5, summary.symbols);
    assert_eq!(7, summary.pairs);
    assert_eq!(0, summary.closures);
}

#[test]
fn final_newline_ends_stream() {
    let file = source_file(b"42\n");

    let mut store = Store::new();
    let mut stream = Stream::open(file.path()).unwrap();

    assert_eq!(
        Some(Value::Int(42)),
        read_one(&mut store, &mut stream).unwrap()
    );
    assert_eq!(None, read_one(&mut store, &mut stream).unwrap());
    assert_eq!(None, read_one(&mut store, &mut stream).unwrap());
}

#[test]
fn missing_file() {
    let file = source_file(b"");
    let path = file.path().to_owned();
    drop(file);

    assert!(Stream::open(&path).is_err());
}

#[test]
fn unterminated_list_report() {
    let j = "(define x\n  (cons 1 2)\n";
    let t = "                     > ";
    let u = "^                      ";

    let file = source_file(j.as_bytes());

    let mut store = Store::new();
    let mut stream = Stream::open(file.path()).unwrap();
    let err = read_all(&mut store, &mut stream).unwrap_err();

    assert_eq!(
        &ErrorKind::Eof(ExpectedContent::List(t2s(u))),
        err.kind()
    );
    assert_eq!(t2s(t), err.span());

    let mut output = NoColor::new(vec![]);
    reporting::emit(&mut output, &term::Config::default(), &stream, &err).unwrap();
    let rendered = String::from_utf8(output.into_inner()).unwrap();

    assert!(rendered.contains("unexpected end of file while parsing list"));
    assert!(rendered.contains("list starts here"));
    assert!(rendered.contains(stream.name()));
}
