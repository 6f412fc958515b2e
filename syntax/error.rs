use std::error;
use std::fmt;
use std::fmt::Display;
use std::result;

use crate::span::Span;

/// (Spanned)[`Span`] syntax error
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    span: Span,
    pub(crate) kind: ErrorKind,
}

impl Error {
    pub fn new(span: Span, kind: ErrorKind) -> Error {
        Error { span, kind }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

impl error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind().message())
    }
}

/// Syntax error without (span)[`Span`] information
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Eof(ExpectedContent),
    /// Byte that can't start any form
    UnexpectedChar(u8),
    /// Byte following a `^` or `$` sigil that can't start a symbol
    ExpectedSymbol(u8),
    IntegerOverflow,
}

fn describe_byte(byte: u8) -> String {
    if byte.is_ascii_graphic() {
        format!("`{}`", byte as char)
    } else {
        format!("byte 0x{:02x}", byte)
    }
}

impl ErrorKind {
    /// Returns a string describing the error
    pub fn message(&self) -> String {
        match self {
            ErrorKind::Eof(ec) => {
                format!("unexpected end of file while parsing {}", ec.description())
            }
            ErrorKind::UnexpectedChar(byte) => format!("unexpected {}", describe_byte(*byte)),
            ErrorKind::ExpectedSymbol(byte) => {
                format!("expected symbol, found {}", describe_byte(*byte))
            }
            ErrorKind::IntegerOverflow => "integer literal does not fit in i64".to_owned(),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ExpectedContent {
    List(Span),
    Symbol,
}

impl ExpectedContent {
    pub fn description(&self) -> &'static str {
        match self {
            ExpectedContent::List(_) => "list",
            ExpectedContent::Symbol => "symbol",
        }
    }

    pub fn open_char_span(&self) -> Option<Span> {
        match self {
            ExpectedContent::List(span) => Some(*span),
            ExpectedContent::Symbol => None,
        }
    }
}
