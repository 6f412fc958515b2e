use std::error;
use std::fmt;
use std::fmt::Display;
use std::result;

use crate::value::{Kind, Value};

/// Error raised by a store operation
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    op: &'static str,
    kind: ErrorKind,
}

impl Error {
    pub fn new(op: &'static str, kind: ErrorKind) -> Error {
        Error { op, kind }
    }

    pub(crate) fn kind_mismatch(op: &'static str, expected: Kind, found: Value) -> Error {
        Error::new(op, ErrorKind::KindMismatch { expected, found })
    }

    /// Returns the name of the operation that failed
    pub fn op(&self) -> &'static str {
        self.op
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }
}

impl error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.op, self.kind.message())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Value of the wrong kind passed to an accessor
    KindMismatch { expected: Kind, found: Value },
    /// Value was issued by a different store, or by a store that has been torn down
    ForeignValue(Value),
}

impl ErrorKind {
    /// Returns a string describing the error
    pub fn message(&self) -> String {
        match self {
            ErrorKind::KindMismatch { expected, found } => format!(
                "expected {}, got {} {:?}",
                expected.description(),
                found.kind().description(),
                found
            ),
            ErrorKind::ForeignValue(value) => {
                format!("{:?} does not belong to this store", value)
            }
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
