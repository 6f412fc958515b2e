#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

pub mod error;
pub mod reader;
pub mod reporting;
pub mod span;
pub mod stream;

pub use crate::reader::{read_all, read_one, read_str};
pub use crate::stream::Stream;
