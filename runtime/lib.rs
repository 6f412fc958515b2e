#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

//! Object model for a small Lisp
//!
//! Values are created and owned by a [`Store`]. Integers and nil are immediates; symbols, pairs
//! and closures are handles in to the store's arenas and compare by identity.

pub mod buffer;
pub mod error;
mod print;
pub mod store;
pub mod tag;
pub mod value;

pub use crate::buffer::Buffer;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::store::{Store, Teardown};
pub use crate::value::{Kind, Primitive, PrimitiveFn, Value};
