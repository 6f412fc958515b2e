//! Diagnostic printing of values
//!
//! The output is meant for humans. Closures and primitives print raw address text so the result
//! can't be read back in.

use crate::buffer::Buffer;
use crate::error::Result;
use crate::store::Store;
use crate::value::{Primitive, Value};

fn write_address(buffer: &mut Buffer, value: Value) {
    let text = match value.to_word() {
        Some(word) => format!("{:#x}", word),
        None => format!("{:?}", value),
    };

    buffer.append(text.as_bytes());
}

fn write_primitive(buffer: &mut Buffer, primitive: Primitive) {
    buffer.append(b"PRIM<");
    buffer.append(format!("{:#x}", primitive.address()).as_bytes());
    buffer.append(b">");
}

impl Store {
    /// Appends the printed form of `value` to `buffer`
    pub fn write_value(&self, buffer: &mut Buffer, value: Value) -> Result<()> {
        match value {
            Value::Nil => {
                buffer.append(b"()");
            }
            Value::Int(i) => {
                buffer.append(i.to_string().as_bytes());
            }
            Value::Sym(_) => {
                buffer.append(self.as_sym(value)?);
            }
            Value::Pair(_) => {
                buffer.append(b"(");

                let (car, mut tail) = self.as_pair(value)?;
                self.write_value(buffer, car)?;

                while tail.is_pair() {
                    let (car, cdr) = self.as_pair(tail)?;

                    buffer.append(b" ");
                    self.write_value(buffer, car)?;
                    tail = cdr;
                }

                if !tail.is_nil() {
                    buffer.append(b" . ");
                    self.write_value(buffer, tail)?;
                }

                buffer.append(b")");
            }
            Value::Closure(_) => {
                let (body, env) = self.as_closure(value)?;

                buffer.append(b"CLOS<");
                self.write_value(buffer, body)?;
                buffer.append(b", ");
                write_address(buffer, env);
                buffer.append(b">");
            }
            Value::Primitive(primitive) => write_primitive(buffer, primitive),
        }

        Ok(())
    }

    /// Prints `value` to a new string
    ///
    /// Symbol names that aren't valid UTF-8 are converted lossily.
    pub fn print_to_string(&self, value: Value) -> Result<String> {
        let mut buffer = Buffer::new();
        self.write_value(&mut buffer, value)?;

        let printed = String::from_utf8_lossy(buffer.as_slice()).into_owned();
        buffer.delete();

        Ok(printed)
    }
}
