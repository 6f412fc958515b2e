//! S-expression reader
//!
//! Forms are read one at a time from a [`Stream`] and built directly in a [`Store`]. The `^name`
//! and `$name` sigils expand to three consecutive forms which are queued on the stream and
//! returned by the following reads.

use twig_runtime::{Store, Value};

use crate::error::{Error, ErrorKind, ExpectedContent, Result};
use crate::span::{clamp_offset, Span};
use crate::stream::Stream;

const SYMBOL_PUNCTUATION: &[u8] = b"[]-=#';/.,+_}{~@:?><!%&*";

/// Returns true if `byte` can appear in a symbol
///
/// Digits are excluded so a run like `a1` reads as a symbol followed by an integer.
pub fn is_symbol_byte(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || SYMBOL_PUNCTUATION.contains(&byte)
}

struct Reader<'a> {
    store: &'a mut Store,
    stream: &'a mut Stream,
}

impl Reader<'_> {
    fn position(&self) -> u32 {
        clamp_offset(self.stream.position())
    }

    fn byte_span(&self) -> Span {
        let position = self.position();
        Span::new(position, position.saturating_add(1))
    }

    fn eof_err(&self, ec: ExpectedContent) -> Error {
        Error::new(Span::point(self.position()), ErrorKind::Eof(ec))
    }

    fn skip_comment(&mut self) {
        // Consume the ;
        self.stream.forward(1);
        self.stream.skip_while(|byte| byte != b'\n' && byte != b'\r');
    }

    fn read_int(&mut self) -> Result<Value> {
        let start = self.stream.skip_while(|byte| byte.is_ascii_digit());
        let span = Span::new(clamp_offset(start), self.position());
        let digits = &self.stream.source()[start..self.stream.position()];

        digits
            .iter()
            .try_fold(0i64, |acc, digit| {
                acc.checked_mul(10)?
                    .checked_add(i64::from(digit - b'0'))
            })
            .map(Value::Int)
            .ok_or_else(|| Error::new(span, ErrorKind::IntegerOverflow))
    }

    fn read_sym(&mut self) -> Value {
        let start = self.stream.skip_while(is_symbol_byte);
        let name = &self.stream.source()[start..self.stream.position()];

        self.store.intern(name)
    }

    /// Queues `quote`, the following symbol and `verb`
    fn expand_sigil(&mut self, verb: &[u8]) -> Result<()> {
        // Consume the sigil
        self.stream.forward(1);

        match self.stream.peek() {
            None => {
                return Err(self.eof_err(ExpectedContent::Symbol));
            }
            Some(byte) if !is_symbol_byte(byte) => {
                return Err(Error::new(self.byte_span(), ErrorKind::ExpectedSymbol(byte)));
            }
            Some(_) => {}
        }

        let quote = self.store.intern(b"quote");
        let name = self.read_sym();
        let verb = self.store.intern(verb);

        log::trace!(
            "expanded sigil in {} to {} forms",
            self.stream.name(),
            self.stream.pushback.len() + 3
        );

        self.stream.pushback.extend([quote, name, verb]);
        Ok(())
    }

    fn read_list(&mut self) -> Result<Value> {
        let open_span = self.byte_span();

        // Consume the (
        self.stream.forward(1);

        let mut items = vec![];
        loop {
            self.stream.skip_whitespace();

            match self.stream.peek() {
                None => {
                    return Err(self.eof_err(ExpectedContent::List(open_span)));
                }
                Some(b')') => {
                    self.stream.forward(1);
                    break;
                }
                Some(_) => {
                    if let Some(item) = self.read_one()? {
                        items.push(item);
                    }
                }
            }
        }

        Ok(self.store.make_list(&items))
    }

    fn read_one(&mut self) -> Result<Option<Value>> {
        loop {
            self.stream.skip_whitespace();

            if let Some(pending) = self.stream.pushback.pop_front() {
                return Ok(Some(pending));
            }

            let byte = match self.stream.peek() {
                Some(byte) => byte,
                None => {
                    return Ok(None);
                }
            };

            match byte {
                b';' => self.skip_comment(),
                b'\'' => {
                    self.stream.forward(1);
                    return Ok(Some(self.store.intern(b"quote")));
                }
                b'^' => self.expand_sigil(b"push")?,
                b'$' => self.expand_sigil(b"pop")?,
                b'(' => {
                    return self.read_list().map(Some);
                }
                b'0'..=b'9' => {
                    return self.read_int().map(Some);
                }
                other if is_symbol_byte(other) => {
                    return Ok(Some(self.read_sym()));
                }
                other => {
                    return Err(Error::new(
                        self.byte_span(),
                        ErrorKind::UnexpectedChar(other),
                    ));
                }
            }
        }
    }

    fn read_next(&mut self) -> Result<Option<Value>> {
        self.read_one().map_err(|err| {
            // Forms queued by a sigil inside the failed form are never delivered
            self.stream.pushback.clear();
            err
        })
    }
}

/// Reads the next form from `stream`
///
/// Returns `Ok(None)` once the stream is exhausted and no sigil forms are pending. On error any
/// sigil forms queued while reading the failed form are discarded.
pub fn read_one(store: &mut Store, stream: &mut Stream) -> Result<Option<Value>> {
    Reader { store, stream }.read_next()
}

/// Reads every remaining form from `stream`
pub fn read_all(store: &mut Store, stream: &mut Stream) -> Result<Vec<Value>> {
    let mut reader = Reader { store, stream };
    let mut forms = vec![];

    while let Some(form) = reader.read_next()? {
        forms.push(form);
    }

    log::debug!("read {} forms from {}", forms.len(), reader.stream.name());
    Ok(forms)
}

pub fn read_str(store: &mut Store, name: &str, text: &str) -> Result<Vec<Value>> {
    let mut stream = Stream::from_str(name, text);
    read_all(store, &mut stream)
}
