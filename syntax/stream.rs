//! Named byte streams for the reader

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;

use twig_runtime::{Buffer, Value};

/// Returns true for the bytes C's `isspace` accepts
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Cursor over the complete contents of a named source
///
/// The stream also carries the reader's pushback queue so forms produced by a sigil are
/// delivered on the following reads of the same stream.
pub struct Stream {
    name: String,
    data: Buffer,
    position: usize,
    pub(crate) pushback: VecDeque<Value>,
}

impl Stream {
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Stream {
        Stream {
            name: name.into(),
            data: Buffer::from(bytes),
            position: 0,
            pushback: VecDeque::new(),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(name: impl Into<String>, text: &str) -> Stream {
        Self::from_bytes(name, text.as_bytes())
    }

    /// Reads an entire file in to a new stream named after its path
    pub fn open(path: impl AsRef<Path>) -> io::Result<Stream> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;

        log::debug!("opened {} ({} bytes)", path.display(), bytes.len());
        Ok(Self::from_bytes(path.display().to_string(), &bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the complete contents of the stream
    pub fn source(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Returns true if there's no unread content
    ///
    /// A single newline at the very end of the source doesn't count as content.
    pub fn at_end(&self) -> bool {
        let size = self.data.len();

        self.position >= size
            || (self.position == size - 1 && self.source()[self.position] == b'\n')
    }

    /// Returns the number of bytes after the cursor
    pub fn unread(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Returns the byte at the cursor or `None` at the end of the stream
    pub fn peek(&self) -> Option<u8> {
        if self.at_end() {
            None
        } else {
            Some(self.source()[self.position])
        }
    }

    /// Advances the cursor by `offset` bytes
    ///
    /// Returns false without moving if fewer than `offset` bytes remain.
    pub fn forward(&mut self, offset: usize) -> bool {
        if self.unread() < offset {
            return false;
        }

        self.position += offset;
        true
    }

    /// Moves the cursor back by `offset` bytes
    ///
    /// Returns false without moving if that would pass the start of the stream.
    pub fn backward(&mut self, offset: usize) -> bool {
        if self.position < offset {
            return false;
        }

        self.position -= offset;
        true
    }

    /// Returns the number of sigil forms waiting to be read
    pub fn pending(&self) -> usize {
        self.pushback.len()
    }

    pub(crate) fn skip_whitespace(&mut self) {
        while let Some(byte) = self.peek() {
            if !is_whitespace(byte) {
                break;
            }

            self.position += 1;
        }
    }

    /// Skips bytes while `predicate` holds and returns the consumed range's start
    pub(crate) fn skip_while(&mut self, predicate: impl Fn(u8) -> bool) -> usize {
        let start = self.position;

        while let Some(byte) = self.peek() {
            if !predicate(byte) {
                break;
            }

            self.position += 1;
        }

        start
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cursor() {
        let mut stream = Stream::from_str("test", "abc");

        assert_eq!("test", stream.name());
        assert_eq!(Some(b'a'), stream.peek());
        assert_eq!(3, stream.unread());

        assert!(stream.forward(2));
        assert_eq!(Some(b'c'), stream.peek());
        assert_eq!(1, stream.unread());

        assert!(!stream.forward(2));
        assert_eq!(2, stream.position());

        assert!(stream.backward(2));
        assert!(!stream.backward(1));
        assert_eq!(0, stream.position());

        assert!(stream.forward(3));
        assert!(stream.at_end());
        assert_eq!(None, stream.peek());
        assert_eq!(0, stream.unread());
    }

    #[test]
    fn empty_stream() {
        let stream = Stream::from_bytes("empty", b"");

        assert!(stream.at_end());
        assert_eq!(None, stream.peek());
        assert_eq!(b"", stream.source());
    }

    #[test]
    fn trailing_newline_is_not_content() {
        let mut stream = Stream::from_str("newline", "42\n");

        assert!(stream.forward(2));
        assert!(stream.at_end());
        assert_eq!(None, stream.peek());

        // Only the final byte is special
        let mut stream = Stream::from_str("newlines", "42\n\n");
        assert!(stream.forward(2));
        assert!(!stream.at_end());
        assert_eq!(Some(b'\n'), stream.peek());

        let stream = Stream::from_str("only-newline", "\n");
        assert!(stream.at_end());
    }

    #[test]
    fn whitespace_set() {
        for &byte in b" \t\n\x0b\x0c\r" {
            assert!(is_whitespace(byte), "{:#x} should be whitespace", byte);
        }

        for &byte in b"a0();,\x00" {
            assert!(!is_whitespace(byte), "{:#x} should not be whitespace", byte);
        }
    }

    #[test]
    fn skipping() {
        let mut stream = Stream::from_str("skip", " \t\x0b\x0cabc123 ");

        stream.skip_whitespace();
        assert_eq!(4, stream.position());

        let start = stream.skip_while(|byte| byte.is_ascii_alphabetic());
        assert_eq!(4, start);
        assert_eq!(7, stream.position());
        assert_eq!(Some(b'1'), stream.peek());
    }
}
