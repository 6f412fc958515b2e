//! Growable byte buffer
//!
//! Small buffers are stored inline without touching the allocator. Once the requested capacity
//! exceeds [`INLINE_CAPACITY`] the contents move to a heap block and stay there; a buffer never
//! moves back inline.

use std::{cmp, fmt};

/// Number of bytes that can be stored before the buffer moves to the heap
pub const INLINE_CAPACITY: usize = 47;

/// Multiplier applied to the capacity when growing
pub const GROWTH_FACTOR: usize = 2;

enum Storage {
    Inline([u8; INLINE_CAPACITY]),
    Heap(Vec<u8>),
}

pub struct Buffer {
    size: usize,
    capacity: usize,
    storage: Storage,
}

impl Buffer {
    /// Returns a new empty inline buffer
    pub fn new() -> Buffer {
        Buffer {
            size: 0,
            capacity: 0,
            storage: Storage::Inline([0; INLINE_CAPACITY]),
        }
    }

    /// Returns a new empty buffer able to hold at least `capacity` bytes without growing
    pub fn with_capacity(capacity: usize) -> Buffer {
        let mut buffer = Self::new();
        buffer.ensure_capacity(capacity);
        buffer
    }

    /// Grows the buffer so it can hold at least `required` bytes
    ///
    /// The new capacity is the larger of double the current capacity and `required`. Crossing
    /// [`INLINE_CAPACITY`] copies the inline contents to the heap exactly once.
    pub fn ensure_capacity(&mut self, required: usize) {
        if self.capacity >= required {
            return;
        }

        self.capacity = cmp::max(self.capacity * GROWTH_FACTOR, required);
        if self.capacity <= INLINE_CAPACITY {
            return;
        }

        if let Storage::Heap(heap) = &mut self.storage {
            heap.resize(self.capacity, 0);
            return;
        }

        let mut heap = vec![0; self.capacity];
        heap[..self.size].copy_from_slice(self.as_slice());
        self.storage = Storage::Heap(heap);
    }

    /// Copies `bytes` to the end of the buffer and returns the offset they were written at
    ///
    /// Appending an empty slice leaves the buffer untouched.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let offset = self.size;
        if bytes.is_empty() {
            return offset;
        }

        self.ensure_capacity(self.size + bytes.len());

        let end = offset + bytes.len();
        self.backing_mut()[offset..end].copy_from_slice(bytes);
        self.size = end;

        offset
    }

    /// Returns the live contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.backing()[..self.size]
    }

    /// Returns the live contents of the buffer for modification in place
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let size = self.size;
        &mut self.backing_mut()[..size]
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if the contents are still stored inline
    pub fn is_inline(&self) -> bool {
        matches!(self.storage, Storage::Inline(_))
    }

    /// Releases the buffer's heap storage
    pub fn delete(self) {
        if let Storage::Heap(heap) = self.storage {
            log::trace!("releasing {} byte heap buffer", heap.len());
        }
    }

    fn backing(&self) -> &[u8] {
        match &self.storage {
            Storage::Inline(inline) => &inline[..],
            Storage::Heap(heap) => &heap[..],
        }
    }

    fn backing_mut(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Inline(inline) => &mut inline[..],
            Storage::Heap(heap) => &mut heap[..],
        }
    }
}

impl Default for Buffer {
    fn default() -> Buffer {
        Self::new()
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Buffer {
        let mut buffer = Buffer::with_capacity(bytes.len());
        buffer.append(bytes);
        buffer
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s.as_bytes());
        Ok(())
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "Buffer({:?})",
            String::from_utf8_lossy(self.as_slice())
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty() {
        let buffer = Buffer::new();

        assert!(buffer.is_empty());
        assert!(buffer.is_inline());
        assert_eq!(0, buffer.capacity());
        assert_eq!(b"", buffer.as_slice());
    }

    #[test]
    fn append_returns_offset() {
        let mut buffer = Buffer::new();

        assert_eq!(0, buffer.append(b"hello"));
        assert_eq!(5, buffer.append(b", "));
        assert_eq!(7, buffer.append(b"world"));

        assert_eq!(b"hello, world", buffer.as_slice());
        assert!(buffer.is_inline());
    }

    #[test]
    fn empty_append_is_noop() {
        let mut buffer = Buffer::new();
        buffer.append(b"abc");

        let capacity = buffer.capacity();
        assert_eq!(3, buffer.append(b""));

        assert_eq!(3, buffer.len());
        assert_eq!(capacity, buffer.capacity());
    }

    #[test]
    fn growth_policy() {
        let mut buffer = Buffer::new();

        buffer.ensure_capacity(10);
        assert_eq!(10, buffer.capacity());

        // Doubling wins over the requested size
        buffer.ensure_capacity(11);
        assert_eq!(20, buffer.capacity());

        // The requested size wins over doubling
        buffer.ensure_capacity(100);
        assert_eq!(100, buffer.capacity());
        assert!(!buffer.is_inline());

        // Never shrinks
        buffer.ensure_capacity(5);
        assert_eq!(100, buffer.capacity());
    }

    #[test]
    fn inline_to_heap_preserves_contents() {
        let mut buffer = Buffer::new();

        let inline_part = [b'a'; INLINE_CAPACITY];
        buffer.append(&inline_part);
        assert!(buffer.is_inline());

        buffer.append(b"overflow");
        assert!(!buffer.is_inline());

        assert_eq!(INLINE_CAPACITY + 8, buffer.len());
        assert_eq!(&inline_part[..], &buffer.as_slice()[..INLINE_CAPACITY]);
        assert_eq!(b"overflow", &buffer.as_slice()[INLINE_CAPACITY..]);
    }

    #[test]
    fn heap_growth_preserves_contents() {
        let mut buffer = Buffer::with_capacity(64);
        assert!(!buffer.is_inline());

        let mut expected = vec![];
        for i in 0..1000u32 {
            let bytes = i.to_le_bytes();
            assert_eq!(expected.len(), buffer.append(&bytes));
            expected.extend_from_slice(&bytes);
        }

        assert_eq!(expected.as_slice(), buffer.as_slice());
        buffer.delete();
    }

    #[test]
    fn string_builder() {
        use std::fmt::Write;

        let mut buffer = Buffer::new();
        write!(buffer, "{} + {} = {}", 1, -2, -1).unwrap();

        assert_eq!(b"1 + -2 = -1", buffer.as_slice());
    }

    #[test]
    fn modify_in_place() {
        let mut buffer = Buffer::from(&b"abc"[..]);
        buffer.as_mut_slice()[1] = b'X';

        assert_eq!(b"aXc", buffer.as_slice());
    }
}
