//! Single word encoding of values
//!
//! A [`Word`] packs a kind tag in to its low bits. Integers use a single tag bit leaving a 63 bit
//! signed payload. Every boxed kind (symbols, pairs, closures and primitives) uses an 8 bit tag;
//! its payload is an arena index rather than an address so no allocator alignment is assumed.
//!
//! This is the representation used for the store's bookkeeping records and for the address text
//! of printed closures and primitives.

use std::fmt;

/// Width of the integer tag
pub const INT_SHIFT: u32 = 1;

/// Width of the tag shared by all boxed kinds
pub const BOXED_SHIFT: u32 = 8;

/// Size in bytes of an encoded word
pub const WORD_SIZE: usize = 8;

const INT_MIN: i64 = -(1 << 62);
const INT_MAX: i64 = (1 << 62) - 1;

#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Tag {
    Nil = 0b0000_0000,
    Int = 0b0000_0001,
    Sym = 0b0000_0010,
    Pair = 0b0000_0100,
    Closure = 0b0000_0110,
    Primitive = 0b0000_1000,
}

impl Tag {
    /// Number of low bits occupied by this tag
    pub fn shift(self) -> u32 {
        match self {
            Tag::Nil => 0,
            Tag::Int => INT_SHIFT,
            Tag::Sym | Tag::Pair | Tag::Closure | Tag::Primitive => BOXED_SHIFT,
        }
    }

    fn mask(self) -> u64 {
        (1 << self.shift()) - 1
    }

    fn from_boxed_bits(bits: u8) -> Option<Tag> {
        match bits {
            0b0000_0010 => Some(Tag::Sym),
            0b0000_0100 => Some(Tag::Pair),
            0b0000_0110 => Some(Tag::Closure),
            0b0000_1000 => Some(Tag::Primitive),
            _ => None,
        }
    }
}

#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Word(u64);

impl Word {
    pub const NIL: Word = Word(0);

    /// Constructs a word from a tag and an unshifted payload
    ///
    /// Payload bits that don't fit beside the tag are discarded.
    pub fn new(tag: Tag, payload: u64) -> Word {
        match tag {
            Tag::Nil => Word::NIL,
            other => Word((payload << other.shift()) | (other as u64)),
        }
    }

    /// Encodes an integer immediate
    ///
    /// Returns `None` if the integer doesn't fit in the 63 bit payload.
    pub fn int(value: i64) -> Option<Word> {
        if (INT_MIN..=INT_MAX).contains(&value) {
            Some(Word::new(Tag::Int, value as u64))
        } else {
            None
        }
    }

    /// Encodes a boxed reference to the arena slot `index`
    pub fn boxed(tag: Tag, index: u64) -> Word {
        debug_assert!(tag.shift() == BOXED_SHIFT);
        debug_assert!(index >> (64 - BOXED_SHIFT) == 0);
        Word::new(tag, index)
    }

    pub fn from_bits(bits: u64) -> Word {
        Word(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Returns the kind tag of this word
    ///
    /// Returns `None` for bit patterns that were not produced by this encoding.
    pub fn tag(self) -> Option<Tag> {
        if self.0 == 0 {
            Some(Tag::Nil)
        } else if self.is(Tag::Int) {
            Some(Tag::Int)
        } else {
            Tag::from_boxed_bits((self.0 & Tag::Sym.mask()) as u8)
        }
    }

    /// Returns true if this word carries `tag`
    pub fn is(self, tag: Tag) -> bool {
        match tag {
            Tag::Nil => self.0 == 0,
            other => (self.0 & other.mask()) == other as u64,
        }
    }

    /// Returns the payload with the tag bits shifted out
    pub fn payload(self) -> u64 {
        match self.tag() {
            Some(tag) => self.0 >> tag.shift(),
            None => self.0 >> BOXED_SHIFT,
        }
    }

    /// Decodes an integer immediate
    pub fn as_int(self) -> Option<i64> {
        if !self.is(Tag::Int) {
            return None;
        }

        let mut payload = self.0 >> INT_SHIFT;

        // Bit 62 is the sign of the 63 bit payload; replicate it in to bit 63
        if (payload >> 62) & 1 == 1 {
            payload |= 1 << 63;
        }

        Some(payload as i64)
    }

    pub fn to_bytes(self) -> [u8; WORD_SIZE] {
        self.0.to_ne_bytes()
    }

    /// Decodes a packed sequence of words as written by [`Word::to_bytes`]
    ///
    /// Any trailing partial word is ignored.
    pub fn iter_packed(bytes: &[u8]) -> impl Iterator<Item = Word> + '_ {
        bytes.chunks_exact(WORD_SIZE).map(|chunk| {
            let mut raw = [0; WORD_SIZE];
            raw.copy_from_slice(chunk);
            Word(u64::from_ne_bytes(raw))
        })
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Word({:#x})", self.0)
    }
}

impl fmt::LowerHex for Word {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, formatter)
    }
}
