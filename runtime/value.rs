use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{Error, Result};
use crate::store::Store;
use crate::tag::{Tag, Word};

/// Native function backing a primitive
pub type PrimitiveFn = fn(&mut Store, Value) -> Result<Value>;

/// Identifies the [`Store`] that issued a handle
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StoreId(u32);

impl StoreId {
    pub(crate) fn alloc() -> StoreId {
        static NEXT_STORE_ID: AtomicU32 = AtomicU32::new(1);
        StoreId(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Reference to an arena slot owned by a [`Store`]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    pub(crate) store: StoreId,
    pub(crate) index: u32,
}

impl Handle {
    pub fn index(self) -> u32 {
        self.index
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "#{}", self.index)
    }
}

/// Function pointer wrapper with identity comparison
#[derive(Clone, Copy)]
pub struct Primitive(PrimitiveFn);

impl Primitive {
    pub fn new(function: PrimitiveFn) -> Primitive {
        Primitive(function)
    }

    pub fn function(self) -> PrimitiveFn {
        self.0
    }

    /// Returns the address of the native function
    pub fn address(self) -> usize {
        self.0 as usize
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Primitive) -> bool {
        self.address() == other.address()
    }
}

impl Eq for Primitive {}

impl Hash for Primitive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{:#x}", self.address())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Kind {
    Nil,
    Int,
    Sym,
    Pair,
    Closure,
    Primitive,
}

impl Kind {
    pub fn description(self) -> &'static str {
        match self {
            Kind::Nil => "nil",
            Kind::Int => "integer",
            Kind::Sym => "symbol",
            Kind::Pair => "pair",
            Kind::Closure => "closure",
            Kind::Primitive => "primitive",
        }
    }

    pub fn tag(self) -> Tag {
        match self {
            Kind::Nil => Tag::Nil,
            Kind::Int => Tag::Int,
            Kind::Sym => Tag::Sym,
            Kind::Pair => Tag::Pair,
            Kind::Closure => Tag::Closure,
            Kind::Primitive => Tag::Primitive,
        }
    }
}

/// Runtime value
///
/// Nil and integers are immediates. Symbols, pairs and closures are handles in to the [`Store`]
/// that created them. `==` is identity: two pairs are only equal if they're the same pair. Use
/// [`Store::equal`] for structural equality.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    Nil,
    Int(i64),
    Sym(Handle),
    Pair(Handle),
    Closure(Handle),
    Primitive(Primitive),
}

impl Value {
    pub fn primitive(function: PrimitiveFn) -> Value {
        Value::Primitive(Primitive::new(function))
    }

    pub fn kind(self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Int(_) => Kind::Int,
            Value::Sym(_) => Kind::Sym,
            Value::Pair(_) => Kind::Pair,
            Value::Closure(_) => Kind::Closure,
            Value::Primitive(_) => Kind::Primitive,
        }
    }

    pub fn is_nil(self) -> bool {
        self == Value::Nil
    }

    pub fn is_int(self) -> bool {
        matches!(self, Value::Int(_))
    }

    pub fn is_sym(self) -> bool {
        matches!(self, Value::Sym(_))
    }

    pub fn is_pair(self) -> bool {
        matches!(self, Value::Pair(_))
    }

    pub fn is_closure(self) -> bool {
        matches!(self, Value::Closure(_))
    }

    pub fn is_primitive(self) -> bool {
        matches!(self, Value::Primitive(_))
    }

    pub fn as_int(self) -> Result<i64> {
        match self {
            Value::Int(i) => Ok(i),
            other => Err(Error::kind_mismatch("as_int", Kind::Int, other)),
        }
    }

    pub fn as_primitive(self) -> Result<PrimitiveFn> {
        match self {
            Value::Primitive(primitive) => Ok(primitive.function()),
            other => Err(Error::kind_mismatch("as_primitive", Kind::Primitive, other)),
        }
    }

    /// Encodes this value as a single tagged word
    ///
    /// Returns `None` for integers outside the 63 bit immediate range and for primitives whose
    /// address doesn't fit beside the boxed tag.
    pub fn to_word(self) -> Option<Word> {
        match self {
            Value::Nil => Some(Word::NIL),
            Value::Int(i) => Word::int(i),
            Value::Sym(handle) | Value::Pair(handle) | Value::Closure(handle) => {
                Some(Word::boxed(self.kind().tag(), handle.index.into()))
            }
            Value::Primitive(primitive) => {
                let address = primitive.address() as u64;
                if address >> (64 - crate::tag::BOXED_SHIFT) == 0 {
                    Some(Word::boxed(Tag::Primitive, address))
                } else {
                    None
                }
            }
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Int(i)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(formatter, "Nil"),
            Value::Int(i) => write!(formatter, "Int({})", i),
            Value::Sym(handle) => write!(formatter, "Sym({:?})", handle),
            Value::Pair(handle) => write!(formatter, "Pair({:?})", handle),
            Value::Closure(handle) => write!(formatter, "Closure({:?})", handle),
            Value::Primitive(primitive) => write!(formatter, "Primitive({:?})", primitive),
        }
    }
}
