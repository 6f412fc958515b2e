//! Object store
//!
//! The store owns every symbol, pair and closure it creates until [`Store::teardown`]. There is
//! no garbage collection: objects are recorded in an allocation list when they're created and the
//! whole lot is released in one pass at teardown.
//!
//! Both the symbol cache and the allocation list are [`Buffer`]s of packed [`Word`] records.

mod compare;
mod env;
mod intern;

use crate::buffer::Buffer;
use crate::error::{Error, ErrorKind, Result};
use crate::tag::{Tag, Word, WORD_SIZE};
use crate::value::{Handle, Kind, StoreId, Value};

#[derive(Clone, Copy)]
struct PairCell {
    car: Value,
    cdr: Value,
}

#[derive(Clone, Copy)]
struct ClosureCell {
    body: Value,
    env: Value,
}

/// Summary of the objects released by [`Store::teardown`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Teardown {
    pub symbols: usize,
    pub pairs: usize,
    pub closures: usize,
}

pub struct Store {
    id: StoreId,

    symbol_names: Vec<Option<Box<[u8]>>>,
    symbol_cache: Buffer,

    pairs: Vec<Option<PairCell>>,
    closures: Vec<Option<ClosureCell>>,
    allocations: Buffer,
}

fn slot_index(len: usize) -> u32 {
    u32::try_from(len).expect("store arena exhausted")
}

impl Store {
    pub fn new() -> Store {
        Store {
            id: StoreId::alloc(),

            symbol_names: vec![],
            symbol_cache: Buffer::new(),

            pairs: vec![],
            closures: vec![],
            allocations: Buffer::new(),
        }
    }

    fn handle(&self, index: u32) -> Handle {
        Handle {
            store: self.id,
            index,
        }
    }

    /// Returns the arena index for a handle issued by this store
    fn owned_index(&self, op: &'static str, value: Value, handle: Handle) -> Result<usize> {
        if handle.store == self.id {
            Ok(handle.index as usize)
        } else {
            Err(Error::new(op, ErrorKind::ForeignValue(value)))
        }
    }

    fn pair_cell(&self, op: &'static str, value: Value) -> Result<PairCell> {
        match value {
            Value::Pair(handle) => {
                let index = self.owned_index(op, value, handle)?;
                self.pairs
                    .get(index)
                    .copied()
                    .flatten()
                    .ok_or_else(|| Error::new(op, ErrorKind::ForeignValue(value)))
            }
            other => Err(Error::kind_mismatch(op, Kind::Pair, other)),
        }
    }

    fn closure_cell(&self, op: &'static str, value: Value) -> Result<ClosureCell> {
        match value {
            Value::Closure(handle) => {
                let index = self.owned_index(op, value, handle)?;
                self.closures
                    .get(index)
                    .copied()
                    .flatten()
                    .ok_or_else(|| Error::new(op, ErrorKind::ForeignValue(value)))
            }
            other => Err(Error::kind_mismatch(op, Kind::Closure, other)),
        }
    }

    fn track(&mut self, value: Value) {
        if let Some(word) = value.to_word() {
            self.allocations.append(&word.to_bytes());
        }
    }

    /// Allocates a new pair
    pub fn cons(&mut self, car: Value, cdr: Value) -> Value {
        let index = slot_index(self.pairs.len());
        self.pairs.push(Some(PairCell { car, cdr }));

        let pair = Value::Pair(self.handle(index));
        self.track(pair);
        pair
    }

    /// Allocates a new closure capturing `env`
    pub fn make_closure(&mut self, body: Value, env: Value) -> Value {
        let index = slot_index(self.closures.len());
        self.closures.push(Some(ClosureCell { body, env }));

        let closure = Value::Closure(self.handle(index));
        self.track(closure);
        closure
    }

    /// Builds a proper list with the same element order as `values`
    pub fn make_list(&mut self, values: &[Value]) -> Value {
        values
            .iter()
            .rev()
            .fold(Value::Nil, |tail, &value| self.cons(value, tail))
    }

    pub fn car(&self, value: Value) -> Result<Value> {
        self.pair_cell("car", value).map(|cell| cell.car)
    }

    pub fn cdr(&self, value: Value) -> Result<Value> {
        self.pair_cell("cdr", value).map(|cell| cell.cdr)
    }

    /// Returns the `(car, cdr)` of a pair
    pub fn as_pair(&self, value: Value) -> Result<(Value, Value)> {
        self.pair_cell("as_pair", value)
            .map(|cell| (cell.car, cell.cdr))
    }

    /// Returns the `(body, env)` of a closure
    pub fn as_closure(&self, value: Value) -> Result<(Value, Value)> {
        self.closure_cell("as_closure", value)
            .map(|cell| (cell.body, cell.env))
    }

    /// Collects the elements of a proper list
    pub fn list_elements(&self, list: Value) -> Result<Vec<Value>> {
        let mut elements = vec![];
        let mut iter = list;

        while !iter.is_nil() {
            let cell = self.pair_cell("list_elements", iter)?;
            elements.push(cell.car);
            iter = cell.cdr;
        }

        Ok(elements)
    }

    /// Returns the number of interned symbols
    pub fn symbol_count(&self) -> usize {
        self.symbol_cache.len() / WORD_SIZE
    }

    /// Returns the number of pairs and closures allocated so far
    pub fn allocation_count(&self) -> usize {
        self.allocations.len() / WORD_SIZE
    }

    /// Releases every object owned by the store
    ///
    /// Values created by this store must not be used afterwards; other stores will reject them
    /// as foreign.
    pub fn teardown(mut self) -> Teardown {
        let mut summary = Teardown::default();

        for word in Word::iter_packed(self.symbol_cache.as_slice()) {
            let released = self
                .symbol_names
                .get_mut(word.payload() as usize)
                .and_then(Option::take);

            assert!(released.is_some(), "symbol {:?} released twice", word);
            summary.symbols += 1;
        }

        for word in Word::iter_packed(self.allocations.as_slice()) {
            let index = word.payload() as usize;

            match word.tag() {
                Some(Tag::Pair) => {
                    let released = self.pairs.get_mut(index).and_then(Option::take);
                    assert!(released.is_some(), "{:?} released twice", word);
                    summary.pairs += 1;
                }
                Some(Tag::Closure) => {
                    let released = self.closures.get_mut(index).and_then(Option::take);
                    assert!(released.is_some(), "{:?} released twice", word);
                    summary.closures += 1;
                }
                other => panic!("unexpected {:?} in allocation list", other),
            }
        }

        log::debug!("store {:?} torn down: {:?}", self.id, summary);

        self.symbol_cache.delete();
        self.allocations.delete();

        summary
    }
}

impl Default for Store {
    fn default() -> Store {
        Self::new()
    }
}
