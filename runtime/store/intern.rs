//! Symbol interning
//!
//! Every distinct name is stored once per store. Lookup is a linear scan of the symbol cache so
//! symbols can be compared by identity afterwards.

use crate::error::{Error, ErrorKind, Result};
use crate::store::{slot_index, Store};
use crate::tag::{Tag, Word};
use crate::value::{Kind, Value};

impl Store {
    /// Returns the symbol named `name`, creating it if this is the first time it's been seen
    pub fn intern(&mut self, name: &[u8]) -> Value {
        for word in Word::iter_packed(self.symbol_cache.as_slice()) {
            let index = word.payload() as usize;

            if let Some(Some(existing)) = self.symbol_names.get(index) {
                if existing.len() == name.len() && existing[..] == name[..] {
                    return Value::Sym(self.handle(index as u32));
                }
            }
        }

        let index = slot_index(self.symbol_names.len());
        self.symbol_names.push(Some(name.into()));
        self.symbol_cache
            .append(&Word::boxed(Tag::Sym, index.into()).to_bytes());

        log::trace!(
            "interned `{}` as symbol #{}",
            String::from_utf8_lossy(name),
            index
        );

        Value::Sym(self.handle(index))
    }

    /// Returns the name of a symbol
    pub fn as_sym(&self, value: Value) -> Result<&[u8]> {
        match value {
            Value::Sym(handle) => {
                let index = self.owned_index("as_sym", value, handle)?;

                match self.symbol_names.get(index) {
                    Some(Some(name)) => Ok(&name[..]),
                    _ => Err(Error::new("as_sym", ErrorKind::ForeignValue(value))),
                }
            }
            other => Err(Error::kind_mismatch("as_sym", Kind::Sym, other)),
        }
    }
}
