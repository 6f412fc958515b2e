//! Environments
//!
//! An environment is an ordinary association list of `(key . value)` pairs with symbol keys.
//! Extending an environment conses a new binding on to the front; existing lists are never
//! modified so earlier holders of an environment keep seeing their original bindings.

use crate::error::{Error, Result};
use crate::store::Store;
use crate::value::{Kind, Value};

impl Store {
    /// Returns the value of the first binding for `key`
    ///
    /// Returns nil if there's no binding. This is indistinguishable from a binding to nil.
    pub fn env_find(&self, env: Value, key: Value) -> Result<Value> {
        if !key.is_sym() {
            return Err(Error::kind_mismatch("env_find", Kind::Sym, key));
        }

        let mut iter = env;
        while !iter.is_nil() {
            let binding = self.pair_cell("env_find", iter)?;
            let entry = self.pair_cell("env_find", binding.car)?;

            if entry.car == key {
                return Ok(entry.cdr);
            }

            iter = binding.cdr;
        }

        Ok(Value::Nil)
    }

    /// Returns a new environment with `key` bound to `value` in front of `env`
    pub fn env_set(&mut self, env: Value, key: Value, value: Value) -> Result<Value> {
        if !key.is_sym() {
            return Err(Error::kind_mismatch("env_set", Kind::Sym, key));
        }

        let binding = self.cons(key, value);
        Ok(self.cons(binding, env))
    }
}
