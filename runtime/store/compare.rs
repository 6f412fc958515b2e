//! Structural equality, shallow copies and deep clones

use crate::error::Result;
use crate::store::Store;
use crate::value::Value;

impl Store {
    /// Compares two values structurally
    ///
    /// Integers and symbols compare by identity; pairs compare their `car` and `cdr` recursively.
    /// Closures and primitives are never equal to anything, including themselves. Cyclic pair
    /// structures do not terminate.
    pub fn equal(&self, a: Value, b: Value) -> Result<bool> {
        let (mut a, mut b) = (a, b);

        // Recurse on the cars but walk the cdr chain in place
        loop {
            match (a, b) {
                (Value::Nil, Value::Nil) => return Ok(true),
                (Value::Int(_), Value::Int(_)) | (Value::Sym(_), Value::Sym(_)) => {
                    return Ok(a == b)
                }
                (Value::Pair(_), Value::Pair(_)) => {
                    if a == b {
                        return Ok(true);
                    }

                    let a_cell = self.pair_cell("equal", a)?;
                    let b_cell = self.pair_cell("equal", b)?;

                    if !self.equal(a_cell.car, b_cell.car)? {
                        return Ok(false);
                    }

                    a = a_cell.cdr;
                    b = b_cell.cdr;
                }
                _ => return Ok(false),
            }
        }
    }

    /// Returns a new container sharing the contents of `value`
    ///
    /// Pairs and closures get a fresh cell pointing at the same `car`/`cdr` or `body`/`env`.
    /// Immediates, symbols and primitives are returned as-is.
    pub fn copy(&mut self, value: Value) -> Result<Value> {
        match value {
            Value::Pair(_) => {
                let cell = self.pair_cell("copy", value)?;
                Ok(self.cons(cell.car, cell.cdr))
            }
            Value::Closure(_) => self.copy_closure("copy", value),
            Value::Nil | Value::Int(_) | Value::Sym(_) | Value::Primitive(_) => Ok(value),
        }
    }

    /// Recursively duplicates every pair reachable through `car`/`cdr`
    ///
    /// A closure gets a fresh cell but keeps the same body and captured environment.
    pub fn deep_clone(&mut self, value: Value) -> Result<Value> {
        match value {
            Value::Pair(_) => {
                let mut cars = vec![];
                let mut tail = value;

                while tail.is_pair() {
                    let cell = self.pair_cell("deep_clone", tail)?;
                    cars.push(self.deep_clone(cell.car)?);
                    tail = cell.cdr;
                }

                // An improper tail is kept after the cloned elements
                let tail = self.deep_clone(tail)?;
                Ok(cars
                    .iter()
                    .rev()
                    .fold(tail, |rest, &car| self.cons(car, rest)))
            }
            Value::Closure(_) => self.copy_closure("deep_clone", value),
            Value::Nil | Value::Int(_) | Value::Sym(_) | Value::Primitive(_) => Ok(value),
        }
    }

    fn copy_closure(&mut self, op: &'static str, value: Value) -> Result<Value> {
        let cell = self.closure_cell(op, value)?;
        Ok(self.make_closure(cell.body, cell.env))
    }
}
