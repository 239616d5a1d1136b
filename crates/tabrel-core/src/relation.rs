//! The tuple-source contract every operator consumes and produces.
//!
//! A `Relation` is a schema plus a pull-based cursor over conforming tuples.
//! Sources are either single-pass (the cursor can be drained once; further
//! pulls yield `None`) or restartable (`restart` rewinds and the same
//! sequence is reproduced). Operators report `Pass::Single`: only explicit
//! materialization into a `Table` gains restartability.
//!
//! Operators take their inputs by value, so handing one single-pass source to
//! two pipelines requires an explicit `&mut` borrow. In that case the second
//! consumer sees whatever the first left behind, which is nothing once the
//! first has drained it.

use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::types::Tuple;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Single,
    Restartable,
}

pub trait Relation {
    fn schema(&self) -> &Schema;

    /// Produce the next tuple, `Ok(None)` once exhausted.
    fn next_tuple(&mut self) -> Result<Option<Tuple>>;

    fn pass(&self) -> Pass {
        Pass::Single
    }

    /// Rewind to the first tuple. Only restartable sources succeed.
    fn restart(&mut self) -> Result<()> {
        Err(Error::NotRestartable)
    }

    /// Iterator adapter over the remaining tuples.
    fn tuples(self) -> Tuples<Self>
    where
        Self: Sized,
    {
        Tuples {
            inner: self,
            failed: false,
        }
    }

    fn by_ref(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self
    }
}

impl<R: Relation + ?Sized> Relation for &mut R {
    fn schema(&self) -> &Schema {
        (**self).schema()
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        (**self).next_tuple()
    }

    fn pass(&self) -> Pass {
        (**self).pass()
    }

    fn restart(&mut self) -> Result<()> {
        (**self).restart()
    }
}

impl<R: Relation + ?Sized> Relation for Box<R> {
    fn schema(&self) -> &Schema {
        (**self).schema()
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        (**self).next_tuple()
    }

    fn pass(&self) -> Pass {
        (**self).pass()
    }

    fn restart(&mut self) -> Result<()> {
        (**self).restart()
    }
}

/// Iterator over a relation's tuples. Stops after the first error.
pub struct Tuples<R> {
    inner: R,
    failed: bool,
}

impl<R> Tuples<R> {
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Relation> Iterator for Tuples<R> {
    type Item = Result<Tuple>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.inner.next_tuple() {
            Ok(Some(t)) => Some(Ok(t)),
            Ok(None) => None,
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Schema equality conjoined with ordered tuple-sequence equality. Drains both.
pub fn equal<A: Relation, B: Relation>(mut a: A, mut b: B) -> Result<bool> {
    if a.schema() != b.schema() {
        return Ok(false);
    }
    loop {
        match (a.next_tuple()?, b.next_tuple()?) {
            (None, None) => return Ok(true),
            (Some(x), Some(y)) if x == y => continue,
            _ => return Ok(false),
        }
    }
}

/// Number of remaining tuples. Drains the relation.
pub fn count<R: Relation>(mut r: R) -> Result<usize> {
    let mut n = 0;
    while r.next_tuple()?.is_some() {
        n += 1;
    }
    Ok(n)
}
