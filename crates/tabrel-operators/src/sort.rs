//! Sort facade over `Table::sort`.
//!
//! `sorted` copies and sorts eagerly; `Sort` does the same on its first pull
//! so it can sit inside a lazily built pipeline.

use serde::{Deserialize, Serialize};
use tabrel_core::prelude::*;

/// Ordered key columns (whole tuples when `by` is `None`) plus direction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(default)]
    pub by: Option<Vec<String>>,
    #[serde(default)]
    pub reverse: bool,
}

impl SortSpec {
    pub fn by<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            by: Some(keys.into_iter().map(Into::into).collect()),
            reverse: false,
        }
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = !self.reverse;
        self
    }

    fn check(&self, schema: &Schema) -> Result<()> {
        for key in self.by.iter().flatten() {
            schema.require(key)?;
        }
        Ok(())
    }

    fn apply(&self, table: &mut Table) -> Result<()> {
        let keys: Option<Vec<&str>> = self
            .by
            .as_ref()
            .map(|ks| ks.iter().map(String::as_str).collect());
        table.sort(keys.as_deref(), self.reverse)
    }
}

/// Materialize `input` and sort the copy.
pub fn sorted<R: Relation>(input: R, spec: &SortSpec) -> Result<Table> {
    spec.check(input.schema())?;
    let mut table = Table::materialize(input)?;
    spec.apply(&mut table)?;
    Ok(table)
}

pub struct Sort<R> {
    input: Option<R>,
    schema: Schema,
    spec: SortSpec,
    sorted: Option<Table>,
}

impl<R: Relation> Sort<R> {
    pub fn new(input: R, spec: SortSpec) -> Result<Self> {
        spec.check(input.schema())?;
        let schema = input.schema().clone();
        Ok(Self {
            input: Some(input),
            schema,
            spec,
            sorted: None,
        })
    }
}

impl<R: Relation> Relation for Sort<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        if let Some(input) = self.input.take() {
            self.sorted = Some(sorted(input, &self.spec)?);
        }
        match self.sorted.as_mut() {
            Some(table) => table.next_tuple(),
            None => Ok(None),
        }
    }
}
