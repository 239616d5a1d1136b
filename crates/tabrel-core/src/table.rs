//! In-memory, restartable relations.
//!
//! `Table::materialize` drains any relation into an owned tuple list. A table
//! can be iterated any number of times, either through its own cursor
//! (`Relation` impl + `restart`) or through independent borrowing `scan`s, and
//! its rows can be reordered in place with a stable `sort`.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::relation::{Pass, Relation};
use crate::schema::Schema;
use crate::types::{compare_tuples, Tuple};

#[derive(Debug, Clone)]
pub struct Table {
    schema: Schema,
    rows: Vec<Tuple>,
    cursor: usize,
}

impl Table {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            cursor: 0,
        }
    }

    /// Build a table from literal rows, checking arity and column types.
    pub fn try_new(schema: Schema, rows: Vec<Tuple>) -> Result<Self> {
        let mut table = Self::new(schema);
        table.rows.reserve(rows.len());
        for row in rows {
            table.push(row)?;
        }
        Ok(table)
    }

    /// Eagerly drain `input` into memory.
    pub fn materialize<R: Relation>(mut input: R) -> Result<Self> {
        let pass = input.pass();
        if pass == Pass::Restartable {
            tracing::trace!("copying an input that is already restartable");
        }
        let schema = input.schema().clone();
        let mut rows = Vec::new();
        while let Some(t) = input.next_tuple()? {
            rows.push(t);
        }
        tracing::debug!(
            rows = rows.len(),
            columns = schema.len(),
            input = ?pass,
            "materialized relation"
        );
        Ok(Self {
            schema,
            rows,
            cursor: 0,
        })
    }

    pub fn push(&mut self, row: Tuple) -> Result<()> {
        if row.len() != self.schema.len() {
            return Err(Error::RowLength {
                expected: self.schema.len(),
                found: row.len(),
            });
        }
        let row = row
            .into_iter()
            .zip(self.schema.fields())
            .map(|(v, f)| f.data_type.coerce(&f.name, v))
            .collect::<Result<Tuple>>()?;
        self.rows.push(row);
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Tuple] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Tuple> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Independent iteration over the stored rows.
    pub fn scan(&self) -> TableScan<'_> {
        TableScan {
            table: self,
            pos: 0,
        }
    }

    /// Stable sort by the named key columns, or by whole tuples when `keys` is
    /// `None`. `reverse` flips the comparison, so rows with equal keys keep
    /// their relative order in both directions.
    pub fn sort(&mut self, keys: Option<&[&str]>, reverse: bool) -> Result<()> {
        let key_indices = keys
            .map(|ks| {
                ks.iter()
                    .map(|k| self.schema.require(k))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        let cmp = |a: &Tuple, b: &Tuple| -> Ordering {
            let Some(key_indices) = &key_indices else {
                return compare_tuples(a, b);
            };
            for &i in key_indices {
                match a[i].total_cmp(&b[i]) {
                    Ordering::Equal => continue,
                    other => return other,
                }
            }
            Ordering::Equal
        };

        if reverse {
            self.rows.sort_by(|a, b| cmp(b, a));
        } else {
            self.rows.sort_by(cmp);
        }
        tracing::debug!(rows = self.rows.len(), ?keys, reverse, "sorted table");
        Ok(())
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.rows == other.rows
    }
}

impl Relation for Table {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        let row = self.rows.get(self.cursor).cloned();
        if row.is_some() {
            self.cursor += 1;
        }
        Ok(row)
    }

    fn pass(&self) -> Pass {
        Pass::Restartable
    }

    fn restart(&mut self) -> Result<()> {
        self.cursor = 0;
        Ok(())
    }
}

/// Borrowing cursor over a `Table`.
#[derive(Debug, Clone)]
pub struct TableScan<'a> {
    table: &'a Table,
    pos: usize,
}

impl Relation for TableScan<'_> {
    fn schema(&self) -> &Schema {
        &self.table.schema
    }

    fn next_tuple(&mut self) -> Result<Option<Tuple>> {
        let row = self.table.rows.get(self.pos).cloned();
        if row.is_some() {
            self.pos += 1;
        }
        Ok(row)
    }

    fn pass(&self) -> Pass {
        Pass::Restartable
    }

    fn restart(&mut self) -> Result<()> {
        self.pos = 0;
        Ok(())
    }
}
