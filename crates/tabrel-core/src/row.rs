//! `RowView`: the read-only handle caller closures receive for one tuple.
//!
//! A view borrows both the tuple and the schema used to resolve names, so it
//! cannot outlive the pull that produced it.

use crate::error::{Error, Result};
use crate::schema::{DataType, Schema};
use crate::types::Scalar;

#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    schema: &'a Schema,
    values: &'a [Scalar],
}

impl<'a> RowView<'a> {
    pub fn new(schema: &'a Schema, values: &'a [Scalar]) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn values(&self) -> &'a [Scalar] {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Field by column name.
    pub fn get(&self, name: &str) -> Result<&'a Scalar> {
        let idx = self.schema.require(name)?;
        Ok(&self.values[idx])
    }

    /// Field by position.
    pub fn at(&self, idx: usize) -> Option<&'a Scalar> {
        self.values.get(idx)
    }

    pub fn i64(&self, name: &str) -> Result<i64> {
        let v = self.get(name)?;
        v.as_i64()
            .ok_or_else(|| Error::type_mismatch(name, DataType::Int64, v.type_name()))
    }

    /// Numeric field as a real; integer columns are widened.
    pub fn f64(&self, name: &str) -> Result<f64> {
        let v = self.get(name)?;
        v.as_f64()
            .ok_or_else(|| Error::type_mismatch(name, DataType::Float64, v.type_name()))
    }

    pub fn str(&self, name: &str) -> Result<&'a str> {
        let v = self.get(name)?;
        v.as_str()
            .ok_or_else(|| Error::type_mismatch(name, DataType::Utf8, v.type_name()))
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Scalar> {
        self.values.iter()
    }
}

impl<'a> IntoIterator for RowView<'a> {
    type Item = &'a Scalar;
    type IntoIter = std::slice::Iter<'a, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
