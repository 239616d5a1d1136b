//! Logical schema types: the closed scalar type set, column descriptors, and
//! the ordered, name-indexed `Schema`.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Utf8,
    Int64,
    Float64,
}

impl DataType {
    /// Parse a header annotation (`str`, `int`, `float`).
    pub fn parse_annotation(s: &str) -> Result<Self> {
        match s {
            "str" => Ok(DataType::Utf8),
            "int" => Ok(DataType::Int64),
            "float" => Ok(DataType::Float64),
            other => Err(Error::TypeAnnotation(other.to_string())),
        }
    }

    pub fn annotation(&self) -> &'static str {
        match self {
            DataType::Utf8 => "str",
            DataType::Int64 => "int",
            DataType::Float64 => "float",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.annotation())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DataType::parse_annotation(s)
    }
}

/// Column descriptor. Compared and hashed by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Untyped columns default to text.
    pub fn utf8(name: impl Into<String>) -> Self {
        Self::new(name, DataType::Utf8)
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.data_type)
    }

    pub fn with_type(&self, data_type: DataType) -> Self {
        Self::new(self.name.clone(), data_type)
    }
}

/// Ordered columns with unique names plus a name → position index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Field>", into = "Vec<Field>")]
pub struct Schema {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema, rejecting duplicate column names.
    pub fn new(fields: Vec<Field>) -> Result<Self> {
        let mut index = HashMap::with_capacity(fields.len());
        for (i, f) in fields.iter().enumerate() {
            if index.insert(f.name.clone(), i).is_some() {
                return Err(Error::DuplicateColumn(f.name.clone()));
            }
        }
        Ok(Self { fields, index })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of `name`, or `UnknownColumn`.
    pub fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    pub fn field_named(&self, name: &str) -> Result<&Field> {
        let idx = self.require(name)?;
        Ok(&self.fields[idx])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn types(&self) -> impl Iterator<Item = DataType> + '_ {
        self.fields.iter().map(|f| f.data_type)
    }

    /// True when both schemas hold the same (name, type) pairs in any order.
    pub fn same_column_set(&self, other: &Schema) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let ours: HashSet<&Field> = self.fields.iter().collect();
        other.fields.iter().all(|f| ours.contains(f))
    }
}

impl TryFrom<Vec<Field>> for Schema {
    type Error = Error;

    fn try_from(fields: Vec<Field>) -> Result<Self> {
        Schema::new(fields)
    }
}

impl From<Schema> for Vec<Field> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}
