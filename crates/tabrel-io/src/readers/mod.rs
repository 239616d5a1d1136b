//! Readers that expose delimited text as a `Relation`.

pub mod csv;
