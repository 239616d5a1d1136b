#![forbid(unsafe_code)]
//! tabrel-io: delimited-text sources and sinks for tabrel relations.
//!
//! `CsvReader` is a single-pass `Relation` that owns its file handle; the
//! writers drain any relation into CSV or JSON lines.

pub mod error;
pub mod readers;
pub mod writers;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tabrel_core::config::IoConfig;
use tabrel_core::relation::Relation;
use tabrel_core::table::Table;

pub use error::{Error, Result};
pub use readers::csv::CsvReader;
pub use writers::csv::CsvWriter;
pub use writers::jsonl::JsonlWriter;

/// Open `path` as a lazy, single-pass relation.
pub fn stream(path: impl AsRef<Path>, cfg: &IoConfig) -> Result<CsvReader<File>> {
    CsvReader::open(path, cfg)
}

/// Open `path` and materialize it into a restartable table.
pub fn load(path: impl AsRef<Path>, cfg: &IoConfig) -> Result<Table> {
    Ok(Table::materialize(stream(path, cfg)?)?)
}

/// Drain `relation` into `writer` as CSV. Returns the number of tuples written.
pub fn write<R: Relation, W: Write>(relation: R, writer: W, cfg: &IoConfig) -> Result<usize> {
    let mut out = CsvWriter::to_writer(writer, cfg)?;
    let n = out.write_relation(relation)?;
    out.flush()?;
    Ok(n)
}
