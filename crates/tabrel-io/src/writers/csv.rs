//! CSV writer: one header record, then one record per tuple in canonical
//! text form.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tabrel_core::config::IoConfig;
use tabrel_core::prelude::{Relation, Scalar, Schema};

use crate::error::Result;

pub struct CsvWriter<W: Write> {
    writer: ::csv::Writer<W>,
    typed: bool,
    type_delimiter: char,
}

impl CsvWriter<File> {
    pub fn to_path(path: impl AsRef<Path>, cfg: &IoConfig) -> Result<Self> {
        let f = File::create(path)?;
        Self::to_writer(f, cfg)
    }
}

impl<W: Write> CsvWriter<W> {
    pub fn to_writer(writer: W, cfg: &IoConfig) -> Result<Self> {
        cfg.validate()?;
        let writer = ::csv::WriterBuilder::new()
            .has_headers(false)
            .delimiter(cfg.delimiter as u8)
            .from_writer(writer);
        Ok(Self {
            writer,
            typed: cfg.typed,
            type_delimiter: cfg.type_delimiter,
        })
    }

    pub fn write_header(&mut self, schema: &Schema) -> Result<()> {
        if self.typed {
            let cells = schema
                .fields()
                .iter()
                .map(|f| format!("{}{}{}", f.name, self.type_delimiter, f.data_type));
            self.writer.write_record(cells)?;
        } else {
            self.writer.write_record(schema.names())?;
        }
        Ok(())
    }

    pub fn write_tuple(&mut self, tuple: &[Scalar]) -> Result<()> {
        self.writer
            .write_record(tuple.iter().map(|v| v.to_string()))?;
        Ok(())
    }

    /// Header plus every tuple of `relation`. Returns the tuple count.
    pub fn write_relation<R: Relation>(&mut self, relation: R) -> Result<usize> {
        self.write_header(relation.schema())?;
        self.write_rows(relation)
    }

    /// Every tuple of `relation`, no header.
    pub fn write_rows<R: Relation>(&mut self, mut relation: R) -> Result<usize> {
        let mut n = 0;
        while let Some(t) = relation.next_tuple()? {
            self.write_tuple(&t)?;
            n += 1;
        }
        tracing::debug!(rows = n, "wrote csv rows");
        Ok(n)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}
