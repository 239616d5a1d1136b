//! CSV reader: the first record is the header, every later record one tuple.
//!
//! Untyped headers make every column `str`. Typed headers annotate each column
//! as `name<type_delimiter>type`, e.g. `Age:int`, and each field is parsed
//! into its column's type as it is pulled.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tabrel_core::config::IoConfig;
use tabrel_core::prelude::{DataType, Field, Relation, Schema, Tuple};

use crate::error::{Error, Result};

pub struct CsvReader<R: Read> {
    reader: ::csv::Reader<R>,
    record: ::csv::StringRecord,
    schema: Schema,
    done: bool,
}

impl CsvReader<File> {
    pub fn open(path: impl AsRef<Path>, cfg: &IoConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        tracing::trace!(path = %path.display(), typed = cfg.typed, "opened csv source");
        Self::from_reader_named(file, cfg, &path.display().to_string())
    }
}

impl<R: Read> CsvReader<R> {
    pub fn from_reader(reader: R, cfg: &IoConfig) -> Result<Self> {
        Self::from_reader_named(reader, cfg, "input")
    }

    fn from_reader_named(reader: R, cfg: &IoConfig, name: &str) -> Result<Self> {
        cfg.validate()?;
        let mut reader = ::csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(cfg.delimiter as u8)
            .from_reader(reader);

        let mut header = ::csv::StringRecord::new();
        if !reader.read_record(&mut header)? {
            return Err(Error::MissingHeader(name.to_string()));
        }
        let fields = header
            .iter()
            .map(|cell| parse_header_cell(cell, cfg))
            .collect::<tabrel_core::Result<Vec<_>>>()?;
        let schema = Schema::new(fields)?;

        Ok(Self {
            reader,
            record: ::csv::StringRecord::new(),
            schema,
            done: false,
        })
    }
}

fn parse_header_cell(cell: &str, cfg: &IoConfig) -> tabrel_core::Result<Field> {
    if !cfg.typed {
        return Ok(Field::utf8(cell));
    }
    let (name, annotation) = cell
        .rsplit_once(cfg.type_delimiter)
        .ok_or_else(|| tabrel_core::Error::TypeAnnotation(cell.to_string()))?;
    Ok(Field::new(name, DataType::parse_annotation(annotation)?))
}

impl<R: Read> Relation for CsvReader<R> {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn next_tuple(&mut self) -> tabrel_core::Result<Option<Tuple>> {
        if self.done {
            return Ok(None);
        }
        if !self
            .reader
            .read_record(&mut self.record)
            .map_err(std::io::Error::from)?
        {
            self.done = true;
            return Ok(None);
        }
        if self.record.len() != self.schema.len() {
            return Err(tabrel_core::Error::RowLength {
                expected: self.schema.len(),
                found: self.record.len(),
            });
        }
        self.record
            .iter()
            .zip(self.schema.fields())
            .map(|(text, field)| field.data_type.parse_text(text))
            .collect::<tabrel_core::Result<Tuple>>()
            .map(Some)
    }
}
