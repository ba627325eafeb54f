//! Tab-separated row reader
//!
//! Records are lines of tab-separated fields with no header, read with the
//! `csv` crate. A field may be wrapped in double quotes, in which case it may
//! contain tabs and `""` stands for one quote character. Blank lines are
//! skipped.

use std::fmt::Display;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::error::{GraphError, Result};
use crate::matrix::traits::Matrix;
use crate::scalar::Scalar;

/// Reads tab-separated records from any byte source
pub struct TsvReader<R> {
    reader: csv::Reader<R>,
    record: csv::StringRecord,
    line: usize,
}

impl TsvReader<File> {
    /// Opens the file at `path` for reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> TsvReader<R> {
    pub fn new(reader: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        Self {
            reader,
            record: csv::StringRecord::new(),
            line: 0,
        }
    }

    /// Line number the reader reports for the record most recently returned
    pub fn line(&self) -> usize {
        self.line
    }

    /// The next record's fields, or `None` at end of input
    pub fn read(&mut self) -> Result<Option<Vec<String>>> {
        while self.reader.read_record(&mut self.record)? {
            self.line = self.record.position().map_or(self.line + 1, |p| p.line() as usize);

            // Whitespace-only lines come through as one blank field
            if self.record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            return Ok(Some(self.record.iter().map(str::to_string).collect()));
        }
        Ok(None)
    }

    /// Every remaining record
    pub fn read_all(&mut self) -> Result<Vec<Vec<String>>> {
        let mut records = Vec::new();
        while let Some(record) = self.read()? {
            records.push(record);
        }
        Ok(records)
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> GraphError {
    GraphError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_field<V>(field: &str, what: &str, line: usize) -> Result<V>
where
    V: FromStr,
    V::Err: Display,
{
    field
        .trim()
        .parse()
        .map_err(|e| parse_error(line, format!("invalid {} {:?}: {}", what, field, e)))
}

/// Populates `m` from `row\tcol\tvalue` records through `set`.
///
/// Returns the number of records read. Later records overwrite earlier ones
/// at the same coordinate, and a zero value leaves no stored entry.
pub fn read_matrix<T, R>(reader: R, m: &mut dyn Matrix<T>) -> Result<usize>
where
    T: Scalar + FromStr,
    T::Err: Display,
    R: Read,
{
    let mut tsv = TsvReader::new(reader);
    let mut records = 0;

    while let Some(fields) = tsv.read()? {
        let line = tsv.line();
        if fields.len() != 3 {
            return Err(parse_error(
                line,
                format!("expected 3 fields (row, col, value), found {}", fields.len()),
            ));
        }

        let row: usize = parse_field(&fields[0], "row", line)?;
        let col: usize = parse_field(&fields[1], "column", line)?;
        let value: T = parse_field(&fields[2], "value", line)?;
        m.set(row, col, value)?;
        records += 1;
    }

    debug!(
        "read {} records into a {}x{} {:?} matrix ({} non-zeros)",
        records,
        m.rows(),
        m.columns(),
        m.format(),
        m.nnz()
    );
    Ok(records)
}
