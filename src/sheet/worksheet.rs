//! A single CSV-encoded worksheet with a fixed header row.

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};

use crate::Error;

/// A worksheet stored as one CSV file.
///
/// The first record is always the header. Rows are addressed by their
/// zero-based position below the header, the same positions returned by
/// [Worksheet::read_rows]. Rows may be shorter than the header when a
/// trailing column was introduced after the row was written; readers must
/// treat missing trailing cells as empty.
#[derive(Debug)]
pub struct Worksheet {
    path: PathBuf,
    header: &'static [&'static str],
}

impl Worksheet {
    /// Open the worksheet at `path`, creating the file with its header row
    /// if it does not exist yet.
    ///
    /// # Errors
    /// Returns [Error::Connection] if the file cannot be created, since
    /// this only runs while a workbook is being opened.
    pub(crate) fn open(path: PathBuf, header: &'static [&'static str]) -> Result<Self, Error> {
        if !path.exists() {
            let mut writer = csv::Writer::from_path(&path).map_err(|error| {
                Error::Connection(format!(
                    "could not create worksheet {}: {error}",
                    path.display()
                ))
            })?;

            writer.write_record(header).map_err(|error| {
                Error::Connection(format!(
                    "could not write worksheet header {}: {error}",
                    path.display()
                ))
            })?;
            writer.flush().map_err(|error| {
                Error::Connection(format!(
                    "could not write worksheet header {}: {error}",
                    path.display()
                ))
            })?;
        }

        Ok(Self { path, header })
    }

    /// The header row this worksheet was opened with.
    pub fn header(&self) -> &'static [&'static str] {
        self.header
    }

    /// Read every row below the header as raw string cells.
    ///
    /// Row positions in the returned vector are the positions expected by
    /// [Worksheet::overwrite_row] and [Worksheet::delete_row].
    ///
    /// # Errors
    /// Returns [Error::Sheet] if the file cannot be read or is not valid
    /// CSV.
    pub fn read_rows(&self) -> Result<Vec<Vec<String>>, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|error| self.operation_error("read", error))?;

        let mut rows = Vec::new();

        for record in reader.records() {
            let record = record.map_err(|error| self.operation_error("read", error))?;
            rows.push(record.iter().map(str::to_owned).collect());
        }

        Ok(rows)
    }

    /// Append one row at the end of the worksheet.
    ///
    /// # Errors
    /// Returns [Error::Sheet] if the row cannot be written.
    pub fn append_row(&self, row: &[String]) -> Result<(), Error> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|error| self.operation_error("append", error))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer
            .write_record(row)
            .map_err(|error| self.operation_error("append", error))?;
        writer
            .flush()
            .map_err(|error| self.operation_error("append", error))?;

        Ok(())
    }

    /// Overwrite the row at `index` with new cells.
    ///
    /// # Errors
    /// Returns [Error::Sheet] if `index` is out of range or the file cannot
    /// be rewritten.
    pub fn overwrite_row(&self, index: usize, row: &[String]) -> Result<(), Error> {
        let mut rows = self.read_rows()?;

        let target = rows.get_mut(index).ok_or_else(|| {
            Error::Sheet(format!(
                "row {index} is out of range for {}",
                self.path.display()
            ))
        })?;
        *target = row.to_vec();

        self.write_all(&rows)
    }

    /// Remove the row at `index`, shifting later rows up by one.
    ///
    /// # Errors
    /// Returns [Error::Sheet] if `index` is out of range or the file cannot
    /// be rewritten.
    pub fn delete_row(&self, index: usize) -> Result<(), Error> {
        let mut rows = self.read_rows()?;

        if index >= rows.len() {
            return Err(Error::Sheet(format!(
                "row {index} is out of range for {}",
                self.path.display()
            )));
        }
        rows.remove(index);

        self.write_all(&rows)
    }

    /// Rewrite the whole file: header first, then `rows` in order.
    fn write_all(&self, rows: &[Vec<String>]) -> Result<(), Error> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|error| self.operation_error("write", error))?;

        writer
            .write_record(self.header)
            .map_err(|error| self.operation_error("write", error))?;

        for row in rows {
            writer
                .write_record(row)
                .map_err(|error| self.operation_error("write", error))?;
        }

        writer
            .flush()
            .map_err(|error| self.operation_error("write", error))?;

        Ok(())
    }

    fn operation_error(&self, operation: &str, error: impl std::fmt::Display) -> Error {
        Error::Sheet(format!(
            "could not {operation} {}: {error}",
            self.path.display()
        ))
    }
}
