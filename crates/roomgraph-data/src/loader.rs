//! Delimited-text loader.
//!
//! Header text is never trusted: columns are named positionally from the
//! configured [`Schema`], after fully empty columns have been removed.

use crate::cell::Cell;
use crate::dataset::RawDataset;
use csv::{ReaderBuilder, StringRecord, Trim};
use roomgraph_common::{truncate_string, Result, RoomGraphError, Schema};
use roomgraph_config::SourceConfig;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Rows shown in a schema mismatch report.
const PREVIEW_ROWS: usize = 5;

/// Maximum characters per preview line.
const PREVIEW_WIDTH: usize = 160;

/// Reader options for one export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Leading metadata rows to skip before the header.
    pub skip_rows: usize,
    /// Whether the first remaining row is a header.
    pub has_header: bool,
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Whether columns empty in every data row are removed.
    pub drop_empty_columns: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            skip_rows: 0,
            has_header: true,
            delimiter: b',',
            drop_empty_columns: true,
        }
    }
}

impl LoaderOptions {
    /// Reader options of a configured source.
    pub fn from_source(source: &SourceConfig) -> Result<Self> {
        Ok(Self {
            skip_rows: source.skip_rows,
            has_header: source.has_header,
            delimiter: source.delimiter_byte()?,
            drop_empty_columns: source.drop_empty_columns,
        })
    }
}

/// Loads an export file into a [`RawDataset`] with the expected schema.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    schema: Schema,
    options: LoaderOptions,
}

impl CsvLoader {
    /// Creates a loader for the given layout.
    pub const fn new(schema: Schema, options: LoaderOptions) -> Self {
        Self { schema, options }
    }

    /// Creates a loader from the source section of the configuration.
    pub fn from_config(source: &SourceConfig) -> Result<Self> {
        Ok(Self::new(source.schema(), LoaderOptions::from_source(source)?))
    }

    /// Expected column layout.
    pub const fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Loads and types the file at `path`.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<RawDataset> {
        let file = File::open(path.as_ref())?;
        let dataset = self.load_reader(file)?;
        info!(rows = dataset.len(), columns = self.schema.len(), "Loaded export");
        Ok(dataset)
    }

    /// Loads and types delimited text from any reader.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<RawDataset> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(self.options.delimiter)
            .from_reader(reader);

        let mut records = reader.records().skip(self.options.skip_rows);
        let header = if self.options.has_header {
            records.next().transpose()?
        } else {
            None
        };
        let rows = records.collect::<std::result::Result<Vec<StringRecord>, _>>()?;

        let mut table: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(str::to_string).collect())
            .collect();
        let width = table
            .iter()
            .map(Vec::len)
            .max()
            .or_else(|| header.as_ref().map(StringRecord::len))
            .unwrap_or(0);
        for row in &mut table {
            row.resize(width, String::new());
        }

        if self.options.drop_empty_columns && !table.is_empty() {
            let empty = empty_columns(&table, width);
            if !empty.is_empty() {
                debug!(columns = ?empty, "Dropping empty columns");
                for row in &mut table {
                    let mut index = 0;
                    row.retain(|_| {
                        let keep = !empty.contains(&index);
                        index += 1;
                        keep
                    });
                }
            }
        }

        let actual = table.first().map_or(width, Vec::len);
        if actual != self.schema.len() {
            return Err(RoomGraphError::schema_mismatch(
                actual,
                self.schema.len(),
                self.preview(&table),
            ));
        }
        if table.is_empty() {
            warn!("Export contains no data rows");
        }

        let typed = table
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.schema.columns)
                    .map(|(raw, column)| Cell::parse(raw, column.kind))
                    .collect()
            })
            .collect();
        RawDataset::new(self.schema.clone(), typed)
    }

    fn preview(&self, table: &[Vec<String>]) -> String {
        let separator = char::from(self.options.delimiter).to_string();
        table
            .iter()
            .take(PREVIEW_ROWS)
            .map(|row| truncate_string(&row.join(&separator), PREVIEW_WIDTH))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn empty_columns(table: &[Vec<String>], width: usize) -> Vec<usize> {
    (0..width)
        .filter(|&col| table.iter().all(|row| row[col].trim().is_empty()))
        .collect()
}
