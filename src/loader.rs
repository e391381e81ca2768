use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{Data, Reader, Xlsx};

use crate::error::IngestionError;
use crate::schema::normalize_labels;
use crate::table::{Table, Value};

/// Tabular formats accepted for upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Detect the format from a filename's extension (case-insensitive).
    ///
    /// # Examples
    /// ```
    /// use exam_dashboard::loader::FileFormat;
    ///
    /// assert_eq!(FileFormat::from_filename("marks.CSV").unwrap(), FileFormat::Csv);
    /// assert!(FileFormat::from_filename("marks.pdf").is_err());
    /// ```
    pub fn from_filename(filename: &str) -> Result<Self, IngestionError> {
        if filename.trim().is_empty() {
            return Err(IngestionError::MissingFilename);
        }

        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(FileFormat::Csv),
            Some("xlsx") => Ok(FileFormat::Xlsx),
            Some(ext) => Err(IngestionError::UnsupportedExtension(format!(".{ext}"))),
            None => Err(IngestionError::UnsupportedExtension(filename.to_string())),
        }
    }
}

/// Parse raw file contents into a table with normalized column labels.
///
/// # Arguments
/// * `format` - Format detected from the upload's filename
/// * `bytes` - The uploaded file contents
///
/// # Returns
/// * `Result<Table, IngestionError>` - The parsed table or the reason it could not be read
pub fn read_table(format: FileFormat, bytes: &[u8]) -> Result<Table, IngestionError> {
    if bytes.is_empty() {
        return Err(IngestionError::EmptyFile);
    }

    match format {
        FileFormat::Csv => from_csv(bytes),
        FileFormat::Xlsx => from_excel(bytes),
    }
}

/// Load a table from CSV text.
///
/// The first record is the header. Short rows are padded with missing
/// values; rows with more fields than the header are rejected.
pub fn from_csv<R: Read>(reader: R) -> Result<Table, IngestionError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = reader.records();
    let header = match records.next() {
        Some(record) => record?,
        None => return Err(IngestionError::NoHeader),
    };
    if header.iter().all(|label| label.trim().is_empty()) {
        return Err(IngestionError::NoHeader);
    }

    let mut table = Table::new(normalize_labels(header.iter()));
    let width = table.columns().len();

    for record in records {
        let record = record?;
        if record.len() > width {
            return Err(IngestionError::RaggedRow {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                expected: width,
                found: record.len(),
            });
        }
        table.push_row(record.iter().map(Value::infer).collect());
    }

    Ok(table)
}

/// Load a table from the first worksheet of an XLSX workbook.
pub fn from_excel(bytes: &[u8]) -> Result<Table, IngestionError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestionError::NoWorksheet)??;

    let mut rows = range.rows();
    let header = rows.next().ok_or(IngestionError::NoHeader)?;
    if header.iter().all(|cell| header_label(cell).trim().is_empty()) {
        return Err(IngestionError::NoHeader);
    }

    let mut table = Table::new(normalize_labels(header.iter().map(header_label)));
    for row in rows {
        table.push_row(row.iter().map(excel_value).collect());
    }

    Ok(table)
}

fn header_label(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn excel_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::String(s) => Value::infer(s),
        Data::Empty | Data::Error(_) => Value::Missing,
        other => Value::Text(other.to_string()),
    }
}

/// Read a file from disk, picking the parser from its extension.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table, IngestionError> {
    let path = path.as_ref();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let format = FileFormat::from_filename(filename)?;
    let bytes = std::fs::read(path)?;
    read_table(format, &bytes)
}
