use thiserror::Error;

/// Reasons an uploaded file could not be turned into a dataset.
///
/// None of these leave a trace in the process state: ingestion either
/// publishes a complete dataset or nothing at all.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("No file selected")]
    MissingFilename,

    #[error("Unsupported file type '{0}': upload a .csv or .xlsx file")]
    UnsupportedExtension(String),

    #[error("The uploaded file is empty")]
    EmptyFile,

    #[error("No columns to parse from file")]
    NoHeader,

    #[error("No worksheet found in workbook")]
    NoWorksheet,

    #[error("Line {line}: expected {expected} fields, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of the read-only aggregation queries.
///
/// The display strings are the exact `error` payloads served to clients.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("No data available")]
    NoData,

    #[error("Student not found")]
    NotFound(i64),

    #[error("No grade data available")]
    NoCategory,

    #[error("Invalid student id")]
    InvalidStudentId(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV export failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("XLSX export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Exported CSV is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
