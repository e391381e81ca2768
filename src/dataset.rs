use std::path::Path;

use log::info;

use crate::error::IngestionError;
use crate::loader::{self, FileFormat};
use crate::schema::{self, SubjectDetection};
use crate::table::Table;

/// An ingested table together with the columns that hold scores.
///
/// Built in one go by [`Dataset::ingest`] and never modified afterwards;
/// a new upload produces a new `Dataset`.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    table: Table,
    subjects: Vec<String>,
    detection: SubjectDetection,
}

impl Dataset {
    /// Run the full ingestion pipeline over an uploaded file.
    pub fn ingest(filename: &str, bytes: &[u8]) -> Result<Self, IngestionError> {
        let format = FileFormat::from_filename(filename)?;
        let table = loader::read_table(format, bytes)?;
        let dataset = Dataset::from_table(table);

        info!(
            "Ingested {}: {} rows, {} subjects ({})",
            filename,
            dataset.table.len(),
            dataset.subjects.len(),
            dataset.detection.describe()
        );
        Ok(dataset)
    }

    /// Ingest a file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IngestionError> {
        let path = path.as_ref();
        let table = loader::load_table(path)?;
        let dataset = Dataset::from_table(table);

        info!(
            "Loaded {}: {} rows, {} subjects ({})",
            path.display(),
            dataset.table.len(),
            dataset.subjects.len(),
            dataset.detection.describe()
        );
        Ok(dataset)
    }

    /// Detect subject columns on an already parsed table and coerce them to numbers.
    pub fn from_table(mut table: Table) -> Self {
        let (detection, subjects) = schema::detect_subjects(&table);
        schema::coerce_subjects(&mut table, &subjects);
        Dataset {
            table,
            subjects,
            detection,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn detection(&self) -> &SubjectDetection {
        &self.detection
    }

    /// Column indices of the subjects, in subject order.
    pub(crate) fn subject_indices(&self) -> Vec<usize> {
        self.subjects
            .iter()
            .filter_map(|s| self.table.column_index(s))
            .collect()
    }
}
