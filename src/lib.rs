/*!
# Exam Dashboard

A small web dashboard that ingests a spreadsheet of student exam scores and
serves summary statistics and chart-ready aggregates as JSON.

## Architecture

### Ingestion & Schema Inference
- **loader**: Parses `.csv` and `.xlsx` uploads into a [`table::Table`] with
  trimmed, unique column labels
- **schema**: Locates the subject (score) columns, either between the
  `Seat Number` and `SUPW` anchors or by numeric type, and coerces them to
  numbers
- **dataset**: Runs the pipeline and holds the result as one immutable value

### Aggregation Query Layer
- **queries**: Subject performance, student lookup, top students, score
  distribution, correlation matrix, performance by grade, raw dump and
  multi-subject ranking
- **stats**: Missing-aware mean, median, extrema and Pearson correlation

### Serving Layer
- **state**: Atomically replaceable store for the current dataset
- **app**: axum routes, HTML pages and JSON error conventions
- **downloader**: CSV and XLSX export of the ingested table
- **config**: Listen address, upload limit, static directory, preload file

## REST API Endpoints

- `POST /upload` - Replace the dataset with an uploaded file
- `GET /dashboard` - HTML summary of the current dataset
- `GET /api/subject_performance` - Per-subject statistics
- `GET /api/student_performance/{id}` - One student's scores
- `GET /api/top_students` - Ten best totals
- `GET /api/subject_distribution` - Score-range histograms
- `GET /api/correlation_matrix` - Subject correlations
- `GET /api/performance_by_grade` - Subject means per `SUPW` grade
- `GET /get_data` - Full table and subject list
- `GET /export/csv`, `GET /export/xlsx` - Table download
*/

pub mod config;
pub mod dataset;
pub mod downloader;
pub mod error;
pub mod loader;
pub mod queries;
pub mod schema;
pub mod state;
pub mod stats;
pub mod table;

#[cfg(feature = "web")]
pub mod app;

pub use dataset::Dataset;
pub use error::{ExportError, IngestionError, QueryError};
pub use schema::SubjectDetection;
pub use state::DatasetStore;
pub use table::{Table, Value};
