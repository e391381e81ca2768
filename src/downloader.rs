use rust_xlsxwriter::Workbook;

use crate::dataset::Dataset;
use crate::error::ExportError;
use crate::table::Value;

/// Convert the ingested table to CSV.
///
/// The first line holds the column labels; every following line is one row
/// in input order. Missing cells are written as empty fields and the `csv`
/// writer takes care of quoting.
///
/// # Arguments
/// * `dataset` - The dataset whose table is exported
///
/// # Returns
/// * `Result<String, ExportError>` - CSV content as a string or an error
///
/// # Examples
/// ```
/// use exam_dashboard::dataset::Dataset;
/// use exam_dashboard::downloader::to_csv;
///
/// let dataset = Dataset::ingest("marks.csv", b"Name,Math\nAsha,95\n").unwrap();
/// assert_eq!(to_csv(&dataset).unwrap(), "Name,Math\nAsha,95\n");
/// ```
pub fn to_csv(dataset: &Dataset) -> Result<String, ExportError> {
    let table = dataset.table();
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(Value::to_export_string))?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Convert the ingested table to an XLSX workbook with a single worksheet.
///
/// Numbers stay numeric, text is written as strings and missing cells are
/// left blank.
///
/// # Arguments
/// * `dataset` - The dataset whose table is exported
///
/// # Returns
/// * `Result<Vec<u8>, ExportError>` - XLSX file content as bytes or an error
pub fn to_xlsx(dataset: &Dataset) -> Result<Vec<u8>, ExportError> {
    let table = dataset.table();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (c, label) in table.columns().iter().enumerate() {
        worksheet.write_string(0, c as u16, label)?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let r = (r + 1) as u32;
        for (c, value) in row.iter().enumerate() {
            match value {
                Value::Number(n) if n.is_finite() => {
                    worksheet.write_number(r, c as u16, *n)?;
                }
                Value::Text(s) => {
                    worksheet.write_string(r, c as u16, s)?;
                }
                _ => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Download filename stamped with the export time, e.g. `scores-20250101-120000.csv`.
pub fn export_filename(extension: &str) -> String {
    format!(
        "scores-{}.{}",
        chrono::Local::now().format("%Y%m%d-%H%M%S"),
        extension
    )
}
