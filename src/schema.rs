use std::collections::HashMap;

use crate::table::{Table, Value};

/// Label of the column that opens the block of subject columns.
pub const SEAT_NUMBER: &str = "Seat Number";
/// Label of the column that closes the block of subject columns. Also the
/// category used by the grade breakdown.
pub const SUPW: &str = "SUPW";

/// How the subject columns of a table were located.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubjectDetection {
    /// Both anchors exist; subjects are the columns strictly between them.
    Anchored { start: usize, end: usize },
    /// Anchors missing; subjects are the columns that already hold numbers.
    NumericFallback,
    /// Neither rule produced a single column.
    Empty,
}

impl SubjectDetection {
    pub fn describe(&self) -> &'static str {
        match self {
            SubjectDetection::Anchored { .. } => "anchored",
            SubjectDetection::NumericFallback => "numeric fallback",
            SubjectDetection::Empty => "empty",
        }
    }
}

/// Clean raw header cells into unique column labels.
///
/// Labels are trimmed (a leading byte-order mark counts as whitespace here),
/// blank labels become `Unnamed: {index}` and repeated labels get a `.{n}`
/// suffix in order of appearance.
pub fn normalize_labels<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut labels = Vec::new();

    for (idx, label) in raw.into_iter().enumerate() {
        let trimmed = label.as_ref().trim_start_matches('\u{feff}').trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {idx}")
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{base}.{count}");
        }
        seen.insert(candidate.clone(), 0);
        labels.push(candidate);
    }

    labels
}

/// Locate the subject columns of a table.
///
/// Returns the detection outcome together with the subject labels in column
/// order.
pub fn detect_subjects(table: &Table) -> (SubjectDetection, Vec<String>) {
    let columns = table.columns();

    if let (Some(seat), Some(supw)) = (table.column_index(SEAT_NUMBER), table.column_index(SUPW)) {
        let start = seat + 1;
        let subjects = if start < supw {
            columns[start..supw].to_vec()
        } else {
            Vec::new()
        };
        return (SubjectDetection::Anchored { start, end: supw }, subjects);
    }

    let subjects: Vec<String> = (0..columns.len())
        .filter(|&col| is_numeric_column(table, col))
        .map(|col| columns[col].clone())
        .collect();

    if subjects.is_empty() {
        (SubjectDetection::Empty, subjects)
    } else {
        (SubjectDetection::NumericFallback, subjects)
    }
}

/// A column is numeric when it holds at least one number and nothing but
/// numbers or missing values.
fn is_numeric_column(table: &Table, col: usize) -> bool {
    let mut any_number = false;
    for row in table.rows() {
        match &row[col] {
            Value::Number(_) => any_number = true,
            Value::Missing => {}
            Value::Text(_) => return false,
        }
    }
    any_number
}

/// Convert every subject column to numbers or missing markers.
///
/// Unparseable cells become [`Value::Missing`]; no row is ever dropped.
pub fn coerce_subjects(table: &mut Table, subjects: &[String]) {
    for subject in subjects {
        if let Some(col) = table.column_index(subject) {
            table.map_column(col, Value::coerce_numeric);
        }
    }
}
