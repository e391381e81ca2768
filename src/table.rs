use serde::ser::{Serialize, SerializeMap, Serializer};

/// Cell contents that read as "no value", mirroring the usual spreadsheet NA spellings.
pub const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "None", "#N/A",
];

/// A single cell of an ingested table.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    /// Absent or unparseable; never the same thing as zero.
    Missing,
}

impl Value {
    /// Infer a typed value from raw cell text.
    ///
    /// Surrounding whitespace is ignored for inference. NA tokens become
    /// [`Value::Missing`], anything `f64` accepts becomes a number and the
    /// rest is kept as text.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if NA_TOKENS.contains(&trimmed) {
            return Value::Missing;
        }
        match parse_number(trimmed) {
            Some(n) => Value::Number(n),
            None => Value::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(n) => n.is_nan(),
            Value::Text(_) => false,
        }
    }

    /// Force the value into the numeric domain.
    ///
    /// Numbers pass through, text that parses as a number is converted and
    /// everything else becomes [`Value::Missing`].
    pub fn coerce_numeric(&self) -> Value {
        match self {
            Value::Number(n) if !n.is_nan() => Value::Number(*n),
            Value::Text(s) => parse_number(s.trim())
                .map(Value::Number)
                .unwrap_or(Value::Missing),
            _ => Value::Missing,
        }
    }

    /// Textual form used when exporting; missing cells render empty.
    pub fn to_export_string(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Missing => String::new(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => serialize_number(*n, serializer),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Missing => serializer.serialize_none(),
        }
    }
}

/// Integral values are emitted as JSON integers so ids read back as `101`, not `101.0`.
fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        serializer.serialize_i64(n as i64)
    } else if n.is_finite() {
        serializer.serialize_f64(n)
    } else {
        serializer.serialize_none()
    }
}

fn parse_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| !n.is_nan())
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Row-oriented table with stable, labelled columns.
///
/// Every row holds exactly one value per column, in column order. Row order
/// is the order rows were read in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding a short row with missing values.
    ///
    /// Values beyond the column count are discarded; callers that care about
    /// over-long rows must reject them before pushing.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Missing);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    pub fn value(&self, row: usize, col: usize) -> &Value {
        &self.rows[row][col]
    }

    /// Numeric view of a column: `None` for every cell without a number.
    pub fn numbers(&self, col: usize) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r[col].as_f64()).collect()
    }

    /// Rewrite every value of one column in place.
    pub fn map_column<F>(&mut self, col: usize, f: F)
    where
        F: Fn(&Value) -> Value,
    {
        for row in &mut self.rows {
            row[col] = f(&row[col]);
        }
    }

    /// Copy of this table with a derived column attached.
    ///
    /// An existing column with the same label is overwritten, otherwise the
    /// column is appended. `values` must hold one entry per row.
    pub fn with_column(&self, label: &str, values: Vec<Value>) -> Table {
        let mut derived = self.clone();
        let col = match derived.column_index(label) {
            Some(idx) => idx,
            None => {
                derived.columns.push(label.to_string());
                for row in &mut derived.rows {
                    row.push(Value::Missing);
                }
                derived.columns.len() - 1
            }
        };
        for (row, value) in derived.rows.iter_mut().zip(values) {
            row[col] = value;
        }
        derived
    }

    /// Label-keyed view of one row, serialized as a JSON object in column order.
    pub fn record(&self, row: usize) -> Record<'_> {
        Record {
            columns: &self.columns,
            values: &self.rows[row],
            missing_as_empty: false,
        }
    }

    /// Like [`Table::record`] but missing cells serialize as `""`.
    pub fn export_record(&self, row: usize) -> Record<'_> {
        Record {
            missing_as_empty: true,
            ..self.record(row)
        }
    }
}

/// Borrowed row paired with its column labels.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    columns: &'a [String],
    values: &'a [Value],
    missing_as_empty: bool,
}

impl Record<'_> {
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == label)
            .map(|idx| &self.values[idx])
    }
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (label, value) in self.columns.iter().zip(self.values) {
            if self.missing_as_empty && value.is_missing() {
                map.serialize_entry(label, "")?;
            } else {
                map.serialize_entry(label, value)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infer_recognises_numbers_text_and_na() {
        assert_eq!(Value::infer("95"), Value::Number(95.0));
        assert_eq!(Value::infer(" 40.5 "), Value::Number(40.5));
        assert_eq!(Value::infer("Asha"), Value::Text("Asha".to_string()));
        assert_eq!(Value::infer(""), Value::Missing);
        assert_eq!(Value::infer("  "), Value::Missing);
        assert_eq!(Value::infer("N/A"), Value::Missing);
        assert_eq!(Value::infer("nan"), Value::Missing);
    }

    #[test]
    fn coerce_numeric_turns_junk_into_missing() {
        assert_eq!(Value::Text("87".into()).coerce_numeric(), Value::Number(87.0));
        assert_eq!(Value::Text("AB".into()).coerce_numeric(), Value::Missing);
        assert_eq!(Value::Missing.coerce_numeric(), Value::Missing);
        assert_eq!(Value::Number(3.0).coerce_numeric(), Value::Number(3.0));
    }

    #[test]
    fn push_row_pads_short_rows() {
        let mut table = Table::new(vec!["a".into(), "b".into(), "c".into()]);
        table.push_row(vec![Value::Number(1.0)]);
        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.value(0, 2), &Value::Missing);
    }

    #[test]
    fn with_column_appends_without_touching_original() {
        let mut table = Table::new(vec!["a".into()]);
        table.push_row(vec![Value::Number(1.0)]);
        table.push_row(vec![Value::Number(2.0)]);

        let derived = table.with_column("total", vec![Value::Number(10.0), Value::Number(20.0)]);
        assert_eq!(derived.columns(), &["a".to_string(), "total".to_string()]);
        assert_eq!(derived.value(1, 1), &Value::Number(20.0));
        assert_eq!(table.columns().len(), 1);

        let replaced = derived.with_column("total", vec![Value::Missing, Value::Missing]);
        assert_eq!(replaced.columns().len(), 2);
        assert!(replaced.value(0, 1).is_missing());
    }

    #[test]
    fn records_serialize_in_column_order() {
        let mut table = Table::new(vec!["Name".into(), "Unique ID".into(), "Math".into()]);
        table.push_row(vec![
            Value::Text("Asha".into()),
            Value::Number(101.0),
            Value::Missing,
        ]);

        let json = serde_json::to_string(&table.record(0)).unwrap();
        assert_eq!(json, r#"{"Name":"Asha","Unique ID":101,"Math":null}"#);

        let json = serde_json::to_string(&table.export_record(0)).unwrap();
        assert_eq!(json, r#"{"Name":"Asha","Unique ID":101,"Math":""}"#);
    }

    #[test]
    fn fractional_numbers_keep_their_fraction() {
        let json = serde_json::to_string(&Value::Number(72.5)).unwrap();
        assert_eq!(json, "72.5");
        assert_eq!(Value::Number(72.5).to_export_string(), "72.5");
        assert_eq!(Value::Number(72.0).to_export_string(), "72");
    }
}
