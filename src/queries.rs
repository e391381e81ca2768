//! Read-only aggregation queries over an ingested [`Dataset`].
//!
//! Every query is a pure function of the dataset. Results serialize to the
//! JSON shapes served by the dashboard API; undefined statistics (such as
//! the mean of a subject with no scores) serialize as `null`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::dataset::Dataset;
use crate::error::QueryError;
use crate::schema::SUPW;
use crate::stats;
use crate::table::{Record, Value};

pub const ID_COLUMN: &str = "Unique ID";
pub const NAME_COLUMN: &str = "Name";
pub const TOTAL_SCORE_COLUMN: &str = "total_score";

pub const TOP_STUDENTS: usize = 10;
pub const DASHBOARD_TOP_PERFORMERS: usize = 5;

pub const FAIL_THRESHOLD: f64 = 60.0;
pub const DISTINCTION_THRESHOLD: f64 = 90.0;

pub const BUCKET_EDGES: [f64; 8] = [0.0, 35.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];
pub const BUCKET_LABELS: [&str; 7] = [
    "0-35", "36-50", "51-60", "61-70", "71-80", "81-90", "91-100",
];

/// Ordered string-keyed map that serializes as a JSON object.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyed<V>(pub Vec<(String, V)>);

impl<V> Keyed<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl<V: Serialize> Serialize for Keyed<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubjectPerformance {
    pub subject: String,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
    pub below_60: usize,
    pub above_90: usize,
}

/// Summary statistics for every subject, in subject order.
pub fn subject_performance(dataset: &Dataset) -> Vec<SubjectPerformance> {
    let table = dataset.table();
    dataset
        .subjects()
        .iter()
        .zip(dataset.subject_indices())
        .map(|(subject, col)| {
            let scores = table.numbers(col);
            SubjectPerformance {
                subject: subject.clone(),
                average: stats::mean(&scores),
                min: stats::min(&scores),
                max: stats::max(&scores),
                median: stats::median(&scores),
                below_60: stats::count_where(&scores, |s| s < FAIL_THRESHOLD),
                above_90: stats::count_where(&scores, |s| s >= DISTINCTION_THRESHOLD),
            }
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StudentPerformance {
    pub name: Value,
    pub id: Value,
    pub performance: Keyed<Option<f64>>,
}

/// Scores of the first student whose `Unique ID` equals `student_id`.
pub fn student_performance(
    dataset: &Dataset,
    student_id: i64,
) -> Result<StudentPerformance, QueryError> {
    let table = dataset.table();
    let id_col = table
        .column_index(ID_COLUMN)
        .ok_or(QueryError::NotFound(student_id))?;

    let row = (0..table.len())
        .find(|&row| id_matches(table.value(row, id_col), student_id))
        .ok_or(QueryError::NotFound(student_id))?;

    let performance = dataset
        .subjects()
        .iter()
        .zip(dataset.subject_indices())
        .map(|(subject, col)| (subject.clone(), table.value(row, col).as_f64()))
        .collect();

    Ok(StudentPerformance {
        name: cell(dataset, row, NAME_COLUMN),
        id: table.value(row, id_col).clone(),
        performance: Keyed(performance),
    })
}

/// Largest magnitude below which every integer has an exact `f64` form.
const MAX_EXACT_ID: f64 = 9_007_199_254_740_992.0;

/// Ids are compared as integers. Fractional cells, and cells too large to
/// hold an exact integer, never match.
fn id_matches(cell: &Value, student_id: i64) -> bool {
    match cell.as_f64() {
        Some(id) if id.fract() == 0.0 && id.abs() < MAX_EXACT_ID => id as i64 == student_id,
        _ => false,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TopStudent {
    pub name: Value,
    pub id: Value,
    pub total_score: f64,
    pub average: Option<f64>,
}

/// The [`TOP_STUDENTS`] highest total scores; ties keep input order.
///
/// The total is attached to a copy of the table as `total_score` before
/// ranking, so the ingested table itself stays untouched.
pub fn top_students(dataset: &Dataset) -> Vec<TopStudent> {
    let table = dataset.table();
    let subject_cols = dataset.subject_indices();

    let row_scores: Vec<Vec<Option<f64>>> = table
        .rows()
        .iter()
        .map(|row| subject_cols.iter().map(|&col| row[col].as_f64()).collect())
        .collect();
    let totals = row_scores
        .iter()
        .map(|scores| Value::Number(stats::sum(scores)))
        .collect();

    let ranked = table.with_column(TOTAL_SCORE_COLUMN, totals);
    let Some(total_col) = ranked.column_index(TOTAL_SCORE_COLUMN) else {
        return Vec::new();
    };
    let total_of = |row: usize| ranked.value(row, total_col).as_f64().unwrap_or(0.0);

    let mut order: Vec<usize> = (0..ranked.len()).collect();
    order.sort_by(|&a, &b| total_of(b).total_cmp(&total_of(a)));

    order
        .into_iter()
        .take(TOP_STUDENTS)
        .map(|row| TopStudent {
            name: cell(dataset, row, NAME_COLUMN),
            id: cell(dataset, row, ID_COLUMN),
            total_score: total_of(row),
            average: stats::mean(&row_scores[row]),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Distribution {
    pub ranges: Vec<&'static str>,
    pub counts: Vec<usize>,
}

/// Bucket index for a score; the first bucket includes zero, the rest are
/// right-inclusive. Scores outside `0..=100` fall in no bucket.
pub fn bucket_of(score: f64) -> Option<usize> {
    if !(BUCKET_EDGES[0]..=BUCKET_EDGES[BUCKET_EDGES.len() - 1]).contains(&score) {
        return None;
    }
    (1..BUCKET_EDGES.len())
        .find(|&edge| score <= BUCKET_EDGES[edge])
        .map(|edge| edge - 1)
}

/// Score-range histogram for every subject.
pub fn subject_distribution(dataset: &Dataset) -> Keyed<Distribution> {
    let table = dataset.table();
    let distributions = dataset
        .subjects()
        .iter()
        .zip(dataset.subject_indices())
        .map(|(subject, col)| {
            let mut counts = vec![0; BUCKET_LABELS.len()];
            for score in table.numbers(col).into_iter().flatten() {
                if let Some(bucket) = bucket_of(score) {
                    counts[bucket] += 1;
                }
            }
            let distribution = Distribution {
                ranges: BUCKET_LABELS.to_vec(),
                counts,
            };
            (subject.clone(), distribution)
        })
        .collect();
    Keyed(distributions)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub subjects: Vec<String>,
    pub matrix: Vec<Vec<Option<f64>>>,
}

/// Pairwise Pearson correlation between subjects, rounded to two decimals.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let table = dataset.table();
    let columns: Vec<Vec<Option<f64>>> = dataset
        .subject_indices()
        .into_iter()
        .map(|col| table.numbers(col))
        .collect();

    let n = columns.len();
    let mut matrix = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = stats::pearson(&columns[i], &columns[j]).map(stats::round2);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    CorrelationMatrix {
        subjects: dataset.subjects().to_vec(),
        matrix,
    }
}

/// Grouping key with a total order: numbers ascending, then text.
#[derive(Clone, Debug)]
enum GroupKey {
    Number(f64),
    Text(String),
}

impl GroupKey {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) if !n.is_nan() => Some(GroupKey::Number(*n)),
            Value::Text(s) => Some(GroupKey::Text(s.clone())),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        match self {
            GroupKey::Number(n) => Value::Number(n),
            GroupKey::Text(s) => Value::Text(s),
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
            (GroupKey::Number(_), GroupKey::Text(_)) => Ordering::Less,
            (GroupKey::Text(_), GroupKey::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GradePerformance {
    pub grade: Value,
    pub performance: Keyed<Option<f64>>,
}

/// Mean score per subject for every distinct `SUPW` grade.
///
/// Rows without a grade are left out.
pub fn performance_by_grade(dataset: &Dataset) -> Result<Vec<GradePerformance>, QueryError> {
    let table = dataset.table();
    let grade_col = table.column_index(SUPW).ok_or(QueryError::NoCategory)?;

    let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
    for row in 0..table.len() {
        if let Some(key) = GroupKey::from_value(table.value(row, grade_col)) {
            groups.entry(key).or_default().push(row);
        }
    }

    let subject_cols = dataset.subject_indices();
    let result = groups
        .into_iter()
        .map(|(key, rows)| {
            let performance = dataset
                .subjects()
                .iter()
                .zip(&subject_cols)
                .map(|(subject, &col)| {
                    let scores: Vec<Option<f64>> =
                        rows.iter().map(|&row| table.value(row, col).as_f64()).collect();
                    (subject.clone(), stats::mean(&scores))
                })
                .collect();
            GradePerformance {
                grade: key.into_value(),
                performance: Keyed(performance),
            }
        })
        .collect();

    Ok(result)
}

/// The whole table plus its subject list; missing cells serialize as `""`.
#[derive(Debug, Serialize)]
pub struct DataDump<'a> {
    pub students: Vec<Record<'a>>,
    pub subjects: &'a [String],
}

pub fn dump_all(dataset: &Dataset) -> DataDump<'_> {
    let table = dataset.table();
    DataDump {
        students: (0..table.len()).map(|row| table.export_record(row)).collect(),
        subjects: dataset.subjects(),
    }
}

/// The `n` rows with the largest scores, compared subject by subject.
///
/// Higher scores in the first subject win; later subjects break ties,
/// missing scores rank below any score and full ties keep input order.
/// Subjects not present in the table are ignored.
pub fn top_by_subjects<'a>(dataset: &'a Dataset, n: usize, subjects: &[String]) -> Vec<Record<'a>> {
    let table = dataset.table();
    let cols: Vec<usize> = subjects
        .iter()
        .filter_map(|s| table.column_index(s))
        .collect();
    if cols.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..table.len()).collect();
    order.sort_by(|&a, &b| {
        cols.iter()
            .map(|&col| descending(table.value(a, col).as_f64(), table.value(b, col).as_f64()))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });

    order
        .into_iter()
        .take(n)
        .map(|row| table.record(row))
        .collect()
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Figures shown on the dashboard page.
#[derive(Debug, Serialize)]
pub struct DashboardSummary<'a> {
    pub total_students: usize,
    pub subjects: &'a [String],
    pub averages: Keyed<Option<f64>>,
    pub top_performers: Vec<Record<'a>>,
}

pub fn dashboard_summary(dataset: &Dataset) -> DashboardSummary<'_> {
    let table = dataset.table();
    let averages = dataset
        .subjects()
        .iter()
        .zip(dataset.subject_indices())
        .map(|(subject, col)| (subject.clone(), stats::mean(&table.numbers(col))))
        .collect();

    DashboardSummary {
        total_students: table.len(),
        subjects: dataset.subjects(),
        averages: Keyed(averages),
        top_performers: top_by_subjects(dataset, DASHBOARD_TOP_PERFORMERS, dataset.subjects()),
    }
}

fn cell(dataset: &Dataset, row: usize, label: &str) -> Value {
    dataset
        .table()
        .column_index(label)
        .map(|col| dataset.table().value(row, col).clone())
        .unwrap_or(Value::Missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Unique ID,Name,Seat Number,Math,Science,SUPW
101,Asha,1,95,40,A
102,Ravi,2,58,72,B
103,Meera,3,AB,91,A
104,Kiran,4,70,65,
";

    fn sample() -> Dataset {
        Dataset::ingest("marks.csv", SAMPLE.as_bytes()).unwrap()
    }

    fn csv(text: &str) -> Dataset {
        Dataset::ingest("marks.csv", text.as_bytes()).unwrap()
    }

    #[test]
    fn subject_performance_skips_missing_scores() {
        let perf = subject_performance(&sample());
        assert_eq!(perf.len(), 2);

        let math = &perf[0];
        assert_eq!(math.subject, "Math");
        assert_eq!(math.average, Some((95.0 + 58.0 + 70.0) / 3.0));
        assert_eq!(math.min, Some(58.0));
        assert_eq!(math.max, Some(95.0));
        assert_eq!(math.median, Some(70.0));
        assert_eq!(math.below_60, 1);
        assert_eq!(math.above_90, 1);

        let science = &perf[1];
        assert_eq!(science.below_60, 1);
        assert_eq!(science.above_90, 1);
        assert_eq!(science.median, Some(68.5));
    }

    #[test]
    fn subject_performance_is_idempotent() {
        let dataset = sample();
        assert_eq!(subject_performance(&dataset), subject_performance(&dataset));
    }

    #[test]
    fn all_missing_subject_has_null_statistics() {
        let dataset = csv("Seat Number,Math,SUPW\n1,AB,A\n2,,B\n");
        let perf = subject_performance(&dataset);
        assert_eq!(perf[0].average, None);
        assert_eq!(perf[0].median, None);
        assert_eq!(perf[0].below_60, 0);

        let json = serde_json::to_value(&perf[0]).unwrap();
        assert!(json["average"].is_null());
    }

    #[test]
    fn student_performance_finds_first_match() {
        let dataset = csv(
            "Unique ID,Name,Seat Number,Math,Science,SUPW\n\
             101,Asha,1,95,40,A\n\
             101,Duplicate,2,10,10,B\n",
        );
        let student = student_performance(&dataset, 101).unwrap();
        assert_eq!(student.name, Value::Text("Asha".into()));
        assert_eq!(student.id, Value::Number(101.0));
        assert_eq!(student.performance.get("Math"), Some(&Some(95.0)));
        assert_eq!(student.performance.get("Science"), Some(&Some(40.0)));

        let json = serde_json::to_string(&student).unwrap();
        assert_eq!(
            json,
            r#"{"name":"Asha","id":101,"performance":{"Math":95.0,"Science":40.0}}"#
        );
    }

    #[test]
    fn unknown_student_is_not_found() {
        assert_eq!(
            student_performance(&sample(), 999),
            Err(QueryError::NotFound(999))
        );
        let no_ids = csv("Name,Math\nAsha,90\n");
        assert_eq!(student_performance(&no_ids, 1), Err(QueryError::NotFound(1)));
    }

    #[test]
    fn student_ids_compare_as_integers() {
        let dataset = csv(
            "Unique ID,Name,Seat Number,Math,SUPW\n\
             9007199254740991,Asha,1,95,A\n\
             9007199254740993,Ravi,2,80,B\n\
             101.5,Meera,3,70,A\n",
        );
        let student = student_performance(&dataset, 9_007_199_254_740_991).unwrap();
        assert_eq!(student.name, Value::Text("Asha".into()));

        // The second id rounds to 2^53 when read, so it identifies nobody
        for id in [9_007_199_254_740_992, 9_007_199_254_740_993] {
            assert_eq!(student_performance(&dataset, id), Err(QueryError::NotFound(id)));
        }
        assert_eq!(student_performance(&dataset, 101), Err(QueryError::NotFound(101)));
    }

    #[test]
    fn keyed_maps_serialize_in_insertion_order() {
        let keyed = Keyed(vec![("Science".to_string(), 1), ("Math".to_string(), 2)]);
        assert_eq!(serde_json::to_string(&keyed).unwrap(), r#"{"Science":1,"Math":2}"#);

        let dataset = csv("Seat Number,Zoology,Art,SUPW\n1,50,60,A\n");
        let json = serde_json::to_string(&subject_distribution(&dataset)).unwrap();
        assert!(json.starts_with(r#"{"Zoology":"#));
    }

    #[test]
    fn top_students_rank_by_total_with_stable_ties() {
        let dataset = csv(
            "Unique ID,Name,Seat Number,Math,Science,SUPW\n\
             1,A,1,50,50,A\n\
             2,B,2,90,,A\n\
             3,C,3,60,40,A\n\
             4,D,4,99,99,A\n",
        );
        let top = top_students(&dataset);
        let ids: Vec<&Value> = top.iter().map(|s| &s.id).collect();
        assert_eq!(
            ids,
            vec![
                &Value::Number(4.0),
                &Value::Number(1.0),
                &Value::Number(3.0),
                &Value::Number(2.0)
            ]
        );
        assert_eq!(top[0].total_score, 198.0);
        assert_eq!(top[0].average, Some(99.0));
        assert_eq!(top[3].total_score, 90.0);
        assert_eq!(top[3].average, Some(90.0));

        // the derived column never leaks into the ingested table
        assert!(dataset.table().column_index(TOTAL_SCORE_COLUMN).is_none());
    }

    #[test]
    fn top_students_caps_at_ten() {
        let mut text = String::from("Unique ID,Name,Score\n");
        for id in 0..15 {
            text.push_str(&format!("{id},S{id},{id}\n"));
        }
        let top = top_students(&csv(&text));
        assert_eq!(top.len(), TOP_STUDENTS);
        assert_eq!(top[0].id, Value::Number(14.0));
    }

    #[test]
    fn buckets_follow_the_score_ranges() {
        assert_eq!(bucket_of(0.0), Some(0));
        assert_eq!(bucket_of(35.0), Some(0));
        assert_eq!(bucket_of(35.5), Some(1));
        assert_eq!(bucket_of(60.0), Some(2));
        assert_eq!(bucket_of(100.0), Some(6));
        assert_eq!(bucket_of(-1.0), None);
        assert_eq!(bucket_of(100.5), None);
    }

    #[test]
    fn distribution_counts_each_bucket() {
        let dataset = csv("Seat Number,Math,SUPW\n1,10,A\n2,40,A\n3,65,A\n4,92,A\n5,,A\n");
        let dist = subject_distribution(&dataset);
        let math = dist.get("Math").unwrap();
        assert_eq!(math.ranges, BUCKET_LABELS.to_vec());
        assert_eq!(math.counts, vec![1, 1, 0, 1, 0, 0, 1]);
    }

    #[test]
    fn correlation_is_symmetric_with_unit_diagonal() {
        let dataset = csv(
            "Seat Number,Math,Science,Art,SUPW\n\
             1,10,20,5,A\n\
             2,20,35,5,A\n\
             3,30,38,5,A\n\
             4,40,70,5,A\n",
        );
        let corr = correlation_matrix(&dataset);
        assert_eq!(corr.subjects, vec!["Math", "Science", "Art"]);

        let m = &corr.matrix;
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[i][j], m[j][i]);
            }
        }
        assert_eq!(m[0][0], Some(1.0));
        assert_eq!(m[1][1], Some(1.0));
        // constant column: undefined, reported rather than dropped
        assert_eq!(m[2][2], None);
        assert_eq!(m[0][2], None);
        assert!(m[0][1].unwrap() > 0.9);

        let json = serde_json::to_value(&corr).unwrap();
        assert!(json["matrix"][2][2].is_null());
    }

    #[test]
    fn grades_are_sorted_and_missing_grades_dropped() {
        let perf = performance_by_grade(&sample()).unwrap();
        let grades: Vec<&Value> = perf.iter().map(|g| &g.grade).collect();
        assert_eq!(
            grades,
            vec![&Value::Text("A".into()), &Value::Text("B".into())]
        );
        assert_eq!(perf[0].performance.get("Math"), Some(&Some(95.0)));
        assert_eq!(perf[0].performance.get("Science"), Some(&Some(65.5)));
        assert_eq!(perf[1].performance.get("Math"), Some(&Some(58.0)));
    }

    #[test]
    fn numeric_grades_sort_before_text() {
        let dataset = csv("Name,Math,SUPW\nA,10,B\nB,20,2\nC,30,10\n");
        let perf = performance_by_grade(&dataset).unwrap();
        let grades: Vec<&Value> = perf.iter().map(|g| &g.grade).collect();
        assert_eq!(
            grades,
            vec![
                &Value::Number(2.0),
                &Value::Number(10.0),
                &Value::Text("B".into())
            ]
        );
    }

    #[test]
    fn missing_grade_column_is_reported() {
        let dataset = csv("Name,Math\nAsha,95\n");
        assert_eq!(performance_by_grade(&dataset), Err(QueryError::NoCategory));
    }

    #[test]
    fn dump_renders_missing_as_empty_string() {
        let dataset = sample();
        let json = serde_json::to_value(dump_all(&dataset)).unwrap();
        assert_eq!(json["subjects"], serde_json::json!(["Math", "Science"]));
        assert_eq!(json["students"].as_array().unwrap().len(), 4);
        assert_eq!(json["students"][2]["Math"], "");
        assert_eq!(json["students"][3]["SUPW"], "");
        assert_eq!(json["students"][0]["Name"], "Asha");
    }

    #[test]
    fn dump_round_trips_through_ingestion() {
        let dataset = sample();
        let json = serde_json::to_value(dump_all(&dataset)).unwrap();

        let columns = dataset.table().columns();
        let mut text = columns.join(",");
        text.push('\n');
        for student in json["students"].as_array().unwrap() {
            let line: Vec<String> = columns
                .iter()
                .map(|c| match &student[c] {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            text.push_str(&line.join(","));
            text.push('\n');
        }

        let again = Dataset::ingest("dump.csv", text.as_bytes()).unwrap();
        assert_eq!(again.subjects(), dataset.subjects());
        for col in dataset.subject_indices() {
            assert_eq!(again.table().numbers(col), dataset.table().numbers(col));
        }
    }

    #[test]
    fn top_by_subjects_compares_lexicographically() {
        let dataset = csv(
            "Unique ID,Name,Seat Number,Math,Science,SUPW\n\
             1,A,1,80,50,A\n\
             2,B,2,90,10,A\n\
             3,C,3,80,70,A\n\
             4,D,4,,99,A\n",
        );
        let top = top_by_subjects(&dataset, 3, dataset.subjects());
        let names: Vec<&Value> = top.iter().filter_map(|r| r.get("Name")).collect();
        assert_eq!(
            names,
            vec![
                &Value::Text("B".into()),
                &Value::Text("C".into()),
                &Value::Text("A".into())
            ]
        );
        assert!(top_by_subjects(&dataset, 3, &[]).is_empty());
    }

    #[test]
    fn no_subjects_yields_empty_results() {
        let dataset = csv("Name,Remarks\nAsha,good\nRavi,fair\n");
        assert!(dataset.subjects().is_empty());
        assert!(subject_performance(&dataset).is_empty());
        assert!(subject_distribution(&dataset).0.is_empty());
        assert!(correlation_matrix(&dataset).matrix.is_empty());

        let top = top_students(&dataset);
        assert!(top.iter().all(|s| s.total_score == 0.0 && s.average.is_none()));

        let summary = dashboard_summary(&dataset);
        assert_eq!(summary.total_students, 2);
        assert!(summary.top_performers.is_empty());
    }

    #[test]
    fn dashboard_summary_lists_top_five() {
        let mut text = String::from("Unique ID,Name,Seat Number,Math,SUPW\n");
        for id in 0..8 {
            text.push_str(&format!("{id},S{id},{id},{},A\n", id * 10));
        }
        let dataset = csv(&text);
        let summary = dashboard_summary(&dataset);
        assert_eq!(summary.total_students, 8);
        assert_eq!(summary.top_performers.len(), DASHBOARD_TOP_PERFORMERS);
        assert_eq!(summary.averages.get("Math"), Some(&Some(35.0)));
        assert_eq!(
            summary.top_performers[0].get("Name"),
            Some(&Value::Text("S7".into()))
        );
    }
}
