use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use handlebars::Handlebars;
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::dataset::Dataset;
use crate::downloader;
use crate::error::QueryError;
use crate::queries::{self, DashboardSummary};
use crate::state::DatasetStore;
use crate::table::Value;

const INDEX_TEMPLATE: &str = "index";
const DASHBOARD_TEMPLATE: &str = "dashboard";

/// Multipart field carrying the uploaded spreadsheet.
const UPLOAD_FIELD: &str = "file";

pub struct AppState {
    pub store: DatasetStore,
    templates: Handlebars<'static>,
}

impl AppState {
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        let mut templates = Handlebars::new();
        templates.register_template_string(INDEX_TEMPLATE, include_str!("./static/index.html"))?;
        templates.register_template_string(
            DASHBOARD_TEMPLATE,
            include_str!("./static/dashboard.html"),
        )?;

        Ok(AppState {
            store: DatasetStore::new(),
            templates,
        })
    }

    fn render<T: Serialize>(&self, status: StatusCode, template: &str, context: &T) -> Response {
        match self.templates.render(template, context) {
            Ok(page) => (status, Html(page)).into_response(),
            Err(e) => {
                warn!("Failed to render {template}: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
            }
        }
    }
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new()?);

    if let Some(path) = &config.preload {
        match Dataset::load(path) {
            Ok(dataset) => state.store.replace(dataset),
            Err(e) => warn!("Could not preload {}: {}", path.display(), e),
        }
    }

    let app = router(state, &config);

    let listener = TcpListener::bind(config.addr).await?;
    info!("Listening on http://{}", config.addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the dashboard router around shared state.
pub fn router(state: Arc<AppState>, config: &Config) -> Router {
    Router::new()
        .route("/", get(serve_landing))
        .route("/upload", post(upload_file))
        .route("/dashboard", get(serve_dashboard))
        .route("/api/subject_performance", get(subject_performance))
        .route(
            "/api/student_performance/:student_id",
            get(student_performance),
        )
        .route("/api/top_students", get(top_students))
        .route("/api/subject_distribution", get(subject_distribution))
        .route("/api/correlation_matrix", get(correlation_matrix))
        .route("/api/performance_by_grade", get(performance_by_grade))
        .route("/get_data", get(get_data))
        .route("/export/csv", get(export_csv))
        .route("/export/xlsx", get(export_xlsx))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state)
}

async fn serve_landing(State(state): State<Arc<AppState>>) -> Response {
    render_landing(&state, StatusCode::OK, None)
}

fn render_landing(state: &AppState, status: StatusCode, error: Option<String>) -> Response {
    state.render(status, INDEX_TEMPLATE, &json!({ "error": error }))
}

async fn upload_file(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> Response {
    let mut upload = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some(UPLOAD_FIELD) {
                    continue;
                }
                let filename = field.file_name().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => upload = Some((filename, bytes)),
                    Err(e) => {
                        return render_landing(&state, StatusCode::BAD_REQUEST, Some(e.body_text()));
                    }
                }
                break;
            }
            Ok(None) => break,
            Err(e) => {
                return render_landing(&state, StatusCode::BAD_REQUEST, Some(e.body_text()));
            }
        }
    }

    // No file part or no file chosen: back to the form without complaint
    let Some((filename, bytes)) = upload else {
        return Redirect::to("/").into_response();
    };
    if filename.trim().is_empty() {
        return Redirect::to("/").into_response();
    }

    match Dataset::ingest(&filename, &bytes) {
        Ok(dataset) => {
            state.store.replace(dataset);
            Redirect::to("/dashboard").into_response()
        }
        Err(e) => {
            warn!("Rejected upload {filename}: {e}");
            render_landing(&state, StatusCode::BAD_REQUEST, Some(e.to_string()))
        }
    }
}

async fn serve_dashboard(State(state): State<Arc<AppState>>) -> Response {
    let Ok(dataset) = state.store.snapshot() else {
        return Redirect::to("/").into_response();
    };

    let summary = queries::dashboard_summary(&dataset);
    let context = dashboard_context(&summary, dataset.table().columns());
    state.render(StatusCode::OK, DASHBOARD_TEMPLATE, &context)
}

/// Flatten the summary into display strings for the template.
fn dashboard_context(summary: &DashboardSummary<'_>, columns: &[String]) -> serde_json::Value {
    let averages: Vec<_> = summary
        .averages
        .0
        .iter()
        .map(|(subject, average)| {
            json!({
                "subject": subject,
                "average": average.map(|a| format!("{a:.2}")).unwrap_or_else(|| "n/a".to_string()),
            })
        })
        .collect();

    let top_performers: Vec<Vec<String>> = summary
        .top_performers
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| record.get(c).map(Value::to_export_string).unwrap_or_default())
                .collect()
        })
        .collect();

    json!({
        "total_students": summary.total_students,
        "subjects": summary.subjects,
        "averages": averages,
        "columns": columns,
        "top_performers": top_performers,
    })
}

fn error_body(err: &QueryError) -> Json<serde_json::Value> {
    Json(json!({ "error": err.to_string() }))
}

/// `/api/*` convention: errors travel as `{"error": ...}` with status 200,
/// except a malformed student id which is a client error.
fn api_error(err: QueryError) -> Response {
    debug!("Query failed: {err:?}");
    let status = match err {
        QueryError::InvalidStudentId(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };
    (status, error_body(&err)).into_response()
}

/// Run a query on the current dataset and serialize its result.
fn api_response<F>(state: &AppState, query: F) -> Response
where
    F: FnOnce(&Dataset) -> Result<Response, QueryError>,
{
    state.store.query(query).unwrap_or_else(api_error)
}

async fn subject_performance(State(state): State<Arc<AppState>>) -> Response {
    api_response(&state, |d| {
        Ok(Json(queries::subject_performance(d)).into_response())
    })
}

async fn student_performance(
    Path(student_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    api_response(&state, |d| {
        let id = student_id
            .trim()
            .parse::<i64>()
            .map_err(|_| QueryError::InvalidStudentId(student_id.clone()))?;
        Ok(Json(queries::student_performance(d, id)?).into_response())
    })
}

async fn top_students(State(state): State<Arc<AppState>>) -> Response {
    api_response(&state, |d| Ok(Json(queries::top_students(d)).into_response()))
}

async fn subject_distribution(State(state): State<Arc<AppState>>) -> Response {
    api_response(&state, |d| {
        Ok(Json(queries::subject_distribution(d)).into_response())
    })
}

async fn correlation_matrix(State(state): State<Arc<AppState>>) -> Response {
    api_response(&state, |d| {
        Ok(Json(queries::correlation_matrix(d)).into_response())
    })
}

async fn performance_by_grade(State(state): State<Arc<AppState>>) -> Response {
    api_response(&state, |d| {
        Ok(Json(queries::performance_by_grade(d)?).into_response())
    })
}

/// Raw table export. Unlike `/api/*`, a missing dataset is a 404 here.
async fn get_data(State(state): State<Arc<AppState>>) -> Response {
    state
        .store
        .query(|d| Ok(Json(queries::dump_all(d)).into_response()))
        .unwrap_or_else(|err| (StatusCode::NOT_FOUND, error_body(&err)).into_response())
}

async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let dataset = match state.store.snapshot() {
        Ok(dataset) => dataset,
        Err(err) => return (StatusCode::NOT_FOUND, error_body(&err)).into_response(),
    };

    match downloader::to_csv(&dataset) {
        Ok(csv) => attachment("text/csv; charset=utf-8", "csv", csv.into_bytes()),
        Err(e) => export_failed(e),
    }
}

async fn export_xlsx(State(state): State<Arc<AppState>>) -> Response {
    let dataset = match state.store.snapshot() {
        Ok(dataset) => dataset,
        Err(err) => return (StatusCode::NOT_FOUND, error_body(&err)).into_response(),
    };

    match downloader::to_xlsx(&dataset) {
        Ok(bytes) => attachment(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "xlsx",
            bytes,
        ),
        Err(e) => export_failed(e),
    }
}

fn attachment(content_type: &str, extension: &str, body: Vec<u8>) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        downloader::export_filename(extension)
    );
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

fn export_failed(e: crate::error::ExportError) -> Response {
    warn!("Export failed: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
        .into_response()
}
