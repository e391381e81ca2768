use exam_dashboard::app;
use exam_dashboard::config::Config;

/// Entry point for the dashboard web server.
///
/// Usage: `exam-dashboard [ADDR] [PRELOAD_FILE]`. Settings not given on the
/// command line come from `DASHBOARD_*` environment variables; log verbosity
/// follows `RUST_LOG` (default `info`).
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    app::run(config).await
}
