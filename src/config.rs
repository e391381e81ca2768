use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 16;

const MEGABYTE: usize = 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid listen address '{0}'")]
    Addr(String),

    #[error("invalid DASHBOARD_MAX_UPLOAD_MB '{0}': expected a positive whole number")]
    UploadLimit(String),
}

/// Server settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub addr: SocketAddr,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// Spreadsheet ingested before the server starts accepting requests.
    pub preload: Option<PathBuf>,
}

impl Config {
    /// Build the configuration from the process environment and arguments.
    ///
    /// Usage: `exam-dashboard [ADDR] [PRELOAD_FILE]`
    pub fn from_env() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::resolve(&args, |key| std::env::var(key).ok())
    }

    /// Resolve settings from positional arguments first, then `lookup`
    /// (environment variables), then defaults.
    pub fn resolve<F>(args: &[String], lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = args
            .first()
            .cloned()
            .or_else(|| lookup("DASHBOARD_ADDR"))
            .unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Addr(addr.clone()))?;

        let static_dir = lookup("DASHBOARD_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let max_upload_bytes = match lookup("DASHBOARD_MAX_UPLOAD_MB") {
            Some(raw) => match raw.trim().parse::<usize>().ok().and_then(megabytes) {
                Some(bytes) => bytes,
                None => return Err(ConfigError::UploadLimit(raw)),
            },
            None => DEFAULT_MAX_UPLOAD_MB * MEGABYTE,
        };

        let preload = args
            .get(1)
            .cloned()
            .or_else(|| lookup("DASHBOARD_PRELOAD"))
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Config {
            addr,
            static_dir,
            max_upload_bytes,
            preload,
        })
    }
}

/// Zero and sizes that overflow `usize` are rejected.
fn megabytes(mb: usize) -> Option<usize> {
    if mb == 0 {
        return None;
    }
    mb.checked_mul(MEGABYTE)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * MEGABYTE,
            preload: None,
        }
    }
}
