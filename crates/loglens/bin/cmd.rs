use clap::Args;
use loglens::client::DEFAULT_BASE_URL;
use loglens::HttpBackend;
use std::path::PathBuf;
use std::time::Duration;

pub(crate) mod console;
pub(crate) mod list;

/// Connection and logging options shared by every subcommand.
#[derive(Debug, Args)]
pub struct BackendArgs {
    /// Base URL of the container-management API
    #[arg(long, global = true, env = "LOGLENS_URL", default_value = DEFAULT_BASE_URL)]
    pub url: String,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true, env = "LOGLENS_TIMEOUT_MS", default_value = "5000")]
    pub timeout_ms: u64,

    /// Write tracing output to a daily rolling file in this directory
    #[arg(long, global = true, env = "LOGLENS_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl BackendArgs {
    pub fn backend(&self) -> HttpBackend {
        HttpBackend::new(
            self.url.trim_end_matches('/'),
            Duration::from_millis(self.timeout_ms),
        )
    }
}
