use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "tessera.log";

/// Where log records go. The terminal belongs to the TUI, so never stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Append to `{temp_dir}/tessera.log`.
    File,
    /// Drop everything (tests, one-shot subcommands).
    Discard,
}

/// Initialize the tracing subscriber. Safe to call more than once.
pub fn initialize(target: LogTarget) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false);

    if target == LogTarget::File
        && let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path())
    {
        let _ = builder.with_writer(file).try_init();
        return;
    }

    // Fallback: discard output (requested, or the file could not be opened)
    let _ = builder.with_writer(std::io::sink).try_init();
}

pub fn log_file_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}
