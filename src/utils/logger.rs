//! Logging Infrastructure
//!
//! Structured logging setup shared by embedding binaries and tools.

use std::path::Path;

/// Initialize the logger, with optional file output. Defaults to `info`
/// level on the console when both arguments are `None`.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // Daily-rolling file output when a log directory is provided
    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "staffdir");
            subscriber.with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}

#[cfg(test)]
mod tests {
    use super::*;

    // Sets the process-global subscriber; keep this the only test that does.
    #[test]
    fn init_accepts_level_and_missing_dir() {
        init_logger_with_file(Some("debug"), Some("/nonexistent/log/dir"));
        tracing::debug!("logger initialized");
    }
}
