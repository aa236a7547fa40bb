use std::io;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Configures stdout and file logging for a pipeline run.
///
/// Stdout stays at info for the pipeline stages; the daily rolling file log
/// additionally captures per-stage debug output (grouping keys, shape scores)
/// for inspecting why items landed where they did.
pub fn configure_logging() {
    let stdout_log = fmt::layer().with_writer(io::stdout).with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,extract=info,cluster=info,core_filter=info,ideas=info")
        }),
    );

    let file_appender = tracing_appender::rolling::daily("logs", "painminer.log");
    let file_log = fmt::layer().with_writer(file_appender).with_filter(EnvFilter::new(
        "info,extract=debug,cluster=debug,core_filter=debug,ideas=debug",
    ));

    tracing_subscriber::Registry::default()
        .with(stdout_log)
        .with(file_log)
        .init();
}
