use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Handle for the non-blocking log writer. Dropping it flushes and
/// disables the file writer, so the host must keep it alive for the
/// lifetime of the process.
pub struct LogGuard {
    #[allow(dead_code)]
    guard: WorkerGuard,
}

/// Installs the global tracing subscriber: INFO-and-above (overridable via
/// `RUST_LOG`) to stdout and to a timestamped file under the given
/// directory.
pub fn setup<P: AsRef<Path>>(log_dir: P) -> Result<LogGuard> {
    // for file name
    let dt = chrono::Local::now();
    let path: PathBuf = dt.format("%Y-%m-%d_%H-%M-%S.log").to_string().into();

    let file_appender = tracing_appender::rolling::never(log_dir.as_ref(), path);
    let (non_blocking_log_writer, guard) = tracing_appender::non_blocking(file_appender);

    let collector = tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                // defaults to INFO if RUST_LOG not set
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(fmt::layer().with_writer(non_blocking_log_writer));
    tracing::subscriber::set_global_default(collector)
        .context("Unable to set a global collector")?;

    Ok(LogGuard { guard })
}
