use color_eyre::Result;
use lazy_static::lazy_static;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use user_form::config::{get_data_dir, PROJECT_NAME};

lazy_static! {
    pub static ref LOG_ENV: String = format!("{}_LOG_LEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Route `tracing` output to a log file in the data dir (stdout belongs to the TUI).
///
/// Filter: `RUST_LOG`, then `USER_FORM_LOG_LEVEL`, default `info`.
/// Keep the returned guard alive until shutdown so buffered lines get flushed.
pub fn init() -> Result<WorkerGuard> {
    let directory = get_data_dir();
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::never(&directory, LOG_FILE.as_str());
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::builder().with_default_directive(tracing::Level::INFO.into());
    let env_filter = env_filter
        .try_from_env()
        .or_else(|_| env_filter.with_env_var(LOG_ENV.clone()).from_env())?;

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(non_blocking)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(guard)
}
