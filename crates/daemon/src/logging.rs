//! Tracing subscriber setup

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::settings::{LogFormat, LogSettings};
use crate::telemetry::OtelLayer;

const DEFAULT_FILTER: &str = "walkin=info";
const LOG_FILE_PREFIX: &str = "walkin.log";

/// Install the global subscriber
///
/// The returned guard must be held for the life of the process when logging to files.
pub fn init_logging(
    settings: &LogSettings,
    otel: Option<OtelLayer>,
) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;

    let (writer, guard, ansi) = match &settings.dir {
        Some(dir) => {
            let dir = shellexpand::tilde(dir).into_owned();
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard), false)
        }
        None => (BoxMakeWriter::new(std::io::stdout), None, true),
    };

    let base = tracing_subscriber::registry().with(otel).with(env_filter);

    match settings.format {
        // Production: JSON structured logging
        LogFormat::Json => base
            .with(fmt::layer().json().with_writer(writer).with_ansi(false))
            .try_init()?,
        // Development: Pretty formatting
        LogFormat::Pretty => base
            .with(fmt::layer().pretty().with_writer(writer).with_ansi(ansi))
            .try_init()?,
    }

    Ok(guard)
}
