//! Logging setup
//!
//! `RUST_LOG` overrides the default filter. With a log directory the output
//! goes to a daily rolling file instead of stdout.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub const DEFAULT_FILTER: &str = "gastro_server=info,tower_http=info";
const LOG_FILE_PREFIX: &str = "gastro-server.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the process or buffered file output is lost.
pub fn init(config: &Config) -> Option<WorkerGuard> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());

    if let Some(dir) = config.log_dir.as_deref()
        && Path::new(dir).is_dir()
    {
        let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let builder = builder.with_writer(writer).with_ansi(false);
        if config.log_json {
            builder.json().init();
        } else {
            builder.init();
        }
        return Some(guard);
    }

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
    None
}
