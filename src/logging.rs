use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "codepane=info";
const LOG_FILE: &str = "codepane.log";

/// Keeps the non-blocking writer alive; drop it last.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Installs the global subscriber. With a directory, logs go to a daily rolling
/// file; otherwise to stderr. Returns `None` if a subscriber is already set or the
/// directory cannot be created.
pub fn init(log_dir: Option<&Path>) -> Option<LoggingGuard> {
    let log_dir = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).ok()?;
            Some(dir.to_path_buf())
        }
        None => None,
    };

    let (writer, guard) = match &log_dir {
        Some(dir) => {
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE))
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    match &log_dir {
        Some(dir) => tracing::info!(log_dir = %dir.display(), "tracing initialized"),
        None => tracing::info!("tracing initialized"),
    }

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
