use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Logs go to stderr; stdout belongs to the response stream.
pub fn init(level: LevelFilter) {
    let fmt = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);
    let _ = tracing_subscriber::registry()
        .with(fmt)
        .with(level)
        .try_init();
}
