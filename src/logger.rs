//! Logging setup for the binary.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initialize the logger with the specified level.
///
/// A set `RUST_LOG` takes precedence over `level` entirely, global level
/// included. Calling this twice is harmless.
pub fn init_logger(level: LevelFilter) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let _ = builder(level, rust_log.as_deref()).try_init();
}

fn builder(level: LevelFilter, rust_log: Option<&str>) -> Builder {
    let mut builder = Builder::from_env(Env::new().write_style("RUST_LOG_STYLE"));
    match rust_log {
        Some(filters) => builder.parse_filters(filters),
        None => builder.filter_level(level),
    };
    builder.format_timestamp_millis();
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_applies_without_rust_log() {
        assert_eq!(builder(LevelFilter::Warn, None).build().filter(), LevelFilter::Warn);
    }

    #[test]
    fn rust_log_overrides_the_global_level() {
        assert_eq!(builder(LevelFilter::Info, Some("debug")).build().filter(), LevelFilter::Debug);
        assert_eq!(builder(LevelFilter::Info, Some("error")).build().filter(), LevelFilter::Error);
        assert_eq!(
            builder(LevelFilter::Info, Some("wiretrace=trace")).build().filter(),
            LevelFilter::Trace
        );
    }
}
