//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system with a fallback level
///
/// `RUST_LOG` still wins when it is set; `level` only applies otherwise.
/// Unknown level names fall back to `info`. Calling this more than once is
/// harmless, later calls are ignored.
pub fn init_with_level(level: &str) {
    let filter = parse_level(level);
    let mut builder = env_logger::Builder::new();
    builder.filter_level(filter);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if builder.try_init().is_err() {
        log::debug!("Logger already initialized, keeping existing configuration");
    }
}

/// Parse a textual log level, defaulting to `Info`
pub fn parse_level(level: &str) -> log::LevelFilter {
    level.trim().parse().unwrap_or(log::LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_known_names() {
        assert_eq!(parse_level("debug"), log::LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), log::LevelFilter::Warn);
        assert_eq!(parse_level("off"), log::LevelFilter::Off);
    }

    #[test]
    fn test_parse_level_falls_back_to_info() {
        assert_eq!(parse_level("loud"), log::LevelFilter::Info);
        assert_eq!(parse_level(""), log::LevelFilter::Info);
    }
}
