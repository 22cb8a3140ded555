//! Subscriber setup for the report commands.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration handed to [`init`].
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Color level names with ANSI escapes
    pub color: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            color: true,
        }
    }
}

impl LogConfig {
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level))
    }
}

/// Install the global subscriber. Logs go to stderr so report text on stdout stays clean.
///
/// Calling this twice is harmless; the second install is ignored.
pub fn init(config: &LogConfig) {
    let _ = tracing_subscriber::registry()
        .with(config.filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(config.color)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.color);
    }

    #[test]
    fn test_init_twice() {
        let config = LogConfig {
            level: "debug".to_string(),
            color: false,
        };
        init(&config);
        init(&config);
        tracing::debug!("subscriber installed");
    }
}
