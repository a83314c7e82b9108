//! Logging infrastructure for the Jellyfin catalog source.
//!
//! Console output goes to stderr so JSON printed on stdout stays parseable.
//! File output rotates daily under the configured log directory.

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Dependencies that are only interesting when something goes wrong
const QUIET_TARGETS: [&str; 5] = ["hyper", "reqwest", "h2", "rustls", "html5ever"];

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log directory path
    pub log_dir: PathBuf,
    /// Component name, used as the log file prefix and main filter target
    pub component: String,
    /// Default log level
    pub default_level: Level,
    /// Enable console output
    pub console: bool,
    /// Enable file output
    pub file: bool,
    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("data/logs"),
            component: "jellyfin-source".to_string(),
            default_level: Level::INFO,
            console: true,
            file: true,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Logging settings from the `[logging]` section of the application config
    pub fn from_config(config: &Config, component: &str) -> Self {
        Self {
            log_dir: config.log_dir(),
            component: component.to_string(),
            default_level: parse_level(&config.logging.default_level),
            console: config.logging.console,
            file: config.logging.file,
            json_format: config.logging.json_format,
        }
    }

    /// Override the level, e.g. from a `--verbose` flag
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    /// `EnvFilter` directives used when `RUST_LOG` is unset
    fn filter_directives(&self) -> String {
        let mut targets = vec![self.component.replace('-', "_")];
        for target in ["shared", "jellyfin_source"] {
            if !targets.iter().any(|t| t == target) {
                targets.push(target.to_string());
            }
        }

        targets
            .iter()
            .map(|target| format!("{}={}", target, self.default_level))
            .chain(QUIET_TARGETS.iter().map(|target| format!("{}=warn", target)))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Initialize the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init(config: LogConfig) -> Result<()> {
    if config.file {
        std::fs::create_dir_all(&config.log_dir).with_context(|| {
            format!("Failed to create log directory: {}", config.log_dir.display())
        })?;
    }

    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directives()));

    let mut layers = Vec::new();

    if config.console {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr)
            .boxed();
        layers.push(console_layer);
    }

    if config.file {
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, &config.component);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(file_appender)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(file_appender)
                .boxed()
        };

        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::info!(
        component = %config.component,
        log_dir = %config.log_dir.display(),
        "Logging initialized"
    );

    Ok(())
}

/// Parse a configured level name, falling back to INFO
pub fn parse_level(level: &str) -> Level {
    level.parse().unwrap_or(Level::INFO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.logging.default_level = "warn".to_string();
        config.logging.json_format = true;

        let log = LogConfig::from_config(&config, "jellyfin-source");
        assert_eq!(log.default_level, Level::WARN);
        assert!(log.json_format);
        assert_eq!(log.log_dir, config.log_dir());

        let log = log.with_level(Level::DEBUG);
        assert_eq!(log.default_level, Level::DEBUG);
    }

    #[test]
    fn test_filter_directives() {
        let config = LogConfig {
            default_level: Level::DEBUG,
            ..Default::default()
        };
        let directives = config.filter_directives();
        assert_eq!(directives.matches("jellyfin_source=").count(), 1);
        assert!(directives.starts_with("jellyfin_source=DEBUG,shared=DEBUG"));
        assert!(directives.contains("reqwest=warn"));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("loud"), Level::INFO);
    }
}
