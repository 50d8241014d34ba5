use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogFormat, LoggingConfig};

/// Pick the filter directive: `-v`/`-vv` win, then `RUST_LOG`, then config.
fn filter(cfg: &LoggingConfig, verbose: u8) -> anyhow::Result<EnvFilter> {
    let forced = match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    };
    if let Some(level) = forced {
        return EnvFilter::try_new(level).context("invalid verbosity filter");
    }
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&cfg.level)
            .with_context(|| format!("invalid logging.level '{}'", cfg.level)),
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean
/// for command output.
///
/// # Errors
/// Fails on an invalid filter or when a subscriber is already installed.
pub fn init(cfg: &LoggingConfig, verbose: u8) -> anyhow::Result<()> {
    let filter = filter(cfg, verbose)?;

    let (text, json) = match cfg.format {
        LogFormat::Text => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()
        .context("installing tracing subscriber")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_config_level() {
        let cfg = LoggingConfig::default();
        assert_eq!(filter(&cfg, 1).unwrap().to_string(), "debug");
        assert_eq!(filter(&cfg, 3).unwrap().to_string(), "trace");
    }

    #[test]
    fn invalid_level_is_reported() {
        let cfg = LoggingConfig {
            level: "parkour=loud".to_owned(),
            ..LoggingConfig::default()
        };
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(filter(&cfg, 0).is_err());
        }
    }
}
