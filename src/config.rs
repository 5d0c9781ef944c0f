//! Server configuration.

use clap::Parser;
use std::time::Duration;

/// Topic bus configuration.
#[derive(Clone, Debug, Default)]
pub struct BusConfig {
    /// Max pending events per listener before it is dropped.
    /// Default: None (unbounded)
    pub buffer_size: Option<usize>,
}

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bus: BusConfig,

    /// Period of the demonstration counter.
    /// Default: 1s
    pub count_interval: Duration,

    /// Whether `start_count_ticker` starts a ticker at all.
    pub count_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            count_interval: Duration::from_secs(1),
            count_enabled: true,
        }
    }
}

/// Demo binary command line arguments.
#[derive(Debug, Parser)]
#[command(name = "postwire")]
#[command(about = "Run a scripted session against an in-memory postwire server")]
pub struct Args {
    /// Start from an empty store instead of the demo dataset.
    #[arg(long)]
    pub empty: bool,

    /// Max pending events per subscriber (unbounded when unset).
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Period (ms) of the demonstration counter.
    #[arg(long, default_value_t = 1_000)]
    pub count_interval_ms: u64,

    /// Disable the demonstration counter.
    #[arg(long)]
    pub no_count: bool,

    /// How long (ms) to keep listening after the script has run.
    #[arg(long, default_value_t = 2_500)]
    pub linger_ms: u64,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            bus: BusConfig {
                buffer_size: args.buffer_size,
            },
            count_interval: Duration::from_millis(args.count_interval_ms),
            count_enabled: !args.no_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_to_config() {
        let args = Args::parse_from(["postwire", "--buffer-size", "8", "--no-count"]);
        let config = ServerConfig::from(&args);

        assert_eq!(config.bus.buffer_size, Some(8));
        assert!(!config.count_enabled);
        assert_eq!(config.count_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert!(config.bus.buffer_size.is_none());
        assert!(config.count_enabled);
    }
}
