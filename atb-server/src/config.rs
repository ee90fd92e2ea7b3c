//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::cache::CacheConfig;

/// Bus stop and departure API backed by AtB InfoTransit.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, env = "ATB_LISTEN", default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// JSON file holding AtB credentials (`Username`, `Password`, `URL`).
    #[arg(long, env = "ATB_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// How long the stop list is cached, in seconds.
    #[arg(long, env = "ATB_STOPS_TTL_SECS", default_value_t = 1800)]
    pub stops_ttl_secs: u64,

    /// How long each stop's departures are cached, in seconds.
    #[arg(long, env = "ATB_DEPARTURES_TTL_SECS", default_value_t = 60)]
    pub departures_ttl_secs: u64,

    /// How often expired cache entries are purged, in seconds.
    #[arg(long, env = "ATB_CLEANUP_INTERVAL_SECS", default_value_t = 30)]
    pub cleanup_interval_secs: u64,

    /// Timeout for requests to AtB, in seconds.
    #[arg(long, env = "ATB_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Serve data from this directory instead of calling AtB.
    #[arg(long, env = "ATB_MOCK_DATA")]
    pub mock_data: Option<PathBuf>,
}

impl Cli {
    /// Cache settings from the command line.
    ///
    /// A zero interval falls back to the default, since a ticker cannot
    /// run with a zero period.
    pub fn cache_config(&self) -> CacheConfig {
        let defaults = CacheConfig::default();
        let cleanup_interval = match self.cleanup_interval_secs {
            0 => defaults.cleanup_interval,
            secs => Duration::from_secs(secs),
        };

        CacheConfig {
            stops_ttl: Duration::from_secs(self.stops_ttl_secs),
            departures_ttl: Duration::from_secs(self.departures_ttl_secs),
            cleanup_interval,
            ..defaults
        }
    }
}
