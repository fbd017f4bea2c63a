use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use tracemap::config::{Config, DEFAULT_MAX_HOPS};
use tracemap::probe::random_port;

/// Traceroute that draws each hop on an ASCII world map
#[derive(Parser, Debug, Clone)]
#[command(name = "tracemap")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Destination host to trace route (hostname or IPv4 address)
    #[arg(required_unless_present = "replay")]
    pub host: Option<String>,

    /// Max number of hops
    #[arg(short = 'n', long = "hops", default_value_t = DEFAULT_MAX_HOPS)]
    pub hops: u8,

    /// Destination UDP port (random in 33434-33534 if unset)
    #[arg(long = "port")]
    pub port: Option<u16>,

    /// Seconds to wait for each reply
    #[arg(long = "timeout", default_value = "1.0")]
    pub timeout: f64,

    /// Map bitmap to render
    #[arg(long = "map")]
    pub map: Option<PathBuf>,

    /// Path to MaxMind GeoLite2 City database file
    #[arg(long = "geoip-db")]
    pub geoip_db: Option<PathBuf>,

    /// Skip geolocation
    #[arg(long = "no-geo")]
    pub no_geo: bool,

    /// Write the finished trace as JSON to this file
    #[arg(long = "json")]
    pub json: Option<PathBuf>,

    /// Print a text report after the trace
    #[arg(long = "report")]
    pub report: bool,

    /// Redraw a trace saved with --json instead of probing
    #[arg(long = "replay", conflicts_with = "host")]
    pub replay: Option<PathBuf>,
}

impl Args {
    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs_f64(self.timeout)
    }

    /// Validate arguments
    pub fn validate(&self) -> Result<(), String> {
        if self.hops == 0 {
            return Err("Max hops must be at least 1".into());
        }

        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            return Err("Timeout must be positive".into());
        }

        const MIN_TIMEOUT_SECS: f64 = 0.001;
        if self.timeout < MIN_TIMEOUT_SECS {
            return Err(format!(
                "Timeout must be at least {} seconds",
                MIN_TIMEOUT_SECS
            ));
        }

        // Upper bound so a typo can't stall the trace for hours per hop
        const MAX_TIMEOUT_SECS: f64 = 60.0;
        if self.timeout > MAX_TIMEOUT_SECS {
            return Err(format!("Timeout cannot exceed {} seconds", MAX_TIMEOUT_SECS));
        }

        if self.port == Some(0) {
            return Err("Port must be non-zero".into());
        }

        Ok(())
    }

    /// Runtime configuration for the trace
    pub fn to_config(&self) -> Config {
        Config {
            max_hops: self.hops,
            port: self.port.unwrap_or_else(random_port),
            timeout: self.timeout_duration(),
            geo_enabled: !self.no_geo,
        }
    }
}
