use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::probe::PORT_RANGE;

/// Default hop ceiling
pub const DEFAULT_MAX_HOPS: u8 = 30;

/// Runtime configuration for one trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum TTL probed
    pub max_hops: u8,
    /// Destination UDP port
    pub port: u16,
    /// How long each probe waits for a reply
    #[serde(with = "duration_serde")]
    pub timeout: Duration,
    /// Enable geolocation of hops
    pub geo_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            port: PORT_RANGE.start,
            timeout: Duration::from_secs(1),
            geo_enabled: true,
        }
    }
}

/// Serde helper for Duration
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
