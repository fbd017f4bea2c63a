use maxminddb::{Reader, geoip2};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::lookup::{GeoRecord, Geolocator};

/// GeoIP lookup using MaxMind GeoLite2 City database
pub struct GeoLookup {
    reader: Reader<Vec<u8>>,
    cache: RwLock<HashMap<IpAddr, Option<GeoRecord>>>,
}

impl GeoLookup {
    /// Create a new GeoLookup from a database file path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, maxminddb::MaxMindDBError> {
        let reader = Reader::open_readfile(db_path)?;

        Ok(Self {
            reader,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Common database locations, most specific first
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::data_dir().map(|d| d.join("tracemap").join("GeoLite2-City.mmdb")),
            dirs::config_dir().map(|d| d.join("tracemap").join("GeoLite2-City.mmdb")),
            Some(PathBuf::from("GeoLite2-City.mmdb")),
            Some(PathBuf::from("/usr/share/GeoIP/GeoLite2-City.mmdb")),
            Some(PathBuf::from("/var/lib/GeoIP/GeoLite2-City.mmdb")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Try to create GeoLookup from common default paths
    pub fn try_default() -> Option<Self> {
        for path in Self::default_paths() {
            if path.exists() {
                match Self::new(&path) {
                    Ok(lookup) => return Some(lookup),
                    Err(e) => log::warn!("Skipping GeoIP database {}: {}", path.display(), e),
                }
            }
        }
        None
    }

    /// Perform the actual database lookup
    fn do_lookup(&self, ip: IpAddr) -> Option<GeoRecord> {
        let city: geoip2::City = self.reader.lookup(ip).ok()?;

        // Country and coordinates are required for a usable record
        let country = city.country.as_ref().and_then(|c| {
            c.iso_code
                .or_else(|| c.names.as_ref().and_then(|n| n.get("en").copied()))
        })?;

        let location = city.location.as_ref()?;
        let latitude = location.latitude?;
        let longitude = location.longitude?;
        let timezone = location.time_zone.map(|s| s.to_string());

        let subdivisions = city
            .subdivisions
            .as_ref()
            .map(|subs| {
                subs.iter()
                    .filter_map(|s| {
                        s.iso_code
                            .or_else(|| s.names.as_ref().and_then(|n| n.get("en").copied()))
                    })
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();

        Some(GeoRecord {
            country: country.to_string(),
            subdivisions,
            timezone,
            latitude,
            longitude,
        })
    }
}

impl Geolocator for GeoLookup {
    fn lookup(&self, ip: IpAddr) -> Option<GeoRecord> {
        // Check cache first
        if let Some(cached) = self.cache.read().get(&ip) {
            return cached.clone();
        }

        let record = self.do_lookup(ip);
        self.cache.write().insert(ip, record.clone());
        record
    }
}
