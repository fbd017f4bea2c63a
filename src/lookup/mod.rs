pub mod geo;

pub use geo::*;

use std::net::IpAddr;

use crate::map::Coordinate;
use crate::state::LocationBreadcrumb;

/// Sanitize a string for safe terminal display by removing control characters.
///
/// This filters out ASCII control characters (0x00-0x1F, 0x7F) and Unicode control
/// characters that could be used to inject terminal escape sequences.
pub(crate) fn sanitize_display(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_control())
        .collect()
}

/// Location record returned by a geolocation service
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRecord {
    pub country: String,
    /// Most general first
    pub subdivisions: Vec<String>,
    pub timezone: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<GeoRecord> for LocationBreadcrumb {
    fn from(record: GeoRecord) -> Self {
        let labels = std::iter::once(record.country)
            .chain(record.subdivisions)
            .chain(record.timezone)
            .map(|label| sanitize_display(&label))
            .filter(|label| !label.is_empty())
            .collect();
        LocationBreadcrumb {
            labels,
            coordinate: Coordinate::new(record.latitude, record.longitude),
        }
    }
}

/// IP address to location. No record is a normal answer for private or
/// unknown addresses.
pub trait Geolocator {
    fn lookup(&self, ip: IpAddr) -> Option<GeoRecord>;
}

/// Geolocation disabled or unavailable
impl<G: Geolocator> Geolocator for Option<G> {
    fn lookup(&self, ip: IpAddr) -> Option<GeoRecord> {
        self.as_ref().and_then(|g| g.lookup(ip))
    }
}

impl<G: Geolocator + ?Sized> Geolocator for &G {
    fn lookup(&self, ip: IpAddr) -> Option<GeoRecord> {
        (**self).lookup(ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    struct Fixed;

    impl Geolocator for Fixed {
        fn lookup(&self, _ip: IpAddr) -> Option<GeoRecord> {
            Some(GeoRecord {
                country: "US".to_string(),
                subdivisions: vec!["CA".to_string()],
                timezone: None,
                latitude: 37.4,
                longitude: -122.1,
            })
        }
    }

    #[test]
    fn test_sanitize_display() {
        assert_eq!(sanitize_display("Z\x1b[31mrich"), "Z[31mrich");
        assert_eq!(sanitize_display("Berlin"), "Berlin");
    }

    #[test]
    fn test_breadcrumb_from_record() {
        let record = GeoRecord {
            country: "DE".to_string(),
            subdivisions: vec!["BE".to_string(), String::new()],
            timezone: Some("Europe/Berlin".to_string()),
            latitude: 52.5,
            longitude: 13.4,
        };
        let crumb = LocationBreadcrumb::from(record);
        assert_eq!(crumb.labels, vec!["DE", "BE", "Europe/Berlin"]);
        assert_eq!(crumb.coordinate, Coordinate::new(52.5, 13.4));
    }

    #[test]
    fn test_option_geolocator() {
        let ip = IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8));
        let none: Option<Fixed> = None;
        assert!(none.lookup(ip).is_none());
        assert_eq!(Some(Fixed).lookup(ip).unwrap().country, "US");
        assert!((&Fixed).lookup(ip).is_some());
    }
}
