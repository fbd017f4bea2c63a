use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::map::Coordinate;
use crate::probe::ProbeReply;

/// Ordered location labels (country, subdivisions, timezone) ending in a
/// coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationBreadcrumb {
    pub labels: Vec<String>,
    pub coordinate: Coordinate,
}

impl LocationBreadcrumb {
    pub fn country(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// Labels joined for display, e.g. "US, CA, America/Los_Angeles"
    pub fn summary(&self) -> String {
        self.labels.join(", ")
    }
}

/// What one TTL attempt found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopRecord {
    pub ttl: u8,
    pub responder: Option<IpAddr>,
    pub rtt_ms: Option<f64>,
    pub location: Option<LocationBreadcrumb>,
}

impl HopRecord {
    pub fn new(reply: &ProbeReply, location: Option<LocationBreadcrumb>) -> Self {
        Self {
            ttl: reply.ttl,
            responder: reply.responder,
            rtt_ms: reply.rtt_ms(),
            location,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.responder.is_none()
    }

    /// One line of the route log.
    ///
    /// `"3    10.0.0.1         12.35 ms  US, CA"` for a reply,
    /// `"3    *  *  *"` for a timeout.
    pub fn route_entry(&self) -> String {
        let Some(responder) = self.responder else {
            return format!("{:<4} *  *  *", self.ttl);
        };

        let rtt = self
            .rtt_ms
            .map(|ms| format!("{:<6.2}", ms))
            .unwrap_or_else(|| format!("{:<6}", "?"));
        let mut entry = format!("{:<4} {:<15}  {}ms", self.ttl, responder.to_string(), rtt);

        if let Some(location) = &self.location
            && !location.labels.is_empty()
        {
            entry.push_str("  ");
            entry.push_str(&location.summary());
        }
        entry
    }

    /// Map label: the TTL followed by the country when known
    pub fn marker_label(&self) -> String {
        match self.location.as_ref().and_then(|l| l.country()) {
            Some(country) => format!("{} {}", self.ttl, country),
            None => self.ttl.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    fn located(ttl: u8) -> HopRecord {
        let reply = ProbeReply::replied(
            ttl,
            IpAddr::V4(Ipv4Addr::new(72, 14, 204, 1)),
            Duration::from_micros(12_340),
        );
        HopRecord::new(
            &reply,
            Some(LocationBreadcrumb {
                labels: vec!["US".into(), "CA".into(), "America/Los_Angeles".into()],
                coordinate: Coordinate::new(37.4, -122.1),
            }),
        )
    }

    #[test]
    fn test_route_entry_timeout() {
        let hop = HopRecord::new(&ProbeReply::timeout(4), None);
        assert!(hop.is_timeout());
        assert_eq!(hop.route_entry(), "4    *  *  *");
    }

    #[test]
    fn test_route_entry_reply_without_location() {
        let reply = ProbeReply::replied(
            12,
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)),
            Duration::from_micros(1_500),
        );
        let hop = HopRecord::new(&reply, None);
        assert_eq!(hop.route_entry(), "12   192.168.1.1      1.50  ms");
    }

    #[test]
    fn test_route_entry_with_location() {
        assert_eq!(
            located(7).route_entry(),
            "7    72.14.204.1      12.34 ms  US, CA, America/Los_Angeles"
        );
    }

    #[test]
    fn test_marker_label() {
        assert_eq!(located(7).marker_label(), "7 US");
        let bare = HopRecord::new(&ProbeReply::timeout(2), None);
        assert_eq!(bare.marker_label(), "2");
    }
}
