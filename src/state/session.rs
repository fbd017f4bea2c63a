use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

use crate::config::Config;
use crate::state::hop::HopRecord;

/// Target host information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Host as given on the command line
    pub original: String,
    pub resolved: Ipv4Addr,
}

impl Target {
    pub fn new(original: String, resolved: Ipv4Addr) -> Self {
        Self { original, resolved }
    }
}

/// A complete trace: one hop record per TTL tried
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub target: Target,
    pub config: Config,
    pub started_at: DateTime<Utc>,
    pub hops: Vec<HopRecord>,
    /// TTL at which the destination answered
    pub dest_ttl: Option<u8>,
}

impl Session {
    pub fn new(target: Target, config: Config) -> Self {
        let capacity = config.max_hops as usize;
        Self {
            target,
            config,
            started_at: Utc::now(),
            hops: Vec::with_capacity(capacity),
            dest_ttl: None,
        }
    }

    /// TTL the next record must carry
    pub fn next_ttl(&self) -> u8 {
        self.hops.len() as u8 + 1
    }

    /// Append the record for the next TTL
    pub fn record(&mut self, hop: HopRecord) {
        debug_assert_eq!(hop.ttl, self.next_ttl(), "hop records must be contiguous");
        if hop.responder == Some(IpAddr::V4(self.target.resolved)) {
            self.dest_ttl = Some(hop.ttl);
        }
        self.hops.push(hop);
    }

    /// Destination answered
    pub fn complete(&self) -> bool {
        self.dest_ttl.is_some()
    }

    /// Get hop by TTL (1-indexed)
    pub fn hop(&self, ttl: u8) -> Option<&HopRecord> {
        if ttl > 0 {
            self.hops.get((ttl - 1) as usize)
        } else {
            None
        }
    }

    /// Route log lines in TTL order
    pub fn route_lines(&self) -> Vec<String> {
        self.hops.iter().map(HopRecord::route_entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeReply;
    use std::time::Duration;

    fn session() -> Session {
        Session::new(
            Target::new("example.net".to_string(), Ipv4Addr::new(93, 184, 216, 34)),
            Config::default(),
        )
    }

    #[test]
    fn test_session_creation() {
        let session = session();
        assert!(session.hops.is_empty());
        assert_eq!(session.next_ttl(), 1);
        assert!(!session.complete());
        assert!(session.hop(0).is_none());
    }

    #[test]
    fn test_record_detects_destination() {
        let mut session = session();
        session.record(HopRecord::new(&ProbeReply::timeout(1), None));
        let reply = ProbeReply::replied(
            2,
            IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34)),
            Duration::from_millis(20),
        );
        session.record(HopRecord::new(&reply, None));

        assert!(session.complete());
        assert_eq!(session.dest_ttl, Some(2));
        assert_eq!(session.hop(2).unwrap().rtt_ms, Some(20.0));
        assert_eq!(session.route_lines().len(), 2);
    }

    #[test]
    #[should_panic(expected = "contiguous")]
    #[cfg(debug_assertions)]
    fn test_record_out_of_order_panics_in_debug() {
        let mut session = session();
        session.record(HopRecord::new(&ProbeReply::timeout(3), None));
    }
}
