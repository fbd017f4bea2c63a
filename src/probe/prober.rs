//! One TTL attempt: open sockets, send, wait, close.

use log::debug;
use std::mem::MaybeUninit;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::TraceError;
use crate::probe::socket::{
    RECV_BUFFER_SIZE, create_recv_socket, create_send_socket, recv_reply, send_probe,
};

/// Outcome of a single probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeReply {
    pub ttl: u8,
    /// Who answered (None on timeout)
    pub responder: Option<IpAddr>,
    /// Time from send to reply (None on timeout)
    pub rtt: Option<Duration>,
}

impl ProbeReply {
    pub fn replied(ttl: u8, responder: IpAddr, rtt: Duration) -> Self {
        Self {
            ttl,
            responder: Some(responder),
            rtt: Some(rtt),
        }
    }

    pub fn timeout(ttl: u8) -> Self {
        Self {
            ttl,
            responder: None,
            rtt: None,
        }
    }

    /// Round-trip time in milliseconds, rounded to two decimals
    pub fn rtt_ms(&self) -> Option<f64> {
        self.rtt
            .map(|rtt| (rtt.as_micros() as f64 / 10.0).round() / 100.0)
    }
}

/// Sends one probe with a given TTL and reports who answered
pub trait Prober {
    fn probe(&mut self, ttl: u8, target: Ipv4Addr) -> Result<ProbeReply, TraceError>;
}

/// Classic UDP traceroute probe: empty datagram out, ICMP reply in
#[derive(Debug, Clone)]
pub struct UdpProber {
    port: u16,
    timeout: Duration,
}

impl UdpProber {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.port, config.timeout)
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Prober for UdpProber {
    /// Both sockets live only for this call and are closed on drop, whether
    /// the probe replied, timed out or failed.
    fn probe(&mut self, ttl: u8, target: Ipv4Addr) -> Result<ProbeReply, TraceError> {
        let receiver = create_recv_socket(self.port, self.timeout).map_err(|source| {
            TraceError::Bind {
                port: self.port,
                source,
            }
        })?;
        let sender =
            create_send_socket(ttl).map_err(|source| TraceError::Socket { ttl, source })?;

        let sent_at = Instant::now();
        send_probe(&sender, target, self.port).map_err(|source| TraceError::Send {
            ttl,
            target,
            source,
        })?;
        debug!("TTL {} probe sent to {}:{}", ttl, target, self.port);

        let mut buffer = [MaybeUninit::<u8>::uninit(); RECV_BUFFER_SIZE];
        let reply = match recv_reply(&receiver, &mut buffer)
            .map_err(|source| TraceError::Receive { ttl, source })?
        {
            Some(responder) => ProbeReply::replied(ttl, responder, sent_at.elapsed()),
            None => ProbeReply::timeout(ttl),
        };

        match reply.responder {
            Some(ip) => debug!("TTL {} reply from {} in {:?}", ttl, ip, reply.rtt),
            None => debug!("TTL {} timed out after {:?}", ttl, self.timeout),
        }
        Ok(reply)
    }
}
