//! Error types for tracing and map construction.

use std::io;
use std::net::Ipv4Addr;

use thiserror::Error;

/// Errors that abort a trace
#[derive(Debug, Error)]
pub enum TraceError {
    /// Destination host could not be resolved to an IPv4 address
    #[error("Unable to resolve {host}: {reason}")]
    Resolution { host: String, reason: String },

    /// Receiver socket could not be opened or bound (usually missing privileges)
    #[error("Can't bind receiver socket on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Sender socket could not be created or configured
    #[error("Can't create sender socket for TTL {ttl}: {source}")]
    Socket {
        ttl: u8,
        #[source]
        source: io::Error,
    },

    /// Probe datagram could not be sent
    #[error("Failed to send probe TTL {ttl} to {target}: {source}")]
    Send {
        ttl: u8,
        target: Ipv4Addr,
        #[source]
        source: io::Error,
    },

    /// Receive failed for a reason other than the timeout expiring
    #[error("Failed to receive reply for TTL {ttl}: {source}")]
    Receive {
        ttl: u8,
        #[source]
        source: io::Error,
    },
}

/// Errors raised while building the world map
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Failed to decode map image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Every pixel has the same brightness, so quantization is undefined
    #[error("Map image has uniform brightness, nothing to render")]
    DegenerateImage,

    #[error("Palette needs at least 2 glyphs, got {0}")]
    InvalidPalette(usize),

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGB")]
    BufferSize {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Map surface must be at least 1x1, got {width}x{height}")]
    EmptySurface { width: usize, height: usize },

    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),
}
