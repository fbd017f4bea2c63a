use rand::Rng;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::mem::MaybeUninit;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::ops::Range;
use std::time::Duration;

/// Classic traceroute destination port range
pub const PORT_RANGE: Range<u16> = 33434..33535;

/// Receive buffer size; only the source address of a reply is used
pub const RECV_BUFFER_SIZE: usize = 1024;

/// Shortest receive wait. `SO_RCVTIMEO` reads a zero timeval as "no
/// timeout", so anything that would truncate to zero is rounded up to this.
pub const MIN_RECV_TIMEOUT: Duration = Duration::from_micros(1);

/// Pick a destination port from the traceroute range
pub fn random_port() -> u16 {
    rand::thread_rng().gen_range(PORT_RANGE)
}

/// Create a raw ICMP socket for receiving router replies.
///
/// The read timeout bounds every `recv_from` on the socket, which is what
/// makes the probe wait a hard deadline. Raw sockets need root or
/// CAP_NET_RAW, so this is where missing privileges surface.
pub fn create_recv_socket(port: u16, timeout: Duration) -> io::Result<Socket> {
    let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
    socket.set_nonblocking(false)?;
    set_recv_deadline(&socket, timeout)?;

    let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);
    socket.bind(&SockAddr::from(addr))?;
    Ok(socket)
}

/// Bound every blocking receive on `socket` by `timeout`
pub fn set_recv_deadline(socket: &Socket, timeout: Duration) -> io::Result<()> {
    socket.set_read_timeout(Some(timeout.max(MIN_RECV_TIMEOUT)))
}

/// Create a UDP datagram socket whose packets carry the given TTL
pub fn create_send_socket(ttl: u8) -> io::Result<Socket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_ttl(ttl as u32)?;
    Ok(socket)
}

/// Send an empty UDP datagram to target:port
pub fn send_probe(socket: &Socket, target: Ipv4Addr, port: u16) -> io::Result<usize> {
    let addr = SockAddr::from(SocketAddrV4::new(target, port));
    socket.send_to(&[], &addr)
}

/// Block for one datagram and return its source address.
///
/// `Ok(None)` means the read timeout expired before anything arrived.
pub fn recv_reply(
    socket: &Socket,
    buffer: &mut [MaybeUninit<u8>],
) -> io::Result<Option<IpAddr>> {
    match socket.recv_from(buffer) {
        Ok((_, addr)) => Ok(addr.as_socket().map(|a| a.ip())),
        Err(e) if is_timeout(&e) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Read timeouts surface as WouldBlock on Unix and TimedOut on Windows
pub fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loopback_udp() -> Socket {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).unwrap();
        socket
            .bind(&SockAddr::from(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0)))
            .unwrap();
        socket
    }

    #[test]
    fn test_random_port_in_range() {
        for _ in 0..200 {
            assert!(PORT_RANGE.contains(&random_port()));
        }
    }

    #[test]
    fn test_is_timeout() {
        assert!(is_timeout(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(is_timeout(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!is_timeout(&io::Error::from(
            io::ErrorKind::PermissionDenied
        )));
    }

    #[test]
    fn test_send_socket_sets_ttl() {
        // Plain UDP sockets need no privileges
        let socket = create_send_socket(7).unwrap();
        assert_eq!(socket.ttl().unwrap(), 7);
    }

    #[test]
    fn test_recv_reply_times_out() {
        // A loopback UDP socket stands in for the raw receiver: nothing is
        // sent to it, so the read timeout must expire
        let socket = loopback_udp();
        set_recv_deadline(&socket, Duration::from_millis(50)).unwrap();

        let mut buffer = [MaybeUninit::<u8>::uninit(); RECV_BUFFER_SIZE];
        let started = std::time::Instant::now();
        assert_eq!(recv_reply(&socket, &mut buffer).unwrap(), None);
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_sub_microsecond_timeout_still_expires() {
        // 100ns would truncate to a zero timeval, which blocks forever
        for timeout in [Duration::from_nanos(100), Duration::ZERO] {
            let socket = loopback_udp();
            set_recv_deadline(&socket, timeout).unwrap();
            assert!(socket.read_timeout().unwrap().is_some(), "{:?}", timeout);

            let mut buffer = [MaybeUninit::<u8>::uninit(); RECV_BUFFER_SIZE];
            assert_eq!(recv_reply(&socket, &mut buffer).unwrap(), None);
        }
    }

    #[test]
    fn test_recv_reply_reports_source() {
        let receiver = loopback_udp();
        set_recv_deadline(&receiver, Duration::from_secs(1)).unwrap();
        let port = receiver.local_addr().unwrap().as_socket().unwrap().port();

        let sender = create_send_socket(64).unwrap();
        send_probe(&sender, Ipv4Addr::LOCALHOST, port).unwrap();

        let mut buffer = [MaybeUninit::<u8>::uninit(); RECV_BUFFER_SIZE];
        let source = recv_reply(&receiver, &mut buffer).unwrap();
        assert_eq!(source, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    }
}
