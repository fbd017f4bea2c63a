use std::io::Write;

use crate::state::Session;

/// Generate a plain-text summary of the route
pub fn generate_report<W: Write>(session: &Session, mut writer: W) -> std::io::Result<()> {
    writeln!(
        writer,
        "tracemap report for {} ({})",
        session.target.original, session.target.resolved
    )?;
    writeln!(
        writer,
        "Started: {}",
        session.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    match session.dest_ttl {
        Some(ttl) => writeln!(writer, "Destination reached in {} hops", ttl)?,
        None => writeln!(
            writer,
            "Destination not reached within {} hops",
            session.config.max_hops
        )?,
    }
    writeln!(writer)?;

    // Header
    writeln!(writer, "{:>3}  {:<15} {:>10}  {}", "#", "Host", "RTT", "Location")?;
    writeln!(writer, "{}", "-".repeat(60))?;

    for hop in &session.hops {
        let host = hop
            .responder
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "* * *".to_string());
        let rtt = hop
            .rtt_ms
            .map(|ms| format!("{:.2}ms", ms))
            .unwrap_or_else(|| "-".to_string());
        let location = hop
            .location
            .as_ref()
            .map(|l| l.summary())
            .unwrap_or_default();

        writeln!(
            writer,
            "{:>3}  {:<15} {:>10}  {}",
            hop.ttl, host, rtt, location
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::probe::ProbeReply;
    use crate::state::{HopRecord, Target};
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    #[test]
    fn test_report_incomplete_trace() {
        let mut session = Session::new(
            Target::new("10.1.1.1".to_string(), Ipv4Addr::new(10, 1, 1, 1)),
            Config {
                max_hops: 2,
                ..Config::default()
            },
        );
        let reply = ProbeReply::replied(
            1,
            IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1)),
            Duration::from_micros(850),
        );
        session.record(HopRecord::new(&reply, None));
        session.record(HopRecord::new(&ProbeReply::timeout(2), None));

        let mut buf = Vec::new();
        generate_report(&session, &mut buf).unwrap();
        let report = String::from_utf8(buf).unwrap();
        assert!(report.starts_with("tracemap report for 10.1.1.1 (10.1.1.1)"));
        assert!(report.contains("Destination not reached within 2 hops"));
        assert!(report.contains("192.168.0.1"));
        assert!(report.contains("0.85ms"));
        assert!(report.contains("* * *"));
    }
}
