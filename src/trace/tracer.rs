//! The hop loop: probe, geolocate, mark the map, emit a frame.

use log::{debug, info};
use std::net::IpAddr;

use crate::config::Config;
use crate::error::TraceError;
use crate::lookup::Geolocator;
use crate::map::{Coordinate, MarkerStyle, Snapshot, WorldMap};
use crate::probe::Prober;
use crate::state::{HopRecord, LocationBreadcrumb, Session, Target};
use crate::trace::resolve::resolve_target;

/// Map side of a trace: the live map, markers placed so far and the route log.
///
/// Shared by live tracing and replay so both draw identical frames.
pub struct RouteView {
    map: WorldMap,
    marker_style: Option<MarkerStyle>,
    routes: Vec<String>,
    previous: Option<Coordinate>,
}

impl RouteView {
    pub fn new(map: WorldMap, marker_style: Option<MarkerStyle>) -> Self {
        Self {
            map,
            marker_style,
            routes: Vec::new(),
            previous: None,
        }
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    /// Write the title line on row 0 and return the first frame
    pub fn header(&mut self, target: &Target, max_hops: u8) -> Snapshot {
        let header = format!(
            "Trace to {}({}) in max {} hops",
            target.original, target.resolved, max_hops
        );
        self.map.write_text(0, 0, &header);
        self.map.snapshot()
    }

    /// Add one hop and return its frame.
    ///
    /// The frame shows the map as it was before this hop's marker, with the
    /// route log up to and including this hop.
    pub fn push(&mut self, hop: &HopRecord) -> Snapshot {
        let frame = self.map.snapshot();

        // one marker per distinct location; consecutive hops in the same
        // place would stack labels on the same cell
        if let Some(location) = &hop.location
            && self.previous != Some(location.coordinate)
        {
            self.map
                .place_marker(location.coordinate, &hop.marker_label(), self.marker_style);
            self.previous = Some(location.coordinate);
        }

        self.routes.push(hop.route_entry());
        frame.with_lines(&self.routes)
    }
}

/// Redraw a saved session frame by frame, without probing.
///
/// Returns the final map with every marker placed.
pub fn replay<F>(
    session: &Session,
    map: WorldMap,
    marker_style: Option<MarkerStyle>,
    mut emit: F,
) -> WorldMap
where
    F: FnMut(&Snapshot),
{
    let mut view = RouteView::new(map, marker_style);
    emit(&view.header(&session.target, session.config.max_hops));
    for hop in &session.hops {
        emit(&view.push(hop));
    }
    view.map
}

/// Drives one trace from TTL 1 up to the destination or the hop ceiling
pub struct Tracer<P, G> {
    prober: P,
    geolocator: G,
    view: RouteView,
    config: Config,
}

impl<P: Prober, G: Geolocator> Tracer<P, G> {
    pub fn new(prober: P, geolocator: G, map: WorldMap, config: Config) -> Self {
        Self {
            prober,
            geolocator,
            view: RouteView::new(map, Some(MarkerStyle::default())),
            config,
        }
    }

    /// Emphasis for hop markers; None draws them as plain text
    pub fn with_marker_style(mut self, style: Option<MarkerStyle>) -> Self {
        self.view.marker_style = style;
        self
    }

    /// The live map, including every marker placed so far
    pub fn map(&self) -> &WorldMap {
        self.view.map()
    }

    /// Trace the route to `host`, handing each frame to `emit` as it is
    /// produced. The first frame shows only the header; after that there is
    /// exactly one frame per TTL tried.
    pub fn run<F>(&mut self, host: &str, mut emit: F) -> Result<Session, TraceError>
    where
        F: FnMut(&Snapshot),
    {
        let resolved = resolve_target(host)?;
        let max_hops = self.config.max_hops;
        let target = Target::new(host.to_string(), resolved);
        info!("Tracing {} ({}) in max {} hops", host, resolved, max_hops);

        emit(&self.view.header(&target, max_hops));
        let mut session = Session::new(target, self.config.clone());
        let destination = IpAddr::V4(resolved);

        for ttl in 1..=max_hops {
            let reply = self.prober.probe(ttl, resolved)?;

            let location = reply
                .responder
                .and_then(|ip| self.geolocator.lookup(ip))
                .map(LocationBreadcrumb::from);
            let hop = HopRecord::new(&reply, location);
            emit(&self.view.push(&hop));

            let reached = hop.responder == Some(destination);
            session.record(hop);
            if reached {
                debug!("Destination {} reached at TTL {}", resolved, ttl);
                break;
            }
        }

        Ok(session)
    }
}
