use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use std::path::{Path, PathBuf};

mod cli;

use cli::Args;
use tracemap::error::TraceError;
use tracemap::export::{export_json_file, generate_report, load_session};
use tracemap::lookup::GeoLookup;
use tracemap::map::{Calibration, Palette, WorldMap, find_default_map, load_pixels};
use tracemap::prefs::Prefs;
use tracemap::probe::UdpProber;
use tracemap::terminal::surface_size;
use tracemap::trace::{Tracer, replay};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let prefs = Prefs::load();

    // Replay needs no privileges, probing or geolocation
    if let Some(ref path) = args.replay {
        return run_replay_mode(&args, &prefs, path);
    }

    let host = args
        .host
        .as_deref()
        .context("A destination host is required")?;
    let config = args.to_config();

    let map = build_map(&args, &prefs)?;
    let geo = if config.geo_enabled {
        open_geo(&args, &prefs)
    } else {
        None
    };

    let prober = UdpProber::from_config(&config);
    let mut tracer = Tracer::new(prober, geo, map, config).with_marker_style(prefs.marker_style());

    let session = match tracer.run(host, |frame| println!("{}", frame)) {
        Ok(session) => session,
        Err(e @ TraceError::Bind { .. }) => {
            eprintln!("{}\n\n{}", e, permission_hint());
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(ref path) = args.json {
        export_json_file(&session, path)?;
    }
    if args.report {
        generate_report(&session, std::io::stdout())?;
    }

    Ok(())
}

/// Redraw a saved session on a freshly loaded map
fn run_replay_mode(args: &Args, prefs: &Prefs, path: &Path) -> Result<()> {
    let session = load_session(path)?;
    let map = build_map(args, prefs)?;
    replay(&session, map, prefs.marker_style(), |frame| println!("{}", frame));

    if let Some(ref out) = args.json {
        export_json_file(&session, out)?;
    }
    if args.report {
        generate_report(&session, std::io::stdout())?;
    }
    Ok(())
}

/// Decode the map bitmap at terminal size. CLI flag > config file > default paths.
fn build_map(args: &Args, prefs: &Prefs) -> Result<WorldMap> {
    let path: PathBuf = args
        .map
        .clone()
        .or_else(|| prefs.map_path.clone())
        .or_else(find_default_map)
        .context("No map bitmap found. Put world.bmp next to the binary or pass --map <PATH>")?;

    let palette = match prefs.palette.as_deref() {
        Some(glyphs) => Palette::new(glyphs).context("Invalid palette in config")?,
        None => Palette::default(),
    };
    let calibration = prefs.calibration.unwrap_or(Calibration::REFERENCE);

    let (width, height) = surface_size();
    let pixels = load_pixels(&path, width, height)
        .with_context(|| format!("Failed to load map: {}", path.display()))?;
    let map = WorldMap::new(&pixels, &palette, calibration)
        .with_context(|| format!("Failed to render map: {}", path.display()))?;
    Ok(map)
}

/// Open the GeoIP database; tracing continues without locations if missing
fn open_geo(args: &Args, prefs: &Prefs) -> Option<GeoLookup> {
    match args.geoip_db.as_ref().or(prefs.geoip_db.as_ref()) {
        Some(path) => match GeoLookup::new(path) {
            Ok(lookup) => Some(lookup),
            Err(e) => {
                warn!("Failed to load GeoIP database '{}': {}", path.display(), e);
                None
            }
        },
        None => {
            let lookup = GeoLookup::try_default();
            if lookup.is_none() {
                warn!("No GeoLite2-City.mmdb found; hops will not be placed on the map");
            }
            lookup
        }
    }
}

fn permission_hint() -> String {
    let binary_path = std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "tracemap".to_string());

    format!(
        "Receiving router replies needs a raw ICMP socket.\n\n\
         Fix options:\n\
         \u{2022} Run with sudo: sudo tracemap <host>\n\
         \u{2022} Add capability: sudo setcap cap_net_raw+ep {}",
        binary_path
    )
}
