use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::state::Session;

/// Export session as pretty-printed JSON
pub fn export_json<W: Write>(session: &Session, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, session)?;
    writeln!(writer)?;
    Ok(())
}

/// Export session to a JSON file
pub fn export_json_file<P: AsRef<Path>>(session: &Session, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    export_json(session, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Largest session file accepted for replay
pub const MAX_REPLAY_SIZE: u64 = 10 * 1024 * 1024;

/// Load a previously exported session
pub fn load_session<P: AsRef<Path>>(path: P) -> Result<Session> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open session file: {}", path.display()))?;
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read session file metadata: {}", path.display()))?;
    if metadata.len() > MAX_REPLAY_SIZE {
        anyhow::bail!("Session file too large (max 10MB): {}", path.display());
    }
    let session = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to parse session file: {}", path.display()))?;
    Ok(session)
}
