//! Decoding the world bitmap into a pixel buffer.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;

use crate::error::MapError;
use crate::map::grid::PixelBuffer;

/// File name of the bundled map bitmap
pub const MAP_FILE_NAME: &str = "world.bmp";

/// Decode `path` and resize it to exactly `width` x `height` pixels
pub fn load_pixels<P: AsRef<Path>>(
    path: P,
    width: usize,
    height: usize,
) -> Result<PixelBuffer, MapError> {
    if width == 0 || height == 0 {
        return Err(MapError::EmptySurface { width, height });
    }
    let image = image::open(path)?;
    let rgb = image
        .resize_exact(width as u32, height as u32, FilterType::Nearest)
        .to_rgb8();
    PixelBuffer::new(width, height, rgb.into_raw())
}

/// Places the map bitmap is looked for, in order
pub fn default_map_paths() -> Vec<PathBuf> {
    [
        dirs::data_dir().map(|d| d.join("tracemap").join(MAP_FILE_NAME)),
        dirs::config_dir().map(|d| d.join("tracemap").join(MAP_FILE_NAME)),
        Some(PathBuf::from(MAP_FILE_NAME)),
        Some(PathBuf::from("/usr/share/tracemap").join(MAP_FILE_NAME)),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// First existing default map path
pub fn find_default_map() -> Option<PathBuf> {
    default_map_paths().into_iter().find(|p| p.exists())
}
