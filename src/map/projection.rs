//! Geographic coordinates to grid cells.
//!
//! The world bitmap does not span the full globe, so projection is a linear
//! transform over the bitmap's own bounding box rather than -90..90/-180..180.

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Geographic extent covered by the map bitmap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Latitude of the top edge
    pub north: f64,
    /// Latitude of the bottom edge
    pub south: f64,
    /// Longitude of the left edge
    pub west: f64,
    /// Longitude of the right edge
    pub east: f64,
}

impl Calibration {
    /// Extent of the bundled world.bmp
    pub const REFERENCE: Self = Self {
        north: 78.0,
        south: -56.0,
        west: -151.0,
        east: 179.0,
    };

    pub fn validate(&self) -> Result<(), MapError> {
        let values = [self.north, self.south, self.west, self.east];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MapError::InvalidCalibration(
                "bounds must be finite".to_string(),
            ));
        }
        if self.north <= self.south {
            return Err(MapError::InvalidCalibration(format!(
                "north ({}) must be above south ({})",
                self.north, self.south
            )));
        }
        if self.east <= self.west {
            return Err(MapError::InvalidCalibration(format!(
                "east ({}) must be right of west ({})",
                self.east, self.west
            )));
        }
        Ok(())
    }

    fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    fn lon_span(&self) -> f64 {
        self.east - self.west
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::REFERENCE
    }
}

/// A cell inside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub row: usize,
    pub column: usize,
}

/// Projects coordinates onto a width x height grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjector {
    width: usize,
    height: usize,
    calibration: Calibration,
}

impl GeoProjector {
    pub fn new(width: usize, height: usize, calibration: Calibration) -> Result<Self, MapError> {
        calibration.validate()?;
        Ok(Self {
            width,
            height,
            calibration,
        })
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Signed (row, column) before any bounds check
    pub fn project_raw(&self, coordinate: Coordinate) -> (i64, i64) {
        let cal = &self.calibration;
        let row = self.height as f64 * (cal.north - coordinate.latitude) / cal.lat_span();
        let column = self.width as f64 * (coordinate.longitude - cal.west) / cal.lon_span();
        (row.round() as i64, column.round() as i64)
    }

    /// Grid cell for a coordinate, or None when it falls outside the bitmap
    pub fn project(&self, coordinate: Coordinate) -> Option<GridPos> {
        if !coordinate.latitude.is_finite() || !coordinate.longitude.is_finite() {
            return None;
        }
        let (row, column) = self.project_raw(coordinate);
        let row = usize::try_from(row).ok().filter(|r| *r < self.height)?;
        let column = usize::try_from(column).ok().filter(|c| *c < self.width)?;
        Some(GridPos { row, column })
    }
}
