//! The live world map and its frozen snapshots.
//!
//! The tracer mutates one `WorldMap` in place. Every displayed frame is a
//! `Snapshot`, a value copy taken at one instant, so markers added later never
//! leak into frames that were already printed.

use std::fmt;

use log::warn;

use crate::error::MapError;
use crate::map::grid::{CharGrid, Palette, PixelBuffer, render_grid};
use crate::map::projection::{Calibration, Coordinate, GeoProjector, GridPos};
use crate::map::style::MarkerStyle;

/// Character map with marker and log operations
#[derive(Debug, Clone)]
pub struct WorldMap {
    grid: CharGrid,
    projector: GeoProjector,
}

impl WorldMap {
    /// Build the map from a decoded bitmap; its size becomes the grid size
    pub fn new(
        pixels: &PixelBuffer,
        palette: &Palette,
        calibration: Calibration,
    ) -> Result<Self, MapError> {
        let projector = GeoProjector::new(pixels.width(), pixels.height(), calibration)?;
        let grid = render_grid(pixels, palette)?;
        Ok(Self { grid, projector })
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &CharGrid {
        &self.grid
    }

    pub fn projector(&self) -> &GeoProjector {
        &self.projector
    }

    /// Write `label` starting at the projected cell of `coordinate`.
    ///
    /// Off-map coordinates are skipped with a warning. The label is cut at the
    /// right edge. Returns the cell the label starts at when placed.
    pub fn place_marker(
        &mut self,
        coordinate: Coordinate,
        label: &str,
        style: Option<MarkerStyle>,
    ) -> Option<GridPos> {
        let Some(pos) = self.projector.project(coordinate) else {
            let (row, column) = self.projector.project_raw(coordinate);
            warn!(
                "Marker '{}' at ({}, {}) projects to row {} column {}, outside {}x{} map; skipped",
                label,
                coordinate.latitude,
                coordinate.longitude,
                row,
                column,
                self.width(),
                self.height()
            );
            return None;
        };
        self.grid.write(pos.row, pos.column, label, style);
        Some(pos)
    }

    /// Plain text at an explicit cell (bounds-checked)
    pub fn write_text(&mut self, row: usize, column: usize, text: &str) -> usize {
        self.grid.write(row, column, text, None)
    }

    /// Write a scrolling log into the bottom rows, newest line last
    pub fn append_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        write_log(&mut self.grid, lines);
    }

    /// Freeze the current state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
        }
    }

    pub fn render(&self) -> String {
        self.grid.render()
    }
}

impl fmt::Display for WorldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Immutable copy of the map at one instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    grid: CharGrid,
}

impl Snapshot {
    /// A new snapshot with the log written over this one
    pub fn with_lines<S: AsRef<str>>(&self, lines: &[S]) -> Snapshot {
        let mut grid = self.grid.clone();
        write_log(&mut grid, lines);
        Snapshot { grid }
    }

    pub fn grid(&self) -> &CharGrid {
        &self.grid
    }

    pub fn render(&self) -> String {
        self.grid.render()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Only the last `height - 1` lines fit; row 0 is left for the header.
fn write_log<S: AsRef<str>>(grid: &mut CharGrid, lines: &[S]) {
    let visible = grid.height().saturating_sub(1);
    let start = lines.len().saturating_sub(visible);
    let bottom = grid.height().saturating_sub(1);
    for (i, line) in lines[start..].iter().rev().enumerate() {
        grid.write(bottom - i, 0, line.as_ref(), None);
    }
}
