//! Pixel buffers, palettes and the character grid they quantize into.

use crate::error::MapError;
use crate::map::style::{MarkerStyle, end_token};

/// Default palette: bright pixels become blanks, dark pixels dashes
pub const DEFAULT_PALETTE: &str = " -";

/// Row-major RGB pixel buffer (3 bytes per pixel)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::EmptySurface { width, height });
        }
        let expected = width * height * 3;
        if data.len() != expected {
            return Err(MapError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build from a list of RGB triples
    pub fn from_pixels(width: usize, height: usize, pixels: &[[u8; 3]]) -> Result<Self, MapError> {
        Self::new(width, height, pixels.iter().flatten().copied().collect())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Iterate pixels row by row
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }
}

/// Ordered glyphs, darkest-implied first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<char>);

impl Palette {
    pub fn new(glyphs: &str) -> Result<Self, MapError> {
        let glyphs: Vec<char> = glyphs.chars().collect();
        if glyphs.len() < 2 {
            return Err(MapError::InvalidPalette(glyphs.len()));
        }
        Ok(Self(glyphs))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn glyph(&self, index: usize) -> char {
        self.0[index.min(self.0.len() - 1)]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_PALETTE.chars().collect())
    }
}

/// Map each pixel to a palette index.
///
/// Brightness is the channel sum; the brightest pixel lands on index 0 and
/// the darkest on `len - 1`. A buffer with a single brightness level has no
/// range to normalize against and is rejected.
pub fn quantize(buffer: &PixelBuffer, palette: &Palette) -> Result<Vec<usize>, MapError> {
    let proxies: Vec<u32> = buffer
        .pixels()
        .map(|[r, g, b]| r as u32 + g as u32 + b as u32)
        .collect();

    let min = proxies.iter().copied().min().unwrap_or(0);
    let max = proxies.iter().copied().max().unwrap_or(0);
    if max == min {
        return Err(MapError::DegenerateImage);
    }

    let range = (max - min) as f64;
    let top = (palette.len() - 1) as f64;
    Ok(proxies
        .into_iter()
        .map(|p| {
            let index = (1.0 - (p - min) as f64 / range) * top;
            (index as usize).min(palette.len() - 1)
        })
        .collect())
}

/// Quantize a pixel buffer into a character grid of the same size
pub fn render_grid(buffer: &PixelBuffer, palette: &Palette) -> Result<CharGrid, MapError> {
    let cells = quantize(buffer, palette)?
        .into_iter()
        .map(|i| Cell::plain(palette.glyph(i)))
        .collect();
    Ok(CharGrid {
        width: buffer.width(),
        height: buffer.height(),
        cells,
    })
}

/// One grid cell: a glyph plus optional style decoration.
///
/// Decoration only wraps the glyph when rendering; it never takes a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub open: Option<MarkerStyle>,
    pub close: bool,
}

impl Cell {
    pub fn plain(glyph: char) -> Self {
        Self {
            glyph,
            open: None,
            close: false,
        }
    }
}

/// Fixed-size grid of cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl CharGrid {
    /// Grid with every cell set to `glyph`
    pub fn filled(width: usize, height: usize, glyph: char) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::plain(glyph); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        if row >= self.height || column >= self.width {
            return None;
        }
        self.cells.get(row * self.width + column)
    }

    /// Write `text` from (row, column), one char per cell, left to right.
    ///
    /// Characters past the right edge are dropped and a row outside the grid
    /// writes nothing. Returns the number of cells written. With a style the
    /// first written cell opens it and the last one closes it.
    pub fn write(
        &mut self,
        row: usize,
        column: usize,
        text: &str,
        style: Option<MarkerStyle>,
    ) -> usize {
        if row >= self.height || column >= self.width {
            return 0;
        }

        let start = row * self.width + column;
        let room = self.width - column;
        let mut written = 0;
        for (offset, glyph) in text.chars().take(room).enumerate() {
            self.cells[start + offset] = Cell::plain(glyph);
            written += 1;
        }

        if let Some(style) = style
            && written > 0
        {
            self.cells[start].open = Some(style);
            self.cells[start + written - 1].close = true;
        }
        written
    }

    /// Row content without any escape sequences
    pub fn row_text(&self, row: usize) -> String {
        if row >= self.height {
            return String::new();
        }
        self.row_cells(row).iter().map(|c| c.glyph).collect()
    }

    /// All rows joined by newlines, with style escapes around decorated cells
    pub fn render(&self) -> String {
        let end = end_token();
        let mut out = String::with_capacity(self.cells.len() + self.height);
        for row in 0..self.height {
            if row > 0 {
                out.push('\n');
            }
            let mut open = false;
            for cell in self.row_cells(row) {
                if let Some(style) = cell.open {
                    out.push_str(&style.start_token());
                    open = true;
                }
                out.push(cell.glyph);
                if cell.close {
                    out.push_str(&end);
                    open = false;
                }
            }
            // closing cell was overwritten by a later write
            if open {
                out.push_str(&end);
            }
        }
        out
    }

    fn row_cells(&self, row: usize) -> &[Cell] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        let pixels: Vec<[u8; 3]> = (0..width * height)
            .map(|i| {
                let v = (i * 255 / (width * height - 1)) as u8;
                [v, v, v]
            })
            .collect();
        PixelBuffer::from_pixels(width, height, &pixels).unwrap()
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let err = PixelBuffer::new(2, 2, vec![0; 11]).unwrap_err();
        assert!(matches!(
            err,
            MapError::BufferSize {
                expected: 12,
                actual: 11,
                ..
            }
        ));
    }

    #[test]
    fn test_buffer_empty_surface() {
        assert!(matches!(
            PixelBuffer::new(0, 3, Vec::new()),
            Err(MapError::EmptySurface { .. })
        ));
    }

    #[test]
    fn test_palette_needs_two_glyphs() {
        assert!(matches!(Palette::new("#"), Err(MapError::InvalidPalette(1))));
        assert!(matches!(Palette::new(""), Err(MapError::InvalidPalette(0))));
        assert_eq!(Palette::new(" .:#").unwrap().len(), 4);
    }

    #[test]
    fn test_quantize_extremes() {
        let buffer = PixelBuffer::from_pixels(2, 1, &[[255, 255, 255], [0, 0, 0]]).unwrap();
        let palette = Palette::new(" .:#").unwrap();
        // brightest -> first glyph, darkest -> last glyph
        assert_eq!(quantize(&buffer, &palette).unwrap(), vec![0, 3]);
    }

    #[test]
    fn test_quantize_uses_channel_sum() {
        // (90,0,0) and (30,30,30) have equal brightness
        let buffer =
            PixelBuffer::from_pixels(3, 1, &[[90, 0, 0], [30, 30, 30], [0, 0, 0]]).unwrap();
        let indices = quantize(&buffer, &Palette::default()).unwrap();
        assert_eq!(indices[0], indices[1]);
    }

    #[test]
    fn test_quantize_flat_image_rejected() {
        let buffer = PixelBuffer::from_pixels(2, 2, &[[7, 7, 7]; 4]).unwrap();
        assert!(matches!(
            quantize(&buffer, &Palette::default()),
            Err(MapError::DegenerateImage)
        ));
    }

    #[test]
    fn test_render_grid_dimensions() {
        let grid = render_grid(&gradient(8, 3), &Palette::default()).unwrap();
        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.render().lines().count(), 3);
        assert!(grid.render().lines().all(|l| l.chars().count() == 8));
    }

    #[test]
    fn test_write_truncates_at_right_edge() {
        let mut grid = CharGrid::filled(5, 2, '.');
        assert_eq!(grid.write(1, 3, "abcdef", None), 2);
        assert_eq!(grid.row_text(1), "...ab");
        assert_eq!(grid.row_text(0), ".....");
    }

    #[test]
    fn test_write_out_of_bounds_is_noop() {
        let mut grid = CharGrid::filled(4, 2, '.');
        let before = grid.clone();
        assert_eq!(grid.write(2, 0, "xx", None), 0);
        assert_eq!(grid.write(0, 4, "xx", None), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_styled_write_keeps_columns() {
        let mut grid = CharGrid::filled(6, 1, '.');
        grid.write(0, 1, "abc", Some(MarkerStyle::Red));
        assert_eq!(grid.row_text(0), ".abc..");

        let rendered = grid.render();
        let start = MarkerStyle::Red.start_token();
        let expected = format!(".{}abc{}..", start, end_token());
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_single_char_styled_write() {
        let mut grid = CharGrid::filled(3, 1, '.');
        grid.write(0, 0, "x", Some(MarkerStyle::Bold));
        let cell = grid.cell(0, 0).unwrap();
        assert_eq!(cell.open, Some(MarkerStyle::Bold));
        assert!(cell.close);
    }

    #[test]
    fn test_overwritten_close_resets_at_row_end() {
        let mut grid = CharGrid::filled(6, 2, '.');
        grid.write(0, 0, "abc", Some(MarkerStyle::Blue));
        grid.write(0, 2, "Z", None);
        let first_row = grid.render().lines().next().unwrap().to_string();
        assert!(first_row.ends_with(&end_token()));
        assert_eq!(grid.row_text(0), "abZ...");
    }
}
