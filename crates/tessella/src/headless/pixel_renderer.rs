//! CPU-based pixel buffer renderer for headless snapshots
//!
//! Every cell is a solid block of its material colour. Because the cells tile
//! the world, redrawing just the cells created in a tick brings the whole
//! buffer up to date.

use anyhow::{Context, Result};
use std::path::Path;
use tessella_core::simulation::Materials;
use tessella_core::world::{Cell, CellId, World};

/// Background and border colour
pub const VOID: [u8; 4] = [6, 7, 10, 255];

/// Thickest border drawn around a cell, in pixels
const MAX_BORDER: f64 = 4.0;

/// CPU-based renderer that outputs to a pixel buffer
pub struct PixelRenderer {
    /// Width of the buffer in pixels
    pub width: usize,
    /// Height of the buffer in pixels
    pub height: usize,
    /// RGBA pixel buffer (4 bytes per pixel)
    pub buffer: Vec<u8>,
    /// Outline cells in [`VOID`]
    pub border: bool,
}

impl PixelRenderer {
    /// Create a new pixel renderer with given buffer size
    pub fn new(width: usize, height: usize) -> Self {
        let mut renderer = Self {
            width,
            height,
            buffer: vec![0u8; width * height * 4],
            border: true,
        };
        renderer.clear();
        renderer
    }

    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Fill the whole buffer with [`VOID`]
    pub fn clear(&mut self) {
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&VOID);
        }
    }

    /// Redraw every cell of the world
    pub fn render_world(&mut self, world: &World, materials: &Materials) {
        self.clear();
        for (_, cell) in world.iter() {
            self.draw_cell(cell, materials);
        }
    }

    /// Draw the listed cells that are still alive, returning how many were drawn
    pub fn draw_cells(&mut self, world: &World, ids: &[CellId], materials: &Materials) -> usize {
        let mut drawn = 0;
        for id in ids {
            if let Some(cell) = world.get(*id) {
                self.draw_cell(cell, materials);
                drawn += 1;
            }
        }
        drawn
    }

    /// Fill the pixels covered by one cell
    pub fn draw_cell(&mut self, cell: &Cell, materials: &Materials) {
        let bounds = cell.bounds();
        let scale_x = self.width as f64;
        let scale_y = self.height as f64;

        let left = (bounds.left * scale_x).floor().max(0.0) as usize;
        let right = ((bounds.right * scale_x).floor() as usize).min(self.width);
        let top = (bounds.top * scale_y).floor().max(0.0) as usize;
        let bottom = ((bounds.bottom * scale_y).floor() as usize).min(self.height);
        if left >= right || top >= bottom {
            return;
        }

        let border = if self.border {
            border_width(right - left, bottom - top)
        } else {
            0.0
        };
        let colour = materials.get_color(cell.material());

        for y in top..bottom {
            for x in left..right {
                // Distance to the nearest cell edge
                let inset = (x - left).min(right - 1 - x).min(y - top).min(bottom - 1 - y);
                let is_border = (inset as f64) < border;

                let idx = (y * self.width + x) * 4;
                let pixel = if is_border { VOID } else { colour };
                self.buffer[idx..idx + 4].copy_from_slice(&pixel);
            }
        }
    }

    /// RGBA value at a pixel, `None` outside the buffer
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.buffer[idx..idx + 4]);
        Some(rgba)
    }

    /// Write the buffer as a PNG file
    pub fn save_png(&self, path: &Path) -> Result<()> {
        save_buffer_as_png(&self.buffer, self.width, self.height, path)
    }
}

/// Border thickness for a block of the given pixel size
///
/// A tenth of the shorter side, at most [`MAX_BORDER`]; thinner than one pixel
/// rounds to one above 0.4 and to none below.
fn border_width(width: usize, height: usize) -> f64 {
    let border = MAX_BORDER.min(width.min(height) as f64 / 10.0);
    if border >= 1.0 {
        border
    } else if border > 0.4 {
        1.0
    } else {
        0.0
    }
}

/// Save RGBA buffer as PNG
fn save_buffer_as_png(buffer: &[u8], width: usize, height: usize, path: &Path) -> Result<()> {
    use image::{ImageBuffer, Rgba};

    let img: ImageBuffer<Rgba<u8>, _> =
        ImageBuffer::from_raw(width as u32, height as u32, buffer.to_vec())
            .context("Failed to create image from buffer")?;

    img.save(path)
        .with_context(|| format!("Failed to save snapshot: {}", path.display()))?;

    Ok(())
}
