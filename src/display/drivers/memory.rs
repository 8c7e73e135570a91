/*
 *  display/drivers/memory.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  In-memory display driver with PBM snapshots
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use embedded_graphics::prelude::*;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::geometry::Size;
use log::debug;

use crate::display::error::DisplayError;
use crate::display::traits::{DisplayDriver, DisplayCapabilities};
use crate::vframebuf::VarFrameBuf;

/// Display driver backed by a plain framebuffer.
///
/// Used by the host runner (optionally writing a PBM snapshot on every
/// flush) and by tests, which inspect pixels and the shared counters.
#[derive(Debug)]
pub struct MemoryDriver {
    /// Framebuffer for drawing operations
    framebuffer: VarFrameBuf<BinaryColor>,

    /// Display capabilities
    capabilities: DisplayCapabilities,

    /// Shared state for inspection
    state: Rc<RefCell<MemoryDriverState>>,

    /// Where to write a PBM on each flush
    snapshot: Option<PathBuf>,
}

/// Counters and switches shared with whoever holds [`MemoryDriver::state`]
#[derive(Debug, Default)]
pub struct MemoryDriverState {
    /// Number of times init() was called
    pub init_count: usize,

    /// Number of times flush() was called
    pub flush_count: usize,

    /// Number of times blank() was called
    pub blank_count: usize,

    /// Last invert state set
    pub last_invert: Option<bool>,

    /// Whether the driver is initialized
    pub is_initialized: bool,

    /// Simulate failures (for error testing)
    pub simulate_flush_failure: bool,
    pub simulate_init_failure: bool,
}

impl MemoryDriver {
    /// Create a driver with specific dimensions
    pub fn new_with_size(width: u32, height: u32) -> Self {
        let capabilities = DisplayCapabilities {
            width,
            height,
            supports_invert: true,
        };

        Self {
            framebuffer: VarFrameBuf::new(width, height, BinaryColor::Off),
            capabilities,
            state: Rc::new(RefCell::new(MemoryDriverState::default())),
            snapshot: None,
        }
    }

    /// Builder: write a PBM of the frame to `path` on every flush
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot = Some(path.into());
        self
    }

    /// Pixel at position, None outside the panel
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<BinaryColor> {
        self.framebuffer.pixel(Point::new(x as i32, y as i32))
    }

    /// The whole frame
    pub fn framebuffer(&self) -> &VarFrameBuf<BinaryColor> {
        &self.framebuffer
    }

    /// Shared counters
    pub fn state(&self) -> Rc<RefCell<MemoryDriverState>> {
        Rc::clone(&self.state)
    }

    /// Count number of pixels set to On
    pub fn count_on_pixels(&self) -> usize {
        self.framebuffer.count(BinaryColor::On)
    }

    /// Write the frame as a plain PBM (P1). PBM 1 is black, so On maps to 0.
    pub fn write_pbm<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "P1")?;
        writeln!(out, "{} {}", self.capabilities.width, self.capabilities.height)?;

        let width = self.capabilities.width as usize;
        for row in self.framebuffer.as_slice().chunks(width) {
            let line: Vec<&str> = row
                .iter()
                .map(|&p| if p == BinaryColor::On { "0" } else { "1" })
                .collect();
            writeln!(out, "{}", line.join(" "))?;
        }

        Ok(())
    }

    /// Save framebuffer to PBM file (for visual debugging)
    pub fn save_to_pbm(&self, path: &Path) -> std::io::Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        self.write_pbm(&mut file)?;
        file.flush()
    }
}

impl DisplayDriver for MemoryDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.state.borrow_mut();

        if state.simulate_init_failure {
            return Err(DisplayError::InitializationFailed("Simulated init failure".to_string()));
        }

        state.init_count += 1;
        state.is_initialized = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        {
            let mut state = self.state.borrow_mut();
            if state.simulate_flush_failure {
                return Err(DisplayError::Other("Simulated flush failure".to_string()));
            }
            state.flush_count += 1;
        }

        if let Some(path) = self.snapshot.as_deref() {
            self.save_to_pbm(path)?;
            debug!("Snapshot written to {}", path.display());
        }
        Ok(())
    }

    fn blank(&mut self) -> Result<(), DisplayError> {
        self.state.borrow_mut().blank_count += 1;
        self.framebuffer.fill(BinaryColor::Off);
        self.flush()
    }

    fn set_invert(&mut self, inverted: bool) -> Result<(), DisplayError> {
        self.state.borrow_mut().last_invert = Some(inverted);
        Ok(())
    }
}

impl DrawTarget for MemoryDriver {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.framebuffer.draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.clear(color)
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.framebuffer.fill_contiguous(area, colors)
    }
}

impl OriginDimensions for MemoryDriver {
    fn size(&self) -> Size {
        Size::new(self.capabilities.width, self.capabilities.height)
    }
}
