/*
 *  display/drivers/framebuffer.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  In-memory RGB surface with optional frame snapshots
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

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, info};

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::display::error::DisplayError;
use crate::display::traits::{DisplayCapabilities, DisplayDriver};
use crate::vframebuf::VarFrameBuf;

/// Default surface when no window backend is attached.
///
/// Every flush counts a frame; with a snapshot path set the frame is also
/// written out as a binary PPM, replacing the previous one atomically.
#[derive(Debug)]
pub struct FrameBufferDriver {
    framebuffer: VarFrameBuf<Rgb888>,
    capabilities: DisplayCapabilities,
    snapshot: Option<PathBuf>,
    frames: u64,
}

impl FrameBufferDriver {
    pub fn new(width: u32, height: u32, snapshot: Option<PathBuf>) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::InvalidConfiguration(format!(
                "surface {}x{} has no pixels",
                width, height
            )));
        }
        Ok(Self {
            framebuffer: VarFrameBuf::new(width, height, Rgb888::BLACK),
            capabilities: DisplayCapabilities { width, height, max_fps: 60 },
            snapshot,
            frames: 0,
        })
    }

    /// Frames presented so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    // Blocking file I/O. The render loop runs on the main thread (block_on),
    // never on a runtime worker, so this stalls only the strip itself.
    fn write_snapshot(&self, path: &Path) -> Result<(), DisplayError> {
        let tmp = path.with_extension("ppm.tmp");
        {
            let file = File::create(&tmp)?;
            self.framebuffer.write_ppm(BufWriter::new(file))?;
        }
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl DisplayDriver for FrameBufferDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        self.framebuffer.clear_color(Rgb888::BLACK);
        if let Some(path) = self.snapshot.as_ref() {
            info!("frame snapshots to {}", path.display());
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        self.frames += 1;
        if let Some(path) = self.snapshot.as_deref() {
            self.write_snapshot(path)?;
            debug!("frame {} written", self.frames);
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.framebuffer.clear_color(Rgb888::BLACK);
        self.flush()
    }
}

impl DrawTarget for FrameBufferDriver {
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.framebuffer.draw_iter(pixels)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.fill_solid(area, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.framebuffer.clear(color)
    }
}

impl OriginDimensions for FrameBufferDriver {
    fn size(&self) -> Size {
        Size::new(self.capabilities.width, self.capabilities.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bitx-strip-{}-{}.ppm", std::process::id(), name))
    }

    #[test]
    fn test_rejects_empty_surface() {
        assert!(matches!(
            FrameBufferDriver::new(0, 70, None),
            Err(DisplayError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_flush_counts_frames() {
        let mut fb = FrameBufferDriver::new(32, 8, None).unwrap();
        fb.init().unwrap();
        fb.flush().unwrap();
        fb.flush().unwrap();
        assert_eq!(fb.frame_count(), 2);
        DisplayDriver::clear(&mut fb).unwrap();
        assert_eq!(fb.frame_count(), 3);
    }

    #[test]
    fn test_snapshot_written_on_flush() {
        let path = scratch("snapshot");
        let mut fb = FrameBufferDriver::new(4, 2, Some(path.clone())).unwrap();
        fb.fill_solid(&Rectangle::new(Point::zero(), Size::new(1, 1)), Rgb888::new(1, 2, 3))
            .unwrap();
        fb.flush().unwrap();

        let bytes = fs::read(&path).unwrap();
        let header = b"P6\n4 2\n255\n";
        assert!(bytes.starts_with(header));
        assert_eq!(bytes.len(), header.len() + 4 * 2 * 3);
        assert_eq!(&bytes[header.len()..header.len() + 3], &[1, 2, 3]);
        assert!(!path.with_extension("ppm.tmp").exists());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_snapshot_failure_is_reported() {
        let path = std::env::temp_dir().join("bitx-strip-missing-dir").join("nested").join("frame.ppm");
        let mut fb = FrameBufferDriver::new(4, 2, Some(path)).unwrap();
        assert!(matches!(fb.flush(), Err(DisplayError::Snapshot(_))));
    }
}
