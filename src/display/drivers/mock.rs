/*
 *  display/drivers/mock.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock surface for testing without a window
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

use crate::display::error::DisplayError;
use crate::display::traits::{DisplayCapabilities, DisplayDriver};
use crate::vframebuf::VarFrameBuf;

use std::sync::{Arc, Mutex};

/// Mock surface for tests
///
/// Records every driver operation and exposes the framebuffer so tests
/// can check what a renderer drew.
#[derive(Debug, Clone)]
pub struct MockDriver {
    framebuffer: VarFrameBuf<Rgb888>,
    capabilities: DisplayCapabilities,
    /// Shared so clones handed to a renderer stay observable
    state: Arc<Mutex<MockDriverState>>,
}

/// Operation counters (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockDriverState {
    /// Number of times init() was called
    pub init_count: usize,

    /// Number of times flush() was called
    pub flush_count: usize,

    /// Number of times clear() was called
    pub clear_count: usize,

    /// Whether the driver is initialized
    pub is_initialized: bool,

    /// Simulate failures (for error testing)
    pub simulate_flush_failure: bool,
    pub simulate_init_failure: bool,
}

impl MockDriver {
    /// Create a mock surface with specific dimensions
    pub fn new_with_size(width: u32, height: u32) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::InvalidConfiguration(format!(
                "mock surface {}x{} has no pixels",
                width, height
            )));
        }

        let capabilities = DisplayCapabilities {
            width,
            height,
            max_fps: 60,
        };

        Ok(Self {
            framebuffer: VarFrameBuf::new(width, height, Rgb888::BLACK),
            capabilities,
            state: Arc::new(Mutex::new(MockDriverState::default())),
        })
    }

    /// Get pixel at position for testing
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        self.framebuffer.pixel(x as i32, y as i32)
    }

    /// Count pixels of `color` inside `area`
    pub fn count_pixels(&self, area: &Rectangle, color: Rgb888) -> usize {
        self.framebuffer.count_in(area, color)
    }

    /// Count pixels that are not black
    pub fn count_lit_pixels(&self) -> usize {
        self.framebuffer
            .as_slice()
            .iter()
            .filter(|&&p| p != Rgb888::BLACK)
            .count()
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockDriverState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MockDriverState>, DisplayError> {
        self.state
            .lock()
            .map_err(|_| DisplayError::Other("mock state poisoned".to_string()))
    }
}

impl DisplayDriver for MockDriver {
    fn capabilities(&self) -> &DisplayCapabilities {
        &self.capabilities
    }

    fn init(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock()?;

        if state.simulate_init_failure {
            return Err(DisplayError::InitializationFailed("Simulated init failure".to_string()));
        }

        state.init_count += 1;
        state.is_initialized = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        let mut state = self.lock()?;

        if state.simulate_flush_failure {
            return Err(DisplayError::Other("Simulated flush failure".to_string()));
        }

        state.flush_count += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        self.lock()?.clear_count += 1;
        self.framebuffer.clear_color(Rgb888::BLACK);
        self.flush()
    }
}

impl DrawTarget for MockDriver {
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

impl OriginDimensions for MockDriver {
    fn size(&self) -> Size {
        Size::new(self.capabilities.width, self.capabilities.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn test_mock_driver_creation() {
        let driver = MockDriver::new_with_size(1512, 70).unwrap();
        assert_eq!(driver.capabilities().width, 1512);
        assert_eq!(driver.dimensions(), (1512, 70));
        assert_eq!(driver.count_lit_pixels(), 0);
        assert!(MockDriver::new_with_size(0, 70).is_err());
    }

    #[test]
    fn test_mock_driver_init() {
        let mut driver = MockDriver::new_with_size(128, 64).unwrap();

        let state = driver.state();
        assert_eq!(state.lock().unwrap().init_count, 0);
        assert!(!state.lock().unwrap().is_initialized);

        driver.init().unwrap();

        assert_eq!(state.lock().unwrap().init_count, 1);
        assert!(state.lock().unwrap().is_initialized);
    }

    #[test]
    fn test_mock_driver_drawing() {
        let mut driver = MockDriver::new_with_size(128, 64).unwrap();

        Line::new(Point::new(0, 0), Point::new(10, 10))
            .into_styled(PrimitiveStyle::with_stroke(Rgb888::RED, 1))
            .draw(&mut driver)
            .unwrap();

        assert_eq!(driver.get_pixel(0, 0), Some(Rgb888::RED));
        assert_eq!(driver.get_pixel(128, 0), None);
        let corner = Rectangle::new(Point::zero(), Size::new(11, 11));
        assert_eq!(driver.count_pixels(&corner, Rgb888::RED), 11);
    }

    #[test]
    fn test_mock_driver_clear() {
        let mut driver = MockDriver::new_with_size(128, 64).unwrap();
        DrawTarget::clear(&mut driver, Rgb888::GREEN).unwrap();
        assert_eq!(driver.count_lit_pixels(), 128 * 64);

        // DisplayDriver::clear blanks and presents
        DisplayDriver::clear(&mut driver).unwrap();

        assert_eq!(driver.count_lit_pixels(), 0);
        let state = driver.state();
        let state = state.lock().unwrap();
        assert_eq!(state.clear_count, 1);
        assert_eq!(state.flush_count, 1);
    }

    #[test]
    fn test_simulated_failures() {
        let mut driver = MockDriver::new_with_size(16, 16).unwrap();
        driver.state().lock().unwrap().simulate_flush_failure = true;
        assert!(driver.flush().is_err());

        driver.state().lock().unwrap().simulate_init_failure = true;
        assert!(matches!(driver.init(), Err(DisplayError::InitializationFailed(_))));
    }
}
