/*
 *  display/traits.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Core trait definitions for the drawing surface
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

use core::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use crate::display::error::DisplayError;

/// Display capabilities and metadata
#[derive(Debug, Clone)]
pub struct DisplayCapabilities {
    /// Surface width in pixels
    pub width: u32,

    /// Surface height in pixels
    pub height: u32,

    /// Maximum recommended frame rate
    pub max_fps: u32,
}

/// Minimal surface abstraction - every backend the strip draws to implements this
///
/// Windowing and pixel presentation live behind this trait; the strip only
/// needs to prepare the surface, push finished frames and blank it.
pub trait DisplayDriver: Send {
    /// Returns the capabilities of this surface
    fn capabilities(&self) -> &DisplayCapabilities;

    /// Returns the surface dimensions as (width, height)
    fn dimensions(&self) -> (u32, u32) {
        let caps = self.capabilities();
        (caps.width, caps.height)
    }

    /// Prepare the surface for rendering
    fn init(&mut self) -> Result<(), DisplayError>;

    /// Present the current frame
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Blank the surface and present it
    fn clear(&mut self) -> Result<(), DisplayError>;
}

/// A surface the strip can draw into with embedded-graphics primitives.
///
/// `DrawTarget` is not dyn compatible, so renderers are generic over this
/// trait rather than boxing drivers.
pub trait DrawableDisplay:
    DisplayDriver + DrawTarget<Color = Rgb888, Error = Infallible> + OriginDimensions
{
}

impl<T> DrawableDisplay for T where
    T: DisplayDriver + DrawTarget<Color = Rgb888, Error = Infallible> + OriginDimensions
{
}
