/*
 *  display/manager.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Strip renderer: state in, frame out
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
use log::{info, warn};
use std::time::Instant;

use crate::display::components::{draw_clip, draw_knobs, draw_meters};
use crate::display::error::DisplayError;
use crate::display::layout::StripLayout;
use crate::display::traits::{DisplayDriver, DrawableDisplay};
use crate::draw::fill_rect;
use crate::state::StripState;

/// Fill behind every region
pub const REGION_BACKGROUND: Rgb888 = Rgb888::new(65, 65, 65);

/// Frame timing for the strip renderer
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    /// Time spent drawing plus presenting the last frame
    pub frame_time_us: u64,

    /// Frames rendered so far
    pub frame_count: u64,

    /// Running average frame time
    pub avg_frame_time_us: u64,

    /// Target frame time based on surface capabilities
    pub target_frame_time_us: u64,
}

impl PerformanceMetrics {
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame_time_us: 0,
            frame_count: 0,
            avg_frame_time_us: 0,
            target_frame_time_us: 1_000_000 / target_fps.max(1) as u64,
        }
    }

    pub fn record_frame(&mut self, frame_time_us: u64) {
        self.frame_time_us = frame_time_us;
        self.frame_count += 1;

        if self.avg_frame_time_us == 0 {
            self.avg_frame_time_us = frame_time_us;
        } else {
            self.avg_frame_time_us = (self.avg_frame_time_us + frame_time_us) / 2;
        }

        // more than 20% over target
        if frame_time_us > self.target_frame_time_us * 12 / 10 {
            warn!(
                "Frame time {}μs exceeds target {}μs",
                frame_time_us, self.target_frame_time_us
            );
        }
    }
}

/// Draws the whole strip from a `StripState` onto a surface.
///
/// Every frame is a full redraw: region backgrounds, clip name, page
/// title and knobs, then the meters, followed by one flush. Nothing is
/// cached between frames, so the picture is always a function of the
/// state handed in.
pub struct StripRenderer<D: DrawableDisplay> {
    driver: D,
    layout: StripLayout,
    metrics: PerformanceMetrics,
}

impl<D: DrawableDisplay> StripRenderer<D> {
    pub fn new(driver: D, layout: StripLayout) -> Result<Self, DisplayError> {
        let (w, h) = driver.dimensions();
        if w < layout.width || h < layout.height {
            return Err(DisplayError::InvalidConfiguration(format!(
                "surface {}x{} smaller than strip {}x{}",
                w, h, layout.width, layout.height
            )));
        }
        let metrics = PerformanceMetrics::new(driver.capabilities().max_fps);
        Ok(Self { driver, layout, metrics })
    }

    /// Prepare the surface and blank it.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.driver.init()?;
        DisplayDriver::clear(&mut self.driver)?;
        info!(
            "strip {}x{} ready (text {} | knobs {} | meters {})",
            self.layout.width,
            self.layout.height,
            self.layout.text.size.width,
            self.layout.knobs.size.width,
            self.layout.meters.size.width
        );
        Ok(())
    }

    pub fn render(&mut self, state: &StripState) -> Result<(), DisplayError> {
        let start = Instant::now();
        let layout = &self.layout;
        let target = &mut self.driver;

        for region in [layout.text, layout.knobs, layout.meters] {
            fill_rect(target, region, REGION_BACKGROUND)?;
        }
        draw_clip(target, &layout.text, &state.meta().clip_text)?;
        draw_knobs(target, &layout.knobs, &state.meta().page_title, state.knobs())?;
        draw_meters(target, &layout.meters, state.levels())?;

        self.driver.flush()?;
        self.metrics.record_frame(start.elapsed().as_micros() as u64);
        Ok(())
    }

    pub fn frames(&self) -> u64 {
        self.metrics.frame_count
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    pub fn layout(&self) -> &StripLayout {
        &self.layout
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }
}
