/*
 *  display/layout.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Strip regions: clip text | knobs | meters
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

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::config::DisplayConfig;
use crate::constants::{KNOBS_WIDTH, METERS_WIDTH, STRIP_HEIGHT, TEXT_WIDTH};

/// Placement of the three strip regions.
///
/// Regions sit side by side at full strip height; the surface is exactly
/// as wide as the three of them together.
#[derive(Debug, Clone, PartialEq)]
pub struct StripLayout {
    /// Total width in pixels
    pub width: u32,

    /// Total height in pixels
    pub height: u32,

    /// Clip name (left)
    pub text: Rectangle,

    /// Page title and knobs (middle)
    pub knobs: Rectangle,

    /// Track and master meters (right)
    pub meters: Rectangle,
}

impl StripLayout {
    pub fn new(text_width: u32, knobs_width: u32, meters_width: u32, height: u32) -> Self {
        let size = |w| Size::new(w, height);
        let text = Rectangle::new(Point::zero(), size(text_width));
        let knobs = Rectangle::new(Point::new(text_width as i32, 0), size(knobs_width));
        let meters = Rectangle::new(Point::new((text_width + knobs_width) as i32, 0), size(meters_width));
        Self {
            width: text_width + knobs_width + meters_width,
            height,
            text,
            knobs,
            meters,
        }
    }

    /// Layout from the `display` config group; unset keys take the stock strip size.
    pub fn from_config(config: Option<&DisplayConfig>) -> Self {
        let d = config.cloned().unwrap_or_default();
        Self::new(
            d.text_width.unwrap_or(TEXT_WIDTH),
            d.knobs_width.unwrap_or(KNOBS_WIDTH),
            d.meters_width.unwrap_or(METERS_WIDTH),
            d.height.unwrap_or(STRIP_HEIGHT),
        )
    }
}

impl Default for StripLayout {
    fn default() -> Self {
        Self::new(TEXT_WIDTH, KNOBS_WIDTH, METERS_WIDTH, STRIP_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strip() {
        let layout = StripLayout::default();
        assert_eq!(layout.width, 1512);
        assert_eq!(layout.height, 70);
        assert_eq!(layout.text, Rectangle::new(Point::new(0, 0), Size::new(700, 70)));
        assert_eq!(layout.knobs, Rectangle::new(Point::new(700, 0), Size::new(500, 70)));
        assert_eq!(layout.meters, Rectangle::new(Point::new(1200, 0), Size::new(312, 70)));
    }

    #[test]
    fn test_config_overrides() {
        let cfg = DisplayConfig {
            text_width: Some(300),
            height: Some(90),
            ..Default::default()
        };
        let layout = StripLayout::from_config(Some(&cfg));
        assert_eq!(layout.width, 300 + 500 + 312);
        assert_eq!(layout.meters.top_left, Point::new(800, 0));
        assert_eq!(layout.meters.size.height, 90);
        assert_eq!(StripLayout::from_config(None), StripLayout::default());
    }
}
