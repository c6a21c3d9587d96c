/*
 *  display/components/clip.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Playing clip name
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

use embedded_graphics::mono_font::iso_8859_1::FONT_10X20;
use embedded_graphics::pixelcolor::{Rgb888, WebColors};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::draw::draw_text_region;

pub const CLIP_COLOR: Rgb888 = Rgb888::CSS_YELLOW;

const CLIP_PADDING: u32 = 4;

/// Box the clip name wraps inside.
pub fn clip_box(area: &Rectangle) -> Rectangle {
    area.offset(-(CLIP_PADDING as i32))
}

/// Clip name, word-wrapped; as many full rows as fit (three at stock height).
pub fn draw_clip<D>(target: &mut D, area: &Rectangle, clip_text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    draw_text_region(target, clip_text, clip_box(area), &FONT_10X20, CLIP_COLOR)
}
