/*
 *  display/components/meters.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Track and master level meters
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

use embedded_graphics::pixelcolor::{Rgb888, WebColors};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, Rectangle};

use crate::constants::{LEVEL_SLOTS, METER_INSET, METER_LEVEL_SHARE, METER_PEAK_HEIGHT, METER_STRIP_GAP};
use crate::draw::{draw_line, fill_rect};
use crate::levels::{db_to_normalized, is_peak, level_to_raw, meter_color, to_db, GRIDLINE_DBS};
use crate::state::TrackState;

pub const METER_BACKGROUND: Rgb888 = Rgb888::CSS_DARK_GRAY;
pub const PEAK_COLOR: Rgb888 = Rgb888::CSS_RED;
pub const GRIDLINE_COLOR: Rgb888 = Rgb888::CSS_WHITE;

/// Everything drawn for one meter slot.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterGeometry {
    pub background: Rectangle,
    /// None when the level rounds to zero pixels
    pub bar: Option<Rectangle>,
    pub bar_color: Rgb888,
    /// Track identity color strip under the level area
    pub identity: Rectangle,
    pub identity_color: Rgb888,
    /// Full-scale indicator across the top
    pub peak: Option<Rectangle>,
    /// One stripe per entry of `GRIDLINE_DBS`, same order
    pub gridlines: [Line; GRIDLINE_DBS.len()],
}

/// Vertical pixel split of the meter area: (level area height, strip height).
fn split_heights(area: &Rectangle) -> (f64, i32) {
    let h = area.size.height as f64;
    let level_h = h * METER_LEVEL_SHARE;
    let strip_h = (h * (1.0 - METER_LEVEL_SHARE)).round() as i32 - METER_STRIP_GAP;
    (level_h, strip_h.max(0))
}

/// Geometry of slot `slot` (tracks first, master last) inside `area`.
pub fn meter_geometry(area: &Rectangle, slot: usize, track: &TrackState) -> MeterGeometry {
    let slot_w = area.size.width as f64 / LEVEL_SLOTS as f64;
    let x = area.top_left.x as f64 + slot as f64 * slot_w;
    let left = x.round() as i32 + METER_INSET;
    let right = (x + slot_w).round() as i32 - METER_INSET;
    let width = (right - left).max(0) as u32;

    let top = area.top_left.y;
    let (level_h, strip_h) = split_heights(area);
    let level_px = level_h.round() as i32;
    let y_at = |norm: f64| top + (level_h - level_h * norm).round() as i32;

    let background = Rectangle::new(Point::new(left, top), Size::new(width, level_px as u32));

    let bar_top = y_at(track.level);
    let bar_h = top + level_px - bar_top;
    let bar = (bar_h > 0).then(|| Rectangle::new(Point::new(left, bar_top), Size::new(width, bar_h as u32)));

    let raw = level_to_raw(track.level);
    let bar_color = meter_color(to_db(raw));

    let identity = Rectangle::new(
        Point::new(left, top + level_px + METER_STRIP_GAP),
        Size::new(width, strip_h as u32),
    );

    let peak = is_peak(raw).then(|| Rectangle::new(Point::new(left, top), Size::new(width, METER_PEAK_HEIGHT)));

    let gridlines = GRIDLINE_DBS.map(|db| {
        let y = y_at(db_to_normalized(db));
        Line::new(Point::new(left, y), Point::new(right, y))
    });

    MeterGeometry {
        background,
        bar,
        bar_color,
        identity,
        identity_color: track.display_color(),
        peak,
        gridlines,
    }
}

/// Geometry for every slot, tracks then master.
pub fn meters_geometry(area: &Rectangle, levels: &[TrackState]) -> Vec<MeterGeometry> {
    levels
        .iter()
        .enumerate()
        .map(|(slot, track)| meter_geometry(area, slot, track))
        .collect()
}

pub fn draw_meter<D>(target: &mut D, meter: &MeterGeometry) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    fill_rect(target, meter.background, METER_BACKGROUND)?;
    fill_rect(target, meter.identity, meter.identity_color)?;
    if let Some(bar) = meter.bar {
        fill_rect(target, bar, meter.bar_color)?;
    }
    if let Some(peak) = meter.peak {
        fill_rect(target, peak, PEAK_COLOR)?;
    }
    for line in &meter.gridlines {
        draw_line(target, *line, GRIDLINE_COLOR, 1)?;
    }
    Ok(())
}

pub fn draw_meters<D>(target: &mut D, area: &Rectangle, levels: &[TrackState]) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    for meter in meters_geometry(area, levels) {
        draw_meter(target, &meter)?;
    }
    Ok(())
}
