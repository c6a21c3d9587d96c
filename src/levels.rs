/*
 *  levels.rs
 *
 *  bitx-strip - mixer state at a glance
 *	(c) 2020-26 Stuart Hunter
 *
 *	Controller value scaling: raw 0..127 -> level, dB and meter color
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use embedded_graphics::pixelcolor::{Rgb888, WebColors};

/// Largest raw value the controller sends for a meter.
pub const RAW_MAX: i32 = 127;
/// Raw value treated as full scale (+6 dB) by the dB mapping.
pub const RAW_FULL_SCALE: i32 = 128;

/// Silence floor of the meter scale.
pub const DB_FLOOR: f64 = -60.0;
/// Full scale of the meter scale.
pub const DB_CEIL: f64 = 6.0;
const DB_SPAN: f64 = DB_CEIL - DB_FLOOR;

/// Reference stripes drawn across every meter, top to bottom.
pub const GRIDLINE_DBS: [f64; 8] = [6.0, 0.0, -6.0, -12.0, -18.0, -24.0, -36.0, -60.0];

/// Meter color bands, descending thresholds, first match wins.
const METER_BANDS: [(f64, Rgb888); 7] = [
    (0.1, Rgb888::CSS_MAROON),       // clipping
    (0.0, Rgb888::CSS_RED),
    (-6.0, Rgb888::CSS_ORANGE_RED),
    (-12.0, Rgb888::CSS_ORANGE),
    (-18.0, Rgb888::CSS_YELLOW),
    (-24.0, Rgb888::CSS_LIME_GREEN),
    (-36.0, Rgb888::CSS_GREEN),
];
const METER_SILENT: Rgb888 = Rgb888::CSS_DARK_BLUE;

/// Raw controller value to a 0..1 level.
#[inline]
pub fn normalize(raw: i32) -> f64 {
    (raw as f64 / RAW_MAX as f64).clamp(0.0, 1.0)
}

/// Raw controller value to dB on the fixed linear -60..+6 scale.
///
/// The controller's full scale is 128, so 127 sits just under +6 dB.
pub fn to_db(raw: i32) -> f64 {
    if raw <= 0 {
        return DB_FLOOR;
    }
    if raw >= RAW_FULL_SCALE {
        return DB_CEIL;
    }
    DB_FLOOR + (raw as f64 / RAW_FULL_SCALE as f64) * DB_SPAN
}

/// dB to a 0..1 position on the meter, clamped to the scale.
#[inline]
pub fn db_to_normalized(db: f64) -> f64 {
    (db.clamp(DB_FLOOR, DB_CEIL) - DB_FLOOR) / DB_SPAN
}

pub fn meter_color(db: f64) -> Rgb888 {
    METER_BANDS
        .iter()
        .find(|(threshold, _)| db >= *threshold)
        .map(|(_, color)| *color)
        .unwrap_or(METER_SILENT)
}

/// Full-scale indicator.
#[inline]
pub fn is_peak(raw: i32) -> bool {
    to_db(raw) >= DB_CEIL
}

/// Stored level back to the raw value the meter color and peak flag work from.
/// Scales by the full-scale value so a stored 1.0 reads as +6 dB.
#[inline]
pub fn level_to_raw(level: f64) -> i32 {
    (level.clamp(0.0, 1.0) * RAW_FULL_SCALE as f64) as i32
}
