/*
 *  display/components/mod.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Strip components: geometry from state, then draw
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

pub mod clip;
pub mod knobs;
pub mod meters;

pub use clip::draw_clip;
pub use knobs::{draw_knobs, knob_geometry, KnobGeometry};
pub use meters::{draw_meters, meter_geometry, MeterGeometry};
