/*
 *  lib.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
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

pub mod config;
pub mod constants;
pub mod display;
pub mod draw;
pub mod levels;
pub mod listener;
pub mod protocol;
pub mod scheduler;
pub mod state;
pub mod vframebuf;

pub use listener::{Listener, ListenerError, ListenerStats};
pub use protocol::{parse, Command, ParseError};
pub use scheduler::{channel, RenderHandle, RenderScheduler};
pub use state::{IndexError, StripState};
