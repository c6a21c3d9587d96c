/*
 *  state.rs
 *
 *  bitx-strip - mixer state at a glance
 *	(c) 2020-26 Stuart Hunter
 *
 *	Display state mirrored from the controller
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

use std::fmt;

use embedded_graphics::pixelcolor::{Rgb888, WebColors};
use thiserror::Error;

use crate::constants::{
    DEFAULT_CLIP_TEXT, DEFAULT_PAGE_TITLE, KNOB_COUNT, KNOB_LABEL_MAX_CHARS, LEVEL_SLOTS, TRACK_COUNT,
};
use crate::levels::normalize;
use crate::protocol::Command;

/// Identity color used when the controller never sent one.
pub const NEUTRAL_TRACK_COLOR: Rgb888 = Rgb888::CSS_GRAY;

/// Which slot table an index addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Track,
    Knob,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Track => f.write_str("track"),
            SlotKind::Knob => f.write_str("knob"),
        }
    }
}

/// A command addressed a slot that does not exist. Nothing was changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{slot} index {index} out of range (0..{limit})")]
pub struct IndexError {
    pub slot: SlotKind,
    pub index: usize,
    pub limit: usize,
}

/// One meter: a track or the master.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackState {
    /// 0..1
    pub level: f64,
    pub color: Option<Rgb888>,
}

impl TrackState {
    pub fn display_color(&self) -> Rgb888 {
        self.color.unwrap_or(NEUTRAL_TRACK_COLOR)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct KnobState {
    /// 0..1
    pub value: f64,
    pub label: Option<String>,
}

impl KnobState {
    /// Label as shown under knob `index`: the stored name or "Knob n",
    /// cut to the display width.
    pub fn display_label(&self, index: usize) -> String {
        match &self.label {
            Some(label) => truncate_label(label),
            None => truncate_label(&format!("Knob {}", index + 1)),
        }
    }
}

/// Keep the first `KNOB_LABEL_MAX_CHARS` characters.
pub fn truncate_label(label: &str) -> String {
    label.chars().take(KNOB_LABEL_MAX_CHARS).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayMeta {
    pub page_title: String,
    pub clip_text: String,
}

impl Default for DisplayMeta {
    fn default() -> Self {
        Self {
            page_title: DEFAULT_PAGE_TITLE.to_string(),
            clip_text: DEFAULT_CLIP_TEXT.to_string(),
        }
    }
}

/// Everything the strip shows. Created once, changed only through [`StripState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct StripState {
    // tracks then the master in the last slot
    levels: [TrackState; LEVEL_SLOTS],
    knobs: [KnobState; KNOB_COUNT],
    meta: DisplayMeta,
}

impl Default for StripState {
    fn default() -> Self {
        Self::new()
    }
}

impl StripState {
    pub fn new() -> Self {
        Self {
            levels: std::array::from_fn(|_| TrackState::default()),
            knobs: std::array::from_fn(|_| KnobState::default()),
            meta: DisplayMeta::default(),
        }
    }

    /// Apply one command. Each command replaces exactly one field of one slot.
    pub fn apply(&mut self, cmd: Command) -> Result<(), IndexError> {
        match cmd {
            Command::SetClip(text) => self.meta.clip_text = text,
            Command::SetPage(name) => self.meta.page_title = name,
            Command::SetKnobName { index, name } => {
                self.knob_mut(index)?.label = Some(name);
            }
            Command::SetKnobValue { index, value } => {
                self.knob_mut(index)?.value = value.clamp(0.0, 1.0);
            }
            Command::SetTrackVu { index, raw } => {
                self.track_mut(index)?.level = normalize(raw);
            }
            Command::SetMasterVu { raw } => {
                self.levels[TRACK_COUNT].level = normalize(raw);
            }
            Command::SetTrackColor { index, color } => {
                self.track_mut(index)?.color = Some(color);
            }
            Command::SetMasterColor { color } => {
                self.levels[TRACK_COUNT].color = Some(color);
            }
        }
        Ok(())
    }

    fn track_mut(&mut self, index: usize) -> Result<&mut TrackState, IndexError> {
        // the master slot is not addressable by index
        if index >= TRACK_COUNT {
            return Err(IndexError { slot: SlotKind::Track, index, limit: TRACK_COUNT });
        }
        Ok(&mut self.levels[index])
    }

    fn knob_mut(&mut self, index: usize) -> Result<&mut KnobState, IndexError> {
        self.knobs
            .get_mut(index)
            .ok_or(IndexError { slot: SlotKind::Knob, index, limit: KNOB_COUNT })
    }

    /// Track meters followed by the master.
    pub fn levels(&self) -> &[TrackState; LEVEL_SLOTS] {
        &self.levels
    }

    pub fn track(&self, index: usize) -> Option<&TrackState> {
        self.levels[..TRACK_COUNT].get(index)
    }

    pub fn master(&self) -> &TrackState {
        &self.levels[TRACK_COUNT]
    }

    pub fn knobs(&self) -> &[KnobState; KNOB_COUNT] {
        &self.knobs
    }

    pub fn meta(&self) -> &DisplayMeta {
        &self.meta
    }
}
