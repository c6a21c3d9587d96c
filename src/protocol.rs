/*
 *  protocol.rs
 *
 *  bitx-strip - mixer state at a glance
 *	(c) 2020-26 Stuart Hunter
 *
 *	Line protocol: TAG:field:field... -> Command
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
use std::str::FromStr;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use thiserror::Error;

/// One update from the controller.
///
/// Indices are carried as sent; range checks happen when the command is
/// applied to the state, which knows how many slots exist.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetClip(String),
    SetPage(String),
    SetKnobName { index: usize, name: String },
    /// `value` is clamped to 0..1 when applied.
    SetKnobValue { index: usize, value: f64 },
    /// `raw` is the controller meter value, nominally 0..127.
    SetTrackVu { index: usize, raw: i32 },
    SetMasterVu { raw: i32 },
    SetTrackColor { index: usize, color: Rgb888 },
    SetMasterColor { color: Rgb888 },
}

impl Command {
    pub fn tag(&self) -> Tag {
        match self {
            Command::SetClip(_) => Tag::Clip,
            Command::SetPage(_) => Tag::Page,
            Command::SetKnobName { .. } => Tag::KnobName,
            Command::SetKnobValue { .. } => Tag::KnobValue,
            Command::SetTrackVu { .. } => Tag::Vu,
            Command::SetMasterVu { .. } => Tag::MasterVu,
            Command::SetTrackColor { .. } => Tag::Color,
            Command::SetMasterColor { .. } => Tag::MasterColor,
        }
    }
}

/// Renders the command back as its wire line (no newline).
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = self.tag().as_str();
        match self {
            Command::SetClip(text) | Command::SetPage(text) => write!(f, "{tag}:{text}"),
            Command::SetKnobName { index, name } => write!(f, "{tag}:{index}:{name}"),
            Command::SetKnobValue { index, value } => write!(f, "{tag}:{index}:{value}"),
            Command::SetTrackVu { index, raw } => write!(f, "{tag}:{index}:{raw}"),
            Command::SetMasterVu { raw } => write!(f, "{tag}:{raw}"),
            Command::SetTrackColor { index, color } => {
                write!(f, "{tag}:{index}:{}:{}:{}", color.r(), color.g(), color.b())
            }
            Command::SetMasterColor { color } => {
                write!(f, "{tag}:{}:{}:{}", color.r(), color.g(), color.b())
            }
        }
    }
}

/// Wire tags understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Clip,
    Page,
    KnobName,
    KnobValue,
    Vu,
    MasterVu,
    Color,
    MasterColor,
}

impl Tag {
    pub fn from_wire(tag: &str) -> Option<Self> {
        match tag {
            "CLIP" => Some(Tag::Clip),
            "PAGE" => Some(Tag::Page),
            "KNOB_NAME" => Some(Tag::KnobName),
            "KNOB_VALUE" => Some(Tag::KnobValue),
            "VU" => Some(Tag::Vu),
            "MASTER_VU" => Some(Tag::MasterVu),
            "COLOR" => Some(Tag::Color),
            "MASTER_COLOR" => Some(Tag::MasterColor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Clip => "CLIP",
            Tag::Page => "PAGE",
            Tag::KnobName => "KNOB_NAME",
            Tag::KnobValue => "KNOB_VALUE",
            Tag::Vu => "VU",
            Tag::MasterVu => "MASTER_VU",
            Tag::Color => "COLOR",
            Tag::MasterColor => "MASTER_COLOR",
        }
    }

    /// Number of fields after the tag.
    pub fn arity(&self) -> usize {
        match self {
            Tag::Clip | Tag::Page | Tag::MasterVu => 1,
            Tag::KnobName | Tag::KnobValue | Tag::Vu => 2,
            Tag::MasterColor => 3,
            Tag::Color => 4,
        }
    }

    /// Last field is free text and keeps any further colons.
    fn trailing_text(&self) -> bool {
        matches!(self, Tag::Clip | Tag::Page | Tag::KnobName)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a received line was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty line")]
    Empty,
    #[error("unknown tag '{0}'")]
    UnknownTag(String),
    #[error("{tag}: expected {expected} field(s), got {found}")]
    Arity { tag: Tag, expected: usize, found: usize },
    #[error("{tag}: {field} '{value}' is not a valid {kind}")]
    InvalidNumber {
        tag: Tag,
        field: &'static str,
        kind: &'static str,
        value: String,
    },
}

/// Parse one received line into a command.
///
/// A trailing `\n` or `\r\n` is ignored. Numeric fields tolerate surrounding
/// blanks; text fields are taken verbatim.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (tag_str, rest) = match line.split_once(':') {
        Some((tag, rest)) => (tag, Some(rest)),
        None => (line, None),
    };
    let tag = Tag::from_wire(tag_str).ok_or_else(|| ParseError::UnknownTag(tag_str.to_string()))?;

    let fields: Vec<&str> = match rest {
        None => Vec::new(),
        Some(rest) if tag.trailing_text() => rest.splitn(tag.arity(), ':').collect(),
        Some(rest) => rest.split(':').collect(),
    };
    if fields.len() != tag.arity() {
        return Err(ParseError::Arity {
            tag,
            expected: tag.arity(),
            found: fields.len(),
        });
    }

    let cmd = match tag {
        Tag::Clip => Command::SetClip(fields[0].to_string()),
        Tag::Page => Command::SetPage(fields[0].to_string()),
        Tag::KnobName => Command::SetKnobName {
            index: number(tag, "index", "index", fields[0])?,
            name: fields[1].to_string(),
        },
        Tag::KnobValue => Command::SetKnobValue {
            index: number(tag, "index", "index", fields[0])?,
            value: unit_value(tag, fields[1])?,
        },
        Tag::Vu => Command::SetTrackVu {
            index: number(tag, "index", "index", fields[0])?,
            raw: number(tag, "level", "integer", fields[1])?,
        },
        Tag::MasterVu => Command::SetMasterVu {
            raw: number(tag, "level", "integer", fields[0])?,
        },
        Tag::Color => Command::SetTrackColor {
            index: number(tag, "index", "index", fields[0])?,
            color: rgb(tag, &fields[1..])?,
        },
        Tag::MasterColor => Command::SetMasterColor {
            color: rgb(tag, &fields[..])?,
        },
    };
    Ok(cmd)
}

fn number<T: FromStr>(tag: Tag, field: &'static str, kind: &'static str, value: &str) -> Result<T, ParseError> {
    value.trim().parse::<T>().map_err(|_| ParseError::InvalidNumber {
        tag,
        field,
        kind,
        value: value.to_string(),
    })
}

// f64 parsing accepts "NaN" and "inf"; neither is a knob position
fn unit_value(tag: Tag, value: &str) -> Result<f64, ParseError> {
    let v: f64 = number(tag, "value", "number", value)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ParseError::InvalidNumber {
            tag,
            field: "value",
            kind: "number",
            value: value.to_string(),
        })
    }
}

fn rgb(tag: Tag, fields: &[&str]) -> Result<Rgb888, ParseError> {
    let r: u8 = number(tag, "red", "0-255 channel", fields[0])?;
    let g: u8 = number(tag, "green", "0-255 channel", fields[1])?;
    let b: u8 = number(tag, "blue", "0-255 channel", fields[2])?;
    Ok(Rgb888::new(r, g, b))
}
