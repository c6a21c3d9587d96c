//! This module contains global constants used across the protocol, state and display modules.

/// Number of track meters (the master meter is an extra slot after these).
pub const TRACK_COUNT: usize = 8;
/// Level slots held by the state: one per track plus the master.
pub const LEVEL_SLOTS: usize = TRACK_COUNT + 1;
/// Number of rotary controls on a remote-controls page.
pub const KNOB_COUNT: usize = 8;
/// Knob labels are cut to this many characters for display.
pub const KNOB_LABEL_MAX_CHARS: usize = 8;

/// Placeholder shown until the controller sends a clip name.
pub const DEFAULT_CLIP_TEXT: &str = "No Clip";
/// Placeholder shown until the controller sends a page name.
pub const DEFAULT_PAGE_TITLE: &str = "No Page";

/// Port the controller pushes updates to.
pub const DEFAULT_PORT: u16 = 9876;
/// Interface the listener binds to.
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";
/// Depth of the listener -> render hand-off queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 64;

// Strip geometry, left to right: clip text | knobs | meters
/// Width of the clip text region.
pub const TEXT_WIDTH: u32 = 700;
/// Width of the knob region.
pub const KNOBS_WIDTH: u32 = 500;
/// Width of the meter region.
pub const METERS_WIDTH: u32 = 312;
/// Height of the whole strip.
pub const STRIP_HEIGHT: u32 = 70;

// Meter geometry
/// Share of the meter height used by the level bar; the rest is the identity strip.
pub const METER_LEVEL_SHARE: f64 = 0.8;
/// Horizontal inset on each side of a meter slot.
pub const METER_INSET: i32 = 5;
/// Gap between the level area and the identity strip.
pub const METER_STRIP_GAP: i32 = 2;
/// Height of the full-scale indicator bar.
pub const METER_PEAK_HEIGHT: u32 = 3;

// Knob geometry
pub const KNOB_FACE_DIAMETER: u32 = 28;
pub const KNOB_RING_DIAMETER: u32 = KNOB_FACE_DIAMETER + 10;
pub const KNOB_SPACING: u32 = 20;
pub const KNOB_TOP: i32 = 10;
pub const KNOB_RING_STROKE: u32 = 3;
pub const KNOB_ARC_STROKE: u32 = 3;
pub const KNOB_STRIPE_STROKE: u32 = 2;
/// Stripe length from the knob center.
pub const KNOB_STRIPE_LENGTH: f64 = (KNOB_FACE_DIAMETER / 2 - 2) as f64;
/// Label baseline below the top of the ring.
pub const KNOB_LABEL_DROP: i32 = 14;

// Knob angles, screen space: 0 deg at 3 o'clock, positive is clockwise.
/// Start of the progress arc (bottom-left, 7:30).
pub const KNOB_ARC_START_DEG: f64 = 135.0;
/// Full travel of a knob.
pub const KNOB_SWEEP_DEG: f64 = 270.0;
/// Stripe angle is `value * KNOB_SWEEP_DEG + KNOB_STRIPE_OFFSET_DEG`.
pub const KNOB_STRIPE_OFFSET_DEG: f64 = -225.0;
