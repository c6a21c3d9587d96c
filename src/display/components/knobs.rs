/*
 *  display/components/knobs.rs
 *
 *  bitx-strip - mixer state at a glance
 *  (c) 2020-26 Stuart Hunter
 *
 *  Remote-control knobs and page title
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

use embedded_graphics::geometry::AngleUnit;
use embedded_graphics::mono_font::iso_8859_1::{FONT_5X8, FONT_6X10};
use embedded_graphics::pixelcolor::{Rgb888, WebColors};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Arc, Circle, Line, Rectangle};

use crate::constants::{
    KNOB_ARC_START_DEG, KNOB_ARC_STROKE, KNOB_COUNT, KNOB_FACE_DIAMETER, KNOB_LABEL_DROP,
    KNOB_RING_DIAMETER, KNOB_RING_STROKE, KNOB_SPACING, KNOB_STRIPE_LENGTH, KNOB_STRIPE_OFFSET_DEG,
    KNOB_STRIPE_STROKE, KNOB_SWEEP_DEG, KNOB_TOP,
};
use crate::draw::{draw_arc, draw_line, draw_text, fill_circle, stroke_circle};
use crate::state::KnobState;

pub const RING_COLOR: Rgb888 = Rgb888::new(103, 103, 103);
pub const ARC_COLOR: Rgb888 = Rgb888::new(254, 125, 17);
pub const FACE_COLOR: Rgb888 = Rgb888::new(125, 125, 125);
pub const STRIPE_COLOR: Rgb888 = Rgb888::CSS_WHITE;
pub const LABEL_COLOR: Rgb888 = Rgb888::CSS_WHITE;

const LABEL_CHAR_HALF_WIDTH: i32 = 3;

/// Everything drawn for one knob.
#[derive(Debug, Clone, PartialEq)]
pub struct KnobGeometry {
    pub ring: Circle,
    /// Progress arc; None at zero travel
    pub arc: Option<Arc>,
    pub face: Circle,
    pub center: Point,
    /// Screen-space angle of the indicator stripe
    pub stripe_angle_deg: f64,
    pub stripe: Line,
    pub label: String,
    /// Label baseline start
    pub label_origin: Point,
}

/// Clockwise sweep of the progress arc for `value`.
#[inline]
pub fn arc_sweep_deg(value: f64) -> f64 {
    value.clamp(0.0, 1.0) * KNOB_SWEEP_DEG
}

/// Stripe angle for `value`. Lands on the tip of the progress arc:
/// `KNOB_ARC_START_DEG + arc_sweep_deg(value)` modulo a full turn.
#[inline]
pub fn stripe_angle_deg(value: f64) -> f64 {
    arc_sweep_deg(value) + KNOB_STRIPE_OFFSET_DEG
}

pub fn knob_geometry(area: &Rectangle, index: usize, knob: &KnobState) -> KnobGeometry {
    let pitch = (KNOB_RING_DIAMETER + KNOB_SPACING) as i32;
    // row is right-aligned in the region
    let row_start = area.size.width as i32 - KNOB_COUNT as i32 * pitch;
    let x = area.top_left.x + row_start + index as i32 * pitch;
    let y = area.top_left.y + KNOB_TOP;
    let radius = (KNOB_RING_DIAMETER / 2) as i32;
    let center = Point::new(x + radius, y + radius);

    let ring = Circle::new(Point::new(x, y), KNOB_RING_DIAMETER);
    let inset = ((KNOB_RING_DIAMETER - KNOB_FACE_DIAMETER) / 2) as i32;
    let face = Circle::new(Point::new(x + inset, y + inset), KNOB_FACE_DIAMETER);

    let sweep = arc_sweep_deg(knob.value);
    let arc = (sweep > 0.0).then(|| {
        Arc::new(
            Point::new(x, y),
            KNOB_RING_DIAMETER,
            (KNOB_ARC_START_DEG as f32).deg(),
            (sweep as f32).deg(),
        )
    });

    let angle = stripe_angle_deg(knob.value);
    let (sin, cos) = angle.to_radians().sin_cos();
    let tip = Point::new(
        center.x + (cos * KNOB_STRIPE_LENGTH).round() as i32,
        center.y + (sin * KNOB_STRIPE_LENGTH).round() as i32,
    );

    let label = knob.display_label(index);
    let label_origin = Point::new(
        center.x - label.chars().count() as i32 * LABEL_CHAR_HALF_WIDTH,
        y + KNOB_RING_DIAMETER as i32 + KNOB_LABEL_DROP,
    );

    KnobGeometry {
        ring,
        arc,
        face,
        center,
        stripe_angle_deg: angle,
        stripe: Line::new(center, tip),
        label,
        label_origin,
    }
}

pub fn knobs_geometry(area: &Rectangle, knobs: &[KnobState]) -> Vec<KnobGeometry> {
    knobs
        .iter()
        .enumerate()
        .map(|(i, knob)| knob_geometry(area, i, knob))
        .collect()
}

pub fn draw_knob<D>(target: &mut D, knob: &KnobGeometry) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    stroke_circle(target, knob.ring, RING_COLOR, KNOB_RING_STROKE)?;
    if let Some(arc) = knob.arc {
        draw_arc(target, arc, ARC_COLOR, KNOB_ARC_STROKE)?;
    }
    fill_circle(target, knob.face, FACE_COLOR)?;
    draw_line(target, knob.stripe, STRIPE_COLOR, KNOB_STRIPE_STROKE)?;
    draw_text(target, &knob.label, knob.label_origin, &FONT_6X10, LABEL_COLOR)
}

/// Page title in small type at the top-left of the knob region, then the knobs.
pub fn draw_knobs<D>(
    target: &mut D,
    area: &Rectangle,
    page_title: &str,
    knobs: &[KnobState],
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let title_origin = area.top_left + Point::new(2, FONT_5X8.baseline as i32 + 1);
    draw_text(target, page_title, title_origin, &FONT_5X8, LABEL_COLOR)?;
    for knob in knobs_geometry(area, knobs) {
        draw_knob(target, &knob)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::drivers::mock::MockDriver;
    use crate::display::layout::StripLayout;

    fn area() -> Rectangle {
        StripLayout::default().knobs
    }

    fn knob(value: f64) -> KnobState {
        KnobState { value, label: None }
    }

    #[test]
    fn test_row_placement() {
        let first = knob_geometry(&area(), 0, &knob(0.0));
        let last = knob_geometry(&area(), 7, &knob(0.0));
        // 500 - 8 * (38 + 20) = 36
        assert_eq!(first.ring.top_left, Point::new(736, 10));
        assert_eq!(first.ring.diameter, 38);
        assert_eq!(first.face.top_left, Point::new(741, 15));
        assert_eq!(first.face.diameter, 28);
        assert_eq!(first.center, Point::new(755, 29));
        assert_eq!(last.ring.top_left.x, 736 + 7 * 58);
        assert!(last.ring.top_left.x + 38 <= 1200);
    }

    #[test]
    fn test_zero_value() {
        let g = knob_geometry(&area(), 0, &knob(0.0));
        assert_eq!(g.arc, None);
        assert_eq!(g.stripe_angle_deg, -225.0);
        // bottom-left of center
        assert_eq!(g.stripe.end - g.center, Point::new(-8, 8));
    }

    #[test]
    fn test_full_value() {
        let g = knob_geometry(&area(), 0, &knob(1.0));
        let arc = g.arc.unwrap();
        assert_eq!(arc.angle_start, 135.0f32.deg());
        assert_eq!(arc.angle_sweep, 270.0f32.deg());
        assert_eq!(g.stripe_angle_deg, 45.0);
        // bottom-right of center
        assert_eq!(g.stripe.end - g.center, Point::new(8, 8));
    }

    #[test]
    fn test_half_value_points_up() {
        let g = knob_geometry(&area(), 3, &knob(0.5));
        assert_eq!(g.arc.unwrap().angle_sweep, 135.0f32.deg());
        assert_eq!(g.stripe.end - g.center, Point::new(0, -12));
    }

    #[test]
    fn test_stripe_tracks_arc_tip() {
        for step in 0..=20 {
            let value = step as f64 / 20.0;
            let tip = KNOB_ARC_START_DEG + arc_sweep_deg(value);
            let diff = (tip - stripe_angle_deg(value)).rem_euclid(360.0);
            assert!(diff.abs() < 1e-9 || (diff - 360.0).abs() < 1e-9, "value {value}: {diff}");
        }
    }

    #[test]
    fn test_labels() {
        let named = KnobState { value: 0.0, label: Some("AVeryLongLabelName".to_string()) };
        let g = knob_geometry(&area(), 2, &named);
        assert_eq!(g.label, "AVeryLon");
        assert_eq!(g.label_origin, Point::new(g.center.x - 24, 10 + 38 + 14));

        let g = knob_geometry(&area(), 5, &knob(0.0));
        assert_eq!(g.label, "Knob 6");
        assert_eq!(g.label_origin.x, g.center.x - 18);
    }

    #[test]
    fn test_out_of_range_value_is_clamped() {
        assert_eq!(arc_sweep_deg(1.5), 270.0);
        assert_eq!(arc_sweep_deg(-0.5), 0.0);
    }

    #[test]
    fn test_draw_knobs_pixels() {
        let layout = StripLayout::default();
        let mut driver = MockDriver::new_with_size(layout.width, layout.height).unwrap();
        let mut knobs = vec![knob(0.0); KNOB_COUNT];
        knobs[1] = knob(0.5);

        draw_knobs(&mut driver, &layout.knobs, "Device", &knobs).unwrap();

        let g = knob_geometry(&layout.knobs, 1, &knobs[1]);
        // face below the center, away from the upward stripe
        let below = g.center + Point::new(0, 8);
        assert_eq!(driver.get_pixel(below.x as u32, below.y as u32), Some(FACE_COLOR));
        let stripe_box = Rectangle::new(g.center + Point::new(-2, -10), Size::new(5, 6));
        assert!(driver.count_pixels(&stripe_box, STRIPE_COLOR) > 0);
        assert!(driver.count_pixels(&g.ring.bounding_box(), ARC_COLOR) > 0);

        let idle = knob_geometry(&layout.knobs, 0, &knobs[0]);
        assert_eq!(driver.count_pixels(&idle.ring.bounding_box(), ARC_COLOR), 0);
        assert!(driver.count_pixels(&idle.ring.bounding_box(), RING_COLOR) > 0);
    }
}
