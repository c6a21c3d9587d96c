use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Arc, Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle},
    text::{Baseline, Text},
};

use embedded_text::{
    alignment::{HorizontalAlignment, VerticalAlignment},
    style::{HeightMode, TextBoxStyleBuilder, VerticalOverdraw},
    TextBox,
};

pub fn fill_rect<D>(target: &mut D, rect: Rectangle, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    rect.into_styled(PrimitiveStyle::with_fill(color)).draw(target)
}

pub fn draw_line<D>(
    target: &mut D,
    line: Line,
    color: Rgb888,
    width: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    line.into_styled(PrimitiveStyle::with_stroke(color, width)).draw(target)
}

/// Stroke only, no fill.
pub fn stroke_circle<D>(
    target: &mut D,
    circle: Circle,
    color: Rgb888,
    width: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    circle
        .into_styled(
            PrimitiveStyleBuilder::new()
                .stroke_color(color)
                .stroke_width(width)
                .build(),
        )
        .draw(target)
}

pub fn fill_circle<D>(target: &mut D, circle: Circle, color: Rgb888) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    circle.into_styled(PrimitiveStyle::with_fill(color)).draw(target)
}

pub fn draw_arc<D>(
    target: &mut D,
    arc: Arc,
    color: Rgb888,
    width: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    arc.into_styled(PrimitiveStyle::with_stroke(color, width)).draw(target)
}

/// Single line of text with its baseline at `origin.y`.
pub fn draw_text<D>(
    target: &mut D,
    text: &str,
    origin: Point,
    font: &MonoFont,
    color: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    Text::with_baseline(text, origin, MonoTextStyle::new(font, color), Baseline::Alphabetic)
        .draw(target)?;
    Ok(())
}

/// Word-wrapped text clipped to `region`; rows that do not fit are dropped.
pub fn draw_text_region<D>(
    target: &mut D,
    text: &str,
    region: Rectangle,
    font: &MonoFont,
    color: Rgb888,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    let character_style = MonoTextStyle::new(font, color);
    let textbox_style = TextBoxStyleBuilder::new()
        .alignment(HorizontalAlignment::Left)
        .vertical_alignment(VerticalAlignment::Top)
        .height_mode(HeightMode::Exact(VerticalOverdraw::FullRowsOnly))
        .build();
    TextBox::with_textbox_style(text, region, character_style, textbox_style).draw(target)?;
    Ok(())
}
