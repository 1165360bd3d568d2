use embedded_graphics::{
    mono_font::{MonoFont, MonoTextStyle},
    prelude::*,
    text::{Baseline, Text},
};

use embedded_text::{
    TextBox,
    alignment::{HorizontalAlignment, VerticalAlignment},
    style::TextBoxStyleBuilder,
};

use super::palette::PanelColor;

// The panel is slow and large; a handful of fixed faces covers every
// layout. All faces are ISO 8859-1 so the degree sign renders.
pub use embedded_graphics::mono_font::iso_8859_1::{
    FONT_6X10 as FONT_SMALL, FONT_7X13 as FONT_BODY, FONT_9X15 as FONT_LABEL,
    FONT_9X18_BOLD as FONT_HEADING, FONT_10X20 as FONT_DISPLAY,
};

/// Advance width of `text` in `font`, including inter-character spacing.
pub fn text_width(text: &str, font: &MonoFont) -> u32 {
    let n = text.chars().count() as u32;
    n * (font.character_size.width + font.character_spacing)
}

pub fn draw_text<D>(
    target: &mut D,
    text: &str,
    top_left: Point,
    font: &MonoFont,
    color: PanelColor,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = PanelColor>,
{
    Text::with_baseline(text, top_left, MonoTextStyle::new(font, color), Baseline::Top)
        .draw(target)?;
    Ok(())
}

/// Right-anchored text: `anchor.x` is where the last glyph ends.
pub fn draw_text_right<D>(
    target: &mut D,
    text: &str,
    anchor: Point,
    font: &MonoFont,
    color: PanelColor,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = PanelColor>,
{
    let x = anchor.x - text_width(text, font) as i32;
    draw_text(target, text, Point::new(x, anchor.y), font, color)
}

/// Horizontally centered on `center_x`.
pub fn draw_text_centered<D>(
    target: &mut D,
    text: &str,
    center_x: i32,
    y: i32,
    font: &MonoFont,
    color: PanelColor,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = PanelColor>,
{
    let x = center_x - (text_width(text, font) / 2) as i32;
    draw_text(target, text, Point::new(x, y), font, color)
}

/// Boxed multi-line text with middle alignment, used by the no-data
/// notice where the message length is unknown.
pub fn draw_text_region<D>(
    target: &mut D,
    text: &str,
    region: embedded_graphics::primitives::Rectangle,
    halign: HorizontalAlignment,
    font: &MonoFont,
    color: PanelColor,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = PanelColor>,
{
    let character_style = MonoTextStyle::new(font, color);
    let textbox_style = TextBoxStyleBuilder::new()
        .alignment(halign)
        .vertical_alignment(VerticalAlignment::Middle)
        .build();
    TextBox::with_textbox_style(text, region, character_style, textbox_style).draw(target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::canvas::Canvas;

    #[test]
    fn width_is_monospaced() {
        assert_eq!(text_width("", &FONT_SMALL), 0);
        let advance = FONT_SMALL.character_size.width + FONT_SMALL.character_spacing;
        assert_eq!(text_width("abc", &FONT_SMALL), 3 * advance);
    }

    #[test]
    fn centered_text_lands_symmetrically() {
        let mut cv = Canvas::new(100, 20, PanelColor::White);
        draw_text_centered(&mut cv, "ab", 50, 2, &FONT_SMALL, PanelColor::Black).unwrap();
        let inked: Vec<usize> = (0..100)
            .filter(|&x| (0..20).any(|y| cv.get(x, y) == Some(PanelColor::Black)))
            .collect();
        assert!(!inked.is_empty());
        let min = *inked.first().unwrap() as i32;
        let max = *inked.last().unwrap() as i32;
        assert!((50 - min - (max - 50)).abs() <= 2);
    }
}
