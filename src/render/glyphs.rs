/*
 *  render/glyphs.rs
 *
 *  inkwx - weather you can wait for
 *  (c) 2024-26 inkwx contributors
 *
 *  Condition-code lookup: every OpenWeatherMap icon code maps to a panel
 *  color and a 1-bpp glyph from the embedded strip.
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

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use super::palette::PanelColor;
use crate::config::Unit;

/// Glyph dimensions (21 glyphs in one vertical strip)
pub const GLYPH_WIDTH: u32 = 24;
pub const GLYPH_HEIGHT: u32 = 24;

const GLYPH_ROW_BYTES: usize = (GLYPH_WIDTH as usize).div_ceil(8);
const GLYPH_BYTES: usize = GLYPH_ROW_BYTES * GLYPH_HEIGHT as usize;

/// 24x24 1-bpp glyphs, MSB first, one per condition code plus the
/// sunrise/sunset pseudo-codes and the unknown fallback.
const GLYPH_RAW_DATA: &[u8] = include_bytes!("../../data/glyphs_24x24.bin");

/// Pseudo-codes used by the sun layouts; not part of the API contract.
pub const CODE_SUNRISE: &str = "sunrise";
pub const CODE_SUNSET: &str = "sunset";

/// Style pair for one weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionStyle {
    pub color: PanelColor,
    glyph_index: usize,
}

impl ConditionStyle {
    pub fn glyph(&self) -> &'static [u8] {
        let start = self.glyph_index * GLYPH_BYTES;
        &GLYPH_RAW_DATA[start..start + GLYPH_BYTES]
    }
}

const fn style(color: PanelColor, glyph_index: usize) -> ConditionStyle {
    ConditionStyle { color, glyph_index }
}

/// Fallback pair for codes the table does not know. Rendering must never
/// abort on an unrecognized code.
pub const FALLBACK_STYLE: ConditionStyle = style(PanelColor::Black, 20);

/// Every documented code, day and night variants, plus the two
/// pseudo-codes. Colors follow the panel's legibility table: clear day
/// is orange, rain and snow are blue, thunder is red, the rest black.
pub fn condition_style(code: &str) -> ConditionStyle {
    match code {
        "01d" => style(PanelColor::Orange, 0), // clear sky
        "01n" => style(PanelColor::Yellow, 1),
        "02d" => style(PanelColor::Black, 2), // few clouds
        "02n" => style(PanelColor::Black, 3),
        "03d" => style(PanelColor::Black, 4), // scattered clouds
        "03n" => style(PanelColor::Black, 5),
        "04d" => style(PanelColor::Black, 6), // broken clouds
        "04n" => style(PanelColor::Black, 7),
        "09d" => style(PanelColor::Black, 8), // shower rain
        "09n" => style(PanelColor::Black, 9),
        "10d" => style(PanelColor::Blue, 10), // rain
        "10n" => style(PanelColor::Blue, 11),
        "11d" => style(PanelColor::Red, 12), // thunderstorm
        "11n" => style(PanelColor::Red, 13),
        "13d" => style(PanelColor::Blue, 14), // snow
        "13n" => style(PanelColor::Blue, 15),
        "50d" => style(PanelColor::Black, 16), // fog
        "50n" => style(PanelColor::Black, 17),
        CODE_SUNRISE => style(PanelColor::Black, 18),
        CODE_SUNSET => style(PanelColor::Black, 19),
        _ => FALLBACK_STYLE,
    }
}

/// All codes the table documents, used by the lookup test.
pub const DOCUMENTED_CODES: [&str; 20] = [
    "01d", "01n", "02d", "02n", "03d", "03n", "04d", "04n", "09d", "09n",
    "10d", "10n", "11d", "11n", "13d", "13n", "50d", "50n", CODE_SUNRISE, CODE_SUNSET,
];

/// Unit sign rendered next to temperatures.
pub fn unit_sign(unit: Unit) -> &'static str {
    match unit {
        Unit::Imperial => "\u{b0}F",
        Unit::Metric => "\u{b0}C",
    }
}

/// Paint one glyph bit-by-bit, scaled up by an integer factor so the
/// same strip serves both the header icon and the forecast columns.
pub fn draw_glyph<D>(
    target: &mut D,
    top_left: Point,
    glyph: &[u8],
    color: PanelColor,
    scale: u32,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = PanelColor>,
{
    let scale = scale.max(1);
    for row in 0..GLYPH_HEIGHT as usize {
        for col in 0..GLYPH_WIDTH as usize {
            let byte = glyph[row * GLYPH_ROW_BYTES + col / 8];
            if byte & (0x80 >> (col % 8)) != 0 {
                let px = top_left + Point::new(col as i32 * scale as i32, row as i32 * scale as i32);
                Rectangle::new(px, Size::new(scale, scale))
                    .into_styled(PrimitiveStyle::with_fill(color))
                    .draw(target)?;
            }
        }
    }
    Ok(())
}

/// Glyph width in pixels after scaling; keeps centering math in one place.
pub fn glyph_extent(scale: u32) -> i32 {
    (GLYPH_WIDTH * scale.max(1)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_documented_code_has_a_style() {
        for code in DOCUMENTED_CODES {
            let s = condition_style(code);
            assert_ne!(s, FALLBACK_STYLE, "no dedicated style for {code}");
            assert_eq!(s.glyph().len(), GLYPH_BYTES);
        }
    }

    #[test]
    fn unknown_codes_fall_back_without_panicking() {
        for code in ["", "99x", "weird", "01D"] {
            assert_eq!(condition_style(code), FALLBACK_STYLE);
        }
        assert_eq!(FALLBACK_STYLE.glyph().len(), GLYPH_BYTES);
    }

    #[test]
    fn strip_holds_all_glyphs() {
        assert_eq!(GLYPH_RAW_DATA.len(), 21 * GLYPH_BYTES);
    }

    #[test]
    fn unit_signs() {
        assert_eq!(unit_sign(Unit::Metric), "°C");
        assert_eq!(unit_sign(Unit::Imperial), "°F");
    }
}
