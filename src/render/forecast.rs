use embedded_graphics::prelude::*;

use super::canvas::Canvas;
use super::fmt;
use super::glyphs::{condition_style, draw_glyph, glyph_extent};
use super::layout::Layout;
use super::palette::PanelColor;
use super::text::{FONT_BODY, FONT_LABEL, draw_text, draw_text_centered, draw_text_right};
use crate::translate::Translation;
use crate::weather::Forecast;

/// Hourly forecast columns. Column `fi` shows the entry
/// `(fi + 1) * interval` hours out; columns past the end of the feed
/// stay blank rather than failing the render.
pub(super) fn draw(
    cv: &mut Canvas,
    layout: &Layout,
    fc: &Forecast,
    interval_hours: u32,
    tr: &Translation,
) {
    for fi in 0..layout.columns {
        let idx = (fi + 1) * interval_hours as usize;
        let Some(hour) = fc.hourly.get(idx) else {
            continue;
        };
        let col_x = layout.column_w * fi as i32;
        let center_x = col_x + layout.column_w / 2;

        let style = condition_style(&hour.code);
        let icon_x = center_x - glyph_extent(layout.column_icon_scale) / 2;
        let _ = draw_glyph(
            cv,
            Point::new(icon_x, layout.column_icon_y),
            style.glyph(),
            style.color,
            layout.column_icon_scale,
        );

        let _ = draw_text_centered(
            cv,
            tr.word(&hour.description),
            center_x,
            layout.column_desc_y,
            &FONT_LABEL,
            PanelColor::Black,
        );

        let _ = draw_text(
            cv,
            &fmt::hour_ampm(hour.dt),
            Point::new(col_x + 30, layout.column_time_y),
            &FONT_BODY,
            PanelColor::Black,
        );
        let _ = draw_text_right(
            cv,
            &format!("{:.1}", hour.temp),
            Point::new(col_x + layout.column_w - 30, layout.column_time_y),
            &FONT_BODY,
            PanelColor::Black,
        );
    }
}
