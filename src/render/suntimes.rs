use embedded_graphics::prelude::*;

use super::canvas::Canvas;
use super::fmt;
use super::glyphs::{CODE_SUNRISE, CODE_SUNSET, condition_style, draw_glyph, glyph_extent};
use super::layout::Layout;
use super::palette::PanelColor;
use super::text::{FONT_BODY, FONT_LABEL, draw_text_centered};
use crate::translate::Translation;
use crate::weather::Forecast;

/// Two centered columns: sunrise on the left half, sunset on the right.
pub(super) fn draw(cv: &mut Canvas, layout: &Layout, fc: &Forecast, tr: &Translation) {
    let half = layout.width as i32 / 2;
    column(cv, layout, half / 2, CODE_SUNRISE, "Sunrise", fc.current.sunrise, tr);
    column(cv, layout, half + half / 2, CODE_SUNSET, "Sunset", fc.current.sunset, tr);
}

fn column(
    cv: &mut Canvas,
    layout: &Layout,
    center_x: i32,
    code: &str,
    label: &str,
    epoch: i64,
    tr: &Translation,
) {
    let style = condition_style(code);
    let icon_x = center_x - glyph_extent(layout.sun_icon_scale) / 2;
    let _ = draw_glyph(
        cv,
        Point::new(icon_x, layout.sun_icon_y),
        style.glyph(),
        style.color,
        layout.sun_icon_scale,
    );
    let _ = draw_text_centered(
        cv,
        tr.word(label),
        center_x,
        layout.sun_label_y,
        &FONT_LABEL,
        PanelColor::Black,
    );
    let _ = draw_text_centered(
        cv,
        &fmt::clock12(epoch),
        center_x,
        layout.sun_time_y,
        &FONT_BODY,
        PanelColor::Black,
    );
}
