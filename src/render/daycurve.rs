use chrono::Timelike;
use embedded_graphics::prelude::*;

use super::canvas::Canvas;
use super::chart::{ChartRenderer, Series, day_curve_samples};
use super::fmt;
use super::glyphs::{CODE_SUNRISE, CODE_SUNSET, condition_style, draw_glyph, glyph_extent};
use super::layout::Layout;
use super::palette::PanelColor;
use super::text::{FONT_BODY, draw_text, draw_text_right};
use crate::weather::Forecast;

/// Idealized sun-elevation curve over the 24-hour day with sunrise and
/// sunset markers at their local wall-clock positions.
pub(super) fn draw(cv: &mut Canvas, layout: &Layout, fc: &Forecast, chart: &dyn ChartRenderer) {
    let samples = day_curve_samples();
    chart.plot(
        cv,
        layout.curve_graph,
        &Series { points: &samples, color: PanelColor::Red, dashed: false },
        Some((-1.2, 1.2)),
    );

    marker(cv, layout, chart, fc.current.sunrise, CODE_SUNRISE, Side::Left);
    marker(cv, layout, chart, fc.current.sunset, CODE_SUNSET, Side::Right);
}

enum Side {
    Left,
    Right,
}

fn marker(
    cv: &mut Canvas,
    layout: &Layout,
    chart: &dyn ChartRenderer,
    epoch: i64,
    code: &str,
    side: Side,
) {
    let t = fmt::local_time(epoch);
    let hour = t.hour() as f64 + t.minute() as f64 / 60.0;
    // the curve samples hours 0..=23, so 23 spans the full width
    let x_frac = (hour / 23.0).clamp(0.0, 1.0);
    chart.vline(cv, layout.curve_graph, x_frac, PanelColor::Blue, true);

    let x = layout.curve_graph.top_left.x
        + (x_frac * (layout.curve_graph.size.width - 1) as f64) as i32;
    let icon_y = layout.curve_graph.top_left.y - 30;
    let label_y = layout.curve_graph.top_left.y - 4;
    let style = condition_style(code);
    let stamp = fmt::clock12(epoch);
    match side {
        Side::Left => {
            let _ = draw_glyph(
                cv,
                Point::new(x - 6 - glyph_extent(1), icon_y),
                style.glyph(),
                style.color,
                1,
            );
            let _ = draw_text_right(cv, &stamp, Point::new(x - 6, label_y), &FONT_BODY, PanelColor::Blue);
        }
        Side::Right => {
            let _ = draw_glyph(cv, Point::new(x + 6, icon_y), style.glyph(), style.color, 1);
            let _ = draw_text(cv, &stamp, Point::new(x + 6, label_y), &FONT_BODY, PanelColor::Blue);
        }
    }
}
