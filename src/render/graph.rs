use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

use super::canvas::Canvas;
use super::chart::{ChartRenderer, Series};
use super::fmt;
use super::layout::Layout;
use super::palette::PanelColor;
use super::text::{FONT_BODY, FONT_SMALL, draw_text, draw_text_right};
use crate::translate::Translation;
use crate::weather::{Forecast, bucket_for_hour};

/// The feed advertises 48 hourly entries; one is dropped so midnight
/// markers fall between points.
const GRAPH_HOURS: usize = 47;

/// Resting pressure scale (hPa); widened when the data escapes it.
const PRESSURE_LO: f64 = 990.0;
const PRESSURE_HI: f64 = 1020.0;

/// 48-hour trend graph: temperature and feels-like always, pressure and
/// rain behind their config flags, midnight/noon markers, legend row.
pub(super) fn draw(
    cv: &mut Canvas,
    layout: &Layout,
    fc: &Forecast,
    chart: &dyn ChartRenderer,
    rain_overlay: bool,
    pressure_overlay: bool,
    tr: &Translation,
) {
    let hours = &fc.hourly[..fc.hourly.len().min(GRAPH_HOURS)];
    if hours.len() < GRAPH_HOURS {
        // short feed: render what arrived and say so
        let note = format!("limited hourly forecast ({})", hours.len());
        let _ = draw_text_right(cv, &note, layout.note_anchor, &FONT_SMALL, PanelColor::Orange);
    }
    if hours.len() < 2 {
        return;
    }

    let temp: Vec<(i64, f64)> = hours.iter().map(|h| (h.dt, h.temp)).collect();
    let feels: Vec<(i64, f64)> = hours.iter().map(|h| (h.dt, h.feels_like)).collect();

    // both series share one vertical scale
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &(_, v) in temp.iter().chain(feels.iter()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let temp_range = Some((lo, hi));

    if pressure_overlay {
        let pressure: Vec<(i64, f64)> = hours.iter().map(|h| (h.dt, h.pressure)).collect();
        let mut p_lo = PRESSURE_LO;
        let mut p_hi = PRESSURE_HI;
        for &(_, v) in &pressure {
            p_lo = p_lo.min(v - 2.0);
            p_hi = p_hi.max(v + 2.0);
        }
        chart.plot(
            cv,
            layout.pressure_graph,
            &Series { points: &pressure, color: PanelColor::Red, dashed: false },
            Some((p_lo, p_hi)),
        );
    }

    if rain_overlay {
        let rain: Vec<(i64, f64)> = hours
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let mm = fc.rain_buckets.get(bucket_for_hour(i)).copied().unwrap_or(0.0);
                (h.dt, mm)
            })
            .collect();
        chart.plot(
            cv,
            layout.rain_graph,
            &Series { points: &rain, color: PanelColor::Blue, dashed: false },
            None,
        );
    }

    chart.plot(
        cv,
        layout.graph,
        &Series { points: &feels, color: PanelColor::Green, dashed: true },
        temp_range,
    );
    chart.plot(
        cv,
        layout.graph,
        &Series { points: &temp, color: PanelColor::Orange, dashed: false },
        temp_range,
    );

    // midnight and noon markers with AM/PM labels above the curve
    let span = (hours.len() - 1) as f64;
    for (idx, h) in hours.iter().enumerate().skip(1) {
        let hr = fmt::hour12(h.dt);
        if hr == "0" || hr == "12" {
            let x_frac = idx as f64 / span;
            chart.vline(cv, layout.graph, x_frac, PanelColor::Black, true);
            let label_x = layout.graph.top_left.x
                + (x_frac * (layout.graph.size.width - 1) as f64) as i32;
            let _ = draw_text_right(
                cv,
                tr.word(&fmt::ampm(h.dt)),
                Point::new(label_x, layout.graph.top_left.y - 14),
                &FONT_SMALL,
                PanelColor::Black,
            );
        }
    }

    legend(cv, layout, rain_overlay, pressure_overlay, tr);
}

fn legend(cv: &mut Canvas, layout: &Layout, rain: bool, pressure: bool, tr: &Translation) {
    let shift = if pressure { layout.legend_pressure_shift } else { 0 };
    if pressure {
        legend_entry(cv, 10, layout.legend_y, PanelColor::Red, tr.word("Pressure"));
    }
    legend_entry(cv, 10 + shift, layout.legend_y, PanelColor::Orange, tr.word("Temp"));
    legend_entry(cv, 145 + shift, layout.legend_y, PanelColor::Green, tr.word("Feels like"));
    if rain {
        legend_entry(cv, 280 + shift, layout.legend_y, PanelColor::Blue, tr.word("Rain"));
    }
}

fn legend_entry(cv: &mut Canvas, x: i32, y: i32, swatch: PanelColor, label: &str) {
    let _ = Rectangle::new(Point::new(x, y), Size::new(15, 16))
        .into_styled(PrimitiveStyle::with_fill(swatch))
        .draw(cv);
    let _ = draw_text(cv, label, Point::new(x + 20, y + 2), &FONT_BODY, PanelColor::Black);
}
